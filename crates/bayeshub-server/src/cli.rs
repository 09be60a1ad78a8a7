//! Command-line arguments

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "bayeshub-server")]
#[command(about = "Registry service for named Bayes text classifiers", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml", env = "BAYESHUB_CONFIG")]
    pub config: String,

    /// Listen address (overrides the configuration file)
    #[arg(short = 'l', long, env = "BAYESHUB_LISTEN")]
    pub listen: Option<String>,

    /// Listen port (overrides the configuration file)
    #[arg(short = 'P', long, env = "BAYESHUB_PORT")]
    pub port: Option<u16>,

    /// Number of entries kept by the diagnostic log
    #[arg(long, env = "BAYESHUB_LOG_CAPACITY")]
    pub log_capacity: Option<usize>,

    /// Let imports replace an existing classifier of the same name
    #[arg(long)]
    pub import_overwrite: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
