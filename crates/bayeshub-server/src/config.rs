//! Server configuration

use bayeshub_classifiers::ImportPolicy;
use bayeshub_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::Cli;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Entries retained by the diagnostic log
    #[serde(default = "default_log_capacity")]
    pub diagnostic_log_capacity: usize,

    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Whether an import may replace an existing classifier
    #[serde(default)]
    pub import_overwrite: bool,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        if let Some(capacity) = cli.log_capacity {
            config.diagnostic_log_capacity = capacity;
        }

        if cli.import_overwrite {
            config.import_overwrite = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.diagnostic_log_capacity == 0 {
            return Err(Error::config("diagnostic_log_capacity must be at least 1"));
        }
        if self.max_body_bytes == 0 {
            return Err(Error::config("max_body_bytes must be at least 1"));
        }
        Ok(())
    }

    /// Import behavior for names that are already registered
    pub fn import_policy(&self) -> ImportPolicy {
        if self.import_overwrite {
            ImportPolicy::Overwrite
        } else {
            ImportPolicy::Reject
        }
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            diagnostic_log_capacity: default_log_capacity(),
            max_body_bytes: default_max_body_bytes(),
            import_overwrite: false,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_capacity() -> usize {
    100
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}
