//! bayeshub Server
//!
//! HTTP front end for a registry of named Bayes text classifiers. Each
//! classifier can be created, trained, queried, exported as a portable
//! snapshot, and imported again under any name.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::ServerConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
