//! Lovens Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other Lovens crates:
//! - Client configuration (API and identity endpoints, timeouts)
//! - The error taxonomy surfaced by every client operation
//! - Structured logging with tracing
//! - Common constants

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

// Re-export commonly used items at the crate root
pub use config::{ApiConfig, AppConfig, LoggingConfig};
pub use error::{LvError, LvResult};
pub use logging::init_logging;
