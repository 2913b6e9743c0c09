//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

// Re-exports for convenience
pub use error::{AppError, AppResult, TransportError};
pub use logging::{init_logger, log_startup_configuration};
