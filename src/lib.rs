// src/lib.rs - certmint library surface

pub mod config;
pub mod dependencies;
pub mod error;
pub mod logging;
pub mod provision;
pub mod startup;

// Re-export commonly used items for convenience
pub use config::{Config, LoggingConfig, ProvisionConfig};
pub use error::{ProvisionError, ProvisionStep, Result};
pub use logging::init_logging;
pub use provision::{PathSet, Provisioner};
pub use startup::ProvisioningRun;

/// certmint version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
