// src/startup.rs - Wires dependency checks and the provisioning flow

use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::dependencies::ToolkitChecker;
use crate::error::Result;
use crate::provision::{PathSet, Provisioner};

/// Handles one complete provisioning run.
pub struct ProvisioningRun {
    config: Config,
    provisioner: Provisioner,
}

impl ProvisioningRun {
    /// Create a run for the given configuration and base directory.
    pub fn new(config: Config, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            provisioner: Provisioner::new(base_dir),
            config,
        }
    }

    /// Check dependencies, then run the three provisioning steps.
    pub fn start(&self) -> Result<PathSet> {
        info!("🚀 Starting certificate provisioning");

        ToolkitChecker::new(self.provisioner.tool()).check_all()?;

        let paths = self.provisioner.provision(&self.config.provision)?;

        info!("✅ Provisioning completed successfully");
        Ok(paths)
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
