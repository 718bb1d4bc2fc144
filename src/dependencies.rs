use std::process::Command;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{ProvisionError, Result};

/// Checks external dependencies before a provisioning run starts.
pub struct ToolkitChecker<'a> {
    tool: &'a str,
}

impl<'a> ToolkitChecker<'a> {
    /// Create a checker for the given toolkit binary.
    pub fn new(tool: &'a str) -> Self {
        Self { tool }
    }

    /// Check all external dependencies.
    pub fn check_all(&self) -> Result<()> {
        info!("🔍 Checking external dependencies");
        self.check_toolkit()
    }

    /// Check that the toolkit binary is on PATH and report its version.
    fn check_toolkit(&self) -> Result<()> {
        let check_start = Instant::now();

        let output = Command::new(self.tool)
            .arg("version")
            .output()
            .map_err(|e| ProvisionError::ToolkitUnavailable {
                tool: self.tool.to_string(),
                source: e,
            })?;

        let duration = check_start.elapsed();

        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            info!(
                "✅ {} available in {:.3}s",
                version.lines().next().unwrap_or(self.tool).trim(),
                duration.as_secs_f64()
            );
        } else {
            // Some builds reject `version`; the binary exists, so keep going.
            warn!(
                "⚠️  '{} version' exited with {} after {:.3}s",
                self.tool,
                output.status,
                duration.as_secs_f64()
            );
        }

        Ok(())
    }
}
