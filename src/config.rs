// src/config.rs - Provisioning and logging configuration

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProvisionError, Result};

/// Required entries in a provisioning mapping.
pub const REQUIRED_KEYS: [&str; 3] = ["key_path", "csr_path", "cert_path"];

const DEFAULT_SUBJECT: &str = "/CN=localhost";
const DEFAULT_DAYS: u32 = 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub provision: ProvisionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Key output path, relative to the base directory
    pub key_path: String,
    /// CSR output path, relative to the base directory
    pub csr_path: String,
    /// Certificate output path, relative to the base directory
    pub cert_path: String,
    /// Subject line for the CSR (openssl -subj syntax)
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Certificate validity in days
    #[serde(default = "default_days")]
    pub days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level for the console sink
    pub console_level: String,
    /// Minimum level for the rotating file sink
    pub file_level: String,
    /// Log file path; file sink is disabled when unset
    pub log_file: Option<String>,
    /// Whether the console formatter uses ANSI colors
    pub ansi: bool,
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_days() -> u32 {
    DEFAULT_DAYS
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            key_path: "/certs/key.pem".to_string(),
            csr_path: "/certs/csr.pem".to_string(),
            cert_path: "/certs/cert.pem".to_string(),
            subject: default_subject(),
            days: DEFAULT_DAYS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: "info".to_string(),
            file_level: "debug".to_string(),
            log_file: None,
            ansi: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provision: ProvisionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ProvisionConfig {
    /// Build a provisioning config from a string mapping. Every entry in
    /// [`REQUIRED_KEYS`] must be present; this is checked before any
    /// external command runs.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        for key in REQUIRED_KEYS {
            if !map.contains_key(key) {
                return Err(ProvisionError::MissingConfig {
                    key: key.to_string(),
                });
            }
        }

        debug!("🔧 Building provisioning config from mapping");

        Ok(Self {
            key_path: map["key_path"].clone(),
            csr_path: map["csr_path"].clone(),
            cert_path: map["cert_path"].clone(),
            subject: map
                .get("subject")
                .cloned()
                .unwrap_or_else(default_subject),
            days: match map.get("days") {
                Some(days) => days.parse().map_err(|e| {
                    ProvisionError::Configuration(format!("Invalid days '{}': {}", days, e))
                })?,
                None => DEFAULT_DAYS,
            },
        })
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("key_path", &self.key_path),
            ("csr_path", &self.csr_path),
            ("cert_path", &self.cert_path),
        ] {
            if value.is_empty() {
                return Err(ProvisionError::Configuration(format!(
                    "{} cannot be empty",
                    field
                )));
            }
        }

        if self.key_path == self.csr_path
            || self.key_path == self.cert_path
            || self.csr_path == self.cert_path
        {
            return Err(ProvisionError::Configuration(
                "key_path, csr_path, and cert_path must be distinct".to_string(),
            ));
        }

        if self.days == 0 {
            return Err(ProvisionError::Configuration(
                "days must be at least 1".to_string(),
            ));
        }

        if !self.subject.starts_with('/') {
            return Err(ProvisionError::Configuration(format!(
                "subject must use openssl -subj syntax (got '{}')",
                self.subject
            )));
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ProvisionError::Filesystem {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_json::from_str(&contents)?;
        config.provision.validate()?;

        info!("✅ Configuration loaded from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.provision.validate()
    }
}
