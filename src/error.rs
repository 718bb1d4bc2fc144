use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Which of the three provisioning steps a subprocess failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    GenerateKey,
    CreateRequest,
    SelfSign,
}

impl std::fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProvisionStep::GenerateKey => "RSA key generation",
            ProvisionStep::CreateRequest => "CSR generation",
            ProvisionStep::SelfSign => "certificate self-signing",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Missing configuration key: {key}")]
    MissingConfig { key: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("External toolkit '{tool}' is not available: {source}")]
    ToolkitUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch {tool} for {step}: {source}")]
    Spawn {
        step: ProvisionStep,
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} failed with {status}: {stderr}")]
    CommandFailed {
        step: ProvisionStep,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProvisionError {
    /// The step a subprocess error is tagged with, if any.
    pub fn step(&self) -> Option<ProvisionStep> {
        match self {
            ProvisionError::Spawn { step, .. } | ProvisionError::CommandFailed { step, .. } => {
                Some(*step)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
