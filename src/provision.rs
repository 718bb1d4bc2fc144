// src/provision.rs - Sequential openssl provisioning flow

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::config::ProvisionConfig;
use crate::error::{ProvisionError, ProvisionStep, Result};

const DEFAULT_TOOL: &str = "openssl";
const KEY_BITS: &str = "2048";

/// The three artifact paths for one provisioning run, resolved against the
/// base directory before any external command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    pub key_path: PathBuf,
    pub csr_path: PathBuf,
    pub cert_path: PathBuf,
}

impl PathSet {
    /// Join each configured fragment onto the base directory. A leading
    /// separator on a fragment is part of the relative fragment, not an
    /// absolute path.
    pub fn resolve(base_dir: &Path, config: &ProvisionConfig) -> Self {
        Self {
            key_path: join_fragment(base_dir, &config.key_path),
            csr_path: join_fragment(base_dir, &config.csr_path),
            cert_path: join_fragment(base_dir, &config.cert_path),
        }
    }
}

fn join_fragment(base_dir: &Path, fragment: &str) -> PathBuf {
    base_dir.join(fragment.trim_start_matches(|c| c == '/' || c == '\\'))
}

/// Runs the three-step provisioning flow: RSA key, CSR, self-signed
/// certificate. Each step consumes the previous step's output file, so the
/// steps are strictly sequential and blocking. Artifacts written by earlier
/// steps are left in place when a later step fails.
pub struct Provisioner {
    base_dir: PathBuf,
    tool: String,
}

impl Provisioner {
    /// Create a provisioner resolving artifacts against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            tool: DEFAULT_TOOL.to_string(),
        }
    }

    /// Override the toolkit binary name.
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Run the full flow, returning the resolved paths on success.
    pub fn provision(&self, config: &ProvisionConfig) -> Result<PathSet> {
        config.validate()?;

        let paths = PathSet::resolve(&self.base_dir, config);
        debug!(
            "Resolved artifact paths: key={} csr={} cert={}",
            paths.key_path.display(),
            paths.csr_path.display(),
            paths.cert_path.display()
        );

        self.ensure_parent_dirs(&paths)?;

        self.generate_key(&paths)?;
        self.create_request(&paths, config)?;
        self.self_sign(&paths, config)?;

        info!(
            "✅ Provisioned key, CSR, and certificate under {}",
            self.base_dir.display()
        );
        Ok(paths)
    }

    fn ensure_parent_dirs(&self, paths: &PathSet) -> Result<()> {
        for path in [&paths.key_path, &paths.csr_path, &paths.cert_path] {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ProvisionError::Filesystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        Ok(())
    }

    fn generate_key(&self, paths: &PathSet) -> Result<()> {
        info!("🔑 Generating {}-bit RSA private key", KEY_BITS);

        let mut cmd = Command::new(&self.tool);
        cmd.args(["genrsa", "-out"])
            .arg(&paths.key_path)
            .arg(KEY_BITS);
        self.run_step(ProvisionStep::GenerateKey, cmd)
    }

    fn create_request(&self, paths: &PathSet, config: &ProvisionConfig) -> Result<()> {
        info!("📝 Generating certificate signing request");

        let mut cmd = Command::new(&self.tool);
        cmd.args(["req", "-new", "-sha256", "-key"])
            .arg(&paths.key_path)
            .arg("-subj")
            .arg(&config.subject)
            .arg("-out")
            .arg(&paths.csr_path);
        self.run_step(ProvisionStep::CreateRequest, cmd)
    }

    fn self_sign(&self, paths: &PathSet, config: &ProvisionConfig) -> Result<()> {
        info!("📜 Self-signing certificate ({} days)", config.days);

        let mut cmd = Command::new(&self.tool);
        cmd.args(["x509", "-req", "-in"])
            .arg(&paths.csr_path)
            .arg("-signkey")
            .arg(&paths.key_path)
            .arg("-days")
            .arg(config.days.to_string())
            .arg("-out")
            .arg(&paths.cert_path);
        self.run_step(ProvisionStep::SelfSign, cmd)
    }

    fn run_step(&self, step: ProvisionStep, mut cmd: Command) -> Result<()> {
        debug!("Running {}: {:?}", step, cmd);

        let output = cmd.output().map_err(|e| ProvisionError::Spawn {
            step,
            tool: self.tool.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(ProvisionError::CommandFailed {
                step,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
