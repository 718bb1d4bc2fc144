// src/main.rs - certmint CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use certmint::{init_logging, Config, ProvisioningRun};

#[derive(Parser)]
#[command(name = "certmint")]
#[command(about = "Provision an RSA key, CSR, and self-signed certificate via the openssl toolkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Base directory artifacts are resolved against (defaults to the
    /// directory containing this executable)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// JSON configuration file with the path mapping and logging options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Key output path, relative to the base directory
    #[arg(long)]
    key_path: Option<String>,

    /// CSR output path, relative to the base directory
    #[arg(long)]
    csr_path: Option<String>,

    /// Certificate output path, relative to the base directory
    #[arg(long)]
    cert_path: Option<String>,

    /// CSR subject line (openssl -subj syntax)
    #[arg(long)]
    subject: Option<String>,

    /// Certificate validity in days
    #[arg(long)]
    days: Option<u32>,

    /// Log file path; daily rotation, disabled when unset
    #[arg(long)]
    log_file: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if let Some(key_path) = cli.key_path {
        config.provision.key_path = key_path;
    }
    if let Some(csr_path) = cli.csr_path {
        config.provision.csr_path = csr_path;
    }
    if let Some(cert_path) = cli.cert_path {
        config.provision.cert_path = cert_path;
    }
    if let Some(subject) = cli.subject {
        config.provision.subject = subject;
    }
    if let Some(days) = cli.days {
        config.provision.days = days;
    }
    if let Some(log_file) = cli.log_file {
        config.logging.log_file = Some(log_file);
    }
    if cli.verbose {
        config.logging.console_level = "debug".to_string();
    }

    // Held until exit so the file sink flushes
    let _guard = init_logging(&config.logging)?;

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => default_base_dir()?,
    };

    info!(
        "🧾 certmint v{} (base dir: {})",
        certmint::VERSION,
        base_dir.display()
    );

    let run = ProvisioningRun::new(config, base_dir);
    match run.start() {
        Ok(paths) => {
            println!("✅ Certificate artifacts provisioned");
            println!("   Key:         {}", paths.key_path.display());
            println!("   CSR:         {}", paths.csr_path.display());
            println!("   Certificate: {}", paths.cert_path.display());
            Ok(())
        }
        Err(e) => {
            error!("❌ Provisioning failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn default_base_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot determine executable path")?;
    let dir = exe
        .parent()
        .context("Executable has no parent directory")?;
    Ok(dir.to_path_buf())
}
