// tests/provision.rs - End-to-end provisioning tests
//
// Tests that actually invoke openssl skip themselves when the toolkit is not
// on PATH, so the suite stays green on bare runners.

use std::collections::HashMap;
use std::fs;
use std::process::Command;

use pretty_assertions::assert_eq;
use serial_test::serial;
use tempfile::TempDir;

use certmint::{Config, ProvisionConfig, ProvisionError, ProvisionStep, Provisioner, ProvisioningRun};

fn openssl_available() -> bool {
    Command::new("openssl")
        .arg("version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn full_map() -> HashMap<String, String> {
    HashMap::from([
        ("key_path".to_string(), "/certs/key.pem".to_string()),
        ("csr_path".to_string(), "/certs/csr.pem".to_string()),
        ("cert_path".to_string(), "/certs/cert.pem".to_string()),
    ])
}

fn test_config() -> ProvisionConfig {
    ProvisionConfig::from_map(&full_map()).unwrap()
}

#[test]
#[serial]
fn end_to_end_provisioning_with_defaults() {
    if !openssl_available() {
        eprintln!("skipping: openssl not on PATH");
        return;
    }

    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("certs")).unwrap();

    let provisioner = Provisioner::new(dir.path());
    let paths = provisioner.provision(&test_config()).unwrap();

    assert_eq!(paths.key_path, dir.path().join("certs/key.pem"));
    assert_eq!(paths.csr_path, dir.path().join("certs/csr.pem"));
    assert_eq!(paths.cert_path, dir.path().join("certs/cert.pem"));

    for path in [&paths.key_path, &paths.csr_path, &paths.cert_path] {
        let metadata = fs::metadata(path)
            .unwrap_or_else(|e| panic!("{} should exist: {}", path.display(), e));
        assert!(metadata.len() > 0, "{} should be non-empty", path.display());
    }

    let key = fs::read_to_string(&paths.key_path).unwrap();
    assert!(key.contains("PRIVATE KEY"));

    let csr = fs::read_to_string(&paths.csr_path).unwrap();
    assert!(csr.contains("CERTIFICATE REQUEST"));

    let cert = fs::read_to_string(&paths.cert_path).unwrap();
    assert!(cert.contains("BEGIN CERTIFICATE"));
}

#[test]
#[serial]
fn rerun_overwrites_all_artifacts() {
    if !openssl_available() {
        eprintln!("skipping: openssl not on PATH");
        return;
    }

    let dir = TempDir::new().unwrap();
    let provisioner = Provisioner::new(dir.path());
    let config = test_config();

    let paths = provisioner.provision(&config).unwrap();
    let first_key = fs::read(&paths.key_path).unwrap();
    let first_csr = fs::read(&paths.csr_path).unwrap();

    let paths = provisioner.provision(&config).unwrap();
    let second_key = fs::read(&paths.key_path).unwrap();
    let second_csr = fs::read(&paths.csr_path).unwrap();

    // Key regeneration means new material every run, and the CSR must be
    // rebuilt from the new key rather than left stale.
    assert_ne!(first_key, second_key);
    assert_ne!(first_csr, second_csr);
}

#[test]
#[serial]
fn provisioning_run_checks_toolkit_then_provisions() {
    if !openssl_available() {
        eprintln!("skipping: openssl not on PATH");
        return;
    }

    let dir = TempDir::new().unwrap();
    let run = ProvisioningRun::new(Config::default(), dir.path());

    let paths = run.start().unwrap();
    assert!(paths.key_path.exists());
    assert!(paths.csr_path.exists());
    assert!(paths.cert_path.exists());
}

#[test]
fn config_loads_from_json_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("certmint.json");
    fs::write(
        &config_path,
        r#"{
            "provision": {
                "key_path": "out/server.key",
                "csr_path": "out/server.csr",
                "cert_path": "out/server.crt",
                "subject": "/CN=example.com",
                "days": 30
            }
        }"#,
    )
    .unwrap();

    let config = Config::from_json_file(&config_path).unwrap();
    assert_eq!(config.provision.key_path, "out/server.key");
    assert_eq!(config.provision.subject, "/CN=example.com");
    assert_eq!(config.provision.days, 30);
    // Logging section is optional and falls back to defaults
    assert_eq!(config.logging.console_level, "info");
}

#[test]
fn malformed_config_file_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("certmint.json");
    fs::write(&config_path, "{ not json").unwrap();

    assert!(matches!(
        Config::from_json_file(&config_path),
        Err(ProvisionError::Serialization(_))
    ));
}

#[test]
fn missing_key_fails_before_any_invocation() {
    for key in ["key_path", "csr_path", "cert_path"] {
        let mut map = full_map();
        map.remove(key);

        match ProvisionConfig::from_map(&map) {
            Err(ProvisionError::MissingConfig { key: missing }) => assert_eq!(missing, key),
            other => panic!("expected MissingConfig for {}, got {:?}", key, other),
        }
    }
}

#[test]
fn missing_tool_yields_spawn_error_on_first_step() {
    let dir = TempDir::new().unwrap();
    let provisioner = Provisioner::new(dir.path()).with_tool("certmint-no-such-tool");

    let err = provisioner.provision(&test_config()).unwrap_err();
    assert_eq!(err.step(), Some(ProvisionStep::GenerateKey));
    assert!(matches!(err, ProvisionError::Spawn { .. }));

    // Nothing should have been written
    assert!(!dir.path().join("certs/key.pem").exists());
}

#[cfg(unix)]
#[test]
fn unwritable_directory_is_an_error_not_a_panic() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let base = dir.path().join("locked");
    fs::create_dir(&base).unwrap();
    fs::set_permissions(&base, fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores mode bits; probe before asserting on them
    if fs::write(base.join(".probe"), b"x").is_ok() {
        eprintln!("skipping: permissions not enforced (running as root?)");
        fs::set_permissions(&base, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let provisioner = Provisioner::new(&base);
    let err = provisioner.provision(&test_config()).unwrap_err();
    assert!(matches!(err, ProvisionError::Filesystem { .. }));

    // Restore permissions so the tempdir can be removed
    fs::set_permissions(&base, fs::Permissions::from_mode(0o755)).unwrap();
}
