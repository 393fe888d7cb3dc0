//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tosca_export::config::load_config;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("TOSCA_EXPORT_LOG_LEVEL");
    std::env::remove_var("TOSCA_EXPORT_DATA_DIR");
    std::env::remove_var("TOSCA_EXPORT_BLOBSTORE_ROOT");
    std::env::remove_var("TOSCA_EXPORT_OUTPUT_DIR");
    std::env::remove_var("TEST_TOSCA_BLOB_ROOT");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[data]
collections_dir = "/srv/tosca/collections"

[blobstore]
root = "/srv/tosca/blobs"

[renderer]
chrome_path = "/usr/bin/chromium"
render_timeout_secs = 90

[export]
output_dir = "/srv/tosca/export"
staging_dir = "/srv/tosca/staging"
retrieval_concurrency = 8
retrieval_timeout_secs = 30

[logging]
local_enabled = true
local_path = "/var/log/tosca"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.data.collections_dir, "/srv/tosca/collections");
    assert_eq!(config.blobstore.root, "/srv/tosca/blobs");
    assert_eq!(config.renderer.chrome_path.as_deref(), Some("/usr/bin/chromium"));
    assert_eq!(config.renderer.render_timeout_secs, 90);
    assert_eq!(config.export.output_dir, "/srv/tosca/export");
    assert_eq!(config.export.staging_dir.as_deref(), Some("/srv/tosca/staging"));
    assert_eq!(config.export.retrieval_concurrency, 8);
    assert_eq!(config.export.retrieval_timeout_secs, 30);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.data.collections_dir, "data");
    assert_eq!(config.blobstore.root, "blobs");
    assert_eq!(config.export.output_dir, "export");
    assert!(config.export.staging_dir.is_none());
    assert_eq!(config.export.retrieval_concurrency, 4);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_TOSCA_BLOB_ROOT", "/mnt/blobs");

    let file = write_config("[blobstore]\nroot = \"${TEST_TOSCA_BLOB_ROOT}\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.blobstore.root, "/mnt/blobs");
    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[blobstore]\nroot = \"${TOSCA_TEST_UNSET_VARIABLE}\"\n");
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("TOSCA_TEST_UNSET_VARIABLE"));
}

#[test]
fn test_env_overrides_take_precedence() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TOSCA_EXPORT_LOG_LEVEL", "trace");
    std::env::set_var("TOSCA_EXPORT_OUTPUT_DIR", "/var/export");

    let file = write_config("[application]\nlog_level = \"warn\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.export.output_dir, "/var/export");
    cleanup_env_vars();
}

#[test]
fn test_missing_config_file_fails() {
    let err = load_config("/nonexistent/tosca-export.toml").unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_invalid_toml_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[export\noutput_dir = ");
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
fn test_validation_rejects_zero_concurrency() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[export]\nretrieval_concurrency = 0\n");
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("retrieval_concurrency"));
}

#[test]
fn test_validation_rejects_bad_log_level() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[application]\nlog_level = \"verbose\"\n");
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("Invalid log level"));
}
