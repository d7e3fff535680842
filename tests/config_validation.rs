//! Configuration loading from disk
//!
//! Each of the three load phases (read, parse, validate) fails with its own
//! error carrying the file path, so an operator can tell a missing file from
//! a typo from a bad value.

use palingua::config::Config;
use palingua::error::AppError;
use std::io::Write;
use tempfile::NamedTempFile;

const VALID_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 8080
request_timeout_seconds = 45

[credentials]
env = ["GEMINI_API_KEY", "GEMINI_API_KEY_BACKUP"]
strategy = "round_robin"

[models]
base_url = "https://generativelanguage.googleapis.com/v1beta"
preference = ["gemini-1.5-flash", "gemini-pro"]
retry_on_unavailable = true

[prompt]
template = "You are a Pali scholar. Translate: {passage}"

[cache]
enabled = true

[observability]
log_level = "debug"
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_valid_file() {
    let file = write_config(VALID_CONFIG);

    let config = Config::from_file(file.path()).expect("valid file loads");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.request_timeout_seconds, 45);
    assert_eq!(
        config.models.preference(),
        &["gemini-1.5-flash".to_string(), "gemini-pro".to_string()]
    );
    assert!(config.models.retry_on_unavailable());
    assert_eq!(config.observability.log_level, "debug");
}

#[test]
fn missing_file_reports_path() {
    let err = Config::from_file("/nonexistent/palingua.toml").expect_err("missing file fails");
    match err {
        AppError::ConfigFileRead { path, .. } => {
            assert!(path.contains("/nonexistent/palingua.toml"));
        }
        other => panic!("expected ConfigFileRead, got {:?}", other),
    }
}

#[test]
fn malformed_toml_reports_parse_error() {
    let file = write_config("[server\nhost = ");

    let err = Config::from_file(file.path()).expect_err("malformed TOML fails");
    assert!(matches!(err, AppError::ConfigParseFailed { .. }));
}

#[test]
fn well_formed_but_invalid_reports_validation_error() {
    let file = write_config(
        r#"
[server]
host = "127.0.0.1"
port = 3000

[models]
preference = []
"#,
    );

    let err = Config::from_file(file.path()).expect_err("empty preference fails");
    match err {
        AppError::ConfigValidationFailed { reason, .. } => {
            assert!(reason.contains("preference"));
        }
        other => panic!("expected ConfigValidationFailed, got {:?}", other),
    }
}

#[test]
fn retry_on_unavailable_defaults_off() {
    let file = write_config(
        r#"
[server]
host = "127.0.0.1"
port = 3000

[models]
preference = ["gemini-1.5-flash"]
"#,
    );

    let config = Config::from_file(file.path()).expect("minimal file loads");
    assert!(!config.models.retry_on_unavailable());
    assert!(config.cache.enabled);
}
