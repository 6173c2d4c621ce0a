use markstack_client::{ClientConfig, ClientError, ENV_ENDPOINT, ENV_TIMEOUT_MS, ENV_TOKEN};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

#[test]
fn defaults() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.endpoint, "http://localhost:4000/graphql");
    assert_eq!(cfg.timeout(), Duration::from_secs(30));
    assert!(cfg.user_agent.starts_with("markstack/"));
    assert!(cfg.auth_token.is_none());
    cfg.validate().unwrap();
}

#[test]
fn debug_redacts_token() {
    let cfg = ClientConfig {
        auth_token: Some("hunter2".into()),
        ..Default::default()
    };
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn from_file_fills_missing_keys_with_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"endpoint": "https://marks.example.com/graphql", "timeout_ms": 500}}"#).unwrap();
    let cfg = ClientConfig::from_file(file.path()).unwrap();
    assert_eq!(cfg.endpoint, "https://marks.example.com/graphql");
    assert_eq!(cfg.timeout_ms, 500);
    assert_eq!(cfg.user_agent, ClientConfig::default().user_agent);
}

#[test]
fn from_file_rejects_bad_endpoint() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"endpoint": "ftp://nope"}}"#).unwrap();
    let err = ClientConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

#[test]
fn from_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ClientConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ClientError::Io(_)));
}

#[test]
fn variables_override_fields() {
    let vars: HashMap<&str, &str> = [
        (ENV_ENDPOINT, "https://api.example.com/graphql"),
        (ENV_TIMEOUT_MS, " 1500 "),
        (ENV_TOKEN, "abc"),
    ]
    .into_iter()
    .collect();
    let cfg = ClientConfig::default()
        .apply_vars(|name| vars.get(name).map(|v| v.to_string()))
        .unwrap();
    assert_eq!(cfg.endpoint, "https://api.example.com/graphql");
    assert_eq!(cfg.timeout_ms, 1500);
    assert_eq!(cfg.auth_token.as_deref(), Some("abc"));
}

#[test]
fn empty_token_variable_clears_token() {
    let cfg = ClientConfig {
        auth_token: Some("old".into()),
        ..Default::default()
    }
    .apply_vars(|name| (name == ENV_TOKEN).then(String::new))
    .unwrap();
    assert!(cfg.auth_token.is_none());
}

#[test]
fn non_numeric_timeout_is_rejected() {
    let err = ClientConfig::default()
        .apply_vars(|name| (name == ENV_TIMEOUT_MS).then(|| "soon".to_string()))
        .unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

#[test]
fn zero_timeout_is_rejected() {
    let cfg = ClientConfig {
        timeout_ms: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}
