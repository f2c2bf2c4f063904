use super::*;

#[test]
fn test_default_config_is_valid() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_zero_timeout_rejected() {
    let mut config = Config::default();
    config.engine.timeouts.verify_ms = 0;
    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert_eq!(result.errors[0].path, "engine.timeouts.verify_ms");
}

#[test]
fn test_zero_run_timeout_rejected() {
    let mut config = Config::default();
    config.engine.run_timeout_secs = Some(0);
    assert!(!ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_long_backoff_warns() {
    let mut config = Config::default();
    config.engine.backoff_ms = 120_000;
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].path, "engine.backoff_ms");
}

#[test]
fn test_zero_candidate_cap_rejected() {
    let mut config = Config::default();
    config.resolver.max_oracle_candidates = 0;
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "resolver.max_oracle_candidates"));
}

#[test]
fn test_zero_port_rejected() {
    let mut config = Config::default();
    config.browser.debug_port = 0;
    assert!(!ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_disabled_oracle_not_checked() {
    let mut config = Config::default();
    config.oracle.model = String::new();
    config.oracle.api_url = "ftp://nowhere".to_string();
    assert!(ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_enabled_oracle_requires_model_and_http_url() {
    let mut config = Config::default();
    config.oracle.enabled = true;
    config.oracle.model = " ".to_string();
    config.oracle.api_url = "localhost:8000".to_string();
    config.oracle.api_key = Some("sk-test".to_string());
    let result = ConfigValidator::validate(&config);
    assert_eq!(result.errors.len(), 2);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_enabled_oracle_without_key_warns() {
    let mut config = Config::default();
    config.oracle.enabled = true;
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "oracle.api_key"));
}

#[test]
fn test_into_result_reports_first_error() {
    let mut config = Config::default();
    config.engine.timeouts.navigate_ms = 0;
    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    match err {
        ConfigError::InvalidValue { field, .. } => assert_eq!(field, "engine.timeouts.navigate_ms"),
        other => panic!("unexpected error: {other:?}"),
    }
}
