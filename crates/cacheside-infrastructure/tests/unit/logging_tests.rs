//! Logging setup tests

use cacheside_domain::error::Error;
use cacheside_infrastructure::logging::{LoggingConfig, init_logging, parse_log_level};
use tracing::Level;

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);
}

#[test]
fn test_parse_log_level_rejects_unknown() {
    let err = parse_log_level("loud").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_init_logging_rejects_bad_level_before_installing() {
    let config = LoggingConfig {
        level: "loud".to_string(),
        ..LoggingConfig::default()
    };
    assert!(init_logging(&config).is_err());
}

#[test]
fn test_second_init_fails() {
    let config = LoggingConfig::default();
    let _ = init_logging(&config);

    let err = init_logging(&config).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
