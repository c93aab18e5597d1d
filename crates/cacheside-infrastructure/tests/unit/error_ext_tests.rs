//! Error context extension tests

use std::io;

use cacheside_domain::error::Error;
use cacheside_infrastructure::error_ext::ErrorContext;

fn io_failure() -> Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
}

#[test]
fn test_context_wraps_as_infrastructure() {
    let err = io_failure().context("Failed to read file").unwrap_err();

    assert!(matches!(err, Error::Infrastructure { .. }));
    let message = err.to_string();
    assert!(message.contains("Failed to read file"));
    assert!(message.contains("no such file"));
}

#[test]
fn test_config_context_wraps_as_configuration() {
    let err = io_failure().config_context("bad config").unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
    assert!(std::error::Error::source(&err).is_some());
}
