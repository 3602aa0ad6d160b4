//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use manykeys_foundation::{Error, ErrorContext, ErrorKind, KeyType, LevelKind};

#[test]
fn invalid_key_display() {
    let err = Error::invalid_key(2, KeyType::String, LevelKind::Weak);
    assert!(matches!(err.kind, ErrorKind::InvalidKey { position: 2, .. }));
    let msg = format!("{err}");
    assert!(msg.contains("string"));
    assert!(msg.contains("weak"));
}

#[test]
fn unknown_level_kind_display() {
    let err = Error::unknown_level_kind("list");
    assert!(matches!(err.kind, ErrorKind::UnknownLevelKind { .. }));
    assert!(format!("{err}").contains("list"));
}

#[test]
fn internal_display() {
    let err = Error::internal("broken");
    assert_eq!(format!("{err}"), "internal error: broken");
}

#[test]
fn context_attaches() {
    let err = Error::invalid_key(0, KeyType::Int, LevelKind::Weak)
        .with_context(ErrorContext::new().with_operation("construct").with_index(4));
    assert!(err.is_invalid_key());
    assert_eq!(err.context.unwrap().to_string(), "in construct at index 4");
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&Error::internal("x"));
}
