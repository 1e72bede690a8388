//! Tests for donor profile validation and email normalization.

use crate::donors::{normalize_email, DonorProfile};
use crate::errors::Error;

fn profile(email: &str, name: &str) -> DonorProfile {
    DonorProfile {
        email: email.to_string(),
        name: name.to_string(),
        phone: None,
        address: None,
        pan_number: None,
    }
}

#[test]
fn test_normalize_email_lowercases_and_trims() {
    assert_eq!(normalize_email("  Asha@Example.ORG "), "asha@example.org");
    assert_eq!(normalize_email("plain@example.org"), "plain@example.org");
}

#[test]
fn test_validate_normalizes_email_in_place() {
    let mut p = profile(" Ravi@Example.COM ", "Ravi");
    p.validate().unwrap();
    assert_eq!(p.email, "ravi@example.com");
}

#[test]
fn test_validate_rejects_missing_email() {
    let mut p = profile("   ", "Ravi");
    let err = p.validate().unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_validate_rejects_malformed_email() {
    for bad in ["not-an-email", "a@b", "a b@example.org", "@example.org"] {
        let mut p = profile(bad, "Ravi");
        assert!(p.validate().is_err(), "expected rejection for {bad}");
    }
}

#[test]
fn test_validate_rejects_blank_name() {
    let mut p = profile("ravi@example.org", "  ");
    let err = p.validate().unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
