//! Tests for the donation status state machine and model helpers.

use rust_decimal_macros::dec;

use crate::donations::{to_minor_units, DonationError, DonationStatus, DonationType};

#[test]
fn test_pending_to_completed_is_allowed() {
    let next = DonationStatus::Pending
        .transition(DonationStatus::Completed)
        .unwrap();
    assert_eq!(next, DonationStatus::Completed);
}

#[test]
fn test_administrative_transitions_are_allowed() {
    assert!(DonationStatus::Pending
        .transition(DonationStatus::Failed)
        .is_ok());
    assert!(DonationStatus::Completed
        .transition(DonationStatus::Refunded)
        .is_ok());
}

#[test]
fn test_completed_to_completed_is_rejected() {
    let err = DonationStatus::Completed
        .transition(DonationStatus::Completed)
        .unwrap_err();
    assert!(matches!(
        err,
        DonationError::InvalidTransition {
            from: DonationStatus::Completed,
            to: DonationStatus::Completed,
        }
    ));
}

#[test]
fn test_terminal_states_cannot_complete() {
    for from in [DonationStatus::Failed, DonationStatus::Refunded] {
        assert!(from.transition(DonationStatus::Completed).is_err());
        assert!(from.transition(DonationStatus::Pending).is_err());
    }
}

#[test]
fn test_status_round_trips_through_str() {
    for status in [
        DonationStatus::Pending,
        DonationStatus::Completed,
        DonationStatus::Failed,
        DonationStatus::Refunded,
    ] {
        assert_eq!(DonationStatus::from_str(status.as_str()).unwrap(), status);
    }
    assert!(DonationStatus::from_str("cancelled").is_err());
}

#[test]
fn test_donation_type_wire_names() {
    assert_eq!(
        serde_json::to_string(&DonationType::OneTime).unwrap(),
        "\"one-time\""
    );
    assert_eq!(
        serde_json::from_str::<DonationType>("\"quarterly\"").unwrap(),
        DonationType::Quarterly
    );
    assert!(serde_json::from_str::<DonationType>("\"weekly\"").is_err());
}

#[test]
fn test_only_one_time_is_non_recurring() {
    assert!(!DonationType::OneTime.is_recurring());
    assert!(DonationType::Monthly.is_recurring());
    assert!(DonationType::Quarterly.is_recurring());
    assert!(DonationType::Yearly.is_recurring());
}

#[test]
fn test_minor_unit_conversion() {
    assert_eq!(to_minor_units(dec!(1000)).unwrap(), 100_000);
    assert_eq!(to_minor_units(dec!(1)).unwrap(), 100);
    assert_eq!(to_minor_units(dec!(250.50)).unwrap(), 25_050);
}
