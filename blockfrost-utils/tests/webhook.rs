//! Tests for webhook signature verification

use blockfrost_utils::webhook::*;
use blockfrost_utils::{Error, SignatureErrorReason, WebhookConfig};
use proptest::prelude::*;

const SECRET: &str = "whsec_test";
const PAYLOAD: &str = r#"{"type":"block"}"#;
const TIMESTAMP: i64 = 1_000_000_000;
// hex(HMAC_SHA256("whsec_test", "1000000000.{\"type\":\"block\"}"))
const EXPECTED_V1: &str = "b24800848a3fa49ffee23b24fe55b951d9791a4435918eb626577fc29de55002";

fn verifier_at(now: i64) -> SignatureVerifier<FixedClock> {
    SignatureVerifier::with_clock(DEFAULT_TOLERANCE_SECONDS, FixedClock(now))
}

fn assert_signature_error(result: blockfrost_utils::Result<Verdict>, expected: SignatureErrorReason) {
    match result {
        Err(Error::SignatureVerification(e)) => assert_eq!(e.reason, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[test]
fn test_end_to_end_example() {
    let header = generate_signature_header(PAYLOAD, TIMESTAMP, SECRET).unwrap();
    assert_eq!(header, format!("t={},v1={}", TIMESTAMP, EXPECTED_V1));

    assert_eq!(verifier_at(TIMESTAMP).verify(PAYLOAD, &header, SECRET).unwrap(), Verdict::Valid);
    assert_eq!(
        verifier_at(TIMESTAMP + 700).verify(PAYLOAD, &header, SECRET).unwrap(),
        Verdict::Invalid(InvalidReason::Stale { age_seconds: 700, tolerance_seconds: 600 })
    );
}

#[test]
fn test_tolerance_boundary() {
    let header = generate_signature_header(PAYLOAD, TIMESTAMP, SECRET).unwrap();
    let verifier = SignatureVerifier::with_clock(30, FixedClock(0));

    assert!(verifier.verify_at(PAYLOAD, &header, SECRET, TIMESTAMP + 30).unwrap().is_valid());
    assert!(!verifier.verify_at(PAYLOAD, &header, SECRET, TIMESTAMP + 31).unwrap().is_valid());
}

#[test]
fn test_tampered_payload() {
    let header = generate_signature_header(PAYLOAD, TIMESTAMP, SECRET).unwrap();
    let tampered = r#"{"type":"blocK"}"#;

    assert_eq!(
        verifier_at(TIMESTAMP).verify(tampered, &header, SECRET).unwrap(),
        Verdict::Invalid(InvalidReason::DigestMismatch)
    );
}

#[test]
fn test_reserialized_payload_does_not_verify() {
    let header = generate_signature_header(PAYLOAD, TIMESTAMP, SECRET).unwrap();
    let reserialized = r#"{ "type": "block" }"#;

    assert!(!verifier_at(TIMESTAMP).verify(reserialized, &header, SECRET).unwrap().is_valid());
}

#[test]
fn test_missing_header_fields() {
    assert_signature_error(
        verifier_at(TIMESTAMP).verify(PAYLOAD, "t=1648550558", SECRET),
        SignatureErrorReason::MalformedHeader,
    );
    assert_signature_error(
        verifier_at(TIMESTAMP).verify(PAYLOAD, format!("v1={}", EXPECTED_V1).as_str(), SECRET),
        SignatureErrorReason::MalformedHeader,
    );
}

#[test]
fn test_multiple_header_values() {
    let header = generate_signature_header(PAYLOAD, TIMESTAMP, SECRET).unwrap();
    let values = vec![header.clone()];

    assert_signature_error(
        verifier_at(TIMESTAMP).verify(PAYLOAD, &values, SECRET),
        SignatureErrorReason::MultipleHeaderValues,
    );
    assert_signature_error(
        verifier_at(TIMESTAMP).verify(PAYLOAD, vec![header.as_str(), header.as_str()], SECRET),
        SignatureErrorReason::MultipleHeaderValues,
    );
}

#[test]
fn test_forward_compatible_header() {
    let header = format!("t={},v2=deadbeef,v1={}", TIMESTAMP, EXPECTED_V1);
    assert!(verifier_at(TIMESTAMP).verify(PAYLOAD, &header, SECRET).unwrap().is_valid());
}

#[test]
fn test_wall_clock_helper() {
    let header = generate_signature_header(PAYLOAD, TIMESTAMP, SECRET).unwrap();

    // signed in 2001, far outside any tolerance
    assert!(!verify_webhook_signature(PAYLOAD, &header, SECRET, DEFAULT_TOLERANCE_SECONDS).unwrap());

    let now = SystemClock.now();
    let fresh = generate_signature_header(PAYLOAD, now, SECRET).unwrap();
    assert!(verify_webhook_signature(PAYLOAD, &fresh, SECRET, DEFAULT_TOLERANCE_SECONDS).unwrap());

    let err = verify_webhook_signature(PAYLOAD, "garbage", SECRET, DEFAULT_TOLERANCE_SECONDS).unwrap_err();
    assert!(matches!(err, Error::SignatureVerification(_)));
}

#[test]
fn test_verifier_from_config() {
    let config = WebhookConfig::new(SECRET).with_tolerance(5);
    let verifier = SignatureVerifier::from_config(&config);
    assert_eq!(verifier.tolerance_seconds(), 5);

    let now = SystemClock.now();
    let header = generate_signature_header(PAYLOAD, now - 60, &config.secret).unwrap();
    assert!(!verifier.verify(PAYLOAD, &header, &config.secret).unwrap().is_valid());
}

#[test]
fn test_construct_transaction_event() {
    let body = r#"{"id":"c9e6a9b8-3ec5-4b4f-8f5a-1b5d1c2e3f40","webhook_id":"cf68eb9c-635f-415e-a5a8-6233638f28d7","created":1650013853,"api_version":1,"type":"transaction","payload":[{"tx":{"hash":"1a0570af966fb355a7160e4f82d5a80b8681b7955f5d44bec0dd628a4f1ab5ab"}}]}"#;
    let header = generate_signature_header(body, 1650013853, SECRET).unwrap();

    let event = SignatureVerifier::with_clock(600, FixedClock(1650013860))
        .construct_event(body, &header, SECRET)
        .unwrap();
    assert_eq!(event.event_type, EventType::Transaction);
    assert_eq!(event.payload.as_array().map(Vec::len), Some(1));
    assert_eq!(
        event.payload[0]["tx"]["hash"],
        "1a0570af966fb355a7160e4f82d5a80b8681b7955f5d44bec0dd628a4f1ab5ab"
    );
}

proptest! {
    #[test]
    fn prop_signed_payload_verifies(
        timestamp in 1i64..4_000_000_000,
        payload in proptest::collection::vec(any::<u8>(), 0..512),
        secret in "[a-zA-Z0-9_]{1,64}",
        tolerance in 0u64..100_000,
    ) {
        let header = generate_signature_header(&payload, timestamp, &secret).unwrap();
        let verifier = SignatureVerifier::with_clock(tolerance, FixedClock(timestamp));
        prop_assert_eq!(verifier.verify(&payload, &header, &secret).unwrap(), Verdict::Valid);
    }

    #[test]
    fn prop_flipped_byte_fails(
        timestamp in 1i64..4_000_000_000,
        payload in proptest::collection::vec(any::<u8>(), 1..512),
        index in any::<prop::sample::Index>(),
    ) {
        let header = generate_signature_header(&payload, timestamp, SECRET).unwrap();
        let mut tampered = payload.clone();
        let i = index.index(tampered.len());
        tampered[i] ^= 0x01;

        let verifier = SignatureVerifier::with_clock(DEFAULT_TOLERANCE_SECONDS, FixedClock(timestamp));
        prop_assert_eq!(
            verifier.verify(&tampered, &header, SECRET).unwrap(),
            Verdict::Invalid(InvalidReason::DigestMismatch)
        );
    }
}
