//! HMAC-SHA256 webhook signatures

use std::fmt;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::header::{HeaderValue, SignatureHeader};
use super::DEFAULT_TOLERANCE_SECONDS;
use crate::config::WebhookConfig;
use crate::error::{Error, Result, SignatureErrorReason, SignatureVerificationError};

type HmacSha256 = Hmac<Sha256>;

/// Why a well-formed signature was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum InvalidReason {
    /// The recomputed digest differs from `v1`
    DigestMismatch,
    /// The digest matches but the event is older than the tolerance
    Stale { age_seconds: i64, tolerance_seconds: u64 },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DigestMismatch => write!(f, "signature digest mismatch"),
            Self::Stale { age_seconds, tolerance_seconds } => write!(
                f,
                "signature timestamp is out of range ({}s old, tolerance {}s)",
                age_seconds, tolerance_seconds
            ),
        }
    }
}

/// Outcome of verifying a parseable signature header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(InvalidReason),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Compute the hex-encoded HMAC-SHA256 of `"<timestamp>.<payload>"`
pub fn compute_signature(payload: impl AsRef<[u8]>, timestamp: i64, secret: &str) -> Result<String> {
    let mut mac = <HmacSha256 as KeyInit>::new_from_slice(secret.as_bytes())
        .map_err(|_| Error::Signing("HMAC error".to_string()))?;

    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_ref());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build a `Blockfrost-Signature` header value for `payload` signed at `timestamp`
pub fn generate_signature_header(payload: impl AsRef<[u8]>, timestamp: i64, secret: &str) -> Result<String> {
    let signature = compute_signature(payload, timestamp, secret)?;
    Ok(SignatureHeader::new(timestamp, signature).to_string())
}

/// Verify a webhook signature against the wall clock.
///
/// Returns `Ok(false)` for a digest mismatch or a stale event and
/// `Err(Error::SignatureVerification(_))` when the header itself is unusable.
pub fn verify_webhook_signature<'h>(
    payload: impl AsRef<[u8]>,
    signature_header: impl Into<HeaderValue<'h>>,
    secret: &str,
    tolerance_seconds: u64,
) -> Result<bool> {
    let verdict = SignatureVerifier::new(tolerance_seconds).verify(payload, signature_header, secret)?;
    Ok(verdict.is_valid())
}

/// Webhook signature verifier with a freshness window and an injectable clock
#[derive(Debug, Clone)]
pub struct SignatureVerifier<C = SystemClock> {
    tolerance_seconds: u64,
    clock: C,
}

impl SignatureVerifier<SystemClock> {
    /// Create a verifier backed by the system clock
    pub fn new(tolerance_seconds: u64) -> Self {
        Self::with_clock(tolerance_seconds, SystemClock)
    }

    pub fn from_config(config: &WebhookConfig) -> Self {
        Self::new(config.tolerance_seconds)
    }
}

impl Default for SignatureVerifier<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_SECONDS)
    }
}

impl<C: Clock> SignatureVerifier<C> {
    pub fn with_clock(tolerance_seconds: u64, clock: C) -> Self {
        Self { tolerance_seconds, clock }
    }

    pub fn tolerance_seconds(&self) -> u64 {
        self.tolerance_seconds
    }

    /// Verify at the time reported by the verifier's clock
    pub fn verify<'h>(
        &self,
        payload: impl AsRef<[u8]>,
        signature_header: impl Into<HeaderValue<'h>>,
        secret: &str,
    ) -> Result<Verdict> {
        self.verify_at(payload, signature_header, secret, self.clock.now())
    }

    /// Verify as if the current Unix time were `now`
    pub fn verify_at<'h>(
        &self,
        payload: impl AsRef<[u8]>,
        signature_header: impl Into<HeaderValue<'h>>,
        secret: &str,
        now: i64,
    ) -> Result<Verdict> {
        let payload = payload.as_ref();
        let raw_header = signature_header.into().single()?;

        let header_text = std::str::from_utf8(raw_header).map_err(|_| {
            SignatureVerificationError::with_detail(
                SignatureErrorReason::MalformedHeader,
                &String::from_utf8_lossy(raw_header),
                payload,
            )
        })?;

        let header: SignatureHeader = header_text.parse().map_err(|e: SignatureVerificationError| {
            SignatureVerificationError::with_detail(e.reason, header_text, payload)
        })?;

        let expected = compute_signature(payload, header.timestamp, secret)?;
        let digest_matches: bool = expected.as_bytes().ct_eq(header.signature.as_bytes()).into();
        if !digest_matches {
            debug!(timestamp = header.timestamp, "Invalid signature, digest mismatch");
            return Ok(Verdict::Invalid(InvalidReason::DigestMismatch));
        }

        let age_seconds = now.saturating_sub(header.timestamp);
        if age_seconds > 0 && age_seconds as u64 > self.tolerance_seconds {
            debug!(
                age_seconds,
                tolerance_seconds = self.tolerance_seconds,
                "Invalid signature, Blockfrost signature timestamp is out of range"
            );
            return Ok(Verdict::Invalid(InvalidReason::Stale {
                age_seconds,
                tolerance_seconds: self.tolerance_seconds,
            }));
        }

        Ok(Verdict::Valid)
    }
}
