//! Error types for the blockfrost-utils library

use serde::Serialize;
use thiserror::Error;

use crate::webhook::InvalidReason;

/// Custom error type for blockfrost-utils operations
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    SignatureVerification(#[from] SignatureVerificationError),

    #[error("Invalid signature: {0}")]
    InvalidSignature(InvalidReason),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Key decoding error: {0}")]
    KeyDecoding(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Address encoding error: {0}")]
    AddressEncoding(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for blockfrost-utils operations
pub type Result<T> = std::result::Result<T, Error>;

/// Machine-readable cause of a [`SignatureVerificationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureErrorReason {
    /// The header arrived as several values instead of one string
    MultipleHeaderValues,
    /// `t` or `v1` is missing or unusable
    MalformedHeader,
}

impl SignatureErrorReason {
    fn message(&self) -> &'static str {
        match self {
            Self::MultipleHeaderValues => "Unexpected: multiple values were passed as a signature header",
            Self::MalformedHeader => "Invalid signature header format",
        }
    }
}

/// What the verifier received, kept for operators chasing integration bugs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureErrorDetail {
    pub signature_header: String,
    pub webhook_payload: String,
}

/// The signature header could not be interpreted at all.
///
/// This is an integration error, distinct from a signature that parses but does
/// not match (see [`crate::webhook::Verdict`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .reason.message())]
pub struct SignatureVerificationError {
    pub reason: SignatureErrorReason,
    pub detail: Option<SignatureErrorDetail>,
}

impl SignatureVerificationError {
    pub fn new(reason: SignatureErrorReason) -> Self {
        Self { reason, detail: None }
    }

    pub fn with_detail(reason: SignatureErrorReason, signature_header: &str, webhook_payload: &[u8]) -> Self {
        Self {
            reason,
            detail: Some(SignatureErrorDetail {
                signature_header: signature_header.to_string(),
                webhook_payload: String::from_utf8_lossy(webhook_payload).into_owned(),
            }),
        }
    }
}
