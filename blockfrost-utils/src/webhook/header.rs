//! `Blockfrost-Signature` header parsing
//!
//! Parsing happens in two stages: [`tokenize`] turns the raw header into an
//! ordered list of key/value pairs, then [`SignatureHeader::from_pairs`] pulls
//! out the typed `t` and `v1` fields.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::{SignatureErrorReason, SignatureVerificationError};

const TIMESTAMP_KEY: &str = "t";
const SIGNATURE_V1_KEY: &str = "v1";

/// A signature header as received from the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue<'a> {
    /// The header appeared once
    Single(&'a [u8]),
    /// The header appeared several times; never acceptable
    Multiple(Vec<&'a [u8]>),
}

impl<'a> HeaderValue<'a> {
    /// Get the raw bytes of a single-valued header
    pub fn single(&self) -> Result<&'a [u8], SignatureVerificationError> {
        match self {
            Self::Single(bytes) => Ok(bytes),
            Self::Multiple(_) => Err(SignatureVerificationError::new(
                SignatureErrorReason::MultipleHeaderValues,
            )),
        }
    }
}

impl<'a> From<&'a str> for HeaderValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Single(value.as_bytes())
    }
}

impl<'a> From<&'a String> for HeaderValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Single(value.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for HeaderValue<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Single(value)
    }
}

impl<'a> From<&'a [&'a str]> for HeaderValue<'a> {
    fn from(values: &'a [&'a str]) -> Self {
        Self::Multiple(values.iter().map(|v| v.as_bytes()).collect())
    }
}

impl<'a> From<Vec<&'a str>> for HeaderValue<'a> {
    fn from(values: Vec<&'a str>) -> Self {
        Self::Multiple(values.into_iter().map(str::as_bytes).collect())
    }
}

impl<'a> From<&'a [String]> for HeaderValue<'a> {
    fn from(values: &'a [String]) -> Self {
        Self::Multiple(values.iter().map(|v| v.as_bytes()).collect())
    }
}

impl<'a> From<&'a Vec<String>> for HeaderValue<'a> {
    fn from(values: &'a Vec<String>) -> Self {
        Self::from(values.as_slice())
    }
}

/// Split a header into `(key, value)` pairs.
///
/// Tokens are separated by `,` and split on their first `=`. A token with no
/// `=` yields an empty value. No whitespace trimming is done.
pub fn tokenize(header: &str) -> Vec<(&str, &str)> {
    header
        .split(',')
        .map(|token| token.split_once('=').unwrap_or((token, "")))
        .collect()
}

/// The typed content of a signature header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp (seconds) at which the event was signed
    pub timestamp: i64,
    /// Expected hex-encoded HMAC-SHA256 digest
    pub signature: String,
}

impl SignatureHeader {
    pub fn new(timestamp: i64, signature: impl Into<String>) -> Self {
        Self {
            timestamp,
            signature: signature.into(),
        }
    }

    /// Extract `t` and `v1` from tokenized pairs; the last occurrence of a key wins.
    pub fn from_pairs<'h, I>(pairs: I) -> Result<Self, SignatureVerificationError>
    where
        I: IntoIterator<Item = (&'h str, &'h str)>,
    {
        let mut timestamp = None;
        let mut signature = None;

        for (key, value) in pairs {
            match key {
                TIMESTAMP_KEY => timestamp = Some(value),
                SIGNATURE_V1_KEY => signature = Some(value),
                other => warn!(
                    key = other,
                    "Cannot parse part of the signature header, key is not supported by this version of the SDK"
                ),
            }
        }

        let timestamp = timestamp
            .and_then(|t| t.parse::<i64>().ok())
            .filter(|t| *t > 0);
        let signature = signature.filter(|s| !s.is_empty());

        match (timestamp, signature) {
            (Some(timestamp), Some(signature)) => Ok(Self::new(timestamp, signature)),
            _ => Err(SignatureVerificationError::new(
                SignatureErrorReason::MalformedHeader,
            )),
        }
    }
}

impl FromStr for SignatureHeader {
    type Err = SignatureVerificationError;

    fn from_str(header: &str) -> Result<Self, Self::Err> {
        Self::from_pairs(tokenize(header))
    }
}

impl fmt::Display for SignatureHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={},{}={}", TIMESTAMP_KEY, self.timestamp, SIGNATURE_V1_KEY, self.signature)
    }
}
