//! Authenticated webhook events

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::header::HeaderValue;
use super::signature::{SignatureVerifier, Verdict};
use crate::error::{Error, Result};

/// Kind of event carried by a webhook delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Transaction,
    Block,
    Delegation,
    Epoch,
    /// A type this version of the SDK does not know about
    Other(String),
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "transaction" => Self::Transaction,
            "block" => Self::Block,
            "delegation" => Self::Delegation,
            "epoch" => Self::Epoch,
            _ => Self::Other(value),
        }
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Transaction => "transaction".to_string(),
            EventType::Block => "block".to_string(),
            EventType::Delegation => "delegation".to_string(),
            EventType::Epoch => "epoch".to_string(),
            EventType::Other(other) => other,
        }
    }
}

/// Envelope of a webhook delivery.
///
/// `payload` stays raw JSON; its shape depends on `event_type` (a list of
/// transactions or delegations, a block, or an epoch switch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    pub webhook_id: String,
    /// Unix timestamp of event creation
    pub created: i64,
    #[serde(default)]
    pub api_version: Option<u32>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: serde_json::Value,
}

impl<C: Clock> SignatureVerifier<C> {
    /// Verify the signature and only then deserialize the payload
    pub fn construct_event<'h>(
        &self,
        payload: impl AsRef<[u8]>,
        signature_header: impl Into<HeaderValue<'h>>,
        secret: &str,
    ) -> Result<WebhookEvent> {
        let payload = payload.as_ref();
        match self.verify(payload, signature_header, secret)? {
            Verdict::Valid => serde_json::from_slice(payload)
                .map_err(|e| Error::Serialization(format!("Invalid webhook event: {}", e))),
            Verdict::Invalid(reason) => Err(Error::InvalidSignature(reason)),
        }
    }
}

/// Verify a delivery against the wall clock and parse it into a [`WebhookEvent`]
pub fn construct_event<'h>(
    payload: impl AsRef<[u8]>,
    signature_header: impl Into<HeaderValue<'h>>,
    secret: &str,
    tolerance_seconds: u64,
) -> Result<WebhookEvent> {
    SignatureVerifier::new(tolerance_seconds).construct_event(payload, signature_header, secret)
}
