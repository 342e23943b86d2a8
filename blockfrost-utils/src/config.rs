//! Webhook receiver configuration

use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::webhook::DEFAULT_TOLERANCE_SECONDS;

/// Environment variable holding the webhook auth token
pub const WEBHOOK_SECRET_ENV: &str = "BLOCKFROST_WEBHOOK_SECRET";
/// Environment variable overriding the signature tolerance, in seconds
pub const WEBHOOK_TOLERANCE_ENV: &str = "BLOCKFROST_WEBHOOK_TOLERANCE_SECS";

fn default_tolerance_seconds() -> u64 {
    DEFAULT_TOLERANCE_SECONDS
}

/// Settings for verifying webhook deliveries
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookConfig {
    /// Auth token shown in the webhook settings of the Blockfrost dashboard
    pub secret: String,
    /// Maximum accepted age of a signed event
    #[serde(default = "default_tolerance_seconds")]
    pub tolerance_seconds: u64,
}

impl WebhookConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_seconds: DEFAULT_TOLERANCE_SECONDS,
        }
    }

    pub fn with_tolerance(mut self, tolerance_seconds: u64) -> Self {
        self.tolerance_seconds = tolerance_seconds;
        self
    }

    /// Load from `BLOCKFROST_WEBHOOK_SECRET` and `BLOCKFROST_WEBHOOK_TOLERANCE_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(WEBHOOK_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config(format!("{} is not set", WEBHOOK_SECRET_ENV)))?;

        let tolerance_seconds = match lookup(WEBHOOK_TOLERANCE_ENV) {
            Some(value) => value.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("Invalid {} value {:?}: {}", WEBHOOK_TOLERANCE_ENV, value, e))
            })?,
            None => DEFAULT_TOLERANCE_SECONDS,
        };

        Ok(Self { secret, tolerance_seconds })
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &"<redacted>")
            .field("tolerance_seconds", &self.tolerance_seconds)
            .finish()
    }
}
