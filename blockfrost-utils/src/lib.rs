//! Blockfrost SDK helpers
//!
//! This library provides the non-HTTP pieces of a Blockfrost API client:
//! deriving Cardano addresses from an account extended public key, and
//! verifying the signatures Blockfrost attaches to webhook deliveries.

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod webhook;

// Re-export commonly used types for convenience
pub use error::{Error, Result, SignatureErrorReason, SignatureVerificationError};
pub use config::WebhookConfig;
pub use account::{derive_address, DerivedAddress, NetworkInfo};
pub use webhook::{verify_webhook_signature, SignatureVerifier, Verdict};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
