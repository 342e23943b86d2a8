//! Webhook signature verification
//!
//! Blockfrost signs every webhook delivery with HMAC-SHA256 over
//! `"<timestamp>.<payload>"` and sends the result in the `Blockfrost-Signature`
//! header as `t=<timestamp>,v1=<hex digest>`. This module parses that header,
//! recomputes the digest and enforces a freshness window against replays.

pub mod clock;
pub mod event;
pub mod header;
pub mod signature;

pub use clock::*;
pub use event::*;
pub use header::*;
pub use signature::*;

/// Name of the HTTP header carrying the signature
pub const SIGNATURE_HEADER_NAME: &str = "Blockfrost-Signature";

/// Maximum accepted age of a signed event, in seconds
pub const DEFAULT_TOLERANCE_SECONDS: u64 = 600;
