//! Key derivation and management
//!
//! Cardano wallets follow CIP-1852: `m/1852'/1815'/account'/role/index`. The
//! hardened part stays with the wallet; this module only walks the soft
//! `role/index` levels below an account public key.

mod derivation;

pub use derivation::*;

/// External (receiving) addresses
pub const ROLE_EXTERNAL: u32 = 0;
/// Internal (change) addresses
pub const ROLE_INTERNAL: u32 = 1;
/// Staking keys
pub const ROLE_STAKING: u32 = 2;
