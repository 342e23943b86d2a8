//! Cryptographic primitives and operations
//!
//! This module provides the hashing and BIP32-Ed25519 public key derivation
//! needed to turn an account-level extended public key into Cardano addresses.

pub mod hash;
pub mod keys;

pub use hash::*;
pub use keys::*;
