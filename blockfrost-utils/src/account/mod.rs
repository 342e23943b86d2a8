//! Account address derivation
//!
//! This module turns an account-level extended public key into Shelley base
//! and reward addresses or legacy Byron addresses.

mod address;
mod byron;
mod network;

pub use address::*;
pub use byron::icarus_address;
pub use network::*;
