//! Cardano network parameters

use serde::{Deserialize, Serialize};

const MAINNET_NETWORK_ID: u8 = 1;
const TESTNET_NETWORK_ID: u8 = 0;
const MAINNET_PROTOCOL_MAGIC: u32 = 764_824_073;

/// Network id (Shelley addresses) and protocol magic (Byron addresses)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkInfo {
    network_id: u8,
    protocol_magic: u32,
}

impl NetworkInfo {
    pub const fn new(network_id: u8, protocol_magic: u32) -> Self {
        Self { network_id, protocol_magic }
    }

    pub const fn mainnet() -> Self {
        Self::new(MAINNET_NETWORK_ID, MAINNET_PROTOCOL_MAGIC)
    }

    /// The legacy public testnet
    pub const fn testnet() -> Self {
        Self::new(TESTNET_NETWORK_ID, 1_097_911_063)
    }

    pub const fn preprod() -> Self {
        Self::new(TESTNET_NETWORK_ID, 1)
    }

    pub const fn preview() -> Self {
        Self::new(TESTNET_NETWORK_ID, 2)
    }

    /// Mainnet or the legacy testnet, matching the `is_testnet` flag of derivation requests
    pub const fn from_testnet_flag(is_testnet: bool) -> Self {
        if is_testnet {
            Self::testnet()
        } else {
            Self::mainnet()
        }
    }

    pub fn network_id(&self) -> u8 {
        self.network_id
    }

    pub fn protocol_magic(&self) -> u32 {
        self.protocol_magic
    }

    pub fn is_mainnet(&self) -> bool {
        self.network_id == MAINNET_NETWORK_ID
    }

    /// Byron addresses leave the magic out on mainnet
    pub fn byron_protocol_magic(&self) -> Option<u32> {
        (self.protocol_magic != MAINNET_PROTOCOL_MAGIC).then_some(self.protocol_magic)
    }

    /// Bech32 prefix for payment (base) addresses
    pub fn address_hrp(&self) -> &'static str {
        if self.is_mainnet() {
            "addr"
        } else {
            "addr_test"
        }
    }

    /// Bech32 prefix for reward (stake) addresses
    pub fn reward_hrp(&self) -> &'static str {
        if self.is_mainnet() {
            "stake"
        } else {
            "stake_test"
        }
    }
}
