//! Address derivation from an account public key
//!
//! The account key sits at `m/1852'/1815'/account'`; everything below it is
//! soft-derived here.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::byron::icarus_address;
use super::network::NetworkInfo;
use crate::crypto::hash::KeyHash;
use crate::crypto::keys::{ExtendedPublicKey, ROLE_STAKING};
use crate::error::{Error, Result};

/// Header type nibble of a base address with key hash payment and stake parts
const BASE_ADDRESS_KEY_KEY: u8 = 0b0000_0000;
/// Header type nibble of a reward address with a key hash stake part
const REWARD_ADDRESS_KEY: u8 = 0b1110_0000;

/// A derivation request for one `(role, address_index)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationRequest {
    /// Hex-encoded 64-byte account extended public key
    pub account_public_key: String,
    pub role: u32,
    pub address_index: u32,
    #[serde(default)]
    pub is_testnet: bool,
    #[serde(default)]
    pub is_byron: bool,
}

/// A derived address and the `[role, address_index]` path it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAddress {
    /// Bech32 (Shelley) or Base58 (Byron) address
    pub address: String,
    pub path: [u32; 2],
}

impl DerivedAddress {
    pub fn new(address: String, role: u32, address_index: u32) -> Self {
        Self {
            address,
            path: [role, address_index],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.address
    }

    pub fn role(&self) -> u32 {
        self.path[0]
    }

    pub fn address_index(&self) -> u32 {
        self.path[1]
    }
}

/// Derive an address at `account/role/address_index`.
///
/// * `role == 2` without `is_byron` gives the reward address of the stake key at
///   `2/address_index`.
/// * `is_byron` gives a legacy Icarus address of the payment key.
/// * Anything else gives a base address pairing the payment key with the stake
///   key at `2/0`.
pub fn derive_address(
    account_public_key: &str,
    role: u32,
    address_index: u32,
    is_testnet: bool,
    is_byron: bool,
) -> Result<DerivedAddress> {
    let request = DerivationRequest {
        account_public_key: account_public_key.to_string(),
        role,
        address_index,
        is_testnet,
        is_byron,
    };
    let network = NetworkInfo::from_testnet_flag(is_testnet);
    derive_address_for_network(&request, &network)
}

/// Derive an address for an explicit network, ignoring `request.is_testnet`
pub fn derive_address_for_network(request: &DerivationRequest, network: &NetworkInfo) -> Result<DerivedAddress> {
    let account_key = ExtendedPublicKey::from_hex(&request.account_public_key)?;
    let (role, address_index) = (request.role, request.address_index);

    let payment_key = account_key.derive_path(&[role, address_index])?;
    let main_stake_key = account_key.derive_path(&[ROLE_STAKING, 0])?;

    let address = if role == ROLE_STAKING && !request.is_byron {
        debug!(address_index, "Deriving reward address");
        let stake_key = account_key.derive_path(&[ROLE_STAKING, address_index])?;
        reward_address(&stake_key.key_hash(), network)?
    } else if request.is_byron {
        debug!(role, address_index, "Deriving Byron address");
        icarus_address(&payment_key, network)?
    } else {
        debug!(role, address_index, "Deriving base address");
        base_address(&payment_key.key_hash(), &main_stake_key.key_hash(), network)?
    };

    Ok(DerivedAddress::new(address, role, address_index))
}

/// Bech32 base address for a payment and a stake key hash
pub fn base_address(payment: &KeyHash, stake: &KeyHash, network: &NetworkInfo) -> Result<String> {
    let mut bytes = Vec::with_capacity(1 + payment.len() + stake.len());
    bytes.push(BASE_ADDRESS_KEY_KEY | network.network_id());
    bytes.extend_from_slice(payment);
    bytes.extend_from_slice(stake);

    encode_bech32(network.address_hrp(), &bytes)
}

/// Bech32 reward address for a stake key hash
pub fn reward_address(stake: &KeyHash, network: &NetworkInfo) -> Result<String> {
    let mut bytes = Vec::with_capacity(1 + stake.len());
    bytes.push(REWARD_ADDRESS_KEY | network.network_id());
    bytes.extend_from_slice(stake);

    encode_bech32(network.reward_hrp(), &bytes)
}

fn encode_bech32(prefix: &str, bytes: &[u8]) -> Result<String> {
    let hrp = Hrp::parse(prefix)
        .map_err(|e| Error::AddressEncoding(format!("Invalid prefix: {}", e)))?;
    bech32::encode::<Bech32>(hrp, bytes).map_err(|e| Error::AddressEncoding(e.to_string()))
}
