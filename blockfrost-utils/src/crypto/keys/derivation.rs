//! BIP32-Ed25519 public key derivation (V2 scheme)

use std::fmt;

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::crypto::hash::{blake2b_224, KeyHash};
use crate::error::{Error, Result};

/// Ed25519 public key size
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Chain code size
pub const CHAIN_CODE_SIZE: usize = 32;
/// Serialized extended public key size (public key || chain code)
pub const XPUB_SIZE: usize = PUBLIC_KEY_SIZE + CHAIN_CODE_SIZE;
/// First hardened index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const TAG_DERIVE_PUBLIC_KEY: u8 = 0x02;
const TAG_DERIVE_CHAIN_CODE: u8 = 0x03;

/// An extended Ed25519 public key: a curve point plus a chain code
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    public_key: [u8; PUBLIC_KEY_SIZE],
    chain_code: [u8; CHAIN_CODE_SIZE],
}

impl ExtendedPublicKey {
    pub fn new(public_key: [u8; PUBLIC_KEY_SIZE], chain_code: [u8; CHAIN_CODE_SIZE]) -> Self {
        Self { public_key, chain_code }
    }

    /// Decode a 64-byte extended public key
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != XPUB_SIZE {
            return Err(Error::KeyDecoding(format!(
                "Invalid extended public key length: expected {} bytes, got {}",
                XPUB_SIZE,
                bytes.len()
            )));
        }

        let mut public_key = [0u8; PUBLIC_KEY_SIZE];
        let mut chain_code = [0u8; CHAIN_CODE_SIZE];
        public_key.copy_from_slice(&bytes[..PUBLIC_KEY_SIZE]);
        chain_code.copy_from_slice(&bytes[PUBLIC_KEY_SIZE..]);

        Ok(Self::new(public_key, chain_code))
    }

    /// Decode a hex-encoded extended public key
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::KeyDecoding(format!("Invalid extended public key hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.public_key
    }

    pub fn chain_code(&self) -> &[u8; CHAIN_CODE_SIZE] {
        &self.chain_code
    }

    pub fn to_bytes(&self) -> [u8; XPUB_SIZE] {
        let mut bytes = [0u8; XPUB_SIZE];
        bytes[..PUBLIC_KEY_SIZE].copy_from_slice(&self.public_key);
        bytes[PUBLIC_KEY_SIZE..].copy_from_slice(&self.chain_code);
        bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Blake2b-224 hash of the public key, as used in payment and stake credentials
    pub fn key_hash(&self) -> KeyHash {
        blake2b_224(&self.public_key)
    }

    /// Derive the soft child at `index`
    pub fn derive(&self, index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::KeyDerivation(format!(
                "Cannot derive hardened index {} from a public key",
                index
            )));
        }

        let index_bytes = index.to_le_bytes();

        let mut z_mac = new_hmac(&self.chain_code)?;
        z_mac.update(&[TAG_DERIVE_PUBLIC_KEY]);
        z_mac.update(&self.public_key);
        z_mac.update(&index_bytes);
        let z = z_mac.finalize().into_bytes();

        let mut c_mac = new_hmac(&self.chain_code)?;
        c_mac.update(&[TAG_DERIVE_CHAIN_CODE]);
        c_mac.update(&self.public_key);
        c_mac.update(&index_bytes);
        let c = c_mac.finalize().into_bytes();

        let parent = CompressedEdwardsY(self.public_key)
            .decompress()
            .ok_or_else(|| Error::KeyDerivation("Invalid Ed25519 public key point".to_string()))?;

        // 8 * trunc28(zl) < 2^227 is already reduced modulo the group order
        let tweak = Scalar::from_bytes_mod_order(trunc28_mul8(&z[..28]));
        let child: EdwardsPoint = parent + EdwardsPoint::mul_base(&tweak);

        let mut chain_code = [0u8; CHAIN_CODE_SIZE];
        chain_code.copy_from_slice(&c[32..64]);

        Ok(Self::new(child.compress().to_bytes(), chain_code))
    }

    /// Derive along a sequence of soft indices
    pub fn derive_path(&self, path: &[u32]) -> Result<Self> {
        path.iter().try_fold(self.clone(), |key, index| key.derive(*index))
    }
}

impl fmt::Debug for ExtendedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExtendedPublicKey").field(&self.to_hex()).finish()
    }
}

fn new_hmac(chain_code: &[u8]) -> Result<Hmac<Sha512>> {
    <Hmac<Sha512> as KeyInit>::new_from_slice(chain_code)
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))
}

/// Little-endian `8 * z` for the low 28 bytes of `z`
fn trunc28_mul8(z: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry: u16 = 0;

    for (i, byte) in z.iter().take(28).enumerate() {
        let r = ((*byte as u16) << 3) + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    out[28] = carry as u8;

    out
}
