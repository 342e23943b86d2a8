//! Hash functions used by Cardano addresses

use blake2::digest::consts::U28;
use blake2::digest::Digest;
use blake2::Blake2b;
use sha3::Sha3_256;

type Blake2b224 = Blake2b<U28>;

/// Size of a key hash or Byron address root
pub const HASH_224_SIZE: usize = 28;

/// Blake2b-224 digest of a verification key
pub type KeyHash = [u8; HASH_224_SIZE];

/// Compute Blake2b-224
pub fn blake2b_224(data: &[u8]) -> [u8; HASH_224_SIZE] {
    let mut hasher = Blake2b224::new();
    hasher.update(data);

    let mut out = [0u8; HASH_224_SIZE];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Compute SHA3-256
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);

    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}
