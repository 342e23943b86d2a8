//! Legacy (Byron-era) Icarus address encoding
//!
//! ```text
//! root    = blake2b224(sha3_256(cbor([0, [0, xpub], attributes])))
//! payload = cbor([root, attributes, 0])
//! address = base58(cbor([tag24(bytes(payload)), crc32(payload)]))
//! ```
//!
//! `attributes` is an empty map on mainnet and `{2: bytes(cbor(magic))}` elsewhere.

use std::convert::Infallible;

use minicbor::data::Tag;
use minicbor::Encoder;

use super::network::NetworkInfo;
use crate::crypto::hash::{blake2b_224, sha3_256, HASH_224_SIZE};
use crate::crypto::keys::ExtendedPublicKey;
use crate::error::{Error, Result};

const ADDR_TYPE_PUBKEY: u8 = 0;
const SPENDING_DATA_PUBKEY: u8 = 0;
const ATTRIBUTE_PROTOCOL_MAGIC: u8 = 2;

type CborResult<T> = std::result::Result<T, minicbor::encode::Error<Infallible>>;

fn cbor_error(e: minicbor::encode::Error<Infallible>) -> Error {
    Error::AddressEncoding(format!("CBOR encoding failed: {}", e))
}

/// Encode an Icarus-style Byron address for `key` as Base58
pub fn icarus_address(key: &ExtendedPublicKey, network: &NetworkInfo) -> Result<String> {
    let protocol_magic = network.byron_protocol_magic();
    let root = address_root(key, protocol_magic).map_err(cbor_error)?;
    let bytes = encode_address(&root, protocol_magic).map_err(cbor_error)?;
    Ok(bs58::encode(bytes).into_string())
}

fn address_root(key: &ExtendedPublicKey, protocol_magic: Option<u32>) -> CborResult<[u8; HASH_224_SIZE]> {
    let mut e = Encoder::new(Vec::new());
    e.array(3)?.u8(ADDR_TYPE_PUBKEY)?;
    e.array(2)?.u8(SPENDING_DATA_PUBKEY)?.bytes(&key.to_bytes())?;
    encode_attributes(&mut e, protocol_magic)?;

    Ok(blake2b_224(&sha3_256(&e.into_writer())))
}

fn encode_address(root: &[u8], protocol_magic: Option<u32>) -> CborResult<Vec<u8>> {
    let mut payload = Encoder::new(Vec::new());
    payload.array(3)?.bytes(root)?;
    encode_attributes(&mut payload, protocol_magic)?;
    payload.u8(ADDR_TYPE_PUBKEY)?;
    let payload = payload.into_writer();

    let mut e = Encoder::new(Vec::new());
    e.array(2)?
        .tag(Tag::Cbor)?
        .bytes(&payload)?
        .u32(crc32fast::hash(&payload))?;

    Ok(e.into_writer())
}

fn encode_attributes(e: &mut Encoder<Vec<u8>>, protocol_magic: Option<u32>) -> CborResult<()> {
    match protocol_magic {
        None => {
            e.map(0)?;
        }
        Some(magic) => {
            let mut inner = Encoder::new(Vec::new());
            inner.u32(magic)?;
            e.map(1)?.u8(ATTRIBUTE_PROTOCOL_MAGIC)?.bytes(&inner.into_writer())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> ExtendedPublicKey {
        ExtendedPublicKey::new([0x5a; 32], [0x11; 32])
    }

    #[test]
    fn test_attributes_encoding() {
        let mut e = Encoder::new(Vec::new());
        encode_attributes(&mut e, None).unwrap();
        assert_eq!(e.into_writer(), vec![0xa0]);

        let mut e = Encoder::new(Vec::new());
        encode_attributes(&mut e, Some(1_097_911_063)).unwrap();
        assert_eq!(e.into_writer(), hex::decode("a102451a4170cb17").unwrap());
    }

    #[test]
    fn test_address_envelope() {
        let root = [0u8; HASH_224_SIZE];
        let bytes = encode_address(&root, None).unwrap();

        // [ 24(h'...'), crc ]
        assert_eq!(&bytes[..3], &[0x82, 0xd8, 0x18]);
        // payload: [ h'00..', {}, 0 ] is 33 bytes long
        assert_eq!(bytes[3], 0x58);
        assert_eq!(bytes[4], 33);
        let payload = &bytes[5..38];
        assert_eq!(payload[0], 0x83);
        assert_eq!(&payload[1..3], &[0x58, 0x1c]);
        assert_eq!(&payload[31..], &[0xa0, 0x00]);
        assert_eq!(bytes[38], 0x1a);
        assert_eq!(&bytes[39..], &crc32fast::hash(payload).to_be_bytes());
    }

    #[test]
    fn test_mainnet_icarus_prefix() {
        let address = icarus_address(&sample_key(), &NetworkInfo::mainnet()).unwrap();
        assert!(address.starts_with("Ae2"), "unexpected address {}", address);
    }

    #[test]
    fn test_protocol_magic_changes_address() {
        let mainnet = icarus_address(&sample_key(), &NetworkInfo::mainnet()).unwrap();
        let testnet = icarus_address(&sample_key(), &NetworkInfo::testnet()).unwrap();
        assert_ne!(mainnet, testnet);

        let decoded = bs58::decode(&testnet).into_vec().unwrap();
        assert_eq!(&decoded[..3], &[0x82, 0xd8, 0x18]);
    }
}
