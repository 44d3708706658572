//! Public key resolution
//!
//! RPC callers name keys either as raw hex or as a key-hash address the
//! wallet knows the full public key for. Resolution validates either form
//! into a curve point before it is allowed anywhere near a script.

use crate::address::{AddressCodec, Destination};
use crate::crypto::parse_fully_valid_pubkey;
use crate::error::{Result, RpcCoreError};
use crate::stores::KeyStore;
use secp256k1::PublicKey;

/// How a caller referred to a public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpecifier {
    /// Hex-encoded serialized public key, compressed or uncompressed.
    RawHex(String),
    /// A key-hash address whose full public key the wallet must hold.
    Address(String),
}

impl KeySpecifier {
    /// Classify a raw RPC string: anything that parses as hex of plausible
    /// key length is treated as a raw key, everything else as an address.
    pub fn from_str(s: &str) -> Self {
        let is_hex = !s.is_empty() && s.len() % 2 == 0 && s.chars().all(|c| c.is_ascii_hexdigit());
        if is_hex {
            KeySpecifier::RawHex(s.to_string())
        } else {
            KeySpecifier::Address(s.to_string())
        }
    }
}

/// A validated public key together with the exact serialization it arrived
/// in. Scripts must carry the original form, so compression is preserved
/// through resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub key: PublicKey,
    pub bytes: Vec<u8>,
}

impl ResolvedKey {
    pub fn is_compressed(&self) -> bool {
        self.bytes.len() == 33
    }
}

/// Resolves key specifiers against an external key store. Pure given the
/// store snapshot; no side effects.
pub struct KeyResolver<'a, K: KeyStore + ?Sized> {
    codec: &'a AddressCodec,
    keys: &'a K,
}

impl<'a, K: KeyStore + ?Sized> KeyResolver<'a, K> {
    pub fn new(codec: &'a AddressCodec, keys: &'a K) -> Self {
        KeyResolver { codec, keys }
    }

    /// Resolve a specifier into a fully valid public key.
    pub fn resolve(&self, spec: &KeySpecifier) -> Result<ResolvedKey> {
        match spec {
            KeySpecifier::RawHex(hex_str) => {
                let bytes = hex::decode(hex_str).map_err(|_| {
                    RpcCoreError::InvalidKeyEncoding(format!("invalid public key: {}", hex_str))
                })?;
                let key = parse_fully_valid_pubkey(&bytes).map_err(|_| {
                    RpcCoreError::InvalidKeyEncoding(format!("invalid public key: {}", hex_str))
                })?;
                Ok(ResolvedKey { key, bytes })
            }
            KeySpecifier::Address(address) => {
                let dest = self.codec.decode(address)?;
                let id = match dest {
                    Destination::KeyHash(id) => id,
                    _ => {
                        return Err(RpcCoreError::InvalidAddress(format!(
                            "{} does not refer to a key",
                            address
                        )))
                    }
                };
                let bytes = self
                    .keys
                    .public_key_for(&id)
                    .ok_or_else(|| RpcCoreError::KeyNotFound(address.clone()))?;
                let key = parse_fully_valid_pubkey(&bytes)?;
                Ok(ResolvedKey { key, bytes })
            }
        }
    }
}
