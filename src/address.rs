//! Address encoding and decoding for FrostChain
//!
//! A FrostChain transparent address is Base58Check over a one-byte network
//! version followed by a 20-byte identity: the key identity for pay-to-key-hash
//! addresses, the script hash for pay-to-script-hash addresses.

use crate::crypto::KeyIdentity;
use crate::error::{Result, RpcCoreError};
use crate::params::NetworkParams;

/// The decoded form of an address. Exactly one variant is ever active; adding
/// a destination kind forces every consumer to handle it at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// No destination; the result of decoding nothing. Carries no data.
    None,
    /// Pay to the holder of the key with this identity.
    KeyHash(KeyIdentity),
    /// Pay to the script hashing to this identity.
    ScriptHash(KeyIdentity),
}

impl Destination {
    pub fn is_none(&self) -> bool {
        matches!(self, Destination::None)
    }
}

/// Base58Check codec tied to one network's version bytes.
#[derive(Debug, Clone)]
pub struct AddressCodec {
    pubkey_version: u8,
    script_version: u8,
}

impl AddressCodec {
    pub fn new(params: &NetworkParams) -> Self {
        AddressCodec {
            pubkey_version: params.pubkey_address_version,
            script_version: params.script_address_version,
        }
    }

    /// Encode a destination as a Base58Check address string.
    /// `Destination::None` has no address form.
    pub fn encode(&self, dest: &Destination) -> Option<String> {
        let (version, id) = match dest {
            Destination::None => return None,
            Destination::KeyHash(id) => (self.pubkey_version, id),
            Destination::ScriptHash(id) => (self.script_version, id),
        };
        let mut payload = Vec::with_capacity(21);
        payload.push(version);
        payload.extend_from_slice(id);
        Some(bs58::encode(payload).with_check().into_string())
    }

    /// Decode an address string into its destination.
    pub fn decode(&self, address: &str) -> Result<Destination> {
        let payload = bs58::decode(address)
            .with_check(None)
            .into_vec()
            .map_err(|_| RpcCoreError::InvalidAddress(address.to_string()))?;
        if payload.len() != 21 {
            return Err(RpcCoreError::InvalidAddress(address.to_string()));
        }
        let mut id = [0u8; 20];
        id.copy_from_slice(&payload[1..]);
        if payload[0] == self.pubkey_version {
            Ok(Destination::KeyHash(id))
        } else if payload[0] == self.script_version {
            Ok(Destination::ScriptHash(id))
        } else {
            Err(RpcCoreError::InvalidAddress(address.to_string()))
        }
    }

    /// Decode an address and require it to wrap a key identity. Script-hash
    /// addresses are rejected; message signatures can only name keys.
    pub fn decode_key_hash(&self, address: &str) -> Result<KeyIdentity> {
        match self.decode(address)? {
            Destination::KeyHash(id) => Ok(id),
            _ => Err(RpcCoreError::InvalidAddress(format!(
                "{} does not refer to a key",
                address
            ))),
        }
    }
}
