//! Multisignature script construction
//!
//! Builds the canonical M-of-N redemption script from a list of key
//! specifiers and derives its pay-to-script-hash address. Used by the
//! createmultisig and addmultisigaddress RPC paths.

use crate::address::{AddressCodec, Destination};
use crate::error::{MultisigParamError, Result, RpcCoreError};
use crate::keys::{KeyResolver, KeySpecifier, ResolvedKey};
use crate::script::{self, MAX_SCRIPT_ELEMENT_SIZE};
use crate::stores::KeyStore;
use tracing::debug;

/// Most keys a multisignature script may carry.
pub const MAX_MULTISIG_KEYS: usize = 16;

/// A constructed M-of-N script with its resolved keys, in input order.
#[derive(Debug, Clone)]
pub struct MultisigScript {
    pub required: usize,
    pub pubkeys: Vec<ResolvedKey>,
    pub script: Vec<u8>,
    /// Base58Check pay-to-script-hash address of the script.
    pub address: String,
}

/// Build an M-of-N redemption script from key specifiers.
///
/// Key resolution is fail-fast: the first specifier that does not resolve
/// aborts the call and no partial script is produced. Keys are neither sorted
/// nor deduplicated; the script carries them in input order.
pub fn build_multisig<K: KeyStore + ?Sized>(
    required: usize,
    specs: &[KeySpecifier],
    codec: &AddressCodec,
    keys: &K,
) -> Result<MultisigScript> {
    if required < 1 {
        return Err(RpcCoreError::InvalidMultisigParameters(
            MultisigParamError::RequiredTooLow,
        ));
    }
    if specs.len() < required {
        return Err(RpcCoreError::InvalidMultisigParameters(
            MultisigParamError::TooFewKeys {
                got: specs.len(),
                need: required,
            },
        ));
    }
    if specs.len() > MAX_MULTISIG_KEYS {
        return Err(RpcCoreError::InvalidMultisigParameters(
            MultisigParamError::TooManyKeys { got: specs.len() },
        ));
    }

    let resolver = KeyResolver::new(codec, keys);
    let mut pubkeys: Vec<ResolvedKey> = Vec::with_capacity(specs.len());
    for spec in specs {
        pubkeys.push(resolver.resolve(spec)?);
    }

    let serialized: Vec<Vec<u8>> = pubkeys.iter().map(|k| k.bytes.clone()).collect();
    let script = script::multisig_redeem_script(required, &serialized);
    if script.len() > MAX_SCRIPT_ELEMENT_SIZE {
        return Err(RpcCoreError::ScriptTooLarge {
            got: script.len(),
            max: MAX_SCRIPT_ELEMENT_SIZE,
        });
    }

    let hash = script::script_hash(&script);
    // ScriptHash always encodes; only Destination::None lacks an address form.
    let address = codec
        .encode(&Destination::ScriptHash(hash))
        .unwrap_or_default();
    debug!(required, keys = pubkeys.len(), %address, "built multisig script");

    Ok(MultisigScript {
        required,
        pubkeys,
        script,
        address,
    })
}
