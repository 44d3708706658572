//! Signed-message verification
//!
//! A message signature is a 65-byte recoverable compact signature over the
//! magic-prefixed double-SHA digest of the message. Verification recovers the
//! signer's public key from the signature and compares its identity against
//! the claimed address, so no key material travels with the message.

use crate::address::AddressCodec;
use crate::crypto::{key_identity, recover_message_pubkey, signed_message_hash};
use crate::error::{Result, RpcCoreError};
use crate::params::NetworkParams;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::trace;

/// Verify a detached message signature against a key-hash address.
///
/// Errors are reserved for malformed requests: a bad address or signature
/// encoding. A signature that decodes but fails recovery or names a
/// different key is a successful `Ok(false)`.
pub fn verify_message(
    address: &str,
    signature_b64: &str,
    message: &str,
    params: &NetworkParams,
    codec: &AddressCodec,
) -> Result<bool> {
    let expected = codec.decode_key_hash(address)?;

    let signature = BASE64
        .decode(signature_b64.as_bytes())
        .map_err(|_| RpcCoreError::MalformedSignature)?;

    let digest = signed_message_hash(&params.message_magic, message);
    let recovered = match recover_message_pubkey(&digest, &signature) {
        Some(pubkey) => pubkey,
        None => {
            trace!(address, "message signature recovery failed");
            return Ok(false);
        }
    };

    Ok(key_identity(&recovered) == expected)
}

/// Sign a message for an address held as a raw keypair, producing the base64
/// wire form `verify_message` accepts. Counterpart used by wallets and tests.
pub fn sign_message(
    keypair: &crate::crypto::KeyPair,
    message: &str,
    params: &NetworkParams,
) -> Result<String> {
    let signature = keypair.sign_message(&params.message_magic, message)?;
    Ok(BASE64.encode(signature))
}
