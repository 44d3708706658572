//! Cryptographic primitives for the FrostChain wallet RPC core
//!
//! Key identities, the signed-message digest, and compact-signature
//! public-key recovery. Everything here is a pure function of its inputs.

use crate::error::{Result, RpcCoreError};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::SECRET_KEY_SIZE,
    ecdsa::{RecoverableSignature, RecoveryId},
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};

/// A thread-safe, lazily initialized Secp256k1 context.
/// This prevents repeated, unnecessary context creation.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Length of a recoverable compact message signature: one header byte
/// carrying the recovery id and compression flag, then r || s.
pub const COMPACT_MESSAGE_SIGNATURE_SIZE: usize = 65;

/// Fixed-width one-way digest of a serialized public key or script, used as
/// the canonical handle for address encoding and equality checks.
pub type KeyIdentity = [u8; 20];

/// Double SHA-256, the digest used for FrostChain transaction ids.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Derive the key identity for a serialized public key (or any script bytes):
/// the first 20 bytes of the double SHA-256 digest.
pub fn key_identity(data: &[u8]) -> KeyIdentity {
    let digest = sha256d(data);
    let mut id = [0u8; 20];
    id.copy_from_slice(&digest[..20]);
    id
}

/// Compute the digest a message signature commits to: double SHA-256 over the
/// length-prefixed network magic followed by the length-prefixed message.
/// The magic prefix keeps message signatures from ever being valid transaction
/// signatures.
pub fn signed_message_hash(magic: &str, message: &str) -> [u8; 32] {
    let mut buf = Vec::with_capacity(magic.len() + message.len() + 10);
    write_compact_size(&mut buf, magic.len() as u64);
    buf.extend_from_slice(magic.as_bytes());
    write_compact_size(&mut buf, message.len() as u64);
    buf.extend_from_slice(message.as_bytes());
    sha256d(&buf)
}

/// Serialize a length the way the wire format does: 1, 3, 5, or 9 bytes.
fn write_compact_size(buf: &mut Vec<u8>, size: u64) {
    if size < 253 {
        buf.push(size as u8);
    } else if size <= u16::MAX as u64 {
        buf.push(253);
        buf.extend_from_slice(&(size as u16).to_le_bytes());
    } else if size <= u32::MAX as u64 {
        buf.push(254);
        buf.extend_from_slice(&(size as u32).to_le_bytes());
    } else {
        buf.push(255);
        buf.extend_from_slice(&size.to_le_bytes());
    }
}

/// Recover the public key that produced a 65-byte compact message signature
/// over `digest`.
///
/// Returns the serialized key (compressed or uncompressed, as the header byte
/// claims) or `None` when recovery is mathematically impossible. A `None`
/// here is a normal "signature invalid" outcome, not an error.
pub fn recover_message_pubkey(digest: &[u8; 32], signature: &[u8]) -> Option<Vec<u8>> {
    if signature.len() != COMPACT_MESSAGE_SIGNATURE_SIZE {
        return None;
    }
    let header = signature[0];
    if !(27..=34).contains(&header) {
        return None;
    }
    let compressed = (header - 27) & 4 != 0;
    let rec_id = RecoveryId::from_i32(((header - 27) & 3) as i32).ok()?;
    let sig = RecoverableSignature::from_compact(&signature[1..], rec_id).ok()?;
    let message = Message::from_digest_slice(digest).ok()?;
    let pubkey = SECP256K1_CONTEXT.recover_ecdsa(&message, &sig).ok()?;
    if compressed {
        Some(pubkey.serialize().to_vec())
    } else {
        Some(pubkey.serialize_uncompressed().to_vec())
    }
}

/// Decode and validate a serialized public key: must parse as a point on the
/// curve (compressed or uncompressed) and not be the point at infinity.
pub fn parse_fully_valid_pubkey(bytes: &[u8]) -> Result<PublicKey> {
    PublicKey::from_slice(bytes)
        .map_err(|e| RpcCoreError::InvalidKeyEncoding(format!("invalid public key: {}", e)))
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
    /// Whether the public key serializes compressed; decides the header byte
    /// of message signatures and the derived key identity.
    pub compressed: bool,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut OsRng);
        Self::from_secret_key(secret_key)
    }

    /// Creates a KeyPair from an existing SecretKey.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
            compressed: true,
        }
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                RpcCoreError::InvalidKeyEncoding(format!(
                    "secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                RpcCoreError::InvalidKeyEncoding(format!("invalid secret key bytes: {}", e))
            }
        })?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Mark the key as using the uncompressed serialization.
    pub fn uncompressed(mut self) -> Self {
        self.compressed = false;
        self
    }

    /// Serialized public key, respecting the compression flag.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        if self.compressed {
            self.public_key.serialize().to_vec()
        } else {
            self.public_key.serialize_uncompressed().to_vec()
        }
    }

    /// The key identity this pair signs for.
    pub fn identity(&self) -> KeyIdentity {
        key_identity(&self.public_key_bytes())
    }

    /// Sign a message with the recoverable compact scheme so verifiers can
    /// recover the public key from the signature alone.
    pub fn sign_message(&self, magic: &str, message: &str) -> Result<[u8; 65]> {
        let digest = signed_message_hash(magic, message);
        let msg = Message::from_digest_slice(&digest)
            .map_err(|e| RpcCoreError::InvalidKeyEncoding(format!("invalid digest: {}", e)))?;
        let sig = SECP256K1_CONTEXT.sign_ecdsa_recoverable(&msg, &self.secret_key);
        let (rec_id, sig_bytes) = sig.serialize_compact();

        let mut out = [0u8; COMPACT_MESSAGE_SIGNATURE_SIZE];
        out[0] = 27 + rec_id.to_i32() as u8 + if self.compressed { 4 } else { 0 };
        out[1..].copy_from_slice(&sig_bytes);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_identity_is_deterministic() {
        let keypair = KeyPair::generate();
        let bytes = keypair.public_key_bytes();
        assert_eq!(key_identity(&bytes), key_identity(&bytes));
        assert_eq!(keypair.identity(), key_identity(&bytes));
    }

    #[test]
    fn test_compressed_and_uncompressed_identities_differ() {
        let keypair = KeyPair::generate();
        let uncompressed = keypair.clone().uncompressed();
        assert_ne!(keypair.identity(), uncompressed.identity());
    }

    #[test]
    fn test_sign_and_recover_roundtrip() {
        let keypair = KeyPair::generate();
        let magic = "FrostChain Signed Message:\n";
        let sig = keypair.sign_message(magic, "hello").unwrap();

        let digest = signed_message_hash(magic, "hello");
        let recovered = recover_message_pubkey(&digest, &sig).unwrap();
        assert_eq!(recovered, keypair.public_key_bytes());
    }

    #[test]
    fn test_recover_uncompressed_flag() {
        let keypair = KeyPair::generate().uncompressed();
        let magic = "FrostChain Signed Message:\n";
        let sig = keypair.sign_message(magic, "hello").unwrap();
        assert!(sig[0] >= 27 && sig[0] <= 30);

        let digest = signed_message_hash(magic, "hello");
        let recovered = recover_message_pubkey(&digest, &sig).unwrap();
        assert_eq!(recovered.len(), 65);
        assert_eq!(recovered, keypair.public_key_bytes());
    }

    #[test]
    fn test_recover_rejects_bad_header() {
        let keypair = KeyPair::generate();
        let magic = "FrostChain Signed Message:\n";
        let mut sig = keypair.sign_message(magic, "hello").unwrap();
        sig[0] = 99;
        let digest = signed_message_hash(magic, "hello");
        assert!(recover_message_pubkey(&digest, &sig).is_none());
    }

    #[test]
    fn test_recover_rejects_wrong_length() {
        let digest = signed_message_hash("magic", "msg");
        assert!(recover_message_pubkey(&digest, &[0u8; 64]).is_none());
        assert!(recover_message_pubkey(&digest, &[0u8; 66]).is_none());
    }

    #[test]
    fn test_message_hash_separates_fields() {
        // ("ab", "c") and ("a", "bc") must not collide thanks to the length
        // prefixes.
        assert_ne!(
            signed_message_hash("ab", "c"),
            signed_message_hash("a", "bc")
        );
    }

    #[test]
    fn test_from_secret_bytes_invalid_length() {
        let short_bytes = [0u8; SECRET_KEY_SIZE - 1];
        let result = KeyPair::from_secret_bytes(&short_bytes);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("secret key must be"));
    }

    #[test]
    fn test_parse_fully_valid_pubkey() {
        let keypair = KeyPair::generate();
        assert!(parse_fully_valid_pubkey(&keypair.public_key_bytes()).is_ok());
        assert!(parse_fully_valid_pubkey(&[0x02; 33]).is_err());
        assert!(parse_fully_valid_pubkey(&[]).is_err());
    }
}
