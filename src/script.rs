//! Output-script construction and classification
//!
//! FrostChain uses the Bitcoin-style stack script in its outputs. This module
//! only deals with the standard patterns the RPC core needs: pay-to-pubkey,
//! pay-to-key-hash, pay-to-script-hash, and bare M-of-N multisig.

use crate::address::Destination;
use crate::crypto::{key_identity, KeyIdentity};

pub const OP_DUP: u8 = 0x76;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;

/// Largest serialized script that may be pushed as a single element; a
/// multisig redeem script must fit under this to be spendable.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// The standard output patterns this core recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptClass {
    /// `<pubkey> OP_CHECKSIG`
    PubKey { pubkey: Vec<u8> },
    /// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
    PubKeyHash { id: KeyIdentity },
    /// `OP_HASH160 <20> OP_EQUAL`
    ScriptHash { id: KeyIdentity },
    /// `OP_M <key>... OP_N OP_CHECKMULTISIG`
    Multisig { required: usize, pubkeys: Vec<Vec<u8>> },
    Nonstandard,
}

impl ScriptClass {
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptClass::PubKey { .. } => "pubkey",
            ScriptClass::PubKeyHash { .. } => "pubkeyhash",
            ScriptClass::ScriptHash { .. } => "scripthash",
            ScriptClass::Multisig { .. } => "multisig",
            ScriptClass::Nonstandard => "nonstandard",
        }
    }
}

/// Opcode encoding a small integer 1..=16.
fn small_int_opcode(value: usize) -> u8 {
    debug_assert!((1..=16).contains(&value));
    OP_1 + (value as u8) - 1
}

/// `OP_DUP OP_HASH160 <id> OP_EQUALVERIFY OP_CHECKSIG`
pub fn pay_to_key_hash(id: &KeyIdentity) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.extend_from_slice(&[OP_DUP, OP_HASH160, 20]);
    script.extend_from_slice(id);
    script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    script
}

/// `OP_HASH160 <id> OP_EQUAL`
pub fn pay_to_script_hash(id: &KeyIdentity) -> Vec<u8> {
    let mut script = Vec::with_capacity(23);
    script.extend_from_slice(&[OP_HASH160, 20]);
    script.extend_from_slice(id);
    script.push(OP_EQUAL);
    script
}

/// The output script paying to a destination, if it has one.
pub fn script_for_destination(dest: &Destination) -> Option<Vec<u8>> {
    match dest {
        Destination::None => None,
        Destination::KeyHash(id) => Some(pay_to_key_hash(id)),
        Destination::ScriptHash(id) => Some(pay_to_script_hash(id)),
    }
}

/// Serialize an M-of-N redemption script over already-serialized public keys.
/// Keys appear in exactly the order supplied and keep their original form
/// (compressed or uncompressed); no sorting or deduplication happens here.
pub fn multisig_redeem_script(required: usize, pubkeys: &[Vec<u8>]) -> Vec<u8> {
    let mut script = Vec::new();
    script.push(small_int_opcode(required));
    for bytes in pubkeys {
        script.push(bytes.len() as u8);
        script.extend_from_slice(bytes);
    }
    script.push(small_int_opcode(pubkeys.len()));
    script.push(OP_CHECKMULTISIG);
    script
}

/// Script hash of a serialized script, for use as a P2SH destination.
pub fn script_hash(script: &[u8]) -> KeyIdentity {
    key_identity(script)
}

/// Classify a script against the standard output patterns.
pub fn classify(script: &[u8]) -> ScriptClass {
    if script.len() == 25
        && script[0] == OP_DUP
        && script[1] == OP_HASH160
        && script[2] == 20
        && script[23] == OP_EQUALVERIFY
        && script[24] == OP_CHECKSIG
    {
        let mut id = [0u8; 20];
        id.copy_from_slice(&script[3..23]);
        return ScriptClass::PubKeyHash { id };
    }

    if script.len() == 23 && script[0] == OP_HASH160 && script[1] == 20 && script[22] == OP_EQUAL {
        let mut id = [0u8; 20];
        id.copy_from_slice(&script[2..22]);
        return ScriptClass::ScriptHash { id };
    }

    if (script.len() == 35 || script.len() == 67)
        && script[0] as usize == script.len() - 2
        && script[script.len() - 1] == OP_CHECKSIG
    {
        return ScriptClass::PubKey {
            pubkey: script[1..script.len() - 1].to_vec(),
        };
    }

    if let Some((required, pubkeys)) = parse_multisig(script) {
        return ScriptClass::Multisig { required, pubkeys };
    }

    ScriptClass::Nonstandard
}

/// Parse `OP_M <key>... OP_N OP_CHECKMULTISIG`, requiring every push to be a
/// plausible public key and the counts to be consistent.
fn parse_multisig(script: &[u8]) -> Option<(usize, Vec<Vec<u8>>)> {
    if script.len() < 3 {
        return None;
    }
    let mut cursor = 0usize;
    let required_opcode = *script.get(cursor)?;
    cursor += 1;
    if !(OP_1..=OP_16).contains(&required_opcode) {
        return None;
    }
    let required = (required_opcode - OP_1 + 1) as usize;

    let mut pubkeys: Vec<Vec<u8>> = Vec::new();
    while cursor < script.len() {
        let op = *script.get(cursor)?;
        if (OP_1..=OP_16).contains(&op) {
            break;
        }
        cursor += 1;
        let len = op as usize;
        if !matches!(len, 33 | 65) || cursor + len > script.len() {
            return None;
        }
        pubkeys.push(script[cursor..cursor + len].to_vec());
        cursor += len;
    }

    let total_opcode = *script.get(cursor)?;
    cursor += 1;
    if !(OP_1..=OP_16).contains(&total_opcode) {
        return None;
    }
    let total = (total_opcode - OP_1 + 1) as usize;

    if script.get(cursor) != Some(&OP_CHECKMULTISIG) {
        return None;
    }
    cursor += 1;
    if cursor != script.len() || total != pubkeys.len() || required > total {
        return None;
    }
    Some((required, pubkeys))
}

/// Decompose a script into the destinations it pays and, for multisig, the
/// number of signatures required. Mirrors the node's ExtractDestinations.
pub fn extract_destinations(script: &[u8]) -> (ScriptClass, Vec<Destination>, usize) {
    let class = classify(script);
    let (destinations, required) = match &class {
        ScriptClass::PubKey { pubkey } => {
            (vec![Destination::KeyHash(key_identity(pubkey))], 1)
        }
        ScriptClass::PubKeyHash { id } => (vec![Destination::KeyHash(*id)], 1),
        ScriptClass::ScriptHash { id } => (vec![Destination::ScriptHash(*id)], 1),
        ScriptClass::Multisig { required, pubkeys } => (
            pubkeys
                .iter()
                .map(|key| Destination::KeyHash(key_identity(key)))
                .collect(),
            *required,
        ),
        ScriptClass::Nonstandard => (Vec::new(), 0),
    };
    (class, destinations, required)
}
