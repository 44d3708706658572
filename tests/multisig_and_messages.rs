//! Integration tests for multisig construction and signed messages

use frostchain::address::{AddressCodec, Destination};
use frostchain::crypto::KeyPair;
use frostchain::error::RpcCoreError;
use frostchain::keys::KeySpecifier;
use frostchain::message::{sign_message, verify_message};
use frostchain::multisig::build_multisig;
use frostchain::params::NetworkParams;
use frostchain::script::{classify, ScriptClass};
use frostchain::stores::MemoryKeyStore;

/// Helper to create the mainnet codec
fn mainnet_codec() -> (NetworkParams, AddressCodec) {
    let params = NetworkParams::mainnet();
    let codec = AddressCodec::new(&params);
    (params, codec)
}

/// Helper to build hex specifiers for fresh keys
fn fresh_hex_keys(n: usize) -> (Vec<KeyPair>, Vec<KeySpecifier>) {
    let pairs: Vec<KeyPair> = (0..n).map(|_| KeyPair::generate()).collect();
    let specs = pairs
        .iter()
        .map(|p| KeySpecifier::RawHex(hex::encode(p.public_key_bytes())))
        .collect();
    (pairs, specs)
}

#[test]
fn test_multisig_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let (_, codec) = mainnet_codec();
    let store = MemoryKeyStore::new();

    // One key comes from the wallet by address, two arrive as raw hex
    let wallet_key = KeyPair::generate();
    store.insert_key(wallet_key.identity(), wallet_key.public_key_bytes());
    let wallet_address = codec
        .encode(&Destination::KeyHash(wallet_key.identity()))
        .ok_or("key hash must encode")?;

    let (_, mut specs) = fresh_hex_keys(2);
    specs.push(KeySpecifier::Address(wallet_address));

    let result = build_multisig(2, &specs, &codec, &store)?;

    // The script classifies back to the same parameters
    match classify(&result.script) {
        ScriptClass::Multisig { required, pubkeys } => {
            assert_eq!(required, 2);
            assert_eq!(pubkeys.len(), 3);
            assert_eq!(pubkeys[2], wallet_key.public_key_bytes());
        }
        other => panic!("expected multisig, got {:?}", other),
    }

    // The reported address round-trips through the codec as a script hash
    let dest = codec.decode(&result.address)?;
    assert!(matches!(dest, Destination::ScriptHash(_)));

    Ok(())
}

#[test]
fn test_multisig_mixed_compression_survives() -> Result<(), Box<dyn std::error::Error>> {
    let (_, codec) = mainnet_codec();
    let compressed = KeyPair::generate();
    let uncompressed = KeyPair::generate().uncompressed();
    let specs = vec![
        KeySpecifier::RawHex(hex::encode(compressed.public_key_bytes())),
        KeySpecifier::RawHex(hex::encode(uncompressed.public_key_bytes())),
    ];

    let result = build_multisig(1, &specs, &codec, &MemoryKeyStore::new())?;

    // Each key keeps the serialization it arrived in
    match classify(&result.script) {
        ScriptClass::Multisig { pubkeys, .. } => {
            assert_eq!(pubkeys[0].len(), 33);
            assert_eq!(pubkeys[1].len(), 65);
        }
        other => panic!("expected multisig, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_multisig_parameter_errors() {
    let (_, codec) = mainnet_codec();
    let store = MemoryKeyStore::new();
    let (_, specs) = fresh_hex_keys(3);

    assert!(build_multisig(0, &specs, &codec, &store).is_err());
    assert!(build_multisig(4, &specs, &codec, &store).is_err());

    let many: Vec<KeySpecifier> = (0..17)
        .map(|_| KeySpecifier::RawHex(hex::encode(KeyPair::generate().public_key_bytes())))
        .collect();
    assert!(build_multisig(1, &many, &codec, &store).is_err());
}

#[test]
fn test_message_sign_verify_across_networks() -> Result<(), Box<dyn std::error::Error>> {
    let (mainnet, mainnet_codec) = mainnet_codec();
    let testnet = NetworkParams::testnet();
    let testnet_codec = AddressCodec::new(&testnet);

    let pair = KeyPair::generate();
    let main_addr = mainnet_codec
        .encode(&Destination::KeyHash(pair.identity()))
        .ok_or("key hash must encode")?;
    let test_addr = testnet_codec
        .encode(&Destination::KeyHash(pair.identity()))
        .ok_or("key hash must encode")?;

    // Same key, different address encodings per network
    assert_ne!(main_addr, test_addr);

    let sig = sign_message(&pair, "cross network", &mainnet)?;
    assert!(verify_message(&main_addr, &sig, "cross network", &mainnet, &mainnet_codec)?);
    assert!(verify_message(&test_addr, &sig, "cross network", &testnet, &testnet_codec)?);

    Ok(())
}

#[test]
fn test_message_verification_failure_modes() -> Result<(), Box<dyn std::error::Error>> {
    let (params, codec) = mainnet_codec();
    let pair = KeyPair::generate();
    let address = codec
        .encode(&Destination::KeyHash(pair.identity()))
        .ok_or("key hash must encode")?;
    let sig = sign_message(&pair, "hello", &params)?;

    // Wrong message is a clean false
    assert!(!verify_message(&address, &sig, "goodbye", &params, &codec)?);

    // Undecodable signature is an error, not false
    let err = verify_message(&address, "%%%", "hello", &params, &codec).unwrap_err();
    assert_eq!(err, RpcCoreError::MalformedSignature);

    // A script-hash address can never sign messages
    let script_addr = codec
        .encode(&Destination::ScriptHash([7u8; 20]))
        .ok_or("script hash must encode")?;
    assert!(verify_message(&script_addr, &sig, "hello", &params, &codec).is_err());

    Ok(())
}
