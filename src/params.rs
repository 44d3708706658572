//! Chain parameter management for FrostChain
//!
//! The RPC core only needs the handful of constants that distinguish one
//! FrostChain network from another: the address version bytes and the
//! signed-message magic. Parameters can be loaded from a TOML file or taken
//! from the built-in mainnet/testnet sets.

use crate::error::{Result, RpcCoreError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkParams {
    #[serde(default = "default_network_name")]
    pub name: String,

    /// Version byte prefixed to a key identity in Base58Check addresses.
    #[serde(default = "default_pubkey_version")]
    pub pubkey_address_version: u8,

    /// Version byte prefixed to a script hash in Base58Check addresses.
    #[serde(default = "default_script_version")]
    pub script_address_version: u8,

    /// Magic prefix mixed into every signed-message digest so that message
    /// signatures can never be replayed as transaction signatures.
    #[serde(default = "default_message_magic")]
    pub message_magic: String,
}

fn default_network_name() -> String {
    "main".to_string()
}

fn default_pubkey_version() -> u8 {
    0x23
}

fn default_script_version() -> u8 {
    0x5c
}

fn default_message_magic() -> String {
    "FrostChain Signed Message:\n".to_string()
}

impl NetworkParams {
    pub fn mainnet() -> Self {
        NetworkParams {
            name: default_network_name(),
            pubkey_address_version: default_pubkey_version(),
            script_address_version: default_script_version(),
            message_magic: default_message_magic(),
        }
    }

    pub fn testnet() -> Self {
        NetworkParams {
            name: "test".to_string(),
            pubkey_address_version: 0x41,
            script_address_version: 0x7a,
            message_magic: default_message_magic(),
        }
    }

    /// Load parameters from a TOML file, falling back to mainnet defaults for
    /// any missing field.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| RpcCoreError::Params(format!("failed to read network params: {}", e)))?;
        let params: NetworkParams = toml::from_str(&contents)
            .map_err(|e| RpcCoreError::Params(format!("failed to parse network params: {}", e)))?;
        Ok(params)
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self::mainnet()
    }
}
