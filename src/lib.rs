//! FrostChain RPC core - wallet-facing node queries as a library
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Addresses & Scripts
//! - [`address`] - Base58Check destination encoding
//! - [`script`] - Output script construction and classification
//! - [`multisig`] - M-of-N redemption script building
//! - [`describe`] - validateaddress-style address description
//!
//! ## Cryptography
//! - [`crypto`] - Hashing, key identities, recoverable message signatures (secp256k1)
//! - [`keys`] - Public key resolution from RPC inputs
//! - [`message`] - Signed-message verification
//!
//! ## Wallet Views
//! - [`ledger`] - Merged transaction history and balance summaries
//! - [`stores`] - Collaborator traits over wallet and chain state
//!
//! ## RPC Surface
//! - [`rpc`] - JSON response shaping for the RPC commands
//!
//! ## Configuration & Utilities
//! - [`params`] - Network parameters
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Addresses & Scripts
// ============================================================================
pub mod address;
pub mod describe;
pub mod multisig;
pub mod script;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;
pub mod keys;
pub mod message;

// ============================================================================
// Wallet Views
// ============================================================================
pub mod ledger;
pub mod stores;

// ============================================================================
// RPC Surface
// ============================================================================
pub mod rpc;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod error;
pub mod params;
