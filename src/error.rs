//! Error types for the FrostChain wallet RPC core
//!
//! Every failure here is a deterministic local validation failure: given the
//! same inputs and the same store snapshot the outcome cannot change, so
//! callers must not retry. Negative-but-successful outcomes (a signature that
//! simply does not match, a missing optional description field) are *not*
//! errors and never appear in this enum.

use thiserror::Error;

/// Reason a multisig construction request was rejected before any key
/// resolution took place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultisigParamError {
    /// `required` was zero.
    RequiredTooLow,
    /// Fewer keys supplied than signatures required.
    TooFewKeys { got: usize, need: usize },
    /// More than 16 keys supplied.
    TooManyKeys { got: usize },
}

impl std::fmt::Display for MultisigParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultisigParamError::RequiredTooLow => {
                write!(
                    f,
                    "a multisignature address must require at least one key to redeem"
                )
            }
            MultisigParamError::TooFewKeys { got, need } => write!(
                f,
                "not enough keys supplied (got {} keys, but need at least {} to redeem)",
                got, need
            ),
            MultisigParamError::TooManyKeys { got } => write!(
                f,
                "number of keys involved in the multisignature address creation > 16 (got {})",
                got
            ),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcCoreError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid public key encoding: {0}")]
    InvalidKeyEncoding(String),

    #[error("No full public key for address {0}")]
    KeyNotFound(String),

    #[error("Invalid multisig parameters: {0}")]
    InvalidMultisigParameters(MultisigParamError),

    #[error("redeemScript exceeds size limit: {got} > {max}")]
    ScriptTooLarge { got: usize, max: usize },

    #[error("Malformed base64 encoding")]
    MalformedSignature,

    #[error("Network params error: {0}")]
    Params(String),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, RpcCoreError>;
