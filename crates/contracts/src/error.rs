//! Error types for the contracts crate.

use alloy::rpc::types::TransactionReceipt;
use alloy_chains::NamedChain;
use alloy_primitives::{TxHash, U256};
use pegkeeper_model::ModelError;
use thiserror::Error;

/// Errors that can occur when reading from or transacting against the chain.
#[derive(Debug, Error)]
pub enum ContractError {
    /// RPC connection failed.
    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    /// The endpoint serves a different chain than configured.
    #[error("RPC endpoint serves chain id {actual}, expected {expected}")]
    ChainMismatch { expected: NamedChain, actual: u64 },

    /// A view call failed.
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Transaction was mined but reverted.
    #[error("Transaction {0} reverted")]
    Reverted(TxHash),

    /// Insufficient balance.
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: U256, need: U256 },

    /// The factory has no pair for the token/collateral combination.
    #[error("No liquidity pair exists for this token and collateral")]
    PairNotFound,

    /// A mint was mined but the step after it failed.
    #[error("Mint {} was mined but the following step failed: {source}", .mint.transaction_hash)]
    PartialExecution {
        mint: Box<TransactionReceipt>,
        source: Box<ContractError>,
    },

    /// Invalid private key.
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Amount conversion or planning failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type alias for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;
