//! Error types for the Crossflow Bridge contract.

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only the pause controller can perform this action")]
    UnauthorizedPauseController,

    #[error("Unauthorized: only pending admin can accept")]
    UnauthorizedPendingAdmin,

    #[error("Unauthorized: caller is not the regiment manager")]
    NotRegimentManager,

    #[error("Unauthorized: caller is not a regiment member")]
    NotRegimentMember,

    // ========================================================================
    // Admin Errors
    // ========================================================================

    #[error("No pending admin change")]
    NoPendingAdmin,

    // ========================================================================
    // Bridge State Errors
    // ========================================================================

    #[error("Bridge is paused")]
    BridgePaused,

    #[error("Chain not supported: {chain_id}")]
    ChainNotSupported { chain_id: String },

    #[error("Token not registered: {symbol}")]
    TokenNotRegistered { symbol: String },

    #[error("Token {symbol} is not whitelisted for chain {chain_id}")]
    TokenNotWhitelisted { chain_id: String, symbol: String },

    // ========================================================================
    // Input Validation Errors
    // ========================================================================

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("Invalid message: {reason}")]
    InvalidMessage { reason: String },

    #[error("Invalid receipt id: {receipt_id}")]
    InvalidReceiptId { receipt_id: String },

    #[error("Invalid swap ratio: both shares must be positive")]
    InvalidSwapRatio,

    // ========================================================================
    // Rate Limit Errors
    // ========================================================================

    #[error("Daily limit exceeded: requested {requested}, remaining {remaining}")]
    DailyLimitExceeded {
        requested: Uint128,
        remaining: Uint128,
    },

    #[error(
        "Token bucket exhausted: requested {requested}, available {available}, \
         minimum wait {wait_seconds} seconds"
    )]
    BucketRateExceeded {
        requested: Uint128,
        available: Uint128,
        wait_seconds: u64,
    },

    // ========================================================================
    // Fee Errors
    // ========================================================================

    #[error("Insufficient fee: expected {expected}, got {got}")]
    InsufficientFee { expected: Uint128, got: Uint128 },

    #[error("Price ratio fluctuation out of bounds: current {current}, previous {previous}")]
    PriceFluctuationExceeded { current: Uint128, previous: Uint128 },

    // ========================================================================
    // Outbound Errors
    // ========================================================================

    #[error("Receipt sequence overflow for token key {token_key}")]
    SequenceOverflow { token_key: String },

    // ========================================================================
    // Swap Errors
    // ========================================================================

    #[error("Swap not found: {swap_id}")]
    SwapNotFound { swap_id: String },

    #[error("Receipt not found: {receipt_id}")]
    ReceiptNotFound { receipt_id: String },

    #[error("Swap already exists for chain {from_chain_id} and token {symbol}")]
    SwapAlreadyExists {
        from_chain_id: String,
        symbol: String,
    },

    #[error("Insufficient swap deposit: available {available}, requested {requested}")]
    InsufficientSwapDeposit {
        available: Uint128,
        requested: Uint128,
    },

    // ========================================================================
    // Redemption Errors
    // ========================================================================

    #[error("Receipt {receipt_id} already claimed for swap {swap_id}")]
    AlreadyClaimed {
        swap_id: String,
        receipt_id: String,
    },

    #[error("Leaf hash already recorded: {leaf_hash}")]
    LeafAlreadyRecorded { leaf_hash: String },

    #[error("Merkle proof verification failed for leaf {leaf_hash}")]
    MerkleProofFailed { leaf_hash: String },

    #[error("Leaf hash mismatch: transmitted {transmitted}, computed {computed}")]
    InvalidLeafHash {
        transmitted: String,
        computed: String,
    },

    #[error("Amount {amount} exceeds the cap {cap} and the transfer is not approved")]
    AwaitingApproval { amount: Uint128, cap: Uint128 },
}
