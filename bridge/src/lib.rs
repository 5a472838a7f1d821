//! Crossflow Bridge Contract - Cross-Chain Value Transfer
//!
//! This contract is the transactional core of a cross-chain bridge: it
//! turns outbound transfer requests into sequenced, Merkle-provable
//! receipts and settles inbound, proof-verified redemptions exactly once.
//!
//! # Outbound Flow (Receipts)
//! 1. User creates a receipt, moving token custody to this contract and
//!    paying the gas-derived relay fee
//! 2. The encoded receipt message is handed to the dispatch contract
//! 3. The oracle records the receipt's leaf in the Merkle tree; the
//!    destination chain releases funds against the proof
//!
//! # Inbound Flow (Swaps)
//! 1. The counterpart chain mints a receipt and the oracle records its
//!    leaf into the swap's Merkle space
//! 2. A relayer forwards the encoded message (or the claim directly)
//! 3. The contract verifies Merkle inclusion, converts by the swap
//!    ratio, and pays the receiver from the swap's deposit pool
//!
//! # Security
//! - Dual-layer rate limiting (daily quota + token bucket) on both
//!   directions
//! - Per-claim exactly-once settlement ledger and leaf replay guard
//! - Price fluctuation circuit breaker on relay fees
//! - Above-cap payouts require explicit admin approval
//! - Emergency pause functionality

pub mod codec;
pub mod contract;
pub mod error;
mod execute;
pub mod fee;
pub mod hash;
pub mod limiter;
pub mod msg;
mod query;
pub mod state;

pub use crate::codec::{decode_message, encode_message, ReceiptMessage};
pub use crate::error::ContractError;
pub use crate::fee::calculate_gas_fee;
pub use crate::hash::{compute_leaf_hash, compute_token_key, keccak256};
