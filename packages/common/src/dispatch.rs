//! Message dispatch collaborator interface.
//!
//! Outbound receipts are handed to a dispatcher contract which owns the
//! transport to the destination chain (relayer set, batching, retries).
//! The bridge submits the encoded payload and token-transfer metadata in
//! a single fire-and-forget execute call.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};

#[cw_serde]
pub enum DispatchExecuteMsg {
    Send {
        /// Destination chain identifier as registered with the bridge.
        target_chain_id: String,
        /// Receiving contract on the destination chain, raw bytes.
        receiver: Binary,
        /// Fixed-width encoded receipt message.
        payload: Binary,
        /// Token transfer metadata accompanying the payload.
        token_metadata: TokenTransferMetadata,
    },
}

/// Token movement the destination chain should perform on delivery.
#[cw_serde]
pub struct TokenTransferMetadata {
    pub symbol: String,
    pub amount: Uint128,
}
