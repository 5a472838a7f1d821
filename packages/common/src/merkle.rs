//! Merkle tree collaborator interface.
//!
//! The Merkle tree contract is maintained by the oracle: it appends one
//! leaf per recorded receipt and serves inclusion proofs. The bridge only
//! ever queries it; tree construction is out of scope here.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Binary;

/// Queries the bridge issues against the Merkle tree contract.
#[cw_serde]
pub enum MerkleQueryMsg {
    /// Index of the most recently recorded leaf in a space, or `None`
    /// when the space is still empty.
    LastLeafIndex { space_id: String },

    /// Static parameters of a space.
    SpaceInfo { space_id: String },

    /// Verify that `leaf_hash` sits at `leaf_index` in the tree spanning
    /// `[tree_start, span_end]`. The verifier regenerates the root for
    /// that span and walks the stored path.
    Verify {
        space_id: String,
        leaf_hash: Binary,
        leaf_index: u64,
        span_end: u64,
    },
}

#[cw_serde]
pub struct LastLeafIndexResponse {
    pub index: Option<u64>,
}

#[cw_serde]
pub struct SpaceInfoResponse {
    /// Maximum number of leaves per constituent tree of the space.
    pub max_leaf_count: u64,
}

#[cw_serde]
pub struct VerifyResponse {
    pub valid: bool,
}
