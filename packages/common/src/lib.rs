//! Common - Shared Collaborator Interfaces for Crossflow Bridge Contracts
//!
//! The bridge core treats the Merkle tree, the regiment membership oracle,
//! and the cross-chain message dispatcher as external contracts. This
//! package defines their wire interfaces so the bridge, the test mocks,
//! and any future collaborator implementations agree on message shapes.

pub mod dispatch;
pub mod merkle;
pub mod regiment;

pub use dispatch::DispatchExecuteMsg;
pub use merkle::{MerkleQueryMsg, SpaceInfoResponse};
pub use regiment::RegimentQueryMsg;
