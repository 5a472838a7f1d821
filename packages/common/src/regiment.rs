//! Regiment membership collaborator interface.
//!
//! A regiment is an authorization group with one manager and a member
//! set. Swap administration (deposits, withdrawals, ratio changes) is
//! gated on regiment roles; the bridge queries the regiment contract and
//! never stores membership itself.

use cosmwasm_schema::cw_serde;

#[cw_serde]
pub enum RegimentQueryMsg {
    Manager { regiment_id: String },
    IsMember { regiment_id: String, address: String },
}

#[cw_serde]
pub struct ManagerResponse {
    pub manager: String,
}

#[cw_serde]
pub struct IsMemberResponse {
    pub is_member: bool,
}
