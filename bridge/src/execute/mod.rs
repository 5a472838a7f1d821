//! Execute message handlers.

pub mod admin;
pub mod config;
pub mod receipt;
pub mod redeem;
pub mod registry;

use cosmwasm_std::{Addr, Coin, Deps, MessageInfo, Uint128};

use common::regiment::{IsMemberResponse, ManagerResponse, RegimentQueryMsg};

use crate::error::ContractError;
use crate::state::{Config, CONFIG};

/// Load config and reject if the bridge is paused.
pub fn load_active_config(deps: Deps) -> Result<Config, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }
    Ok(config)
}

/// Reject callers other than the admin.
pub fn ensure_admin(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Total of an attached denom across the funds list.
pub fn attached_amount(funds: &[Coin], denom: &str) -> Uint128 {
    funds
        .iter()
        .filter(|coin| coin.denom == denom)
        .map(|coin| coin.amount)
        .sum()
}

/// Resolve a regiment's manager via the regiment contract.
pub fn query_regiment_manager(
    deps: Deps,
    config: &Config,
    regiment_id: &str,
) -> Result<Addr, ContractError> {
    let response: ManagerResponse = deps.querier.query_wasm_smart(
        config.regiment_contract.clone(),
        &RegimentQueryMsg::Manager {
            regiment_id: regiment_id.to_string(),
        },
    )?;
    Ok(deps.api.addr_validate(&response.manager)?)
}

/// Whether an address belongs to a regiment's member set.
pub fn is_regiment_member(
    deps: Deps,
    config: &Config,
    regiment_id: &str,
    address: &str,
) -> Result<bool, ContractError> {
    let response: IsMemberResponse = deps.querier.query_wasm_smart(
        config.regiment_contract.clone(),
        &RegimentQueryMsg::IsMember {
            regiment_id: regiment_id.to_string(),
            address: address.to_string(),
        },
    )?;
    Ok(response.is_member)
}

/// Normalize a token key hash to the lowercase hex form used as a
/// storage key. Accepts an optional `0x` prefix.
pub fn normalize_token_key(token_key: &str) -> Result<String, ContractError> {
    let stripped = token_key.strip_prefix("0x").unwrap_or(token_key);
    let bytes = hex::decode(stripped).map_err(|_| ContractError::InvalidMessage {
        reason: format!("token key is not valid hex: {}", token_key),
    })?;
    if bytes.len() != 32 {
        return Err(ContractError::InvalidMessage {
            reason: format!("token key must be 32 bytes, got {}", bytes.len()),
        });
    }
    Ok(hex::encode(bytes))
}
