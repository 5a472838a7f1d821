//! Pause control, admin handover, and above-cap approvals.

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use crate::error::ContractError;
use crate::execute::ensure_admin;
use crate::state::{
    PendingAdmin, APPROVED_TRANSFERS, CONFIG, PENDING_ADMIN, SWAPS, SWAP_LEDGER,
};

pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.pause_controller && info.sender != config.admin {
        return Err(ContractError::UnauthorizedPauseController);
    }

    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "pause")
        .add_attribute("by", info.sender))
}

pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.pause_controller && info.sender != config.admin {
        return Err(ContractError::UnauthorizedPauseController);
    }

    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "unpause")
        .add_attribute("by", info.sender))
}

pub fn execute_propose_admin(
    deps: DepsMut,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let new_address = deps.api.addr_validate(&new_admin)?;
    PENDING_ADMIN.save(deps.storage, &PendingAdmin { new_address: new_address.clone() })?;

    Ok(Response::new()
        .add_attribute("action", "propose_admin")
        .add_attribute("new_admin", new_address))
}

pub fn execute_accept_admin(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let pending = PENDING_ADMIN
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingAdmin)?;
    if info.sender != pending.new_address {
        return Err(ContractError::UnauthorizedPendingAdmin);
    }

    let mut config = CONFIG.load(deps.storage)?;
    config.admin = pending.new_address;
    CONFIG.save(deps.storage, &config)?;
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "accept_admin")
        .add_attribute("admin", config.admin))
}

pub fn execute_approve_transfer(
    deps: DepsMut,
    info: MessageInfo,
    swap_id: String,
    receipt_id: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    if !SWAPS.has(deps.storage, &swap_id) {
        return Err(ContractError::SwapNotFound { swap_id });
    }
    if SWAP_LEDGER.has(deps.storage, (&swap_id, &receipt_id)) {
        return Err(ContractError::AlreadyClaimed { swap_id, receipt_id });
    }
    APPROVED_TRANSFERS.save(deps.storage, (&swap_id, &receipt_id), &true)?;

    Ok(Response::new()
        .add_attribute("action", "approve_transfer")
        .add_attribute("swap_id", swap_id)
        .add_attribute("receipt_id", receipt_id))
}
