//! Swap registry: creation and pool management.
//!
//! Swaps are administered through regiment roles, not the contract
//! admin: the regiment manager creates the swap and controls its ratio
//! and withdrawals, members fund the pool.

use cosmwasm_std::{
    to_json_binary, BankMsg, Coin, CosmosMsg, DepsMut, Env, MessageInfo, Response, Uint128,
    WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use crate::error::ContractError;
use crate::execute::{
    attached_amount, is_regiment_member, load_active_config, query_regiment_manager,
};
use crate::hash::{compute_token_key, keccak256};
use crate::state::{
    SwapInfo, SwapPairInfo, SwapRatio, CHAIN_CONFIGS, SWAPS, SWAP_BY_PAIR, SWAP_PAIRS, TOKENS,
    TOKEN_TO_SWAP,
};

fn validate_ratio(ratio: &SwapRatio) -> Result<(), ContractError> {
    if ratio.origin_share.is_zero() || ratio.target_share.is_zero() {
        return Err(ContractError::InvalidSwapRatio);
    }
    Ok(())
}

pub fn execute_create_swap(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    regiment_id: String,
    space_id: String,
    from_chain_id: String,
    symbol: String,
    swap_ratio: SwapRatio,
) -> Result<Response, ContractError> {
    let config = load_active_config(deps.as_ref())?;

    let manager = query_regiment_manager(deps.as_ref(), &config, &regiment_id)?;
    if info.sender != manager {
        return Err(ContractError::NotRegimentManager);
    }

    if !CHAIN_CONFIGS.has(deps.storage, &from_chain_id) {
        return Err(ContractError::ChainNotSupported {
            chain_id: from_chain_id,
        });
    }
    if !TOKENS.has(deps.storage, &symbol) {
        return Err(ContractError::TokenNotRegistered { symbol });
    }
    validate_ratio(&swap_ratio)?;

    if SWAP_BY_PAIR.has(deps.storage, (&from_chain_id, &symbol)) {
        return Err(ContractError::SwapAlreadyExists {
            from_chain_id,
            symbol,
        });
    }

    // Deterministic swap id over the identifying tuple.
    let mut seed = Vec::new();
    seed.extend_from_slice(&keccak256(from_chain_id.as_bytes()));
    seed.extend_from_slice(&keccak256(symbol.as_bytes()));
    seed.extend_from_slice(&keccak256(space_id.as_bytes()));
    let swap_id = hex::encode(keccak256(&seed));

    let swap = SwapInfo {
        swap_id: swap_id.clone(),
        regiment_id,
        space_id,
        from_chain_id: from_chain_id.clone(),
        symbol: symbol.clone(),
        swap_ratio,
    };
    SWAPS.save(deps.storage, &swap_id, &swap)?;
    SWAP_BY_PAIR.save(deps.storage, (&from_chain_id, &symbol), &swap_id)?;
    SWAP_PAIRS.save(
        deps.storage,
        &swap_id,
        &SwapPairInfo {
            deposit_amount: Uint128::zero(),
            swapped_amount: Uint128::zero(),
            swapped_times: 0,
        },
    )?;

    // Receipts minted on the source chain are keyed under its own
    // (home, target, symbol) tuple, so the inbound route can be derived
    // here and overridden later if the counterpart diverges.
    let token_key = compute_token_key(&from_chain_id, &config.home_chain_id, &symbol);
    let key_hex = hex::encode(token_key);
    TOKEN_TO_SWAP.save(deps.storage, (&from_chain_id, &key_hex), &swap_id)?;

    Ok(Response::new()
        .add_attribute("action", "create_swap")
        .add_attribute("swap_id", swap_id)
        .add_attribute("from_chain_id", from_chain_id)
        .add_attribute("symbol", symbol)
        .add_attribute("token_key", key_hex))
}

pub fn execute_deposit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    swap_id: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = load_active_config(deps.as_ref())?;
    let swap = SWAPS
        .may_load(deps.storage, &swap_id)?
        .ok_or(ContractError::SwapNotFound {
            swap_id: swap_id.clone(),
        })?;

    let manager = query_regiment_manager(deps.as_ref(), &config, &swap.regiment_id)?;
    if info.sender != manager
        && !is_regiment_member(deps.as_ref(), &config, &swap.regiment_id, info.sender.as_str())?
    {
        return Err(ContractError::NotRegimentMember);
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "deposit amount must be positive".to_string(),
        });
    }

    let token = TOKENS
        .may_load(deps.storage, &swap.symbol)?
        .ok_or(ContractError::TokenNotRegistered {
            symbol: swap.symbol.clone(),
        })?;
    let mut messages: Vec<CosmosMsg> = Vec::new();
    if token.is_native {
        let attached = attached_amount(&info.funds, &token.denom_or_address);
        if attached < amount {
            return Err(ContractError::InvalidAmount {
                reason: format!(
                    "attached {} {} does not cover deposit {}",
                    attached, token.denom_or_address, amount
                ),
            });
        }
    } else {
        messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: token.denom_or_address.clone(),
            msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
                owner: info.sender.to_string(),
                recipient: env.contract.address.to_string(),
                amount,
            })?,
            funds: vec![],
        }));
    }

    let mut pair = SWAP_PAIRS
        .may_load(deps.storage, &swap_id)?
        .ok_or(ContractError::SwapNotFound {
            swap_id: swap_id.clone(),
        })?;
    pair.deposit_amount += amount;
    SWAP_PAIRS.save(deps.storage, &swap_id, &pair)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("action", "deposit")
        .add_attribute("swap_id", swap_id)
        .add_attribute("depositor", info.sender)
        .add_attribute("amount", amount)
        .add_attribute("deposit_amount", pair.deposit_amount))
}

pub fn execute_withdraw(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    swap_id: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = load_active_config(deps.as_ref())?;
    let swap = SWAPS
        .may_load(deps.storage, &swap_id)?
        .ok_or(ContractError::SwapNotFound {
            swap_id: swap_id.clone(),
        })?;

    let manager = query_regiment_manager(deps.as_ref(), &config, &swap.regiment_id)?;
    if info.sender != manager {
        return Err(ContractError::NotRegimentManager);
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "withdraw amount must be positive".to_string(),
        });
    }

    let mut pair = SWAP_PAIRS
        .may_load(deps.storage, &swap_id)?
        .ok_or(ContractError::SwapNotFound {
            swap_id: swap_id.clone(),
        })?;
    if pair.deposit_amount < amount {
        return Err(ContractError::InsufficientSwapDeposit {
            available: pair.deposit_amount,
            requested: amount,
        });
    }
    pair.deposit_amount -= amount;
    SWAP_PAIRS.save(deps.storage, &swap_id, &pair)?;

    let token = TOKENS
        .may_load(deps.storage, &swap.symbol)?
        .ok_or(ContractError::TokenNotRegistered {
            symbol: swap.symbol.clone(),
        })?;
    let payout: CosmosMsg = if token.is_native {
        CosmosMsg::Bank(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![Coin {
                denom: token.denom_or_address.clone(),
                amount,
            }],
        })
    } else {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: token.denom_or_address.clone(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: info.sender.to_string(),
                amount,
            })?,
            funds: vec![],
        })
    };

    Ok(Response::new()
        .add_message(payout)
        .add_attribute("action", "withdraw")
        .add_attribute("swap_id", swap_id)
        .add_attribute("recipient", info.sender)
        .add_attribute("amount", amount)
        .add_attribute("deposit_amount", pair.deposit_amount))
}

pub fn execute_change_swap_ratio(
    deps: DepsMut,
    info: MessageInfo,
    swap_id: String,
    swap_ratio: SwapRatio,
) -> Result<Response, ContractError> {
    let config = load_active_config(deps.as_ref())?;
    let mut swap = SWAPS
        .may_load(deps.storage, &swap_id)?
        .ok_or(ContractError::SwapNotFound {
            swap_id: swap_id.clone(),
        })?;

    let manager = query_regiment_manager(deps.as_ref(), &config, &swap.regiment_id)?;
    if info.sender != manager {
        return Err(ContractError::NotRegimentManager);
    }
    validate_ratio(&swap_ratio)?;

    swap.swap_ratio = swap_ratio.clone();
    SWAPS.save(deps.storage, &swap_id, &swap)?;

    Ok(Response::new()
        .add_attribute("action", "change_swap_ratio")
        .add_attribute("swap_id", swap_id)
        .add_attribute("origin_share", swap_ratio.origin_share)
        .add_attribute("target_share", swap_ratio.target_share))
}
