//! Contract entry points.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{admin, config, receipt, redeem, registry};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        admin: deps.api.addr_validate(&msg.admin)?,
        pause_controller: deps.api.addr_validate(&msg.pause_controller)?,
        paused: false,
        home_chain_id: msg.home_chain_id,
        home_token_denom: msg.home_token_denom,
        fee_collector: deps.api.addr_validate(&msg.fee_collector)?,
        merkle_contract: deps.api.addr_validate(&msg.merkle_contract)?,
        regiment_contract: deps.api.addr_validate(&msg.regiment_contract)?,
        dispatch_contract: deps.api.addr_validate(&msg.dispatch_contract)?,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("home_chain_id", config.home_chain_id))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateReceipt {
            target_chain_id,
            symbol,
            amount,
            target_address,
        } => receipt::execute_create_receipt(
            deps,
            env,
            info,
            target_chain_id,
            symbol,
            amount,
            target_address,
        ),
        ExecuteMsg::SwapToken {
            swap_id,
            receipt_id,
            origin_amount,
            receiver,
        } => redeem::execute_swap_token(deps, env, info, swap_id, receipt_id, origin_amount, receiver),
        ExecuteMsg::ForwardMessage {
            from_chain_id,
            sender,
            message,
            receiver,
        } => redeem::execute_forward_message(
            deps,
            env,
            info,
            from_chain_id,
            sender,
            message,
            receiver,
        ),
        ExecuteMsg::CreateSwap {
            regiment_id,
            space_id,
            from_chain_id,
            symbol,
            swap_ratio,
        } => registry::execute_create_swap(
            deps,
            env,
            info,
            regiment_id,
            space_id,
            from_chain_id,
            symbol,
            swap_ratio,
        ),
        ExecuteMsg::Deposit { swap_id, amount } => {
            registry::execute_deposit(deps, env, info, swap_id, amount)
        }
        ExecuteMsg::Withdraw { swap_id, amount } => {
            registry::execute_withdraw(deps, env, info, swap_id, amount)
        }
        ExecuteMsg::ChangeSwapRatio { swap_id, swap_ratio } => {
            registry::execute_change_swap_ratio(deps, info, swap_id, swap_ratio)
        }
        ExecuteMsg::ApproveTransfer { swap_id, receipt_id } => {
            admin::execute_approve_transfer(deps, info, swap_id, receipt_id)
        }
        ExecuteMsg::SetToken { symbol, token } => {
            config::execute_set_token(deps, info, symbol, token)
        }
        ExecuteMsg::AddTokenWhitelist {
            target_chain_id,
            symbols,
        } => config::execute_add_token_whitelist(deps, info, target_chain_id, symbols),
        ExecuteMsg::RemoveTokenWhitelist {
            target_chain_id,
            symbols,
        } => config::execute_remove_token_whitelist(deps, info, target_chain_id, symbols),
        ExecuteMsg::SetOutboundQuotas { configs } => {
            config::execute_set_outbound_quotas(deps, env, info, configs)
        }
        ExecuteMsg::SetSwapQuotas { configs } => {
            config::execute_set_swap_quotas(deps, env, info, configs)
        }
        ExecuteMsg::SetOutboundBuckets { configs } => {
            config::execute_set_outbound_buckets(deps, env, info, configs)
        }
        ExecuteMsg::SetSwapBuckets { configs } => {
            config::execute_set_swap_buckets(deps, env, info, configs)
        }
        ExecuteMsg::SetChainConfig { config: chain_config } => {
            config::execute_set_chain_config(deps, info, chain_config)
        }
        ExecuteMsg::SetGasPrice {
            chain_id,
            gas_limit,
            gas_price,
        } => config::execute_set_gas_price(deps, info, chain_id, gas_limit, gas_price),
        ExecuteMsg::SetPriceRatio {
            chain_id,
            price_ratio,
        } => config::execute_set_price_ratio(deps, info, chain_id, price_ratio),
        ExecuteMsg::SetFeeFloatingRatio {
            chain_id,
            floating_ratio,
        } => config::execute_set_fee_floating_ratio(deps, info, chain_id, floating_ratio),
        ExecuteMsg::SetFluctuationRatio { percent } => {
            config::execute_set_fluctuation_ratio(deps, info, percent)
        }
        ExecuteMsg::SetSwapCap { symbol, max_amount } => {
            config::execute_set_swap_cap(deps, info, symbol, max_amount)
        }
        ExecuteMsg::SetTokenSwapRoute {
            from_chain_id,
            token_key,
            swap_id,
        } => config::execute_set_token_swap_route(deps, info, from_chain_id, token_key, swap_id),
        ExecuteMsg::UpdateCollaborators {
            merkle_contract,
            regiment_contract,
            dispatch_contract,
        } => config::execute_update_collaborators(
            deps,
            info,
            merkle_contract,
            regiment_contract,
            dispatch_contract,
        ),
        ExecuteMsg::SetFeeCollector { address } => {
            config::execute_set_fee_collector(deps, info, address)
        }
        ExecuteMsg::Pause {} => admin::execute_pause(deps, info),
        ExecuteMsg::Unpause {} => admin::execute_unpause(deps, info),
        ExecuteMsg::ProposeAdmin { new_admin } => {
            admin::execute_propose_admin(deps, info, new_admin)
        }
        ExecuteMsg::AcceptAdmin {} => admin::execute_accept_admin(deps, info),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => Ok(to_json_binary(&query::query_config(deps)?)?),
        QueryMsg::Receipt { receipt_id } => {
            Ok(to_json_binary(&query::query_receipt(deps, receipt_id)?)?)
        }
        QueryMsg::ReceiptSequence {
            target_chain_id,
            symbol,
        } => Ok(to_json_binary(&query::query_receipt_sequence(
            deps,
            target_chain_id,
            symbol,
        )?)?),
        QueryMsg::OutboundLimits {
            target_chain_id,
            symbol,
        } => Ok(to_json_binary(&query::query_outbound_limits(
            deps,
            env,
            target_chain_id,
            symbol,
        )?)?),
        QueryMsg::SwapLimits { swap_id } => {
            Ok(to_json_binary(&query::query_swap_limits(deps, env, swap_id)?)?)
        }
        QueryMsg::MinWaitSeconds {
            target_chain_id,
            symbol,
            amount,
        } => Ok(to_json_binary(&query::query_min_wait_seconds(
            deps,
            target_chain_id,
            symbol,
            amount,
        )?)?),
        QueryMsg::Swap { swap_id } => Ok(to_json_binary(&query::query_swap(deps, swap_id)?)?),
        QueryMsg::SwapByPair {
            from_chain_id,
            symbol,
        } => Ok(to_json_binary(&query::query_swap_by_pair(
            deps,
            from_chain_id,
            symbol,
        )?)?),
        QueryMsg::SwapPair { swap_id } => {
            Ok(to_json_binary(&query::query_swap_pair(deps, swap_id)?)?)
        }
        QueryMsg::SwapAmounts {
            swap_id,
            receipt_id,
        } => Ok(to_json_binary(&query::query_swap_amounts(
            deps, swap_id, receipt_id,
        )?)?),
        QueryMsg::LeafRecorded { leaf_hash } => {
            Ok(to_json_binary(&query::query_leaf_recorded(deps, leaf_hash)?)?)
        }
        QueryMsg::ChainConfig { chain_id } => {
            Ok(to_json_binary(&query::query_chain_config(deps, chain_id)?)?)
        }
        QueryMsg::GasConfig { chain_id } => {
            Ok(to_json_binary(&query::query_gas_config(deps, chain_id)?)?)
        }
        QueryMsg::Token { symbol } => Ok(to_json_binary(&query::query_token(deps, symbol)?)?),
        QueryMsg::TokenWhitelisted {
            target_chain_id,
            symbol,
        } => Ok(to_json_binary(&query::query_token_whitelisted(
            deps,
            target_chain_id,
            symbol,
        )?)?),
        QueryMsg::CalculateFee { chain_id } => {
            Ok(to_json_binary(&query::query_calculate_fee(deps, chain_id)?)?)
        }
        QueryMsg::SwapCap { symbol } => Ok(to_json_binary(&query::query_swap_cap(deps, symbol)?)?),
        QueryMsg::Chains { start_after, limit } => {
            Ok(to_json_binary(&query::query_chains(deps, start_after, limit)?)?)
        }
        QueryMsg::Swaps { start_after, limit } => {
            Ok(to_json_binary(&query::query_swaps(deps, start_after, limit)?)?)
        }
        QueryMsg::PendingAdmin {} => Ok(to_json_binary(&query::query_pending_admin(deps)?)?),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new().add_attribute("action", "migrate"))
}
