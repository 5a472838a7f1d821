//! Admin-gated configuration handlers.

use cosmwasm_std::{DepsMut, Env, MessageInfo, Response, Uint128};

use crate::codec::decode_target_address;
use crate::error::ContractError;
use crate::execute::{ensure_admin, normalize_token_key};
use crate::msg::{OutboundBucketConfig, OutboundQuotaConfig, SwapBucketConfig, SwapQuotaConfig};
use crate::state::{
    ChainGasConfig, CrossChainConfig, DailyQuota, TokenBucket, TokenInfo, CHAIN_CONFIGS, CONFIG,
    FLUCTUATION_RATIO, GAS_CONFIGS, OUTBOUND_BUCKETS, OUTBOUND_QUOTAS, SWAPS, SWAP_AMOUNT_CAPS,
    SWAP_BUCKETS, SWAP_QUOTAS, TOKENS, TOKEN_TO_SWAP, TOKEN_WHITELIST,
};

pub fn execute_set_token(
    deps: DepsMut,
    info: MessageInfo,
    symbol: String,
    token: TokenInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    if !token.is_native {
        deps.api.addr_validate(&token.denom_or_address)?;
    }
    TOKENS.save(deps.storage, &symbol, &token)?;

    Ok(Response::new()
        .add_attribute("action", "set_token")
        .add_attribute("symbol", symbol)
        .add_attribute("enabled", token.enabled.to_string()))
}

pub fn execute_add_token_whitelist(
    deps: DepsMut,
    info: MessageInfo,
    target_chain_id: String,
    symbols: Vec<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    for symbol in &symbols {
        if !TOKENS.has(deps.storage, symbol) {
            return Err(ContractError::TokenNotRegistered {
                symbol: symbol.clone(),
            });
        }
        TOKEN_WHITELIST.save(deps.storage, (&target_chain_id, symbol), &true)?;
    }

    Ok(Response::new()
        .add_attribute("action", "add_token_whitelist")
        .add_attribute("target_chain_id", target_chain_id)
        .add_attribute("count", symbols.len().to_string()))
}

pub fn execute_remove_token_whitelist(
    deps: DepsMut,
    info: MessageInfo,
    target_chain_id: String,
    symbols: Vec<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    for symbol in &symbols {
        TOKEN_WHITELIST.remove(deps.storage, (&target_chain_id, symbol));
    }

    Ok(Response::new()
        .add_attribute("action", "remove_token_whitelist")
        .add_attribute("target_chain_id", target_chain_id)
        .add_attribute("count", symbols.len().to_string()))
}

pub fn execute_set_outbound_quotas(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    configs: Vec<OutboundQuotaConfig>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let now = env.block.time.seconds();
    for entry in &configs {
        let key = (entry.target_chain_id.as_str(), entry.symbol.as_str());
        let quota = match OUTBOUND_QUOTAS.may_load(deps.storage, key)? {
            Some(mut quota) => {
                quota.reconfigure(entry.default_amount, entry.refresh_time, now);
                quota
            }
            None => DailyQuota {
                default_amount: entry.default_amount,
                remaining_amount: entry.default_amount,
                refresh_time: entry.refresh_time,
            },
        };
        OUTBOUND_QUOTAS.save(deps.storage, key, &quota)?;
    }

    Ok(Response::new()
        .add_attribute("action", "set_outbound_quotas")
        .add_attribute("count", configs.len().to_string()))
}

pub fn execute_set_swap_quotas(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    configs: Vec<SwapQuotaConfig>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let now = env.block.time.seconds();
    for entry in &configs {
        if !SWAPS.has(deps.storage, &entry.swap_id) {
            return Err(ContractError::SwapNotFound {
                swap_id: entry.swap_id.clone(),
            });
        }
        let quota = match SWAP_QUOTAS.may_load(deps.storage, &entry.swap_id)? {
            Some(mut quota) => {
                quota.reconfigure(entry.default_amount, entry.refresh_time, now);
                quota
            }
            None => DailyQuota {
                default_amount: entry.default_amount,
                remaining_amount: entry.default_amount,
                refresh_time: entry.refresh_time,
            },
        };
        SWAP_QUOTAS.save(deps.storage, &entry.swap_id, &quota)?;
    }

    Ok(Response::new()
        .add_attribute("action", "set_swap_quotas")
        .add_attribute("count", configs.len().to_string()))
}

pub fn execute_set_outbound_buckets(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    configs: Vec<OutboundBucketConfig>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let now = env.block.time.seconds();
    for entry in &configs {
        let key = (entry.target_chain_id.as_str(), entry.symbol.as_str());
        let bucket = match OUTBOUND_BUCKETS.may_load(deps.storage, key)? {
            Some(mut bucket) => {
                bucket.reconfigure(entry.capacity, entry.rate, entry.enabled, now);
                bucket
            }
            None => TokenBucket {
                capacity: entry.capacity,
                current_amount: entry.capacity,
                rate: entry.rate,
                enabled: entry.enabled,
                last_updated: now,
            },
        };
        OUTBOUND_BUCKETS.save(deps.storage, key, &bucket)?;
    }

    Ok(Response::new()
        .add_attribute("action", "set_outbound_buckets")
        .add_attribute("count", configs.len().to_string()))
}

pub fn execute_set_swap_buckets(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    configs: Vec<SwapBucketConfig>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let now = env.block.time.seconds();
    for entry in &configs {
        if !SWAPS.has(deps.storage, &entry.swap_id) {
            return Err(ContractError::SwapNotFound {
                swap_id: entry.swap_id.clone(),
            });
        }
        let bucket = match SWAP_BUCKETS.may_load(deps.storage, &entry.swap_id)? {
            Some(mut bucket) => {
                bucket.reconfigure(entry.capacity, entry.rate, entry.enabled, now);
                bucket
            }
            None => TokenBucket {
                capacity: entry.capacity,
                current_amount: entry.capacity,
                rate: entry.rate,
                enabled: entry.enabled,
                last_updated: now,
            },
        };
        SWAP_BUCKETS.save(deps.storage, &entry.swap_id, &bucket)?;
    }

    Ok(Response::new()
        .add_attribute("action", "set_swap_buckets")
        .add_attribute("count", configs.len().to_string()))
}

pub fn execute_set_chain_config(
    deps: DepsMut,
    info: MessageInfo,
    chain_config: CrossChainConfig,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    // Both endpoint addresses must decode in the chain's family.
    decode_target_address(chain_config.chain_family, &chain_config.contract_address)?;
    decode_target_address(
        chain_config.chain_family,
        &chain_config.contract_address_for_receive,
    )?;
    CHAIN_CONFIGS.save(deps.storage, &chain_config.chain_id, &chain_config)?;

    Ok(Response::new()
        .add_attribute("action", "set_chain_config")
        .add_attribute("chain_id", chain_config.chain_id)
        .add_attribute("chain_family", chain_config.chain_family.as_str()))
}

pub fn execute_set_gas_price(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: String,
    gas_limit: u64,
    gas_price: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    if !CHAIN_CONFIGS.has(deps.storage, &chain_id) {
        return Err(ContractError::ChainNotSupported { chain_id });
    }
    let mut gas_config = GAS_CONFIGS
        .may_load(deps.storage, &chain_id)?
        .unwrap_or(ChainGasConfig {
            gas_limit: 0,
            gas_price: Uint128::zero(),
            price_ratio: Uint128::zero(),
            previous_price_ratio: Uint128::zero(),
            floating_ratio: None,
        });
    gas_config.gas_limit = gas_limit;
    gas_config.gas_price = gas_price;
    GAS_CONFIGS.save(deps.storage, &chain_id, &gas_config)?;

    Ok(Response::new()
        .add_attribute("action", "set_gas_price")
        .add_attribute("chain_id", chain_id)
        .add_attribute("gas_limit", gas_limit.to_string())
        .add_attribute("gas_price", gas_price))
}

pub fn execute_set_price_ratio(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: String,
    price_ratio: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let mut gas_config = GAS_CONFIGS
        .may_load(deps.storage, &chain_id)?
        .ok_or(ContractError::ChainNotSupported {
            chain_id: chain_id.clone(),
        })?;
    gas_config.previous_price_ratio = gas_config.price_ratio;
    gas_config.price_ratio = price_ratio;
    GAS_CONFIGS.save(deps.storage, &chain_id, &gas_config)?;

    Ok(Response::new()
        .add_attribute("action", "set_price_ratio")
        .add_attribute("chain_id", chain_id)
        .add_attribute("price_ratio", price_ratio)
        .add_attribute("previous_price_ratio", gas_config.previous_price_ratio))
}

pub fn execute_set_fee_floating_ratio(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: String,
    floating_ratio: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let mut gas_config = GAS_CONFIGS
        .may_load(deps.storage, &chain_id)?
        .ok_or(ContractError::ChainNotSupported {
            chain_id: chain_id.clone(),
        })?;
    gas_config.floating_ratio = Some(floating_ratio.clone());
    GAS_CONFIGS.save(deps.storage, &chain_id, &gas_config)?;

    Ok(Response::new()
        .add_attribute("action", "set_fee_floating_ratio")
        .add_attribute("chain_id", chain_id)
        .add_attribute("floating_ratio", floating_ratio))
}

pub fn execute_set_fluctuation_ratio(
    deps: DepsMut,
    info: MessageInfo,
    percent: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    FLUCTUATION_RATIO.save(deps.storage, &percent)?;

    Ok(Response::new()
        .add_attribute("action", "set_fluctuation_ratio")
        .add_attribute("percent", percent.to_string()))
}

pub fn execute_set_swap_cap(
    deps: DepsMut,
    info: MessageInfo,
    symbol: String,
    max_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    SWAP_AMOUNT_CAPS.save(deps.storage, &symbol, &max_amount)?;

    Ok(Response::new()
        .add_attribute("action", "set_swap_cap")
        .add_attribute("symbol", symbol)
        .add_attribute("max_amount", max_amount))
}

pub fn execute_set_token_swap_route(
    deps: DepsMut,
    info: MessageInfo,
    from_chain_id: String,
    token_key: String,
    swap_id: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    if !SWAPS.has(deps.storage, &swap_id) {
        return Err(ContractError::SwapNotFound { swap_id });
    }
    let key_hex = normalize_token_key(&token_key)?;
    TOKEN_TO_SWAP.save(deps.storage, (&from_chain_id, &key_hex), &swap_id)?;

    Ok(Response::new()
        .add_attribute("action", "set_token_swap_route")
        .add_attribute("from_chain_id", from_chain_id)
        .add_attribute("token_key", key_hex)
        .add_attribute("swap_id", swap_id))
}

pub fn execute_update_collaborators(
    deps: DepsMut,
    info: MessageInfo,
    merkle_contract: Option<String>,
    regiment_contract: Option<String>,
    dispatch_contract: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    if let Some(addr) = merkle_contract {
        config.merkle_contract = deps.api.addr_validate(&addr)?;
    }
    if let Some(addr) = regiment_contract {
        config.regiment_contract = deps.api.addr_validate(&addr)?;
    }
    if let Some(addr) = dispatch_contract {
        config.dispatch_contract = deps.api.addr_validate(&addr)?;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_collaborators")
        .add_attribute("merkle_contract", config.merkle_contract)
        .add_attribute("regiment_contract", config.regiment_contract)
        .add_attribute("dispatch_contract", config.dispatch_contract))
}

pub fn execute_set_fee_collector(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    config.fee_collector = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_fee_collector")
        .add_attribute("fee_collector", config.fee_collector))
}
