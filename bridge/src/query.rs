//! Query handlers.
//!
//! Limiter views refresh to query time without persisting, so a reader
//! always sees the values a transfer would be admitted against.
//! Unlimited dimensions (no limiter configured, or bucket disabled) are
//! reported as `Uint128::MAX`.

use cosmwasm_std::{Binary, Deps, Env, Order, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::fee::calculate_gas_fee;
use crate::hash::compute_token_key;
use crate::msg::{
    CalculateFeeResponse, ChainConfigResponse, ChainsResponse, ConfigResponse, GasConfigResponse,
    LeafRecordedResponse, LimitsResponse, MinWaitResponse, PendingAdminResponse, ReceiptResponse,
    ReceiptSequenceResponse, SwapAmountsResponse, SwapCapResponse, SwapPairResponse, SwapResponse,
    SwapsResponse, TokenResponse, TokenWhitelistedResponse,
};
use crate::state::{
    DailyQuota, TokenBucket, CHAIN_CONFIGS, CONFIG, GAS_CONFIGS, OUTBOUND_BUCKETS,
    OUTBOUND_QUOTAS, PENDING_ADMIN, RECEIPTS, RECEIPT_SEQUENCES, RECORDED_LEAVES, SWAPS,
    SWAP_AMOUNT_CAPS, SWAP_BY_PAIR, SWAP_LEDGER, SWAP_PAIRS, SWAP_QUOTAS, SWAP_BUCKETS, TOKENS,
    TOKEN_WHITELIST,
};
use crate::ContractError;

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        pause_controller: config.pause_controller,
        paused: config.paused,
        home_chain_id: config.home_chain_id,
        home_token_denom: config.home_token_denom,
        fee_collector: config.fee_collector,
        merkle_contract: config.merkle_contract,
        regiment_contract: config.regiment_contract,
        dispatch_contract: config.dispatch_contract,
    })
}

pub fn query_receipt(deps: Deps, receipt_id: String) -> Result<ReceiptResponse, ContractError> {
    let receipt = RECEIPTS
        .may_load(deps.storage, &receipt_id)?
        .ok_or(ContractError::ReceiptNotFound { receipt_id })?;
    Ok(ReceiptResponse { receipt })
}

pub fn query_receipt_sequence(
    deps: Deps,
    target_chain_id: String,
    symbol: String,
) -> StdResult<ReceiptSequenceResponse> {
    let config = CONFIG.load(deps.storage)?;
    let token_key = compute_token_key(&config.home_chain_id, &target_chain_id, &symbol);
    let key_hex = hex::encode(token_key);
    let sequence = RECEIPT_SEQUENCES
        .may_load(deps.storage, &key_hex)?
        .unwrap_or(0);
    Ok(ReceiptSequenceResponse {
        token_key: key_hex,
        sequence,
    })
}

fn limits_view(quota: Option<DailyQuota>, bucket: Option<TokenBucket>, now: u64) -> LimitsResponse {
    let (daily_remaining, daily_default, daily_refresh_time) = match quota {
        Some(quota) => (
            quota.observed_remaining(now),
            quota.default_amount,
            quota.refresh_time,
        ),
        None => (Uint128::MAX, Uint128::MAX, 0),
    };
    let (bucket_current, bucket_capacity, bucket_rate) = match bucket {
        Some(bucket) => (
            bucket.observed_amount(now),
            bucket.capacity,
            bucket.rate,
        ),
        None => (Uint128::MAX, Uint128::MAX, Uint128::zero()),
    };
    LimitsResponse {
        daily_remaining,
        daily_default,
        daily_refresh_time,
        bucket_current,
        bucket_capacity,
        bucket_rate,
    }
}

pub fn query_outbound_limits(
    deps: Deps,
    env: Env,
    target_chain_id: String,
    symbol: String,
) -> StdResult<LimitsResponse> {
    let key = (target_chain_id.as_str(), symbol.as_str());
    let quota = OUTBOUND_QUOTAS.may_load(deps.storage, key)?;
    let bucket = OUTBOUND_BUCKETS.may_load(deps.storage, key)?;
    Ok(limits_view(quota, bucket, env.block.time.seconds()))
}

pub fn query_swap_limits(deps: Deps, env: Env, swap_id: String) -> StdResult<LimitsResponse> {
    let quota = SWAP_QUOTAS.may_load(deps.storage, &swap_id)?;
    let bucket = SWAP_BUCKETS.may_load(deps.storage, &swap_id)?;
    Ok(limits_view(quota, bucket, env.block.time.seconds()))
}

pub fn query_min_wait_seconds(
    deps: Deps,
    target_chain_id: String,
    symbol: String,
    amount: Uint128,
) -> StdResult<MinWaitResponse> {
    let bucket = OUTBOUND_BUCKETS.may_load(deps.storage, (&target_chain_id, &symbol))?;
    let wait_seconds = match bucket {
        Some(bucket) => bucket.wait_seconds(amount),
        None => 0,
    };
    Ok(MinWaitResponse { wait_seconds })
}

pub fn query_swap(deps: Deps, swap_id: String) -> Result<SwapResponse, ContractError> {
    let swap = SWAPS
        .may_load(deps.storage, &swap_id)?
        .ok_or(ContractError::SwapNotFound { swap_id })?;
    Ok(SwapResponse { swap })
}

pub fn query_swap_by_pair(
    deps: Deps,
    from_chain_id: String,
    symbol: String,
) -> Result<SwapResponse, ContractError> {
    let swap_id = SWAP_BY_PAIR
        .may_load(deps.storage, (&from_chain_id, &symbol))?
        .ok_or(ContractError::SwapNotFound {
            swap_id: format!("{}/{}", from_chain_id, symbol),
        })?;
    query_swap(deps, swap_id)
}

pub fn query_swap_pair(deps: Deps, swap_id: String) -> Result<SwapPairResponse, ContractError> {
    let pair = SWAP_PAIRS
        .may_load(deps.storage, &swap_id)?
        .ok_or(ContractError::SwapNotFound { swap_id })?;
    Ok(SwapPairResponse {
        deposit_amount: pair.deposit_amount,
        swapped_amount: pair.swapped_amount,
        swapped_times: pair.swapped_times,
    })
}

pub fn query_swap_amounts(
    deps: Deps,
    swap_id: String,
    receipt_id: String,
) -> StdResult<SwapAmountsResponse> {
    let entry = SWAP_LEDGER.may_load(deps.storage, (&swap_id, &receipt_id))?;
    Ok(match entry {
        Some(amounts) => SwapAmountsResponse {
            receiver: Some(amounts.receiver),
            amount: Some(amounts.amount),
        },
        None => SwapAmountsResponse {
            receiver: None,
            amount: None,
        },
    })
}

pub fn query_leaf_recorded(deps: Deps, leaf_hash: Binary) -> StdResult<LeafRecordedResponse> {
    let recorded = RECORDED_LEAVES.has(deps.storage, leaf_hash.as_slice());
    Ok(LeafRecordedResponse { recorded })
}

pub fn query_chain_config(deps: Deps, chain_id: String) -> Result<ChainConfigResponse, ContractError> {
    let config = CHAIN_CONFIGS
        .may_load(deps.storage, &chain_id)?
        .ok_or(ContractError::ChainNotSupported { chain_id })?;
    Ok(ChainConfigResponse { config })
}

pub fn query_gas_config(deps: Deps, chain_id: String) -> Result<GasConfigResponse, ContractError> {
    let config = GAS_CONFIGS
        .may_load(deps.storage, &chain_id)?
        .ok_or(ContractError::ChainNotSupported { chain_id })?;
    Ok(GasConfigResponse { config })
}

pub fn query_token(deps: Deps, symbol: String) -> Result<TokenResponse, ContractError> {
    let token = TOKENS
        .may_load(deps.storage, &symbol)?
        .ok_or(ContractError::TokenNotRegistered {
            symbol: symbol.clone(),
        })?;
    Ok(TokenResponse { symbol, token })
}

pub fn query_token_whitelisted(
    deps: Deps,
    target_chain_id: String,
    symbol: String,
) -> StdResult<TokenWhitelistedResponse> {
    let whitelisted = TOKEN_WHITELIST
        .may_load(deps.storage, (&target_chain_id, &symbol))?
        .unwrap_or(false);
    Ok(TokenWhitelistedResponse { whitelisted })
}

pub fn query_calculate_fee(deps: Deps, chain_id: String) -> Result<CalculateFeeResponse, ContractError> {
    let chain_config = CHAIN_CONFIGS
        .may_load(deps.storage, &chain_id)?
        .ok_or(ContractError::ChainNotSupported {
            chain_id: chain_id.clone(),
        })?;
    let fee = match GAS_CONFIGS.may_load(deps.storage, &chain_id)? {
        Some(gas_config) => calculate_gas_fee(&gas_config)?,
        None => chain_config.fee,
    };
    Ok(CalculateFeeResponse {
        chain_family: chain_config.chain_family,
        fee,
    })
}

pub fn query_swap_cap(deps: Deps, symbol: String) -> StdResult<SwapCapResponse> {
    let max_amount = SWAP_AMOUNT_CAPS.may_load(deps.storage, &symbol)?;
    Ok(SwapCapResponse { max_amount })
}

pub fn query_chains(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<ChainsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);
    let chains = CHAIN_CONFIGS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, config)| config))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(ChainsResponse { chains })
}

pub fn query_swaps(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<SwapsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);
    let swaps = SWAPS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, swap)| swap))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(SwapsResponse { swaps })
}

pub fn query_pending_admin(deps: Deps) -> StdResult<PendingAdminResponse> {
    let pending = PENDING_ADMIN.may_load(deps.storage)?;
    Ok(PendingAdminResponse {
        pending_admin: pending.map(|p| p.new_address),
    })
}
