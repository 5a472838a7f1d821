//! Inbound redemption pipeline.
//!
//! Two entry points converge on one settlement path: `SwapToken`
//! presents a claim directly, `ForwardMessage` carries it inside a
//! fixed-width encoded message from a counterpart chain. Every claim is
//! verified against the Merkle collaborator and settled exactly once;
//! the (swap id, receipt id) ledger entry is the idempotency witness.

use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Binary, Coin, CosmosMsg, Deps, DepsMut, Env, MessageInfo,
    Response, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use common::merkle::{
    LastLeafIndexResponse, MerkleQueryMsg, SpaceInfoResponse, VerifyResponse,
};

use crate::codec::{self, home_address_digest};
use crate::error::ContractError;
use crate::execute::load_active_config;
use crate::hash::{bytes32_to_hex, compute_leaf_hash, format_receipt_id, parse_receipt_id};
use crate::state::{
    Config, SwapInfo, APPROVED_TRANSFERS, CHAIN_CONFIGS, RECORDED_LEAVES, SWAPS, SWAP_AMOUNT_CAPS,
    SWAP_BUCKETS, SWAP_LEDGER, SWAP_PAIRS, SWAP_QUOTAS, TOKENS, TOKEN_TO_SWAP,
};

pub fn execute_swap_token(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    swap_id: String,
    receipt_id: String,
    origin_amount: Uint128,
    receiver: String,
) -> Result<Response, ContractError> {
    let config = load_active_config(deps.as_ref())?;
    let receiver = deps.api.addr_validate(&receiver)?;

    let swap = SWAPS
        .may_load(deps.storage, &swap_id)?
        .ok_or(ContractError::SwapNotFound {
            swap_id: swap_id.clone(),
        })?;
    let chain_config = CHAIN_CONFIGS
        .may_load(deps.storage, &swap.from_chain_id)?
        .ok_or(ContractError::ChainNotSupported {
            chain_id: swap.from_chain_id.clone(),
        })?;

    let (token_key, sequence) = parse_receipt_id(&receipt_id)?;
    let expected_key = hex::encode(token_key);
    let routed = TOKEN_TO_SWAP
        .may_load(deps.storage, (&swap.from_chain_id, &expected_key))?;
    if routed.as_deref() != Some(swap_id.as_str()) {
        return Err(ContractError::InvalidReceiptId {
            receipt_id: receipt_id.clone(),
        });
    }

    // The leaf recorded by the oracle commits the origin amount, the
    // receiver's address digest, and the receipt id.
    let digest = home_address_digest(chain_config.chain_family, receiver.as_str());
    let leaf_hash = compute_leaf_hash(origin_amount.u128(), &digest, &receipt_id);
    verify_leaf(deps.as_ref(), &config, &swap.space_id, &leaf_hash, sequence)?;

    settle(deps, &env, &swap, &receipt_id, origin_amount, receiver, leaf_hash)
}

pub fn execute_forward_message(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    from_chain_id: String,
    sender: Binary,
    message: Binary,
    receiver: String,
) -> Result<Response, ContractError> {
    let config = load_active_config(deps.as_ref())?;
    let receiver = deps.api.addr_validate(&receiver)?;

    let chain_config = CHAIN_CONFIGS
        .may_load(deps.storage, &from_chain_id)?
        .ok_or(ContractError::ChainNotSupported {
            chain_id: from_chain_id.clone(),
        })?;

    // Only the registered bridge contract on the source chain may
    // originate messages.
    let expected_sender =
        codec::decode_target_address(chain_config.chain_family, &chain_config.contract_address)?;
    if sender.as_slice() != expected_sender.as_slice() {
        return Err(ContractError::InvalidMessage {
            reason: "sender is not the registered source bridge contract".to_string(),
        });
    }

    let decoded = codec::decode_message(chain_config.chain_family, message.as_slice())?;
    if decoded.sequence == 0 {
        return Err(ContractError::InvalidMessage {
            reason: "sequence must be positive".to_string(),
        });
    }

    let key_hex = hex::encode(decoded.token_key);
    let swap_id = TOKEN_TO_SWAP
        .may_load(deps.storage, (&from_chain_id, &key_hex))?
        .ok_or_else(|| ContractError::InvalidMessage {
            reason: format!(
                "no swap registered for token key {}",
                bytes32_to_hex(&decoded.token_key)
            ),
        })?;
    let swap = SWAPS
        .may_load(deps.storage, &swap_id)?
        .ok_or(ContractError::SwapNotFound {
            swap_id: swap_id.clone(),
        })?;

    // Replay check on the transmitted leaf before any recomputation.
    if RECORDED_LEAVES.has(deps.storage, &decoded.leaf_hash) {
        return Err(ContractError::LeafAlreadyRecorded {
            leaf_hash: bytes32_to_hex(&decoded.leaf_hash),
        });
    }

    // The message's target slot must commit to the claimed receiver.
    let digest = home_address_digest(chain_config.chain_family, receiver.as_str());
    if digest != decoded.target_address {
        return Err(ContractError::InvalidAddress {
            reason: format!("receiver {} does not match the message target", receiver),
        });
    }

    // Recompute the leaf from the decoded fields; a mismatch means the
    // message was tampered with in flight.
    let receipt_id = format_receipt_id(&decoded.token_key, decoded.sequence);
    let computed = compute_leaf_hash(decoded.amount.u128(), &digest, &receipt_id);
    if computed != decoded.leaf_hash {
        return Err(ContractError::InvalidLeafHash {
            transmitted: bytes32_to_hex(&decoded.leaf_hash),
            computed: bytes32_to_hex(&computed),
        });
    }

    verify_leaf(
        deps.as_ref(),
        &config,
        &swap.space_id,
        &decoded.leaf_hash,
        decoded.sequence,
    )?;

    settle(
        deps,
        &env,
        &swap,
        &receipt_id,
        decoded.amount,
        receiver,
        decoded.leaf_hash,
    )
}

/// Check the leaf is included in its space's Merkle tree.
///
/// The leaf index is `sequence - 1`; the proof span is the constituent
/// tree containing the leaf, truncated at the last recorded leaf.
fn verify_leaf(
    deps: Deps,
    config: &Config,
    space_id: &str,
    leaf_hash: &[u8; 32],
    sequence: u64,
) -> Result<(), ContractError> {
    let failed = || ContractError::MerkleProofFailed {
        leaf_hash: bytes32_to_hex(leaf_hash),
    };

    let last: LastLeafIndexResponse = deps.querier.query_wasm_smart(
        config.merkle_contract.clone(),
        &MerkleQueryMsg::LastLeafIndex {
            space_id: space_id.to_string(),
        },
    )?;
    let last_leaf_index = last.index.ok_or_else(failed)?;
    let leaf_index = sequence - 1;
    if leaf_index > last_leaf_index {
        return Err(failed());
    }

    let space: SpaceInfoResponse = deps.querier.query_wasm_smart(
        config.merkle_contract.clone(),
        &MerkleQueryMsg::SpaceInfo {
            space_id: space_id.to_string(),
        },
    )?;
    if space.max_leaf_count == 0 {
        return Err(failed());
    }
    let tree_start = leaf_index / space.max_leaf_count * space.max_leaf_count;
    let span_end = (tree_start + space.max_leaf_count - 1).min(last_leaf_index);

    let verdict: VerifyResponse = deps.querier.query_wasm_smart(
        config.merkle_contract.clone(),
        &MerkleQueryMsg::Verify {
            space_id: space_id.to_string(),
            leaf_hash: Binary::from(leaf_hash.as_slice()),
            leaf_index,
            span_end,
        },
    )?;
    if !verdict.valid {
        return Err(failed());
    }
    Ok(())
}

/// Settle a verified claim exactly once.
fn settle(
    deps: DepsMut,
    env: &Env,
    swap: &SwapInfo,
    receipt_id: &str,
    origin_amount: Uint128,
    receiver: Addr,
    leaf_hash: [u8; 32],
) -> Result<Response, ContractError> {
    let swap_id = swap.swap_id.as_str();
    if SWAP_LEDGER.has(deps.storage, (swap_id, receipt_id)) {
        return Err(ContractError::AlreadyClaimed {
            swap_id: swap_id.to_string(),
            receipt_id: receipt_id.to_string(),
        });
    }

    // Convert origin units into home-token units, rounding down.
    let amount = origin_amount.multiply_ratio(swap.swap_ratio.target_share, swap.swap_ratio.origin_share);
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "converted amount is zero".to_string(),
        });
    }

    // Inbound limiters run on the converted home-token amount.
    let now = env.block.time.seconds();
    let mut daily_remaining = Uint128::MAX;
    let mut bucket_current = Uint128::MAX;
    if let Some(mut quota) = SWAP_QUOTAS.may_load(deps.storage, swap_id)? {
        quota.consume(amount, now)?;
        daily_remaining = quota.remaining_amount;
        SWAP_QUOTAS.save(deps.storage, swap_id, &quota)?;
    }
    if let Some(mut bucket) = SWAP_BUCKETS.may_load(deps.storage, swap_id)? {
        bucket.consume(amount, now)?;
        bucket_current = bucket.observed_amount(now);
        SWAP_BUCKETS.save(deps.storage, swap_id, &bucket)?;
    }

    // Above-cap payouts wait for an explicit admin approval.
    if let Some(cap) = SWAP_AMOUNT_CAPS.may_load(deps.storage, &swap.symbol)? {
        let approved = APPROVED_TRANSFERS
            .may_load(deps.storage, (swap_id, receipt_id))?
            .unwrap_or(false);
        if amount > cap && !approved {
            return Err(ContractError::AwaitingApproval { amount, cap });
        }
    }

    let mut pair = SWAP_PAIRS
        .may_load(deps.storage, swap_id)?
        .ok_or(ContractError::SwapNotFound {
            swap_id: swap_id.to_string(),
        })?;
    if pair.deposit_amount < amount {
        return Err(ContractError::InsufficientSwapDeposit {
            available: pair.deposit_amount,
            requested: amount,
        });
    }
    pair.deposit_amount -= amount;
    pair.swapped_amount += amount;
    pair.swapped_times += 1;
    SWAP_PAIRS.save(deps.storage, swap_id, &pair)?;

    let token = TOKENS
        .may_load(deps.storage, &swap.symbol)?
        .ok_or(ContractError::TokenNotRegistered {
            symbol: swap.symbol.clone(),
        })?;
    let payout: CosmosMsg = if token.is_native {
        CosmosMsg::Bank(BankMsg::Send {
            to_address: receiver.to_string(),
            amount: vec![Coin {
                denom: token.denom_or_address.clone(),
                amount,
            }],
        })
    } else {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: token.denom_or_address.clone(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: receiver.to_string(),
                amount,
            })?,
            funds: vec![],
        })
    };

    SWAP_LEDGER.save(
        deps.storage,
        (swap_id, receipt_id),
        &crate::state::SwapAmounts {
            receiver: receiver.clone(),
            amount,
        },
    )?;
    RECORDED_LEAVES.save(deps.storage, &leaf_hash, &true)?;

    Ok(Response::new()
        .add_message(payout)
        .add_attribute("action", "token_swapped")
        .add_attribute("swap_id", swap_id)
        .add_attribute("receipt_id", receipt_id)
        .add_attribute("receiver", receiver)
        .add_attribute("origin_amount", origin_amount)
        .add_attribute("amount", amount)
        .add_attribute("leaf_hash", bytes32_to_hex(&leaf_hash))
        .add_attribute("daily_remaining", daily_remaining)
        .add_attribute("bucket_current", bucket_current))
}
