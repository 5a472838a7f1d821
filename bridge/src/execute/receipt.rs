//! Outbound receipt creation.
//!
//! A receipt moves custody of the bridged amount to the contract, debits
//! both outbound limiters, charges the relay fee in the home denom, and
//! hands the encoded payload to the dispatch contract. Any failure along
//! the way aborts the whole transaction, so a stored receipt always has
//! matching custody, fee, and dispatch effects.

use cosmwasm_std::{
    to_json_binary, BankMsg, Binary, Coin, CosmosMsg, DepsMut, Env, MessageInfo, Response, Uint128,
    WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use common::dispatch::{DispatchExecuteMsg, TokenTransferMetadata};

use crate::codec::{self, ReceiptMessage};
use crate::error::ContractError;
use crate::execute::{attached_amount, load_active_config};
use crate::fee::{calculate_gas_fee, check_price_fluctuation};
use crate::hash::{compute_leaf_hash, compute_token_key, format_receipt_id};
use crate::state::{
    Receipt, CHAIN_CONFIGS, FLUCTUATION_RATIO, GAS_CONFIGS, OUTBOUND_BUCKETS, OUTBOUND_QUOTAS,
    RECEIPTS, RECEIPT_SEQUENCES, TOKENS, TOKEN_WHITELIST,
};

pub fn execute_create_receipt(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    target_chain_id: String,
    symbol: String,
    amount: Uint128,
    target_address: String,
) -> Result<Response, ContractError> {
    let config = load_active_config(deps.as_ref())?;

    let chain_config = CHAIN_CONFIGS
        .may_load(deps.storage, &target_chain_id)?
        .ok_or(ContractError::ChainNotSupported {
            chain_id: target_chain_id.clone(),
        })?;
    let token = TOKENS
        .may_load(deps.storage, &symbol)?
        .ok_or(ContractError::TokenNotRegistered {
            symbol: symbol.clone(),
        })?;
    let whitelisted = TOKEN_WHITELIST
        .may_load(deps.storage, (&target_chain_id, &symbol))?
        .unwrap_or(false);
    if !token.enabled || !whitelisted {
        return Err(ContractError::TokenNotWhitelisted {
            chain_id: target_chain_id,
            symbol,
        });
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "amount must be positive".to_string(),
        });
    }

    // The destination address must decode to the family's canonical
    // byte form before anything is debited.
    let address_bytes = codec::decode_target_address(chain_config.chain_family, &target_address)?;

    // Relay fee: gas-derived when gas parameters exist, otherwise the
    // chain's flat fee. The fluctuation guard runs on every priced
    // creation, not only on ratio updates.
    let fee = match GAS_CONFIGS.may_load(deps.storage, &target_chain_id)? {
        Some(gas_config) => {
            let bound = FLUCTUATION_RATIO.may_load(deps.storage)?.unwrap_or(0);
            check_price_fluctuation(
                gas_config.price_ratio,
                gas_config.previous_price_ratio,
                bound,
            )?;
            calculate_gas_fee(&gas_config)?
        }
        None => chain_config.fee,
    };

    // Both limiters must admit the amount; either rejection rolls back
    // the refresh the other one already persisted.
    let now = env.block.time.seconds();
    let mut daily_remaining = Uint128::MAX;
    let mut bucket_current = Uint128::MAX;
    if let Some(mut quota) = OUTBOUND_QUOTAS.may_load(deps.storage, (&target_chain_id, &symbol))? {
        quota.consume(amount, now)?;
        daily_remaining = quota.remaining_amount;
        OUTBOUND_QUOTAS.save(deps.storage, (&target_chain_id, &symbol), &quota)?;
    }
    if let Some(mut bucket) = OUTBOUND_BUCKETS.may_load(deps.storage, (&target_chain_id, &symbol))?
    {
        bucket.consume(amount, now)?;
        bucket_current = bucket.observed_amount(now);
        OUTBOUND_BUCKETS.save(deps.storage, (&target_chain_id, &symbol), &bucket)?;
    }

    // Custody and fee funds.
    let mut messages: Vec<CosmosMsg> = Vec::new();
    let fee_attached = attached_amount(&info.funds, &config.home_token_denom);
    if token.is_native {
        let denom = &token.denom_or_address;
        let expected = if *denom == config.home_token_denom {
            amount + fee
        } else {
            let token_attached = attached_amount(&info.funds, denom);
            if token_attached < amount {
                return Err(ContractError::InvalidAmount {
                    reason: format!(
                        "attached {} {} does not cover amount {}",
                        token_attached, denom, amount
                    ),
                });
            }
            fee
        };
        if fee_attached < expected {
            return Err(ContractError::InsufficientFee {
                expected,
                got: fee_attached,
            });
        }
    } else {
        if fee_attached < fee {
            return Err(ContractError::InsufficientFee {
                expected: fee,
                got: fee_attached,
            });
        }
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
    if !fee.is_zero() {
        messages.push(CosmosMsg::Bank(BankMsg::Send {
            to_address: config.fee_collector.to_string(),
            amount: vec![Coin {
                denom: config.home_token_denom.clone(),
                amount: fee,
            }],
        }));
    }

    // Allocate the next sequence under the (home chain, target chain,
    // token) key and store the receipt.
    let token_key = compute_token_key(&config.home_chain_id, &target_chain_id, &symbol);
    let key_hex = hex::encode(token_key);
    let sequence = RECEIPT_SEQUENCES
        .may_load(deps.storage, &key_hex)?
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| ContractError::SequenceOverflow {
            token_key: key_hex.clone(),
        })?;
    RECEIPT_SEQUENCES.save(deps.storage, &key_hex, &sequence)?;

    let receipt_id = format_receipt_id(&token_key, sequence);
    let receipt = Receipt {
        symbol: symbol.clone(),
        owner: info.sender.clone(),
        amount,
        target_chain_id: target_chain_id.clone(),
        target_address: target_address.clone(),
        created_at: now,
    };
    RECEIPTS.save(deps.storage, &receipt_id, &receipt)?;

    let leaf_hash = compute_leaf_hash(amount.u128(), &address_bytes, &receipt_id);
    let timestamp = match chain_config.chain_family {
        crate::state::ChainFamily::Tvm => Some(now),
        _ => None,
    };
    let payload = codec::encode_message(
        chain_config.chain_family,
        &ReceiptMessage {
            sequence,
            token_key,
            amount,
            leaf_hash,
            target_address: address_bytes,
            timestamp,
        },
    )?;

    let receiver = codec::decode_target_address(
        chain_config.chain_family,
        &chain_config.contract_address_for_receive,
    )?;
    messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.dispatch_contract.to_string(),
        msg: to_json_binary(&DispatchExecuteMsg::Send {
            target_chain_id: target_chain_id.clone(),
            receiver: Binary::from(receiver),
            payload: Binary::from(payload),
            token_metadata: TokenTransferMetadata {
                symbol: symbol.clone(),
                amount,
            },
        })?,
        funds: vec![],
    }));

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("action", "create_receipt")
        .add_attribute("receipt_id", &receipt_id)
        .add_attribute("owner", info.sender)
        .add_attribute("symbol", symbol)
        .add_attribute("amount", amount)
        .add_attribute("target_chain_id", target_chain_id)
        .add_attribute("target_address", target_address)
        .add_attribute("fee", fee)
        .add_attribute("sequence", sequence.to_string())
        .add_attribute("daily_remaining", daily_remaining)
        .add_attribute("bucket_current", bucket_current))
}
