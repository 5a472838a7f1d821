//! Integration tests for the Crossflow Bridge contract using cw-multi-test.
//!
//! These tests cover the outbound receipt pipeline, relay fees, rate
//! limiting, pause control, and admin handover.

use cosmwasm_std::{coins, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdResult, Uint128};
use cw20::Cw20ExecuteMsg;
use cw_multi_test::{App, ContractWrapper, Executor};

use bridge::msg::{
    CalculateFeeResponse, ExecuteMsg, InstantiateMsg, LimitsResponse, OutboundBucketConfig,
    OutboundQuotaConfig, PendingAdminResponse, QueryMsg, ReceiptResponse,
    ReceiptSequenceResponse,
};
use bridge::state::{ChainFamily, CrossChainConfig, TokenInfo};

const EVM_BRIDGE: &str = "0x1111111111111111111111111111111111111111";
const EVM_RECEIVER_CONTRACT: &str = "0x2222222222222222222222222222222222222222";
const EVM_USER: &str = "0x3333333333333333333333333333333333333333";

// ============================================================================
// Test Setup
// ============================================================================

fn contract_bridge() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        bridge::contract::execute,
        bridge::contract::instantiate,
        bridge::contract::query,
    );
    Box::new(contract)
}

fn contract_cw20() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

// The dispatch collaborator only needs to accept Send calls.
fn dispatch_execute(
    _deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: common::DispatchExecuteMsg,
) -> Result<Response, cosmwasm_std::StdError> {
    Ok(Response::new().add_attribute("action", "dispatch_send"))
}

fn dispatch_instantiate(
    _deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: Empty,
) -> Result<Response, cosmwasm_std::StdError> {
    Ok(Response::new())
}

fn dispatch_query(_deps: Deps, _env: Env, _msg: Empty) -> StdResult<Binary> {
    cosmwasm_std::to_json_binary(&Empty {})
}

fn contract_dispatch() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(dispatch_execute, dispatch_instantiate, dispatch_query);
    Box::new(contract)
}

struct TestEnv {
    app: App,
    bridge: Addr,
    admin: Addr,
    user: Addr,
    fee_collector: Addr,
}

fn setup() -> TestEnv {
    let mut app = App::default();

    let admin = Addr::unchecked("terra1admin");
    let pauser = Addr::unchecked("terra1pauser");
    let user = Addr::unchecked("terra1user");
    let fee_collector = Addr::unchecked("terra1collector");

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &admin, coins(100_000_00000000, "uluna"))
            .unwrap();
        router
            .bank
            .init_balance(storage, &user, coins(100_000_00000000, "uluna"))
            .unwrap();
    });

    let dispatch_code = app.store_code(contract_dispatch());
    let dispatch = app
        .instantiate_contract(dispatch_code, admin.clone(), &Empty {}, &[], "dispatch", None)
        .unwrap();

    let bridge_code = app.store_code(contract_bridge());
    let bridge = app
        .instantiate_contract(
            bridge_code,
            admin.clone(),
            &InstantiateMsg {
                admin: admin.to_string(),
                pause_controller: pauser.to_string(),
                home_chain_id: "terra".to_string(),
                home_token_denom: "uluna".to_string(),
                fee_collector: fee_collector.to_string(),
                merkle_contract: "terra1merkle".to_string(),
                regiment_contract: "terra1regiment".to_string(),
                dispatch_contract: dispatch.to_string(),
            },
            &[],
            "crossflow-bridge",
            Some(admin.to_string()),
        )
        .unwrap();

    // Register the EVM destination with a flat 5-token relay fee.
    app.execute_contract(
        admin.clone(),
        bridge.clone(),
        &ExecuteMsg::SetChainConfig {
            config: CrossChainConfig {
                chain_id: "ethereum".to_string(),
                chain_family: ChainFamily::Evm,
                contract_address: EVM_BRIDGE.to_string(),
                contract_address_for_receive: EVM_RECEIVER_CONTRACT.to_string(),
                fee: Uint128::new(5_00000000),
            },
        },
        &[],
    )
    .unwrap();

    app.execute_contract(
        admin.clone(),
        bridge.clone(),
        &ExecuteMsg::SetToken {
            symbol: "LUNA".to_string(),
            token: TokenInfo {
                is_native: true,
                denom_or_address: "uluna".to_string(),
                enabled: true,
            },
        },
        &[],
    )
    .unwrap();

    app.execute_contract(
        admin.clone(),
        bridge.clone(),
        &ExecuteMsg::AddTokenWhitelist {
            target_chain_id: "ethereum".to_string(),
            symbols: vec!["LUNA".to_string()],
        },
        &[],
    )
    .unwrap();

    TestEnv {
        app,
        bridge,
        admin,
        user,
        fee_collector,
    }
}

fn create_receipt(
    env: &mut TestEnv,
    amount: u128,
    fee: u128,
) -> cw_multi_test::error::AnyResult<cw_multi_test::AppResponse> {
    let user = env.user.clone();
    env.app.execute_contract(
        user,
        env.bridge.clone(),
        &ExecuteMsg::CreateReceipt {
            target_chain_id: "ethereum".to_string(),
            symbol: "LUNA".to_string(),
            amount: Uint128::new(amount),
            target_address: EVM_USER.to_string(),
        },
        &coins(amount + fee, "uluna"),
    )
}

// ============================================================================
// Outbound Receipts
// ============================================================================

#[test]
fn test_create_receipt_stores_sequenced_receipt() {
    let mut env = setup();
    create_receipt(&mut env, 1000, 5_00000000).unwrap();

    let seq: ReceiptSequenceResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.bridge,
            &QueryMsg::ReceiptSequence {
                target_chain_id: "ethereum".to_string(),
                symbol: "LUNA".to_string(),
            },
        )
        .unwrap();
    assert_eq!(seq.sequence, 1);

    let receipt_id = format!("{}.1", seq.token_key);
    let res: ReceiptResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::Receipt { receipt_id })
        .unwrap();
    assert_eq!(res.receipt.amount, Uint128::new(1000));
    assert_eq!(res.receipt.owner, env.user);
    assert_eq!(res.receipt.target_chain_id, "ethereum");
    assert_eq!(res.receipt.target_address, EVM_USER);

    // Sequences increase without gaps.
    create_receipt(&mut env, 2000, 5_00000000).unwrap();
    let seq: ReceiptSequenceResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.bridge,
            &QueryMsg::ReceiptSequence {
                target_chain_id: "ethereum".to_string(),
                symbol: "LUNA".to_string(),
            },
        )
        .unwrap();
    assert_eq!(seq.sequence, 2);
}

#[test]
fn test_create_receipt_collects_flat_fee() {
    let mut env = setup();
    create_receipt(&mut env, 1000, 5_00000000).unwrap();

    let collected = env
        .app
        .wrap()
        .query_balance(&env.fee_collector, "uluna")
        .unwrap();
    assert_eq!(collected.amount, Uint128::new(5_00000000));

    // Custody of the bridged amount stays with the contract.
    let held = env.app.wrap().query_balance(&env.bridge, "uluna").unwrap();
    assert_eq!(held.amount, Uint128::new(1000));
}

#[test]
fn test_create_receipt_rejects_insufficient_fee() {
    let mut env = setup();
    let err = create_receipt(&mut env, 1000, 1_00000000).unwrap_err();
    assert!(err.root_cause().to_string().contains("Insufficient fee"));
}

#[test]
fn test_create_receipt_rejects_unsupported_chain() {
    let mut env = setup();
    let user = env.user.clone();
    let err = env
        .app
        .execute_contract(
            user,
            env.bridge.clone(),
            &ExecuteMsg::CreateReceipt {
                target_chain_id: "unknown-chain".to_string(),
                symbol: "LUNA".to_string(),
                amount: Uint128::new(1000),
                target_address: EVM_USER.to_string(),
            },
            &coins(6_00000000, "uluna"),
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Chain not supported"));
}

#[test]
fn test_create_receipt_rejects_unwhitelisted_token() {
    let mut env = setup();
    let admin = env.admin.clone();
    env.app
        .execute_contract(
            admin,
            env.bridge.clone(),
            &ExecuteMsg::RemoveTokenWhitelist {
                target_chain_id: "ethereum".to_string(),
                symbols: vec!["LUNA".to_string()],
            },
            &[],
        )
        .unwrap();

    let err = create_receipt(&mut env, 1000, 5_00000000).unwrap_err();
    assert!(err.root_cause().to_string().contains("not whitelisted"));
}

#[test]
fn test_create_receipt_rejects_zero_amount() {
    let mut env = setup();
    let err = create_receipt(&mut env, 0, 5_00000000).unwrap_err();
    assert!(err.root_cause().to_string().contains("must be positive"));
}

#[test]
fn test_create_receipt_rejects_malformed_target_address() {
    let mut env = setup();
    let user = env.user.clone();
    let err = env
        .app
        .execute_contract(
            user,
            env.bridge.clone(),
            &ExecuteMsg::CreateReceipt {
                target_chain_id: "ethereum".to_string(),
                symbol: "LUNA".to_string(),
                amount: Uint128::new(1000),
                target_address: "not-an-address".to_string(),
            },
            &coins(5_00001000, "uluna"),
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Invalid address"));
}

#[test]
fn test_cw20_receipt_pulls_allowance() {
    let mut env = setup();
    let admin = env.admin.clone();
    let user = env.user.clone();

    let cw20_code = env.app.store_code(contract_cw20());
    let token = env
        .app
        .instantiate_contract(
            cw20_code,
            admin.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: "Wrapped Asset".to_string(),
                symbol: "WASSET".to_string(),
                decimals: 8,
                initial_balances: vec![cw20::Cw20Coin {
                    address: user.to_string(),
                    amount: Uint128::new(1_000_000),
                }],
                mint: None,
                marketing: None,
            },
            &[],
            "wasset",
            None,
        )
        .unwrap();

    env.app
        .execute_contract(
            admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetToken {
                symbol: "WASSET".to_string(),
                token: TokenInfo {
                    is_native: false,
                    denom_or_address: token.to_string(),
                    enabled: true,
                },
            },
            &[],
        )
        .unwrap();
    env.app
        .execute_contract(
            admin,
            env.bridge.clone(),
            &ExecuteMsg::AddTokenWhitelist {
                target_chain_id: "ethereum".to_string(),
                symbols: vec!["WASSET".to_string()],
            },
            &[],
        )
        .unwrap();

    env.app
        .execute_contract(
            user.clone(),
            token.clone(),
            &Cw20ExecuteMsg::IncreaseAllowance {
                spender: env.bridge.to_string(),
                amount: Uint128::new(250_000),
                expires: None,
            },
            &[],
        )
        .unwrap();

    env.app
        .execute_contract(
            user,
            env.bridge.clone(),
            &ExecuteMsg::CreateReceipt {
                target_chain_id: "ethereum".to_string(),
                symbol: "WASSET".to_string(),
                amount: Uint128::new(250_000),
                target_address: EVM_USER.to_string(),
            },
            &coins(5_00000000, "uluna"),
        )
        .unwrap();

    let balance: cw20::BalanceResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &token,
            &cw20_base::msg::QueryMsg::Balance {
                address: env.bridge.to_string(),
            },
        )
        .unwrap();
    assert_eq!(balance.balance, Uint128::new(250_000));
}

// ============================================================================
// Fees
// ============================================================================

#[test]
fn test_gas_fee_overrides_flat_fee() {
    let mut env = setup();
    let admin = env.admin.clone();

    env.app
        .execute_contract(
            admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetGasPrice {
                chain_id: "ethereum".to_string(),
                gas_limit: 293_414,
                gas_price: Uint128::new(8_245_816_000),
            },
            &[],
        )
        .unwrap();
    env.app
        .execute_contract(
            admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetPriceRatio {
                chain_id: "ethereum".to_string(),
                price_ratio: Uint128::new(1_052_631_578_947),
            },
            &[],
        )
        .unwrap();
    env.app
        .execute_contract(
            admin,
            env.bridge.clone(),
            &ExecuteMsg::SetFeeFloatingRatio {
                chain_id: "ethereum".to_string(),
                floating_ratio: "1.2".to_string(),
            },
            &[],
        )
        .unwrap();

    let res: CalculateFeeResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.bridge,
            &QueryMsg::CalculateFee {
                chain_id: "ethereum".to_string(),
            },
        )
        .unwrap();
    assert_eq!(res.fee, Uint128::new(31_00000000));

    // The flat fee no longer satisfies the charge.
    let err = create_receipt(&mut env, 1000, 5_00000000).unwrap_err();
    assert!(err.root_cause().to_string().contains("Insufficient fee"));
    create_receipt(&mut env, 1000, 31_00000000).unwrap();
}

#[test]
fn test_fluctuation_guard_blocks_receipts() {
    let mut env = setup();
    let admin = env.admin.clone();

    env.app
        .execute_contract(
            admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetGasPrice {
                chain_id: "ethereum".to_string(),
                gas_limit: 293_414,
                gas_price: Uint128::new(8_245_816_000),
            },
            &[],
        )
        .unwrap();
    env.app
        .execute_contract(
            admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetPriceRatio {
                chain_id: "ethereum".to_string(),
                price_ratio: Uint128::new(1_000_000_000_000),
            },
            &[],
        )
        .unwrap();
    env.app
        .execute_contract(
            admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetFluctuationRatio { percent: 10 },
            &[],
        )
        .unwrap();

    // A second update doubling the ratio trips the 10% bound.
    env.app
        .execute_contract(
            admin,
            env.bridge.clone(),
            &ExecuteMsg::SetPriceRatio {
                chain_id: "ethereum".to_string(),
                price_ratio: Uint128::new(2_000_000_000_000),
            },
            &[],
        )
        .unwrap();

    let err = create_receipt(&mut env, 1000, 100_00000000).unwrap_err();
    assert!(err.root_cause().to_string().contains("fluctuation"));
}

// ============================================================================
// Rate Limiting
// ============================================================================

#[test]
fn test_daily_quota_enforced_and_window_rolls() {
    let mut env = setup();
    let admin = env.admin.clone();
    let start = env.app.block_info().time.seconds();
    env.app
        .execute_contract(
            admin,
            env.bridge.clone(),
            &ExecuteMsg::SetOutboundQuotas {
                configs: vec![OutboundQuotaConfig {
                    target_chain_id: "ethereum".to_string(),
                    symbol: "LUNA".to_string(),
                    default_amount: Uint128::new(1500),
                    refresh_time: start,
                }],
            },
            &[],
        )
        .unwrap();

    create_receipt(&mut env, 1000, 5_00000000).unwrap();
    let err = create_receipt(&mut env, 600, 5_00000000).unwrap_err();
    let err_str = err.root_cause().to_string();
    assert!(err_str.contains("Daily limit exceeded"));
    assert!(err_str.contains("remaining 500"));

    // A new day replenishes the full default.
    env.app
        .update_block(|block| block.time = block.time.plus_seconds(86_400));
    create_receipt(&mut env, 600, 5_00000000).unwrap();
}

#[test]
fn test_token_bucket_enforced_and_refills() {
    let mut env = setup();
    let admin = env.admin.clone();
    env.app
        .execute_contract(
            admin,
            env.bridge.clone(),
            &ExecuteMsg::SetOutboundBuckets {
                configs: vec![OutboundBucketConfig {
                    target_chain_id: "ethereum".to_string(),
                    symbol: "LUNA".to_string(),
                    capacity: Uint128::new(500),
                    rate: Uint128::new(1),
                    enabled: true,
                }],
            },
            &[],
        )
        .unwrap();

    create_receipt(&mut env, 500, 5_00000000).unwrap();
    let err = create_receipt(&mut env, 370, 5_00000000).unwrap_err();
    assert!(err.root_cause().to_string().contains("Token bucket exhausted"));

    // At 1 unit/s the bucket readmits 370 after 370 seconds.
    env.app
        .update_block(|block| block.time = block.time.plus_seconds(370));
    create_receipt(&mut env, 370, 5_00000000).unwrap();
}

#[test]
fn test_unconfigured_limits_report_unlimited() {
    let env = setup();
    let limits: LimitsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.bridge,
            &QueryMsg::OutboundLimits {
                target_chain_id: "ethereum".to_string(),
                symbol: "LUNA".to_string(),
            },
        )
        .unwrap();
    assert_eq!(limits.daily_remaining, Uint128::MAX);
    assert_eq!(limits.bucket_current, Uint128::MAX);
}

#[test]
fn test_limits_snapshot_after_consumption() {
    let mut env = setup();
    let admin = env.admin.clone();
    let start = env.app.block_info().time.seconds();
    env.app
        .execute_contract(
            admin,
            env.bridge.clone(),
            &ExecuteMsg::SetOutboundQuotas {
                configs: vec![OutboundQuotaConfig {
                    target_chain_id: "ethereum".to_string(),
                    symbol: "LUNA".to_string(),
                    default_amount: Uint128::new(10_000),
                    refresh_time: start,
                }],
            },
            &[],
        )
        .unwrap();
    create_receipt(&mut env, 4_000, 5_00000000).unwrap();

    let limits: LimitsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.bridge,
            &QueryMsg::OutboundLimits {
                target_chain_id: "ethereum".to_string(),
                symbol: "LUNA".to_string(),
            },
        )
        .unwrap();
    assert_eq!(limits.daily_remaining, Uint128::new(6_000));
    assert_eq!(limits.daily_default, Uint128::new(10_000));
}

// ============================================================================
// Pause & Admin
// ============================================================================

#[test]
fn test_pause_blocks_receipts() {
    let mut env = setup();
    let pauser = Addr::unchecked("terra1pauser");
    env.app
        .execute_contract(pauser.clone(), env.bridge.clone(), &ExecuteMsg::Pause {}, &[])
        .unwrap();

    let err = create_receipt(&mut env, 1000, 5_00000000).unwrap_err();
    assert!(err.root_cause().to_string().contains("paused"));

    env.app
        .execute_contract(pauser, env.bridge.clone(), &ExecuteMsg::Unpause {}, &[])
        .unwrap();
    create_receipt(&mut env, 1000, 5_00000000).unwrap();
}

#[test]
fn test_pause_requires_controller() {
    let mut env = setup();
    let user = env.user.clone();
    let err = env
        .app
        .execute_contract(user, env.bridge.clone(), &ExecuteMsg::Pause {}, &[])
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("pause controller"));
}

#[test]
fn test_config_setters_require_admin() {
    let mut env = setup();
    let user = env.user.clone();
    let err = env
        .app
        .execute_contract(
            user,
            env.bridge.clone(),
            &ExecuteMsg::SetFluctuationRatio { percent: 5 },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Unauthorized"));
}

#[test]
fn test_two_step_admin_handover() {
    let mut env = setup();
    let admin = env.admin.clone();
    let new_admin = Addr::unchecked("terra1newadmin");
    let user = env.user.clone();

    env.app
        .execute_contract(
            admin,
            env.bridge.clone(),
            &ExecuteMsg::ProposeAdmin {
                new_admin: new_admin.to_string(),
            },
            &[],
        )
        .unwrap();

    let pending: PendingAdminResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::PendingAdmin {})
        .unwrap();
    assert_eq!(pending.pending_admin, Some(new_admin.clone()));

    // Only the proposed address may accept.
    let err = env
        .app
        .execute_contract(user, env.bridge.clone(), &ExecuteMsg::AcceptAdmin {}, &[])
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("pending admin"));

    env.app
        .execute_contract(new_admin.clone(), env.bridge.clone(), &ExecuteMsg::AcceptAdmin {}, &[])
        .unwrap();

    // The new admin holds the role.
    env.app
        .execute_contract(
            new_admin,
            env.bridge.clone(),
            &ExecuteMsg::SetFluctuationRatio { percent: 5 },
            &[],
        )
        .unwrap();
}
