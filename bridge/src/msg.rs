//! Message types for the Crossflow Bridge contract.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

use crate::state::{
    ChainFamily, ChainGasConfig, CrossChainConfig, Receipt, SwapInfo, SwapRatio, TokenInfo,
};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// Address allowed to pause/unpause
    pub pause_controller: String,
    /// This chain's identifier, mixed into per-token receipt keys
    pub home_chain_id: String,
    /// Native denom relay fees are charged in
    pub home_token_denom: String,
    /// Address receiving collected relay fees
    pub fee_collector: String,
    /// Merkle tree collaborator contract
    pub merkle_contract: String,
    /// Regiment membership collaborator contract
    pub regiment_contract: String,
    /// Message dispatch collaborator contract
    pub dispatch_contract: String,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Outbound daily-quota configuration entry.
#[cw_serde]
pub struct OutboundQuotaConfig {
    pub target_chain_id: String,
    pub symbol: String,
    pub default_amount: Uint128,
    /// Window start, unix seconds
    pub refresh_time: u64,
}

/// Inbound (per-swap) daily-quota configuration entry.
#[cw_serde]
pub struct SwapQuotaConfig {
    pub swap_id: String,
    pub default_amount: Uint128,
    pub refresh_time: u64,
}

/// Outbound token-bucket configuration entry.
#[cw_serde]
pub struct OutboundBucketConfig {
    pub target_chain_id: String,
    pub symbol: String,
    pub capacity: Uint128,
    pub rate: Uint128,
    pub enabled: bool,
}

/// Inbound (per-swap) token-bucket configuration entry.
#[cw_serde]
pub struct SwapBucketConfig {
    pub swap_id: String,
    pub capacity: Uint128,
    pub rate: Uint128,
    pub enabled: bool,
}

#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Outbound Transfers
    // ========================================================================
    /// Create an outbound transfer receipt.
    ///
    /// Custody of `amount` moves to the bridge (native funds attached,
    /// or a CW20 allowance spent via `TransferFrom`). The relay fee is
    /// charged in the home denom from the attached funds.
    CreateReceipt {
        target_chain_id: String,
        symbol: String,
        amount: Uint128,
        /// Destination address in the target chain's text form
        target_address: String,
    },

    // ========================================================================
    // Inbound Redemptions
    // ========================================================================
    /// Redeem an inbound receipt against a swap, presenting the claim
    /// directly.
    SwapToken {
        swap_id: String,
        receipt_id: String,
        origin_amount: Uint128,
        receiver: String,
    },

    /// Redeem a forwarded cross-chain message. The message is decoded
    /// per the source chain's family, its leaf hash independently
    /// recomputed, and the embedded claim settled exactly once. The
    /// receiver's address digest must match the message's target slot.
    ForwardMessage {
        from_chain_id: String,
        /// Sending contract on the source chain, raw bytes
        sender: Binary,
        /// Fixed-width encoded receipt message
        message: Binary,
        /// Home address the message's target digest commits to
        receiver: String,
    },

    // ========================================================================
    // Swap Lifecycle
    // ========================================================================
    /// Register an inbound redemption channel. Caller must be the
    /// regiment's manager.
    CreateSwap {
        regiment_id: String,
        space_id: String,
        from_chain_id: String,
        symbol: String,
        swap_ratio: SwapRatio,
    },

    /// Fund a swap's deposit pool. Caller must be a regiment member (or
    /// the manager).
    Deposit { swap_id: String, amount: Uint128 },

    /// Drain a swap's deposit pool. Manager only.
    Withdraw { swap_id: String, amount: Uint128 },

    /// Change a swap's exchange ratio. Manager only; takes effect for
    /// subsequent redemptions immediately.
    ChangeSwapRatio {
        swap_id: String,
        swap_ratio: SwapRatio,
    },

    /// Approve an above-cap payout for a specific receipt. Admin only.
    ApproveTransfer {
        swap_id: String,
        receipt_id: String,
    },

    // ========================================================================
    // Token Registry & Whitelist
    // ========================================================================
    /// Register or update a home-ledger token. Admin only.
    SetToken { symbol: String, token: TokenInfo },

    /// Whitelist tokens for a destination chain. Admin only.
    AddTokenWhitelist {
        target_chain_id: String,
        symbols: Vec<String>,
    },

    /// Remove tokens from a destination chain's whitelist. Admin only.
    RemoveTokenWhitelist {
        target_chain_id: String,
        symbols: Vec<String>,
    },

    // ========================================================================
    // Rate Limit Configuration
    // ========================================================================
    /// Set outbound daily quotas. Admin only.
    SetOutboundQuotas { configs: Vec<OutboundQuotaConfig> },

    /// Set per-swap daily quotas. Admin only.
    SetSwapQuotas { configs: Vec<SwapQuotaConfig> },

    /// Set outbound token buckets. Admin only.
    SetOutboundBuckets { configs: Vec<OutboundBucketConfig> },

    /// Set per-swap token buckets. Admin only.
    SetSwapBuckets { configs: Vec<SwapBucketConfig> },

    // ========================================================================
    // Fee & Chain Configuration
    // ========================================================================
    /// Register or replace a destination chain endpoint. Admin only.
    SetChainConfig { config: CrossChainConfig },

    /// Set a destination chain's gas limit and price. Admin only.
    SetGasPrice {
        chain_id: String,
        gas_limit: u64,
        gas_price: Uint128,
    },

    /// Update a destination chain's price ratio. Admin only. The
    /// previous ratio is retained for the fluctuation guard.
    SetPriceRatio {
        chain_id: String,
        price_ratio: Uint128,
    },

    /// Set a destination chain's fee floating ratio (decimal text).
    /// Admin only.
    SetFeeFloatingRatio {
        chain_id: String,
        floating_ratio: String,
    },

    /// Set the global price fluctuation bound in percent. Admin only.
    SetFluctuationRatio { percent: u64 },

    /// Set the per-token payout cap above which admin approval is
    /// required. Admin only.
    SetSwapCap { symbol: String, max_amount: Uint128 },

    /// Route inbound messages carrying a token key to a swap. Admin
    /// only.
    SetTokenSwapRoute {
        from_chain_id: String,
        /// Lowercase hex token key hash as embedded in messages
        token_key: String,
        swap_id: String,
    },

    /// Update collaborator contract addresses. Admin only.
    UpdateCollaborators {
        merkle_contract: Option<String>,
        regiment_contract: Option<String>,
        dispatch_contract: Option<String>,
    },

    /// Update the fee collector. Admin only.
    SetFeeCollector { address: String },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Engage the circuit breaker. Pause controller or admin.
    Pause {},
    /// Release the circuit breaker. Pause controller or admin.
    Unpause {},
    /// Propose a new admin. Admin only.
    ProposeAdmin { new_admin: String },
    /// Accept a pending admin proposal. Pending admin only.
    AcceptAdmin {},
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(ReceiptResponse)]
    Receipt { receipt_id: String },

    /// Last allocated receipt sequence for a (chain, token) pair.
    #[returns(ReceiptSequenceResponse)]
    ReceiptSequence {
        target_chain_id: String,
        symbol: String,
    },

    /// Outbound limiter state, refreshed to query time. Disabled or
    /// unset limiters report `Uint128::MAX`.
    #[returns(LimitsResponse)]
    OutboundLimits {
        target_chain_id: String,
        symbol: String,
    },

    /// Per-swap limiter state, refreshed to query time.
    #[returns(LimitsResponse)]
    SwapLimits { swap_id: String },

    /// Minimum seconds before `amount` would pass the outbound bucket.
    #[returns(MinWaitResponse)]
    MinWaitSeconds {
        target_chain_id: String,
        symbol: String,
        amount: Uint128,
    },

    #[returns(SwapResponse)]
    Swap { swap_id: String },

    #[returns(SwapResponse)]
    SwapByPair {
        from_chain_id: String,
        symbol: String,
    },

    #[returns(SwapPairResponse)]
    SwapPair { swap_id: String },

    /// Redemption ledger entry, if the claim has been settled.
    #[returns(SwapAmountsResponse)]
    SwapAmounts {
        swap_id: String,
        receipt_id: String,
    },

    #[returns(LeafRecordedResponse)]
    LeafRecorded { leaf_hash: Binary },

    #[returns(ChainConfigResponse)]
    ChainConfig { chain_id: String },

    #[returns(GasConfigResponse)]
    GasConfig { chain_id: String },

    #[returns(TokenResponse)]
    Token { symbol: String },

    #[returns(TokenWhitelistedResponse)]
    TokenWhitelisted {
        target_chain_id: String,
        symbol: String,
    },

    /// Relay fee a CreateReceipt toward this chain would charge now.
    #[returns(CalculateFeeResponse)]
    CalculateFee { chain_id: String },

    #[returns(SwapCapResponse)]
    SwapCap { symbol: String },

    #[returns(ChainsResponse)]
    Chains {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(SwapsResponse)]
    Swaps {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(PendingAdminResponse)]
    PendingAdmin {},
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub pause_controller: Addr,
    pub paused: bool,
    pub home_chain_id: String,
    pub home_token_denom: String,
    pub fee_collector: Addr,
    pub merkle_contract: Addr,
    pub regiment_contract: Addr,
    pub dispatch_contract: Addr,
}

#[cw_serde]
pub struct ReceiptResponse {
    pub receipt: Receipt,
}

#[cw_serde]
pub struct ReceiptSequenceResponse {
    /// Lowercase hex token key the sequence is allocated under
    pub token_key: String,
    /// Last allocated sequence (0 = none yet)
    pub sequence: u64,
}

/// Post-refresh limiter snapshot. `Uint128::MAX` marks an unlimited
/// (disabled or unconfigured) dimension.
#[cw_serde]
pub struct LimitsResponse {
    pub daily_remaining: Uint128,
    pub daily_default: Uint128,
    pub daily_refresh_time: u64,
    pub bucket_current: Uint128,
    pub bucket_capacity: Uint128,
    pub bucket_rate: Uint128,
}

#[cw_serde]
pub struct MinWaitResponse {
    pub wait_seconds: u64,
}

#[cw_serde]
pub struct SwapResponse {
    pub swap: SwapInfo,
}

#[cw_serde]
pub struct SwapPairResponse {
    pub deposit_amount: Uint128,
    pub swapped_amount: Uint128,
    pub swapped_times: u64,
}

#[cw_serde]
pub struct SwapAmountsResponse {
    pub receiver: Option<Addr>,
    pub amount: Option<Uint128>,
}

#[cw_serde]
pub struct LeafRecordedResponse {
    pub recorded: bool,
}

#[cw_serde]
pub struct ChainConfigResponse {
    pub config: CrossChainConfig,
}

#[cw_serde]
pub struct GasConfigResponse {
    pub config: ChainGasConfig,
}

#[cw_serde]
pub struct TokenResponse {
    pub symbol: String,
    pub token: TokenInfo,
}

#[cw_serde]
pub struct TokenWhitelistedResponse {
    pub whitelisted: bool,
}

#[cw_serde]
pub struct CalculateFeeResponse {
    pub chain_family: ChainFamily,
    pub fee: Uint128,
}

#[cw_serde]
pub struct SwapCapResponse {
    pub max_amount: Option<Uint128>,
}

#[cw_serde]
pub struct ChainsResponse {
    pub chains: Vec<CrossChainConfig>,
}

#[cw_serde]
pub struct SwapsResponse {
    pub swaps: Vec<SwapInfo>,
}

#[cw_serde]
pub struct PendingAdminResponse {
    pub pending_admin: Option<Addr>,
}
