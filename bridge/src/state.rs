//! State definitions for the Crossflow Bridge contract.
//!
//! Every entity is addressed by its identifying key tuple:
//! outbound limiters by (target chain, token symbol), inbound limiters by
//! swap id, receipts by receipt id, the redemption ledger by
//! (swap id, receipt id). Counters are never deleted, only reset.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration.
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Address allowed to pause/unpause (admin can always do both)
    pub pause_controller: Addr,
    /// Whether the bridge is currently paused
    pub paused: bool,
    /// This chain's identifier, mixed into per-token receipt keys
    pub home_chain_id: String,
    /// Native denom relay fees are charged in
    pub home_token_denom: String,
    /// Address receiving collected relay fees
    pub fee_collector: Addr,
    /// Merkle tree collaborator contract
    pub merkle_contract: Addr,
    /// Regiment membership collaborator contract
    pub regiment_contract: Addr,
    /// Cross-chain message dispatch collaborator contract
    pub dispatch_contract: Addr,
}

/// Pending admin change proposal.
#[cw_serde]
pub struct PendingAdmin {
    pub new_address: Addr,
}

/// Destination chain family. Closed set; new families extend the enum.
#[cw_serde]
#[derive(Copy)]
pub enum ChainFamily {
    Evm,
    Tvm,
    Svm,
}

impl ChainFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainFamily::Evm => "evm",
            ChainFamily::Tvm => "tvm",
            ChainFamily::Svm => "svm",
        }
    }
}

/// Per-destination-chain endpoint configuration.
#[cw_serde]
pub struct CrossChainConfig {
    /// Destination chain identifier (e.g. "ethereum", "ton", "solana")
    pub chain_id: String,
    /// Encoding/fee family of the chain
    pub chain_family: ChainFamily,
    /// Bridge contract address on the destination chain
    pub contract_address: String,
    /// Receiving contract address on the destination chain
    pub contract_address_for_receive: String,
    /// Flat relay fee, used when no gas config is present for the chain
    pub fee: Uint128,
}

/// Gas parameters used to convert destination-chain execution cost into
/// home-token relay fees.
#[cw_serde]
pub struct ChainGasConfig {
    pub gas_limit: u64,
    /// Gas price scaled by 1e9
    pub gas_price: Uint128,
    /// Destination-token/home-token price ratio scaled by 1e8
    pub price_ratio: Uint128,
    /// Ratio observed before the most recent update; zero until the
    /// ratio has been updated at least once
    pub previous_price_ratio: Uint128,
    /// Decimal text multiplier applied on top of the ratio; unset or
    /// unparsable means 1
    pub floating_ratio: Option<String>,
}

/// Home-ledger token registration.
#[cw_serde]
pub struct TokenInfo {
    /// Whether this is a native denom (vs a CW20 contract)
    pub is_native: bool,
    /// Denom for native tokens, contract address for CW20
    pub denom_or_address: String,
    /// Whether the token is currently enabled for bridging
    pub enabled: bool,
}

// ============================================================================
// Rate Limiting
// ============================================================================

/// Calendar-period quota. Lazily refreshed at consume/query time, never
/// by a background clock.
#[cw_serde]
pub struct DailyQuota {
    pub default_amount: Uint128,
    pub remaining_amount: Uint128,
    /// Start of the current window, unix seconds
    pub refresh_time: u64,
}

/// Continuous-refill token bucket. Lazily refilled to "now" on every
/// read/write.
#[cw_serde]
pub struct TokenBucket {
    pub capacity: Uint128,
    pub current_amount: Uint128,
    /// Refill rate in token units per second
    pub rate: Uint128,
    pub enabled: bool,
    /// Unix seconds of the last refill
    pub last_updated: u64,
}

// ============================================================================
// Receipts (outbound)
// ============================================================================

/// Record of an outbound transfer request. Immutable once created.
#[cw_serde]
pub struct Receipt {
    pub symbol: String,
    pub owner: Addr,
    pub amount: Uint128,
    pub target_chain_id: String,
    pub target_address: String,
    /// Unix seconds at creation
    pub created_at: u64,
}

// ============================================================================
// Swaps (inbound)
// ============================================================================

/// Exchange ratio between foreign-chain units and home-token units.
#[cw_serde]
pub struct SwapRatio {
    pub origin_share: Uint128,
    pub target_share: Uint128,
}

/// A registered inbound redemption channel for a (source chain, token)
/// pair.
#[cw_serde]
pub struct SwapInfo {
    pub swap_id: String,
    /// Authorization group whose manager administers the swap
    pub regiment_id: String,
    /// Merkle space the oracle records this swap's receipts into
    pub space_id: String,
    pub from_chain_id: String,
    pub symbol: String,
    pub swap_ratio: SwapRatio,
}

/// Per-swap deposit pool accounting. `swapped_amount`/`swapped_times`
/// are monotonic.
#[cw_serde]
pub struct SwapPairInfo {
    pub deposit_amount: Uint128,
    pub swapped_amount: Uint128,
    pub swapped_times: u64,
}

/// Write-once redemption ledger entry; its existence marks the claim as
/// settled.
#[cw_serde]
pub struct SwapAmounts {
    pub receiver: Addr,
    pub amount: Uint128,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:crossflow-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Daily quota refresh period in seconds
pub const DAILY_REFRESH_PERIOD: u64 = 86_400;

// ============================================================================
// Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Pending admin proposal (if any)
pub const PENDING_ADMIN: Item<PendingAdmin> = Item::new("pending_admin");

/// Registered home-ledger tokens
/// Key: symbol, Value: TokenInfo
pub const TOKENS: Map<&str, TokenInfo> = Map::new("tokens");

/// Outbound whitelist
/// Key: (target chain id, symbol), Value: whether bridging is allowed
pub const TOKEN_WHITELIST: Map<(&str, &str), bool> = Map::new("token_whitelist");

/// Destination chain endpoint configuration
/// Key: chain id, Value: CrossChainConfig
pub const CHAIN_CONFIGS: Map<&str, CrossChainConfig> = Map::new("chain_configs");

/// Destination chain gas/fee parameters
/// Key: chain id, Value: ChainGasConfig
pub const GAS_CONFIGS: Map<&str, ChainGasConfig> = Map::new("gas_configs");

/// Allowed price-ratio fluctuation in percent (0 = unconfigured)
pub const FLUCTUATION_RATIO: Item<u64> = Item::new("fluctuation_ratio");

/// Outbound daily quotas
/// Key: (target chain id, symbol), Value: DailyQuota
pub const OUTBOUND_QUOTAS: Map<(&str, &str), DailyQuota> = Map::new("outbound_quotas");

/// Outbound token buckets
/// Key: (target chain id, symbol), Value: TokenBucket
pub const OUTBOUND_BUCKETS: Map<(&str, &str), TokenBucket> = Map::new("outbound_buckets");

/// Inbound (per-swap) daily quotas
/// Key: swap id, Value: DailyQuota
pub const SWAP_QUOTAS: Map<&str, DailyQuota> = Map::new("swap_quotas");

/// Inbound (per-swap) token buckets
/// Key: swap id, Value: TokenBucket
pub const SWAP_BUCKETS: Map<&str, TokenBucket> = Map::new("swap_buckets");

/// Strictly increasing receipt sequence per token key hash
/// Key: token key hash (lowercase hex), Value: last allocated sequence
pub const RECEIPT_SEQUENCES: Map<&str, u64> = Map::new("receipt_sequences");

/// Outbound receipts
/// Key: receipt id, Value: Receipt
pub const RECEIPTS: Map<&str, Receipt> = Map::new("receipts");

/// Registered swaps
/// Key: swap id, Value: SwapInfo
pub const SWAPS: Map<&str, SwapInfo> = Map::new("swaps");

/// One swap per (source chain, token) pair
/// Key: (from chain id, symbol), Value: swap id
pub const SWAP_BY_PAIR: Map<(&str, &str), String> = Map::new("swap_by_pair");

/// Per-swap deposit pool accounting
/// Key: swap id, Value: SwapPairInfo
pub const SWAP_PAIRS: Map<&str, SwapPairInfo> = Map::new("swap_pairs");

/// Redemption exactly-once ledger
/// Key: (swap id, receipt id), Value: SwapAmounts
pub const SWAP_LEDGER: Map<(&str, &str), SwapAmounts> = Map::new("swap_ledger");

/// Replay guard for forwarded messages
/// Key: 32-byte leaf hash, Value: recorded marker
pub const RECORDED_LEAVES: Map<&[u8], bool> = Map::new("recorded_leaves");

/// Per-token payout cap above which admin approval is required
/// Key: symbol, Value: cap amount
pub const SWAP_AMOUNT_CAPS: Map<&str, Uint128> = Map::new("swap_amount_caps");

/// Admin approvals for above-cap payouts
/// Key: (swap id, receipt id), Value: approved marker
pub const APPROVED_TRANSFERS: Map<(&str, &str), bool> = Map::new("approved_transfers");

/// Inbound routing from decoded messages to swaps
/// Key: (from chain id, token key hash hex), Value: swap id
pub const TOKEN_TO_SWAP: Map<(&str, &str), String> = Map::new("token_to_swap");
