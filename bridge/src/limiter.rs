//! Dual-layer rate limiting: continuous-refill token buckets bounding
//! burst throughput and calendar-period quotas bounding total throughput.
//!
//! Both limiters are deterministic functions of their stored state and
//! the host-supplied block time. There is no background clock: a bucket
//! is refilled and a quota window is rolled lazily, at consume or query
//! time, so every calculation is reproducible from storage plus a
//! timestamp.

use cosmwasm_std::Uint128;

use crate::error::ContractError;
use crate::state::{DailyQuota, TokenBucket, DAILY_REFRESH_PERIOD};

// ============================================================================
// Token Bucket
// ============================================================================

impl TokenBucket {
    /// Refill the bucket up to `now`, clamped to capacity.
    pub fn refill(&mut self, now: u64) {
        let elapsed = now.saturating_sub(self.last_updated);
        let refilled = self
            .rate
            .checked_mul(Uint128::from(elapsed))
            .unwrap_or(Uint128::MAX);
        self.current_amount = self
            .current_amount
            .checked_add(refilled)
            .unwrap_or(Uint128::MAX)
            .min(self.capacity);
        self.last_updated = now;
    }

    /// Consume `amount` from the bucket after refilling to `now`.
    ///
    /// A disabled bucket always succeeds without mutating its balance.
    /// On exhaustion the error carries the minimum wait in seconds until
    /// the request could succeed.
    pub fn consume(&mut self, amount: Uint128, now: u64) -> Result<(), ContractError> {
        if !self.enabled {
            return Ok(());
        }
        self.refill(now);
        if amount > self.current_amount {
            return Err(ContractError::BucketRateExceeded {
                requested: amount,
                available: self.current_amount,
                wait_seconds: self.wait_seconds(amount),
            });
        }
        self.current_amount -= amount;
        Ok(())
    }

    /// Seconds until `amount` would fit, given the current balance.
    /// `(amount - current + rate - 1) / rate`, or `u64::MAX` when the
    /// bucket never refills.
    pub fn wait_seconds(&self, amount: Uint128) -> u64 {
        let deficit = amount.saturating_sub(self.current_amount);
        if deficit.is_zero() {
            return 0;
        }
        if self.rate.is_zero() {
            return u64::MAX;
        }
        let wait = (deficit.u128() + self.rate.u128() - 1) / self.rate.u128();
        u64::try_from(wait).unwrap_or(u64::MAX)
    }

    /// Reconfigure capacity/rate/enabled. The refill is run against the
    /// old configuration first, then the balance is clamped to the new
    /// capacity.
    pub fn reconfigure(&mut self, capacity: Uint128, rate: Uint128, enabled: bool, now: u64) {
        self.refill(now);
        self.capacity = capacity;
        self.rate = rate;
        self.enabled = enabled;
        self.current_amount = self.current_amount.min(capacity);
    }

    /// Balance as reported outward: `Uint128::MAX` for a disabled bucket
    /// so callers can distinguish "unlimited" from "zero".
    pub fn observed_amount(&self, now: u64) -> Uint128 {
        if !self.enabled {
            return Uint128::MAX;
        }
        let mut view = self.clone();
        view.refill(now);
        view.current_amount
    }
}

// ============================================================================
// Daily Quota
// ============================================================================

impl DailyQuota {
    /// Roll the window forward if at least one full period has elapsed
    /// since `refresh_time`. The window start advances by whole periods
    /// and the remaining amount resets to the default.
    pub fn refresh(&mut self, now: u64) {
        let elapsed = now.saturating_sub(self.refresh_time);
        let periods = elapsed / DAILY_REFRESH_PERIOD;
        if periods > 0 {
            self.refresh_time += periods * DAILY_REFRESH_PERIOD;
            self.remaining_amount = self.default_amount;
        }
    }

    /// Consume `amount` from the current window, rolling it first.
    /// Failure reports the remaining amount.
    pub fn consume(&mut self, amount: Uint128, now: u64) -> Result<(), ContractError> {
        self.refresh(now);
        if amount > self.remaining_amount {
            return Err(ContractError::DailyLimitExceeded {
                requested: amount,
                remaining: self.remaining_amount,
            });
        }
        self.remaining_amount -= amount;
        Ok(())
    }

    /// Reconfigure the default amount and window start. The quota is
    /// first rolled under the old configuration; consumption within the
    /// current window is then carried forward as a debit against the new
    /// default, floored at zero.
    pub fn reconfigure(&mut self, default_amount: Uint128, refresh_time: u64, now: u64) {
        self.refresh(now);
        let consumed = self.default_amount.saturating_sub(self.remaining_amount);
        self.default_amount = default_amount;
        self.remaining_amount = default_amount.saturating_sub(consumed);
        self.refresh_time = refresh_time;
    }

    /// Remaining amount as of `now` (window rolled, storage untouched).
    pub fn observed_remaining(&self, now: u64) -> Uint128 {
        let mut view = self.clone();
        view.refresh(now);
        view.remaining_amount
    }
}
