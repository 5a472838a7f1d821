//! Relay fee calculation.
//!
//! Converts destination-chain gas parameters and a price ratio into a
//! home-token fee. All inputs are fixed-point integers: gas price is
//! scaled by 1e9, the price ratio by 1e8, and the result is denominated
//! in the home token's smallest unit (1e8 per whole token):
//!
//! ```text
//! fee_decimal = round8( (gas_limit * gas_price / 1e9) / 1e9
//!                       * (price_ratio / 1e8) * floating_ratio )
//! fee         = ceil(fee_decimal) * 1e8
//! ```
//!
//! The arithmetic runs over `Uint256` so the intermediate product cannot
//! overflow for any representable input.

use cosmwasm_std::{Uint128, Uint256};

use crate::error::ContractError;
use crate::state::ChainGasConfig;

/// Gas price scale (1e9)
pub const GAS_PRICE_DENOMINATOR: u128 = 1_000_000_000;

/// Price ratio scale (1e8)
pub const PRICE_RATIO_DENOMINATOR: u128 = 100_000_000;

/// Smallest-unit scale of the home token (1e8 per whole token)
pub const HOME_TOKEN_UNIT: u128 = 100_000_000;

/// Parse a decimal text multiplier into a (numerator, denominator) pair.
/// Unset, empty, or unparsable input means 1. At most 18 fractional
/// digits are honored.
fn parse_floating_ratio(ratio: Option<&str>) -> (u128, u128) {
    let Some(text) = ratio else {
        return (1, 1);
    };
    let text = text.trim();
    if text.is_empty() {
        return (1, 1);
    }

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text, ""),
    };
    if frac_part.len() > 18 {
        return (1, 1);
    }
    let int_ok = !int_part.is_empty() && int_part.bytes().all(|b| b.is_ascii_digit());
    let frac_ok = frac_part.bytes().all(|b| b.is_ascii_digit());
    if !int_ok || !frac_ok {
        return (1, 1);
    }

    let den = 10u128.pow(frac_part.len() as u32);
    let int_val: u128 = match int_part.parse() {
        Ok(v) => v,
        Err(_) => return (1, 1),
    };
    let frac_val: u128 = if frac_part.is_empty() {
        0
    } else {
        match frac_part.parse() {
            Ok(v) => v,
            Err(_) => return (1, 1),
        }
    };
    match int_val.checked_mul(den).and_then(|v| v.checked_add(frac_val)) {
        Some(num) => (num, den),
        None => (1, 1),
    }
}

/// Compute the relay fee in home-token smallest units.
pub fn calculate_gas_fee(config: &ChainGasConfig) -> Result<Uint128, ContractError> {
    let (fr_num, fr_den) = parse_floating_ratio(config.floating_ratio.as_deref());

    let numerator = Uint256::from(config.gas_limit)
        .checked_mul(Uint256::from(config.gas_price))
        .and_then(|v| v.checked_mul(Uint256::from(config.price_ratio)))
        .and_then(|v| v.checked_mul(Uint256::from(fr_num)))
        .map_err(|_| ContractError::InvalidAmount {
            reason: "fee arithmetic overflow".to_string(),
        })?;
    let denominator = Uint256::from(GAS_PRICE_DENOMINATOR)
        * Uint256::from(GAS_PRICE_DENOMINATOR)
        * Uint256::from(PRICE_RATIO_DENOMINATOR)
        * Uint256::from(fr_den);

    // Round half-up at 8 decimal places, then take the ceiling to whole
    // tokens, then re-scale into smallest units.
    let unit = Uint256::from(HOME_TOKEN_UNIT);
    let two = Uint256::from(2u8);
    let overflow = |_| ContractError::InvalidAmount {
        reason: "fee arithmetic overflow".to_string(),
    };
    let scaled = numerator
        .checked_mul(unit)
        .and_then(|v| v.checked_mul(two))
        .and_then(|v| v.checked_add(denominator))
        .map_err(overflow)?
        / (denominator * two);
    let whole = (scaled + unit - Uint256::from(1u8)) / unit;
    let fee = whole.checked_mul(unit).map_err(overflow)?;

    Uint128::try_from(fee).map_err(|_| ContractError::InvalidAmount {
        reason: "fee exceeds Uint128 range".to_string(),
    })
}

/// Reject a price-ratio move larger than the configured fluctuation
/// bound: `|r - r_prev| / max(r, r_prev) > fluctuation_pct / 100`.
///
/// A zero delta is always allowed; a nonzero delta requires the bound to
/// be configured (> 0). An unset previous ratio means there is no basis
/// for comparison and the check passes.
pub fn check_price_fluctuation(
    current: Uint128,
    previous: Uint128,
    fluctuation_pct: u64,
) -> Result<(), ContractError> {
    if current == previous || previous.is_zero() {
        return Ok(());
    }
    let exceeded = ContractError::PriceFluctuationExceeded { current, previous };
    if fluctuation_pct == 0 {
        return Err(exceeded);
    }

    let (hi, lo) = if current > previous {
        (current.u128(), previous.u128())
    } else {
        (previous.u128(), current.u128())
    };
    let delta = Uint256::from(hi - lo);
    // delta / hi > pct / 100  <=>  delta * 100 > hi * pct
    if delta * Uint256::from(100u8) > Uint256::from(hi) * Uint256::from(fluctuation_pct) {
        return Err(exceeded);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gas_config(
        gas_limit: u64,
        gas_price: u128,
        price_ratio: u128,
        floating_ratio: Option<&str>,
    ) -> ChainGasConfig {
        ChainGasConfig {
            gas_limit,
            gas_price: Uint128::new(gas_price),
            price_ratio: Uint128::new(price_ratio),
            previous_price_ratio: Uint128::zero(),
            floating_ratio: floating_ratio.map(str::to_string),
        }
    }

    #[test]
    fn test_fee_reference_vector() {
        // (293414 * 8245816000 / 1e9) / 1e9 * (1052631578947 / 1e8) * 1.2
        //   = 30.5624...  -> round8 -> ceil -> 31 whole tokens
        let config = gas_config(293_414, 8_245_816_000, 1_052_631_578_947, Some("1.2"));
        let fee = calculate_gas_fee(&config).unwrap();
        assert_eq!(fee, Uint128::new(31_00000000));
    }

    #[test]
    fn test_fee_is_deterministic() {
        let config = gas_config(293_414, 8_245_816_000, 1_052_631_578_947, Some("1.2"));
        let a = calculate_gas_fee(&config).unwrap();
        let b = calculate_gas_fee(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fee_zero_inputs() {
        let config = gas_config(0, 0, 0, None);
        assert_eq!(calculate_gas_fee(&config).unwrap(), Uint128::zero());
    }

    #[test]
    fn test_fee_ceils_fractional_values() {
        // gas_limit * gas_price / 1e9 = 21000 * 1.0 = 21000 gas-units
        // / 1e9 = 0.000021; * ratio 1.0 = 0.000021 -> ceil -> 1 token
        let config = gas_config(21_000, 1_000_000_000, 100_000_000, None);
        assert_eq!(
            calculate_gas_fee(&config).unwrap(),
            Uint128::new(1_00000000)
        );
    }

    #[test]
    fn test_floating_ratio_defaults_to_one() {
        let base = gas_config(293_414, 8_245_816_000, 1_052_631_578_947, None);
        let explicit = gas_config(293_414, 8_245_816_000, 1_052_631_578_947, Some("1"));
        let garbage = gas_config(293_414, 8_245_816_000, 1_052_631_578_947, Some("abc"));
        let fee = calculate_gas_fee(&base).unwrap();
        assert_eq!(calculate_gas_fee(&explicit).unwrap(), fee);
        assert_eq!(calculate_gas_fee(&garbage).unwrap(), fee);
    }

    #[test]
    fn test_parse_floating_ratio_forms() {
        assert_eq!(parse_floating_ratio(Some("1.2")), (12, 10));
        assert_eq!(parse_floating_ratio(Some("2")), (2, 1));
        assert_eq!(parse_floating_ratio(Some("0.05")), (5, 100));
        assert_eq!(parse_floating_ratio(None), (1, 1));
        assert_eq!(parse_floating_ratio(Some("")), (1, 1));
        assert_eq!(parse_floating_ratio(Some("1.2.3")), (1, 1));
        assert_eq!(parse_floating_ratio(Some("-1")), (1, 1));
    }

    #[test]
    fn test_fluctuation_zero_delta_always_allowed() {
        let r = Uint128::new(1_052_631_578_947);
        check_price_fluctuation(r, r, 0).unwrap();
    }

    #[test]
    fn test_fluctuation_requires_configuration() {
        let err = check_price_fluctuation(Uint128::new(110), Uint128::new(100), 0).unwrap_err();
        assert!(matches!(
            err,
            ContractError::PriceFluctuationExceeded { .. }
        ));
    }

    #[test]
    fn test_fluctuation_bound() {
        // 10% move against a 10% bound: 10/110 * 100 = 9.09% -> allowed
        check_price_fluctuation(Uint128::new(110), Uint128::new(100), 10).unwrap();
        // 25/125 * 100 = 20% against a 10% bound -> rejected
        assert!(check_price_fluctuation(Uint128::new(125), Uint128::new(100), 10).is_err());
        // direction does not matter
        assert!(check_price_fluctuation(Uint128::new(100), Uint128::new(125), 10).is_err());
    }

    #[test]
    fn test_fluctuation_unset_previous_passes() {
        check_price_fluctuation(Uint128::new(100), Uint128::zero(), 0).unwrap();
    }
}
