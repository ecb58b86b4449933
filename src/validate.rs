//! Row-level validation and normalisation of reward exports.
//!
//! Each helper either yields a typed value or a fatal [`ToolError`]; callers
//! never skip a bad row.

use std::str::FromStr;

use alloy_primitives::{Address, U256};

use crate::error::{Result, ToolError};
use crate::model::{RecipientAddress, Tier};

/// Fractional digits of the reward token.
pub const TOKEN_DECIMALS: usize = 18;

/// `10^18`, the number of smallest units in one whole token.
pub const UNITS_PER_TOKEN: u64 = 1_000_000_000_000_000_000;

/// Markers searched for in a tier label, in priority order.
pub const TIER_MARKERS: [(&str, Tier); 4] = [
    ("tier1", Tier::T1),
    ("tier2", Tier::T2),
    ("tier3", Tier::T3),
    ("tier4", Tier::T4),
];

const ADDRESS_HEX_LEN: usize = 40;

/// Validates an EVM account address.
///
/// The value must be `0x` followed by 40 hex digits. An all-lowercase body is
/// accepted as is; any other casing has to match the EIP-55 checksum.
pub fn validate_address(raw: &str) -> Result<RecipientAddress> {
    let invalid = || ToolError::InvalidAddress(raw.to_string());

    let body = raw.strip_prefix("0x").ok_or_else(invalid)?;
    if body.len() != ADDRESS_HEX_LEN || !body.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let address = Address::from_str(body).map_err(|_| invalid())?;
    let is_lowercase = !body.bytes().any(|byte| byte.is_ascii_uppercase());
    if !is_lowercase && address.to_checksum(None) != raw {
        return Err(invalid());
    }

    Ok(RecipientAddress::new(address))
}

/// Maps a free-form tier label to a [`Tier`].
///
/// The first marker contained in the label wins, so `"tier1-tier2"` resolves
/// to [`Tier::T1`].
pub fn parse_tier(raw_label: &str) -> Result<Tier> {
    TIER_MARKERS
        .iter()
        .find(|(marker, _)| raw_label.contains(marker))
        .map(|(_, tier)| *tier)
        .ok_or_else(|| ToolError::InvalidTier(raw_label.to_string()))
}

/// Converts a USD prize into the token's smallest unit.
///
/// The division happens in `f64` and the quotient goes through its shortest
/// decimal rendering before being scaled by `10^18`. The result therefore
/// carries binary floating point error (roughly 15-17 significant digits of
/// the quotient survive); downstream totals are exact sums of these
/// approximations.
pub fn convert_prize_to_token_amount(prize_usd: &str, token_price_usd: f64) -> Result<U256> {
    validate_price(token_price_usd)?;

    let prize: f64 = prize_usd
        .trim()
        .parse()
        .map_err(|_| ToolError::InvalidPrize(prize_usd.to_string()))?;
    if !prize.is_finite() || prize < 0.0 {
        return Err(ToolError::InvalidPrize(prize_usd.to_string()));
    }

    let token_amount = prize / token_price_usd;
    if token_amount == 0.0 {
        return Ok(U256::ZERO);
    }
    parse_token_units(&token_amount.to_string())
}

/// Rejects token prices that cannot serve as a divisor.
pub fn validate_price(token_price_usd: f64) -> Result<()> {
    if token_price_usd.is_finite() && token_price_usd > 0.0 {
        Ok(())
    } else {
        Err(ToolError::InvalidPrice(token_price_usd))
    }
}

/// Scales a plain decimal token amount (`"12.5"`) to smallest units.
///
/// Digits beyond the 18th fractional place are rounded half-up on the first
/// dropped digit.
pub fn parse_token_units(decimal: &str) -> Result<U256> {
    let invalid = || ToolError::InvalidPrize(decimal.to_string());

    let (integer, fraction) = decimal.split_once('.').unwrap_or((decimal, ""));
    if integer.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if !all_digits(integer) || !all_digits(fraction) {
        return Err(invalid());
    }

    let (kept, dropped) = if fraction.len() > TOKEN_DECIMALS {
        fraction.split_at(TOKEN_DECIMALS)
    } else {
        (fraction, "")
    };

    let mut digits = String::with_capacity(integer.len() + TOKEN_DECIMALS);
    digits.push_str(if integer.is_empty() { "0" } else { integer });
    digits.push_str(kept);
    digits.extend(std::iter::repeat_n('0', TOKEN_DECIMALS - kept.len()));

    let mut units = U256::from_str_radix(&digits, 10).map_err(|_| invalid())?;
    if dropped.as_bytes().first().is_some_and(|digit| *digit >= b'5') {
        units = units
            .checked_add(U256::from(1u8))
            .ok_or(ToolError::AmountOverflow)?;
    }
    Ok(units)
}

/// Renders smallest units as a decimal token amount with trailing
/// fractional zeros trimmed.
pub fn format_token_amount(units: U256) -> String {
    let scale = U256::from(UNITS_PER_TOKEN);
    let whole = units / scale;
    let remainder = units % scale;
    if remainder.is_zero() {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", remainder.to_string(), width = TOKEN_DECIMALS);
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}
