// crates/deflect-economics/src/token.rs
//
// Fixed-point token unit helpers.
//
// Every asset is tracked in its smallest unit. An asset with `decimals = 18`
// has 10^18 base units per whole token, the same convention as `parseEther`.
// Parsing and formatting never go through floating point.

use deflect_core::error::DeflectError;

/// Decimals used by the staking and reward assets unless configured otherwise.
pub const DEFAULT_DECIMALS: u32 = 18;

/// Largest supported decimals value. 10^38 is the last power of ten below
/// `u128::MAX`; 30 leaves headroom for amount * multiplier products.
pub const MAX_DECIMALS: u32 = 30;

/// Denominator for every basis-point quantity (fees, boost weights).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Number of base units in one whole token: `10^decimals`.
///
/// # Errors
/// Returns `DeflectError::InvalidParameter` if `decimals > MAX_DECIMALS`.
pub fn unit_multiplier(decimals: u32) -> Result<u128, DeflectError> {
    if decimals > MAX_DECIMALS {
        return Err(DeflectError::InvalidParameter(format!(
            "decimals {} exceeds the maximum of {}",
            decimals, MAX_DECIMALS
        )));
    }
    Ok(10u128.pow(decimals))
}

/// `amount * bps / 10_000`, truncated.
pub fn apply_bps(amount: u128, bps: u32) -> Result<u128, DeflectError> {
    amount
        .checked_mul(bps as u128)
        .map(|scaled| scaled / BPS_DENOMINATOR)
        .ok_or(DeflectError::MathOverflow("apply_bps"))
}

/// Parse a decimal string of whole tokens into base units.
///
/// # Example
/// ```
/// use deflect_economics::token::parse_units;
/// assert_eq!(parse_units("1.5", 18).unwrap(), 1_500_000_000_000_000_000);
/// ```
///
/// # Errors
/// Returns `DeflectError::Parse` for empty input, non-digit characters, or
/// more fractional digits than `decimals` allows.
pub fn parse_units(value: &str, decimals: u32) -> Result<u128, DeflectError> {
    let multiplier = unit_multiplier(decimals)?;
    let value = value.trim().replace('_', "");
    let (whole, frac) = match value.split_once('.') {
        Some((w, f)) => (w, f),
        None => (value.as_str(), ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(DeflectError::Parse(format!("'{}' is not an amount", value)));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(DeflectError::Parse(format!("'{}' is not an amount", value)));
    }
    if frac.len() > decimals as usize {
        return Err(DeflectError::Parse(format!(
            "'{}' has more than {} fractional digits",
            value, decimals
        )));
    }

    let whole_units: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|e| DeflectError::Parse(format!("'{}': {}", value, e)))?
    };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded
            .parse::<u128>()
            .map_err(|e| DeflectError::Parse(format!("'{}': {}", value, e)))?
    };

    whole_units
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or(DeflectError::MathOverflow("parse_units"))
}

/// Format base units as a decimal string of whole tokens, trimming trailing
/// zeros from the fractional part.
pub fn format_units(amount: u128, decimals: u32) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let multiplier = match unit_multiplier(decimals) {
        Ok(m) => m,
        Err(_) => return amount.to_string(),
    };
    let whole = amount / multiplier;
    let frac = amount % multiplier;
    if frac == 0 {
        whole.to_string()
    } else {
        let frac_str = format!("{:0width$}", frac, width = decimals as usize);
        format!("{}.{}", whole, frac_str.trim_end_matches('0'))
    }
}
