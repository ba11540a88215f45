//! Numeric rendering for batch fields.
//!
//! Chain ids travel as decimal integers and leave as lower-case `0x` hex.
//! `value` and `gas` keep an existing `0x` form untouched; anything else is a
//! decimal amount scaled to base units.

use {
    rust_decimal::{Decimal, prelude::ToPrimitive},
    serde::{Deserialize, Deserializer},
    std::str::FromStr,
};

use crate::error::{Error, Result};

/// Render a chain id as `0x`-prefixed lower-case hex.
pub fn chain_id_hex(chain_id: u64) -> String {
    format!("0x{chain_id:x}")
}

/// Hex-encode raw bytes with a `0x` prefix.
pub fn bytes_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Convert a `value`/`gas` quantity to wire form.
///
/// `decimals` is the number of base-unit decimals of the amount (18 for a
/// native-token value, 0 for gas).
pub fn to_base_units_hex(raw: &str, decimals: u32) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        return Ok(raw.to_string());
    }
    if trimmed.is_empty() {
        return Err(Error::invalid_amount(raw, "empty amount"));
    }

    let amount = Decimal::from_str(trimmed)
        .map_err(|e| Error::invalid_amount(raw, format!("not a decimal number: {e}")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::invalid_amount(raw, "negative amount"));
    }

    let scale = 10i128
        .checked_pow(decimals)
        .and_then(|factor| Decimal::try_from_i128_with_scale(factor, 0).ok())
        .ok_or_else(|| Error::invalid_amount(raw, format!("{decimals} decimals out of range")))?;
    let scaled = amount
        .checked_mul(scale)
        .ok_or_else(|| Error::invalid_amount(raw, "amount overflows base units"))?;
    if !scaled.fract().is_zero() {
        return Err(Error::invalid_amount(
            raw,
            format!("more than {decimals} fractional digits"),
        ));
    }

    let units = scaled
        .trunc()
        .to_u128()
        .ok_or_else(|| Error::invalid_amount(raw, "amount overflows base units"))?;
    Ok(format!("0x{units:x}"))
}

/// Parse a chain id given as a JSON number, decimal string or hex string.
pub fn parse_chain_id(value: &serde_json::Value) -> Result<u64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| Error::invalid_amount(n.to_string(), "chain id must be a positive integer")),
        serde_json::Value::String(s) => {
            let s = s.trim();
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse(),
            };
            parsed.map_err(|e| Error::invalid_amount(s, format!("invalid chain id: {e}")))
        },
        other => Err(Error::invalid_amount(
            other.to_string(),
            "chain id must be a number or string",
        )),
    }
}

/// Accept either a JSON string or number for an optional quantity field.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
