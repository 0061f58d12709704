//! Permissive coercion of incoming product fields.
//!
//! Product forms are recalculated while the user is still typing, so a field
//! that is missing, blank or not a number reads as zero instead of rejecting
//! the whole payload. Text fields likewise accept `null` and bare numbers.
//! Use with `#[serde(default, deserialize_with = "...")]`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a decimal from text, falling back to zero.
///
/// Accepts plain (`"18.5"`) and scientific (`"1.5e2"`) notation, surrounding
/// whitespace allowed. Finite numbers too large for a `Decimal` clamp to
/// `Decimal::MAX` / `Decimal::MIN`; ones too small to represent read as zero.
pub fn parse_decimal(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or_else(|_| out_of_range(trimmed))
}

fn out_of_range(text: &str) -> Decimal {
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() && f.abs() >= 1.0 => {
            if f.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        }
        _ => Decimal::ZERO,
    }
}

/// Coerce an arbitrary JSON value to a decimal. Only numbers and numeric
/// strings carry a value; everything else is zero.
pub fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => Decimal::ZERO,
    }
}

/// Coerce an arbitrary JSON value to a flag using truthiness rules.
pub fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(_) => !coerce_decimal(value).is_zero(),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Coerce an arbitrary JSON value to text. Numbers and booleans keep their
/// JSON spelling; `null`, arrays and objects become empty.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// serde adapter for [`coerce_text`]
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_text(&value))
}

/// serde adapter for optional text; blank reads as `None`
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = coerce_text(&value);
    Ok((!text.trim().is_empty()).then_some(text))
}

/// serde adapter for [`coerce_decimal`]
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_decimal(&value))
}

/// serde adapter for [`coerce_flag`]
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_flag(&value))
}
