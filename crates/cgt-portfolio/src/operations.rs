//! Operation parser: raw JSON records -> normalized [`Operation`]s.
//!
//! Accepted record shape:
//!
//! ```text
//! {"operation": "buy"|"sell", "unit-cost"|"unitCost": number|string,
//!  "quantity": positive integer, "ticker"?: string}
//! ```
//!
//! Records are checked in order and the first failure aborts the whole batch;
//! errors carry the 1-based position of the offending record.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::money::{to_cents, MoneyError, MAX_SAFE_CENTS};
use crate::types::{Operation, Side, DEFAULT_TICKER};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input must be an array of operations")]
    NotAnArray,

    #[error("operation #{index} invalid: {reason}")]
    InvalidOperation { index: usize, reason: &'static str },

    #[error("operation #{index}: unknown operation kind \"{kind}\"")]
    UnknownOperationKind { index: usize, kind: String },

    #[error("operation #{index}: unit-cost/unitCost field missing")]
    MissingUnitCost { index: usize },

    #[error("operation #{index}: invalid unit-cost: {source}")]
    InvalidUnitCost { index: usize, source: MoneyError },

    #[error("operation #{index}: negative unit-cost")]
    NegativeUnitCost { index: usize },

    #[error("operation #{index}: invalid quantity")]
    InvalidQuantity { index: usize },

    #[error("operation #{index}: invalid ticker field")]
    InvalidTicker { index: usize },
}

/// Parse a JSON text payload into operations.
pub fn parse_operations_str(payload: &str) -> Result<Vec<Operation>, ParseError> {
    let raw: Value = serde_json::from_str(payload)?;
    parse_operations(&raw)
}

/// Validate and normalize a JSON array of operation records, 1:1 and in order.
pub fn parse_operations(raw: &Value) -> Result<Vec<Operation>, ParseError> {
    let items = raw.as_array().ok_or(ParseError::NotAnArray)?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_record(i + 1, item))
        .collect()
}

fn parse_record(index: usize, item: &Value) -> Result<Operation, ParseError> {
    let obj = item.as_object().ok_or(ParseError::InvalidOperation {
        index,
        reason: "not an object",
    })?;

    let side = match obj.get("operation") {
        Some(Value::String(s)) => Side::parse(s).ok_or_else(|| ParseError::UnknownOperationKind {
            index,
            kind: s.clone(),
        })?,
        _ => {
            return Err(ParseError::InvalidOperation {
                index,
                reason: "missing/invalid operation field",
            })
        }
    };

    let unit_raw = present(obj, "unit-cost")
        .or_else(|| present(obj, "unitCost"))
        .ok_or(ParseError::MissingUnitCost { index })?;
    let unit_cents =
        to_cents(unit_raw).map_err(|source| ParseError::InvalidUnitCost { index, source })?;
    if unit_cents.is_negative() {
        return Err(ParseError::NegativeUnitCost { index });
    }

    let qty = obj
        .get("quantity")
        .and_then(positive_integer)
        .ok_or(ParseError::InvalidQuantity { index })?;

    let ticker = match obj.get("ticker") {
        None | Some(Value::Null) => DEFAULT_TICKER.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(_) => return Err(ParseError::InvalidTicker { index }),
    };

    Ok(Operation {
        side,
        unit_cents,
        qty,
        ticker,
    })
}

/// Field value, treating JSON `null` as absent.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// A JSON integer > 0 within the safe range. `10.0` counts as an integer.
///
/// Anything above `2^53 - 1` is rejected here, so an oversized quantity fails
/// the whole batch as [`ParseError::InvalidQuantity`] before any operation runs.
fn positive_integer(v: &Value) -> Option<i64> {
    let n = match v {
        Value::Number(n) => n,
        _ => return None,
    };
    let q = match n.as_i64() {
        Some(i) => i,
        None => {
            let f = n.as_f64()?;
            if f.fract() != 0.0 || f.abs() > MAX_SAFE_CENTS as f64 {
                return None;
            }
            f as i64
        }
    };
    (q > 0 && q <= MAX_SAFE_CENTS).then_some(q)
}
