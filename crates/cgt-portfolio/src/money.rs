//! Integer-cents money type and helpers.
//!
//! # Representation
//!
//! Every monetary and cost-basis value is an integer count of cents wrapped
//! in [`Cents`]. There is no `From<i64>`: callers must be deliberate about
//! when a raw integer is money. Share quantities stay plain `i64`.
//!
//! `f64` appears only at the edges: [`to_cents`] / [`round_to_cents`] on the
//! way in, [`from_cents`] on the way out.
//!
//! # Range
//!
//! Stored values must lie in `[-MAX_SAFE_CENTS, MAX_SAFE_CENTS]` (2^53 - 1),
//! the range in which a cents value survives conversion to `f64` major units.
//! Every checked operation here returns [`MoneyError::Overflow`] when a result
//! leaves that range; nothing wraps, saturates or truncates.

use serde_json::Value;
use thiserror::Error;

pub use cgt_tax::MAX_SAFE_CENTS;

/// Cents per major currency unit.
pub const CENTS_PER_UNIT: i64 = 100;

/// Nudge applied in the sign direction before rounding, so that inputs like
/// `1.005` (stored as 1.00499999...) land on the intended cent.
const ROUNDING_BIAS: f64 = 1e-8;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("invalid money value: unsupported type {kind}")]
    InvalidMoneyInput { kind: &'static str },

    #[error("invalid money value: not finite")]
    NonFiniteValue,

    #[error("invalid argument {name}: {value}")]
    InvalidArgument { name: &'static str, value: i64 },

    #[error("overflow in {op}")]
    Overflow { op: &'static str },
}

// ---------------------------------------------------------------------------
// Cents newtype
// ---------------------------------------------------------------------------

/// A monetary amount in cents. `Cents::new(1_234)` is 12.34.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    /// Largest storable amount.
    pub const MAX: Cents = Cents(MAX_SAFE_CENTS);

    #[inline]
    pub const fn new(raw: i64) -> Self {
        Cents(raw)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn is_non_negative(self) -> bool {
        self.0 >= 0
    }

    /// `true` if inside the storable range.
    #[inline]
    pub fn is_safe(self) -> bool {
        cgt_tax::in_safe_range(self.0)
    }

    #[inline]
    pub fn checked_add(self, rhs: Cents) -> Option<Cents> {
        self.0.checked_add(rhs.0).map(Cents).filter(|c| c.is_safe())
    }

    #[inline]
    pub fn checked_sub(self, rhs: Cents) -> Option<Cents> {
        self.0.checked_sub(rhs.0).map(Cents).filter(|c| c.is_safe())
    }

    /// Multiply a per-unit price by a share quantity.
    ///
    /// `None` if the product leaves the storable range.
    #[inline]
    pub fn checked_mul_qty(self, qty: i64) -> Option<Cents> {
        self.0.checked_mul(qty).map(Cents).filter(|c| c.is_safe())
    }
}

impl std::fmt::Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let units = self.0 / CENTS_PER_UNIT;
        let frac = (self.0 % CENTS_PER_UNIT).abs();
        // -0.50: units truncates to 0 and would drop the sign.
        if self.0 < 0 && units == 0 {
            write!(f, "-{units}.{frac:02}")
        } else {
            write!(f, "{units}.{frac:02}")
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Convert a JSON number or decimal string (dot or comma separator) to cents.
pub fn to_cents(value: &Value) -> Result<Cents, MoneyError> {
    let major = match value {
        Value::Number(n) => n.as_f64().ok_or(MoneyError::NonFiniteValue)?,
        Value::String(s) => parse_decimal(s)?,
        other => {
            return Err(MoneyError::InvalidMoneyInput {
                kind: json_kind(other),
            })
        }
    };
    round_to_cents(major)
}

/// Round an amount in major units to the nearest cent, halves away from zero.
pub fn round_to_cents(major: f64) -> Result<Cents, MoneyError> {
    if !major.is_finite() {
        return Err(MoneyError::NonFiniteValue);
    }
    let bias = if major > 0.0 {
        ROUNDING_BIAS
    } else if major < 0.0 {
        -ROUNDING_BIAS
    } else {
        0.0
    };
    let scaled = ((major + bias) * CENTS_PER_UNIT as f64).round();
    if scaled.abs() > MAX_SAFE_CENTS as f64 {
        return Err(MoneyError::Overflow { op: "to_cents" });
    }
    Ok(Cents(scaled as i64))
}

/// Cents to major units (two decimals).
pub fn from_cents(cents: Cents) -> Result<f64, MoneyError> {
    if !cents.is_safe() {
        return Err(MoneyError::Overflow { op: "from_cents" });
    }
    Ok(cents.0 as f64 / CENTS_PER_UNIT as f64)
}

fn parse_decimal(s: &str) -> Result<f64, MoneyError> {
    let normalized = s.trim().replacen(',', ".", 1);
    // Blank reads as zero.
    if normalized.is_empty() {
        return Ok(0.0);
    }
    let n: f64 = normalized
        .parse()
        .map_err(|_| MoneyError::NonFiniteValue)?;
    if !n.is_finite() {
        return Err(MoneyError::NonFiniteValue);
    }
    Ok(n)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Checked arithmetic
// ---------------------------------------------------------------------------

/// `unit * quantity`, both non-negative.
pub fn total_from_unit(unit: Cents, quantity: i64) -> Result<Cents, MoneyError> {
    if unit.is_negative() {
        return Err(MoneyError::InvalidArgument {
            name: "unit_cents",
            value: unit.0,
        });
    }
    if quantity < 0 {
        return Err(MoneyError::InvalidArgument {
            name: "quantity",
            value: quantity,
        });
    }
    unit.checked_mul_qty(quantity)
        .ok_or(MoneyError::Overflow {
            op: "total_from_unit",
        })
}

/// Weighted-average cost after adding `q2` units at `price2` to `q1` units
/// held at `avg1`: `round((q1*avg1 + q2*price2) / (q1 + q2))`, halves up.
///
/// The result always lies between `avg1` and `price2` (inclusive).
pub fn weighted_average_cents(
    q1: i64,
    avg1: Cents,
    q2: i64,
    price2: Cents,
) -> Result<Cents, MoneyError> {
    if q1 < 0 {
        return Err(MoneyError::InvalidArgument {
            name: "q1",
            value: q1,
        });
    }
    if q2 <= 0 {
        return Err(MoneyError::InvalidArgument {
            name: "q2",
            value: q2,
        });
    }
    if avg1.is_negative() {
        return Err(MoneyError::InvalidArgument {
            name: "avg1_cents",
            value: avg1.0,
        });
    }
    if price2.is_negative() {
        return Err(MoneyError::InvalidArgument {
            name: "price2_cents",
            value: price2.0,
        });
    }

    let overflow = MoneyError::Overflow {
        op: "weighted_average",
    };
    let held = avg1.checked_mul_qty(q1).ok_or(overflow.clone())?;
    let added = price2.checked_mul_qty(q2).ok_or(overflow.clone())?;
    let numerator = held.checked_add(added).ok_or(overflow.clone())?;
    let total_qty = q1.checked_add(q2).ok_or(overflow)?;

    let num = numerator.0 as i128;
    let den = total_qty as i128;
    Ok(Cents(((num * 2 + den) / (den * 2)) as i64))
}

/// Checked `a + b` within the storable range.
pub fn add_cents(a: Cents, b: Cents) -> Result<Cents, MoneyError> {
    a.checked_add(b).ok_or(MoneyError::Overflow { op: "add_cents" })
}

/// Checked `a - b` within the storable range. May go negative.
pub fn sub_cents(a: Cents, b: Cents) -> Result<Cents, MoneyError> {
    a.checked_sub(b).ok_or(MoneyError::Overflow { op: "sub_cents" })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
