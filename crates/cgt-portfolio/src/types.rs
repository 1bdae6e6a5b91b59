use crate::money::Cents;

/// Ticker used when an operation names none (single-instrument mode).
pub const DEFAULT_TICKER: &str = "DEFAULT";

/// BUY or SELL.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Case-insensitive `"buy"` / `"sell"`.
    pub fn parse(s: &str) -> Option<Side> {
        match s.to_lowercase().as_str() {
            "buy" => Some(Side::Buy),
            "sell" => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

/// One normalized instruction.
///
/// `qty` is always positive, `unit_cents` non-negative, `ticker` non-empty
/// and trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub side: Side,
    pub unit_cents: Cents,
    pub qty: i64,
    pub ticker: String,
}

impl Operation {
    pub fn new<S: Into<String>>(side: Side, ticker: S, unit_cents: Cents, qty: i64) -> Self {
        debug_assert!(qty > 0, "Operation.qty must be > 0");
        debug_assert!(unit_cents.is_non_negative(), "Operation.unit_cents must be >= 0");
        Self {
            side,
            unit_cents,
            qty,
            ticker: ticker.into(),
        }
    }

    pub fn buy<S: Into<String>>(ticker: S, unit_cents: Cents, qty: i64) -> Self {
        Self::new(Side::Buy, ticker, unit_cents, qty)
    }

    pub fn sell<S: Into<String>>(ticker: S, unit_cents: Cents, qty: i64) -> Self {
        Self::new(Side::Sell, ticker, unit_cents, qty)
    }
}

/// Holdings of one ticker.
///
/// `avg_price` only means something while `quantity > 0`; a flat position is
/// always `Position::FLAT` so a later buy starts a fresh average.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub quantity: i64,
    pub avg_price: Cents,
}

impl Position {
    pub const FLAT: Position = Position {
        quantity: 0,
        avg_price: Cents::ZERO,
    };

    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }
}
