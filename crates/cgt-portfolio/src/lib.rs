//! cgt-portfolio
//!
//! Integer-cent money, the operation parser and the portfolio state that
//! turns buys and sells into per-sell tax amounts.
//! - Money is `Cents` (i64) everywhere; floats only at the JSON boundary
//! - Weighted average price per ticker, recomputed on buys only
//! - One loss carryforward shared by every ticker
//! - Pure deterministic logic (no IO, no time)

mod accounting;
mod book;
mod state;
mod types;

pub mod money;
pub mod operations;

pub use accounting::{apply_buy_to, settle_sell, PortfolioError, SellSettlement};
pub use book::Portfolio;
pub use money::{
    add_cents, from_cents, round_to_cents, sub_cents, to_cents, total_from_unit,
    weighted_average_cents, Cents, MoneyError, CENTS_PER_UNIT, MAX_SAFE_CENTS,
};
pub use operations::{parse_operations, parse_operations_str, ParseError};
pub use state::SingleTickerPortfolio;
pub use types::{Operation, Position, Side, DEFAULT_TICKER};
