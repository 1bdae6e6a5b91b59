//! Multi-ticker portfolio: per-ticker positions plus one shared loss
//! carryforward.
//!
//! # Invariants
//!
//! - A ticker is present in the map only while its quantity is > 0. It is
//!   created by its first buy and removed when a sell brings it to zero, so a
//!   later buy never inherits a stale average.
//! - `acc_loss` is shared across tickers: a loss on one instrument offsets a
//!   later taxable gain on any other, in the order operations are applied.
//! - `acc_loss` is only ever replaced by the calculator's returned value.
//! - Every mutating entry point validates and settles first, then commits in
//!   one block. `InsufficientStock` (or any other error) leaves the book
//!   untouched.
//!
//! # Determinism
//! No IO, no time, no randomness. Tickers are kept in a `BTreeMap`, so
//! [`Portfolio::tickers`] is sorted.

use std::collections::BTreeMap;

use cgt_tax::{TaxCalculator, TaxPolicy};

use crate::accounting::{apply_buy_to, normalize_ticker, settle_sell, validate_trade, PortfolioError};
use crate::money::Cents;
use crate::types::{Operation, Position, Side};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Portfolio {
    positions: BTreeMap<String, Position>,
    acc_loss: Cents,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Write surface
    // -----------------------------------------------------------------------

    /// Buy `qty` of `ticker` at `unit`.
    ///
    /// # Errors
    /// [`PortfolioError::InvalidInput`] for a blank ticker, negative price or
    /// non-positive quantity; [`PortfolioError::Money`] on overflow.
    pub fn apply_buy(&mut self, ticker: &str, unit: Cents, qty: i64) -> Result<(), PortfolioError> {
        let ticker = normalize_ticker("apply_buy", ticker)?;
        validate_trade("apply_buy", unit, qty)?;

        let next = apply_buy_to(self.position(ticker), unit, qty)?;
        self.positions.insert(ticker.to_string(), next);
        Ok(())
    }

    /// Sell `qty` of `ticker` at `unit` and return the tax due.
    ///
    /// # Errors
    /// [`PortfolioError::InsufficientStock`] if `qty` exceeds the holding or
    /// the ticker is not held.
    pub fn apply_sell<P: TaxPolicy>(
        &mut self,
        ticker: &str,
        unit: Cents,
        qty: i64,
        calc: &TaxCalculator<P>,
    ) -> Result<Cents, PortfolioError> {
        let ticker = normalize_ticker("apply_sell", ticker)?;
        validate_trade("apply_sell", unit, qty)?;

        let s = settle_sell(self.position(ticker), self.acc_loss, unit, qty, calc)?;

        self.acc_loss = s.next_acc_loss;
        if s.remaining.is_flat() {
            self.positions.remove(ticker);
        } else {
            self.positions.insert(ticker.to_string(), s.remaining);
        }
        Ok(s.tax)
    }

    /// Apply one parsed operation. Buys yield zero tax.
    pub fn apply<P: TaxPolicy>(
        &mut self,
        op: &Operation,
        calc: &TaxCalculator<P>,
    ) -> Result<Cents, PortfolioError> {
        match op.side {
            Side::Buy => self
                .apply_buy(&op.ticker, op.unit_cents, op.qty)
                .map(|()| Cents::ZERO),
            Side::Sell => self.apply_sell(&op.ticker, op.unit_cents, op.qty, calc),
        }
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    /// Current position for `ticker`; `Position::FLAT` if not held.
    pub fn position(&self, ticker: &str) -> Position {
        self.positions
            .get(ticker.trim())
            .copied()
            .unwrap_or(Position::FLAT)
    }

    /// Tickers with an open position, sorted.
    pub fn tickers(&self) -> Vec<&str> {
        self.positions.keys().map(String::as_str).collect()
    }

    /// Loss carried forward, shared by all tickers.
    pub fn acc_loss(&self) -> Cents {
        self.acc_loss
    }

    /// `true` if no open positions exist.
    pub fn is_flat(&self) -> bool {
        self.positions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
