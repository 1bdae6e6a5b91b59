//! Buy/sell accounting shared by both portfolio variants.
//!
//! Every function here is pure: it takes the current position and carryforward
//! by value and returns the next ones. Callers validate, call, and only then
//! assign the result, so a failed operation never leaves a half-applied state.

use cgt_tax::{TaxCalculator, TaxError, TaxInput, TaxPolicy};
use thiserror::Error;

use crate::money::{sub_cents, total_from_unit, weighted_average_cents, Cents, MoneyError};
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortfolioError {
    #[error("{op}: {reason}")]
    InvalidInput { op: &'static str, reason: String },

    #[error("Can't sell more stocks than you have")]
    InsufficientStock,

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Tax(#[from] TaxError),
}

/// Outcome of a successful sell, before it is committed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SellSettlement {
    pub sell_total: Cents,
    pub gross: Cents,
    pub tax: Cents,
    pub next_acc_loss: Cents,
    /// Position after the sell; `Position::FLAT` when fully sold.
    pub remaining: Position,
}

/// Guard: `unit >= 0` and `qty > 0`.
pub(crate) fn validate_trade(op: &'static str, unit: Cents, qty: i64) -> Result<(), PortfolioError> {
    if unit.is_negative() || !unit.is_safe() {
        return Err(PortfolioError::InvalidInput {
            op,
            reason: format!("invalid unit price {}", unit.raw()),
        });
    }
    if qty <= 0 {
        return Err(PortfolioError::InvalidInput {
            op,
            reason: format!("invalid quantity {qty}"),
        });
    }
    Ok(())
}

/// Guard: ticker must be non-blank. Returns the trimmed ticker.
pub(crate) fn normalize_ticker<'a>(op: &'static str, ticker: &'a str) -> Result<&'a str, PortfolioError> {
    let t = ticker.trim();
    if t.is_empty() {
        return Err(PortfolioError::InvalidInput {
            op,
            reason: "ticker must not be empty".to_string(),
        });
    }
    Ok(t)
}

/// Position after buying `qty` at `unit`: weighted average, quantity summed.
pub fn apply_buy_to(pos: Position, unit: Cents, qty: i64) -> Result<Position, PortfolioError> {
    let avg_price = weighted_average_cents(pos.quantity, pos.avg_price, qty, unit)?;
    let quantity = pos
        .quantity
        .checked_add(qty)
        .filter(|q| cgt_tax::in_safe_range(*q))
        .ok_or(MoneyError::Overflow {
            op: "position quantity",
        })?;
    Ok(Position {
        quantity,
        avg_price,
    })
}

/// Settle a sell of `qty` at `unit` against `pos` and the shared carryforward.
///
/// - `qty > pos.quantity` (including a flat position) is
///   [`PortfolioError::InsufficientStock`].
/// - `gross = unit*qty - avg*qty`, handed to the calculator together with the
///   sell total and `acc_loss`.
/// - The average is unchanged by sells; a fully sold position becomes
///   `Position::FLAT`.
pub fn settle_sell<P: TaxPolicy>(
    pos: Position,
    acc_loss: Cents,
    unit: Cents,
    qty: i64,
    calc: &TaxCalculator<P>,
) -> Result<SellSettlement, PortfolioError> {
    if qty > pos.quantity {
        return Err(PortfolioError::InsufficientStock);
    }

    let sell_total = total_from_unit(unit, qty)?;
    let cost_basis = total_from_unit(pos.avg_price, qty)?;
    let gross = sub_cents(sell_total, cost_basis)?;

    let out = calc.compute(&TaxInput::new(
        gross.raw(),
        sell_total.raw(),
        acc_loss.raw(),
    ))?;

    let left = pos.quantity - qty;
    let remaining = if left == 0 {
        Position::FLAT
    } else {
        Position {
            quantity: left,
            avg_price: pos.avg_price,
        }
    };

    Ok(SellSettlement {
        sell_total,
        gross,
        tax: Cents::new(out.tax_cents),
        next_acc_loss: Cents::new(out.next_acc_loss_cents),
        remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgt_tax::EquitiesFlatRate;

    const C: i64 = 100;

    fn calc() -> TaxCalculator<EquitiesFlatRate> {
        TaxCalculator::new(EquitiesFlatRate::default())
    }

    #[test]
    fn buy_from_flat_sets_average_to_price() {
        let p = apply_buy_to(Position::FLAT, Cents::new(10 * C), 100).unwrap();
        assert_eq!(p.quantity, 100);
        assert_eq!(p.avg_price, Cents::new(10 * C));
    }

    #[test]
    fn buy_recomputes_weighted_average() {
        let p = apply_buy_to(Position::FLAT, Cents::new(10 * C), 10_000).unwrap();
        let p = apply_buy_to(p, Cents::new(25 * C), 5_000).unwrap();
        assert_eq!(p.quantity, 15_000);
        // (10000*10 + 5000*25) / 15000 = 15.00
        assert_eq!(p.avg_price, Cents::new(15 * C));
    }

    #[test]
    fn sell_more_than_held_is_insufficient() {
        let pos = Position {
            quantity: 10,
            avg_price: Cents::new(C),
        };
        assert_eq!(
            settle_sell(pos, Cents::ZERO, Cents::new(C), 11, &calc()),
            Err(PortfolioError::InsufficientStock)
        );
        assert_eq!(
            settle_sell(Position::FLAT, Cents::ZERO, Cents::new(C), 1, &calc()),
            Err(PortfolioError::InsufficientStock)
        );
    }

    #[test]
    fn sell_keeps_average_and_reports_gross() {
        let pos = Position {
            quantity: 10_000,
            avg_price: Cents::new(10 * C),
        };
        let s = settle_sell(pos, Cents::ZERO, Cents::new(20 * C), 5_000, &calc()).unwrap();
        assert_eq!(s.sell_total, Cents::new(100_000 * C));
        assert_eq!(s.gross, Cents::new(50_000 * C));
        assert_eq!(s.tax, Cents::new(10_000 * C));
        assert_eq!(s.next_acc_loss, Cents::ZERO);
        assert_eq!(s.remaining.quantity, 5_000);
        assert_eq!(s.remaining.avg_price, Cents::new(10 * C));
    }

    #[test]
    fn full_sell_flattens_position() {
        let pos = Position {
            quantity: 50,
            avg_price: Cents::new(10 * C),
        };
        let s = settle_sell(pos, Cents::ZERO, Cents::new(5 * C), 50, &calc()).unwrap();
        assert_eq!(s.remaining, Position::FLAT);
        assert_eq!(s.next_acc_loss, Cents::new(250 * C));
    }

    #[test]
    fn validate_trade_rejects_bad_values() {
        assert!(validate_trade("t", Cents::new(-1), 1).is_err());
        assert!(validate_trade("t", Cents::new(1), 0).is_err());
        assert!(validate_trade("t", Cents::ZERO, 1).is_ok());
    }

    #[test]
    fn normalize_ticker_trims_and_rejects_blank() {
        assert_eq!(normalize_ticker("t", "  AAPL ").unwrap(), "AAPL");
        assert!(matches!(
            normalize_ticker("t", "   "),
            Err(PortfolioError::InvalidInput { .. })
        ));
    }
}
