use cgt_tax::{TaxCalculator, TaxPolicy};

use crate::accounting::{apply_buy_to, settle_sell, validate_trade, PortfolioError};
use crate::money::Cents;
use crate::types::Position;

/// Portfolio state for a single instrument.
///
/// Same accounting as [`Portfolio`](crate::Portfolio), without the ticker map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SingleTickerPortfolio {
    position: Position,
    acc_loss: Cents,
}

impl SingleTickerPortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buy `qty` at `unit`. Never fails on business grounds.
    ///
    /// # Errors
    /// [`PortfolioError::InvalidInput`] for a negative price or non-positive
    /// quantity; [`PortfolioError::Money`] on overflow. State is not mutated
    /// on error.
    pub fn apply_buy(&mut self, unit: Cents, qty: i64) -> Result<(), PortfolioError> {
        validate_trade("apply_buy", unit, qty)?;
        self.position = apply_buy_to(self.position, unit, qty)?;
        Ok(())
    }

    /// Sell `qty` at `unit` and return the tax due.
    ///
    /// # Errors
    /// [`PortfolioError::InsufficientStock`] if `qty` exceeds the holding.
    /// State is not mutated on any error.
    pub fn apply_sell<P: TaxPolicy>(
        &mut self,
        unit: Cents,
        qty: i64,
        calc: &TaxCalculator<P>,
    ) -> Result<Cents, PortfolioError> {
        validate_trade("apply_sell", unit, qty)?;
        let s = settle_sell(self.position, self.acc_loss, unit, qty, calc)?;

        self.acc_loss = s.next_acc_loss;
        self.position = s.remaining;
        Ok(s.tax)
    }

    pub fn quantity(&self) -> i64 {
        self.position.quantity
    }

    pub fn avg_price(&self) -> Cents {
        self.position.avg_price
    }

    pub fn acc_loss(&self) -> Cents {
        self.acc_loss
    }

    pub fn position(&self) -> Position {
        self.position
    }
}
