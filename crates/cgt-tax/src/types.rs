use thiserror::Error;

/// Largest magnitude a cents amount may take: 2^53 - 1.
///
/// Amounts inside this range convert to `f64` major units without loss.
pub const MAX_SAFE_CENTS: i64 = 9_007_199_254_740_991;

/// Sales totalling at most this amount (20,000.00) are exempt.
pub const EXEMPT_THRESHOLD_CENTS: i64 = 2_000_000;

/// Default rate: 20/100.
pub const RATE_NUMERATOR: i64 = 20;
pub const RATE_DENOMINATOR: i64 = 100;

/// `true` if `cents` lies in `[-MAX_SAFE_CENTS, MAX_SAFE_CENTS]`.
#[inline]
pub fn in_safe_range(cents: i64) -> bool {
    (-MAX_SAFE_CENTS..=MAX_SAFE_CENTS).contains(&cents)
}

/// Everything a policy needs to settle one sell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaxInput {
    /// Sell proceeds minus cost basis. Positive = gain.
    pub gross_cents: i64,
    /// Sell proceeds (unit price x quantity), >= 0.
    pub sell_total_cents: i64,
    /// Loss carried forward before this sell, >= 0.
    pub acc_loss_cents: i64,
}

impl TaxInput {
    pub fn new(gross_cents: i64, sell_total_cents: i64, acc_loss_cents: i64) -> Self {
        Self {
            gross_cents,
            sell_total_cents,
            acc_loss_cents,
        }
    }
}

/// Policy output: the tax due and the full next carryforward value.
///
/// `next_acc_loss_cents` replaces the caller's accumulated loss; it is not a
/// delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaxOutcome {
    pub tax_cents: i64,
    pub next_acc_loss_cents: i64,
}

impl TaxOutcome {
    /// No tax, carryforward unchanged.
    pub fn untaxed(acc_loss_cents: i64) -> Self {
        Self {
            tax_cents: 0,
            next_acc_loss_cents: acc_loss_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxError {
    #[error("gross result out of range: {gross_cents}")]
    InvalidGross { gross_cents: i64 },

    #[error("sell total must be a non-negative amount, got {sell_total_cents}")]
    InvalidSellTotal { sell_total_cents: i64 },

    #[error("accumulated loss must be a non-negative amount, got {acc_loss_cents}")]
    InvalidAccumulatedLoss { acc_loss_cents: i64 },

    #[error(
        "policy returned an invalid result: tax={tax_cents} next_acc_loss={next_acc_loss_cents}"
    )]
    InvalidPolicyResult {
        tax_cents: i64,
        next_acc_loss_cents: i64,
    },

    #[error("invalid tax rate {numerator}/{denominator}")]
    InvalidRate { numerator: i64, denominator: i64 },

    #[error("exemption threshold must be >= 0, got {threshold_cents}")]
    InvalidThreshold { threshold_cents: i64 },

    #[error("overflow in {op}")]
    Overflow { op: &'static str },
}
