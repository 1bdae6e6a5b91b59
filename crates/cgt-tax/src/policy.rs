use crate::{
    TaxError, TaxInput, TaxOutcome, EXEMPT_THRESHOLD_CENTS, RATE_DENOMINATOR, RATE_NUMERATOR,
};

// ---------------------------------------------------------------------------
// Policy contract
// ---------------------------------------------------------------------------

/// A capital-gains rule.
///
/// Implementations are stateless: every call receives the full relevant state
/// and returns the full next state. Input validation is the calculator's job,
/// so `apply` may assume `sell_total_cents >= 0` and `acc_loss_cents >= 0`.
pub trait TaxPolicy {
    /// Stable identifier, used in logs.
    fn name(&self) -> &'static str;

    fn apply(&self, input: &TaxInput) -> Result<TaxOutcome, TaxError>;
}

// ---------------------------------------------------------------------------
// Flat-rate equities policy
// ---------------------------------------------------------------------------

/// Flat rate on equity gains, with a per-sale exemption and loss offset.
///
/// Rules, in order:
/// 1. `gross <= 0`: the loss is added to the carryforward; no tax. This
///    applies whatever the size of the sale.
/// 2. `sell_total <= threshold`: exempt; carryforward untouched.
/// 3. Otherwise `taxable = gross - acc_loss`:
///    - `taxable <= 0`: the carryforward absorbs the gain; the remainder
///      `|taxable|` is carried on.
///    - else `tax = round(taxable * num / den)` (half up) and the
///      carryforward is consumed.
///
/// The exemption looks at the sell total, not the gain: a small disposal is
/// exempt outright even when profitable, and only an otherwise taxable sale
/// consumes the carryforward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquitiesFlatRate {
    exempt_threshold_cents: i64,
    rate_numerator: i64,
    rate_denominator: i64,
}

impl EquitiesFlatRate {
    pub fn new(
        exempt_threshold_cents: i64,
        rate_numerator: i64,
        rate_denominator: i64,
    ) -> Result<Self, TaxError> {
        if rate_denominator <= 0 || rate_numerator < 0 {
            return Err(TaxError::InvalidRate {
                numerator: rate_numerator,
                denominator: rate_denominator,
            });
        }
        if exempt_threshold_cents < 0 {
            return Err(TaxError::InvalidThreshold {
                threshold_cents: exempt_threshold_cents,
            });
        }
        Ok(Self {
            exempt_threshold_cents,
            rate_numerator,
            rate_denominator,
        })
    }

    pub fn exempt_threshold_cents(&self) -> i64 {
        self.exempt_threshold_cents
    }

    pub fn rate(&self) -> (i64, i64) {
        (self.rate_numerator, self.rate_denominator)
    }
}

impl Default for EquitiesFlatRate {
    fn default() -> Self {
        Self {
            exempt_threshold_cents: EXEMPT_THRESHOLD_CENTS,
            rate_numerator: RATE_NUMERATOR,
            rate_denominator: RATE_DENOMINATOR,
        }
    }
}

impl TaxPolicy for EquitiesFlatRate {
    fn name(&self) -> &'static str {
        "equities-flat-rate"
    }

    fn apply(&self, input: &TaxInput) -> Result<TaxOutcome, TaxError> {
        let TaxInput {
            gross_cents,
            sell_total_cents,
            acc_loss_cents,
        } = *input;

        // 1) Loss or break-even.
        if gross_cents <= 0 {
            let next = acc_loss_cents
                .checked_sub(gross_cents)
                .ok_or(TaxError::Overflow {
                    op: "loss carryforward",
                })?;
            return Ok(TaxOutcome {
                tax_cents: 0,
                next_acc_loss_cents: next,
            });
        }

        // 2) Exempt sale.
        if sell_total_cents <= self.exempt_threshold_cents {
            return Ok(TaxOutcome::untaxed(acc_loss_cents));
        }

        // 3) Taxable gain, offset by the carryforward.
        let taxable = gross_cents
            .checked_sub(acc_loss_cents)
            .ok_or(TaxError::Overflow { op: "loss offset" })?;
        if taxable <= 0 {
            return Ok(TaxOutcome {
                tax_cents: 0,
                next_acc_loss_cents: -taxable,
            });
        }

        let tax = mul_div_round_half_up(taxable, self.rate_numerator, self.rate_denominator)
            .ok_or(TaxError::Overflow { op: "tax rate" })?;
        Ok(TaxOutcome {
            tax_cents: tax,
            next_acc_loss_cents: 0,
        })
    }
}

/// `round(value * num / den)` with halves rounded up, for `value, num >= 0`
/// and `den > 0`. `None` if the result does not fit `i64`.
fn mul_div_round_half_up(value: i64, num: i64, den: i64) -> Option<i64> {
    let scaled = (value as i128) * (num as i128);
    let den = den as i128;
    let q = (scaled * 2 + den) / (den * 2);
    i64::try_from(q).ok()
}
