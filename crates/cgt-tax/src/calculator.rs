use crate::{in_safe_range, TaxError, TaxInput, TaxOutcome, TaxPolicy};

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// Guard: the triple handed to a policy.
///
/// - `gross_cents` may take either sign but must be in the safe range.
/// - `sell_total_cents` and `acc_loss_cents` must be non-negative and in range.
pub fn validate_input(input: &TaxInput) -> Result<(), TaxError> {
    if !in_safe_range(input.gross_cents) {
        return Err(TaxError::InvalidGross {
            gross_cents: input.gross_cents,
        });
    }
    if input.sell_total_cents < 0 || !in_safe_range(input.sell_total_cents) {
        return Err(TaxError::InvalidSellTotal {
            sell_total_cents: input.sell_total_cents,
        });
    }
    if input.acc_loss_cents < 0 || !in_safe_range(input.acc_loss_cents) {
        return Err(TaxError::InvalidAccumulatedLoss {
            acc_loss_cents: input.acc_loss_cents,
        });
    }
    Ok(())
}

/// Guard: what a policy handed back. Both fields non-negative and in range.
pub fn validate_outcome(out: &TaxOutcome) -> Result<(), TaxError> {
    let ok = |v: i64| v >= 0 && in_safe_range(v);
    if !ok(out.tax_cents) || !ok(out.next_acc_loss_cents) {
        return Err(TaxError::InvalidPolicyResult {
            tax_cents: out.tax_cents,
            next_acc_loss_cents: out.next_acc_loss_cents,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Validating wrapper around a [`TaxPolicy`].
///
/// Keeps policies free of input checks while guaranteeing callers never see
/// a malformed outcome.
#[derive(Clone, Debug)]
pub struct TaxCalculator<P> {
    policy: P,
}

impl<P: TaxPolicy> TaxCalculator<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn compute(&self, input: &TaxInput) -> Result<TaxOutcome, TaxError> {
        validate_input(input)?;
        let out = self.policy.apply(input)?;
        validate_outcome(&out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EquitiesFlatRate, MAX_SAFE_CENTS};

    /// Returns whatever it was built with.
    struct Fixed(TaxOutcome);

    impl TaxPolicy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn apply(&self, _input: &TaxInput) -> Result<TaxOutcome, TaxError> {
            Ok(self.0)
        }
    }

    fn fixed(tax: i64, next: i64) -> TaxCalculator<Fixed> {
        TaxCalculator::new(Fixed(TaxOutcome {
            tax_cents: tax,
            next_acc_loss_cents: next,
        }))
    }

    #[test]
    fn delegates_to_policy() {
        let calc = TaxCalculator::new(EquitiesFlatRate::default());
        let out = calc
            .compute(&TaxInput::new(5_000_000, 10_000_000, 0))
            .unwrap();
        assert_eq!(out.tax_cents, 1_000_000);
    }

    #[test]
    fn rejects_negative_sell_total() {
        let err = fixed(0, 0)
            .compute(&TaxInput::new(0, -1, 0))
            .unwrap_err();
        assert_eq!(err, TaxError::InvalidSellTotal { sell_total_cents: -1 });
    }

    #[test]
    fn rejects_negative_accumulated_loss() {
        let err = fixed(0, 0)
            .compute(&TaxInput::new(0, 0, -5))
            .unwrap_err();
        assert_eq!(err, TaxError::InvalidAccumulatedLoss { acc_loss_cents: -5 });
    }

    #[test]
    fn rejects_out_of_range_gross() {
        let err = fixed(0, 0)
            .compute(&TaxInput::new(-MAX_SAFE_CENTS - 1, 0, 0))
            .unwrap_err();
        assert_eq!(
            err,
            TaxError::InvalidGross {
                gross_cents: -MAX_SAFE_CENTS - 1
            }
        );
    }

    #[test]
    fn negative_gross_is_valid_input() {
        assert!(validate_input(&TaxInput::new(-1_000, 0, 0)).is_ok());
    }

    #[test]
    fn rejects_negative_tax_from_policy() {
        let err = fixed(-1, 0)
            .compute(&TaxInput::new(10, 10, 0))
            .unwrap_err();
        assert_eq!(
            err,
            TaxError::InvalidPolicyResult {
                tax_cents: -1,
                next_acc_loss_cents: 0
            }
        );
    }

    #[test]
    fn rejects_negative_carryforward_from_policy() {
        let err = fixed(0, -7)
            .compute(&TaxInput::new(10, 10, 0))
            .unwrap_err();
        assert!(matches!(err, TaxError::InvalidPolicyResult { .. }));
    }

    #[test]
    fn rejects_out_of_range_outcome() {
        let err = fixed(MAX_SAFE_CENTS + 1, 0)
            .compute(&TaxInput::new(10, 10, 0))
            .unwrap_err();
        assert!(matches!(err, TaxError::InvalidPolicyResult { .. }));
    }
}
