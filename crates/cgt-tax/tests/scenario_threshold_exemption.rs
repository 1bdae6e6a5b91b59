//! Scenario: sales at or below the exemption threshold are never taxed.
//!
//! # Invariants under test
//!
//! 1. `sell_total <= 2,000,000` cents => tax 0, whatever the sign of the gain.
//! 2. An exempt gain leaves the carryforward untouched.
//! 3. An exempt loss still grows the carryforward.

use cgt_tax::*;
use proptest::prelude::*;

fn calc() -> TaxCalculator<EquitiesFlatRate> {
    TaxCalculator::new(EquitiesFlatRate::default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_exempt_sales_pay_no_tax(
        sell_total in 0i64..=EXEMPT_THRESHOLD_CENTS,
        gross in -EXEMPT_THRESHOLD_CENTS..=EXEMPT_THRESHOLD_CENTS,
        acc_loss in 0i64..1_000_000_000,
    ) {
        let out = calc().compute(&TaxInput::new(gross, sell_total, acc_loss)).unwrap();
        prop_assert_eq!(out.tax_cents, 0);
    }

    #[test]
    fn prop_exempt_gain_keeps_carryforward(
        sell_total in 0i64..=EXEMPT_THRESHOLD_CENTS,
        gross in 1i64..=EXEMPT_THRESHOLD_CENTS,
        acc_loss in 0i64..1_000_000_000,
    ) {
        let out = calc().compute(&TaxInput::new(gross, sell_total, acc_loss)).unwrap();
        prop_assert_eq!(out.next_acc_loss_cents, acc_loss);
    }

    #[test]
    fn prop_exempt_loss_grows_carryforward(
        sell_total in 0i64..=EXEMPT_THRESHOLD_CENTS,
        loss in 0i64..=EXEMPT_THRESHOLD_CENTS,
        acc_loss in 0i64..1_000_000_000,
    ) {
        let out = calc().compute(&TaxInput::new(-loss, sell_total, acc_loss)).unwrap();
        prop_assert_eq!(out.next_acc_loss_cents, acc_loss + loss);
    }
}

#[test]
fn one_cent_above_threshold_is_taxable() {
    let out = calc()
        .compute(&TaxInput::new(100_000, EXEMPT_THRESHOLD_CENTS + 1, 0))
        .unwrap();
    assert_eq!(out.tax_cents, 20_000);
}
