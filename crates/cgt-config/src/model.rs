use anyhow::{bail, Context, Result};
use cgt_tax::{EquitiesFlatRate, EXEMPT_THRESHOLD_CENTS, RATE_DENOMINATOR, RATE_NUMERATOR};
use serde::{Deserialize, Serialize};

/// Consecutive insufficient-stock rejections that block an account.
pub const DEFAULT_ERROR_STREAK_LIMIT: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub tax: TaxConfig,
    pub account: AccountConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxConfig {
    pub exempt_threshold_cents: i64,
    pub rate_numerator: i64,
    pub rate_denominator: i64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            exempt_threshold_cents: EXEMPT_THRESHOLD_CENTS,
            rate_numerator: RATE_NUMERATOR,
            rate_denominator: RATE_DENOMINATOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountConfig {
    pub error_streak_limit: u32,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            error_streak_limit: DEFAULT_ERROR_STREAK_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        let t = &self.tax;
        if t.rate_denominator <= 0 {
            bail!(
                "CONFIG_INVALID tax.rate_denominator must be > 0 (got {})",
                t.rate_denominator
            );
        }
        if t.rate_numerator < 0 {
            bail!(
                "CONFIG_INVALID tax.rate_numerator must be >= 0 (got {})",
                t.rate_numerator
            );
        }
        if t.exempt_threshold_cents < 0 {
            bail!(
                "CONFIG_INVALID tax.exempt_threshold_cents must be >= 0 (got {})",
                t.exempt_threshold_cents
            );
        }
        if self.account.error_streak_limit < 1 {
            bail!("CONFIG_INVALID account.error_streak_limit must be >= 1 (got 0)");
        }
        Ok(())
    }

    /// Build the flat-rate policy these settings describe.
    pub fn tax_policy(&self) -> Result<EquitiesFlatRate> {
        let t = &self.tax;
        EquitiesFlatRate::new(t.exempt_threshold_cents, t.rate_numerator, t.rate_denominator)
            .context("tax settings rejected by policy")
    }
}
