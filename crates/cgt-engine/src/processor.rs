use anyhow::Result;
use cgt_config::{AccountConfig, EngineConfig};
use cgt_portfolio::{parse_operations_str, Operation, ParseError, Portfolio, PortfolioError};
use cgt_tax::{EquitiesFlatRate, TaxCalculator, TaxPolicy};
use tracing::{debug, error, warn};

use crate::framing::split_payloads;
use crate::guard::AccountGuard;
use crate::result::OperationResult;

pub const ERR_ACCOUNT_BLOCKED: &str = "Your account is blocked";
pub const ERR_INTERNAL: &str = "Internal error";

/// Runs payloads of operations through a fresh [`Portfolio`] each.
#[derive(Clone, Debug)]
pub struct LineProcessor<P> {
    calc: TaxCalculator<P>,
    account: AccountConfig,
}

impl LineProcessor<EquitiesFlatRate> {
    /// Processor for validated engine settings.
    pub fn from_config(cfg: &EngineConfig) -> Result<Self> {
        Ok(Self::new(
            TaxCalculator::new(cfg.tax_policy()?),
            cfg.account.clone(),
        ))
    }
}

impl Default for LineProcessor<EquitiesFlatRate> {
    fn default() -> Self {
        Self::new(
            TaxCalculator::new(EquitiesFlatRate::default()),
            AccountConfig::default(),
        )
    }
}

impl<P: TaxPolicy> LineProcessor<P> {
    pub fn new(calc: TaxCalculator<P>, account: AccountConfig) -> Self {
        Self { calc, account }
    }

    pub fn calculator(&self) -> &TaxCalculator<P> {
        &self.calc
    }

    /// One result per operation, in order, against an empty portfolio.
    pub fn process_operations(&self, ops: &[Operation]) -> Vec<OperationResult> {
        let mut book = Portfolio::new();
        let mut guard = AccountGuard::new(self.account.error_streak_limit);
        let mut out = Vec::with_capacity(ops.len());

        for (i, op) in ops.iter().enumerate() {
            if guard.is_blocked() {
                out.push(OperationResult::error(ERR_ACCOUNT_BLOCKED));
                continue;
            }
            match book.apply(op, &self.calc) {
                Ok(tax) => {
                    guard.record_success();
                    out.push(OperationResult::tax(tax));
                }
                Err(e @ PortfolioError::InsufficientStock) => {
                    guard.record_insufficient_stock();
                    out.push(OperationResult::error(e.to_string()));
                }
                Err(e) => {
                    error!(
                        operation = i + 1,
                        side = op.side.as_str(),
                        ticker = %op.ticker,
                        error = %e,
                        "operation failed"
                    );
                    out.push(OperationResult::error(ERR_INTERNAL));
                }
            }
        }
        out
    }

    /// Parse and process one JSON array payload.
    pub fn process_payload(&self, payload: &str) -> Result<Vec<OperationResult>, ParseError> {
        let ops = parse_operations_str(payload)?;
        debug!(operations = ops.len(), "payload parsed");
        Ok(self.process_operations(&ops))
    }

    /// Process every payload on `line`. Payloads that fail to parse are
    /// logged and skipped.
    pub fn process_line(&self, line: &str) -> Vec<Vec<OperationResult>> {
        split_payloads(line)
            .into_iter()
            .filter_map(|p| self.process_or_skip(p))
            .collect()
    }

    pub(crate) fn process_or_skip(&self, payload: &str) -> Option<Vec<OperationResult>> {
        match self.process_payload(payload) {
            Ok(results) => Some(results),
            Err(e) => {
                warn!(error = %e, "invalid payload skipped");
                None
            }
        }
    }
}
