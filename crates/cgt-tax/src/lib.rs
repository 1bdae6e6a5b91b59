//! cgt-tax
//!
//! Capital-gains tax policy and the calculator that guards it.
//!
//! - `TaxPolicy`: narrow functional contract
//!   (gross, sell total, accumulated loss) -> (tax, next accumulated loss)
//! - `EquitiesFlatRate`: the one production policy (20% above an exemption
//!   threshold, with loss carryforward)
//! - `TaxCalculator`: validates inputs and policy outcomes around the call
//!
//! Deterministic, pure logic. No IO, no time. Amounts are raw `i64` cents.

mod calculator;
mod policy;
mod types;

pub use calculator::{validate_input, validate_outcome, TaxCalculator};
pub use policy::{EquitiesFlatRate, TaxPolicy};
pub use types::*;
