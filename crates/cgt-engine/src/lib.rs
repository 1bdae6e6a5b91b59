//! cgt-engine
//!
//! Line-oriented driver around the portfolio:
//! - split a text line into top-level JSON array payloads
//! - run each payload against a fresh multi-ticker portfolio
//! - map every operation to `{"tax": n}` or `{"error": "..."}`
//! - block the account after a streak of insufficient-stock rejections
//!
//! Payloads are independent: nothing carries over between them, not even
//! between payloads on the same line.

mod framing;
mod guard;
mod processor;
mod result;
mod runner;

pub use framing::split_payloads;
pub use guard::{AccountGuard, AccountStatus};
pub use processor::{LineProcessor, ERR_ACCOUNT_BLOCKED, ERR_INTERNAL};
pub use result::{OperationResult, TaxAmount};
pub use runner::RunSummary;
