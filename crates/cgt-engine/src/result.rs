use cgt_portfolio::{from_cents, Cents, CENTS_PER_UNIT};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

/// Tax due for one operation, in cents.
///
/// Serialized in major units: a JSON integer when the amount is whole
/// (`10000`), otherwise a two-decimal number (`12.34`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TaxAmount(pub Cents);

impl TaxAmount {
    pub const ZERO: TaxAmount = TaxAmount(Cents::ZERO);

    pub fn cents(&self) -> Cents {
        self.0
    }
}

impl Serialize for TaxAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = self.0.raw();
        if raw % CENTS_PER_UNIT == 0 {
            serializer.serialize_i64(raw / CENTS_PER_UNIT)
        } else {
            let major = from_cents(self.0).map_err(S::Error::custom)?;
            serializer.serialize_f64(major)
        }
    }
}

/// Outcome of one input operation, in input order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationResult {
    Tax(TaxAmount),
    Error(String),
}

impl OperationResult {
    pub fn tax(cents: Cents) -> Self {
        OperationResult::Tax(TaxAmount(cents))
    }

    pub fn error(msg: impl Into<String>) -> Self {
        OperationResult::Error(msg.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OperationResult::Error(_))
    }
}
