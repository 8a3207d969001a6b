use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Non-fatal findings from a matching pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// An opening trade ran out of counter-trades; `quantity` is the signed
    /// open position carried forward from it.
    UnmatchedResidual {
        product: String,
        transaction_id: String,
        quantity: i64,
    },
    /// A closing trade kept units that no opening consumed.
    UnmatchedClosing {
        product: String,
        transaction_id: String,
        quantity: u64,
    },
}
