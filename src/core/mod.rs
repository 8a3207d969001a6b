pub mod error;
pub mod matching;
pub mod report;
pub mod simplify;
pub mod transaction;
pub mod transfer;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use error::TransferError;
pub use matching::{match_transactions, Classification, LotState, ProductMatch};
pub use report::{compute_product_transfers, compute_transfers, TransferOptions, TransferReport};
pub use simplify::{simplify_transfers, GroupingKey};
pub use transaction::{
    group_by_product, read_transactions_json, transaction_input_schema, validate_transactions,
    Direction, Transaction, TransactionInput,
};
pub use transfer::{Transfer, TransferType};
pub use warnings::Warning;
