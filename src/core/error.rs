#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("transaction {id} has no {field} but is part of a match")]
    MissingValue { id: String, field: &'static str },
    #[error("transaction {id} has zero quantity")]
    InvalidQuantity { id: String },
    #[error("transaction {id} direction disagrees with the sign of its quantity")]
    DirectionMismatch { id: String },
    #[error("open position overflows at transaction {id}")]
    PositionOverflow { id: String },
    #[error("invalid datetime: {0}")]
    InvalidDatetime(String),
    #[error("product {product}: {source}")]
    Product {
        product: String,
        #[source]
        source: Box<TransferError>,
    },
}

impl TransferError {
    /// Attach the product code of the halted computation.
    pub fn for_product(self, product: &str) -> Self {
        TransferError::Product {
            product: product.to_string(),
            source: Box::new(self),
        }
    }
}
