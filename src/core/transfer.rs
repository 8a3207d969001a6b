use super::error::TransferError;
use super::transaction::{Direction, Transaction};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether the position was opened by a buy or by a sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransferType {
    Long,
    Short,
}

impl TransferType {
    pub fn display(&self) -> &'static str {
        match self {
            TransferType::Long => "Long",
            TransferType::Short => "Short",
        }
    }
}

impl std::fmt::Display for TransferType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A realized disposal of units against an acquisition.
///
/// Monetary fields are magnitudes pro-rated to `units`. The acquisition side
/// is always the opening trade, so for a `Short` transfer the acquisition
/// values are the sale proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub product: String,
    pub transfer_type: TransferType,
    pub acquired: DateTime<FixedOffset>,
    pub disposed: DateTime<FixedOffset>,
    pub units: u64,
    pub acquisition_value: Decimal,
    pub acquisition_total: Decimal,
    pub disposal_value: Decimal,
    pub disposal_total: Decimal,
    pub fees: Decimal,
}

impl Transfer {
    /// Pair `units` of an opening trade with the same number of units of a closing trade
    pub fn build(opening: &Transaction, closing: &Transaction, units: u64) -> Result<Transfer, TransferError> {
        for tx in [opening, closing] {
            if tx.quantity == 0 {
                return Err(TransferError::InvalidQuantity { id: tx.id.clone() });
            }
        }
        let matched = Decimal::from(units);
        let opening_units = Decimal::from(opening.units());
        let closing_units = Decimal::from(closing.units());

        let opening_fee = opening.fee()? / opening_units;
        let closing_fee = closing.fee()? / closing_units;

        Ok(Transfer {
            product: opening.product.clone(),
            transfer_type: match opening.direction() {
                Direction::Buy => TransferType::Long,
                Direction::Sell => TransferType::Short,
            },
            acquired: opening.datetime,
            disposed: closing.datetime,
            units,
            acquisition_value: opening.value()? / opening_units * matched,
            acquisition_total: opening.total()? / opening_units * matched,
            disposal_value: closing.value()? / closing_units * matched,
            disposal_total: closing.total()? / closing_units * matched,
            fees: (opening_fee + closing_fee) * matched,
        })
    }

    pub fn acquisition_date(&self) -> NaiveDate {
        self.acquired.date_naive()
    }

    pub fn disposal_date(&self) -> NaiveDate {
        self.disposed.date_naive()
    }

    /// Gain on gross values: sale side minus purchase side
    pub fn gain(&self) -> Decimal {
        self.signed(self.acquisition_value, self.disposal_value)
    }

    /// Gain on values including fees and charges
    pub fn gain_with_fees(&self) -> Decimal {
        self.signed(self.acquisition_total, self.disposal_total)
    }

    fn signed(&self, acquisition: Decimal, disposal: Decimal) -> Decimal {
        match self.transfer_type {
            TransferType::Long => disposal - acquisition,
            TransferType::Short => acquisition - disposal,
        }
    }
}
