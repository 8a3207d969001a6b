use super::error::TransferError;
use super::matching::{match_transactions, ProductMatch};
use super::simplify::{simplify_transfers, GroupingKey};
use super::transaction::Transaction;
use super::transfer::Transfer;
use super::warnings::Warning;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options for turning transactions into transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TransferOptions {
    pub grouping: GroupingKey,
    /// Consolidate same-day transfers; when false the matcher output is kept as is
    pub simplify: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        TransferOptions {
            grouping: GroupingKey::default(),
            simplify: true,
        }
    }
}

/// Final transfers of every product
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransferReport {
    pub products: BTreeMap<String, Vec<Transfer>>,
    pub warnings: Vec<Warning>,
}

impl TransferReport {
    pub fn transfers(&self) -> impl Iterator<Item = &Transfer> {
        self.products.values().flatten()
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers().count()
    }

    pub fn total_fees(&self) -> Decimal {
        self.transfers().map(|t| t.fees).sum()
    }

    /// Sum of the positive gross gains
    pub fn total_gains(&self) -> Decimal {
        self.transfers().map(Transfer::gain).filter(|g| g.is_sign_positive()).sum()
    }

    /// Sum of the negative gross gains
    pub fn total_losses(&self) -> Decimal {
        self.transfers().map(Transfer::gain).filter(|g| g.is_sign_negative()).sum()
    }

    pub fn total_gains_with_fees(&self) -> Decimal {
        self.transfers()
            .map(Transfer::gain_with_fees)
            .filter(|g| g.is_sign_positive())
            .sum()
    }

    pub fn total_losses_with_fees(&self) -> Decimal {
        self.transfers()
            .map(Transfer::gain_with_fees)
            .filter(|g| g.is_sign_negative())
            .sum()
    }

    pub fn net_gain(&self) -> Decimal {
        self.total_gains() + self.total_losses()
    }

    pub fn net_gain_with_fees(&self) -> Decimal {
        self.total_gains_with_fees() + self.total_losses_with_fees()
    }

    /// Fees implied by the gap between gross and fee-inclusive results
    pub fn estimated_fees(&self) -> Decimal {
        self.net_gain() - self.net_gain_with_fees()
    }
}

/// Match and consolidate one product's transactions
pub fn compute_product_transfers(
    transactions: &[Transaction],
    options: TransferOptions,
) -> Result<ProductMatch, TransferError> {
    let mut result = match_transactions(transactions)?;
    let matched = result.transfers.len();
    if options.simplify {
        result.transfers = simplify_transfers(std::mem::take(&mut result.transfers), options.grouping);
    }
    log::info!(
        "{}: {} transactions, {} transfers matched, {} after consolidation",
        transactions.first().map_or("", |tx| tx.product.as_str()),
        transactions.len(),
        matched,
        result.transfers.len()
    );
    Ok(result)
}

/// Compute final transfers for every product.
///
/// Products are independent; the first failing product aborts the whole
/// computation so no partial figures are returned.
pub fn compute_transfers(
    by_product: &BTreeMap<String, Vec<Transaction>>,
    options: TransferOptions,
) -> Result<TransferReport, TransferError> {
    let mut report = TransferReport::default();
    for (product, transactions) in by_product {
        log::debug!("Computing transfers for {}", product);
        let result = compute_product_transfers(transactions, options)
            .map_err(|err| err.for_product(product))?;
        report.warnings.extend(result.warnings);
        report.products.insert(product.clone(), result.transfers);
    }
    Ok(report)
}
