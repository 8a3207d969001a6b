use super::error::TransferError;
use super::transaction::{validate_transactions, Transaction};
use super::transfer::Transfer;
use super::warnings::Warning;
use serde::Serialize;

/// Whether a transaction opened or closed position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    Opening,
    Closing,
}

/// Working state the matcher keeps for one transaction during a pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LotState {
    pub classification: Option<Classification>,
    /// Units of this transaction already used as a counter-trade
    pub consumed: u64,
    /// Open position left when this opening ran out of counter-trades
    pub residual: Option<i64>,
}

/// Outcome of matching one product's transactions
#[derive(Debug, Clone, Default)]
pub struct ProductMatch {
    /// Transfers in emission order (chronological by opening transaction)
    pub transfers: Vec<Transfer>,
    /// Per-transaction state, indexed like the input slice
    pub lots: Vec<LotState>,
    pub warnings: Vec<Warning>,
}

/// Classify and FIFO-match one product's transactions in a single pass.
///
/// Transactions are visited in ascending date order, ties keeping input order.
/// An opening consumes the closing capacity of opposite-direction
/// transactions, earliest first, until its open position is flat. Every
/// transaction with capacity left is a candidate, including ones dated before
/// the opening.
pub fn match_transactions(transactions: &[Transaction]) -> Result<ProductMatch, TransferError> {
    validate_transactions(transactions)?;

    let mut order: Vec<usize> = (0..transactions.len()).collect();
    order.sort_by_key(|&i| transactions[i].datetime);

    let mut lots = vec![LotState::default(); transactions.len()];
    let mut transfers = Vec::new();
    let mut open_position: i64 = 0;

    for &i in &order {
        let tx = &transactions[i];

        if lots[i].classification == Some(Classification::Closing) {
            continue;
        }

        let extended = open_position
            .checked_add(tx.quantity)
            .ok_or_else(|| overflow(tx))?;
        if lots[i].classification.is_none() && extended.unsigned_abs() <= open_position.unsigned_abs() {
            lots[i].classification = Some(Classification::Closing);
            continue;
        }
        lots[i].classification = Some(Classification::Opening);

        open_position = extended;
        let direction = tx.direction();

        for &c in &order {
            if open_position == 0 {
                break;
            }
            let candidate = &transactions[c];
            let capacity = candidate.units() - lots[c].consumed;
            if candidate.direction() == direction
                || capacity == 0
                || lots[c].classification == Some(Classification::Opening)
            {
                continue;
            }

            lots[c].classification = Some(Classification::Closing);
            let matched = open_position.unsigned_abs().min(capacity);
            lots[c].consumed += matched;
            open_position = i64::try_from(matched)
                .ok()
                .and_then(|m| open_position.checked_add(m * candidate.quantity.signum()))
                .ok_or_else(|| overflow(candidate))?;

            log::debug!(
                "{}: matched {} units of {} against {}, open position {}",
                tx.product,
                matched,
                tx.id,
                candidate.id,
                open_position
            );
            transfers.push(Transfer::build(tx, candidate, matched)?);
        }

        if open_position != 0 {
            lots[i].residual = Some(open_position);
        }
    }

    let warnings = collect_warnings(transactions, &lots);
    Ok(ProductMatch {
        transfers,
        lots,
        warnings,
    })
}

fn overflow(tx: &Transaction) -> TransferError {
    TransferError::PositionOverflow { id: tx.id.clone() }
}

fn collect_warnings(transactions: &[Transaction], lots: &[LotState]) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for (tx, lot) in transactions.iter().zip(lots) {
        match lot.classification {
            Some(Classification::Opening) => {
                if let Some(quantity) = lot.residual {
                    log::warn!(
                        "{}: {} left {} units without a closing trade",
                        tx.product,
                        tx.id,
                        quantity
                    );
                    warnings.push(Warning::UnmatchedResidual {
                        product: tx.product.clone(),
                        transaction_id: tx.id.clone(),
                        quantity,
                    });
                }
            }
            Some(Classification::Closing) if lot.consumed < tx.units() => {
                let quantity = tx.units() - lot.consumed;
                log::warn!(
                    "{}: closing trade {} has {} units never matched",
                    tx.product,
                    tx.id,
                    quantity
                );
                warnings.push(Warning::UnmatchedClosing {
                    product: tx.product.clone(),
                    transaction_id: tx.id.clone(),
                    quantity,
                });
            }
            _ => {}
        }
    }
    warnings
}
