use super::transfer::{Transfer, TransferType};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// How same-day transfers are bucketed before merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum GroupingKey {
    /// Bucket by acquisition date only. Transfers sharing an acquisition date
    /// but disposed on different days end up in one line.
    #[default]
    AcquisitionDate,
    /// Bucket by acquisition date and disposal date.
    DatePair,
}

/// Consolidate transfers that share acquisition and disposal dates.
///
/// A transfer takes part only if another transfer in the list has the same
/// (acquisition date, disposal date) pair. Participants are bucketed by
/// `grouping`, then split into Long and Short, and each bucket becomes one
/// transfer. The result is ordered by acquisition, disposal and type.
pub fn simplify_transfers(transfers: Vec<Transfer>, grouping: GroupingKey) -> Vec<Transfer> {
    let mut same_dates: HashMap<(NaiveDate, NaiveDate), usize> = HashMap::new();
    for transfer in &transfers {
        *same_dates
            .entry((transfer.acquisition_date(), transfer.disposal_date()))
            .or_insert(0) += 1;
    }

    let mut simplified = Vec::with_capacity(transfers.len());
    let mut groups: BTreeMap<(NaiveDate, Option<NaiveDate>), Vec<Transfer>> = BTreeMap::new();

    for transfer in transfers {
        let dates = (transfer.acquisition_date(), transfer.disposal_date());
        if same_dates.get(&dates).copied().unwrap_or(0) < 2 {
            simplified.push(transfer);
            continue;
        }
        let key = match grouping {
            GroupingKey::AcquisitionDate => (dates.0, None),
            GroupingKey::DatePair => (dates.0, Some(dates.1)),
        };
        groups.entry(key).or_default().push(transfer);
    }

    for (_, members) in groups {
        let (long, short): (Vec<_>, Vec<_>) = members
            .into_iter()
            .partition(|t| t.transfer_type == TransferType::Long);
        for bucket in [long, short] {
            if let Some(merged) = merge(&bucket) {
                log::debug!(
                    "{}: merged {} {} transfers acquired {} into {} units",
                    merged.product,
                    bucket.len(),
                    merged.transfer_type,
                    merged.acquisition_date(),
                    merged.units
                );
                simplified.push(merged);
            }
        }
    }

    simplified.sort_by(|a, b| {
        (a.acquired, a.disposed, a.transfer_type).cmp(&(b.acquired, b.disposed, b.transfer_type))
    });
    simplified
}

fn merge(members: &[Transfer]) -> Option<Transfer> {
    let first = members.first()?;
    Some(Transfer {
        product: first.product.clone(),
        transfer_type: first.transfer_type,
        acquired: members.iter().map(|t| t.acquired).min()?,
        disposed: members.iter().map(|t| t.disposed).max()?,
        units: members.iter().map(|t| t.units).sum(),
        acquisition_value: members.iter().map(|t| t.acquisition_value).sum(),
        acquisition_total: members.iter().map(|t| t.acquisition_total).sum(),
        disposal_value: members.iter().map(|t| t.disposal_value).sum(),
        disposal_total: members.iter().map(|t| t.disposal_total).sum(),
        fees: members.iter().map(|t| t.fees).sum(),
    })
}
