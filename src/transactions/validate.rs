//! Stable-sort-key checks: ids must be unique and, taken in id order, never go back in time.

use super::Transaction;
use crate::error::{FraudError, Result};
use std::fmt::Debug;

/// Check that `(id, time)` pairs have unique ids and that time is non-decreasing in id order.
pub fn check_id_ordering<T, I>(pairs: I) -> Result<()>
where
    T: PartialOrd + Debug,
    I: IntoIterator<Item = (u64, T)>,
{
    let mut pairs: Vec<(u64, T)> = pairs.into_iter().collect();
    pairs.sort_by_key(|(id, _)| *id);

    for w in pairs.windows(2) {
        let (prev_id, prev_time) = &w[0];
        let (id, time) = &w[1];
        if prev_id == id {
            return Err(FraudError::InvalidInput(format!(
                "duplicate transaction_id {}",
                id
            )));
        }
        if time < prev_time {
            return Err(FraudError::InvalidInput(format!(
                "transaction_id {} ({:?}) is earlier than transaction_id {} ({:?})",
                id, time, prev_id, prev_time
            )));
        }
    }
    Ok(())
}

/// Validate a transaction collection before any windowed or day-based processing.
pub fn validate_transactions(txs: &[Transaction]) -> Result<()> {
    if let Some(bad) = txs.iter().find(|t| !t.amount.is_finite() || t.amount < 0.0) {
        return Err(FraudError::InvalidInput(format!(
            "transaction_id {} has invalid amount {}",
            bad.transaction_id, bad.amount
        )));
    }
    check_id_ordering(txs.iter().map(|t| (t.transaction_id, t.tx_datetime)))?;
    check_id_ordering(txs.iter().map(|t| (t.transaction_id, t.time_days)))
}
