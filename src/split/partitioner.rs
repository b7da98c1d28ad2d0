//! Leakage-safe split.
//!
//! Training covers `[start, start + delta_train)`. Testing starts `delta_delay` days after the
//! training period ends, day by day for `delta_test` days. Customers with a fraud in the
//! training set are known compromised. Before test day `i` is filtered, the defrauded customers
//! of day `start_day + delta_train * i - 1` join them; a day before day 0 adds nobody. Known
//! customers are removed from each test day before it is appended.

use crate::config::{day_span, SplitConfig};
use crate::error::{FraudError, Result};
use crate::transactions::{validate_transactions, Transaction};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainTestSplit {
    /// Sorted by `transaction_id`
    pub train: Vec<Transaction>,
    /// Sorted by `transaction_id`
    pub test: Vec<Transaction>,
    /// Customers known compromised once the last test day was filtered
    pub known_compromised: HashSet<u64>,
}

pub struct LeakagePartitioner {
    config: SplitConfig,
}

impl LeakagePartitioner {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn split(&self, txs: &[Transaction], start: NaiveDateTime) -> Result<TrainTestSplit> {
        validate_transactions(txs)?;
        let SplitConfig {
            delta_train,
            delta_delay,
            delta_test,
        } = self.config;
        let end = start.checked_add_signed(day_span(delta_train)?).ok_or_else(|| {
            FraudError::InvalidArgument(format!(
                "training window of {} days from {} is out of range",
                delta_train, start
            ))
        })?;

        let mut train: Vec<Transaction> = txs
            .iter()
            .filter(|t| t.tx_datetime >= start && t.tx_datetime < end)
            .cloned()
            .collect();
        let start_day = train.iter().map(|t| t.time_days).min().ok_or_else(|| {
            FraudError::EmptyWindow(format!("no transactions in training window [{}, {})", start, end))
        })?;

        let mut known_compromised: HashSet<u64> = train
            .iter()
            .filter(|t| t.is_fraud)
            .map(|t| t.customer_id)
            .collect();
        let seeded = known_compromised.len();

        let mut by_day: HashMap<i64, Vec<&Transaction>> = HashMap::new();
        for t in txs {
            by_day.entry(t.time_days).or_default().push(t);
        }

        let mut test = Vec::new();
        for i in 0..i64::from(delta_test) {
            let test_day = day_after(start_day, i64::from(delta_train) + i64::from(delta_delay) + i)?;
            let confirmed_day = day_after(start_day, i64::from(delta_train) * i - 1)?;

            // a confirmed day before day 0 is an empty slice, even if the input holds one
            if confirmed_day >= 0 {
                if let Some(day_txs) = by_day.get(&confirmed_day) {
                    known_compromised.extend(day_txs.iter().filter(|t| t.is_fraud).map(|t| t.customer_id));
                }
            }

            let day_txs = by_day.get(&test_day).map(Vec::as_slice).unwrap_or_default();
            let before = test.len();
            test.extend(
                day_txs
                    .iter()
                    .filter(|t| !known_compromised.contains(&t.customer_id))
                    .map(|t| (*t).clone()),
            );
            debug!(
                test_day,
                confirmed_day,
                kept = test.len() - before,
                dropped = day_txs.len() - (test.len() - before),
                known = known_compromised.len(),
                "test day filtered"
            );
        }

        train.sort_by_key(|t| t.transaction_id);
        test.sort_by_key(|t| t.transaction_id);
        info!(
            train = train.len(),
            test = test.len(),
            seeded_compromised = seeded,
            known_compromised = known_compromised.len(),
            "train/test split"
        );

        Ok(TrainTestSplit {
            train,
            test,
            known_compromised,
        })
    }
}

fn day_after(day: i64, offset: i64) -> Result<i64> {
    day.checked_add(offset)
        .ok_or_else(|| FraudError::InvalidArgument(format!("day {} + {} overflows", day, offset)))
}
