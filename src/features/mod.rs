//! Windowed transaction features: customer spending, terminal risk, calendar flags.

mod calendar;
mod customer;
mod pipeline;
mod terminal;
mod window;

pub use calendar::{CalendarFeatures, TX_DURING_NIGHT, TX_DURING_WEEKEND};
pub use customer::{CustomerFeatureBuilder, CustomerFeatures, CustomerWindowFeatures};
pub use pipeline::{FeaturePipeline, TX_AMOUNT};
pub use terminal::{TerminalRisk, TerminalRiskBuilder, TerminalWindowRisk};
pub use window::{DelayedAggregate, EntityPartition, WindowAggregate, WindowAggregator};

use crate::error::{FraudError, Result};
use crate::transactions::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A transaction together with its named feature columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub transaction: Transaction,
    pub features: BTreeMap<String, f64>,
}

impl FeatureRow {
    pub fn new(transaction: Transaction) -> Self {
        Self {
            transaction,
            features: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.features.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.features.get(name).copied()
    }

    /// Model input vector in the order of `names`.
    pub fn to_vector(&self, names: &[String]) -> Result<Vec<f64>> {
        names
            .iter()
            .map(|n| {
                self.get(n)
                    .ok_or_else(|| FraudError::MissingFeature(n.clone()))
            })
            .collect()
    }

    pub fn label(&self) -> bool {
        self.transaction.is_fraud
    }
}

/// Pair each input position with its computed value and return rows in `transaction_id` order.
pub(crate) fn rows_by_id<T, F>(txs: &[Transaction], values: Vec<T>, mut fill: F) -> Vec<FeatureRow>
where
    F: FnMut(&mut FeatureRow, T),
{
    let mut rows: Vec<FeatureRow> = txs
        .iter()
        .zip(values)
        .map(|(tx, v)| {
            let mut row = FeatureRow::new(tx.clone());
            fill(&mut row, v);
            row
        })
        .collect();
    rows.sort_by_key(|r| r.transaction.transaction_id);
    rows
}
