//! Customer spending behaviour: number of transactions and average amount over trailing windows.

use super::window::{EntityPartition, WindowAggregator};
use super::{rows_by_id, FeatureRow};
use crate::config::check_windows;
use crate::error::Result;
use crate::transactions::{validate_transactions, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomerWindowFeatures {
    pub window_days: u32,
    pub nb_tx: u32,
    pub avg_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFeatures {
    pub transaction_id: u64,
    pub customer_id: u64,
    /// One entry per configured window, in configuration order
    pub windows: Vec<CustomerWindowFeatures>,
}

pub struct CustomerFeatureBuilder {
    window_sizes: Vec<u32>,
}

impl Default for CustomerFeatureBuilder {
    fn default() -> Self {
        Self {
            window_sizes: vec![1, 7, 30],
        }
    }
}

impl CustomerFeatureBuilder {
    pub fn new(window_sizes: Vec<u32>) -> Result<Self> {
        check_windows("customer window sizes", &window_sizes)?;
        Ok(Self { window_sizes })
    }

    pub fn window_sizes(&self) -> &[u32] {
        &self.window_sizes
    }

    pub fn nb_tx_column(window_days: u32) -> String {
        format!("customer_id_nb_tx_{}_day_window", window_days)
    }

    pub fn avg_amount_column(window_days: u32) -> String {
        format!("customer_id_avg_amount_{}_day_window", window_days)
    }

    /// Column names in output order (count then average, per window).
    pub fn feature_names(&self) -> Vec<String> {
        self.window_sizes
            .iter()
            .flat_map(|&w| [Self::nb_tx_column(w), Self::avg_amount_column(w)])
            .collect()
    }

    /// Per-transaction features, ordered by `transaction_id`.
    pub fn compute(&self, txs: &[Transaction]) -> Result<Vec<CustomerFeatures>> {
        validate_transactions(txs)?;
        let mut out = self.compute_positional(txs)?;
        out.sort_by_key(|f| f.transaction_id);
        Ok(out)
    }

    /// Input transactions with customer columns attached, ordered by `transaction_id`.
    pub fn build(&self, txs: &[Transaction]) -> Result<Vec<FeatureRow>> {
        validate_transactions(txs)?;
        let features = self.compute_positional(txs)?;
        Ok(rows_by_id(txs, features, Self::fill_row))
    }

    pub(crate) fn fill_row(row: &mut FeatureRow, features: CustomerFeatures) {
        for w in features.windows {
            row.insert(Self::nb_tx_column(w.window_days), f64::from(w.nb_tx));
            row.insert(Self::avg_amount_column(w.window_days), w.avg_amount);
        }
    }

    /// Features aligned with input positions. Input must already be validated.
    pub(crate) fn compute_positional(&self, txs: &[Transaction]) -> Result<Vec<CustomerFeatures>> {
        let partition = EntityPartition::by_customer(txs);
        let mut slots: Vec<Option<CustomerFeatures>> = vec![None; txs.len()];

        for (customer_id, positions) in partition.entities() {
            let times: Vec<_> = positions.iter().map(|&i| txs[i].tx_datetime).collect();
            let amounts: Vec<f64> = positions.iter().map(|&i| txs[i].amount).collect();
            let per_window: Vec<_> = self
                .window_sizes
                .iter()
                .map(|&w| WindowAggregator::new(w).aggregate(&times, &amounts))
                .collect::<Result<Vec<_>>>()?;

            for (k, &pos) in positions.iter().enumerate() {
                let windows = self
                    .window_sizes
                    .iter()
                    .zip(&per_window)
                    .map(|(&window_days, agg)| CustomerWindowFeatures {
                        window_days,
                        nb_tx: agg[k].count,
                        avg_amount: agg[k].mean(),
                    })
                    .collect();
                slots[pos] = Some(CustomerFeatures {
                    transaction_id: txs[pos].transaction_id,
                    customer_id,
                    windows,
                });
            }
        }
        debug!(customers = partition.len(), transactions = txs.len(), "customer features computed");

        // every position belongs to exactly one customer span
        Ok(slots.into_iter().flatten().collect())
    }
}
