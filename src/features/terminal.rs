//! Terminal risk: fraud rate over trailing windows, shifted back by the label confirmation delay.
//!
//! Fraud labels of the last `delay_period` days are treated as unknown, so each window
//! `(t - (w + delay), t]` has the delay part `(t - delay, t]` removed before the rate is taken.

use super::window::{EntityPartition, WindowAggregator};
use super::{rows_by_id, FeatureRow};
use crate::config::check_delayed_windows;
use crate::error::Result;
use crate::transactions::{validate_transactions, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalWindowRisk {
    pub window_days: u32,
    /// Counts over `(t - (w + delay), t]`
    pub nb_tx_delay_window: u32,
    pub nb_fraud_delay_window: u32,
    /// Counts over `(t - (w + delay), t - delay]`
    pub nb_tx_window: u32,
    pub nb_fraud_window: u32,
    /// `nb_fraud_window / nb_tx_window`, 0 when the window is empty
    pub risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalRisk {
    pub transaction_id: u64,
    pub terminal_id: u64,
    /// Counts over `(t - delay, t]`
    pub nb_tx_delay: u32,
    pub nb_fraud_delay: u32,
    pub windows: Vec<TerminalWindowRisk>,
}

pub struct TerminalRiskBuilder {
    delay_period: u32,
    window_sizes: Vec<u32>,
}

impl Default for TerminalRiskBuilder {
    fn default() -> Self {
        Self {
            delay_period: 7,
            window_sizes: vec![1, 7, 30],
        }
    }
}

impl TerminalRiskBuilder {
    pub fn new(delay_period: u32, window_sizes: Vec<u32>) -> Result<Self> {
        check_delayed_windows("terminal window sizes", delay_period, &window_sizes)?;
        Ok(Self {
            delay_period,
            window_sizes,
        })
    }

    pub fn delay_period(&self) -> u32 {
        self.delay_period
    }

    pub fn window_sizes(&self) -> &[u32] {
        &self.window_sizes
    }

    pub fn nb_tx_column(window_days: u32) -> String {
        format!("terminal_id_nb_tx_{}_day_window", window_days)
    }

    pub fn risk_column(window_days: u32) -> String {
        format!("terminal_id_risk_{}_day_window", window_days)
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.window_sizes
            .iter()
            .flat_map(|&w| [Self::nb_tx_column(w), Self::risk_column(w)])
            .collect()
    }

    /// Per-transaction risk, ordered by `transaction_id`.
    pub fn compute(&self, txs: &[Transaction]) -> Result<Vec<TerminalRisk>> {
        validate_transactions(txs)?;
        let mut out = self.compute_positional(txs)?;
        out.sort_by_key(|r| r.transaction_id);
        Ok(out)
    }

    /// Input transactions with terminal columns attached, ordered by `transaction_id`.
    pub fn build(&self, txs: &[Transaction]) -> Result<Vec<FeatureRow>> {
        validate_transactions(txs)?;
        let risks = self.compute_positional(txs)?;
        Ok(rows_by_id(txs, risks, Self::fill_row))
    }

    pub(crate) fn fill_row(row: &mut FeatureRow, risk: TerminalRisk) {
        for w in risk.windows {
            row.insert(Self::nb_tx_column(w.window_days), f64::from(w.nb_tx_window));
            row.insert(Self::risk_column(w.window_days), w.risk);
        }
    }

    pub(crate) fn compute_positional(&self, txs: &[Transaction]) -> Result<Vec<TerminalRisk>> {
        let partition = EntityPartition::by_terminal(txs);
        let mut slots: Vec<Option<TerminalRisk>> = vec![None; txs.len()];

        for (terminal_id, positions) in partition.entities() {
            let times: Vec<_> = positions.iter().map(|&i| txs[i].tx_datetime).collect();
            let frauds: Vec<f64> = positions.iter().map(|&i| txs[i].fraud_value()).collect();
            let per_window: Vec<_> = self
                .window_sizes
                .iter()
                .map(|&w| WindowAggregator::new(w).aggregate_delayed(self.delay_period, &times, &frauds))
                .collect::<Result<Vec<_>>>()?;

            for (k, &pos) in positions.iter().enumerate() {
                let windows: Vec<TerminalWindowRisk> = self
                    .window_sizes
                    .iter()
                    .zip(&per_window)
                    .map(|(&window_days, agg)| {
                        let delayed = agg[k];
                        let window = delayed.window();
                        TerminalWindowRisk {
                            window_days,
                            nb_tx_delay_window: delayed.extended.count,
                            nb_fraud_delay_window: fraud_count(delayed.extended.sum),
                            nb_tx_window: window.count,
                            nb_fraud_window: fraud_count(window.sum),
                            risk: window.mean(),
                        }
                    })
                    .collect();
                // the recent part is the same for every window
                let recent = per_window.first().map(|agg| agg[k].recent).unwrap_or_default();
                slots[pos] = Some(TerminalRisk {
                    transaction_id: txs[pos].transaction_id,
                    terminal_id,
                    nb_tx_delay: recent.count,
                    nb_fraud_delay: fraud_count(recent.sum),
                    windows,
                });
            }
        }
        debug!(terminals = partition.len(), transactions = txs.len(), "terminal risk computed");

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Fraud sums are sums of 0/1 values.
fn fraud_count(sum: f64) -> u32 {
    sum.round().max(0.0) as u32
}
