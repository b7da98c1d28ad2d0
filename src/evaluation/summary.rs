//! Mean card precision for several investigation budgets at once.

use super::{ScoredTransaction, TopKEvaluator};
use crate::config::EvaluationConfig;
use crate::error::{FraudError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecisionSummary {
    /// `card_precision@{k}` -> mean precision
    pub metrics: BTreeMap<String, f64>,
}

impl PrecisionSummary {
    pub fn metric_name(k: usize) -> String {
        format!("card_precision@{}", k)
    }

    /// One replay per `k`. With `rounded`, values are rounded to three decimals.
    pub fn evaluate(
        rows: &[ScoredTransaction],
        top_k_list: &[usize],
        remove_detected: bool,
        rounded: bool,
    ) -> Result<Self> {
        if top_k_list.is_empty() {
            return Err(FraudError::InvalidArgument("top_k_list must not be empty".to_string()));
        }
        let mut metrics = BTreeMap::new();
        for &k in top_k_list {
            let report = TopKEvaluator::new(k)?
                .with_remove_detected(remove_detected)
                .evaluate(rows)?;
            let value = if rounded {
                (report.mean_precision * 1000.0).round() / 1000.0
            } else {
                report.mean_precision
            };
            metrics.insert(Self::metric_name(k), value);
        }
        Ok(Self { metrics })
    }

    pub fn from_config(rows: &[ScoredTransaction], config: &EvaluationConfig) -> Result<Self> {
        Self::evaluate(rows, &config.top_k_list, config.remove_detected, true)
    }

    pub fn get(&self, k: usize) -> Option<f64> {
        self.metrics.get(&Self::metric_name(k)).copied()
    }
}
