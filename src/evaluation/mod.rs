//! Card-level evaluation of classifier scores: sequential top-k precision replay.

mod summary;
mod top_k;

pub use summary::PrecisionSummary;
pub use top_k::{DayOutcome, ReplayState, TopKEvaluator, TopKReplay, TopKReport};

use crate::error::{FraudError, Result};
use crate::transactions::{check_id_ordering, Transaction};
use serde::{Deserialize, Serialize};

/// Evaluator input: one transaction with its fraud probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTransaction {
    pub transaction_id: u64,
    pub customer_id: u64,
    pub time_days: i64,
    pub is_fraud: bool,
    pub score: f64,
}

impl ScoredTransaction {
    pub fn from_transaction(tx: &Transaction, score: f64) -> Self {
        Self {
            transaction_id: tx.transaction_id,
            customer_id: tx.customer_id,
            time_days: tx.time_days,
            is_fraud: tx.is_fraud,
            score,
        }
    }
}

/// Join a test set with classifier scores, position by position.
pub fn score_transactions(test: &[Transaction], scores: &[f64]) -> Result<Vec<ScoredTransaction>> {
    if test.len() != scores.len() {
        return Err(FraudError::InvalidInput(format!(
            "{} transactions but {} scores",
            test.len(),
            scores.len()
        )));
    }
    let rows: Vec<ScoredTransaction> = test
        .iter()
        .zip(scores)
        .map(|(tx, &s)| ScoredTransaction::from_transaction(tx, s))
        .collect();
    validate_scored(&rows)?;
    Ok(rows)
}

pub(crate) fn validate_scored(rows: &[ScoredTransaction]) -> Result<()> {
    if let Some(bad) = rows.iter().find(|r| !r.score.is_finite()) {
        return Err(FraudError::InvalidInput(format!(
            "transaction_id {} has non-finite score {}",
            bad.transaction_id, bad.score
        )));
    }
    check_id_ordering(rows.iter().map(|r| (r.transaction_id, r.time_days)))
}
