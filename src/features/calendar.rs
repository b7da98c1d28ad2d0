//! Date/time flags derived from the transaction timestamp alone.

use super::FeatureRow;
use crate::transactions::Transaction;
use serde::{Deserialize, Serialize};

pub const TX_DURING_WEEKEND: &str = "tx_during_weekend";
pub const TX_DURING_NIGHT: &str = "tx_during_night";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFeatures {
    pub during_weekend: bool,
    pub during_night: bool,
}

impl CalendarFeatures {
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            during_weekend: tx.is_weekend(),
            during_night: tx.is_night(),
        }
    }

    pub fn feature_names() -> Vec<String> {
        vec![TX_DURING_WEEKEND.to_string(), TX_DURING_NIGHT.to_string()]
    }

    pub(crate) fn fill_row(row: &mut FeatureRow, features: CalendarFeatures) {
        row.insert(TX_DURING_WEEKEND, if features.during_weekend { 1.0 } else { 0.0 });
        row.insert(TX_DURING_NIGHT, if features.during_night { 1.0 } else { 0.0 });
    }
}
