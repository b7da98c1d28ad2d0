//! Payment-card transaction records and the ordering checks every component relies on.

mod validate;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

pub use validate::{check_id_ordering, validate_transactions};

/// Immutable card transaction. `transaction_id` is dense, unique and consistent with time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: u64,
    pub tx_datetime: NaiveDateTime,
    pub customer_id: u64,
    pub terminal_id: u64,
    pub amount: f64,
    /// Day index since dataset start
    pub time_days: i64,
    pub is_fraud: bool,
    /// Fraud scenario label (0 for genuine transactions)
    #[serde(default)]
    pub fraud_scenario: u8,
}

impl Transaction {
    /// Genuine transaction with no scenario label.
    pub fn new(
        transaction_id: u64,
        tx_datetime: NaiveDateTime,
        customer_id: u64,
        terminal_id: u64,
        amount: f64,
        time_days: i64,
    ) -> Self {
        Self {
            transaction_id,
            tx_datetime,
            customer_id,
            terminal_id,
            amount,
            time_days,
            is_fraud: false,
            fraud_scenario: 0,
        }
    }

    /// Mark as fraudulent under the given scenario.
    pub fn with_fraud(mut self, scenario: u8) -> Self {
        self.is_fraud = true;
        self.fraud_scenario = scenario;
        self
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.tx_datetime.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Night covers hours 0 through 6 inclusive.
    pub fn is_night(&self) -> bool {
        self.tx_datetime.hour() <= 6
    }

    pub fn fraud_value(&self) -> f64 {
        if self.is_fraud {
            1.0
        } else {
            0.0
        }
    }
}
