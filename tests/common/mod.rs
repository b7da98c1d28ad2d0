//! Shared fixtures for integration and property tests.
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fraud_core::evaluation::ScoredTransaction;
use fraud_core::Transaction;

pub fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 4, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Timestamp `day` days and `hour` hours after dataset start.
pub fn at(day: i64, hour: i64) -> NaiveDateTime {
    base() + Duration::days(day) + Duration::hours(hour)
}

pub fn tx(id: u64, day: i64, hour: i64, customer: u64, terminal: u64, amount: f64) -> Transaction {
    Transaction::new(id, at(day, hour), customer, terminal, amount, day)
}

pub fn fraud(id: u64, day: i64, hour: i64, customer: u64, terminal: u64, amount: f64) -> Transaction {
    tx(id, day, hour, customer, terminal, amount).with_fraud(1)
}

pub fn scored(id: u64, customer: u64, day: i64, is_fraud: bool, score: f64) -> ScoredTransaction {
    ScoredTransaction {
        transaction_id: id,
        customer_id: customer,
        time_days: day,
        is_fraud,
        score,
    }
}

/// Build a time-consistent collection from `(customer, terminal, minutes since start, amount, fraud)`.
pub fn from_events(mut events: Vec<(u64, u64, u32, f64, bool)>) -> Vec<Transaction> {
    events.sort_by_key(|e| e.2);
    events
        .into_iter()
        .enumerate()
        .map(|(i, (customer, terminal, minutes, amount, is_fraud))| {
            let dt = base() + Duration::minutes(i64::from(minutes));
            let mut t = Transaction::new(
                i as u64,
                dt,
                customer,
                terminal,
                amount,
                i64::from(minutes / (24 * 60)),
            );
            if is_fraud {
                t = t.with_fraud(1);
            }
            t
        })
        .collect()
}
