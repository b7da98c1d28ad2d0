//! Trailing time windows over one entity's own history, and the per-entity index arena
//! that feeds them.
//!
//! A window of `w` days anchored at a transaction with timestamp `t` covers `(t - w, t]`.
//! Transactions sharing a timestamp are visited in `transaction_id` order, so a window never
//! sees a transaction that comes after its anchor.

use crate::config::day_span;
use crate::error::{FraudError, Result};
use crate::transactions::Transaction;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Count and sum of values inside one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowAggregate {
    pub count: u32,
    pub sum: f64,
}

impl WindowAggregate {
    /// Sum / count, or 0 for an empty window.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Aggregates over `(t - delay, t]` and `(t - (w + delay), t]`; the difference is the part of
/// the window whose labels are already known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DelayedAggregate {
    pub recent: WindowAggregate,
    pub extended: WindowAggregate,
}

impl DelayedAggregate {
    /// Window-only aggregate, i.e. `(t - (w + delay), t - delay]`.
    pub fn window(&self) -> WindowAggregate {
        WindowAggregate {
            count: self.extended.count - self.recent.count,
            sum: self.extended.sum - self.recent.sum,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WindowAggregator {
    window_days: u32,
}

impl WindowAggregator {
    pub fn new(window_days: u32) -> Self {
        Self { window_days }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// One aggregate per input position. `times` must be sorted ascending and as long as `values`.
    pub fn aggregate(&self, times: &[NaiveDateTime], values: &[f64]) -> Result<Vec<WindowAggregate>> {
        debug_assert_eq!(times.len(), values.len());
        let span = day_span(self.window_days)?;
        let mut out = Vec::with_capacity(times.len());
        let mut left = 0usize;
        let mut count = 0u32;
        let mut sum = 0.0f64;
        let mut dropped = 0usize;

        for (right, (&t, &v)) in times.iter().zip(values).enumerate() {
            count += 1;
            sum += v;
            // no lower bound when t - w falls before the calendar
            if let Some(lower) = t.checked_sub_signed(span) {
                while left <= right && times[left] <= lower {
                    count -= 1;
                    sum -= values[left];
                    left += 1;
                    dropped += 1;
                }
            }
            if dropped > 0 && dropped >= count as usize {
                // re-sum once as many values have left as remain, bounding float drift
                sum = values[left..right + 1].iter().sum();
                dropped = 0;
            }
            out.push(WindowAggregate { count, sum });
        }
        Ok(out)
    }

    /// Delay-shifted aggregates: labels from the most recent `delay_days` are excluded by
    /// subtracting `(t - delay, t]` from `(t - (w + delay), t]`.
    pub fn aggregate_delayed(
        &self,
        delay_days: u32,
        times: &[NaiveDateTime],
        values: &[f64],
    ) -> Result<Vec<DelayedAggregate>> {
        let extended_days = self.window_days.checked_add(delay_days).ok_or_else(|| {
            FraudError::InvalidArgument(format!(
                "window of {} days plus delay of {} days overflows",
                self.window_days, delay_days
            ))
        })?;
        let recent = WindowAggregator::new(delay_days).aggregate(times, values)?;
        let extended = WindowAggregator::new(extended_days).aggregate(times, values)?;
        Ok(recent
            .into_iter()
            .zip(extended)
            .map(|(recent, extended)| DelayedAggregate { recent, extended })
            .collect())
    }
}

/// Arena of input positions grouped by entity, each group sorted by `(tx_datetime, transaction_id)`.
pub struct EntityPartition {
    order: Vec<usize>,
    spans: Vec<(u64, Range<usize>)>,
}

impl EntityPartition {
    pub fn build<F>(txs: &[Transaction], entity: F) -> Self
    where
        F: Fn(&Transaction) -> u64,
    {
        let mut order: Vec<usize> = (0..txs.len()).collect();
        order.sort_by_key(|&i| {
            let t = &txs[i];
            (entity(t), t.tx_datetime, t.transaction_id)
        });

        let mut spans = Vec::new();
        let mut start = 0usize;
        for pos in 1..=order.len() {
            let boundary = pos == order.len()
                || entity(&txs[order[pos]]) != entity(&txs[order[start]]);
            if boundary {
                spans.push((entity(&txs[order[start]]), start..pos));
                start = pos;
            }
        }
        Self { order, spans }
    }

    pub fn by_customer(txs: &[Transaction]) -> Self {
        Self::build(txs, |t| t.customer_id)
    }

    pub fn by_terminal(txs: &[Transaction]) -> Self {
        Self::build(txs, |t| t.terminal_id)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// `(entity_id, positions)` per entity, positions in time order.
    pub fn entities(&self) -> impl Iterator<Item = (u64, &[usize])> + '_ {
        self.spans
            .iter()
            .map(move |(id, range)| (*id, &self.order[range.clone()]))
    }
}
