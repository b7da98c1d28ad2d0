//! Sequential card precision@k.
//!
//! Simulates an investigator who every day checks the `k` cards with the highest fraud score.
//! Cards found compromised are blocked and leave the pool for the rest of the replay, so each
//! day is ranked against the cards still in circulation.

use super::{validate_scored, ScoredTransaction};
use crate::error::{FraudError, Result};
use crate::logging::StructuredLogger;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Write;
use tracing::{debug, info};

/// Result of investigating one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub day: i64,
    /// Distinct cards still eligible that day
    pub eligible_cards: usize,
    /// Eligible cards with at least one fraudulent transaction that day
    pub compromised_cards: usize,
    /// Compromised cards found in the top k, highest score first
    pub detected_cards: Vec<u64>,
    pub precision: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReplayState {
    Pending { day: i64 },
    Scored { day: i64 },
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKReport {
    pub k: usize,
    pub days: Vec<i64>,
    pub per_day_compromised_counts: Vec<usize>,
    pub per_day_precision: Vec<f64>,
    /// Unweighted mean over days; 0 when there are no days
    pub mean_precision: f64,
    pub outcomes: Vec<DayOutcome>,
}

impl TopKReport {
    pub fn from_outcomes(k: usize, outcomes: Vec<DayOutcome>) -> Self {
        let per_day_precision: Vec<f64> = outcomes.iter().map(|o| o.precision).collect();
        let mean_precision = if per_day_precision.is_empty() {
            0.0
        } else {
            per_day_precision.iter().sum::<f64>() / per_day_precision.len() as f64
        };
        Self {
            k,
            days: outcomes.iter().map(|o| o.day).collect(),
            per_day_compromised_counts: outcomes.iter().map(|o| o.compromised_cards).collect(),
            per_day_precision,
            mean_precision,
            outcomes,
        }
    }

    /// One JSON line per day.
    pub fn write_ndjson(&self, w: &mut impl Write) -> Result<()> {
        for outcome in &self.outcomes {
            StructuredLogger::emit_json(outcome, w)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TopKEvaluator {
    k: usize,
    remove_detected: bool,
}

impl TopKEvaluator {
    /// `k` must be positive. Detected cards are removed from later days by default.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(FraudError::InvalidArgument("k must be positive".to_string()));
        }
        Ok(Self {
            k,
            remove_detected: true,
        })
    }

    pub fn with_remove_detected(mut self, remove_detected: bool) -> Self {
        self.remove_detected = remove_detected;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Day-by-day replay over `rows`; each call owns a fresh detection set.
    pub fn replay<'a>(&self, rows: &'a [ScoredTransaction]) -> Result<TopKReplay<'a>> {
        validate_scored(rows)?;
        Ok(TopKReplay::new(self.k, self.remove_detected, rows))
    }

    pub fn evaluate(&self, rows: &[ScoredTransaction]) -> Result<TopKReport> {
        let outcomes: Vec<DayOutcome> = self.replay(rows)?.collect();
        let report = TopKReport::from_outcomes(self.k, outcomes);
        info!(
            k = self.k,
            days = report.days.len(),
            mean_precision = report.mean_precision,
            "card precision replay finished"
        );
        Ok(report)
    }
}

/// Iterator over days in ascending order; yields one [`DayOutcome`] per day.
pub struct TopKReplay<'a> {
    k: usize,
    remove_detected: bool,
    by_day: BTreeMap<i64, Vec<&'a ScoredTransaction>>,
    days: Vec<i64>,
    next_index: usize,
    state: ReplayState,
    detected: HashSet<u64>,
}

impl<'a> TopKReplay<'a> {
    fn new(k: usize, remove_detected: bool, rows: &'a [ScoredTransaction]) -> Self {
        let mut by_day: BTreeMap<i64, Vec<&'a ScoredTransaction>> = BTreeMap::new();
        for r in rows {
            by_day.entry(r.time_days).or_default().push(r);
        }
        let days: Vec<i64> = by_day.keys().copied().collect();
        let state = match days.first() {
            Some(&day) => ReplayState::Pending { day },
            None => ReplayState::Exhausted,
        };
        Self {
            k,
            remove_detected,
            by_day,
            days,
            next_index: 0,
            state,
            detected: HashSet::new(),
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Cards detected so far. Never shrinks during a replay.
    pub fn detected(&self) -> &HashSet<u64> {
        &self.detected
    }

    pub fn days(&self) -> &[i64] {
        &self.days
    }

    fn score_day(&mut self, day: i64) -> DayOutcome {
        // card -> (max score, any fraud)
        let mut cards: HashMap<u64, (f64, bool)> = HashMap::new();
        if let Some(rows) = self.by_day.get(&day) {
            for r in rows.iter().filter(|r| !self.detected.contains(&r.customer_id)) {
                let entry = cards.entry(r.customer_id).or_insert((f64::NEG_INFINITY, false));
                entry.0 = entry.0.max(r.score);
                entry.1 |= r.is_fraud;
            }
        }
        let compromised_cards = cards.values().filter(|(_, fraud)| *fraud).count();

        let mut ranked: Vec<(u64, f64, bool)> = cards
            .into_iter()
            .map(|(card, (score, fraud))| (card, score, fraud))
            .collect();
        // highest score first, lower card id wins ties
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let detected_cards: Vec<u64> = ranked
            .iter()
            .take(self.k)
            .filter(|(_, _, fraud)| *fraud)
            .map(|(card, _, _)| *card)
            .collect();
        let precision = detected_cards.len() as f64 / self.k as f64;

        if self.remove_detected {
            self.detected.extend(detected_cards.iter().copied());
        }
        debug!(
            day,
            eligible = ranked.len(),
            compromised = compromised_cards,
            detected = detected_cards.len(),
            precision,
            "day scored"
        );

        DayOutcome {
            day,
            eligible_cards: ranked.len(),
            compromised_cards,
            detected_cards,
            precision,
        }
    }
}

impl Iterator for TopKReplay<'_> {
    type Item = DayOutcome;

    fn next(&mut self) -> Option<DayOutcome> {
        if let ReplayState::Scored { .. } = self.state {
            self.state = match self.days.get(self.next_index) {
                Some(&day) => ReplayState::Pending { day },
                None => ReplayState::Exhausted,
            };
        }
        match self.state {
            ReplayState::Pending { day } => {
                let outcome = self.score_day(day);
                self.next_index += 1;
                self.state = ReplayState::Scored { day };
                Some(outcome)
            }
            ReplayState::Scored { .. } | ReplayState::Exhausted => None,
        }
    }
}
