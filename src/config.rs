//! Pipeline configuration: feature windows, split horizons, evaluation depth, logging.

use crate::error::{FraudError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudConfig {
    /// Window sizes and confirmation delay for feature building
    pub features: FeaturesConfig,
    /// Train / delay / test horizons
    pub split: SplitConfig,
    /// Top-k card precision parameters
    pub evaluation: EvaluationConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Customer spending windows (days)
    pub customer_windows: Vec<u32>,
    /// Terminal risk windows (days)
    pub terminal_windows: Vec<u32>,
    /// Days before a fraud label is considered known
    pub delay_period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub delta_train: u32,
    pub delta_delay: u32,
    pub delta_test: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Cards investigated per day; one replay per entry
    pub top_k_list: Vec<usize>,
    /// Drop detected compromised cards from later days
    pub remove_detected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            customer_windows: vec![1, 7, 30],
            terminal_windows: vec![1, 7, 30],
            delay_period: 7,
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            delta_train: 7,
            delta_delay: 7,
            delta_test: 7,
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            top_k_list: vec![100],
            remove_detected: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

/// `days` as a chrono span; chrono caps spans at roughly 1e8 days.
pub(crate) fn day_span(days: u32) -> Result<Duration> {
    Duration::try_days(i64::from(days))
        .ok_or_else(|| FraudError::InvalidArgument(format!("{} days is out of range for a time span", days)))
}

pub(crate) fn check_windows(name: &str, windows: &[u32]) -> Result<()> {
    if windows.is_empty() {
        return Err(FraudError::InvalidArgument(format!("{} must not be empty", name)));
    }
    if windows.contains(&0) {
        return Err(FraudError::InvalidArgument(format!(
            "{} must only contain positive window sizes",
            name
        )));
    }
    for &w in windows {
        day_span(w)?;
    }
    Ok(())
}

/// Each window extended by the confirmation delay must still be a valid span.
pub(crate) fn check_delayed_windows(name: &str, delay_period: u32, windows: &[u32]) -> Result<()> {
    check_windows(name, windows)?;
    day_span(delay_period)?;
    for &w in windows {
        let extended = w.checked_add(delay_period).ok_or_else(|| {
            FraudError::InvalidArgument(format!(
                "{}: window {} plus delay {} overflows",
                name, w, delay_period
            ))
        })?;
        day_span(extended)?;
    }
    Ok(())
}

impl FraudConfig {
    /// Load from JSON file if present and valid; otherwise return default
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config; using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate from a JSON file, surfacing any failure.
    pub fn try_load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: FraudConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_windows("features.customer_windows", &self.features.customer_windows)?;
        check_delayed_windows(
            "features.terminal_windows",
            self.features.delay_period,
            &self.features.terminal_windows,
        )?;
        day_span(self.split.delta_train)?;
        if self.evaluation.top_k_list.is_empty() || self.evaluation.top_k_list.contains(&0) {
            return Err(FraudError::InvalidArgument(
                "evaluation.top_k_list must hold positive values".to_string(),
            ));
        }
        Ok(())
    }
}
