//! Fraud core — temporal logic for card fraud detection experiments.
//!
//! Modular structure:
//! - [`transactions`] — Transaction records and id/time ordering checks
//! - [`features`] — Windowed customer spending and delayed terminal risk features
//! - [`split`] — Leakage-safe train/test partitioning
//! - [`evaluation`] — Sequential card precision@k replay
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod transactions;
pub mod features;
pub mod split;
pub mod evaluation;
pub mod logging;

pub use config::FraudConfig;
pub use error::{FraudError, Result};
pub use transactions::Transaction;
pub use features::{CustomerFeatureBuilder, FeaturePipeline, FeatureRow, TerminalRiskBuilder, WindowAggregator};
pub use split::{LeakagePartitioner, TrainTestSplit};
pub use evaluation::{score_transactions, PrecisionSummary, ScoredTransaction, TopKEvaluator, TopKReport};
pub use logging::StructuredLogger;
