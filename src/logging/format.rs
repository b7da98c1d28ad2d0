//! JSON log lines: one JSON object per line (ndjson) for replay audit.

use crate::config::LogConfig;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber, level from RUST_LOG or `default_level`.
    /// Returns false when a subscriber was already installed.
    pub fn try_init(json: bool, default_level: &str) -> bool {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stdout);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt)
                .try_init()
                .is_ok()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
                .try_init()
                .is_ok()
        }
    }

    pub fn init(config: &LogConfig) {
        if !Self::try_init(config.json, &config.level) {
            tracing::debug!("tracing subscriber already installed");
        }
    }

    /// Write a single serializable record as one JSON line, bypassing tracing.
    pub fn emit_json(record: &impl Serialize, w: &mut impl Write) -> Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(w, "{}", line)?;
        Ok(())
    }
}
