//! Feature pipeline: transactions → calendar + customer + terminal columns → one row per transaction.

use super::{CalendarFeatures, CustomerFeatureBuilder, FeatureRow, TerminalRiskBuilder};
use crate::config::FeaturesConfig;
use crate::error::Result;
use crate::transactions::{validate_transactions, Transaction};
use tracing::info;

pub const TX_AMOUNT: &str = "tx_amount";

pub struct FeaturePipeline {
    customer: CustomerFeatureBuilder,
    terminal: TerminalRiskBuilder,
}

impl FeaturePipeline {
    pub fn new(config: &FeaturesConfig) -> Result<Self> {
        Ok(Self {
            customer: CustomerFeatureBuilder::new(config.customer_windows.clone())?,
            terminal: TerminalRiskBuilder::new(config.delay_period, config.terminal_windows.clone())?,
        })
    }

    pub fn customer(&self) -> &CustomerFeatureBuilder {
        &self.customer
    }

    pub fn terminal(&self) -> &TerminalRiskBuilder {
        &self.terminal
    }

    /// Model input columns: amount, calendar flags, customer windows, terminal windows.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![TX_AMOUNT.to_string()];
        names.extend(CalendarFeatures::feature_names());
        names.extend(self.customer.feature_names());
        names.extend(self.terminal.feature_names());
        names
    }

    /// Rows ordered by `transaction_id`, each carrying every column of [`Self::feature_names`].
    pub fn transform(&self, txs: &[Transaction]) -> Result<Vec<FeatureRow>> {
        validate_transactions(txs)?;
        let customer = self.customer.compute_positional(txs)?;
        let terminal = self.terminal.compute_positional(txs)?;

        let mut rows: Vec<FeatureRow> = txs
            .iter()
            .zip(customer.into_iter().zip(terminal))
            .map(|(tx, (c, t))| {
                let mut row = FeatureRow::new(tx.clone());
                row.insert(TX_AMOUNT, tx.amount);
                CalendarFeatures::fill_row(&mut row, CalendarFeatures::from_transaction(tx));
                CustomerFeatureBuilder::fill_row(&mut row, c);
                TerminalRiskBuilder::fill_row(&mut row, t);
                row
            })
            .collect();
        rows.sort_by_key(|r| r.transaction.transaction_id);

        info!(rows = rows.len(), columns = self.feature_names().len(), "feature rows built");
        Ok(rows)
    }
}
