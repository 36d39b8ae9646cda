//! CSV sink writing the four result tables for downstream BI tooling

use async_trait::async_trait;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::info;

use crate::traits::ReconciliationSink;
use crate::types::*;

/// File name for the payments table
pub const PAYMENTS_FILE: &str = "Payments.csv";
/// File name for the ledger table
pub const LEDGER_FILE: &str = "Ledger.csv";
/// File name for the reconciliation table
pub const RECONCILIATION_FILE: &str = "Reconciliation.csv";
/// File name for the per-merchant summary table
pub const SUMMARY_FILE: &str = "ReconciliationSummary.csv";

/// Sink writing each table as a CSV file under one output directory.
///
/// Column names and order follow the downstream BI contract:
/// `PaymentID, Merchant, PaymentDate, PaymentAmount, LedgerDate,
/// LedgerAmount, MissingPayment, MissingLedger, AmountMismatch, Discrepancy`
/// for the reconciliation table, and
/// `Merchant, TotalPayments, TotalLedger, NumTransactions, NumDiscrepancies,
/// MissingPayments, MissingLedgerEntries, AmountMismatches, DiscrepancyPct`
/// for the summary table. Absent values are written as empty fields.
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    /// Create a sink writing into the given directory (must exist)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of one of the output files
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    fn writer(&self, file_name: &str) -> ReconResult<csv::Writer<std::fs::File>> {
        csv::Writer::from_path(self.path(file_name)).map_err(sink_err)
    }
}

fn sink_err(err: impl Display) -> ReconError {
    ReconError::Sink(err.to_string())
}

/// Empty string for `None`, `Display` output otherwise
fn field<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(T::to_string).unwrap_or_default()
}

#[async_trait]
impl ReconciliationSink for CsvSink {
    async fn write_payments(&mut self, payments: &[PaymentRecord]) -> ReconResult<()> {
        let mut writer = self.writer(PAYMENTS_FILE)?;
        writer
            .write_record(["PaymentID", "Merchant", "PaymentDate", "PaymentAmount"])
            .map_err(sink_err)?;
        for record in payments {
            writer
                .write_record([
                    record.payment_id.clone(),
                    record.merchant.clone(),
                    record.payment_date.to_string(),
                    record.amount.to_string(),
                ])
                .map_err(sink_err)?;
        }
        writer.flush().map_err(sink_err)?;
        info!(rows = payments.len(), file = PAYMENTS_FILE, "table written");
        Ok(())
    }

    async fn write_ledger(&mut self, ledger: &[LedgerRecord]) -> ReconResult<()> {
        let mut writer = self.writer(LEDGER_FILE)?;
        writer
            .write_record(["PaymentID", "Merchant", "LedgerDate", "LedgerAmount"])
            .map_err(sink_err)?;
        for record in ledger {
            writer
                .write_record([
                    record.payment_id.clone(),
                    record.merchant.clone(),
                    record.ledger_date.to_string(),
                    field(&record.amount),
                ])
                .map_err(sink_err)?;
        }
        writer.flush().map_err(sink_err)?;
        info!(rows = ledger.len(), file = LEDGER_FILE, "table written");
        Ok(())
    }

    async fn write_reconciliation(&mut self, rows: &[ReconciledRow]) -> ReconResult<()> {
        let mut writer = self.writer(RECONCILIATION_FILE)?;
        writer
            .write_record([
                "PaymentID",
                "Merchant",
                "PaymentDate",
                "PaymentAmount",
                "LedgerDate",
                "LedgerAmount",
                "MissingPayment",
                "MissingLedger",
                "AmountMismatch",
                "Discrepancy",
            ])
            .map_err(sink_err)?;
        for row in rows {
            writer
                .write_record([
                    row.payment_id.clone(),
                    row.merchant.clone(),
                    field(&row.payment_date),
                    field(&row.payment_amount),
                    field(&row.ledger_date),
                    field(&row.ledger_amount),
                    row.missing_payment.to_string(),
                    row.missing_ledger.to_string(),
                    row.amount_mismatch.to_string(),
                    row.discrepancy.to_string(),
                ])
                .map_err(sink_err)?;
        }
        writer.flush().map_err(sink_err)?;
        info!(rows = rows.len(), file = RECONCILIATION_FILE, "table written");
        Ok(())
    }

    async fn write_summary(&mut self, summaries: &[MerchantSummary]) -> ReconResult<()> {
        let mut writer = self.writer(SUMMARY_FILE)?;
        writer
            .write_record([
                "Merchant",
                "TotalPayments",
                "TotalLedger",
                "NumTransactions",
                "NumDiscrepancies",
                "MissingPayments",
                "MissingLedgerEntries",
                "AmountMismatches",
                "DiscrepancyPct",
            ])
            .map_err(sink_err)?;
        for summary in summaries {
            writer
                .write_record([
                    summary.merchant.clone(),
                    summary.total_payments.to_string(),
                    summary.total_ledger.to_string(),
                    summary.num_transactions.to_string(),
                    summary.num_discrepancies.to_string(),
                    summary.missing_payments.to_string(),
                    summary.missing_ledger_entries.to_string(),
                    summary.amount_mismatches.to_string(),
                    format!("{:.2}", summary.discrepancy_pct),
                ])
                .map_err(sink_err)?;
        }
        writer.flush().map_err(sink_err)?;
        info!(rows = summaries.len(), file = SUMMARY_FILE, "table written");
        Ok(())
    }
}
