//! In-memory sink implementation for testing

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::ReconciliationSink;
use crate::types::*;

/// In-memory sink for testing and development: stores the four result
/// tables and hands them back for assertions
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    payments: Arc<RwLock<Vec<PaymentRecord>>>,
    ledger: Arc<RwLock<Vec<LedgerRecord>>>,
    reconciliation: Arc<RwLock<Vec<ReconciledRow>>>,
    summaries: Arc<RwLock<Vec<MerchantSummary>>>,
}

impl MemorySink {
    /// Create a new empty memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored payment records
    pub fn payments(&self) -> Vec<PaymentRecord> {
        self.payments.read().unwrap().clone()
    }

    /// Stored ledger records
    pub fn ledger(&self) -> Vec<LedgerRecord> {
        self.ledger.read().unwrap().clone()
    }

    /// Stored reconciled rows
    pub fn reconciliation(&self) -> Vec<ReconciledRow> {
        self.reconciliation.read().unwrap().clone()
    }

    /// Stored merchant summaries
    pub fn summaries(&self) -> Vec<MerchantSummary> {
        self.summaries.read().unwrap().clone()
    }

    /// Clear all stored tables (useful for testing)
    pub fn clear(&self) {
        self.payments.write().unwrap().clear();
        self.ledger.write().unwrap().clear();
        self.reconciliation.write().unwrap().clear();
        self.summaries.write().unwrap().clear();
    }
}

#[async_trait]
impl ReconciliationSink for MemorySink {
    async fn write_payments(&mut self, payments: &[PaymentRecord]) -> ReconResult<()> {
        *self.payments.write().unwrap() = payments.to_vec();
        Ok(())
    }

    async fn write_ledger(&mut self, ledger: &[LedgerRecord]) -> ReconResult<()> {
        *self.ledger.write().unwrap() = ledger.to_vec();
        Ok(())
    }

    async fn write_reconciliation(&mut self, rows: &[ReconciledRow]) -> ReconResult<()> {
        *self.reconciliation.write().unwrap() = rows.to_vec();
        Ok(())
    }

    async fn write_summary(&mut self, summaries: &[MerchantSummary]) -> ReconResult<()> {
        *self.summaries.write().unwrap() = summaries.to_vec();
        Ok(())
    }
}
