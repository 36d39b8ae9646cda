//! Traits for the source/sink boundary and record validation

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::types::*;

/// Supplier of the two input record sets.
///
/// This trait is the boundary to whatever produces the data — a synthetic
/// generator, a file loader, an API client. The reconciliation core itself
/// is pure and synchronous; only this boundary is async.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the payment-side records
    async fn payments(&mut self) -> ReconResult<Vec<PaymentRecord>>;

    /// Fetch the ledger-side records
    async fn ledger(&mut self) -> ReconResult<Vec<LedgerRecord>>;
}

/// Consumer of the four result tables produced by a reconciliation run.
///
/// Implementations persist the tables (CSV files, a database, memory for
/// tests). A sink failure surfaces as `ReconError::Sink`.
#[async_trait]
pub trait ReconciliationSink: Send + Sync {
    /// Persist the raw payment records
    async fn write_payments(&mut self, payments: &[PaymentRecord]) -> ReconResult<()>;

    /// Persist the raw ledger records
    async fn write_ledger(&mut self, ledger: &[LedgerRecord]) -> ReconResult<()>;

    /// Persist the reconciled, discrepancy-flagged rows
    async fn write_reconciliation(&mut self, rows: &[ReconciledRow]) -> ReconResult<()>;

    /// Persist the per-merchant summaries
    async fn write_summary(&mut self, summaries: &[MerchantSummary]) -> ReconResult<()>;
}

/// Trait for implementing custom record validation rules
pub trait RecordValidator: Send + Sync {
    /// Validate a payment record before it enters the join
    fn validate_payment(&self, record: &PaymentRecord) -> ReconResult<()>;

    /// Validate a ledger record before it enters the join
    fn validate_ledger(&self, record: &LedgerRecord) -> ReconResult<()>;
}

/// Default validator enforcing the schema contract: key fields present,
/// amounts non-negative
pub struct DefaultRecordValidator;

impl RecordValidator for DefaultRecordValidator {
    fn validate_payment(&self, record: &PaymentRecord) -> ReconResult<()> {
        if record.payment_id.trim().is_empty() {
            return Err(ReconError::Schema(format!(
                "Payment record for merchant '{}' has an empty PaymentID",
                record.merchant
            )));
        }

        if record.merchant.trim().is_empty() {
            return Err(ReconError::Schema(format!(
                "Payment record '{}' has an empty Merchant",
                record.payment_id
            )));
        }

        if record.amount < BigDecimal::from(0) {
            return Err(ReconError::Schema(format!(
                "Payment record {} has a negative amount: {}",
                record.key(),
                record.amount
            )));
        }

        Ok(())
    }

    fn validate_ledger(&self, record: &LedgerRecord) -> ReconResult<()> {
        if record.payment_id.trim().is_empty() {
            return Err(ReconError::Schema(format!(
                "Ledger record for merchant '{}' has an empty PaymentID",
                record.merchant
            )));
        }

        if record.merchant.trim().is_empty() {
            return Err(ReconError::Schema(format!(
                "Ledger record '{}' has an empty Merchant",
                record.payment_id
            )));
        }

        if let Some(amount) = &record.amount {
            if amount < &BigDecimal::from(0) {
                return Err(ReconError::Schema(format!(
                    "Ledger record {} has a negative amount: {}",
                    record.key(),
                    amount
                )));
            }
        }

        Ok(())
    }
}
