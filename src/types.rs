//! Core types and data structures for the reconciliation engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite join key identifying a transaction across both record sets.
///
/// A `PaymentID` is unique per record but not globally unique, so the pair
/// (PaymentID, Merchant) is the unit of reconciliation. Ordering is
/// lexicographic on (payment_id, merchant) to keep output deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    /// Payment identifier (e.g. "P1042")
    pub payment_id: String,
    /// Merchant code (e.g. "M001")
    pub merchant: String,
}

impl RecordKey {
    /// Create a new composite key
    pub fn new(payment_id: impl Into<String>, merchant: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            merchant: merchant.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.payment_id, self.merchant)
    }
}

/// A payment as reported by the payment side (gateway, processor, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment identifier
    pub payment_id: String,
    /// Merchant code
    pub merchant: String,
    /// Date the payment was taken
    pub payment_date: NaiveDate,
    /// Payment amount, non-negative
    pub amount: BigDecimal,
}

impl PaymentRecord {
    /// Create a new payment record
    pub fn new(
        payment_id: impl Into<String>,
        merchant: impl Into<String>,
        payment_date: NaiveDate,
        amount: BigDecimal,
    ) -> Self {
        Self {
            payment_id: payment_id.into(),
            merchant: merchant.into(),
            payment_date,
            amount,
        }
    }

    /// The composite join key for this record
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.payment_id.clone(), self.merchant.clone())
    }
}

/// A posting as reported by the ledger side (accounting system)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Payment identifier
    pub payment_id: String,
    /// Merchant code
    pub merchant: String,
    /// Date the posting was booked
    pub ledger_date: NaiveDate,
    /// Posted amount; `None` models a posting whose amount never landed
    pub amount: Option<BigDecimal>,
}

impl LedgerRecord {
    /// Create a new ledger record
    pub fn new(
        payment_id: impl Into<String>,
        merchant: impl Into<String>,
        ledger_date: NaiveDate,
        amount: Option<BigDecimal>,
    ) -> Self {
        Self {
            payment_id: payment_id.into(),
            merchant: merchant.into(),
            ledger_date,
            amount,
        }
    }

    /// The composite join key for this record
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.payment_id.clone(), self.merchant.clone())
    }
}

/// One reconciled transaction: the outer-join of a payment and a ledger
/// posting on the same composite key, with discrepancy flags applied.
///
/// Rows are created once by the join step and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRow {
    /// Payment identifier
    pub payment_id: String,
    /// Merchant code
    pub merchant: String,
    /// Payment date, if the payment side had this key
    pub payment_date: Option<NaiveDate>,
    /// Payment amount, if the payment side had this key
    pub payment_amount: Option<BigDecimal>,
    /// Ledger date, if the ledger side had this key
    pub ledger_date: Option<NaiveDate>,
    /// Ledger amount, if present on the ledger side
    pub ledger_amount: Option<BigDecimal>,
    /// No payment exists for this key
    pub missing_payment: bool,
    /// No ledger amount exists for this key
    pub missing_ledger: bool,
    /// Both amounts present and unequal
    pub amount_mismatch: bool,
    /// Any of the three flags above
    pub discrepancy: bool,
}

impl ReconciledRow {
    /// Join one key's payment and ledger sides and classify the result.
    ///
    /// Flag semantics:
    /// - `missing_payment` iff no payment amount exists for the key
    /// - `missing_ledger` iff no ledger amount exists for the key
    /// - `amount_mismatch` iff both amounts exist and differ (exact decimal
    ///   comparison, no tolerance)
    /// - `discrepancy` iff any of the above
    pub fn classify(
        key: RecordKey,
        payment: Option<&PaymentRecord>,
        ledger: Option<&LedgerRecord>,
    ) -> Self {
        let payment_amount = payment.map(|p| p.amount.clone());
        let ledger_amount = ledger.and_then(|l| l.amount.clone());

        let missing_payment = payment_amount.is_none();
        let missing_ledger = ledger_amount.is_none();
        let amount_mismatch = match (&payment_amount, &ledger_amount) {
            (Some(p), Some(l)) => p != l,
            _ => false,
        };
        let discrepancy = missing_payment || missing_ledger || amount_mismatch;

        Self {
            payment_id: key.payment_id,
            merchant: key.merchant,
            payment_date: payment.map(|p| p.payment_date),
            payment_amount,
            ledger_date: ledger.map(|l| l.ledger_date),
            ledger_amount,
            missing_payment,
            missing_ledger,
            amount_mismatch,
            discrepancy,
        }
    }

    /// The composite join key for this row
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.payment_id.clone(), self.merchant.clone())
    }
}

/// Per-merchant totals and discrepancy counts over a reconciled dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantSummary {
    /// Merchant code
    pub merchant: String,
    /// Sum of payment amounts present for this merchant
    pub total_payments: BigDecimal,
    /// Sum of ledger amounts present for this merchant
    pub total_ledger: BigDecimal,
    /// Number of reconciled rows for this merchant
    pub num_transactions: u64,
    /// Rows with any discrepancy flag set
    pub num_discrepancies: u64,
    /// Rows with no payment-side amount
    pub missing_payments: u64,
    /// Rows with no ledger-side amount
    pub missing_ledger_entries: u64,
    /// Rows where both amounts exist but differ
    pub amount_mismatches: u64,
    /// 100 * num_discrepancies / num_transactions
    pub discrepancy_pct: f64,
}

/// Which input side a record came from, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordSide {
    /// Payment records
    Payment,
    /// Ledger records
    Ledger,
}

impl fmt::Display for RecordSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSide::Payment => write!(f, "payment"),
            RecordSide::Ledger => write!(f, "ledger"),
        }
    }
}

/// Errors that can occur in the reconciliation system
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Duplicate key in {side} records: {key}")]
    DuplicateKey { side: RecordSide, key: RecordKey },
    #[error("Source error: {0}")]
    Source(String),
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
