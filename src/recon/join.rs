//! Full outer join of payment and ledger records with discrepancy flagging

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::traits::{DefaultRecordValidator, RecordValidator};
use crate::types::*;

/// Reconciler performing the keyed merge of the two record sets.
///
/// The join is a set-union-keyed merge, not a database join with
/// multiplicity: every distinct (PaymentID, Merchant) key across both inputs
/// produces exactly one output row. Duplicate keys within one side are
/// rejected rather than silently expanded.
pub struct Reconciler {
    validator: Box<dyn RecordValidator>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    /// Create a reconciler with the default schema validator
    pub fn new() -> Self {
        Self {
            validator: Box::new(DefaultRecordValidator),
        }
    }

    /// Create a reconciler with a custom record validator
    pub fn with_validator(validator: Box<dyn RecordValidator>) -> Self {
        Self { validator }
    }

    /// Reconcile the two record sets into one discrepancy-flagged row per
    /// distinct composite key.
    ///
    /// Fails fast with no partial output on a malformed record
    /// (`ReconError::Schema`) or a repeated composite key within one side
    /// (`ReconError::DuplicateKey`). Empty inputs are valid and produce an
    /// empty result. The output is sorted by key, so the result is
    /// independent of input ordering.
    pub fn reconcile(
        &self,
        payments: &[PaymentRecord],
        ledger: &[LedgerRecord],
    ) -> ReconResult<Vec<ReconciledRow>> {
        for record in payments {
            self.validator.validate_payment(record)?;
        }
        for record in ledger {
            self.validator.validate_ledger(record)?;
        }

        if payments.is_empty() && ledger.is_empty() {
            warn!("both record sets are empty; reconciliation produces no rows");
            return Ok(Vec::new());
        }

        let payments_by_key = index_by_key(payments, PaymentRecord::key, RecordSide::Payment)?;
        let ledger_by_key = index_by_key(ledger, LedgerRecord::key, RecordSide::Ledger)?;

        // Union of both key sets; BTreeSet iteration gives the sorted order.
        let mut keys: BTreeSet<RecordKey> = payments_by_key.keys().cloned().collect();
        keys.extend(ledger_by_key.keys().cloned());

        let rows: Vec<ReconciledRow> = keys
            .into_iter()
            .map(|key| {
                let payment = payments_by_key.get(&key).copied();
                let posting = ledger_by_key.get(&key).copied();
                ReconciledRow::classify(key, payment, posting)
            })
            .collect();

        debug!(
            payments = payments.len(),
            ledger = ledger.len(),
            rows = rows.len(),
            discrepancies = rows.iter().filter(|r| r.discrepancy).count(),
            "reconciliation complete"
        );

        Ok(rows)
    }
}

/// Reconcile with the default validator.
///
/// Convenience wrapper around [`Reconciler::reconcile`].
pub fn reconcile(
    payments: &[PaymentRecord],
    ledger: &[LedgerRecord],
) -> ReconResult<Vec<ReconciledRow>> {
    Reconciler::new().reconcile(payments, ledger)
}

fn index_by_key<'a, R>(
    records: &'a [R],
    key_fn: impl Fn(&R) -> RecordKey,
    side: RecordSide,
) -> ReconResult<BTreeMap<RecordKey, &'a R>> {
    let mut index = BTreeMap::new();
    for record in records {
        let key = key_fn(record);
        if index.insert(key.clone(), record).is_some() {
            return Err(ReconError::DuplicateKey { side, key });
        }
    }
    Ok(index)
}
