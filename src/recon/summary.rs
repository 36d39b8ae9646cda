//! Per-merchant aggregation of reconciled rows

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{MerchantSummary, ReconciledRow};

#[derive(Default)]
struct MerchantAccumulator {
    total_payments: BigDecimal,
    total_ledger: BigDecimal,
    num_transactions: u64,
    num_discrepancies: u64,
    missing_payments: u64,
    missing_ledger_entries: u64,
    amount_mismatches: u64,
}

impl MerchantAccumulator {
    fn add(&mut self, row: &ReconciledRow) {
        // Absent amounts are excluded from the sums, not coerced to zero
        if let Some(amount) = &row.payment_amount {
            self.total_payments += amount;
        }
        if let Some(amount) = &row.ledger_amount {
            self.total_ledger += amount;
        }
        self.num_transactions += 1;
        self.num_discrepancies += u64::from(row.discrepancy);
        self.missing_payments += u64::from(row.missing_payment);
        self.missing_ledger_entries += u64::from(row.missing_ledger);
        self.amount_mismatches += u64::from(row.amount_mismatch);
    }

    fn finish(self, merchant: String) -> MerchantSummary {
        MerchantSummary {
            merchant,
            discrepancy_pct: discrepancy_pct(self.num_discrepancies, self.num_transactions),
            total_payments: self.total_payments,
            total_ledger: self.total_ledger,
            num_transactions: self.num_transactions,
            num_discrepancies: self.num_discrepancies,
            missing_payments: self.missing_payments,
            missing_ledger_entries: self.missing_ledger_entries,
            amount_mismatches: self.amount_mismatches,
        }
    }
}

/// Percentage of discrepant transactions, guarding the zero-transaction
/// case. A merchant group always holds at least one row, so the guard only
/// fires if the grouping key set is ever empty; it returns 0.0 rather than
/// dividing by zero.
fn discrepancy_pct(num_discrepancies: u64, num_transactions: u64) -> f64 {
    if num_transactions == 0 {
        return 0.0;
    }
    100.0 * num_discrepancies as f64 / num_transactions as f64
}

/// Group reconciled rows by merchant and compute per-merchant totals,
/// discrepancy counts, and the discrepancy rate.
///
/// Output is ordered lexicographically by merchant code, one summary per
/// distinct merchant present in the input. Pure function, no side effects.
pub fn summarize(rows: &[ReconciledRow]) -> Vec<MerchantSummary> {
    let mut groups: BTreeMap<String, MerchantAccumulator> = BTreeMap::new();
    for row in rows {
        groups.entry(row.merchant.clone()).or_default().add(row);
    }

    debug!(rows = rows.len(), merchants = groups.len(), "summary complete");

    groups
        .into_iter()
        .map(|(merchant, acc)| acc.finish(merchant))
        .collect()
}
