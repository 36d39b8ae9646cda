//! Basic reconciliation usage example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use recon_core::{reconcile, summarize, LedgerRecord, PaymentRecord};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Recon Core - Basic Reconciliation Example\n");

    let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

    // Payment-side records, as a gateway would report them
    let payments = vec![
        PaymentRecord::new("P1001", "M001", date, BigDecimal::from(100)),
        PaymentRecord::new("P1002", "M001", date, BigDecimal::from(250)),
        PaymentRecord::new("P1003", "M002", date, BigDecimal::from(75)),
    ];

    // Ledger-side records: P1002 was booked with the wrong amount, P1003
    // never made it into the ledger, and P1004 has no matching payment
    let ledger = vec![
        LedgerRecord::new("P1001", "M001", date, Some(BigDecimal::from(100))),
        LedgerRecord::new("P1002", "M001", date, Some(BigDecimal::from(300))),
        LedgerRecord::new("P1004", "M002", date, Some(BigDecimal::from(40))),
    ];

    println!("🔍 Reconciling {} payments against {} postings...\n", payments.len(), ledger.len());
    let rows = reconcile(&payments, &ledger)?;

    for row in &rows {
        let status = if row.missing_payment {
            "missing payment"
        } else if row.missing_ledger {
            "missing ledger entry"
        } else if row.amount_mismatch {
            "amount mismatch"
        } else {
            "ok"
        };
        println!(
            "  {} @ {}: payment={:?} ledger={:?} -> {}",
            row.payment_id, row.merchant, row.payment_amount, row.ledger_amount, status
        );
    }
    println!();

    println!("📊 Per-merchant summary:\n");
    for summary in summarize(&rows) {
        println!(
            "  {}: {} transactions, {} discrepancies ({:.1}%), payments total {}, ledger total {}",
            summary.merchant,
            summary.num_transactions,
            summary.num_discrepancies,
            summary.discrepancy_pct,
            summary.total_payments,
            summary.total_ledger
        );
    }

    Ok(())
}
