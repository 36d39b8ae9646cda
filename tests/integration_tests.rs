//! Integration tests for recon-core

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use recon_core::{
    reconcile, summarize, utils::StrictRecordValidator, CsvSink, LedgerRecord, MemorySink,
    PaymentRecord, Reconciliation, RecordKey, SynthConfig, SyntheticSource,
    RECONCILIATION_FILE, SUMMARY_FILE,
};
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_manual_reconciliation_workflow() {
    let payments = vec![
        PaymentRecord::new("P1", "M001", date(2025, 1, 1), BigDecimal::from(100)),
        PaymentRecord::new("P2", "M001", date(2025, 1, 2), BigDecimal::from(250)),
        PaymentRecord::new("P3", "M002", date(2025, 1, 3), BigDecimal::from(75)),
    ];
    let ledger = vec![
        LedgerRecord::new("P1", "M001", date(2025, 1, 1), Some(BigDecimal::from(100))),
        LedgerRecord::new("P2", "M001", date(2025, 1, 2), Some(BigDecimal::from(300))),
        LedgerRecord::new("P4", "M002", date(2025, 1, 4), Some(BigDecimal::from(40))),
    ];

    let rows = reconcile(&payments, &ledger).unwrap();

    // 4 distinct keys: P1/M001, P2/M001, P3/M002, P4/M002
    assert_eq!(rows.len(), 4);

    let by_key: std::collections::HashMap<RecordKey, _> =
        rows.iter().map(|r| (r.key(), r)).collect();

    let clean = by_key[&RecordKey::new("P1", "M001")];
    assert!(!clean.discrepancy);

    let mismatch = by_key[&RecordKey::new("P2", "M001")];
    assert!(mismatch.amount_mismatch && mismatch.discrepancy);

    let unposted = by_key[&RecordKey::new("P3", "M002")];
    assert!(unposted.missing_ledger && unposted.discrepancy);

    let unpaid = by_key[&RecordKey::new("P4", "M002")];
    assert!(unpaid.missing_payment && unpaid.discrepancy);

    let summaries = summarize(&rows);
    assert_eq!(summaries.len(), 2);

    let m001 = &summaries[0];
    assert_eq!(m001.merchant, "M001");
    assert_eq!(m001.num_transactions, 2);
    assert_eq!(m001.num_discrepancies, 1);
    assert_eq!(m001.discrepancy_pct, 50.0);
    assert_eq!(m001.total_payments, BigDecimal::from(350));
    assert_eq!(m001.total_ledger, BigDecimal::from(400));

    let m002 = &summaries[1];
    assert_eq!(m002.merchant, "M002");
    assert_eq!(m002.num_transactions, 2);
    assert_eq!(m002.num_discrepancies, 2);
    assert_eq!(m002.discrepancy_pct, 100.0);
}

#[tokio::test]
async fn test_synthetic_pipeline_to_memory_sink() {
    let source = SyntheticSource::new(SynthConfig {
        num_transactions: 120,
        seed: 99,
        ..SynthConfig::default()
    });
    let mut pipeline = Reconciliation::new(source, MemorySink::new());

    let report = pipeline.run().await.unwrap();
    let sink = pipeline.into_sink();

    assert_eq!(report.num_payments, 120);
    assert_eq!(report.num_ledger_records, 120);
    // Synthetic ledger keys mirror payment keys, so one row per payment
    assert_eq!(report.num_rows, 120);
    assert!(report.num_discrepancies > 0);

    // Completeness: one output row per distinct key across both inputs
    let mut keys: HashSet<RecordKey> = sink.payments().iter().map(|p| p.key()).collect();
    keys.extend(sink.ledger().iter().map(|l| l.key()));
    assert_eq!(sink.reconciliation().len(), keys.len());

    // No-loss: every payment amount appears unchanged in its output row
    let rows = sink.reconciliation();
    for payment in sink.payments() {
        let row = rows.iter().find(|r| r.key() == payment.key()).unwrap();
        assert_eq!(row.payment_amount.as_ref(), Some(&payment.amount));
    }

    // Aggregation consistency per merchant
    for summary in sink.summaries() {
        let merchant_rows: Vec<_> = rows
            .iter()
            .filter(|r| r.merchant == summary.merchant)
            .collect();
        assert_eq!(summary.num_transactions as usize, merchant_rows.len());

        let total: BigDecimal = merchant_rows
            .iter()
            .filter_map(|r| r.payment_amount.clone())
            .sum();
        assert_eq!(summary.total_payments, total);

        let discrepancies = merchant_rows.iter().filter(|r| r.discrepancy).count() as u64;
        assert_eq!(summary.num_discrepancies, discrepancies);
        assert!(summary.num_discrepancies <= summary.num_transactions);
        assert!((0.0..=100.0).contains(&summary.discrepancy_pct));
    }
}

#[tokio::test]
async fn test_synthetic_pipeline_to_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = SyntheticSource::new(SynthConfig {
        num_transactions: 40,
        seed: 5,
        ..SynthConfig::default()
    });
    let sink = CsvSink::new(dir.path());
    let mut pipeline = Reconciliation::new(source, sink);

    let report = pipeline.run().await.unwrap();

    let mut reader = csv::Reader::from_path(dir.path().join(RECONCILIATION_FILE)).unwrap();
    assert_eq!(reader.records().count(), report.num_rows);

    let mut reader = csv::Reader::from_path(dir.path().join(SUMMARY_FILE)).unwrap();
    assert_eq!(reader.records().count(), report.num_merchants);
}

#[tokio::test]
async fn test_pipeline_with_strict_validator_accepts_synthetic_data() {
    let source = SyntheticSource::with_seed(13);
    let mut pipeline = Reconciliation::with_validator(
        source,
        MemorySink::new(),
        Box::new(StrictRecordValidator),
    );

    assert!(pipeline.run().await.is_ok());
}

#[test]
fn test_reconcile_is_idempotent_over_repeated_runs() {
    let payments = vec![
        PaymentRecord::new("P2", "M002", date(2025, 3, 1), BigDecimal::from(20)),
        PaymentRecord::new("P1", "M001", date(2025, 3, 2), BigDecimal::from(10)),
    ];
    let ledger = vec![LedgerRecord::new("P1", "M001", date(2025, 3, 2), None)];

    let first = reconcile(&payments, &ledger).unwrap();
    let second = reconcile(&payments, &ledger).unwrap();
    assert_eq!(first, second);
}
