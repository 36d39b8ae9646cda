//! End-to-end pipeline example: synthetic data to CSV files
//!
//! Generates a seeded payments/ledger dataset pair, reconciles it, and
//! writes Payments.csv, Ledger.csv, Reconciliation.csv, and
//! ReconciliationSummary.csv into ./recon-output.

use recon_core::{CsvSink, Reconciliation, SynthConfig, SyntheticSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Recon Core - Synthetic CSV Export Example\n");

    let out_dir = std::path::Path::new("recon-output");
    std::fs::create_dir_all(out_dir)?;

    let config = SynthConfig {
        seed: 42,
        ..SynthConfig::default()
    };
    println!(
        "🎲 Generating {} transactions across {} merchants (seed {})...",
        config.num_transactions, config.num_merchants, config.seed
    );

    let source = SyntheticSource::new(config);
    let sink = CsvSink::new(out_dir);
    let mut pipeline = Reconciliation::new(source, sink);

    let report = pipeline.run().await?;

    println!("✅ Reconciliation complete:\n");
    println!("  payments:      {}", report.num_payments);
    println!("  ledger:        {}", report.num_ledger_records);
    println!("  rows:          {}", report.num_rows);
    println!("  discrepancies: {}", report.num_discrepancies);
    println!("  merchants:     {}", report.num_merchants);
    println!("\nCSV files written to {}/", out_dir.display());

    Ok(())
}
