//! # Recon Core
//!
//! A reconciliation library for payment and ledger record sets: full outer
//! join on the composite (PaymentID, Merchant) key, discrepancy
//! classification, and per-merchant summaries.
//!
//! ## Features
//!
//! - **Outer-join reconciliation**: one row per distinct composite key across
//!   both inputs, with missing-payment, missing-ledger, and amount-mismatch
//!   flags
//! - **Exact decimal comparison**: amounts are arbitrary-precision decimals,
//!   so `100` and `100.00` never produce a spurious mismatch
//! - **Per-merchant aggregation**: totals, discrepancy counts, and the
//!   discrepancy rate in deterministic merchant order
//! - **Source/sink abstraction**: trait-based boundary for record suppliers
//!   and result writers, with CSV and in-memory sinks included
//! - **Synthetic data**: a seedable generator producing reproducible
//!   payments/ledger fixtures with a configurable discrepancy rate
//!
//! ## Quick Start
//!
//! ```rust
//! use recon_core::{reconcile, summarize, PaymentRecord, LedgerRecord};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let payments = vec![PaymentRecord::new("P1", "M001", date, BigDecimal::from(100))];
//! let ledger = vec![LedgerRecord::new("P1", "M001", date, Some(BigDecimal::from(90)))];
//!
//! let rows = reconcile(&payments, &ledger).unwrap();
//! assert!(rows[0].amount_mismatch);
//!
//! let summaries = summarize(&rows);
//! assert_eq!(summaries[0].discrepancy_pct, 100.0);
//! ```

pub mod recon;
pub mod sink;
pub mod synth;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use recon::*;
pub use sink::*;
pub use synth::*;
pub use traits::*;
pub use types::*;
