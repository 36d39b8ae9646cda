//! Sink implementations for persisting reconciliation results

pub mod csv;
pub mod memory;

pub use self::csv::*;
pub use self::memory::*;
