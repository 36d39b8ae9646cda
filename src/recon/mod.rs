//! Reconciliation module: outer join, aggregation, and the run pipeline

pub mod join;
pub mod pipeline;
pub mod summary;

pub use join::*;
pub use pipeline::*;
pub use summary::*;
