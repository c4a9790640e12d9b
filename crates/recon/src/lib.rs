//! `rollcall-recon`: name/phone reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns the source rows
//! that have no counterpart in the reference. No CLI or IO dependencies.

pub mod adapter;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod summary;

pub use adapter::{RecordAdapter, ReferenceAdapter, SourceAdapter};
pub use config::{ReconConfig, SchemaConfig};
pub use engine::run;
pub use error::ReconError;
pub use index::{ReferenceIndex, ReferenceIndexBuilder};
pub use model::{CellValue, CommonRecord, Dataset, Difference, MatchOutcome, ReconResult, Table};
