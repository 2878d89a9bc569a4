//! Validation and summary statistics for assist09-style knowledge-tracing
//! sequence files.
//!
//! Each file holds 4-line records (sequence length, question ids, skill ids,
//! responses). [`summarize`] scans any number of such files and collects
//! counts plus a list of structural warnings without aborting on bad records.

pub mod config;
pub mod record;
pub mod report;
pub mod summary;

pub use config::{Overrides, RunConfig};
pub use report::{DEFAULT_MAX_WARNINGS, TextReport, to_json};
pub use summary::{DatasetSummary, DatasetWarning, SummaryOptions, summarize};
