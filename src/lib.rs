//! # timesheet-rollup
//!
//! Weekly roll-up reports from timesheet exports.
//!
//! ## Usage
//!
//! ```bash
//! timesheet-rollup [input.csv] [output-dir] [--config rollup.toml] [--monthly]
//! ```
//!
//! ## Modules
//!
//! - `period` - Week (Monday start) and month assignment
//! - `record` - Raw and canonical row types
//! - `normalize` - Validation and canonicalization of raw records
//! - `classify` - Time-off and SR&ED-qualifying predicates
//! - `roster` - The complete sorted set of people in a run
//! - `aggregate` - Group-by `(person, period)` with pluggable reducers
//! - `matrix` - Pivot, reindex and filter person-by-period matrices
//! - `report` - Report driver and run statistics
//! - `source` / `sink` - CSV input and output
//! - `config` - Layered configuration (defaults, TOML, environment)
//! - `error` - Error type and codes
pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod matrix;
pub mod normalize;
pub mod period;
pub mod record;
pub mod report;
pub mod roster;
pub mod sink;
pub mod source;


pub use config::RollupConfig;
pub use error::{Result, RollupError};
pub use report::{run, RunOptions, RunStats, RunSummary};
