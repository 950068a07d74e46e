//! RAD compiler - turns Route Availability Document annex exports into a
//! normalized SQLite rule store.
//!
//! Each annex row becomes a rule, and the free-text restriction columns are
//! compiled into shared, deduplicated condition records (levels, time
//! windows, traffic flows, aircraft types and operational categories) that
//! the rules reference through per-family junction tables.

pub mod catalog;
pub mod conditions;
pub mod conditions_repo;
pub mod db;
pub mod entities;
pub mod entities_repo;
pub mod grammar;
pub mod load_report;
pub mod loader;
pub mod log_format;
pub mod rules;
pub mod rules_repo;
pub mod schema;

pub use catalog::Catalog;
pub use conditions::{ConditionCategory, ParsedConditions};
pub use grammar::{Token, tokenize};
pub use load_report::{CompileReport, LoaderMetrics};
pub use loader::{LoaderStage, compile};
pub use rules::RuleFamily;
