//! Shared building blocks for Label Trends.
//!
//! Holds the issue and series data model, the error type used by every crate
//! in the workspace, command-line configuration, backend query construction
//! and the date/timestamp helpers the aggregation engine relies on.

pub mod error;
pub mod models;
pub mod query;
pub mod settings;
pub mod time_utils;
