//! Aggregation engine for Label Trends.
//!
//! Turns an unordered stream of issue observations into per-label daily
//! series on a shared, gap-free day axis, optionally collapsed into per-label
//! totals. Also reads exported Jira issue dumps for offline runs.

pub mod aggregator;
pub mod analysis;
pub mod collector;
pub mod normalizer;
pub mod reader;

pub use trends_core as core;
