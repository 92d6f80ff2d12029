//! Runtime layer for Label Trends.
//!
//! Connects the aggregation engine to its upstream issue sources (the live
//! Jira REST API or an exported dump) and runs complete searches.

pub mod jira_client;
pub mod search_service;
pub mod source;

pub use trends_core as core;
pub use trends_data as data;
