//! Data layer for the influencer ROI dashboard.
//!
//! Responsible for discovering and reading the four input CSV files, joining
//! them into the merged metric table, filtering, per-influencer aggregation
//! and the chart specifications handed to the renderer.

pub mod aggregator;
pub mod charts;
pub mod filter;
pub mod pipeline;
pub mod reader;

pub use roi_core as core;
