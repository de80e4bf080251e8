//! Core domain types for the influencer ROI dashboard.
//!
//! Holds the four input record types and the derived merged / summary rows,
//! the return-on-spend formulas and ROI segmentation, the error type, CLI
//! settings and number formatting shared by every other crate.

pub mod error;
pub mod formatting;
pub mod metrics;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
