//! Terminal UI layer for the influencer ROI dashboard.
//!
//! Provides themes, header and indicator components, the Metrics, Insights,
//! Charts and Raw Data views, the filter panel, a plain-text report and the
//! main application event loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod filter_panel;
pub mod metrics_view;
pub mod report;
pub mod table_view;
pub mod themes;

pub use roi_core as core;
