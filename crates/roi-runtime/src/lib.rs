//! Runtime layer for the influencer ROI dashboard.
//!
//! Owns the session state (upload slots, loaded tables, filter selection)
//! and recomputes the render-ready snapshot on every interaction.

pub mod session;
pub mod snapshot;

pub use roi_core as core;
pub use roi_data as data;
