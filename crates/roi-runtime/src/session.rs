//! Session state for one dashboard run.
//!
//! [`DashboardSession`] owns the four upload slots, the loaded tables, the
//! merged metric table and the current filter selection. Every interaction
//! (load, reload, filter change) is followed by a full recompute through
//! [`DashboardSession::state`]; nothing is cached between renders except the
//! merged table, which only changes on load.

use chrono::{DateTime, Utc};
use roi_core::error::Result;
use roi_core::models::{Dataset, MergedRecord};
use roi_data::filter::{FilterField, FilterOptions, FilterSelection};
use roi_data::pipeline::merge;
use roi_data::reader::{load_dataset, InputFiles};

use crate::snapshot::{DashboardSnapshot, DashboardState};

// ── RequestedFilters ──────────────────────────────────────────────────────────

/// Filter values asked for on the command line, applied on first load.
///
/// `None` for a field means "every observed value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedFilters {
    pub platforms: Option<Vec<String>>,
    pub products: Option<Vec<String>>,
    pub genders: Option<Vec<String>>,
}

// ── DashboardSession ──────────────────────────────────────────────────────────

pub struct DashboardSession {
    inputs: InputFiles,
    requested: RequestedFilters,
    dataset: Option<Dataset>,
    merged: Vec<MergedRecord>,
    options: FilterOptions,
    selection: FilterSelection,
    /// Description of the last load failure, cleared on success.
    last_error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
}

impl DashboardSession {
    pub fn new(inputs: InputFiles, requested: RequestedFilters) -> Self {
        Self {
            inputs,
            requested,
            dataset: None,
            merged: Vec::new(),
            options: FilterOptions::default(),
            selection: FilterSelection::default(),
            last_error: None,
            loaded_at: None,
        }
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Read the four files and run the metric pipeline.
    ///
    /// With an incomplete upload set this is a no-op: the session stays in
    /// the awaiting state. The first successful load applies the requested
    /// filters; later loads keep the current selection, minus values that
    /// no longer occur.
    pub fn load(&mut self) -> Result<()> {
        if !self.inputs.is_complete() {
            tracing::info!(missing = ?self.inputs.missing(), "awaiting uploads");
            return Ok(());
        }

        match load_dataset(&self.inputs) {
            Ok(dataset) => {
                self.install(dataset);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load input files");
                self.last_error = Some(e.to_string());
                self.dataset = None;
                self.merged.clear();
                Err(e)
            }
        }
    }

    /// Re-read the files from disk. Same as [`load`](Self::load).
    pub fn reload(&mut self) -> Result<()> {
        tracing::info!("reloading input files");
        self.load()
    }

    /// Replace the upload slots and reload.
    pub fn set_inputs(&mut self, inputs: InputFiles) -> Result<()> {
        self.inputs = inputs;
        self.load()
    }

    fn install(&mut self, dataset: Dataset) {
        let merged = merge(&dataset);
        let options = FilterOptions::observe(&merged);

        if self.loaded_at.is_none() {
            self.selection = FilterSelection::from_requested(
                &options,
                self.requested.platforms.as_deref(),
                self.requested.products.as_deref(),
                self.requested.genders.as_deref(),
            );
        } else {
            self.selection.retain_observed(&options);
        }

        tracing::info!(
            influencers = dataset.influencers.len(),
            posts = dataset.posts.len(),
            tracking = dataset.tracking.len(),
            payouts = dataset.payouts.len(),
            merged = merged.len(),
            "dataset loaded"
        );

        self.options = options;
        self.merged = merged;
        self.dataset = Some(dataset);
        self.last_error = None;
        self.loaded_at = Some(Utc::now());
    }

    // ── Filter interaction ────────────────────────────────────────────────

    pub fn toggle(&mut self, field: FilterField, value: &str) {
        self.selection.toggle(field, value);
    }

    pub fn select_all(&mut self, field: FilterField) {
        self.selection.select_all(field, &self.options);
    }

    pub fn clear(&mut self, field: FilterField) {
        self.selection.clear(field);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn inputs(&self) -> &InputFiles {
        &self.inputs
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn merged(&self) -> &[MergedRecord] {
        &self.merged
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    // ── Recompute ─────────────────────────────────────────────────────────

    /// Run filter → aggregate → summary → charts for the current selection.
    pub fn state(&self) -> DashboardState {
        if !self.inputs.is_complete() {
            return DashboardState::AwaitingUploads {
                missing: self.inputs.missing().into_iter().map(String::from).collect(),
            };
        }
        if let Some(message) = &self.last_error {
            return DashboardState::Failed {
                message: message.clone(),
            };
        }
        let Some(dataset) = &self.dataset else {
            return DashboardState::Failed {
                message: "input files have not been loaded".to_string(),
            };
        };

        DashboardState::Ready {
            snapshot: Box::new(DashboardSnapshot::build(
                &self.merged,
                &dataset.influencers,
                &self.options,
                &self.selection,
            )),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
