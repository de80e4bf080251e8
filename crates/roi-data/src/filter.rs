//! Set-membership filtering of the merged table by platform, product and
//! gender.

use std::collections::BTreeSet;
use std::fmt;

use roi_core::models::MergedRecord;
use serde::{Deserialize, Serialize};
use tracing::warn;

// ── FilterField ───────────────────────────────────────────────────────────────

/// The three filterable columns, in widget order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterField {
    Platform,
    Product,
    Gender,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [FilterField::Platform, FilterField::Product, FilterField::Gender];

    /// The column value this field filters on.
    pub fn value_of<'a>(&self, record: &'a MergedRecord) -> &'a str {
        match self {
            FilterField::Platform => &record.platform,
            FilterField::Product => &record.product,
            FilterField::Gender => &record.gender,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Platform => "Platform",
            FilterField::Product => "Product",
            FilterField::Gender => "Gender",
        }
    }

    /// Next field in widget order, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            FilterField::Platform => FilterField::Product,
            FilterField::Product => FilterField::Gender,
            FilterField::Gender => FilterField::Platform,
        }
    }

    /// Previous field in widget order, wrapping around.
    pub fn prev(&self) -> Self {
        match self {
            FilterField::Platform => FilterField::Gender,
            FilterField::Product => FilterField::Platform,
            FilterField::Gender => FilterField::Product,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── FilterOptions ─────────────────────────────────────────────────────────────

/// Values observed in the merged table, per field, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub platforms: Vec<String>,
    pub products: Vec<String>,
    pub genders: Vec<String>,
}

impl FilterOptions {
    /// Collect the distinct values of each field.
    pub fn observe(rows: &[MergedRecord]) -> Self {
        let mut options = FilterOptions::default();
        for field in FilterField::ALL {
            let values = options.values_mut(field);
            for row in rows {
                let value = field.value_of(row);
                if !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            }
        }
        options
    }

    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Platform => &self.platforms,
            FilterField::Product => &self.products,
            FilterField::Gender => &self.genders,
        }
    }

    fn values_mut(&mut self, field: FilterField) -> &mut Vec<String> {
        match field {
            FilterField::Platform => &mut self.platforms,
            FilterField::Product => &mut self.products,
            FilterField::Gender => &mut self.genders,
        }
    }
}

// ── FilterSelection ───────────────────────────────────────────────────────────

/// The values currently selected for each field.
///
/// A row passes when its platform, product and gender are all selected. An
/// empty set for any field therefore selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub platforms: BTreeSet<String>,
    pub products: BTreeSet<String>,
    pub genders: BTreeSet<String>,
}

impl FilterSelection {
    /// Select every observed value (the widgets' default state).
    pub fn all(options: &FilterOptions) -> Self {
        FilterSelection {
            platforms: options.platforms.iter().cloned().collect(),
            products: options.products.iter().cloned().collect(),
            genders: options.genders.iter().cloned().collect(),
        }
    }

    /// Build a selection from command-line lists.
    ///
    /// `None` selects all observed values for that field. Requested values
    /// that were never observed are dropped with a warning.
    pub fn from_requested(
        options: &FilterOptions,
        platforms: Option<&[String]>,
        products: Option<&[String]>,
        genders: Option<&[String]>,
    ) -> Self {
        let mut selection = FilterSelection::all(options);
        for (field, requested) in [
            (FilterField::Platform, platforms),
            (FilterField::Product, products),
            (FilterField::Gender, genders),
        ] {
            let Some(requested) = requested else {
                continue;
            };
            let observed = options.values(field);
            let chosen = selection.values_mut(field);
            chosen.clear();
            for value in requested {
                if observed.iter().any(|v| v == value) {
                    chosen.insert(value.clone());
                } else {
                    warn!("Ignoring {} filter value not present in data: {}", field, value);
                }
            }
        }
        selection
    }

    pub fn values(&self, field: FilterField) -> &BTreeSet<String> {
        match field {
            FilterField::Platform => &self.platforms,
            FilterField::Product => &self.products,
            FilterField::Gender => &self.genders,
        }
    }

    fn values_mut(&mut self, field: FilterField) -> &mut BTreeSet<String> {
        match field {
            FilterField::Platform => &mut self.platforms,
            FilterField::Product => &mut self.products,
            FilterField::Gender => &mut self.genders,
        }
    }

    pub fn is_selected(&self, field: FilterField, value: &str) -> bool {
        self.values(field).contains(value)
    }

    /// Flip one value in or out of the selection.
    pub fn toggle(&mut self, field: FilterField, value: &str) {
        let values = self.values_mut(field);
        if !values.remove(value) {
            values.insert(value.to_string());
        }
    }

    /// Select every observed value of `field`.
    pub fn select_all(&mut self, field: FilterField, options: &FilterOptions) {
        *self.values_mut(field) = options.values(field).iter().cloned().collect();
    }

    /// Deselect every value of `field`.
    pub fn clear(&mut self, field: FilterField) {
        self.values_mut(field).clear();
    }

    /// Keep only values that are still observed; used after a reload.
    pub fn retain_observed(&mut self, options: &FilterOptions) {
        for field in FilterField::ALL {
            let observed = options.values(field);
            self.values_mut(field)
                .retain(|v| observed.iter().any(|o| o == v));
        }
    }

    /// `true` when `record` passes all three membership tests.
    pub fn matches(&self, record: &MergedRecord) -> bool {
        FilterField::ALL
            .iter()
            .all(|field| self.is_selected(*field, field.value_of(record)))
    }
}

/// Return the rows selected by `selection`, in input order.
pub fn apply_filters(rows: &[MergedRecord], selection: &FilterSelection) -> Vec<MergedRecord> {
    rows.iter()
        .filter(|row| selection.matches(row))
        .cloned()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::merge;
    use crate::pipeline::tests::sample_dataset;

    fn merged() -> Vec<MergedRecord> {
        merge(&sample_dataset())
    }

    #[test]
    fn test_observe_first_appearance_order() {
        let options = FilterOptions::observe(&merged());
        assert_eq!(options.platforms, vec!["Instagram", "YouTube"]);
        assert_eq!(options.products, vec!["Whey", "Multivitamin", "Creatine"]);
        assert_eq!(options.genders, vec!["F", "M"]);
    }

    #[test]
    fn test_all_observed_values_keep_every_row() {
        let rows = merged();
        let selection = FilterSelection::all(&FilterOptions::observe(&rows));
        assert_eq!(apply_filters(&rows, &selection).len(), rows.len());
    }

    #[test]
    fn test_empty_set_for_any_field_returns_nothing() {
        let rows = merged();
        let options = FilterOptions::observe(&rows);
        for field in FilterField::ALL {
            let mut selection = FilterSelection::all(&options);
            selection.clear(field);
            assert!(
                apply_filters(&rows, &selection).is_empty(),
                "clearing {field} should select nothing"
            );
        }
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let rows = merged();
        let options = FilterOptions::observe(&rows);
        let mut selection = FilterSelection::all(&options);
        selection.toggle(FilterField::Platform, "YouTube");
        selection.toggle(FilterField::Product, "Creatine");

        let filtered = apply_filters(&rows, &selection);
        assert!(filtered
            .iter()
            .all(|r| r.platform == "Instagram" && r.product != "Creatine"));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_preserves_input_order() {
        let rows = merged();
        let options = FilterOptions::observe(&rows);
        let mut selection = FilterSelection::all(&options);
        selection.toggle(FilterField::Gender, "M");

        let filtered = apply_filters(&rows, &selection);
        let products: Vec<&str> = filtered.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["Whey", "Creatine"]);
    }

    #[test]
    fn test_toggle_round_trip() {
        let options = FilterOptions::observe(&merged());
        let mut selection = FilterSelection::all(&options);
        selection.toggle(FilterField::Gender, "F");
        assert!(!selection.is_selected(FilterField::Gender, "F"));
        selection.toggle(FilterField::Gender, "F");
        assert!(selection.is_selected(FilterField::Gender, "F"));
    }

    #[test]
    fn test_select_all_restores_field() {
        let options = FilterOptions::observe(&merged());
        let mut selection = FilterSelection::all(&options);
        selection.clear(FilterField::Product);
        selection.select_all(FilterField::Product, &options);
        assert_eq!(selection, FilterSelection::all(&options));
    }

    #[test]
    fn test_from_requested_none_means_all() {
        let options = FilterOptions::observe(&merged());
        let selection = FilterSelection::from_requested(&options, None, None, None);
        assert_eq!(selection, FilterSelection::all(&options));
    }

    #[test]
    fn test_from_requested_drops_unobserved_values() {
        let options = FilterOptions::observe(&merged());
        let platforms = vec!["YouTube".to_string(), "TikTok".to_string()];
        let selection =
            FilterSelection::from_requested(&options, Some(platforms.as_slice()), None, None);

        assert_eq!(
            selection.platforms.iter().collect::<Vec<_>>(),
            vec!["YouTube"]
        );
        assert_eq!(selection.products.len(), 3);
    }

    #[test]
    fn test_from_requested_empty_list_selects_nothing() {
        let rows = merged();
        let options = FilterOptions::observe(&rows);
        let selection = FilterSelection::from_requested(&options, None, Some(&[][..]), None);
        assert!(apply_filters(&rows, &selection).is_empty());
    }

    #[test]
    fn test_retain_observed_drops_stale_values() {
        let options = FilterOptions::observe(&merged());
        let mut selection = FilterSelection::all(&options);
        selection.platforms.insert("Snapchat".to_string());
        selection.retain_observed(&options);
        assert_eq!(selection, FilterSelection::all(&options));
    }

    #[test]
    fn test_field_cycle() {
        assert_eq!(FilterField::Platform.next(), FilterField::Product);
        assert_eq!(FilterField::Gender.next(), FilterField::Platform);
        assert_eq!(FilterField::Platform.prev(), FilterField::Gender);
    }
}
