use crate::data::filter::threshold_selection;
use crate::data::model::Dataset;

use super::brush::{BrushRect, brush_partition};
use super::scale::ScatterScales;
use super::zoom::ZoomTransform;

// ---------------------------------------------------------------------------
// ViewState – everything the user can change
// ---------------------------------------------------------------------------

/// Mutable interaction state. Only the event handler owning an interaction
/// writes to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    threshold: i64,
    threshold_range: (i64, i64),
    /// Scatter-local brush rectangle; `None` means no selection.
    pub brush: Option<BrushRect>,
    pub zoom: ZoomTransform,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            threshold: 0,
            threshold_range: (0, 0),
            brush: None,
            zoom: ZoomTransform::IDENTITY,
        }
    }
}

impl ViewState {
    /// Fresh state for a dataset: threshold at the minimum Total, no brush,
    /// identity zoom.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let range = dataset.total_range();
        Self {
            threshold: range.0,
            threshold_range: range,
            ..Self::default()
        }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn threshold_range(&self) -> (i64, i64) {
        self.threshold_range
    }

    /// Clamp to the slider range and store. Returns whether it changed.
    pub fn set_threshold(&mut self, value: i64) -> bool {
        let (lo, hi) = self.threshold_range;
        let clamped = value.clamp(lo, hi);
        let changed = clamped != self.threshold;
        self.threshold = clamped;
        changed
    }
}

// ---------------------------------------------------------------------------
// DerivedSelection – pure function of (Dataset, ViewState)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedSelection {
    /// Indices with `Total >= threshold`, in dataset order.
    pub passing: Vec<usize>,
    /// Per record: inside the scatter brush.
    pub highlighted: Vec<bool>,
}

pub fn derive(dataset: &Dataset, view: &ViewState, scatter: &ScatterScales) -> DerivedSelection {
    DerivedSelection {
        passing: threshold_selection(dataset, view.threshold()),
        highlighted: brush_partition(dataset, scatter, view.brush.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::dataset_with_totals;

    #[test]
    fn threshold_defaults_to_minimum_and_clamps() {
        let ds = dataset_with_totals(&[("A", 300.0), ("B", 500.0), ("C", 700.0)]);
        let mut view = ViewState::for_dataset(&ds);
        assert_eq!(view.threshold(), 300);
        assert!(view.set_threshold(10_000));
        assert_eq!(view.threshold(), 700);
        assert!(!view.set_threshold(701));
        view.set_threshold(-5);
        assert_eq!(view.threshold(), 300);
    }
}
