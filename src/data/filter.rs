use super::model::{Dataset, Record, Stat};

// ---------------------------------------------------------------------------
// Threshold filter: minimum Total
// ---------------------------------------------------------------------------

/// Whether a record's Total reaches `threshold`. Non-finite Totals never
/// pass.
pub fn passes_threshold(record: &Record, threshold: i64) -> bool {
    let total = record.get(Stat::Total);
    total.is_finite() && total >= threshold as f64
}

/// Return indices of records whose Total is at least `threshold`, in
/// dataset order.
pub fn threshold_selection(dataset: &Dataset, threshold: i64) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| passes_threshold(r, threshold))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::dataset_with_totals;

    fn names(ds: &Dataset, indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| ds.records()[i].name().to_string()).collect()
    }

    #[test]
    fn selection_is_monotonic_in_threshold() {
        let ds = dataset_with_totals(&[
            ("a", 180.0),
            ("b", 305.0),
            ("c", 305.0),
            ("d", 480.0),
            ("e", 600.0),
            ("f", 780.0),
        ]);
        let (lo, hi) = ds.total_range();
        for t1 in lo..=hi + 1 {
            let wider = threshold_selection(&ds, t1);
            for t2 in (t1 + 1)..=(hi + 1) {
                let narrower = threshold_selection(&ds, t2);
                assert!(
                    narrower.iter().all(|i| wider.contains(i)),
                    "selection at {t2} not contained in selection at {t1}"
                );
            }
        }
    }

    #[test]
    fn bounds_select_everything_and_nothing() {
        let ds = dataset_with_totals(&[("A", 300.0), ("B", 500.0), ("C", 700.0)]);
        let (lo, hi) = ds.total_range();
        assert_eq!(threshold_selection(&ds, lo), vec![0, 1, 2]);
        assert!(threshold_selection(&ds, hi + 1).is_empty());
    }

    #[test]
    fn fractional_totals_use_integer_bounds() {
        let ds = dataset_with_totals(&[("A", 300.4), ("B", 699.6)]);
        let (lo, hi) = ds.total_range();
        assert_eq!((lo, hi), (300, 700));
        assert_eq!(threshold_selection(&ds, lo).len(), 2);
        assert!(threshold_selection(&ds, hi + 1).is_empty());
    }

    #[test]
    fn threshold_scenario_keeps_dataset_order() {
        let ds = dataset_with_totals(&[("A", 300.0), ("B", 500.0), ("C", 700.0)]);
        assert_eq!(names(&ds, &threshold_selection(&ds, 450)), vec!["B", "C"]);
        assert_eq!(names(&ds, &threshold_selection(&ds, 600)), vec!["C"]);
    }

    #[test]
    fn nan_total_never_passes() {
        let ds = dataset_with_totals(&[("A", f64::NAN), ("B", 10.0)]);
        assert_eq!(threshold_selection(&ds, i64::MIN), vec![1]);
    }

    #[test]
    fn infinite_total_never_passes() {
        let ds = dataset_with_totals(&[("A", f64::INFINITY), ("B", 10.0), ("C", 20.0)]);
        let (_, hi) = ds.total_range();
        assert_eq!(hi, 20);
        assert!(threshold_selection(&ds, hi + 1).is_empty());
        assert_eq!(threshold_selection(&ds, i64::MIN), vec![1, 2]);
    }
}
