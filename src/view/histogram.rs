/// One histogram bucket. `x1` is exclusive except for the last bin, which
/// also holds the domain maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

/// Bucket `values` over `domain` using `thresholds` as inner bin edges.
///
/// Thresholds at or below the domain minimum, or above the maximum, are
/// dropped, so `n` usable thresholds give `n + 1` bins. Non-finite values and
/// values outside the domain are skipped.
pub fn bin_values(
    values: impl IntoIterator<Item = f64>,
    domain: (f64, f64),
    thresholds: &[f64],
) -> Vec<Bin> {
    let (lo, hi) = domain;
    let edges: Vec<f64> = thresholds
        .iter()
        .copied()
        .filter(|&t| t > lo && t <= hi)
        .collect();

    let mut bins: Vec<Bin> = Vec::with_capacity(edges.len() + 1);
    let mut start = lo;
    for &edge in &edges {
        bins.push(Bin { x0: start, x1: edge, count: 0 });
        start = edge;
    }
    bins.push(Bin { x0: start, x1: hi, count: 0 });

    for v in values {
        if !v.is_finite() || v < lo || v > hi {
            continue;
        }
        // number of edges <= v is the bin index
        let idx = edges.partition_point(|&e| e <= v);
        bins[idx].count += 1;
    }

    bins
}
