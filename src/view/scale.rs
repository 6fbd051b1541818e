use eframe::egui::Pos2;

use crate::config::ViewConfig;
use crate::data::model::{Dataset, Record, Stat};

use super::histogram::{Bin, bin_values};
use super::layout::{Layout, PlotFrame};

// ---------------------------------------------------------------------------
// Tick generation
// ---------------------------------------------------------------------------

/// Round step (1, 2 or 5 × 10^k) giving roughly `count` intervals over
/// `[start, stop]`.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if span == 0.0 || !span.is_finite() || count == 0 {
        return 0.0;
    }
    let raw = span / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    power * factor
}

/// Round values inside `[start, stop]`, ascending.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
    if lo == hi {
        return if lo.is_finite() { vec![lo] } else { Vec::new() };
    }
    let step = tick_step(lo, hi, count);
    if step == 0.0 {
        return Vec::new();
    }
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    // multiplying the index avoids accumulating rounding error
    (first..=last).map(|i| i as f64 * step).collect()
}

// ---------------------------------------------------------------------------
// LinearScale
// ---------------------------------------------------------------------------

/// Linear map from a data domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Pixel position of `value`, or `None` when it is not finite. A
    /// degenerate domain maps everything to the middle of the range.
    pub fn map(&self, value: f64) -> Option<f32> {
        if !value.is_finite() {
            return None;
        }
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 || !span.is_finite() {
            0.5
        } else {
            (value - d0) / span
        };
        let out = r0 as f64 + t * (r1 - r0) as f64;
        out.is_finite().then_some(out as f32)
    }

    pub fn invert(&self, pixel: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = (r1 - r0) as f64;
        if span == 0.0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (pixel - r0) as f64 / span * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Extend the domain outward to round tick values.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut d0, mut d1) = self.domain;
        let mut previous = 0.0;
        for _ in 0..10 {
            let step = tick_step(d0, d1, count);
            if step == 0.0 || step == previous {
                break;
            }
            d0 = (d0 / step).floor() * step;
            d1 = (d1 / step).ceil() * step;
            previous = step;
        }
        self.domain = (d0, d1);
        self
    }
}

// ---------------------------------------------------------------------------
// PointScale
// ---------------------------------------------------------------------------

/// Evenly spaced positions for `n` categories with half a step of padding on
/// both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointScale {
    pub count: usize,
    pub width: f32,
}

impl PointScale {
    pub fn step(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.width / self.count as f32
        }
    }

    pub fn position(&self, index: usize) -> f32 {
        self.step() * (index as f32 + 0.5)
    }
}

// ---------------------------------------------------------------------------
// Scale bundles per view
// ---------------------------------------------------------------------------

/// Scatter axes map `[0, max]` onto the plot frame; y grows upward.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterScales {
    pub x_stat: Stat,
    pub y_stat: Stat,
    pub x: LinearScale,
    pub y: LinearScale,
}

impl ScatterScales {
    pub fn build(dataset: &Dataset, x_stat: Stat, y_stat: Stat, frame: &PlotFrame) -> Self {
        Self {
            x_stat,
            y_stat,
            x: LinearScale::new((0.0, dataset.max(x_stat)), (0.0, frame.width)),
            y: LinearScale::new((0.0, dataset.max(y_stat)), (frame.height, 0.0)),
        }
    }

    /// Frame-local position of a record, if both coordinates are finite.
    pub fn position(&self, record: &Record) -> Option<Pos2> {
        let x = self.x.map(record.get(self.x_stat))?;
        let y = self.y.map(record.get(self.y_stat))?;
        Some(Pos2::new(x, y))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramScales {
    pub x: LinearScale,
    pub y: LinearScale,
    pub bins: Vec<Bin>,
}

impl HistogramScales {
    pub fn build(dataset: &Dataset, stat: Stat, bin_target: usize, frame: &PlotFrame) -> Self {
        let domain = dataset.extent(stat).unwrap_or((0.0, 0.0));
        let x = LinearScale::new(domain, (0.0, frame.width));
        let thresholds = x.ticks(bin_target);
        let bins = bin_values(dataset.records().iter().map(|r| r.get(stat)), domain, &thresholds);
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
        let y = LinearScale::new((0.0, max_count as f64), (frame.height, 0.0)).nice(10);
        Self { x, y, bins }
    }
}

/// One vertical axis per stat; each axis maps the stat's own extent.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelScales {
    pub stats: Vec<Stat>,
    pub x: PointScale,
    pub y: Vec<LinearScale>,
}

impl ParallelScales {
    pub fn build(dataset: &Dataset, stats: &[Stat], frame: &PlotFrame) -> Self {
        let y = stats
            .iter()
            .map(|&stat| {
                let domain = dataset.extent(stat).unwrap_or((0.0, 0.0));
                LinearScale::new(domain, (frame.height, 0.0))
            })
            .collect();
        Self {
            stats: stats.to_vec(),
            x: PointScale {
                count: stats.len(),
                width: frame.width,
            },
            y,
        }
    }

    /// Frame-local polyline vertices, or `None` if any axis value is not
    /// finite.
    pub fn polyline(&self, record: &Record) -> Option<Vec<Pos2>> {
        self.stats
            .iter()
            .zip(&self.y)
            .enumerate()
            .map(|(i, (&stat, scale))| {
                scale
                    .map(record.get(stat))
                    .map(|y| Pos2::new(self.x.position(i), y))
            })
            .collect()
    }
}

/// Every scale of the surface. Depends only on the dataset and the layout,
/// never on interaction state.
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    pub scatter: ScatterScales,
    pub histogram: HistogramScales,
    pub parallel: ParallelScales,
}

impl Scales {
    pub fn build(dataset: &Dataset, config: &ViewConfig, layout: &Layout) -> Self {
        Self {
            scatter: ScatterScales::build(
                dataset,
                config.scatter.x_stat,
                config.scatter.y_stat,
                &layout.scatter,
            ),
            histogram: HistogramScales::build(
                dataset,
                config.histogram.stat,
                config.histogram.bins,
                &layout.histogram,
            ),
            parallel: ParallelScales::build(dataset, &config.parallel.axes, &layout.parallel),
        }
    }
}
