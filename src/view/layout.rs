use eframe::egui::{Pos2, Rect, Vec2};

use crate::config::{Margins, ViewConfig};

/// Inner plotting area of one view, in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotFrame {
    pub origin: Pos2,
    pub width: f32,
    pub height: f32,
    pub margin: Margins,
}

impl PlotFrame {
    pub fn new(origin: Pos2, size: Vec2) -> Self {
        Self {
            origin,
            width: size.x,
            height: size.y,
            margin: Margins::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    fn with_margin(outer_min: Pos2, outer_size: Vec2, margin: Margins) -> Self {
        Self {
            origin: outer_min + Vec2::new(margin.left, margin.top),
            width: (outer_size.x - margin.left - margin.right).max(0.0),
            height: (outer_size.y - margin.top - margin.bottom).max(0.0),
            margin,
        }
    }

    pub fn inner(&self) -> Rect {
        Rect::from_min_size(self.origin, Vec2::new(self.width, self.height))
    }

    /// Inner area grown by the margins (axes and labels live here).
    pub fn outer(&self) -> Rect {
        let m = self.margin;
        Rect::from_min_max(
            self.origin - Vec2::new(m.left, m.top),
            self.origin + Vec2::new(self.width + m.right, self.height + m.bottom),
        )
    }

    pub fn to_local(&self, surface: Pos2) -> Pos2 {
        (surface - self.origin).to_pos2()
    }

    pub fn to_surface(&self, local: Pos2) -> Pos2 {
        self.origin + local.to_vec2()
    }
}

/// Which part of the surface a pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Scatter,
    Histogram,
    Parallel,
    Outside,
}

/// Positions of the three views for a given surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub surface: Vec2,
    pub scatter: PlotFrame,
    pub histogram: PlotFrame,
    pub parallel: PlotFrame,
}

impl Layout {
    /// The surface is at least `config.min_surface`; the parallel view spans
    /// its full width.
    pub fn compute(config: &ViewConfig, available: Vec2) -> Self {
        let surface = available.max(Vec2::from(config.min_surface));

        let s = &config.scatter;
        let scatter = PlotFrame::with_margin(
            Pos2::new(s.left, s.top),
            Vec2::new(s.outer_width, s.outer_height),
            s.margin,
        );

        let h = &config.histogram;
        let histogram = PlotFrame::with_margin(
            Pos2::new(h.left, h.top),
            Vec2::new(h.outer_width, h.outer_height),
            h.margin,
        );

        let p = &config.parallel;
        let parallel = PlotFrame::with_margin(
            Pos2::new(0.0, p.top),
            Vec2::new(surface.x, p.outer_height),
            p.margin,
        );

        Self {
            surface,
            scatter,
            histogram,
            parallel,
        }
    }

    /// Brushing only starts inside the scatter's inner area; panning works
    /// anywhere over the parallel view including its margins.
    pub fn region_at(&self, pos: Pos2) -> Region {
        if self.scatter.inner().contains(pos) {
            Region::Scatter
        } else if self.parallel.outer().contains(pos) {
            Region::Parallel
        } else if self.histogram.outer().contains(pos) {
            Region::Histogram
        } else {
            Region::Outside
        }
    }

    /// Whether scales built for `other` are still valid for this layout.
    pub fn same_geometry(&self, other: &Layout) -> bool {
        self.scatter == other.scatter
            && self.histogram == other.histogram
            && self.parallel == other.parallel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_fixed_offsets() {
        let layout = Layout::compute(&ViewConfig::default(), Vec2::new(1400.0, 1000.0));
        assert_eq!(layout.scatter.origin, Pos2::new(110.0, 60.0));
        assert_eq!((layout.scatter.width, layout.scatter.height), (310.0, 290.0));
        assert_eq!(layout.histogram.origin, Pos2::new(560.0, 60.0));
        assert_eq!((layout.histogram.width, layout.histogram.height), (510.0, 340.0));
        assert_eq!(layout.parallel.origin, Pos2::new(60.0, 550.0));
        assert_eq!((layout.parallel.width, layout.parallel.height), (1310.0, 340.0));
    }

    #[test]
    fn small_windows_use_minimum_surface() {
        let layout = Layout::compute(&ViewConfig::default(), Vec2::new(300.0, 200.0));
        assert_eq!(layout.surface, Vec2::new(1100.0, 900.0));
        assert_eq!(layout.parallel.width, 1010.0);
    }

    #[test]
    fn regions_resolve_by_position() {
        let layout = Layout::compute(&ViewConfig::default(), Vec2::new(1400.0, 1000.0));
        assert_eq!(layout.region_at(Pos2::new(200.0, 100.0)), Region::Scatter);
        // scatter margin is not brushable
        assert_eq!(layout.region_at(Pos2::new(80.0, 100.0)), Region::Outside);
        assert_eq!(layout.region_at(Pos2::new(700.0, 200.0)), Region::Histogram);
        assert_eq!(layout.region_at(Pos2::new(20.0, 520.0)), Region::Parallel);
        assert_eq!(layout.scatter.to_local(Pos2::new(200.0, 100.0)), Pos2::new(90.0, 40.0));
    }
}
