use eframe::egui::{Pos2, Rect, Vec2};

use crate::data::model::Dataset;

use super::scale::ScatterScales;

/// A normalised brush rectangle in scatter-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushRect {
    pub min: Pos2,
    pub max: Pos2,
}

impl BrushRect {
    /// Rectangle spanned by two arbitrary corners, clamped to `extent`.
    pub fn from_corners(a: Pos2, b: Pos2, extent: Vec2) -> Self {
        let clamp = |p: Pos2| Pos2::new(p.x.clamp(0.0, extent.x), p.y.clamp(0.0, extent.y));
        let (a, b) = (clamp(a), clamp(b));
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, p: Pos2) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Shift by `delta`, stopping at the extent without changing size.
    pub fn translated_within(&self, delta: Vec2, extent: Vec2) -> Self {
        let size = self.max - self.min;
        let min = Pos2::new(
            (self.min.x + delta.x).clamp(0.0, (extent.x - size.x).max(0.0)),
            (self.min.y + delta.y).clamp(0.0, (extent.y - size.y).max(0.0)),
        );
        Self { min, max: min + size }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_min_max(self.min, self.max)
    }
}

/// Per-record inside/outside flag for the scatter brush. A cleared brush
/// marks every record outside; records without a finite position are never
/// inside.
pub fn brush_partition(
    dataset: &Dataset,
    scales: &ScatterScales,
    brush: Option<&BrushRect>,
) -> Vec<bool> {
    let Some(brush) = brush else {
        return vec![false; dataset.len()];
    };
    dataset
        .records()
        .iter()
        .map(|r| scales.position(r).is_some_and(|p| brush.contains(p)))
        .collect()
}
