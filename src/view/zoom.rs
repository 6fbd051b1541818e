use eframe::egui::{Pos2, Vec2};

/// Scroll-to-zoom sensitivity: 500 px of wheel travel doubles the scale.
pub const WHEEL_SENSITIVITY: f32 = 0.002;

/// Uniform scale plus translation applied to the whole parallel group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn apply(&self, p: Pos2) -> Pos2 {
        Pos2::new(p.x * self.scale, p.y * self.scale) + self.translate
    }

    pub fn invert(&self, p: Pos2) -> Pos2 {
        let q = p - self.translate;
        Pos2::new(q.x / self.scale, q.y / self.scale)
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Multiply the scale by `factor`, clamped to `extent`, keeping `anchor`
    /// fixed on screen. Returns whether the transform changed.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32, extent: [f32; 2]) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let target = (self.scale * factor).clamp(extent[0], extent[1]);
        if target == self.scale {
            return false;
        }
        let data_point = self.invert(anchor);
        self.scale = target;
        self.translate = anchor - Pos2::new(data_point.x * target, data_point.y * target);
        true
    }

    /// Scale factor for a vertical wheel delta (positive zooms in).
    pub fn wheel_factor(delta_y: f32) -> f32 {
        2f32.powf(delta_y * WHEEL_SENSITIVITY)
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: [f32; 2] = [0.5, 5.0];

    #[test]
    fn scale_is_clamped_for_any_delta() {
        let mut z = ZoomTransform::IDENTITY;
        for factor in [1e6, 3.0, 0.0001, 1e-9, 7.5, 0.9, 1.1, f32::MAX] {
            z.zoom_at(Pos2::new(10.0, 20.0), factor, EXTENT);
            assert!((0.5..=5.0).contains(&z.scale), "scale {} escaped", z.scale);
        }
        z.zoom_at(Pos2::ZERO, 1e9, EXTENT);
        assert_eq!(z.scale, 5.0);
        z.zoom_at(Pos2::ZERO, 1e-9, EXTENT);
        assert_eq!(z.scale, 0.5);
    }

    #[test]
    fn anchor_stays_fixed() {
        let mut z = ZoomTransform::IDENTITY;
        z.pan(Vec2::new(30.0, -10.0));
        let anchor = Pos2::new(200.0, 100.0);
        let under = z.invert(anchor);
        assert!(z.zoom_at(anchor, 2.0, EXTENT));
        let back = z.apply(under);
        assert!((back - anchor).length() < 1e-3);
    }

    #[test]
    fn invalid_factors_are_ignored() {
        let mut z = ZoomTransform::IDENTITY;
        assert!(!z.zoom_at(Pos2::ZERO, f32::NAN, EXTENT));
        assert!(!z.zoom_at(Pos2::ZERO, -2.0, EXTENT));
        assert_eq!(z, ZoomTransform::IDENTITY);
    }

    #[test]
    fn wheel_direction() {
        assert!(ZoomTransform::wheel_factor(120.0) > 1.0);
        assert!(ZoomTransform::wheel_factor(-120.0) < 1.0);
        assert_eq!(ZoomTransform::wheel_factor(0.0), 1.0);
    }

    #[test]
    fn reset_restores_identity() {
        let mut z = ZoomTransform::IDENTITY;
        z.pan(Vec2::new(5.0, 5.0));
        z.zoom_at(Pos2::ZERO, 3.0, EXTENT);
        z.reset();
        assert_eq!(z.apply(Pos2::new(4.0, 2.0)), Pos2::new(4.0, 2.0));
    }
}
