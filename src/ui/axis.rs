use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Stroke, Vec2};

use crate::view::scale::{LinearScale, tick_step};

const TICK_SIZE: f32 = 6.0;
const TICK_COUNT: usize = 10;
const LABEL_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 16.0;

/// Axes of the parallel view, drawn through the view's zoom transform.
pub struct AxisPainter<'a, F: Fn(Pos2) -> Pos2> {
    pub painter: &'a Painter,
    /// Maps plot-local coordinates to screen coordinates.
    pub to_screen: F,
    pub color: Color32,
    /// Multiplier for tick length and font size (zoomed axes grow).
    pub scale: f32,
}

impl<F: Fn(Pos2) -> Pos2> AxisPainter<'_, F> {
    fn stroke(&self) -> Stroke {
        Stroke::new(1.0, self.color)
    }

    fn font(&self, size: f32) -> FontId {
        FontId::proportional(size * self.scale)
    }

    /// Vertical axis at local `x`, ticks pointing left.
    pub fn left(&self, scale: &LinearScale, x: f32) {
        let (r0, r1) = scale.range;
        let to = &self.to_screen;
        self.painter
            .line_segment([to(Pos2::new(x, r0)), to(Pos2::new(x, r1))], self.stroke());

        let step = tick_step(scale.domain.0, scale.domain.1, TICK_COUNT);
        for value in scale.ticks(TICK_COUNT) {
            let Some(y) = scale.map(value) else { continue };
            let right = to(Pos2::new(x, y));
            let left = right - Vec2::new(TICK_SIZE * self.scale, 0.0);
            self.painter.line_segment([left, right], self.stroke());
            self.painter.text(
                left - Vec2::new(2.0 * self.scale, 0.0),
                Align2::RIGHT_CENTER,
                format_tick(value, step),
                self.font(LABEL_SIZE),
                self.color,
            );
        }
    }

    /// Centered title at a local position.
    pub fn title(&self, local: Pos2, text: &str) {
        self.painter.text(
            (self.to_screen)(local),
            Align2::CENTER_CENTER,
            text,
            self.font(TITLE_SIZE),
            self.color,
        );
    }
}

/// Tick label with just enough decimals for the tick spacing.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10()).ceil() as usize
    };
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_labels_follow_step_precision() {
        assert_eq!(format_tick(200.0, 20.0), "200");
        assert_eq!(format_tick(0.6000000000000001, 0.2), "0.6");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(-10.0, 5.0), "-10");
    }
}
