use eframe::egui::{Pos2, Shape};

use crate::state::AppState;

use super::axis::AxisPainter;
use super::canvas::Canvas;

/// Paint the zoomable parallel-coordinates group: the reconciled polylines
/// and one axis per stat, all under the same transform.
pub fn paint(canvas: &Canvas<'_>, state: &AppState) {
    let (Some(scales), Some(layout)) = (&state.scales, &state.layout) else {
        return;
    };
    let frame = &layout.parallel;
    let scales = &scales.parallel;
    let zoom = state.view.zoom;
    let clip = canvas.screen_rect(frame.outer());
    let painter = canvas.painter.with_clip_rect(clip);
    let to_screen = |p: Pos2| canvas.screen(frame, zoom.apply(p));

    let mut shapes = Vec::with_capacity(state.lines.len());
    for (_, mark) in state.lines.iter() {
        let points: Vec<Pos2> = mark.value.points.iter().map(|&p| to_screen(p)).collect();
        let mut stroke = mark.value.stroke;
        stroke.width *= zoom.scale;
        shapes.push(Shape::line(points, stroke));
    }
    painter.extend(shapes);

    let axes = AxisPainter {
        painter: &painter,
        to_screen,
        color: canvas.text_color,
        scale: zoom.scale,
    };
    for (i, (stat, y)) in scales.stats.iter().zip(&scales.y).enumerate() {
        let x = scales.x.position(i);
        axes.left(y, x);
        axes.title(Pos2::new(x, -10.0), stat.label());
    }
}
