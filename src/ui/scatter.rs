use eframe::egui::{Color32, Pos2, Rect, Stroke, Ui, UiBuilder};
use egui_plot::{Plot, PlotBounds, PlotPoint, PlotPoints, PlotTransform, Points, Polygon};

use crate::state::AppState;
use crate::view::layout::PlotFrame;
use crate::view::scale::ScatterScales;

use super::canvas::{dispatch, pointer_events};

// ---------------------------------------------------------------------------
// Scatter plot with brush
// ---------------------------------------------------------------------------

/// Show the scatter plot inside `rect` (screen space) and route its pointer
/// input to the brush.
///
/// The brush lives in scatter-local pixels. Pointer positions reach it via
/// plot transform → data value → [`ScatterScales`] → local pixel, and the
/// brush is drawn back through the inverse path.
pub fn show(ui: &mut Ui, state: &mut AppState, rect: Rect) {
    let (Some(scales), Some(layout)) = (&state.scales, state.layout) else {
        return;
    };
    let scales = scales.scatter.clone();
    let frame = layout.scatter;
    let shown: &AppState = state;

    let plot_response = ui
        .allocate_new_ui(UiBuilder::new().max_rect(rect), |ui: &mut Ui| {
            Plot::new("scatter_plot")
                .width(rect.width())
                .height(rect.height())
                .x_axis_label(scales.x_stat.label())
                .y_axis_label(scales.y_stat.label())
                .show_grid(false)
                .show_x(false)
                .show_y(false)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .allow_double_click_reset(false)
                .show(ui, |plot_ui| {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [scales.x.domain.0, scales.y.domain.0],
                        [scales.x.domain.1, scales.y.domain.1],
                    ));
                    let (base, inside) = point_series(shown, &scales);
                    let radius = shown.config.scatter.point_radius;
                    plot_ui.points(Points::new(base).radius(radius).color(shown.colors.point_fill(false)));
                    plot_ui.points(
                        Points::new(inside)
                            .radius(radius)
                            .color(shown.colors.point_fill(true)),
                    );
                    if let Some(brush) = brush_polygon(shown, &scales) {
                        plot_ui.polygon(brush);
                    }
                })
        })
        .inner;

    let transform = plot_response.transform;
    let response = plot_response.response;

    let events = pointer_events(ui.ctx(), &response, |p| {
        screen_to_surface(&transform, &scales, &frame, p)
    });
    dispatch(ui.ctx(), state, events);

    if let Some(text) = response.hover_pos().and_then(|p| hovered_label(state, &scales, &transform, p)) {
        response.on_hover_text_at_pointer(text);
    }
}

/// Record positions in data space, split by brush membership.
fn point_series(state: &AppState, scales: &ScatterScales) -> (PlotPoints<'static>, PlotPoints<'static>) {
    let mut base = Vec::new();
    let mut inside = Vec::new();
    if let Some(dataset) = &state.dataset {
        for (i, record) in dataset.records().iter().enumerate() {
            let point = [record.get(scales.x_stat), record.get(scales.y_stat)];
            if !point.iter().all(|v| v.is_finite()) {
                continue;
            }
            if state.highlighted.get(i).copied().unwrap_or(false) {
                inside.push(point);
            } else {
                base.push(point);
            }
        }
    }
    (PlotPoints::new(base), PlotPoints::new(inside))
}

fn brush_polygon(state: &AppState, scales: &ScatterScales) -> Option<Polygon<'static>> {
    let brush = state.view.brush.as_ref()?;
    let rect = brush.to_rect();
    let (x0, x1) = (scales.x.invert(rect.min.x), scales.x.invert(rect.max.x));
    // local y grows downward
    let (y0, y1) = (scales.y.invert(rect.max.y), scales.y.invert(rect.min.y));
    let corners = vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]];
    Some(
        Polygon::new(PlotPoints::new(corners))
            .fill_color(Color32::from_rgba_unmultiplied(119, 119, 119, 77))
            .stroke(Stroke::new(1.0, state.colors.brush_outline)),
    )
}

/// Screen position → scatter-local pixel → surface coordinates.
fn screen_to_surface(
    transform: &PlotTransform,
    scales: &ScatterScales,
    frame: &PlotFrame,
    screen: Pos2,
) -> Option<Pos2> {
    let value = transform.value_from_position(screen);
    let local = Pos2::new(scales.x.map(value.x)?, scales.y.map(value.y)?);
    Some(frame.to_surface(local))
}

/// Tooltip for the record drawn closest to `hover`, within one point radius.
fn hovered_label(
    state: &AppState,
    scales: &ScatterScales,
    transform: &PlotTransform,
    hover: Pos2,
) -> Option<String> {
    let dataset = state.dataset.as_ref()?;
    let mut best = state.config.scatter.point_radius;
    let mut label = None;
    for record in dataset.records() {
        let (x, y) = (record.get(scales.x_stat), record.get(scales.y_stat));
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let distance = transform.position_from_point(&PlotPoint::new(x, y)).distance(hover);
        if distance <= best {
            best = distance;
            label = Some(format!(
                "{}: {}={x}, {}={y}",
                record.name(),
                scales.x_stat.label(),
                scales.y_stat.label(),
            ));
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, Vec2b};

    use super::*;
    use crate::config::ViewConfig;
    use crate::data::model::{Dataset, raw};
    use crate::view::brush::brush_partition;
    use crate::view::layout::Layout;
    use crate::view::scale::Scales;

    fn plot_setup() -> (Dataset, ScatterScales, PlotFrame, PlotTransform) {
        let config = ViewConfig::default();
        let layout = Layout::compute(&config, Vec2::new(1400.0, 1000.0));
        let ds = Dataset::from_records(vec![
            raw("A", [50.0, 60.0, 70.0, 40.0, 40.0, 40.0, 300.0]),
            raw("B", [50.0, 120.0, 20.0, 40.0, 40.0, 40.0, 310.0]),
        ])
        .unwrap();
        let scales = Scales::build(&ds, &config, &layout).scatter;
        // the plot widget draws into its own frame, offset and sized differently
        let screen = Rect::from_min_size(Pos2::new(137.0, 92.0), Vec2::new(251.0, 233.0));
        let bounds = PlotBounds::from_min_max(
            [scales.x.domain.0, scales.y.domain.0],
            [scales.x.domain.1, scales.y.domain.1],
        );
        let transform = PlotTransform::new(screen, bounds, Vec2b::new(false, false));
        (ds, scales, layout.scatter, transform)
    }

    #[test]
    fn pointer_on_a_drawn_point_lands_on_its_scatter_position() {
        let (ds, scales, frame, transform) = plot_setup();
        for record in ds.records() {
            let drawn = transform.position_from_point(&PlotPoint::new(
                record.get(scales.x_stat),
                record.get(scales.y_stat),
            ));
            let surface = screen_to_surface(&transform, &scales, &frame, drawn).unwrap();
            let local = frame.to_local(surface);
            let expected = scales.position(record).unwrap();
            assert!(local.distance(expected) < 1e-2, "{local:?} vs {expected:?}");
        }
    }

    #[test]
    fn brush_dragged_over_the_plot_selects_the_points_under_it() {
        let (ds, scales, frame, transform) = plot_setup();
        let first = &ds.records()[0];
        let drawn = transform.position_from_point(&PlotPoint::new(
            first.get(scales.x_stat),
            first.get(scales.y_stat),
        ));
        let a = frame.to_local(screen_to_surface(&transform, &scales, &frame, drawn - Vec2::splat(3.0)).unwrap());
        let b = frame.to_local(screen_to_surface(&transform, &scales, &frame, drawn + Vec2::splat(3.0)).unwrap());
        let brush = crate::view::brush::BrushRect::from_corners(a, b, frame.inner().size());

        let inside = brush_partition(&ds, &scales, Some(&brush));
        assert_eq!(inside, vec![true, false]);

        let rect = brush.to_rect();
        let x = first.get(scales.x_stat);
        assert!(scales.x.invert(rect.min.x) <= x && x <= scales.x.invert(rect.max.x));
    }
}
