use eframe::egui::{Color32, Context, CursorIcon, Painter, Pos2, Rect, Response, ScrollArea, Sense, Ui, Vec2};

use crate::state::AppState;
use crate::view::interaction::{InputEvent, Interaction};
use crate::view::layout::{PlotFrame, Region};

use super::{histogram, parallel, scatter};

// ---------------------------------------------------------------------------
// Drawing surface
// ---------------------------------------------------------------------------

/// The painter plus the screen position of the surface origin.
pub struct Canvas<'a> {
    pub painter: &'a Painter,
    pub origin: Pos2,
    pub text_color: Color32,
}

impl Canvas<'_> {
    /// Screen position of a frame-local point.
    pub fn screen(&self, frame: &PlotFrame, local: Pos2) -> Pos2 {
        self.origin + frame.to_surface(local).to_vec2()
    }

    pub fn screen_rect(&self, surface: Rect) -> Rect {
        surface.translate(self.origin.to_vec2())
    }
}

/// Render the central drawing surface and route pointer input into the
/// interaction machine. The scatter and histogram are `egui_plot` widgets
/// placed over their frames; the parallel group is painted directly.
pub fn surface(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading() {
                ui.spinner();
            } else {
                ui.heading("Open a dataset to view it  (File → Open…)");
            }
        });
        return;
    }

    let available = ui.available_size();
    ScrollArea::both()
        .auto_shrink([false, false])
        .drag_to_scroll(false)
        .show(ui, |ui: &mut Ui| {
            let layout = state.update_layout(available);
            let (response, painter) = ui.allocate_painter(layout.surface, Sense::click_and_drag());
            let origin = response.rect.min;

            // presses on the scatter frame belong to the scatter plot widget
            let scatter_outer = layout.scatter.outer();
            let mut events = pointer_events(ui.ctx(), &response, |p| Some((p - origin).to_pos2()));
            events.retain(|e| !matches!(e, InputEvent::PointerDown { pos } if scatter_outer.contains(*pos)));
            events.extend(zoom_events(ui, &response, origin, state));
            dispatch(ui.ctx(), state, events);

            let canvas = Canvas {
                painter: &painter,
                origin,
                text_color: ui.visuals().text_color(),
            };
            parallel::paint(&canvas, state);

            let scatter_rect = canvas.screen_rect(layout.scatter.outer());
            let histogram_rect = canvas.screen_rect(layout.histogram.outer());
            scatter::show(ui, state, scatter_rect);
            histogram::show(ui, state, histogram_rect);

            let cursor = match state.interaction.state() {
                Interaction::Panning { .. } => Some(CursorIcon::Grabbing),
                Interaction::Brushing(_) => Some(CursorIcon::Crosshair),
                Interaction::Idle | Interaction::SliderAdjusting => None,
            };
            if let Some(icon) = cursor {
                ui.ctx().set_cursor_icon(icon);
            }
        });
}

/// Feed events to the state; any visual change asks for another frame so
/// widgets drawn before the change catch up.
pub fn dispatch(ctx: &Context, state: &mut AppState, events: Vec<InputEvent>) {
    let mut changed = false;
    for event in events {
        let redraw = state.handle(event);
        changed |= redraw.scatter || redraw.parallel || redraw.transform;
    }
    if changed {
        ctx.request_repaint();
    }
}

/// Translate one widget's press/drag/release state into interaction events.
/// `to_surface` maps a screen position to surface-local coordinates;
/// positions it rejects produce no event.
pub fn pointer_events(
    ctx: &Context,
    response: &Response,
    to_surface: impl Fn(Pos2) -> Option<Pos2>,
) -> Vec<InputEvent> {
    let mut events = Vec::new();

    if response.drag_started() {
        if let Some(pos) = ctx.input(|i| i.pointer.press_origin()).and_then(&to_surface) {
            events.push(InputEvent::PointerDown { pos });
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos().and_then(&to_surface) {
            events.push(InputEvent::PointerMove { pos });
        }
    }
    if response.drag_stopped() {
        events.push(InputEvent::PointerUp);
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos().and_then(&to_surface) {
            events.push(InputEvent::PointerDown { pos });
            events.push(InputEvent::PointerUp);
        }
    }
    if response.double_clicked() {
        if let Some(pos) = response.interact_pointer_pos().and_then(&to_surface) {
            events.push(InputEvent::DoubleClick { pos });
        }
    }

    events
}

/// Wheel and pinch input over the parallel view.
fn zoom_events(ui: &Ui, response: &Response, origin: Pos2, state: &AppState) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let Some(p) = response.hover_pos() else {
        return events;
    };
    let pos = (p - origin).to_pos2();
    let over_parallel = state
        .layout
        .is_some_and(|layout| layout.region_at(pos) == Region::Parallel);
    if !over_parallel {
        return events;
    }

    let (scroll, zoom) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
    if scroll != 0.0 {
        events.push(InputEvent::Scroll { pos, delta_y: scroll });
        // the wheel zooms here instead of scrolling the surface
        ui.ctx().input_mut(|i| i.smooth_scroll_delta = Vec2::ZERO);
    }
    if zoom != 1.0 {
        events.push(InputEvent::Zoom { pos, factor: zoom });
    }
    events
}
