use eframe::egui::Pos2;

use super::brush::BrushRect;
use super::layout::{Layout, Region};
use super::selection::ViewState;
use super::zoom::ZoomTransform;

/// Input delivered by the host, positions in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Pos2 },
    PointerMove { pos: Pos2 },
    PointerUp,
    Scroll { pos: Pos2, delta_y: f32 },
    /// Pinch or ctrl+wheel zoom with an explicit factor.
    Zoom { pos: Pos2, factor: f32 },
    DoubleClick { pos: Pos2 },
    SliderChanged(i64),
    SliderReleased,
    ResetZoom,
}

/// What a brush gesture is doing, in scatter-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushGesture {
    Drawing { anchor: Pos2 },
    Moving { last: Pos2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Brushing(BrushGesture),
    Panning { last: Pos2 },
    SliderAdjusting,
}

/// Which views need a visual update after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Redraw {
    /// Brush changed: recolour scatter points.
    pub scatter: bool,
    /// Threshold changed: reconcile parallel polylines.
    pub parallel: bool,
    /// Pan/zoom changed: repaint only.
    pub transform: bool,
}

impl Redraw {
    pub const NONE: Redraw = Redraw {
        scatter: false,
        parallel: false,
        transform: false,
    };
}

/// Routes input events to the one interaction that owns them.
#[derive(Debug, Clone)]
pub struct InteractionMachine {
    state: Interaction,
    zoom_extent: [f32; 2],
}

impl InteractionMachine {
    pub fn new(zoom_extent: [f32; 2]) -> Self {
        Self {
            state: Interaction::Idle,
            zoom_extent,
        }
    }

    pub fn state(&self) -> Interaction {
        self.state
    }

    pub fn handle(&mut self, event: InputEvent, layout: &Layout, view: &mut ViewState) -> Redraw {
        match event {
            InputEvent::PointerDown { pos } => self.pointer_down(pos, layout, view),
            InputEvent::PointerMove { pos } => self.pointer_move(pos, layout, view),
            InputEvent::PointerUp => self.pointer_up(view),
            InputEvent::Scroll { pos, delta_y } => {
                if delta_y == 0.0 {
                    return Redraw::NONE;
                }
                self.zoom(pos, ZoomTransform::wheel_factor(delta_y), layout, view)
            }
            InputEvent::Zoom { pos, factor } => self.zoom(pos, factor, layout, view),
            InputEvent::DoubleClick { pos } => self.zoom(pos, 2.0, layout, view),
            InputEvent::SliderChanged(value) => {
                self.state = Interaction::SliderAdjusting;
                Redraw {
                    parallel: view.set_threshold(value),
                    ..Redraw::NONE
                }
            }
            InputEvent::SliderReleased => {
                if self.state == Interaction::SliderAdjusting {
                    self.state = Interaction::Idle;
                }
                Redraw::NONE
            }
            InputEvent::ResetZoom => {
                let changed = view.zoom != ZoomTransform::IDENTITY;
                view.zoom.reset();
                Redraw {
                    transform: changed,
                    ..Redraw::NONE
                }
            }
        }
    }

    fn pointer_down(&mut self, pos: Pos2, layout: &Layout, view: &mut ViewState) -> Redraw {
        // a press anywhere ends whatever was active
        let mut redraw = self.pointer_up(view);

        match layout.region_at(pos) {
            Region::Scatter => {
                let local = layout.scatter.to_local(pos);
                let grabbed = view
                    .brush
                    .is_some_and(|b| !b.is_empty() && b.contains(local));
                if grabbed {
                    self.state = Interaction::Brushing(BrushGesture::Moving { last: local });
                } else {
                    self.state = Interaction::Brushing(BrushGesture::Drawing { anchor: local });
                    if view.brush.take().is_some() {
                        redraw.scatter = true;
                    }
                }
            }
            Region::Parallel => {
                self.state = Interaction::Panning { last: pos };
            }
            Region::Histogram | Region::Outside => {}
        }
        redraw
    }

    fn pointer_move(&mut self, pos: Pos2, layout: &Layout, view: &mut ViewState) -> Redraw {
        let extent = layout.scatter.inner().size();
        match self.state {
            Interaction::Brushing(BrushGesture::Drawing { anchor }) => {
                let local = layout.scatter.to_local(pos);
                view.brush = Some(BrushRect::from_corners(anchor, local, extent));
                Redraw {
                    scatter: true,
                    ..Redraw::NONE
                }
            }
            Interaction::Brushing(BrushGesture::Moving { last }) => {
                let local = layout.scatter.to_local(pos);
                if let Some(brush) = view.brush.as_mut() {
                    *brush = brush.translated_within(local - last, extent);
                }
                self.state = Interaction::Brushing(BrushGesture::Moving { last: local });
                Redraw {
                    scatter: true,
                    ..Redraw::NONE
                }
            }
            Interaction::Panning { last } => {
                view.zoom.pan(pos - last);
                self.state = Interaction::Panning { last: pos };
                Redraw {
                    transform: true,
                    ..Redraw::NONE
                }
            }
            Interaction::Idle | Interaction::SliderAdjusting => Redraw::NONE,
        }
    }

    fn pointer_up(&mut self, view: &mut ViewState) -> Redraw {
        let previous = std::mem::take(&mut self.state);
        match previous {
            Interaction::Brushing(BrushGesture::Drawing { .. }) => {
                // a click without a drag clears the selection
                let cleared = view.brush.is_some_and(|b| b.is_empty());
                if cleared {
                    view.brush = None;
                }
                Redraw {
                    scatter: cleared,
                    ..Redraw::NONE
                }
            }
            Interaction::Brushing(BrushGesture::Moving { .. }) => Redraw {
                scatter: true,
                ..Redraw::NONE
            },
            Interaction::Panning { .. } | Interaction::Idle | Interaction::SliderAdjusting => {
                Redraw::NONE
            }
        }
    }

    fn zoom(&mut self, pos: Pos2, factor: f32, layout: &Layout, view: &mut ViewState) -> Redraw {
        let allowed = matches!(self.state, Interaction::Idle | Interaction::Panning { .. });
        if !allowed || layout.region_at(pos) != Region::Parallel {
            return Redraw::NONE;
        }
        let anchor = layout.parallel.to_local(pos);
        Redraw {
            transform: view.zoom.zoom_at(anchor, factor, self.zoom_extent),
            ..Redraw::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewConfig;
    use crate::data::model::dataset_with_totals;
    use eframe::egui::Vec2;

    fn setup() -> (InteractionMachine, Layout, ViewState) {
        let config = ViewConfig::default();
        let layout = Layout::compute(&config, Vec2::new(1400.0, 1000.0));
        let ds = dataset_with_totals(&[("A", 300.0), ("B", 500.0), ("C", 700.0)]);
        (
            InteractionMachine::new(config.zoom_extent),
            layout,
            ViewState::for_dataset(&ds),
        )
    }

    #[test]
    fn drag_in_scatter_draws_brush() {
        let (mut m, layout, mut view) = setup();
        // scatter inner origin is (110, 60)
        m.handle(InputEvent::PointerDown { pos: Pos2::new(120.0, 70.0) }, &layout, &mut view);
        assert!(matches!(m.state(), Interaction::Brushing(BrushGesture::Drawing { .. })));
        let r = m.handle(InputEvent::PointerMove { pos: Pos2::new(170.0, 40.0) }, &layout, &mut view);
        assert!(r.scatter);
        let brush = view.brush.unwrap();
        assert_eq!(brush.min, Pos2::new(10.0, 0.0));
        assert_eq!(brush.max, Pos2::new(60.0, 10.0));
        m.handle(InputEvent::PointerUp, &layout, &mut view);
        assert_eq!(m.state(), Interaction::Idle);
        assert!(view.brush.is_some());
    }

    #[test]
    fn click_without_drag_clears_brush() {
        let (mut m, layout, mut view) = setup();
        m.handle(InputEvent::PointerDown { pos: Pos2::new(120.0, 70.0) }, &layout, &mut view);
        m.handle(InputEvent::PointerMove { pos: Pos2::new(200.0, 200.0) }, &layout, &mut view);
        m.handle(InputEvent::PointerUp, &layout, &mut view);

        let r = m.handle(InputEvent::PointerDown { pos: Pos2::new(400.0, 300.0) }, &layout, &mut view);
        assert!(r.scatter);
        m.handle(InputEvent::PointerUp, &layout, &mut view);
        assert_eq!(view.brush, None);
    }

    #[test]
    fn dragging_inside_brush_moves_it() {
        let (mut m, layout, mut view) = setup();
        m.handle(InputEvent::PointerDown { pos: Pos2::new(120.0, 70.0) }, &layout, &mut view);
        m.handle(InputEvent::PointerMove { pos: Pos2::new(170.0, 120.0) }, &layout, &mut view);
        m.handle(InputEvent::PointerUp, &layout, &mut view);

        m.handle(InputEvent::PointerDown { pos: Pos2::new(150.0, 100.0) }, &layout, &mut view);
        assert!(matches!(m.state(), Interaction::Brushing(BrushGesture::Moving { .. })));
        m.handle(InputEvent::PointerMove { pos: Pos2::new(160.0, 105.0) }, &layout, &mut view);
        let brush = view.brush.unwrap();
        assert_eq!(brush.min, Pos2::new(20.0, 15.0));
        assert_eq!(brush.max, Pos2::new(70.0, 65.0));
    }

    #[test]
    fn drag_in_parallel_pans() {
        let (mut m, layout, mut view) = setup();
        m.handle(InputEvent::PointerDown { pos: Pos2::new(300.0, 600.0) }, &layout, &mut view);
        assert!(matches!(m.state(), Interaction::Panning { .. }));
        let r = m.handle(InputEvent::PointerMove { pos: Pos2::new(320.0, 590.0) }, &layout, &mut view);
        assert!(r.transform && !r.scatter && !r.parallel);
        assert_eq!(view.zoom.translate, Vec2::new(20.0, -10.0));
        m.handle(InputEvent::PointerUp, &layout, &mut view);
        assert_eq!(m.state(), Interaction::Idle);
    }

    #[test]
    fn wheel_zoom_only_over_parallel_and_clamped() {
        let (mut m, layout, mut view) = setup();
        let over_scatter = m.handle(
            InputEvent::Scroll { pos: Pos2::new(200.0, 100.0), delta_y: 100.0 },
            &layout,
            &mut view,
        );
        assert_eq!(over_scatter, Redraw::NONE);
        for _ in 0..50 {
            m.handle(InputEvent::Scroll { pos: Pos2::new(300.0, 600.0), delta_y: 500.0 }, &layout, &mut view);
        }
        assert_eq!(view.zoom.scale, 5.0);
        for _ in 0..50 {
            m.handle(InputEvent::Zoom { pos: Pos2::new(300.0, 600.0), factor: 0.1 }, &layout, &mut view);
        }
        assert_eq!(view.zoom.scale, 0.5);
        let r = m.handle(InputEvent::ResetZoom, &layout, &mut view);
        assert!(r.transform);
        assert_eq!(view.zoom, ZoomTransform::IDENTITY);
    }

    #[test]
    fn slider_owns_threshold_until_released() {
        let (mut m, layout, mut view) = setup();
        let r = m.handle(InputEvent::SliderChanged(450), &layout, &mut view);
        assert!(r.parallel);
        assert_eq!(m.state(), Interaction::SliderAdjusting);
        // no zooming while the slider is held
        m.handle(InputEvent::Scroll { pos: Pos2::new(300.0, 600.0), delta_y: 500.0 }, &layout, &mut view);
        assert_eq!(view.zoom.scale, 1.0);
        let same = m.handle(InputEvent::SliderChanged(450), &layout, &mut view);
        assert!(!same.parallel);
        m.handle(InputEvent::SliderReleased, &layout, &mut view);
        assert_eq!(m.state(), Interaction::Idle);
        assert_eq!(view.threshold(), 450);
    }
}
