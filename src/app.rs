use eframe::egui;

use crate::state::AppState;
use crate::ui::{canvas, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CreatureVizApp {
    pub state: AppState,
}

impl CreatureVizApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CreatureVizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Pending dataset load ----
        self.state.poll_load();
        if self.state.loading() {
            ctx.request_repaint();
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: threshold slider ----
        egui::TopBottomPanel::bottom("threshold_bar").show(ctx, |ui| {
            panels::threshold_bar(ui, &mut self.state);
        });

        // ---- Central panel: linked views ----
        egui::CentralPanel::default().show(ctx, |ui| {
            canvas::surface(ui, &mut self.state);
        });
    }
}
