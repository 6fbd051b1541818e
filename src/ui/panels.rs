use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;
use crate::view::interaction::InputEvent;
use crate::view::zoom::ZoomTransform;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading() {
            ui.spinner();
            if let Some(path) = &state.source {
                ui.label(format!("Loading {}…", path.display()));
            }
        } else if let Some(ds) = &state.dataset {
            let last = state.last_reconcile;
            ui.label(format!(
                "{} records, {} at or above threshold",
                ds.len(),
                state.visible_indices.len()
            ))
            .on_hover_text(format!(
                "Last slider change: {} lines added, {} kept, {} removed",
                last.entered, last.updated, last.exited
            ));
        }

        ui.separator();

        let zoomed = state.view.zoom != ZoomTransform::IDENTITY;
        if ui
            .add_enabled(zoomed, egui::Button::new("Reset zoom"))
            .clicked()
        {
            state.handle(InputEvent::ResetZoom);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Threshold slider
// ---------------------------------------------------------------------------

/// The minimum-Total range input with its live readout.
pub fn threshold_bar(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        return;
    }
    let (lo, hi) = state.view.threshold_range();
    let mut value = state.view.threshold();

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Minimum Total");
        ui.label(lo.to_string());
        let response = ui.add(
            egui::Slider::new(&mut value, lo..=hi)
                .step_by(1.0)
                .show_value(false),
        );
        ui.label(hi.to_string());
        ui.separator();
        ui.label(RichText::new(format!("≥ {value}")).monospace());

        if response.changed() {
            state.handle(InputEvent::SliderChanged(value));
        }
        // keyboard and click changes end immediately; drags end on release
        if response.drag_stopped() || (response.changed() && !response.dragged()) {
            state.handle(InputEvent::SliderReleased);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open creature table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.start_load(&path);
    }
}
