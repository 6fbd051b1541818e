use eframe::egui::{Rect, Ui, UiBuilder};
use egui_plot::{Bar, BarChart, Plot, PlotBounds};

use crate::state::AppState;
use crate::view::histogram::Bin;

/// Show the histogram inside `rect` (screen space). Hovering a bar shows its
/// range and count.
pub fn show(ui: &mut Ui, state: &AppState, rect: Rect) {
    let Some(scales) = &state.scales else {
        return;
    };
    let scales = &scales.histogram;
    let stat = state.config.histogram.stat;

    let bars: Vec<Bar> = scales
        .bins
        .iter()
        .map(|bin| {
            Bar::new((bin.x0 + bin.x1) / 2.0, bin.count as f64)
                .width(bin.x1 - bin.x0)
                .name(bin_label(bin))
                .fill(state.colors.bar)
        })
        .collect();
    let chart = BarChart::new(bars)
        .color(state.colors.bar)
        .element_formatter(Box::new(|bar: &Bar, _: &BarChart| bar.name.clone()));

    ui.allocate_new_ui(UiBuilder::new().max_rect(rect), |ui: &mut Ui| {
        Plot::new("histogram_plot")
            .width(rect.width())
            .height(rect.height())
            .x_axis_label(format!("{} Stats", stat.label()))
            .y_axis_label("Number of creatures")
            .show_grid(false)
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
                plot_ui.bar_chart(chart);
            });
    });
}

fn bin_label(bin: &Bin) -> String {
    format!("{} creatures between {} and {}", bin.count, bin.x0, bin.x1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_label_names_range_and_count() {
        let bin = Bin { x0: 300.0, x1: 320.0, count: 7 };
        assert_eq!(bin_label(&bin), "7 creatures between 300 and 320");
    }
}
