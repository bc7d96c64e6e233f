use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use trend_analyzer::data::stats::totals_by;
use trend_analyzer::{CellValue, Dataset};

use crate::color::correlation_color;
use crate::state::AppState;
use crate::ui::plot::days_since_epoch;

/// Market trend report: value over time and correlation matrix of the
/// filtered rows.
pub fn trend_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Market Trend Report");
    ui.label(format!(
        "{} row(s) after region and date filters",
        state.visible_indices.len()
    ));
    ui.separator();

    if let Some(dataset) = state.dataset.clone() {
        trend_line(ui, state, &dataset);
        ui.separator();
    }

    let Some(matrix) = state.correlations.as_ref().filter(|m| !m.is_empty()) else {
        ui.label(RichText::new("No numeric data available for analysis.").color(Color32::RED));
        return;
    };

    ui.strong("Correlation Matrix");
    egui::ScrollArea::both().show(ui, |ui: &mut Ui| {
        egui::Grid::new("correlation_grid")
            .spacing([4.0, 4.0])
            .show(ui, |ui: &mut Ui| {
                ui.label("");
                for name in &matrix.columns {
                    ui.strong(name.as_str());
                }
                ui.end_row();

                for (name, row) in matrix.columns.iter().zip(&matrix.values) {
                    ui.strong(name.as_str());
                    for cell in row {
                        match cell {
                            Some(r) => {
                                let text = RichText::new(format!("{r:.2}"))
                                    .color(Color32::BLACK)
                                    .background_color(correlation_color(*r));
                                ui.label(text);
                            }
                            None => {
                                ui.label("–");
                            }
                        }
                    }
                    ui.end_row();
                }
            });
    });
}

/// Daily total of the chosen numeric column over the dataset's date column.
fn trend_line(ui: &mut Ui, state: &mut AppState, dataset: &Dataset) {
    let Some(date_col) = state.date_range.column.clone() else {
        return;
    };
    let numeric = dataset.numeric_columns();
    if numeric.is_empty() {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Trend of");
        egui::ComboBox::from_id_salt("trend_value")
            .selected_text(state.trend_column.clone().unwrap_or_default())
            .show_ui(ui, |ui: &mut Ui| {
                for name in &numeric {
                    if ui
                        .selectable_label(state.trend_column.as_deref() == Some(*name), *name)
                        .clicked()
                    {
                        state.trend_column = Some(name.to_string());
                    }
                }
            });
        ui.label(format!("over {date_col}"));
    });

    let Some(value) = state.trend_column.as_deref() else {
        return;
    };
    let totals = match totals_by(dataset, &state.visible_indices, &date_col, value) {
        Ok(t) => t,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
    };
    let points: Vec<[f64; 2]> = totals
        .iter()
        .filter_map(|(day, total)| match day {
            CellValue::Date(d) => days_since_epoch(d).map(|x| [x as f64, *total]),
            _ => None,
        })
        .collect();

    Plot::new("trend_line")
        .height(220.0)
        .x_axis_label(date_col.as_str())
        .y_axis_label(value)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::from(points)).name(value).width(1.5));
        });
}
