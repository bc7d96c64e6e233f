use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use trend_analyzer::{Dataset, QueryResult};

use crate::state::AppState;

pub const ROW_HEIGHT: f32 = 18.0;
pub const MAX_TABLE_HEIGHT: f32 = 240.0;

/// Render a query result as a scrollable table.
pub fn result_table(ui: &mut Ui, id: &str, result: &QueryResult) {
    if result.is_empty() {
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .columns(Column::auto().at_least(60.0), result.columns.len())
            .header(ROW_HEIGHT, |mut header| {
                for name in &result.columns {
                    header.col(|ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, result.rows.len(), |mut row| {
                    let cells = &result.rows[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            });
    });
}

/// Render the given dataset rows without copying them out first; only the
/// rows scrolled into view are laid out.
pub fn rows_table(ui: &mut Ui, id: &str, dataset: &Dataset, rows: &[usize]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .columns(Column::auto().at_least(60.0), dataset.columns().len())
            .header(ROW_HEIGHT, |mut header| {
                for column in dataset.columns() {
                    header.col(|ui| {
                        ui.strong(column.name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let r = rows[row.index()];
                    for column in dataset.columns() {
                        row.col(|ui| {
                            ui.label(column.values[r].to_string());
                        });
                    }
                });
            });
    });
}

/// Collapsible listing of the rows passing the dashboard filters.
pub fn filtered_rows(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    egui::CollapsingHeader::new(format!("Data ({} rows)", state.visible_indices.len()))
        .id_salt("filtered_rows")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            rows_table(ui, "filtered_rows_table", dataset, &state.visible_indices);
        });
}
