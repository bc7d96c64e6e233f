use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;
use crate::ui::table::{result_table, MAX_TABLE_HEIGHT, ROW_HEIGHT};

// ---------------------------------------------------------------------------
// Search & comparative analysis page
// ---------------------------------------------------------------------------

pub fn analysis_page(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        ui.label("Open a CSV file first  (File → Open CSV…)");
        return;
    };
    let names = dataset.column_names();
    let numeric: Vec<String> = dataset
        .numeric_columns()
        .into_iter()
        .map(String::from)
        .collect();

    egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        // ---- Search ----
        ui.heading("Search Data");
        ui.horizontal(|ui: &mut Ui| {
            combo(ui, "search_column", "Column", &mut state.search.column, &names);
            ui.label("contains");
            ui.text_edit_singleline(&mut state.search.pattern);
            if ui.button("Search").clicked() {
                state.run_search();
            }
        });
        if let Some(res) = &state.search.result {
            ui.label(format!("{} matching row(s)", res.len()));
            result_table(ui, "search_table", res);
        }
        ui.separator();

        // ---- Compare ----
        ui.heading("Comparative Analysis");
        ui.horizontal(|ui: &mut Ui| {
            combo(ui, "compare_target", "Compare", &mut state.compare.target, &numeric);
            combo(ui, "compare_group", "Group by", &mut state.compare.group_by, &names);
            if ui.button("Compare").clicked() {
                state.run_compare();
            }
        });
        if let Some(res) = &state.compare.result {
            result_table(ui, "compare_table", res);
        }
        ui.separator();

        // ---- Predict ----
        ui.heading("Predictive Insights");
        combo(ui, "predict_target", "Target", &mut state.predict.target, &numeric);
        ui.label("Features:");
        let target = state.predict.target.clone();
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for name in names.iter().filter(|n| **n != target) {
                let mut on = state.predict.features.contains(name);
                if ui.checkbox(&mut on, name.as_str()).changed() {
                    if on {
                        state.predict.features.insert(name.clone());
                    } else {
                        state.predict.features.remove(name);
                    }
                }
            }
        });
        if ui.button("Predict").clicked() {
            state.run_predict();
        }

        if let Some(res) = &state.predict.result {
            ui.label(format!("Mean Squared Error: {:.4}", res.mse));
            ui.label(format!(
                "Fitted on {} row(s), intercept {:.4}",
                res.train_rows, res.intercept
            ));
            egui::CollapsingHeader::new("Coefficients")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for (name, coef) in res.feature_names.iter().zip(&res.coefficients) {
                        ui.label(format!("{name}: {coef:.4}"));
                    }
                });

            ui.push_id("prediction_table", |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .max_scroll_height(MAX_TABLE_HEIGHT)
                    .columns(Column::auto().at_least(80.0), 3)
                    .header(ROW_HEIGHT, |mut header| {
                        for title in ["row", "actual", "predicted"] {
                            header.col(|ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(ROW_HEIGHT, res.predictions.len(), |mut row| {
                            let i = row.index();
                            row.col(|ui| {
                                ui.label(res.held_out_rows[i].to_string());
                            });
                            row.col(|ui| {
                                ui.label(format!("{:.2}", res.actual[i]));
                            });
                            row.col(|ui| {
                                ui.label(format!("{:.2}", res.predictions[i]));
                            });
                        });
                    });
            });
        }
    });
}

fn combo(ui: &mut Ui, id: &str, label: &str, current: &mut String, options: &[String]) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for name in options {
                ui.selectable_value(current, name.clone(), name.as_str());
            }
        });
}
