use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use trend_analyzer::data::filter::DateRange;
use trend_analyzer::ColumnKind;

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let categorical: Vec<String> = dataset
        .columns()
        .iter()
        .filter(|c| c.kind == ColumnKind::Text)
        .map(|c| c.name.clone())
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Colour-by selector ----
            ui.strong("Color by");
            let current_color_col = state.color_column.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(current_color_col.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &categorical {
                        if ui
                            .selectable_label(current_color_col == *col, col.as_str())
                            .clicked()
                        {
                            state.set_color_column(col.clone());
                        }
                    }
                });
            ui.separator();

            date_range_widgets(ui, state);

            // ---- Per-column filter widgets (collapsible) ----
            for col in &categorical {
                let Some(all_values) = dataset.unique_values(col) else {
                    continue;
                };

                let n_selected = state.filters.get(col).map_or(0, |s| s.len());
                let n_total = all_values.len();
                let header_text = format!("{col}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(col);
                            }
                        });

                        for val in all_values {
                            let mut checked = state
                                .filters
                                .get(col)
                                .is_some_and(|s| s.contains(val));

                            // Show colour swatch if this is the colour column
                            let mut text = RichText::new(val.to_string());
                            if state.color_column.as_deref() == Some(col.as_str()) {
                                if let Some(cm) = &state.color_map {
                                    text = text.color(cm.color_for(val));
                                }
                            }

                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(col, val);
                            }
                        }
                    });
            }
        });
}

fn date_range_widgets(ui: &mut Ui, state: &mut AppState) {
    let Some(column) = state.date_range.column.clone() else {
        return;
    };
    ui.strong(format!("Date range ({column})"));
    if let Some((first, last)) = state
        .dataset
        .as_deref()
        .and_then(|ds| DateRange::bounds(ds, &column))
    {
        ui.weak(format!("{first} … {last}"));
    }

    let mut changed = false;
    let [from_input, to_input] = &mut state.date_inputs;
    for (label, input, bound) in [
        ("From", from_input, &mut state.date_range.start),
        ("To", to_input, &mut state.date_range.end),
    ] {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(label);
            if ui
                .add(egui::TextEdit::singleline(input).hint_text("YYYY-MM-DD"))
                .lost_focus()
            {
                changed |= commit_date_input(input, bound);
            }
        });
    }
    if changed {
        state.refilter();
    }
    ui.separator();
}

/// Store typed text as a date bound; blank clears it. Returns whether the
/// bound changed.
fn commit_date_input(input: &str, bound: &mut Option<String>) -> bool {
    let trimmed = input.trim();
    let next = (!trimmed.is_empty()).then(|| trimmed.to_string());
    if *bound == next {
        return false;
    }
    *bound = next;
    true
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for page in Page::ALL {
            let enabled = state.user.is_some() || !page.requires_login();
            if ui
                .add_enabled(enabled, egui::SelectableLabel::new(state.page == page, page.label()))
                .clicked()
            {
                state.page = page;
            }
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(user) = state.user.clone() {
            ui.separator();
            ui.label(format!("Hello {user}!"));
            if ui.small_button("Log out").clicked() {
                state.logout();
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open market or salary data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_path(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
