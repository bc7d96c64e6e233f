use std::collections::BTreeMap;

use eframe::egui::{self, Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points, Polygon};

use trend_analyzer::data::stats::totals_by;
use trend_analyzer::{CellValue, ColumnKind, Dataset};

use crate::state::{AppState, ChartKind};

// ---------------------------------------------------------------------------
// Dashboard chart (central panel)
// ---------------------------------------------------------------------------

/// Chart type and axis pickers above the plot.
pub fn chart_controls(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    let names = dataset.column_names();
    let numeric: Vec<&str> = dataset.numeric_columns();

    ui.horizontal(|ui: &mut Ui| {
        egui::ComboBox::from_id_salt("chart_kind")
            .selected_text(state.chart.label())
            .show_ui(ui, |ui: &mut Ui| {
                for kind in ChartKind::ALL {
                    ui.selectable_value(&mut state.chart, kind, kind.label());
                }
            });

        column_picker(ui, "x_axis", "X", &mut state.x_column, names.iter().map(String::as_str));
        column_picker(ui, "y_axis", "Y", &mut state.y_column, numeric.iter().copied());
    });
}

fn column_picker<'a>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &mut Option<String>,
    options: impl Iterator<Item = &'a str>,
) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.clone().unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for name in options {
                if ui
                    .selectable_label(current.as_deref() == Some(name), name)
                    .clicked()
                {
                    *current = Some(name.to_string());
                }
            }
        });
}

/// Render the chart of the visible rows, one series per colour value.
pub fn dashboard_plot(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a CSV file to view data  (File → Open CSV…)");
            });
            return;
        }
    };

    let (Some(x_name), Some(y_name)) = (state.x_column.as_deref(), state.y_column.as_deref())
    else {
        ui.label("Pick a numeric Y column to chart.");
        return;
    };
    let height = (ui.available_height() * 0.6).max(200.0);
    if state.chart == ChartKind::Pie {
        category_pie(ui, state, dataset, y_name, height);
        return;
    }

    let (Some(x_col), Some(y_col)) = (dataset.column(x_name), dataset.column(y_name)) else {
        return;
    };

    let color_values = state
        .color_map
        .as_ref()
        .and_then(|cm| dataset.column(&cm.column))
        .map(|c| &c.values);

    // Group visible points by colour value.
    let mut series: BTreeMap<CellValue, Vec<[f64; 2]>> = BTreeMap::new();
    for &idx in &state.visible_indices {
        let Some(x) = axis_value(dataset, x_name, x_col.kind, &x_col.values[idx]) else {
            continue;
        };
        let Some(y) = y_col.values[idx].as_f64() else {
            continue;
        };
        let key = color_values.map_or(CellValue::Null, |v| v[idx].clone());
        series.entry(key).or_default().push([x, y]);
    }

    let bar_width = if x_col.kind == ColumnKind::Date { 0.8 } else { 0.5 };

    Plot::new("dashboard_plot")
        .height(height)
        .legend(egui_plot::Legend::default())
        .x_axis_label(x_name)
        .y_axis_label(y_name)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (key, mut points) in series {
                let color = state
                    .color_map
                    .as_ref()
                    .map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(&key));
                let name = if key.is_null() {
                    y_name.to_string()
                } else {
                    key.to_string()
                };

                match state.chart {
                    ChartKind::Line => {
                        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
                        let line = Line::new(PlotPoints::from(points))
                            .name(&name)
                            .color(color)
                            .width(1.5);
                        plot_ui.line(line);
                    }
                    ChartKind::Bar => {
                        let bars = points
                            .into_iter()
                            .map(|[x, y]| Bar::new(x, y).width(bar_width))
                            .collect();
                        plot_ui.bar_chart(BarChart::new(bars).name(&name).color(color));
                    }
                    ChartKind::Scatter => {
                        let pts = Points::new(PlotPoints::from(points))
                            .name(&name)
                            .color(color)
                            .radius(3.0);
                        plot_ui.points(pts);
                    }
                    ChartKind::Pie => {}
                }
            }
        });
}

/// Share of the Y column's total per value of the colour-by column.
fn category_pie(ui: &mut Ui, state: &AppState, dataset: &Dataset, value: &str, height: f32) {
    let Some(category) = state.color_column.as_deref() else {
        ui.label("Pick a categorical column under \"Color by\" to split the pie.");
        return;
    };
    let totals = match totals_by(dataset, &state.visible_indices, category, value) {
        Ok(t) => t,
        Err(e) => {
            ui.label(e.to_string());
            return;
        }
    };
    let sum: f64 = totals.iter().map(|(_, v)| v.max(0.0)).sum();
    if sum <= 0.0 {
        ui.label("Nothing to show for the current filters.");
        return;
    }

    Plot::new("category_pie")
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .legend(egui_plot::Legend::default())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for (key, total) in &totals {
                let share = total.max(0.0) / sum;
                if share == 0.0 {
                    continue;
                }
                let color = state
                    .color_map
                    .as_ref()
                    .map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(key));
                let name = format!("{key} ({:.1}%)", share * 100.0);
                for wedge in wedges(start, share) {
                    let polygon = Polygon::new(PlotPoints::from(wedge))
                        .name(&name)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE));
                    plot_ui.polygon(polygon);
                }
                start += share;
            }
        });
}

/// Outlines of a unit-circle slice starting at `start` (fraction of a turn,
/// clockwise from 12 o'clock) and spanning `share` of the circle. Polygons
/// are filled as convex shapes, so the slice comes back in quarter-turn
/// pieces at most.
fn wedges(start: f64, share: f64) -> Vec<Vec<[f64; 2]>> {
    let pieces = (share / 0.25).ceil().max(1.0) as usize;
    let step = share / pieces as f64;
    (0..pieces)
        .map(|p| {
            let from = start + step * p as f64;
            let segments = ((step * 96.0).ceil() as usize).max(2);
            let mut outline = Vec::with_capacity(segments + 2);
            outline.push([0.0, 0.0]);
            for i in 0..=segments {
                let angle = std::f64::consts::TAU * (from + step * i as f64 / segments as f64);
                outline.push([angle.sin(), angle.cos()]);
            }
            outline
        })
        .collect()
}

/// Position of a cell on the x axis: numbers as-is, dates as days since
/// 1970-01-01, text as its rank among the column's distinct values.
fn axis_value(dataset: &Dataset, column: &str, kind: ColumnKind, value: &CellValue) -> Option<f64> {
    match (kind, value) {
        (_, CellValue::Null) => None,
        (ColumnKind::Integer | ColumnKind::Float, v) => v.as_f64(),
        (ColumnKind::Date, CellValue::Date(d)) => days_since_epoch(d).map(|d| d as f64),
        _ => dataset
            .unique_values(column)?
            .iter()
            .filter(|v| !v.is_null())
            .position(|v| v == value)
            .map(|i| i as f64),
    }
}

/// Days from 1970-01-01 for an ISO `YYYY-MM-DD` date (proleptic Gregorian).
pub(crate) fn days_since_epoch(date: &str) -> Option<i64> {
    let y: i64 = date.get(0..4)?.parse().ok()?;
    let m: i64 = date.get(5..7)?.parse().ok()?;
    let d: i64 = date.get(8..10)?.parse().ok()?;

    let y = if m <= 2 { y - 1 } else { y };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    Some(era * 146_097 + doe - 719_468)
}
