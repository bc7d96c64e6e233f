use eframe::egui;

use trend_analyzer::AnalyzerConfig;

use crate::state::{AppState, Page};
use crate::ui::{account, analysis, panels, plot, table, trend};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TrendAnalyzerApp {
    pub state: AppState,
}

impl TrendAnalyzerApp {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for TrendAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and page selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        let page = self.state.page;
        if page.requires_login() && self.state.user.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Please log in to continue");
            });
            return;
        }

        // ---- Left side panel: filters (dashboard pages only) ----
        if matches!(page, Page::Dashboard | Page::TrendAnalyzer) {
            egui::SidePanel::left("filter_panel")
                .default_width(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel ----
        egui::CentralPanel::default().show(ctx, |ui| match page {
            Page::Account => account::account_page(ui, &mut self.state),
            Page::Dashboard => {
                plot::chart_controls(ui, &mut self.state);
                ui.separator();
                plot::dashboard_plot(ui, &self.state);
                ui.separator();
                table::filtered_rows(ui, &self.state);
            }
            Page::TrendAnalyzer => trend::trend_page(ui, &mut self.state),
            Page::SearchCompare => analysis::analysis_page(ui, &mut self.state),
        });
    }
}
