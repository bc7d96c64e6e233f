mod app;
mod color;
mod state;
mod ui;

use app::TrendAnalyzerApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = trend_analyzer::config::config_path();
    let config = trend_analyzer::config::load_or_default(&config_path)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Market Trends Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(TrendAnalyzerApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))
}
