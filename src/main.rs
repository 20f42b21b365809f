use eframe::egui;
use listing_lens::app::ListingLensApp;
use listing_lens::config::DashboardConfig;
use listing_lens::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };
    let title = config.window_title.clone();

    let mut state = AppState::new(config);
    if state.load_default().is_err() {
        log::warn!("Starting without data; use File → Open… to pick a listings file");
    }

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(ListingLensApp::new(state)))),
    )
}
