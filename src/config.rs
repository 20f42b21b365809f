use std::path::PathBuf;

use crate::controls::RangeSelection;

/// Session-wide settings, built once in `main` and handed to each stage.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Listings file read at startup, relative to the working directory.
    pub data_path: PathBuf,
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub sidebar_width: f32,
    /// Height of each chart in the central panel.
    pub chart_height: f32,
    pub review_score_bounds: RangeSelection,
    pub review_score_default: RangeSelection,
    /// Initial revenue window, pinned to the data's bounds by the slider.
    pub revenue_default: RangeSelection,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("listings.csv"),
            window_title: "Listing Lens – Inside Airbnb Dashboard".to_string(),
            window_size: [1280.0, 900.0],
            min_window_size: [720.0, 480.0],
            sidebar_width: 240.0,
            chart_height: 320.0,
            review_score_bounds: RangeSelection::new(0.0, 5.0),
            review_score_default: RangeSelection::new(3.5, 5.0),
            revenue_default: RangeSelection::new(1000.0, 100_000.0),
        }
    }
}
