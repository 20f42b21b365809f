use std::path::{Path, PathBuf};

use crate::chart::{self, ChartSet};
use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::controls::{ControlOptions, ControlState};
use crate::data::aggregate::{mean_revenue_by_group, RevenueGroup};
use crate::data::filter::{analyzable_indices, refine_indices};
use crate::data::loader::{load_file, LoadError};
use crate::data::model::{self, ListingTable};

// ---------------------------------------------------------------------------
// Pipeline output
// ---------------------------------------------------------------------------

/// Everything derived from one set of control values.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFrame {
    /// Indices of the listings passing the current controls.
    pub view: Vec<usize>,
    pub aggregate: Vec<RevenueGroup>,
    pub charts: ChartSet,
}

/// Run refinement, aggregation and chart binding for `controls`.
pub fn run_pipeline(table: &ListingTable, base: &[usize], controls: &ControlState) -> DashboardFrame {
    let view = refine_indices(table, base, controls);
    let aggregate = mean_revenue_by_group(table, &view);
    let charts = chart::bind(table, &view, &aggregate);
    DashboardFrame {
        view,
        aggregate,
        charts,
    }
}

// ---------------------------------------------------------------------------
// Session: one loaded dataset and its controls
// ---------------------------------------------------------------------------

/// A loaded table together with the controls and charts built on it.
pub struct Session {
    source: PathBuf,
    table: ListingTable,
    base: Vec<usize>,
    options: ControlOptions,
    controls: ControlState,
    frame: DashboardFrame,
    room_type_colors: ColorMap,
    neighbourhood_colors: ColorMap,
}

impl Session {
    /// Start a session: base-filter once, derive the controls, run the
    /// pipeline with their defaults.
    pub fn new(source: PathBuf, table: ListingTable, config: &DashboardConfig) -> Self {
        let base = analyzable_indices(&table);
        if base.is_empty() {
            log::warn!("No analyzable listings in {}", source.display());
        }

        let options = ControlOptions::from_base(&table, &base, config);
        let controls = ControlState::defaults(&options, config);
        let frame = run_pipeline(&table, &base, &controls);

        Session {
            room_type_colors: ColorMap::new(&options.room_types),
            neighbourhood_colors: ColorMap::new(&options.neighbourhoods),
            source,
            table,
            base,
            options,
            controls,
            frame,
        }
    }

    /// Replace the control values and, if they changed, rebuild the frame.
    ///
    /// Returns whether a recomputation happened.
    pub fn set_controls(&mut self, controls: ControlState) -> bool {
        if controls == self.controls {
            return false;
        }
        self.controls = controls;
        self.frame = run_pipeline(&self.table, &self.base, &self.controls);
        log::debug!(
            "Recomputed view: {} listings, {} revenue groups",
            self.frame.view.len(),
            self.frame.aggregate.len()
        );
        true
    }

    /// Restore the default control values.
    pub fn reset_controls(&mut self, config: &DashboardConfig) -> bool {
        self.set_controls(ControlState::defaults(&self.options, config))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn table(&self) -> &ListingTable {
        &self.table
    }

    /// Indices of the analyzable listings.
    pub fn base(&self) -> &[usize] {
        &self.base
    }

    pub fn options(&self) -> &ControlOptions {
        &self.options
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn frame(&self) -> &DashboardFrame {
        &self.frame
    }

    /// Colours for the categories of a colour-channel field.
    pub fn colors_for(&self, field: &str) -> &ColorMap {
        if field == model::NEIGHBOURHOOD {
            &self.neighbourhood_colors
        } else {
            &self.room_type_colors
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Active session (None until a file loads successfully).
    pub session: Option<Session>,

    /// Last file a load was attempted from.
    pub source: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            session: None,
            source: None,
            status_message: None,
        }
    }

    /// Load `path` into a fresh session.
    ///
    /// On failure the previous session is dropped and the error is kept for
    /// display; no charts are shown until a load succeeds.
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        self.source = Some(path.to_path_buf());
        match load_file(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} listings ({} columns) from {}",
                    table.len(),
                    table.columns.len(),
                    path.display()
                );
                let session = Session::new(path.to_path_buf(), table, &self.config);
                log::info!(
                    "{} analyzable, {} in default view",
                    session.base().len(),
                    session.frame().view.len()
                );
                self.session = Some(session);
                self.status_message = None;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.session = None;
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Load the configured data file.
    pub fn load_default(&mut self) -> Result<(), LoadError> {
        let path = self.config.data_path.clone();
        self.load(&path)
    }

    /// Re-read the last attempted file.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        match self.source.clone() {
            Some(path) => self.load(&path),
            None => self.load_default(),
        }
    }

    /// Apply new control values to the active session.
    pub fn set_controls(&mut self, controls: ControlState) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.set_controls(controls))
    }

    pub fn reset_controls(&mut self) -> bool {
        let config = &self.config;
        self.session
            .as_mut()
            .is_some_and(|session| session.reset_controls(config))
    }
}
