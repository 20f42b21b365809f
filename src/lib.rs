//! Listing Lens: an interactive revenue dashboard over an Inside Airbnb
//! `listings.csv` export.
//!
//! The pipeline runs loader → base filter → controls → refinement filter →
//! aggregation → chart binding; the `ui` modules render the result with egui.

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod controls;
pub mod data;
pub mod state;
pub mod ui;
