use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::controls::{Choice, RangeSelection};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the sidebar controls and apply any change to the session.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };

    // Edit a copy; the session only sees the result once all widgets ran.
    let options = session.options();
    let mut controls = session.controls().clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            choice_selector(
                ui,
                "Select Neighbourhood",
                &options.neighbourhood_choices(),
                &mut controls.neighbourhood,
            );
            ui.add_space(8.0);

            choice_selector(
                ui,
                "Select Room Type",
                &options.room_type_choices(),
                &mut controls.room_type,
            );
            ui.separator();

            range_sliders(
                ui,
                "Select Review Score Range",
                &mut controls.review_score,
                options.review_score_bounds,
                0.01,
            );
            ui.add_space(8.0);

            range_sliders(
                ui,
                "Select Revenue Range",
                &mut controls.revenue,
                options.revenue_bounds,
                1.0,
            );
        });

    state.set_controls(controls);
}

fn choice_selector(ui: &mut Ui, label: &str, choices: &[Choice], current: &mut Choice) {
    ui.strong(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in choices {
                ui.selectable_value(current, choice.clone(), choice.to_string());
            }
        });
}

/// Two handles over `bounds`.  Each handle's slider stops at the other, so
/// the selection can never invert.
fn range_sliders(ui: &mut Ui, label: &str, range: &mut RangeSelection, bounds: RangeSelection, step: f64) {
    ui.strong(label);

    let mut low = range.low;
    let mut high = range.high;
    ui.add(
        egui::Slider::new(&mut low, bounds.low..=high)
            .text("min")
            .step_by(step),
    );
    ui.add(
        egui::Slider::new(&mut high, low..=bounds.high)
            .text("max")
            .step_by(step),
    );

    *range = RangeSelection::new(low, high).clamp_to(bounds);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                // Failures are logged and shown via `status_message`.
                let _ = state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{}: {} listings loaded, {} analyzable, {} shown",
                session.source().display(),
                session.table().len(),
                session.base().len(),
                session.frame().view.len()
            ));
            ui.separator();
        }

        if ui
            .add_enabled(state.session.is_some(), egui::Button::new("Reset filters"))
            .clicked()
        {
            state.reset_controls();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let _ = state.load(&path);
    }
}
