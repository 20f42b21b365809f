use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotBounds, PlotPoint, PlotPoints, Points};

use crate::chart::{ChartSpec, Datum, Mark, ScaleKind, XValue};
use crate::color::ColorMap;
use crate::state::AppState;

const BAR_WIDTH: f64 = 0.7;

// ---------------------------------------------------------------------------
// Central panel: the three charts
// ---------------------------------------------------------------------------

/// Render the session's charts top to bottom, or the load error / welcome
/// text when there is no session.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) => ui.heading(RichText::new(msg).color(Color32::RED)),
            None => ui.heading("Open a listings file to begin  (File → Open…)"),
        });
        return;
    };

    let height = state.config.chart_height;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for spec in session.frame().charts.in_order() {
                ui.heading(spec.title.as_str());
                let colors = session.colors_for(spec.color.field);
                match spec.mark {
                    Mark::Bar => bar_chart(ui, spec, colors, height),
                    Mark::Circle { opacity, size } => {
                        scatter_chart(ui, spec, colors, height, opacity, size)
                    }
                }
                ui.add_space(16.0);
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// Stacked bars: one [`BarChart`] per colour category, each bar sitting on
/// top of those already drawn at its x position.
fn bar_chart(ui: &mut Ui, spec: &ChartSpec, colors: &ColorMap, height: f32) {
    let categories = spec.x_categories();
    let position: BTreeMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();
    let mut stacked = vec![0.0; categories.len()];

    let mut charts = Vec::new();
    for color in spec.color_categories() {
        let mut bars = Vec::new();
        for datum in spec.data.iter().filter(|d| d.color == color) {
            let XValue::Category(category) = &datum.x else {
                continue;
            };
            let Some(&slot) = position.get(category.as_str()) else {
                continue;
            };
            bars.push(
                Bar::new(slot as f64, datum.y)
                    .base_offset(stacked[slot])
                    .width(BAR_WIDTH)
                    .name(tooltip_text(datum)),
            );
            stacked[slot] += datum.y;
        }

        charts.push(
            BarChart::new(bars)
                .name(&color)
                .color(colors.color_for(&color))
                .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| bar.name.clone())),
        );
    }

    Plot::new(spec.title.as_str())
        .height(height)
        .legend(Legend::default())
        .x_axis_label(spec.x.title.clone())
        .y_axis_label(spec.y.title.clone())
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&categories, mark.value)
        })
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Label for a grid mark on a nominal axis: the category at an integer
/// position, nothing in between.
fn category_label(categories: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

/// A bound point in plot coordinates, with its series and hover text.
struct HoverPoint {
    series: String,
    position: [f64; 2],
    text: String,
}

fn scatter_chart(
    ui: &mut Ui,
    spec: &ChartSpec,
    colors: &ColorMap,
    height: f32,
    opacity: f32,
    size: f32,
) {
    let log_y = spec.y.scale == ScaleKind::Log;

    let hover: Vec<HoverPoint> = spec
        .data
        .iter()
        .filter_map(|datum| {
            let XValue::Quantity(x) = datum.x else {
                return None;
            };
            let y = plot_y(datum.y, log_y)?;
            Some(HoverPoint {
                series: datum.color.clone(),
                position: [x, y],
                text: tooltip_text(datum),
            })
        })
        .collect();

    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for point in &hover {
        series
            .entry(point.series.clone())
            .or_default()
            .push(point.position);
    }

    // Mark size is an area; egui_plot wants a radius.
    let radius = (size / std::f32::consts::PI).sqrt();

    let mut plot = Plot::new(spec.title.as_str())
        .height(height)
        .legend(Legend::default())
        .x_axis_label(spec.x.title.clone())
        .y_axis_label(spec.y.title.clone())
        .allow_scroll(false)
        .label_formatter(move |name: &str, value: &PlotPoint| {
            nearest_tooltip(&hover, name, [value.x, value.y]).unwrap_or_else(|| {
                let y = if log_y { 10f64.powf(value.y) } else { value.y };
                format!("x = {:.2}\ny = {:.0}", value.x, y)
            })
        });
    let pinned = spec
        .x
        .domain
        .map(|domain| pinned_bounds(domain, series.values().flatten().map(|p| p[1])));
    if log_y {
        plot = plot.y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            log_tick_label(mark.value)
        });
    }

    plot.show(ui, |plot_ui| {
        if let Some((min, max)) = pinned {
            plot_ui.set_auto_bounds([false, true]);
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
        }
        for (name, points) in series {
            let color = colors.color_for(&name).gamma_multiply(opacity);
            let points: PlotPoints = points.into_iter().collect();
            plot_ui.points(
                Points::new(points)
                    .name(&name)
                    .color(color)
                    .radius(radius)
                    .filled(true),
            );
        }
    });
}

/// Plot bounds with x fixed to `domain` and y spanning `ys` plus a margin.
///
/// Returns `(min, max)` corners.  Without points y falls back to `[0, 1]`.
fn pinned_bounds(domain: [f64; 2], ys: impl Iterator<Item = f64>) -> ([f64; 2], [f64; 2]) {
    let (low, high) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
        (lo.min(y), hi.max(y))
    });
    let (low, high) = if low.is_finite() && high.is_finite() {
        let margin = ((high - low) * 0.05).max(0.1);
        (low - margin, high + margin)
    } else {
        (0.0, 1.0)
    };
    ([domain[0], low], [domain[1], high])
}

/// Map a data value onto the plot's y axis.  Log axes get `log10`, and
/// values a log axis cannot show are dropped.
fn plot_y(value: f64, log: bool) -> Option<f64> {
    if !log {
        return Some(value);
    }
    (value > 0.0).then(|| value.log10())
}

/// Axis text for a `log10` grid mark, shown in data units.
fn log_tick_label(exponent: f64) -> String {
    let value = 10f64.powf(exponent);
    if value >= 1.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Hover text of the point in series `name` closest to `cursor`.
///
/// Distances are measured after scaling both axes to the spread of the
/// points, so neither axis dominates.
fn nearest_tooltip(points: &[HoverPoint], name: &str, cursor: [f64; 2]) -> Option<String> {
    if name.is_empty() {
        return None;
    }

    let span = |axis: usize| {
        let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.position[axis]), hi.max(p.position[axis]))
        });
        (max - min).max(1e-9)
    };
    let (sx, sy) = (span(0), span(1));

    points
        .iter()
        .filter(|p| p.series == name)
        .map(|p| {
            let dx = (p.position[0] - cursor[0]) / sx;
            let dy = (p.position[1] - cursor[1]) / sy;
            (dx * dx + dy * dy, p)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, p)| p.text.clone())
}

fn tooltip_text(datum: &Datum) -> String {
    datum
        .tooltip
        .iter()
        .map(|(field, value)| format!("{field}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
