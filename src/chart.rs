//! Chart specifications.
//!
//! A [`ChartSpec`] says *what* to draw: which column feeds which visual
//! channel, the axis scales, and the bound data points.  Turning a spec into
//! pixels is left to [`crate::ui::plot`]; nothing here touches egui.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::data::aggregate::RevenueGroup;
use crate::data::model::{self, ListingTable};

/// Fixed horizontal domain of the review-score scatter.
pub const REVIEW_SCORE_DOMAIN: [f64; 2] = [3.5, 5.0];

const POINT_OPACITY: f32 = 0.4;
const POINT_SIZE: f32 = 60.0;

// ---------------------------------------------------------------------------
// Encoding vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Mark {
    Bar,
    /// `size` is the marker area in square pixels.
    Circle { opacity: f32, size: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Nominal,
    Quantitative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    Linear,
    Log,
}

/// Ordering directive for a nominal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Categories by their summed y value, largest first.
    DescendingByY,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub field: &'static str,
    pub kind: FieldKind,
    pub title: String,
    pub scale: ScaleKind,
    pub domain: Option<[f64; 2]>,
    pub sort: Option<SortOrder>,
}

impl Axis {
    fn nominal(field: &'static str, title: &str) -> Self {
        Axis {
            field,
            kind: FieldKind::Nominal,
            title: title.to_string(),
            scale: ScaleKind::Linear,
            domain: None,
            sort: None,
        }
    }

    fn quantitative(field: &'static str, title: &str) -> Self {
        Axis {
            field,
            kind: FieldKind::Quantitative,
            ..Axis::nominal(field, title)
        }
    }

    fn log(self) -> Self {
        Axis {
            scale: ScaleKind::Log,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorChannel {
    pub field: &'static str,
    pub title: String,
}

/// Position of a datum on the horizontal axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Category(String),
    Quantity(f64),
}

/// One bound mark: its channel values plus the hover detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datum {
    pub x: XValue,
    pub y: f64,
    pub color: String,
    /// `(field, formatted value)` pairs in display order.
    pub tooltip: Vec<(&'static str, String)>,
}

// ---------------------------------------------------------------------------
// ChartSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub mark: Mark,
    pub x: Axis,
    pub y: Axis,
    pub color: ColorChannel,
    pub data: Vec<Datum>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Distinct x categories in presentation order.
    ///
    /// With [`SortOrder::DescendingByY`] each category is ranked by the sum of
    /// its y values (the height of its stacked bar); ties fall back to name
    /// order.  Without a sort directive categories come out by name.
    pub fn x_categories(&self) -> Vec<String> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for datum in &self.data {
            if let XValue::Category(c) = &datum.x {
                *totals.entry(c.as_str()).or_insert(0.0) += datum.y;
            }
        }

        let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
        if self.x.sort == Some(SortOrder::DescendingByY) {
            // Stable sort keeps name order among equal totals.
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        }
        ranked.into_iter().map(|(c, _)| c.to_string()).collect()
    }

    /// Distinct colour categories, sorted.
    pub fn color_categories(&self) -> Vec<String> {
        self.data
            .iter()
            .map(|d| d.color.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// The three charts of the dashboard, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub revenue_by_group: ChartSpec,
    pub review_vs_revenue: ChartSpec,
    pub accommodates_vs_revenue: ChartSpec,
}

impl ChartSet {
    pub fn in_order(&self) -> [&ChartSpec; 3] {
        [
            &self.revenue_by_group,
            &self.review_vs_revenue,
            &self.accommodates_vs_revenue,
        ]
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Bind the view and its aggregate to the dashboard's three charts.
pub fn bind(table: &ListingTable, view: &[usize], aggregate: &[RevenueGroup]) -> ChartSet {
    ChartSet {
        revenue_by_group: revenue_bar_chart(aggregate),
        review_vs_revenue: review_scatter(table, view),
        accommodates_vs_revenue: accommodates_scatter(table, view),
    }
}

/// Stacked bars of mean revenue per neighbourhood, coloured by room type.
pub fn revenue_bar_chart(aggregate: &[RevenueGroup]) -> ChartSpec {
    let data = aggregate
        .iter()
        .map(|g| Datum {
            x: XValue::Category(g.neighbourhood.clone()),
            y: g.mean_revenue,
            color: g.room_type.clone(),
            tooltip: vec![
                (model::NEIGHBOURHOOD, g.neighbourhood.clone()),
                (model::ROOM_TYPE, g.room_type.clone()),
                (model::REVENUE, money(g.mean_revenue)),
            ],
        })
        .collect();

    ChartSpec {
        title: "Average Revenue by Neighbourhood and Room Type".to_string(),
        mark: Mark::Bar,
        x: Axis {
            sort: Some(SortOrder::DescendingByY),
            ..Axis::nominal(model::NEIGHBOURHOOD, "Neighbourhood")
        },
        y: Axis::quantitative(model::REVENUE, "Avg Revenue"),
        color: ColorChannel {
            field: model::ROOM_TYPE,
            title: "Room Type".to_string(),
        },
        data,
    }
}

/// Review score against revenue, coloured by room type.
pub fn review_scatter(table: &ListingTable, view: &[usize]) -> ChartSpec {
    let data = table
        .analyzable_rows(view)
        .map(|row| Datum {
            x: XValue::Quantity(row.review_score),
            y: row.revenue,
            color: row.listing.room_type.clone(),
            tooltip: vec![
                (model::NAME, row.listing.name.clone()),
                (model::NEIGHBOURHOOD, row.listing.neighbourhood.clone()),
                (model::ROOM_TYPE, row.listing.room_type.clone()),
                (model::REVIEW_SCORE, row.review_score.to_string()),
                (model::REVENUE, money(row.revenue)),
            ],
        })
        .collect();

    ChartSpec {
        title: "Review Score vs Estimated Revenue".to_string(),
        mark: circle(),
        x: Axis {
            domain: Some(REVIEW_SCORE_DOMAIN),
            ..Axis::quantitative(model::REVIEW_SCORE, "Review Score")
        },
        y: Axis::quantitative(model::REVENUE, "Log(Revenue)").log(),
        color: ColorChannel {
            field: model::ROOM_TYPE,
            title: model::ROOM_TYPE.to_string(),
        },
        data,
    }
}

/// Guest capacity against revenue, coloured by neighbourhood.
///
/// Listings without an `accommodates` value have no x position and are left
/// out.
pub fn accommodates_scatter(table: &ListingTable, view: &[usize]) -> ChartSpec {
    let data = table
        .analyzable_rows(view)
        .filter_map(|row| {
            let accommodates = row.listing.accommodates?;
            Some(Datum {
                x: XValue::Quantity(f64::from(accommodates)),
                y: row.revenue,
                color: row.listing.neighbourhood.clone(),
                tooltip: vec![
                    (model::NAME, row.listing.name.clone()),
                    (model::NEIGHBOURHOOD, row.listing.neighbourhood.clone()),
                    (model::ROOM_TYPE, row.listing.room_type.clone()),
                    (model::ACCOMMODATES, accommodates.to_string()),
                    (model::REVENUE, money(row.revenue)),
                ],
            })
        })
        .collect();

    ChartSpec {
        title: "Accommodates vs Estimated Revenue".to_string(),
        mark: circle(),
        x: Axis::quantitative(model::ACCOMMODATES, model::ACCOMMODATES),
        y: Axis::quantitative(model::REVENUE, "Log(Revenue)").log(),
        color: ColorChannel {
            field: model::NEIGHBOURHOOD,
            title: model::NEIGHBOURHOOD.to_string(),
        },
        data,
    }
}

fn circle() -> Mark {
    Mark::Circle {
        opacity: POINT_OPACITY,
        size: POINT_SIZE,
    }
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}
