use std::collections::BTreeSet;
use std::fmt;

use crate::config::DashboardConfig;
use crate::data::model::ListingTable;

// ---------------------------------------------------------------------------
// Control values
// ---------------------------------------------------------------------------

/// Label of the catch-all entry in categorical selectors.
pub const ALL: &str = "All";

/// Current value of a categorical selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Whether `value` passes this selector.
    pub fn admits(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(selected) => selected == value,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => write!(f, "{ALL}"),
            Choice::Only(value) => write!(f, "{value}"),
        }
    }
}

/// A closed interval `[low, high]` with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSelection {
    pub low: f64,
    pub high: f64,
}

impl RangeSelection {
    /// Build a range, swapping the ends if given out of order.
    pub fn new(a: f64, b: f64) -> Self {
        RangeSelection {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// Inclusive membership test.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Pull both ends inside `bounds`, the way a slider pins its handles.
    pub fn clamp_to(&self, bounds: RangeSelection) -> Self {
        RangeSelection {
            low: self.low.clamp(bounds.low, bounds.high),
            high: self.high.clamp(bounds.low, bounds.high),
        }
    }
}

/// Every value the sidebar currently holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub neighbourhood: Choice,
    pub room_type: Choice,
    pub review_score: RangeSelection,
    pub revenue: RangeSelection,
}

impl ControlState {
    /// Initial control values for a freshly loaded session.
    pub fn defaults(options: &ControlOptions, config: &DashboardConfig) -> Self {
        ControlState {
            neighbourhood: Choice::All,
            room_type: Choice::All,
            review_score: config.review_score_default.clamp_to(options.review_score_bounds),
            revenue: config.revenue_default.clamp_to(options.revenue_bounds),
        }
    }
}

// ---------------------------------------------------------------------------
// Control domains
// ---------------------------------------------------------------------------

/// Selectable values and slider bounds, derived once from the base set.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlOptions {
    /// Distinct neighbourhoods, sorted. "All" is not included.
    pub neighbourhoods: Vec<String>,
    /// Distinct room types, sorted. "All" is not included.
    pub room_types: Vec<String>,
    pub review_score_bounds: RangeSelection,
    /// `[floor(min revenue), floor(max revenue)]`, or `[0, 0]` when empty.
    pub revenue_bounds: RangeSelection,
}

impl ControlOptions {
    /// Derive option lists and bounds from the base-filtered rows.
    pub fn from_base(table: &ListingTable, base: &[usize], config: &DashboardConfig) -> Self {
        let mut neighbourhoods = BTreeSet::new();
        let mut room_types = BTreeSet::new();
        let mut min_revenue = f64::INFINITY;
        let mut max_revenue = f64::NEG_INFINITY;

        for row in table.analyzable_rows(base) {
            neighbourhoods.insert(row.listing.neighbourhood.clone());
            room_types.insert(row.listing.room_type.clone());
            min_revenue = min_revenue.min(row.revenue);
            max_revenue = max_revenue.max(row.revenue);
        }

        let revenue_bounds = if min_revenue.is_finite() && max_revenue.is_finite() {
            RangeSelection::new(min_revenue.floor(), max_revenue.floor())
        } else {
            RangeSelection::new(0.0, 0.0)
        };

        ControlOptions {
            neighbourhoods: neighbourhoods.into_iter().collect(),
            room_types: room_types.into_iter().collect(),
            review_score_bounds: config.review_score_bounds,
            revenue_bounds,
        }
    }

    /// Selector entries for neighbourhoods, "All" first.
    pub fn neighbourhood_choices(&self) -> Vec<Choice> {
        with_all(&self.neighbourhoods)
    }

    /// Selector entries for room types, "All" first.
    pub fn room_type_choices(&self) -> Vec<Choice> {
        with_all(&self.room_types)
    }
}

fn with_all(values: &[String]) -> Vec<Choice> {
    std::iter::once(Choice::All)
        .chain(values.iter().cloned().map(Choice::Only))
        .collect()
}
