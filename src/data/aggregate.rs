use std::collections::BTreeMap;

use serde::Serialize;

use super::model::ListingTable;

/// Mean revenue of one (neighbourhood, room type) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueGroup {
    pub neighbourhood: String,
    pub room_type: String,
    pub mean_revenue: f64,
    /// Number of listings averaged.
    pub count: usize,
}

/// Group the rows at `view` by (neighbourhood, room type) and average their
/// revenue.
///
/// Only pairs that occur in the view produce a group.  Groups come out in
/// key order; callers that present them apply their own ordering.
pub fn mean_revenue_by_group(table: &ListingTable, view: &[usize]) -> Vec<RevenueGroup> {
    let mut sums: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();

    for row in table.analyzable_rows(view) {
        let key = (
            row.listing.neighbourhood.as_str(),
            row.listing.room_type.as_str(),
        );
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += row.revenue;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|((neighbourhood, room_type), (sum, count))| RevenueGroup {
            neighbourhood: neighbourhood.to_string(),
            room_type: room_type.to_string(),
            mean_revenue: sum / count as f64,
            count,
        })
        .collect()
}
