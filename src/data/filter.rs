use crate::controls::ControlState;

use super::model::{Analyzable, ListingTable};

// ---------------------------------------------------------------------------
// Base filter: rows the dashboard can analyse at all
// ---------------------------------------------------------------------------

/// Return indices of listings with a price, a review score and a strictly
/// positive revenue, in table order.
pub fn analyzable_indices(table: &ListingTable) -> Vec<usize> {
    table
        .listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| listing.analyzable().is_some())
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Refinement filter: the user's current selections
// ---------------------------------------------------------------------------

/// Whether an analyzable row passes every control in `controls`.
///
/// Both ranges are inclusive at each end.  A categorical selector set to
/// "All" places no constraint.
pub fn passes(row: &Analyzable<'_>, controls: &ControlState) -> bool {
    controls.review_score.contains(row.review_score)
        && controls.revenue.contains(row.revenue)
        && controls.neighbourhood.admits(&row.listing.neighbourhood)
        && controls.room_type.admits(&row.listing.room_type)
}

/// Narrow the base-filtered `base` indices to the rows passing `controls`.
///
/// The result is always a subsequence of `base`.
pub fn refine_indices(table: &ListingTable, base: &[usize], controls: &ControlState) -> Vec<usize> {
    base.iter()
        .copied()
        .filter(|&i| {
            table
                .listings
                .get(i)
                .and_then(|listing| listing.analyzable())
                .is_some_and(|row| passes(&row, controls))
        })
        .collect()
}
