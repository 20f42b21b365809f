use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Column names of the source table
// ---------------------------------------------------------------------------

pub const NAME: &str = "name";
pub const NEIGHBOURHOOD: &str = "neighbourhood_cleansed";
pub const ROOM_TYPE: &str = "room_type";
pub const PRICE: &str = "price";
pub const ACCOMMODATES: &str = "accommodates";
pub const REVIEW_SCORE: &str = "review_scores_rating";
pub const REVENUE: &str = "estimated_revenue_l365d";

/// Columns every source file must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    NAME,
    NEIGHBOURHOOD,
    ROOM_TYPE,
    PRICE,
    ACCOMMODATES,
    REVIEW_SCORE,
    REVENUE,
];

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single rental listing as loaded from disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub name: String,
    pub neighbourhood: String,
    pub room_type: String,
    /// Nightly price, parsed from the currency string.
    pub price: Option<f64>,
    pub accommodates: Option<u32>,
    /// Review score, nominally 0.0 – 5.0.
    pub review_score: Option<f64>,
    /// Estimated revenue over the trailing 365 days.
    pub revenue: Option<f64>,
    /// Every other source column, kept as raw text.
    pub extra: BTreeMap<String, String>,
}

/// A listing whose price, review score and revenue are all present.
#[derive(Debug, Clone, Copy)]
pub struct Analyzable<'a> {
    pub listing: &'a Listing,
    pub price: f64,
    pub review_score: f64,
    pub revenue: f64,
}

impl Listing {
    /// Project the listing onto the fields the dashboard analyses.
    ///
    /// Returns `None` when price or review score is missing, or when revenue
    /// is missing or not strictly positive.
    pub fn analyzable(&self) -> Option<Analyzable<'_>> {
        let revenue = self.revenue.filter(|r| *r > 0.0)?;
        Some(Analyzable {
            listing: self,
            price: self.price?,
            review_score: self.review_score?,
            revenue,
        })
    }
}

// ---------------------------------------------------------------------------
// ListingTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded table. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ListingTable {
    /// Header of the source, in file order.
    pub columns: Vec<String>,
    pub listings: Vec<Listing>,
}

impl ListingTable {
    pub fn new(columns: Vec<String>, listings: Vec<Listing>) -> Self {
        ListingTable { columns, listings }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Iterate the analyzable projection of the rows at `indices`.
    ///
    /// Rows that are out of range or not analyzable are skipped.
    pub fn analyzable_rows<'a>(
        &'a self,
        indices: &'a [usize],
    ) -> impl Iterator<Item = Analyzable<'a>> + 'a {
        indices
            .iter()
            .filter_map(move |&i| self.listings.get(i)?.analyzable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: Option<f64>, review: Option<f64>, revenue: Option<f64>) -> Listing {
        Listing {
            name: "A".into(),
            neighbourhood: "X".into(),
            room_type: "Entire home/apt".into(),
            price,
            accommodates: Some(2),
            review_score: review,
            revenue,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn analyzable_requires_all_three_fields() {
        assert!(listing(Some(100.0), Some(4.8), Some(5000.0)).analyzable().is_some());
        assert!(listing(None, Some(4.8), Some(5000.0)).analyzable().is_none());
        assert!(listing(Some(100.0), None, Some(5000.0)).analyzable().is_none());
        assert!(listing(Some(100.0), Some(4.8), None).analyzable().is_none());
    }

    #[test]
    fn zero_or_negative_revenue_is_not_analyzable() {
        assert!(listing(Some(100.0), Some(4.8), Some(0.0)).analyzable().is_none());
        assert!(listing(Some(100.0), Some(4.8), Some(-1.0)).analyzable().is_none());
    }

    #[test]
    fn analyzable_rows_skips_out_of_range_indices() {
        let table = ListingTable::new(
            Vec::new(),
            vec![listing(Some(1.0), Some(4.0), Some(10.0))],
        );
        let rows: Vec<_> = table.analyzable_rows(&[0, 7]).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, 10.0);
    }
}
