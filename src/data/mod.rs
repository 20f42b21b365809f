/// Data layer: listing types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  listings.csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ListingTable (price "$1,250.00" → 1250.0)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  analyzable rows → base indices
///   └──────────┘   + control selections → view indices
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  view → mean revenue per (neighbourhood, room type)
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
