//! Writes a deterministic synthetic `listings.csv` and `listings.parquet`
//! with the Inside Airbnb columns the dashboard reads.

use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const LISTING_COUNT: usize = 600;

/// (neighbourhood, revenue multiplier)
const NEIGHBOURHOODS: [(&str, f64); 6] = [
    ("Centrum-West", 1.6),
    ("Centrum-Oost", 1.5),
    ("De Pijp - Rivierenbuurt", 1.3),
    ("Westerpark", 1.1),
    ("Oud-Noord", 0.8),
    ("Bijlmer-Centrum", 0.6),
];

/// (room type, base nightly price)
const ROOM_TYPES: [(&str, f64); 4] = [
    ("Entire home/apt", 210.0),
    ("Private room", 95.0),
    ("Hotel room", 160.0),
    ("Shared room", 45.0),
];

/// One CSV row; `None` fields are written as empty cells.
#[derive(Debug, Serialize)]
struct SampleListing {
    id: i64,
    name: String,
    neighbourhood_cleansed: String,
    room_type: String,
    price: Option<String>,
    accommodates: i64,
    review_scores_rating: Option<f64>,
    estimated_revenue_l365d: Option<f64>,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// `1234.5` → `"$1,234.50"`, the way the listings export writes prices.
fn format_price(value: f64) -> String {
    let cents = (value * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}.{:02}", cents % 100)
}

fn generate(rng: &mut SimpleRng) -> Vec<SampleListing> {
    (0..LISTING_COUNT)
        .map(|i| {
            let &(neighbourhood, area_factor) = rng.pick(&NEIGHBOURHOODS);
            let &(room_type, base_price) = rng.pick(&ROOM_TYPES);
            let accommodates = if room_type == "Entire home/apt" {
                2 + (rng.next_u64() % 5) as i64
            } else {
                1 + (rng.next_u64() % 2) as i64
            };

            let price = base_price * area_factor * rng.range(0.7, 1.4)
                + 15.0 * accommodates as f64;
            let nights_booked = rng.range(0.0, 260.0).floor();
            let revenue = (price * nights_booked).round();
            let review = (rng.range(3.0, 5.0) * 100.0).round() / 100.0;

            // Roughly what the real export looks like: some listings have
            // never been reviewed, have no price, or earned nothing.
            SampleListing {
                id: 10_000 + i as i64,
                name: format!("{room_type} in {neighbourhood} #{i}"),
                neighbourhood_cleansed: neighbourhood.to_string(),
                room_type: room_type.to_string(),
                price: (!rng.chance(0.03)).then(|| format_price(price)),
                accommodates,
                review_scores_rating: (!rng.chance(0.08)).then_some(review),
                estimated_revenue_l365d: (!rng.chance(0.05)).then_some(revenue),
            }
        })
        .collect()
}

fn write_csv(path: &str, rows: &[SampleListing]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[SampleListing]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("neighbourhood_cleansed", DataType::Utf8, false),
        Field::new("room_type", DataType::Utf8, false),
        Field::new("price", DataType::Utf8, true),
        Field::new("accommodates", DataType::Int64, false),
        Field::new("review_scores_rating", DataType::Float64, true),
        Field::new("estimated_revenue_l365d", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.name.as_str()))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.neighbourhood_cleansed.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.room_type.as_str()))),
            Arc::new(rows.iter().map(|r| r.price.as_deref()).collect::<StringArray>()),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.accommodates))),
            Arc::new(rows.iter().map(|r| r.review_scores_rating).collect::<Float64Array>()),
            Arc::new(rows.iter().map(|r| r.estimated_revenue_l365d).collect::<Float64Array>()),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv("listings.csv", &rows)?;
    write_parquet("listings.parquet", &rows)?;

    println!("Wrote {} listings to listings.csv and listings.parquet", rows.len());
    Ok(())
}
