use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::Array;
use arrow::error::ArrowError;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use thiserror::Error;

use super::model::{self, Listing, ListingTable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything that stops a listings file from becoming a [`ListingTable`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] ParquetError),
    #[error("decoding record batch: {0}")]
    Arrow(#[from] ArrowError),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}, column '{column}': '{value}' is not a valid number")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the Inside Airbnb `listings.csv` export
/// * `.parquet` – the same columns stored as Arrow/Parquet
pub fn load_file(path: &Path) -> Result<ListingTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(open(path)?),
        "parquet" | "pq" => read_parquet(open(path)?),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Parse a currency string such as `"$1,250.00"` into a number.
///
/// Dollar signs and thousands separators are dropped.  An empty cell is
/// `Ok(None)`.
pub fn parse_price(text: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    parse_float(&cleaned)
}

/// Cell texts that mean "no value" in dataframe-style exports.
const NULL_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_null_marker(text: &str) -> bool {
    NULL_MARKERS.contains(&text)
}

fn parse_float(text: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let text = text.trim();
    if is_null_marker(text) {
        return Ok(None);
    }
    text.parse::<f64>().map(|v| v.is_finite().then_some(v))
}

fn parse_count(text: &str) -> Option<Option<u32>> {
    let text = text.trim();
    if is_null_marker(text) {
        return Some(None);
    }
    if let Ok(n) = text.parse::<u32>() {
        return Some(Some(n));
    }
    // Float-typed exports write counts as "2.0".
    match text.parse::<f64>() {
        Ok(v) if v.is_nan() => Some(None),
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Some(Some(v as u32)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Column layout shared by all formats
// ---------------------------------------------------------------------------

/// Positions of the required columns within a header row.
struct ColumnIndex {
    name: usize,
    neighbourhood: usize,
    room_type: usize,
    price: usize,
    accommodates: usize,
    review_score: usize,
    revenue: usize,
    extra: Vec<(usize, String)>,
}

impl ColumnIndex {
    fn locate(headers: &[String]) -> Result<Self, LoadError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::MissingColumn(column.to_string()))
        };

        let index = ColumnIndex {
            name: find(model::NAME)?,
            neighbourhood: find(model::NEIGHBOURHOOD)?,
            room_type: find(model::ROOM_TYPE)?,
            price: find(model::PRICE)?,
            accommodates: find(model::ACCOMMODATES)?,
            review_score: find(model::REVIEW_SCORE)?,
            revenue: find(model::REVENUE)?,
            extra: headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !model::REQUIRED_COLUMNS.contains(&h.as_str()))
                .map(|(i, h)| (i, h.clone()))
                .collect(),
        };
        Ok(index)
    }

    /// Build one listing from the raw text cells of row `row`.
    fn listing(&self, row: usize, cells: &[&str]) -> Result<Listing, LoadError> {
        let cell = |i: usize| cells.get(i).copied().unwrap_or("");
        let invalid = |column: &'static str, i: usize| LoadError::InvalidValue {
            row,
            column,
            value: cell(i).to_string(),
        };

        let price = parse_price(cell(self.price)).map_err(|_| invalid(model::PRICE, self.price))?;
        let accommodates =
            parse_count(cell(self.accommodates)).ok_or_else(|| invalid(model::ACCOMMODATES, self.accommodates))?;
        let review_score = parse_float(cell(self.review_score))
            .map_err(|_| invalid(model::REVIEW_SCORE, self.review_score))?;
        let revenue =
            parse_float(cell(self.revenue)).map_err(|_| invalid(model::REVENUE, self.revenue))?;

        let extra = self
            .extra
            .iter()
            .map(|(i, col)| (col.clone(), cell(*i).to_string()))
            .collect::<BTreeMap<_, _>>();

        Ok(Listing {
            name: cell(self.name).to_string(),
            neighbourhood: cell(self.neighbourhood).to_string(),
            room_type: cell(self.room_type).to_string(),
            price,
            accommodates,
            review_score,
            revenue,
            extra,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a header-first CSV listings export.
pub fn read_csv<R: Read>(source: R) -> Result<ListingTable, LoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let index = ColumnIndex::locate(&headers)?;

    let mut listings = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cells: Vec<&str> = record.iter().collect();
        listings.push(index.listing(row_no, &cells)?);
    }

    Ok(ListingTable::new(headers, listings))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Read listings from a Parquet file.
///
/// Columns may be strings or numbers; every cell is rendered to text and
/// parsed with the same rules as the CSV loader, so a string `price` column
/// (`"$100.00"`) and a float one (`100.0`) both work.
pub fn read_parquet(file: File) -> Result<ListingTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let index = ColumnIndex::locate(&headers)?;
    let reader = builder.build()?;

    let mut listings = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let owned = batch
                .columns()
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        Ok(String::new())
                    } else {
                        array_value_to_string(col.as_ref(), row)
                    }
                })
                .collect::<Result<Vec<String>, ArrowError>>()?;
            let cells: Vec<&str> = owned.iter().map(String::as_str).collect();
            listings.push(index.listing(listings.len(), &cells)?);
        }
    }

    Ok(ListingTable::new(headers, listings))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,name,neighbourhood_cleansed,room_type,price,accommodates,review_scores_rating,estimated_revenue_l365d";

    #[test]
    fn price_strips_currency_symbol_and_separators() {
        assert_eq!(parse_price("$100.00").unwrap(), Some(100.0));
        assert_eq!(parse_price("$1,250.50").unwrap(), Some(1250.5));
        assert_eq!(parse_price("85").unwrap(), Some(85.0));
        assert_eq!(parse_price("").unwrap(), None);
        assert!(parse_price("call us").is_err());
    }

    #[test]
    fn reads_rows_and_keeps_extra_columns() {
        let text = format!(
            "{HEADER}\n17,Cosy flat,Centrum,Entire home/apt,\"$1,100.00\",4,4.85,52000\n18,Room,Noord,Private room,$60.00,1,,\n"
        );
        let table = read_csv(text.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns.len(), 8);

        let first = &table.listings[0];
        assert_eq!(first.name, "Cosy flat");
        assert_eq!(first.neighbourhood, "Centrum");
        assert_eq!(first.price, Some(1100.0));
        assert_eq!(first.accommodates, Some(4));
        assert_eq!(first.review_score, Some(4.85));
        assert_eq!(first.revenue, Some(52000.0));
        assert_eq!(first.extra.get("id").map(String::as_str), Some("17"));

        let second = &table.listings[1];
        assert_eq!(second.review_score, None);
        assert_eq!(second.revenue, None);
    }

    #[test]
    fn missing_value_markers_read_as_null() {
        for marker in ["NA", "N/A", "n/a", "NULL", "null", "None", "NaN", "nan", "<NA>", "#N/A"] {
            let text = format!(
                "{HEADER}\n1,A,X,Private room,$50.00,2,4.5,1200\n2,B,X,Private room,{marker},{marker},{marker},{marker}\n"
            );
            let table = read_csv(text.as_bytes())
                .unwrap_or_else(|e| panic!("marker {marker:?} failed to load: {e}"));

            let row = &table.listings[1];
            assert_eq!(row.price, None, "price for {marker:?}");
            assert_eq!(row.accommodates, None, "accommodates for {marker:?}");
            assert_eq!(row.review_score, None, "review score for {marker:?}");
            assert_eq!(row.revenue, None, "revenue for {marker:?}");
            assert_eq!(crate::data::filter::analyzable_indices(&table), vec![0]);
        }
    }

    #[test]
    fn float_formatted_counts_are_accepted() {
        assert_eq!(parse_count("3.0"), Some(Some(3)));
        assert_eq!(parse_count(""), Some(None));
        assert_eq!(parse_count("2.5"), None);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let text = "name,neighbourhood_cleansed,room_type,price,accommodates,review_scores_rating\nA,X,Private room,$1,1,4.0\n";
        match read_csv(text.as_bytes()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, "estimated_revenue_l365d"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_number_names_row_and_column() {
        let text = format!("{HEADER}\n1,A,X,Private room,$50.00,2,great,100\n");
        match read_csv(text.as_bytes()) {
            Err(LoadError::InvalidValue { row, column, value }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "review_scores_rating");
                assert_eq!(value, "great");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("listings.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("listings.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn parquet_with_numeric_columns_loads() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, false),
            Field::new("neighbourhood_cleansed", DataType::Utf8, false),
            Field::new("room_type", DataType::Utf8, false),
            Field::new("price", DataType::Utf8, true),
            Field::new("accommodates", DataType::Int64, true),
            Field::new("review_scores_rating", DataType::Float64, true),
            Field::new("estimated_revenue_l365d", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(StringArray::from(vec!["X", "Y"])),
                Arc::new(StringArray::from(vec!["Entire home/apt", "Private room"])),
                Arc::new(StringArray::from(vec![Some("$1,000.00"), None])),
                Arc::new(Int64Array::from(vec![Some(2), None])),
                Arc::new(Float64Array::from(vec![Some(4.8), Some(3.9)])),
                Arc::new(Float64Array::from(vec![Some(5000.0), None])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.parquet");
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.listings[0].price, Some(1000.0));
        assert_eq!(table.listings[0].accommodates, Some(2));
        assert_eq!(table.listings[0].revenue, Some(5000.0));
        assert_eq!(table.listings[1].price, None);
        assert_eq!(table.listings[1].accommodates, None);
        assert_eq!(table.listings[1].revenue, None);
    }
}
