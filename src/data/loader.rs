use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, LoadError, RawRecord, STAT_COUNT, Stat};

const NAME_COLUMN: &str = "Name";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a creature table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` (and anything unrecognised) – header row with `Name` and the stat columns
/// * `.json`    – `[{ "Name": "...", "HP": 45, "Sp. Atk": 65, ... }, ...]`
/// * `.parquet` – Utf8 `Name` column plus integer or float stat columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        _ => load_csv(path)?,
    };

    let malformed: usize = raw.iter().map(RawRecord::malformed_fields).sum();
    if malformed > 0 {
        log::warn!(
            "{}: {malformed} numeric field(s) could not be parsed and were set to NaN",
            path.display()
        );
    }

    let dataset = Dataset::from_records(raw)
        .with_context(|| format!("building dataset from {}", path.display()))?;
    log::info!(
        "Loaded {} records from {} (Total range {:?})",
        dataset.len(),
        path.display(),
        dataset.total_range()
    );
    Ok(dataset)
}

/// Coerce a text cell to a number. Empty, non-numeric and infinite text
/// (`"inf"`, `"Infinity"`) all become NaN.
pub fn parse_number(s: &str) -> f64 {
    finite_or_nan(s.trim().parse::<f64>().unwrap_or(f64::NAN))
}

fn finite_or_nan(v: f64) -> f64 {
    if v.is_finite() { v } else { f64::NAN }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; `Name` plus one column per
/// [`Stat`]. Other columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<RawRecord>> {
    // short rows keep loading; their missing stats become NaN
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRecord>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let name_idx = headers
        .iter()
        .position(|h| h.trim() == NAME_COLUMN)
        .ok_or_else(|| LoadError::MissingColumn(NAME_COLUMN.to_string()))?;
    let stat_idx = locate_stats(&headers)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut stats = [f64::NAN; STAT_COUNT];
        for (slot, &col) in stats.iter_mut().zip(stat_idx.iter()) {
            *slot = parse_number(record.get(col).unwrap_or(""));
        }

        rows.push(RawRecord {
            name: record.get(name_idx).unwrap_or("").trim().to_string(),
            stats,
        });
    }

    Ok(rows)
}

/// Column index for every stat, in [`Stat::ALL`] order.
fn locate_stats<S: AsRef<str>>(headers: &[S]) -> Result<[usize; STAT_COUNT], LoadError> {
    let mut indices = [0usize; STAT_COUNT];
    for stat in Stat::ALL {
        indices[stat.index()] = headers
            .iter()
            .position(|h| Stat::from_header(h.as_ref()) == Some(stat))
            .ok_or_else(|| LoadError::MissingColumn(stat.label().to_string()))?;
    }
    Ok(indices)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape `df.to_json(orient='records')` writes.
fn load_json(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let name = match obj.get(NAME_COLUMN) {
            Some(JsonValue::String(s)) => s.trim().to_string(),
            Some(JsonValue::Null) | None => {
                bail!("Row {i}: {}", LoadError::MissingColumn(NAME_COLUMN.to_string()))
            }
            Some(other) => other.to_string(),
        };

        let mut stats = [f64::NAN; STAT_COUNT];
        for (key, val) in obj {
            if let Some(stat) = Stat::from_header(key) {
                stats[stat.index()] = json_to_number(val);
            }
        }

        rows.push(RawRecord { name, stats });
    }

    Ok(rows)
}

fn json_to_number(val: &JsonValue) -> f64 {
    match val {
        JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(s) => parse_number(s),
        _ => f64::NAN,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the creature table.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), and with `generate_sample`.
fn load_parquet(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();

        let name_idx = schema
            .index_of(NAME_COLUMN)
            .map_err(|_| LoadError::MissingColumn(NAME_COLUMN.to_string()))?;
        let stat_idx = locate_stats(&field_names)?;

        let name_col = batch.column(name_idx);
        for row in 0..batch.num_rows() {
            let name = string_cell(name_col, row, NAME_COLUMN)?;

            let mut stats = [f64::NAN; STAT_COUNT];
            for stat in Stat::ALL {
                let col = batch.column(stat_idx[stat.index()]);
                stats[stat.index()] = numeric_cell(col, row, stat.label())?;
            }

            rows.push(RawRecord { name, stats });
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

fn string_cell(col: &Arc<dyn Array>, row: usize, column: &str) -> Result<String, LoadError> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).trim().to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).trim().to_string()),
        other => Err(LoadError::UnsupportedColumn {
            column: column.to_string(),
            data_type: format!("{other:?}"),
        }),
    }
}

/// Read a single stat cell; nulls and unparseable text become NaN.
fn numeric_cell(col: &Arc<dyn Array>, row: usize, column: &str) -> Result<f64, LoadError> {
    if col.is_null(row) {
        return Ok(f64::NAN);
    }
    let value = match col.data_type() {
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Float32 => finite_or_nan(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => finite_or_nan(col.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => parse_number(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => parse_number(col.as_string::<i64>().value(row)),
        other => {
            return Err(LoadError::UnsupportedColumn {
                column: column.to_string(),
                data_type: format!("{other:?}"),
            });
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    use super::*;

    const HEADER: &str = "Number,Name,Type_1,Total,HP,Attack,Defense,Sp. Atk,Sp. Def,Speed\n";

    fn temp_with(suffix: &str, contents: &str) -> tempfile::TempPath {
        let mut temp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        temp.write_all(contents.as_bytes()).unwrap();
        temp.into_temp_path()
    }

    #[test]
    fn csv_loads_named_columns_in_any_order() {
        let path = temp_with(
            ".csv",
            &format!("{HEADER}1,Bulbasaur,Grass,318,45,49,49,65,65,45\n4,Charmander,Fire,309,39,52,43,60,50,65\n"),
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        let charmander = &ds.records()[1];
        assert_eq!(charmander.name(), "Charmander");
        assert_eq!(charmander.get(Stat::Total), 309.0);
        assert_eq!(charmander.get(Stat::SpAtk), 60.0);
        assert_eq!(charmander.get(Stat::Speed), 65.0);
        assert_eq!(ds.total_range(), (309, 318));
    }

    #[test]
    fn csv_accepts_underscore_headers() {
        let path = temp_with(
            ".csv",
            "Name,HP,Attack,Defense,Sp_Atk,Sp_Def,Speed,Total\nA,1,2,3,4,5,6,21\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records()[0].get(Stat::SpDef), 5.0);
    }

    #[test]
    fn malformed_numbers_become_nan_without_failing() {
        let path = temp_with(
            ".csv",
            &format!("{HEADER}1,Odd,Normal,300,abc,,49,65,65,45\n2,Fine,Normal,400,1,2,3,4,5,6\n"),
        );
        let ds = load_file(&path).unwrap();
        let odd = &ds.records()[0];
        assert!(odd.get(Stat::Hp).is_nan());
        assert!(odd.get(Stat::Attack).is_nan());
        assert_eq!(odd.get(Stat::Defense), 49.0);
        assert_eq!(ds.extent(Stat::Hp), Some((1.0, 1.0)));
    }

    #[test]
    fn infinite_text_is_treated_as_malformed() {
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("-Infinity").is_nan());
        assert_eq!(parse_number(" 42 "), 42.0);

        let path = temp_with(
            ".csv",
            &format!("{HEADER}1,Odd,Normal,inf,1,2,3,4,5,6\n2,Fine,Normal,400,1,2,3,4,5,6\n"),
        );
        let ds = load_file(&path).unwrap();
        assert!(ds.records()[0].get(Stat::Total).is_nan());
        assert_eq!(ds.total_range(), (400, 400));
        let (_, hi) = ds.total_range();
        assert!(crate::data::filter::threshold_selection(&ds, hi + 1).is_empty());
        assert_eq!(crate::data::filter::threshold_selection(&ds, hi), vec![1]);
    }

    #[test]
    fn short_row_loads_with_missing_stats_as_nan() {
        let path = temp_with(
            ".csv",
            &format!(
                "{HEADER}1,Full,Normal,300,1,2,3,4,5,6\n2,Short,Normal,310,7,8,9\n3,Last,Normal,320,1,2,3,4,5,6\n"
            ),
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        let short = &ds.records()[1];
        assert_eq!(short.name(), "Short");
        assert_eq!(short.get(Stat::Total), 310.0);
        assert_eq!(short.get(Stat::Defense), 9.0);
        assert!(short.get(Stat::SpAtk).is_nan());
        assert!(short.get(Stat::Speed).is_nan());
        assert_eq!(ds.records()[2].get(Stat::Speed), 6.0);
    }

    #[test]
    fn missing_total_column_is_a_load_error() {
        let path = temp_with(".csv", "Name,HP,Attack,Defense,Sp. Atk,Sp. Def,Speed\nA,1,2,3,4,5,6\n");
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Total"), "{err:#}");
    }

    #[test]
    fn header_only_file_is_rejected() {
        let path = temp_with(".csv", HEADER);
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err.downcast_ref::<LoadError>(), Some(LoadError::Empty)));
    }

    #[test]
    fn missing_file_reports_an_error() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("opening CSV"));
    }

    #[test]
    fn json_records_load_numbers_and_numeric_strings() {
        let path = temp_with(
            ".json",
            r#"[{"Name": "A", "HP": 1, "Attack": "2", "Defense": 3, "Sp. Atk": 4, "Sp. Def": 5, "Speed": 6, "Total": 21},
                {"Name": "B", "HP": null, "Attack": 2, "Defense": 3, "Sp_Atk": 4, "Sp_Def": 5, "Speed": 6, "Total": 30}]"#,
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records()[0].get(Stat::Attack), 2.0);
        assert!(ds.records()[1].get(Stat::Hp).is_nan());
        assert_eq!(ds.records()[1].get(Stat::SpAtk), 4.0);
    }

    #[test]
    fn parquet_round_trip_from_arrow_batch() {
        let mut fields = vec![Field::new("Name", DataType::Utf8, false)];
        let mut columns: Vec<Arc<dyn Array>> =
            vec![Arc::new(StringArray::from(vec!["A", "B"]))];
        for stat in Stat::ALL {
            if stat == Stat::Speed {
                fields.push(Field::new(stat.label(), DataType::Float64, true));
                columns.push(Arc::new(Float64Array::from(vec![Some(1.5), None])));
            } else {
                fields.push(Field::new(stat.label(), DataType::Int64, false));
                columns.push(Arc::new(Int64Array::from(vec![100, 200])));
            }
        }
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let temp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(temp.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(temp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].get(Stat::Total), 200.0);
        assert_eq!(ds.records()[0].get(Stat::Speed), 1.5);
        assert!(ds.records()[1].get(Stat::Speed).is_nan());
    }
}
