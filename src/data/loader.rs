use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Date32Type, Float64Type, Int64Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
};
use calamine::{Data, ExcelDateTime, ExcelDateTimeType, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{CellValue, Table, TableSchema};

/// Extensions `calamine` can open.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Per-sheet file extensions tried, in order, when the resource is a directory.
const SHEET_FILE_EXTENSIONS: &[&str] = &["parquet", "csv", "json"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load sheet `sheet` from a resource and check it against `schema`.
///
/// Supported resources:
/// * a workbook (`.xlsx`, `.xls`, `.ods`, ...) – the sheet is looked up by name
/// * a directory – `<sheet>.parquet`, `<sheet>.csv` or `<sheet>.json` inside it
pub fn load_table(resource: &Path, sheet: &str, schema: &TableSchema) -> Result<Table, DataError> {
    if !resource.exists() {
        return Err(DataError::ResourceNotFound(resource.to_path_buf()));
    }

    let table = if resource.is_dir() {
        let file = sheet_file(resource, sheet).ok_or_else(|| DataError::SheetNotFound {
            resource: resource.to_path_buf(),
            sheet: sheet.to_string(),
        })?;
        log::debug!("Reading sheet '{sheet}' from {}", file.display());
        load_sheet_file(&file)?
    } else {
        let ext = extension(resource);
        if !WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            return Err(DataError::UnsupportedFormat(resource.to_path_buf()));
        }
        load_workbook_sheet(resource, sheet)?
    };

    let table = conform(table, sheet, schema)?;
    log::info!(
        "Loaded sheet '{sheet}' from {}: {} rows, {} columns",
        resource.display(),
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn sheet_file(dir: &Path, sheet: &str) -> Option<PathBuf> {
    SHEET_FILE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{sheet}.{ext}")))
        .find(|p| p.is_file())
}

fn load_sheet_file(path: &Path) -> Result<Table, DataError> {
    let result = match extension(path).as_str() {
        "parquet" => load_parquet(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        _ => return Err(DataError::UnsupportedFormat(path.to_path_buf())),
    };
    result.map_err(|e| DataError::read(path, e))
}

// ---------------------------------------------------------------------------
// Schema conformance
// ---------------------------------------------------------------------------

/// Check required columns and coerce numeric / date columns.
fn conform(mut table: Table, sheet: &str, schema: &TableSchema) -> Result<Table, DataError> {
    let missing = schema.missing_columns(&table.columns);
    if !missing.is_empty() {
        return Err(DataError::SchemaMismatch {
            sheet: sheet.to_string(),
            reason: format!("missing columns: {}", missing.join(", ")),
        });
    }

    let mismatch = |column: &str, row: usize, found: &CellValue, expected: &str| {
        DataError::SchemaMismatch {
            sheet: sheet.to_string(),
            // +1 for the header, +1 for 1-based rows as a spreadsheet shows them
            reason: format!(
                "column '{column}' row {}: expected {expected}, found '{found}'",
                row + 2
            ),
        }
    };

    for &column in schema.numeric {
        let Some(c) = table.column_index(column) else { continue };
        for (row_no, row) in table.rows.iter_mut().enumerate() {
            let Some(cell) = row.get_mut(c) else { continue };
            if let Some(coerced) = coerce_number(cell) {
                *cell = coerced;
            } else {
                return Err(mismatch(column, row_no, &*cell, "a number"));
            }
        }
    }

    for &column in schema.dates {
        let Some(c) = table.column_index(column) else { continue };
        for (row_no, row) in table.rows.iter_mut().enumerate() {
            let Some(cell) = row.get_mut(c) else { continue };
            if let Some(coerced) = coerce_date(cell) {
                *cell = coerced;
            } else {
                return Err(mismatch(column, row_no, &*cell, "a date"));
            }
        }
    }

    Ok(table)
}

fn coerce_number(cell: &CellValue) -> Option<CellValue> {
    match cell {
        CellValue::Integer(_) | CellValue::Float(_) | CellValue::Null => Some(cell.clone()),
        CellValue::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(CellValue::Null)
            } else {
                s.parse::<f64>().ok().map(CellValue::from_number)
            }
        }
        _ => None,
    }
}

fn coerce_date(cell: &CellValue) -> Option<CellValue> {
    match cell {
        CellValue::Date(_) | CellValue::Null => Some(cell.clone()),
        CellValue::String(s) => parse_datetime(s).map(CellValue::Date),
        // A date column without date formatting reads as Excel serial numbers.
        CellValue::Integer(_) | CellValue::Float(_) => {
            let serial = cell.as_f64()?;
            ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false)
                .as_datetime()
                .map(CellValue::Date)
        }
        CellValue::Bool(_) => None,
    }
}

/// Date-time layouts, ISO first. Day-first layouts cover sheets exported with
/// an Indian locale.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Parse the timestamp layouts seen in exported sheets.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Read one worksheet. The first row is the header; fully blank rows are dropped.
fn load_workbook_sheet(path: &Path, sheet: &str) -> Result<Table, DataError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DataError::read(path, anyhow::Error::new(e).context("opening workbook")))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(DataError::SheetNotFound {
            resource: path.to_path_buf(),
            sheet: sheet.to_string(),
        });
    }

    let range = workbook.worksheet_range(sheet).map_err(|e| {
        DataError::read(path, anyhow::Error::new(e).context(format!("reading sheet '{sheet}'")))
    })?;

    let mut rows_iter = range.rows();
    let columns: Vec<String> = match rows_iter.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => Vec::new(),
    };

    let rows = rows_iter
        .map(|cells| {
            let mut row: Vec<CellValue> = cells.iter().map(workbook_cell).collect();
            row.resize(columns.len(), CellValue::Null);
            row
        })
        .filter(|row| !row.iter().all(CellValue::is_null))
        .collect();

    Ok(Table::new(columns, rows))
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => text_cell(s),
        Data::Float(f) => CellValue::from_number(*f),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt.as_datetime().map(CellValue::Date).unwrap_or(CellValue::Null),
        Data::DateTimeIso(s) => parse_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => {
            log::debug!("Workbook cell error {e:?} read as empty");
            CellValue::Null
        }
    }
}

fn text_cell(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; cell types are guessed per value.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut row: Vec<CellValue> = record.iter().map(guess_cell_type).collect();
        row.resize(columns.len(), CellValue::Null);
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::from_number(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    if let Some(dt) = parse_datetime(s) {
        return CellValue::Date(dt);
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Village Name": "Alpha", "Farmer Name": "Asha", "No of Irrigation": 6 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => match parse_datetime(s) {
            Some(dt) => CellValue::Date(dt),
            None => text_cell(s),
        },
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::from_number(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one sheet. Every column becomes a table column.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// (`df.write_parquet()`) and the `generate_sample` binary. A column whose type
/// cannot be represented fails the load instead of reading as empty.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        if batch.num_columns() != columns.len() {
            bail!(
                "record batch has {} columns, schema has {}",
                batch.num_columns(),
                columns.len()
            );
        }
        let arrays = batch
            .columns()
            .iter()
            .zip(&columns)
            .map(|(col, name)| {
                normalize_column(col).with_context(|| format!("column '{name}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let cells = arrays
                .iter()
                .zip(&columns)
                .map(|(col, name)| {
                    extract_cell(col, row).with_context(|| format!("column '{name}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok(Table::new(columns, rows))
}

/// Cast an Arrow column to one of the types [`extract_cell`] reads.
///
/// Narrow and unsigned integers widen to Int64, Float16/32 to Float64, string
/// variants and categoricals (dictionary arrays) unpack to Utf8, Date64 becomes
/// a millisecond timestamp. Anything else is returned unchanged.
fn normalize_column(col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DataType::Int64,
        DataType::Float16 | DataType::Float32 => DataType::Float64,
        DataType::LargeUtf8 | DataType::Utf8View => DataType::Utf8,
        DataType::Date64 => DataType::Timestamp(TimeUnit::Millisecond, None),
        DataType::Dictionary(_, value) => {
            let unpacked = cast(col, value).context("unpacking dictionary column")?;
            return normalize_column(&unpacked);
        }
        _ => return Ok(col.clone()),
    };
    cast(col, &target).with_context(|| format!("casting {} to {target}", col.data_type()))
}

/// Extract a single cell from a normalized Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.data_type() == &DataType::Null || col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let date = |dt: Option<NaiveDateTime>| dt.map(CellValue::Date).unwrap_or(CellValue::Null);
    let cell = match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float64 => CellValue::from_number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => date(col.as_primitive::<Date32Type>().value_as_datetime(row)),
        DataType::Timestamp(TimeUnit::Second, _) => {
            date(col.as_primitive::<TimestampSecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            date(col.as_primitive::<TimestampMillisecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            date(col.as_primitive::<TimestampMicrosecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            date(col.as_primitive::<TimestampNanosecondType>().value_as_datetime(row))
        }
        other => bail!("unsupported column type {other}"),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{
        BinaryArray, DictionaryArray, Float32Array, Float64Array, Int16Array, StringArray,
        TimestampMillisecondArray,
    };
    use arrow::datatypes::Int32Type;
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::{
        DEVICE, FARMER, IRRIGATED_WATER, IRRIGATION_COUNT, MOBILE, MOISTURE, RAIN_WATER,
        RAW_SCHEMA, SUMMARY_SCHEMA, TIMESTAMP, TOTAL_WATER, VILLAGE, YIELD,
    };

    const SUMMARY_CSV: &str = "\
Village Name,Farmer Name,Device ID,No of Irrigation,Yield (quintal/acre),\
Irrigated Water (lakh L/acre),Total Water (lakh L/acre),Rain Water (lakh L/acre)
Alpha,Asha,D-001,4,310.5,12.1,20.4,8.3
Alpha,Bala,D-002,6,298.0,13.0,21.0,8.0
Beta,Ravi,D-003,,305.25,11.2,19.9,8.7
";

    fn row_map(table: &Table, row: usize) -> BTreeMap<String, CellValue> {
        table
            .columns
            .iter()
            .map(|c| (c.clone(), table.value(row, c).clone()))
            .collect()
    }

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    fn write_parquet(path: &Path, columns: Vec<(&str, ArrayRef)>) {
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn missing_resource_is_reported() {
        let missing = Path::new("/definitely/not/here.xlsx");
        let err = load_table(missing, "summary", &SUMMARY_SCHEMA).unwrap_err();
        assert!(matches!(err, DataError::ResourceNotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "data.txt", "hello");
        let err = load_table(&dir.path().join("data.txt"), "summary", &SUMMARY_SCHEMA).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(_)));
    }

    #[test]
    fn directory_without_sheet_file_is_sheet_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "summary.csv", SUMMARY_CSV);
        let err = load_table(dir.path(), "raw", &RAW_SCHEMA).unwrap_err();
        match err {
            DataError::SheetNotFound { sheet, .. } => assert_eq!(sheet, "raw"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn csv_sheet_loads_with_types() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "summary.csv", SUMMARY_CSV);
        let table = load_table(dir.path(), "summary", &SUMMARY_SCHEMA).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.value(0, VILLAGE), &CellValue::from("Alpha"));
        assert_eq!(table.value(1, IRRIGATION_COUNT), &CellValue::Integer(6));
        assert_eq!(table.value(2, YIELD), &CellValue::Float(305.25));
        assert!(table.value(2, IRRIGATION_COUNT).is_null());
    }

    #[test]
    fn missing_column_is_schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "summary.csv", "Village Name,Farmer Name\nAlpha,Asha\n");
        let err = load_table(dir.path(), "summary", &SUMMARY_SCHEMA).unwrap_err();
        match err {
            DataError::SchemaMismatch { reason, .. } => assert!(reason.contains(DEVICE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn text_in_numeric_column_is_schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let csv = SUMMARY_CSV.replace("298.0", "n/a");
        write_file(dir.path(), "summary.csv", &csv);
        let err = load_table(dir.path(), "summary", &SUMMARY_SCHEMA).unwrap_err();
        match err {
            DataError::SchemaMismatch { reason, .. } => {
                assert!(reason.contains(YIELD));
                assert!(reason.contains("row 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn json_records_load_dates_and_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"[
            {"Farmer Name": "Asha", "Father Name": "Mohan", "Mobile Number": 9876543210,
             "Village Name": "Alpha", "Device ID": "D-001",
             "CreateDate": "2024-07-01 06:00:00", "CalculatedValue": 31.5},
            {"Farmer Name": "Asha", "Father Name": "Mohan", "Mobile Number": 9876543210,
             "Village Name": "Alpha", "Device ID": "D-001",
             "CreateDate": "2024-07-02", "CalculatedValue": "29.0"}
        ]"#;
        write_file(dir.path(), "raw.json", json);
        let table = load_table(dir.path(), "raw", &RAW_SCHEMA).unwrap();

        assert_eq!(table.len(), 2);
        let first = row_map(&table, 0);
        assert_eq!(first[FARMER], CellValue::from("Asha"));
        assert_eq!(first[MOISTURE], CellValue::Float(31.5));
        assert_eq!(
            table.value(1, TIMESTAMP).as_date(),
            parse_datetime("2024-07-02 00:00:00")
        );
        assert_eq!(table.value(1, MOISTURE), &CellValue::Integer(29));
    }

    #[test]
    fn parquet_sheet_takes_precedence_and_reads_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "raw.csv", "not,a,raw,sheet\n");

        let text = |v: &str| Arc::new(StringArray::from(vec![v, v])) as ArrayRef;
        let stamps = TimestampMillisecondArray::from(vec![1_719_792_000_000, 1_719_878_400_000]);
        write_parquet(
            &dir.path().join("raw.parquet"),
            vec![
                (FARMER, text("Asha")),
                ("Father Name", text("Mohan")),
                (MOBILE, text("9876543210")),
                (VILLAGE, text("Alpha")),
                (DEVICE, text("D-001")),
                (TIMESTAMP, Arc::new(stamps) as ArrayRef),
                (MOISTURE, Arc::new(Float64Array::from(vec![31.5, 30.25])) as ArrayRef),
            ],
        );

        let table = load_table(dir.path(), "raw", &RAW_SCHEMA).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.value(0, TIMESTAMP).as_date(),
            parse_datetime("2024-07-01 00:00:00")
        );
        assert_eq!(table.value(1, MOISTURE), &CellValue::Float(30.25));
    }

    fn summary_columns() -> Vec<(&'static str, ArrayRef)> {
        let villages: DictionaryArray<Int32Type> = vec!["Alpha", "Beta"].into_iter().collect();
        let water = |a: f64, b: f64| Arc::new(Float64Array::from(vec![a, b])) as ArrayRef;
        vec![
            (VILLAGE, Arc::new(villages) as ArrayRef),
            (FARMER, Arc::new(StringArray::from(vec!["Asha", "Ravi"])) as ArrayRef),
            (DEVICE, Arc::new(StringArray::from(vec!["D-001", "D-002"])) as ArrayRef),
            (IRRIGATION_COUNT, Arc::new(Int16Array::from(vec![4, 8])) as ArrayRef),
            (YIELD, Arc::new(Float32Array::from(vec![300.5, 280.0])) as ArrayRef),
            (IRRIGATED_WATER, water(12.1, 13.0)),
            (TOTAL_WATER, water(20.4, 21.0)),
            (RAIN_WATER, water(8.3, 8.0)),
        ]
    }

    #[test]
    fn parquet_narrow_ints_and_categoricals_are_read() {
        let dir = tempfile::tempdir().unwrap();
        write_parquet(&dir.path().join("summary.parquet"), summary_columns());

        let table = load_table(dir.path(), "summary", &SUMMARY_SCHEMA).unwrap();
        assert_eq!(table.value(0, VILLAGE), &CellValue::from("Alpha"));
        assert_eq!(table.value(1, VILLAGE), &CellValue::from("Beta"));
        assert_eq!(table.value(0, IRRIGATION_COUNT), &CellValue::Integer(4));
        assert_eq!(table.value(0, YIELD), &CellValue::Float(300.5));

        let kpis = crate::data::aggregate::summarize(&table);
        assert_eq!(kpis.mean_irrigation, Some(6.0));
    }

    #[test]
    fn unsupported_parquet_column_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut columns = summary_columns();
        let photos = BinaryArray::from_vec(vec![&b"\x89PNG"[..]; 2]);
        columns.push(("Photo", Arc::new(photos) as ArrayRef));
        write_parquet(&dir.path().join("summary.parquet"), columns);

        match load_table(dir.path(), "summary", &SUMMARY_SCHEMA).unwrap_err() {
            DataError::Read { message, .. } => {
                assert!(message.contains("Photo"), "{message}");
                assert!(message.contains("Binary"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn date_column_accepts_minute_precision_day_first_and_serials() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "\
Farmer Name,Father Name,Mobile Number,Village Name,Device ID,CreateDate,CalculatedValue
Asha,Mohan,9876543210,Alpha,D-001,2024-07-01 06:00,31.5
Asha,Mohan,9876543210,Alpha,D-001,01/07/2024 18:30,30.0
Asha,Mohan,9876543210,Alpha,D-001,45475.5,29.5
";
        write_file(dir.path(), "raw.csv", csv);
        let table = load_table(dir.path(), "raw", &RAW_SCHEMA).unwrap();

        let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok();
        assert_eq!(table.value(0, TIMESTAMP).as_date(), at("2024-07-01 06:00:00"));
        assert_eq!(table.value(1, TIMESTAMP).as_date(), at("2024-07-01 18:30:00"));
        assert_eq!(table.value(2, TIMESTAMP).as_date(), at("2024-07-02 12:00:00"));
    }

    #[test]
    fn parses_common_timestamp_layouts() {
        let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok();
        assert_eq!(parse_datetime("2024-07-01 06:30:00"), at("2024-07-01 06:30:00"));
        assert_eq!(parse_datetime("2024-07-01T06:30:00"), at("2024-07-01 06:30:00"));
        assert!(parse_datetime("2024-07-01 06:30:00.250").is_some());
        assert_eq!(parse_datetime("2024-07-01 06:30"), at("2024-07-01 06:30:00"));
        assert_eq!(parse_datetime("2024-07-01"), at("2024-07-01 00:00:00"));
        assert_eq!(parse_datetime("01-07-2024 06:30"), at("2024-07-01 06:30:00"));
        assert_eq!(parse_datetime("01/07/2024 06:30"), at("2024-07-01 06:30:00"));
        assert_eq!(parse_datetime("01/07/2024"), at("2024-07-01 00:00:00"));
        assert!(parse_datetime("July 1st").is_none());
    }

    // testdata/farm.xlsx: `summary` has an empty row 4; in `raw`, row 2 is a
    // date-formatted cell, row 3 an unformatted serial and row 4 day-first text.
    fn fixture_workbook() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/farm.xlsx")
    }

    #[test]
    fn workbook_summary_sheet_skips_blank_rows() {
        let table = load_table(&fixture_workbook(), "summary", &SUMMARY_SCHEMA).unwrap();

        assert_eq!(table.columns.len(), SUMMARY_SCHEMA.required.len());
        assert_eq!(table.columns[0], VILLAGE);
        assert_eq!(table.len(), 3);
        assert_eq!(table.value(2, FARMER), &CellValue::from("Ravi"));
        assert_eq!(table.value(0, IRRIGATION_COUNT), &CellValue::Integer(4));
        assert_eq!(table.value(1, YIELD), &CellValue::Integer(298));
        assert_eq!(table.value(2, YIELD), &CellValue::Float(305.25));
    }

    #[test]
    fn workbook_raw_sheet_reads_dates_and_ids() {
        let table = load_table(&fixture_workbook(), "raw", &RAW_SCHEMA).unwrap();
        let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok();

        assert_eq!(table.len(), 3);
        assert_eq!(table.value(0, MOBILE), &CellValue::Integer(9_876_543_210));
        assert_eq!(table.value(0, TIMESTAMP).as_date(), at("2024-07-01 06:00:00"));
        assert_eq!(table.value(1, TIMESTAMP).as_date(), at("2024-07-02 12:00:00"));
        assert_eq!(table.value(2, TIMESTAMP).as_date(), at("2024-07-02 06:00:00"));
        assert_eq!(table.value(2, MOISTURE), &CellValue::Integer(27));
    }

    #[test]
    fn workbook_without_sheet_is_sheet_not_found() {
        match load_table(&fixture_workbook(), "readings", &RAW_SCHEMA).unwrap_err() {
            DataError::SheetNotFound { sheet, .. } => assert_eq!(sheet, "readings"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
