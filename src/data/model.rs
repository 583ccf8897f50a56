use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Column names as they appear in the workbook
// ---------------------------------------------------------------------------

pub const VILLAGE: &str = "Village Name";
pub const FARMER: &str = "Farmer Name";
pub const FATHER: &str = "Father Name";
pub const MOBILE: &str = "Mobile Number";
pub const DEVICE: &str = "Device ID";
pub const IRRIGATION_COUNT: &str = "No of Irrigation";
pub const YIELD: &str = "Yield (quintal/acre)";
pub const IRRIGATED_WATER: &str = "Irrigated Water (lakh L/acre)";
pub const TOTAL_WATER: &str = "Total Water (lakh L/acre)";
pub const RAIN_WATER: &str = "Rain Water (lakh L/acre)";
pub const TIMESTAMP: &str = "CreateDate";
pub const MOISTURE: &str = "CalculatedValue";

// ---------------------------------------------------------------------------
// CellValue – a single cell of a sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what spreadsheet readers hand back.
/// Used as a `BTreeSet` key for selections, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Null,
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M")),
            CellValue::Null => write!(f, "–"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::from_number(v)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl CellValue {
    /// Build a numeric cell, folding whole floats into `Integer`.
    ///
    /// Spreadsheet readers report every number as a float, which would make
    /// device ids and mobile numbers render as `9876543210.00`.
    pub fn from_number(v: f64) -> Self {
        if v.is_nan() {
            CellValue::Null
        } else if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            CellValue::Integer(v as i64)
        } else {
            CellValue::Float(v)
        }
    }

    /// Try to interpret the value as an `f64` for aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – one sheet, row-major
// ---------------------------------------------------------------------------

/// An immutable in-memory sheet: ordered columns and row-major cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

static NULL: CellValue = CellValue::Null;

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Table { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at (`row`, `column`). Missing columns and short rows read as `Null`.
    pub fn value(&self, row: usize, column: &str) -> &CellValue {
        self.column_index(column)
            .and_then(|c| self.rows.get(row)?.get(c))
            .unwrap_or(&NULL)
    }

    /// All cells of one column in row order (`Null` if the column is absent).
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a CellValue> + 'a {
        let idx = self.column_index(column);
        self.rows
            .iter()
            .map(move |row| idx.and_then(|c| row.get(c)).unwrap_or(&NULL))
    }

    /// Sorted set of the non-null values of a column.
    pub fn unique_values(&self, column: &str) -> BTreeSet<CellValue> {
        self.column_values(column)
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }

    /// A new table holding the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Project onto `columns` and drop duplicate rows, keeping the first
    /// occurrence of each.
    pub fn distinct_rows(&self, columns: &[&str]) -> Table {
        let idx: Vec<Option<usize>> = columns.iter().map(|c| self.column_index(c)).collect();
        let mut seen: HashSet<Vec<CellValue>> = HashSet::new();
        let mut rows = Vec::new();

        for row in &self.rows {
            let projected: Vec<CellValue> = idx
                .iter()
                .map(|i| i.and_then(|i| row.get(i)).cloned().unwrap_or(CellValue::Null))
                .collect();
            if seen.insert(projected.clone()) {
                rows.push(projected);
            }
        }

        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

// ---------------------------------------------------------------------------
// TableSchema – what a sheet must contain
// ---------------------------------------------------------------------------

/// Expected layout of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Sheet name used when none is configured.
    pub default_sheet: &'static str,
    pub required: &'static [&'static str],
    /// Subset of `required` whose cells must be numbers (or empty).
    pub numeric: &'static [&'static str],
    /// Subset of `required` whose cells must be dates (or empty).
    pub dates: &'static [&'static str],
}

/// Aggregated per-device sheet.
pub const SUMMARY_SCHEMA: TableSchema = TableSchema {
    default_sheet: "summary",
    required: &[
        VILLAGE,
        FARMER,
        DEVICE,
        IRRIGATION_COUNT,
        YIELD,
        IRRIGATED_WATER,
        TOTAL_WATER,
        RAIN_WATER,
    ],
    numeric: &[IRRIGATION_COUNT, YIELD, IRRIGATED_WATER, TOTAL_WATER, RAIN_WATER],
    dates: &[],
};

/// Per-reading sheet. `No of Irrigation` is optional here.
pub const RAW_SCHEMA: TableSchema = TableSchema {
    default_sheet: "raw",
    required: &[FARMER, FATHER, MOBILE, VILLAGE, DEVICE, TIMESTAMP, MOISTURE],
    numeric: &[MOISTURE],
    dates: &[TIMESTAMP],
};

impl TableSchema {
    /// Required columns absent from `columns`.
    pub fn missing_columns(&self, columns: &[String]) -> Vec<String> {
        self.required
            .iter()
            .filter(|req| !columns.iter().any(|c| c == *req))
            .map(|c| c.to_string())
            .collect()
    }
}
