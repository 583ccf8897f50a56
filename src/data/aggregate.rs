use std::collections::{BTreeMap, HashSet};

use super::model::{CellValue, DEVICE, FARMER, IRRIGATION_COUNT, Table, YIELD};

// ---------------------------------------------------------------------------
// Scalar helpers
// ---------------------------------------------------------------------------

/// Arithmetic mean of the numeric cells, ignoring missing values.
/// `None` when there is nothing to average.
pub fn mean<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .filter_map(CellValue::as_f64)
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Round to two decimals for display.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Number of distinct non-null values in `column`.
pub fn distinct_count(table: &Table, column: &str) -> usize {
    table
        .column_values(column)
        .filter(|v| !v.is_null())
        .collect::<HashSet<_>>()
        .len()
}

// ---------------------------------------------------------------------------
// KPI tiles
// ---------------------------------------------------------------------------

/// Headline numbers of the summary sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    pub device_count: usize,
    pub farmer_count: usize,
    /// `None` for an empty selection.
    pub mean_irrigation: Option<f64>,
    pub mean_yield: Option<f64>,
}

pub fn summarize(table: &Table) -> Kpis {
    Kpis {
        device_count: distinct_count(table, DEVICE),
        farmer_count: distinct_count(table, FARMER),
        mean_irrigation: mean(table.column_values(IRRIGATION_COUNT)),
        mean_yield: mean(table.column_values(YIELD)),
    }
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// One group of a [`GroupedMeans`] table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub key: CellValue,
    /// One entry per metric column, rounded to 2 decimals.
    pub means: Vec<Option<f64>>,
}

/// Result of [`group_mean`]: rows ascending by group key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedMeans {
    pub group_column: String,
    pub metric_columns: Vec<String>,
    pub rows: Vec<AggregateRow>,
}

impl GroupedMeans {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(group key, mean)` pairs of one metric, for bar charts.
    pub fn metric(&self, column: &str) -> Vec<(CellValue, Option<f64>)> {
        let Some(m) = self.metric_columns.iter().position(|c| c == column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .map(|row| (row.key.clone(), row.means.get(m).copied().flatten()))
            .collect()
    }
}

/// Mean of each metric per distinct value of `group_column`.
///
/// Rows whose group value is missing are dropped. Groups are ordered by key so
/// the output does not depend on row order.
pub fn group_mean(table: &Table, group_column: &str, metric_columns: &[&str]) -> GroupedMeans {
    let metric_idx: Vec<Option<usize>> = metric_columns
        .iter()
        .map(|c| table.column_index(c))
        .collect();

    // key → per-metric (sum, count)
    let mut groups: BTreeMap<CellValue, Vec<(f64, usize)>> = BTreeMap::new();
    for (row_no, key) in table.column_values(group_column).enumerate() {
        if key.is_null() {
            continue;
        }
        let acc = groups
            .entry(key.clone())
            .or_insert_with(|| vec![(0.0, 0); metric_columns.len()]);
        let row = &table.rows[row_no];
        for (slot, idx) in acc.iter_mut().zip(&metric_idx) {
            if let Some(v) = idx.and_then(|i| row.get(i)).and_then(CellValue::as_f64) {
                slot.0 += v;
                slot.1 += 1;
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|(key, acc)| AggregateRow {
            key,
            means: acc
                .into_iter()
                .map(|(sum, n)| (n > 0).then(|| round2(sum / n as f64)))
                .collect(),
        })
        .collect();

    GroupedMeans {
        group_column: group_column.to_string(),
        metric_columns: metric_columns.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RAIN_WATER, VILLAGE};

    fn row(
        village: &str,
        farmer: &str,
        device: &str,
        irrigations: Option<i64>,
        yield_: f64,
        rain: Option<f64>,
    ) -> Vec<CellValue> {
        let village = if village.is_empty() {
            CellValue::Null
        } else {
            village.into()
        };
        vec![
            village,
            farmer.into(),
            device.into(),
            irrigations.map_or(CellValue::Null, CellValue::from),
            yield_.into(),
            rain.map_or(CellValue::Null, CellValue::from),
        ]
    }

    fn summary() -> Table {
        Table::new(
            vec![
                VILLAGE.into(),
                FARMER.into(),
                DEVICE.into(),
                IRRIGATION_COUNT.into(),
                YIELD.into(),
                RAIN_WATER.into(),
            ],
            vec![
                row("Beta", "Ravi", "D-4", Some(5), 280.0, None),
                row("Alpha", "Asha", "D-1", Some(4), 300.0, Some(8.1)),
                row("Alpha", "Asha", "D-2", Some(6), 310.0, Some(8.2)),
                row("Alpha", "Bala", "D-3", Some(8), 305.5, Some(8.4)),
                row("", "Kiran", "D-5", None, 290.0, None),
            ],
        )
    }

    #[test]
    fn mean_of_four_six_eight_is_six() {
        let alpha = crate::data::filter::filter(
            &summary(),
            VILLAGE,
            &[CellValue::from("Alpha")].into_iter().collect(),
        );
        let kpis = summarize(&alpha);
        assert_eq!(kpis.mean_irrigation, Some(6.0));
        assert_eq!(kpis.device_count, 3);
        assert_eq!(kpis.farmer_count, 2);
    }

    #[test]
    fn summarize_ignores_missing_values() {
        let kpis = summarize(&summary());
        assert_eq!(kpis.device_count, 5);
        assert_eq!(kpis.farmer_count, 4);
        assert_eq!(kpis.mean_irrigation, Some(23.0 / 4.0));
        assert_eq!(kpis.mean_yield, Some((280.0 + 300.0 + 310.0 + 305.5 + 290.0) / 5.0));
    }

    #[test]
    fn summarize_empty_table_has_no_means() {
        let kpis = summarize(&summary().select_rows(&[]));
        assert_eq!(kpis.device_count, 0);
        assert_eq!(kpis.mean_irrigation, None);
        assert_eq!(kpis.mean_yield, None);
    }

    #[test]
    fn group_mean_one_row_per_distinct_key_sorted() {
        let t = summary();
        let g = group_mean(&t, VILLAGE, &[IRRIGATION_COUNT, YIELD, RAIN_WATER]);

        assert_eq!(g.rows.len(), t.unique_values(VILLAGE).len());
        assert_eq!(g.rows[0].key, CellValue::from("Alpha"));
        assert_eq!(g.rows[1].key, CellValue::from("Beta"));
        assert_eq!(g.rows[0].means, vec![Some(6.0), Some(305.17), Some(8.23)]);
        assert_eq!(g.rows[1].means, vec![Some(5.0), Some(280.0), None]);
    }

    #[test]
    fn metric_extracts_one_column() {
        let g = group_mean(&summary(), VILLAGE, &[IRRIGATION_COUNT, YIELD]);
        let yields = g.metric(YIELD);
        assert_eq!(yields[1], (CellValue::from("Beta"), Some(280.0)));
        assert!(g.metric("Unknown").is_empty());
    }

    #[test]
    fn rounding_is_idempotent() {
        for x in [6.0, 305.17, 8.23, 0.1, 1234.56, -3.33] {
            assert_eq!(round2(round2(x)), round2(x));
            assert_eq!(round2(x), x);
        }
        assert_eq!(round2(305.1666), 305.17);
    }
}
