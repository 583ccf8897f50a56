use chrono::NaiveDateTime;

use super::model::{CellValue, Table};

/// One `(timestamp, value)` point of a time series.
pub type SeriesPoint = (NaiveDateTime, f64);

/// The time series of one entity (e.g. one farmer's moisture readings).
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySeries {
    pub entity: CellValue,
    pub points: Vec<SeriesPoint>,
}

/// Points of the rows whose `entity_column` equals `entity`, in table order.
///
/// Rows with no timestamp or no numeric value are skipped.
pub fn series_for(
    table: &Table,
    entity_column: &str,
    entity: &CellValue,
    time_column: &str,
    value_column: &str,
) -> Vec<SeriesPoint> {
    (0..table.len())
        .filter(|&row| table.value(row, entity_column) == entity)
        .filter_map(|row| {
            let t = table.value(row, time_column).as_date()?;
            let v = table.value(row, value_column).as_f64()?;
            Some((t, v))
        })
        .collect()
}

/// One series per distinct entity, entities in order of first appearance.
pub fn series_by_entity(
    table: &Table,
    entity_column: &str,
    time_column: &str,
    value_column: &str,
) -> Vec<EntitySeries> {
    let mut entities: Vec<&CellValue> = Vec::new();
    for value in table.column_values(entity_column) {
        if !value.is_null() && !entities.contains(&value) {
            entities.push(value);
        }
    }

    entities
        .into_iter()
        .map(|entity| EntitySeries {
            entity: entity.clone(),
            points: series_for(table, entity_column, entity, time_column, value_column),
        })
        .collect()
}

/// Stable sort by timestamp. Sheets are not guaranteed to be in time order and
/// a line chart drawn in row order zig-zags.
pub fn sorted_by_time(mut points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    points.sort_by_key(|(t, _)| *t);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_datetime;
    use crate::data::model::{FARMER, MOISTURE, TIMESTAMP};

    fn at(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn readings() -> Table {
        Table::new(
            vec![FARMER.into(), TIMESTAMP.into(), MOISTURE.into()],
            vec![
                vec!["Ravi".into(), at("2024-07-03").into(), 28.0.into()],
                vec!["Asha".into(), at("2024-07-02").into(), 31.5.into()],
                vec!["Ravi".into(), at("2024-07-01").into(), 30.25.into()],
                vec!["Asha".into(), CellValue::Null, 29.0.into()],
                vec!["Asha".into(), at("2024-07-04").into(), CellValue::Null],
            ],
        )
    }

    #[test]
    fn series_keeps_table_order() {
        let s = series_for(&readings(), FARMER, &"Ravi".into(), TIMESTAMP, MOISTURE);
        assert_eq!(s, vec![(at("2024-07-03"), 28.0), (at("2024-07-01"), 30.25)]);
    }

    #[test]
    fn incomplete_rows_are_skipped() {
        let s = series_for(&readings(), FARMER, &"Asha".into(), TIMESTAMP, MOISTURE);
        assert_eq!(s, vec![(at("2024-07-02"), 31.5)]);
    }

    #[test]
    fn empty_table_gives_empty_series() {
        let empty = readings().select_rows(&[]);
        assert!(series_for(&empty, FARMER, &"Asha".into(), TIMESTAMP, MOISTURE).is_empty());
        assert!(series_by_entity(&empty, FARMER, TIMESTAMP, MOISTURE).is_empty());
    }

    #[test]
    fn entities_in_first_appearance_order() {
        let all = series_by_entity(&readings(), FARMER, TIMESTAMP, MOISTURE);
        let names: Vec<String> = all.iter().map(|s| s.entity.to_string()).collect();
        assert_eq!(names, vec!["Ravi", "Asha"]);
    }

    #[test]
    fn sorting_orders_by_timestamp() {
        let s = series_for(&readings(), FARMER, &"Ravi".into(), TIMESTAMP, MOISTURE);
        let sorted = sorted_by_time(s);
        assert_eq!(sorted[0].0, at("2024-07-01"));
        assert_eq!(sorted[1].0, at("2024-07-03"));
    }
}
