use std::collections::BTreeSet;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Filter predicate: which values of one column are selected
// ---------------------------------------------------------------------------

/// Selected values of one categorical column (village or farmer).
///
/// An empty selection means "no filter": every row is shown. The widgets start
/// with everything selected, so an empty set only arises when the user clears
/// the list, and clearing it falls back to the full table.
pub type Selection = BTreeSet<CellValue>;

/// Initialise a [`Selection`] with every value of `column` selected.
pub fn all_selected(table: &Table, column: &str) -> Selection {
    table.unique_values(column)
}

/// Return indices of rows whose `column` value is in `selected`, in order.
///
/// A row passes when:
/// * `selected` is empty → passes (no constraint)
/// * the row's value for `column` is in the selected set → passes
///
/// Rows without the column read as `Null` and pass only if `Null` is selected.
pub fn filtered_indices(table: &Table, column: &str, selected: &Selection) -> Vec<usize> {
    if selected.is_empty() {
        return (0..table.len()).collect();
    }
    table
        .column_values(column)
        .enumerate()
        .filter(|(_, value)| selected.contains(*value))
        .map(|(i, _)| i)
        .collect()
}

/// Rows of `table` whose `column` value is in `selected`, original order kept.
/// An empty selection returns a copy of the whole table.
pub fn filter(table: &Table, column: &str, selected: &Selection) -> Table {
    if selected.is_empty() {
        return table.clone();
    }
    table.select_rows(&filtered_indices(table, column, selected))
}
