use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{GroupedMeans, Kpis};
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// KPI tiles
// ---------------------------------------------------------------------------

/// Mean for a tile; a dash when the selection has no values.
pub fn format_mean(value: Option<f64>) -> String {
    value.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"))
}

/// The row of headline tiles on the overview tab.
pub fn kpi_tiles(ui: &mut Ui, kpis: &Kpis, season: &str) {
    let tiles = [
        ("Total Devices", kpis.device_count.to_string()),
        ("Total Farmers", kpis.farmer_count.to_string()),
        ("Avg No. of Irrigation", format_mean(kpis.mean_irrigation)),
        ("Avg Yield (qtl/acre)", format_mean(kpis.mean_yield)),
        ("Season", season.to_string()),
    ];

    ui.columns(tiles.len(), |cols| {
        for (col, (title, value)) in cols.iter_mut().zip(tiles) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).weak());
                ui.heading(value);
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Grids
// ---------------------------------------------------------------------------

/// Grouped means as a grid: group key, then one column per metric.
pub fn grouped_means_table(ui: &mut Ui, id: &str, means: &GroupedMeans) {
    let header: Vec<&str> = std::iter::once(means.group_column.as_str())
        .chain(means.metric_columns.iter().map(String::as_str))
        .collect();
    let rows: Vec<Vec<String>> = means
        .rows
        .iter()
        .map(|row| {
            std::iter::once(row.key.to_string())
                .chain(row.means.iter().map(|m| format_mean(*m)))
                .collect()
        })
        .collect();
    grid(ui, id, &header, &rows);
}

/// A whole [`Table`] as a grid.
pub fn table_grid(ui: &mut Ui, id: &str, table: &Table) {
    let header: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();
    grid(ui, id, &header, &rows);
}

fn grid(ui: &mut Ui, id: &str, header: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        ui.label(RichText::new("No rows for this selection.").weak());
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .columns(Column::auto().at_least(80.0), header.len())
            .header(20.0, |mut head| {
                for name in header {
                    head.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(18.0, |mut cells| {
                        for value in row {
                            cells.col(|ui: &mut Ui| {
                                ui.label(value);
                            });
                        }
                    });
                }
            });
    });
}
