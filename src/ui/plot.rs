use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::ColorMap;
use crate::data::model::CellValue;
use crate::data::series::EntitySeries;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Category bar chart (village-wise / farmer-wise means)
// ---------------------------------------------------------------------------

/// One bar per category, labelled with its value. Categories without a
/// value are left as gaps.
pub fn category_bar_chart(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    values: &[(CellValue, Option<f64>)],
    colors: &ColorMap,
) {
    let names: Vec<String> = values.iter().map(|(k, _)| k.to_string()).collect();

    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .filter_map(|(i, (key, v))| {
            let v = (*v)?;
            Some(
                Bar::new(i as f64, v)
                    .name(key.to_string())
                    .fill(colors.color_for(key))
                    .width(0.6),
            )
        })
        .collect();

    let labels: Vec<(f64, f64)> = bars.iter().map(|b| (b.argument, b.value)).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(move |mark, _range| category_name(&names, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            for (x, y) in labels {
                plot_ui.text(
                    Text::new(PlotPoint::new(x, y), RichText::new(format!("{y:.2}")).small())
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

/// Axis label for a bar position; blank between bars.
fn category_name(names: &[String], x: f64) -> String {
    if (x - x.round()).abs() > 1e-6 || x < 0.0 {
        return String::new();
    }
    names.get(x.round() as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Distribution curves
// ---------------------------------------------------------------------------

/// Overlaid filled density curves, one per `(name, curve)`.
pub fn density_plot(ui: &mut Ui, id: &str, x_label: &str, curves: &[(&str, &[[f64; 2]], Color32)]) {
    if curves.iter().all(|(_, c, _)| c.is_empty()) {
        ui.label(RichText::new("Not enough data for a distribution curve.").weak());
        return;
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label("Density")
        .show(ui, |plot_ui| {
            for (name, curve, color) in curves {
                let line = Line::new(PlotPoints::from(curve.to_vec()))
                    .name(name)
                    .color(*color)
                    .fill(0.0);
                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Moisture over time
// ---------------------------------------------------------------------------

/// One line with point markers per farmer; x is the reading time.
pub fn moisture_plot(ui: &mut Ui, series: &[EntitySeries], colors: &ColorMap) {
    if series.iter().all(|s| s.points.is_empty()) {
        ui.label(RichText::new("No moisture readings for this selection.").weak());
        return;
    }

    Plot::new("moisture_plot")
        .height(CHART_HEIGHT * 1.3)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Moisture (%)")
        .x_axis_formatter(|mark, _range| format_timestamp(mark.value))
        .label_formatter(|name, point| {
            format!("{name}\n{}\n{:.2} %", format_timestamp(point.x), point.y)
        })
        .show(ui, |plot_ui| {
            for s in series {
                let name = s.entity.to_string();
                let color = colors.color_for(&s.entity);
                let coords: Vec<[f64; 2]> = s
                    .points
                    .iter()
                    .map(|(t, v)| [t.and_utc().timestamp() as f64, *v])
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from(coords.clone()))
                        .name(&name)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .name(&name)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}

/// Seconds since the epoch → calendar date.
fn format_timestamp(secs: f64) -> String {
    chrono::DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_only_at_bar_positions() {
        let names = vec!["Alpha".to_string(), "Beta".to_string()];
        assert_eq!(category_name(&names, 0.0), "Alpha");
        assert_eq!(category_name(&names, 1.0), "Beta");
        assert_eq!(category_name(&names, 0.5), "");
        assert_eq!(category_name(&names, 2.0), "");
        assert_eq!(category_name(&names, -1.0), "");
    }

    #[test]
    fn timestamps_render_as_dates() {
        assert_eq!(format_timestamp(1_719_792_000.0), "2024-07-01");
    }
}
