use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::distinct_count;
use crate::data::filter::Selection;
use crate::data::model::{CellValue, DEVICE, FARMER, VILLAGE};
use crate::state::{Action, AppState, Dataset, Tab};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the filter panel for the active tab: villages on the overview,
/// farmers on the farmer tab.
pub fn side_panel(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let (label, all_values, selected, colors) = match state.active_tab {
        Tab::Overview => (
            "Village",
            dataset.summary.unique_values(VILLAGE),
            &state.village_filter,
            &state.village_colors,
        ),
        Tab::Farmers => (
            "Farmer",
            dataset.raw.unique_values(FARMER),
            &state.farmer_filter,
            &state.farmer_colors,
        ),
    };

    ui.strong(format!("{label}s  ({}/{})", selected.len(), all_values.len()));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            actions.push(match state.active_tab {
                Tab::Overview => Action::SelectAllVillages,
                Tab::Farmers => Action::SelectAllFarmers,
            });
        }
        if ui.small_button("None").clicked() {
            actions.push(match state.active_tab {
                Tab::Overview => Action::ClearVillages,
                Tab::Farmers => Action::ClearFarmers,
            });
        }
    });
    if selected.is_empty() {
        ui.label(RichText::new("Nothing selected: showing all").italics().weak());
    }
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for val in &all_values {
                let mut checked = selected.contains(val);
                let text = RichText::new(val.to_string()).color(colors.color_for(val));
                if ui.checkbox(&mut checked, text).changed() {
                    actions.push(toggle_action(state.active_tab, val));
                }
            }
        });
}

fn toggle_action(tab: Tab, value: &CellValue) -> Action {
    match tab {
        Tab::Overview => Action::ToggleVillage(value.clone()),
        Tab::Farmers => Action::ToggleFarmer(value.clone()),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = open_file_dialog() {
                    actions.push(Action::OpenResource(path));
                }
                ui.close_menu();
            }
        });

        ui.separator();

        for (tab, title) in [
            (Tab::Overview, "📊 Overall Summary"),
            (Tab::Farmers, "👩‍🌾 Farmer Summary"),
        ] {
            if ui.selectable_label(state.active_tab == tab, title).clicked() {
                actions.push(Action::SwitchTab(tab));
            }
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(dataset_caption(ds));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Resource name with its distinct device count and number of readings.
pub fn dataset_caption(ds: &Dataset) -> String {
    format!(
        "{} · {} devices, {} readings",
        ds.resource.display(),
        distinct_count(&ds.summary, DEVICE),
        ds.raw.len()
    )
}

/// Summary line for a selection, e.g. "3 of 5 villages".
pub fn selection_caption(selected: &Selection, total: usize, noun: &str) -> String {
    if selected.is_empty() || selected.len() == total {
        format!("all {total} {noun}")
    } else {
        format!("{} of {total} {noun}", selected.len())
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for a workbook. Sheet directories are opened from the command line.
pub fn open_file_dialog() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open dashboard workbook")
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .pick_file()
}
