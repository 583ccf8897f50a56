use eframe::egui::{self, Color32, ScrollArea, Ui};

use crate::data::model::{FARMER, IRRIGATION_COUNT, VILLAGE, YIELD};
use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Widgets only record what the user did; state changes after drawing.
        let mut actions = Vec::new();

        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &mut actions);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state, &mut actions);
            });

        // ---- Central panel: tab content ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| match self.state.active_tab {
                    Tab::Overview => overview_tab(ui, &self.state),
                    Tab::Farmers => farmer_tab(ui, &self.state),
                });
        });

        for action in actions {
            self.state.apply(action);
        }
    }
}

fn no_data(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Open a workbook to view the dashboard  (File → Open…)");
    });
}

// ---------------------------------------------------------------------------
// Overall summary
// ---------------------------------------------------------------------------

fn overview_tab(ui: &mut Ui, state: &AppState) {
    let (Some(ds), Some(view)) = (&state.dataset, &state.overview) else {
        no_data(ui);
        return;
    };

    let villages = ds.summary.unique_values(VILLAGE).len();
    ui.heading(format!("📊 Overall Summary – {}", state.config.season));
    ui.label(format!(
        "{} devices from {}",
        view.kpis.device_count,
        panels::selection_caption(&state.village_filter, villages, "villages")
    ));
    ui.add_space(6.0);

    tables::kpi_tiles(ui, &view.kpis, &state.config.season);
    ui.add_space(12.0);

    if view.village_means.is_empty() {
        ui.label("No summary rows match the selected villages.");
        return;
    }

    ui.heading("🌍 Village-wise Charts");
    ui.columns(2, |cols| {
        cols[0].strong("Village-wise Avg No of Irrigation");
        plot::category_bar_chart(
            &mut cols[0],
            "village_irrigation",
            IRRIGATION_COUNT,
            &view.village_means.metric(IRRIGATION_COUNT),
            &state.village_colors,
        );
        cols[1].strong("Village-wise Avg Yield");
        plot::category_bar_chart(
            &mut cols[1],
            "village_yield",
            YIELD,
            &view.village_means.metric(YIELD),
            &state.village_colors,
        );
    });
    ui.add_space(12.0);

    ui.heading("🔔 Distribution Curves");
    plot::density_plot(
        ui,
        "water_density",
        "lakh L/acre",
        &[
            (
                "Irrigated Water",
                view.irrigated_water_density.as_slice(),
                Color32::from_rgb(66, 133, 244),
            ),
            (
                "Total Water Used",
                view.total_water_density.as_slice(),
                Color32::from_rgb(244, 160, 0),
            ),
        ],
    );
    ui.add_space(12.0);

    ui.heading("📋 Village-wise Averages");
    tables::grouped_means_table(ui, "village_table", &view.village_means);
}

// ---------------------------------------------------------------------------
// Farmer summary
// ---------------------------------------------------------------------------

fn farmer_tab(ui: &mut Ui, state: &AppState) {
    let (Some(ds), Some(view)) = (&state.dataset, &state.farmers) else {
        no_data(ui);
        return;
    };

    let farmers = ds.raw.unique_values(FARMER).len();
    ui.heading("👩‍🌾 Farmer Summary");
    ui.label(format!(
        "{} readings from {}",
        view.row_count,
        panels::selection_caption(&state.farmer_filter, farmers, "farmers")
    ));
    ui.add_space(6.0);

    ui.heading("📋 Farmer Details");
    tables::table_grid(ui, "farmer_details", &view.details);
    ui.add_space(12.0);

    if let Some(irrigation) = &view.irrigation_per_farmer {
        ui.heading("📊 Irrigation Count per Farmer");
        plot::category_bar_chart(
            ui,
            "farmer_irrigation",
            IRRIGATION_COUNT,
            &irrigation.metric(IRRIGATION_COUNT),
            &state.farmer_colors,
        );
        ui.add_space(12.0);
    }

    ui.heading("📈 Moisture Variation Over Time");
    plot::moisture_plot(ui, &view.moisture, &state.farmer_colors);
}
