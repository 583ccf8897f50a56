use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::cache::TableCache;
use crate::data::error::DataError;
use crate::data::filter::{Selection, all_selected};
use crate::data::model::{CellValue, FARMER, RAW_SCHEMA, SUMMARY_SCHEMA, Table, VILLAGE};
use crate::view::{FarmerView, OverviewView};

// ---------------------------------------------------------------------------
// Tabs and user actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Farmers,
}

/// A user interaction. Widgets emit these; [`AppState::apply`] handles them
/// and recomputes the affected view.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenResource(PathBuf),
    ToggleVillage(CellValue),
    SelectAllVillages,
    ClearVillages,
    ToggleFarmer(CellValue),
    SelectAllFarmers,
    ClearFarmers,
    SwitchTab(Tab),
}

// ---------------------------------------------------------------------------
// Loaded dataset
// ---------------------------------------------------------------------------

/// Both sheets of one resource.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub resource: PathBuf,
    pub summary: Arc<Table>,
    pub raw: Arc<Table>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Sheets read so far, keyed by (resource, sheet).
    cache: TableCache,

    /// Loaded dataset (None until a resource loads successfully).
    pub dataset: Option<Dataset>,

    pub village_filter: Selection,
    pub farmer_filter: Selection,

    /// Pipeline outputs for the current selections.
    pub overview: Option<OverviewView>,
    pub farmers: Option<FarmerView>,

    /// Colours per village / per farmer, fixed for the loaded dataset.
    pub village_colors: ColorMap,
    pub farmer_colors: ColorMap,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: TableCache::new(),
            dataset: None,
            village_filter: Selection::new(),
            farmer_filter: Selection::new(),
            overview: None,
            farmers: None,
            village_colors: ColorMap::default(),
            farmer_colors: ColorMap::default(),
            active_tab: Tab::default(),
            status_message: None,
        }
    }

    /// Handle one user action.
    pub fn apply(&mut self, action: Action) {
        log::debug!("Applying {action:?}");
        match action {
            Action::OpenResource(path) => self.open(&path),
            Action::ToggleVillage(value) => {
                toggle(&mut self.village_filter, value);
                self.refresh_overview();
            }
            Action::SelectAllVillages => {
                if let Some(ds) = &self.dataset {
                    self.village_filter = all_selected(&ds.summary, VILLAGE);
                }
                self.refresh_overview();
            }
            Action::ClearVillages => {
                self.village_filter.clear();
                self.refresh_overview();
            }
            Action::ToggleFarmer(value) => {
                toggle(&mut self.farmer_filter, value);
                self.refresh_farmers();
            }
            Action::SelectAllFarmers => {
                if let Some(ds) = &self.dataset {
                    self.farmer_filter = all_selected(&ds.raw, FARMER);
                }
                self.refresh_farmers();
            }
            Action::ClearFarmers => {
                self.farmer_filter.clear();
                self.refresh_farmers();
            }
            Action::SwitchTab(tab) => self.active_tab = tab,
        }
    }

    /// Load both sheets of `resource` and reset the selections.
    ///
    /// Any failure drops the current dataset: the dashboard shows the error
    /// rather than aggregates of a half-loaded resource.
    pub fn open(&mut self, resource: &Path) {
        match self.load(resource) {
            Ok(dataset) => {
                log::info!(
                    "Opened {}: {} summary rows, {} raw rows ({} sheets cached)",
                    resource.display(),
                    dataset.summary.len(),
                    dataset.raw.len(),
                    self.cache.len()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to open {}: {e}", resource.display());
                self.dataset = None;
                self.overview = None;
                self.farmers = None;
                self.village_filter.clear();
                self.farmer_filter.clear();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn load(&self, resource: &Path) -> Result<Dataset, DataError> {
        let summary = self
            .cache
            .get_or_load(resource, &self.config.summary_sheet, &SUMMARY_SCHEMA)?;
        let raw = self
            .cache
            .get_or_load(resource, &self.config.raw_sheet, &RAW_SCHEMA)?;
        Ok(Dataset {
            resource: resource.to_path_buf(),
            summary,
            raw,
        })
    }

    /// Ingest a newly loaded dataset: select everything, build colours and views.
    fn set_dataset(&mut self, dataset: Dataset) {
        self.village_filter = all_selected(&dataset.summary, VILLAGE);
        self.farmer_filter = all_selected(&dataset.raw, FARMER);
        self.village_colors = ColorMap::new(&dataset.summary.unique_values(VILLAGE));
        self.farmer_colors = ColorMap::new(&dataset.raw.unique_values(FARMER));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh_overview();
        self.refresh_farmers();
    }

    /// Recompute the overview after a village selection change.
    fn refresh_overview(&mut self) {
        self.overview = self.dataset.as_ref().map(|ds| {
            OverviewView::compute(&ds.summary, &self.village_filter, self.config.kde_grid_points)
        });
    }

    /// Recompute the farmer view after a farmer selection change.
    fn refresh_farmers(&mut self) {
        self.farmers = self
            .dataset
            .as_ref()
            .map(|ds| FarmerView::compute(&ds.raw, &self.farmer_filter));
    }
}

fn toggle(selection: &mut Selection, value: CellValue) {
    if !selection.remove(&value) {
        selection.insert(value);
    }
}
