use crate::data::aggregate::{GroupedMeans, Kpis, group_mean, summarize};
use crate::data::density::gaussian_kde;
use crate::data::filter::{Selection, filter};
use crate::data::model::{
    DEVICE, FARMER, FATHER, IRRIGATED_WATER, IRRIGATION_COUNT, MOBILE, MOISTURE, RAIN_WATER,
    TIMESTAMP, TOTAL_WATER, Table, VILLAGE, YIELD,
};
use crate::data::series::{EntitySeries, series_by_entity, sorted_by_time};

/// Metrics averaged per village, in table column order.
pub const VILLAGE_METRICS: [&str; 5] = [
    IRRIGATION_COUNT,
    TOTAL_WATER,
    IRRIGATED_WATER,
    RAIN_WATER,
    YIELD,
];

/// Identity columns of the farmer details table.
pub const FARMER_DETAIL_COLUMNS: [&str; 5] = [FARMER, FATHER, MOBILE, VILLAGE, DEVICE];

// ---------------------------------------------------------------------------
// Overall summary tab
// ---------------------------------------------------------------------------

/// Everything the "Overall Summary" tab draws for one village selection.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewView {
    pub row_count: usize,
    pub kpis: Kpis,
    /// Per-village means of [`VILLAGE_METRICS`].
    pub village_means: GroupedMeans,
    pub irrigated_water_density: Vec<[f64; 2]>,
    pub total_water_density: Vec<[f64; 2]>,
}

impl OverviewView {
    pub fn compute(summary: &Table, villages: &Selection, grid_points: usize) -> Self {
        let filtered = filter(summary, VILLAGE, villages);
        OverviewView {
            row_count: filtered.len(),
            kpis: summarize(&filtered),
            village_means: group_mean(&filtered, VILLAGE, &VILLAGE_METRICS),
            irrigated_water_density: gaussian_kde(
                filtered.column_values(IRRIGATED_WATER),
                grid_points,
            ),
            total_water_density: gaussian_kde(filtered.column_values(TOTAL_WATER), grid_points),
        }
    }
}

// ---------------------------------------------------------------------------
// Farmer summary tab
// ---------------------------------------------------------------------------

/// Everything the "Farmer Summary" tab draws for one farmer selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmerView {
    pub row_count: usize,
    /// Distinct identity rows, first occurrence order.
    pub details: Table,
    /// Mean irrigation count per farmer; `None` when the sheet has no
    /// irrigation column.
    pub irrigation_per_farmer: Option<GroupedMeans>,
    /// Moisture readings per farmer, each sorted by time.
    pub moisture: Vec<EntitySeries>,
}

impl FarmerView {
    pub fn compute(raw: &Table, farmers: &Selection) -> Self {
        let filtered = filter(raw, FARMER, farmers);

        let irrigation_per_farmer = filtered
            .has_column(IRRIGATION_COUNT)
            .then(|| group_mean(&filtered, FARMER, &[IRRIGATION_COUNT]));

        let moisture = series_by_entity(&filtered, FARMER, TIMESTAMP, MOISTURE)
            .into_iter()
            .map(|s| EntitySeries {
                points: sorted_by_time(s.points),
                ..s
            })
            .collect();

        FarmerView {
            row_count: filtered.len(),
            details: filtered.distinct_rows(&FARMER_DETAIL_COLUMNS),
            irrigation_per_farmer,
            moisture,
        }
    }
}
