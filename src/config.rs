use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::density::DEFAULT_GRID_POINTS;
use crate::data::model::{RAW_SCHEMA, SUMMARY_SCHEMA};

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Settings read from an optional JSON file. Every field has a default, so
/// `{}` is a valid configuration.
///
/// ```json
/// {
///   "title": "Sugarcane Project Dashboard",
///   "season": "Kharif 2024",
///   "data_path": "summary.xlsx",
///   "summary_sheet": "summary",
///   "raw_sheet": "raw",
///   "kde_grid_points": 200
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Window title.
    pub title: String,
    /// Season label shown in the KPI row. The data covers a single season.
    pub season: String,
    /// Workbook or sheet directory opened at start-up.
    pub data_path: Option<PathBuf>,
    pub summary_sheet: String,
    pub raw_sheet: String,
    /// Resolution of the distribution curves.
    pub kde_grid_points: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Sugarcane Project Dashboard".to_string(),
            season: "Kharif 2024".to_string(),
            data_path: None,
            summary_sheet: SUMMARY_SCHEMA.default_sheet.to_string(),
            raw_sheet: RAW_SCHEMA.default_sheet.to_string(),
            kde_grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

impl DashboardConfig {
    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(text)?;
        anyhow::ensure!(
            config.kde_grid_points >= 2,
            "kde_grid_points must be at least 2, got {}",
            config.kde_grid_points
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(DashboardConfig::from_json("{}").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let json = r#"{
            "season": "Rabi 2025",
            "data_path": "data/summary.xlsx",
            "raw_sheet": "readings"
        }"#;
        let cfg = DashboardConfig::from_json(json).unwrap();
        assert_eq!(cfg.season, "Rabi 2025");
        assert_eq!(cfg.data_path, Some(PathBuf::from("data/summary.xlsx")));
        assert_eq!(cfg.raw_sheet, "readings");
        assert_eq!(cfg.summary_sheet, "summary");
    }

    #[test]
    fn tiny_grid_is_rejected() {
        assert!(DashboardConfig::from_json(r#"{ "kde_grid_points": 1 }"#).is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{ "title": "Pilot" }"#).unwrap();
        assert_eq!(DashboardConfig::load(&path).unwrap().title, "Pilot");
        assert!(DashboardConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
