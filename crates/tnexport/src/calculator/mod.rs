//! TN load reduction arithmetic over the calculator exports.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Unit conversion for point sources: MGD × mg/L → tons of TN per year.
pub const POINT_SOURCE_FACTOR: f64 = 1.524;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LandUseEntry {
    pub name: String,
    pub base_load: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreatmentEntry {
    pub name: String,
    pub removal_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalculatorTables {
    pub land_uses: Vec<LandUseEntry>,
    pub treatments: Vec<TreatmentEntry>,
}

impl CalculatorTables {
    pub fn load(land_use_path: &Path, treatment_path: &Path) -> Result<Self> {
        Ok(Self {
            land_uses: read_json_array(land_use_path)?,
            treatments: read_json_array(treatment_path)?,
        })
    }

    /// Exact name match; unknown land uses contribute no load.
    #[must_use]
    pub fn base_load(&self, land_use: &str) -> f64 {
        self.land_uses
            .iter()
            .find(|entry| entry.name == land_use)
            .map_or(0.0, |entry| entry.base_load)
    }

    #[must_use]
    pub fn removal_rate(&self, treatment: &str) -> f64 {
        self.treatments
            .iter()
            .find(|entry| entry.name == treatment)
            .map_or(0.0, |entry| entry.removal_rate)
    }

    /// Non-point source reduction: base load × treated area × removal rate.
    #[must_use]
    pub fn nps_reduction(&self, land_use: &str, treatment: &str, area: f64) -> f64 {
        self.base_load(land_use) * area * self.removal_rate(treatment)
    }
}

/// Point source reduction; `attenuation_percent` is 0 to 100.
#[must_use]
pub fn ps_reduction(discharge_mgd: f64, concentration_mg_l: f64, attenuation_percent: f64) -> f64 {
    POINT_SOURCE_FACTOR * (discharge_mgd * concentration_mg_l * (attenuation_percent / 100.0))
}

fn read_json_array<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read calculator table: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("calculator table is not a valid export: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{CalculatorTables, LandUseEntry, TreatmentEntry, ps_reduction};

    fn tables() -> CalculatorTables {
        CalculatorTables {
            land_uses: vec![LandUseEntry {
                name: "Commercial".to_string(),
                base_load: 12.5,
            }],
            treatments: vec![TreatmentEntry {
                name: "Wet Pond".to_string(),
                removal_rate: 0.4,
            }],
        }
    }

    #[test]
    fn nps_multiplies_load_area_and_rate() {
        let reduction = tables().nps_reduction("Commercial", "Wet Pond", 2.0);
        assert!((reduction - 10.0).abs() < 1e-9, "got {reduction}");
    }

    #[test]
    fn unknown_names_contribute_nothing() {
        assert_eq!(tables().nps_reduction("Forest", "Wet Pond", 2.0), 0.0);
        assert_eq!(tables().nps_reduction("Commercial", "commercial", 2.0), 0.0);
    }

    #[test]
    fn ps_applies_conversion_factor_and_percent() {
        let reduction = ps_reduction(2.0, 5.0, 50.0);
        assert!((reduction - 7.62).abs() < 1e-9, "got {reduction}");
    }
}
