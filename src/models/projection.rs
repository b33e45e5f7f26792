use serde::{Deserialize, Serialize};

use super::ClimateDebug;

/// A single year of a sequestration projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub age_years: u32,
    /// Expected surviving trees (real-valued; round only for display)
    pub trees_alive: f64,
    /// CO₂ attributed to this age, in metric tons
    pub co2_year_tons: f64,
    /// Running total of `co2_year_tons`, in metric tons
    pub co2_cumulative_tons: f64,
}

/// Projection time series for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub species_id: String,
    pub points: Vec<ProjectionPoint>,
    /// Present whenever a climate sample was supplied, even an unusable one
    pub climate_debug: Option<ClimateDebug>,
}

impl ProjectionResult {
    /// Cumulative CO₂ at the last retained age, in metric tons.
    pub fn total_co2_tons(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.co2_cumulative_tons)
            .unwrap_or(0.0)
    }

    /// Ages covered by the series, in order.
    pub fn ages(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.age_years).collect()
    }

    /// Climate multiplier applied to the series (1.0 without climate).
    pub fn climate_multiplier(&self) -> f64 {
        self.climate_debug
            .as_ref()
            .map(|d| d.multiplier)
            .unwrap_or(1.0)
    }

    /// One-line human summary of the scenario outcome.
    pub fn summary(&self, trees: u32, years: u32) -> String {
        format!(
            "Planting {trees} {} trees will sequester ~{:.2} metric tons of CO₂ over {years} years.",
            self.species_id,
            self.total_co2_tons()
        )
    }
}

/// Sum of yearly CO₂ across species at one age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyTotal {
    pub age_years: u32,
    pub co2_year_tons: f64,
}
