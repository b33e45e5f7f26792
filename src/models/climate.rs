use serde::{Deserialize, Serialize};

/// Mean annual climate at a location.
///
/// Both values present or the sample counts as unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateSample {
    /// Mean annual temperature in °C
    pub mean_annual_temp_c: Option<f64>,
    /// Mean annual precipitation in mm
    pub mean_annual_precip_mm: Option<f64>,
}

impl ClimateSample {
    pub fn new(mean_annual_temp_c: f64, mean_annual_precip_mm: f64) -> Self {
        Self {
            mean_annual_temp_c: Some(mean_annual_temp_c),
            mean_annual_precip_mm: Some(mean_annual_precip_mm),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Both values, when present, finite and with non-negative precipitation.
    ///
    /// Partial or malformed samples yield `None`.
    pub fn values(&self) -> Option<(f64, f64)> {
        match (self.mean_annual_temp_c, self.mean_annual_precip_mm) {
            (Some(t), Some(p)) if t.is_finite() && p.is_finite() && p >= 0.0 => Some((t, p)),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.values().is_some()
    }
}

/// Explanation of a climate multiplier: inputs and both response factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateDebug {
    pub temp_c: Option<f64>,
    pub precip_mm: Option<f64>,
    pub temp_factor: Option<f64>,
    pub rain_factor: Option<f64>,
    pub multiplier: f64,
}

impl ClimateDebug {
    /// Debug record for the neutral case (no usable climate data).
    pub fn neutral() -> Self {
        Self {
            temp_c: None,
            precip_mm: None,
            temp_factor: None,
            rain_factor: None,
            multiplier: 1.0,
        }
    }
}
