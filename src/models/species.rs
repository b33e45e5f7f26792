use serde::{Deserialize, Serialize};

use crate::error::CarbonError;

/// Default proportion of dry biomass that is elemental carbon (IPCC).
pub const DEFAULT_CARBON_FRACTION: f64 = 0.47;
/// Default below-ground to above-ground biomass ratio.
pub const DEFAULT_ROOT_TO_SHOOT_RATIO: f64 = 0.27;
/// Default proportion of trees surviving each year.
pub const DEFAULT_ANNUAL_SURVIVAL_RATE: f64 = 0.95;

/// Physiological parameters for one species, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParameters {
    pub species_id: String,
    /// Basic wood density in g/cm³
    pub wood_density_g_cm3: f64,
    /// Carbon fraction of dry biomass, in (0, 1]
    pub carbon_fraction: f64,
    /// Below-ground / above-ground biomass ratio
    pub root_to_shoot_ratio: f64,
    /// Annual survival rate, in (0, 1]
    pub annual_survival_rate: f64,
}

impl SpeciesParameters {
    /// Parameters with the given wood density and default everything else.
    pub fn with_defaults(species_id: impl Into<String>, wood_density_g_cm3: f64) -> Self {
        Self {
            species_id: species_id.into(),
            wood_density_g_cm3,
            carbon_fraction: DEFAULT_CARBON_FRACTION,
            root_to_shoot_ratio: DEFAULT_ROOT_TO_SHOOT_RATIO,
            annual_survival_rate: DEFAULT_ANNUAL_SURVIVAL_RATE,
        }
    }

    /// Check the parameter domains. Returns `CarbonError::InvalidInput` on failure.
    pub fn validate(&self) -> Result<(), CarbonError> {
        if !(self.wood_density_g_cm3.is_finite() && self.wood_density_g_cm3 > 0.0) {
            return Err(CarbonError::InvalidInput(format!(
                "{}: wood density must be positive, got {}",
                self.species_id, self.wood_density_g_cm3
            )));
        }
        if !(self.carbon_fraction > 0.0 && self.carbon_fraction <= 1.0) {
            return Err(CarbonError::InvalidInput(format!(
                "{}: carbon fraction must be in (0, 1], got {}",
                self.species_id, self.carbon_fraction
            )));
        }
        if !(self.root_to_shoot_ratio.is_finite() && self.root_to_shoot_ratio >= 0.0) {
            return Err(CarbonError::InvalidInput(format!(
                "{}: root-to-shoot ratio must be non-negative, got {}",
                self.species_id, self.root_to_shoot_ratio
            )));
        }
        if !(self.annual_survival_rate > 0.0 && self.annual_survival_rate <= 1.0) {
            return Err(CarbonError::InvalidInput(format!(
                "{}: annual survival rate must be in (0, 1], got {}",
                self.species_id, self.annual_survival_rate
            )));
        }
        Ok(())
    }
}

/// Species master row as loaded from a dataset; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRow {
    pub species_id: String,
    pub wood_density_g_cm3: Option<f64>,
    pub carbon_fraction: Option<f64>,
    pub root_to_shoot_ratio: Option<f64>,
    pub annual_survival_rate: Option<f64>,
}

impl SpeciesRow {
    pub fn new(species_id: impl Into<String>) -> Self {
        Self {
            species_id: species_id.into(),
            ..Default::default()
        }
    }

    /// Apply defaults and validate.
    ///
    /// Wood density has no default: its absence is `MissingField`.
    pub fn resolve(&self) -> Result<SpeciesParameters, CarbonError> {
        let wood_density_g_cm3 = self
            .wood_density_g_cm3
            .ok_or_else(|| CarbonError::missing_field(&self.species_id, "wood_density_g_cm3"))?;
        let params = SpeciesParameters {
            species_id: self.species_id.clone(),
            wood_density_g_cm3,
            carbon_fraction: self.carbon_fraction.unwrap_or(DEFAULT_CARBON_FRACTION),
            root_to_shoot_ratio: self
                .root_to_shoot_ratio
                .unwrap_or(DEFAULT_ROOT_TO_SHOOT_RATIO),
            annual_survival_rate: self
                .annual_survival_rate
                .unwrap_or(DEFAULT_ANNUAL_SURVIVAL_RATE),
        };
        params.validate()?;
        Ok(params)
    }
}

impl From<SpeciesParameters> for SpeciesRow {
    fn from(params: SpeciesParameters) -> Self {
        Self {
            species_id: params.species_id,
            wood_density_g_cm3: Some(params.wood_density_g_cm3),
            carbon_fraction: Some(params.carbon_fraction),
            root_to_shoot_ratio: Some(params.root_to_shoot_ratio),
            annual_survival_rate: Some(params.annual_survival_rate),
        }
    }
}
