use serde::{Deserialize, Serialize};

/// One point on a species' growth curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    /// Species identifier (scientific name)
    pub species_id: String,
    /// Stand age in years
    pub age_years: u32,
    /// Diameter at breast height in centimetres
    pub diameter_cm: f64,
    /// Total height in metres
    pub height_m: f64,
}

impl GrowthRecord {
    pub fn new(species_id: impl Into<String>, age_years: u32, diameter_cm: f64, height_m: f64) -> Self {
        Self {
            species_id: species_id.into(),
            age_years,
            diameter_cm,
            height_m,
        }
    }
}

/// Normalized growth-curve row as held by a repository.
///
/// Diameter and height stay optional here so that a dataset lacking either
/// column is reported as a missing field at lookup time rather than at load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRow {
    pub species_id: String,
    pub age_years: u32,
    pub diameter_cm: Option<f64>,
    pub height_m: Option<f64>,
}

impl GrowthRow {
    /// Convert into a `GrowthRecord`, failing with `MissingField` on absent measurements.
    pub fn to_record(&self) -> Result<GrowthRecord, crate::error::CarbonError> {
        let diameter_cm = self
            .diameter_cm
            .ok_or_else(|| crate::error::CarbonError::missing_field(&self.species_id, "diameter_cm"))?;
        let height_m = self
            .height_m
            .ok_or_else(|| crate::error::CarbonError::missing_field(&self.species_id, "height_m"))?;
        Ok(GrowthRecord::new(
            self.species_id.clone(),
            self.age_years,
            diameter_cm,
            height_m,
        ))
    }
}

impl From<GrowthRecord> for GrowthRow {
    fn from(record: GrowthRecord) -> Self {
        Self {
            species_id: record.species_id,
            age_years: record.age_years,
            diameter_cm: Some(record.diameter_cm),
            height_m: Some(record.height_m),
        }
    }
}
