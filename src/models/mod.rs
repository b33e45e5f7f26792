mod growth;
mod species;
mod climate;
mod projection;

pub use growth::{GrowthRecord, GrowthRow};
pub use species::{
    SpeciesParameters, SpeciesRow, DEFAULT_ANNUAL_SURVIVAL_RATE, DEFAULT_CARBON_FRACTION,
    DEFAULT_ROOT_TO_SHOOT_RATIO,
};
pub use climate::{ClimateDebug, ClimateSample};
pub use projection::{ProjectionPoint, ProjectionResult, YearlyTotal};
