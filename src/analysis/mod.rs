mod allometry;
mod climate_response;
mod projection;
mod aggregate;
mod analyzer;

pub use allometry::{
    above_ground_biomass, co2_equivalent, total_biomass, CHAVE_COEFFICIENT, CHAVE_EXPONENT,
    CO2_PER_CARBON,
};
pub use climate_response::{
    climate_multiplier, multiplier_for, rain_factor, temperature_factor, MAX_MULTIPLIER,
    MIN_MULTIPLIER,
};
pub use projection::{co2_per_tree, project_sequestration, trees_alive};
pub use aggregate::{project_many, sum_yearly_across_species};
pub use analyzer::Projector;
