pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

#[cfg(feature = "web")]
pub mod web;

pub use analysis::Projector;
pub use config::AppConfig;
pub use error::CarbonError;
pub use io::{ClimateLookup, InMemoryRepository, SpeciesRepository};
pub use models::{
    ClimateDebug, ClimateSample, GrowthRecord, ProjectionPoint, ProjectionResult,
    SpeciesParameters, YearlyTotal,
};
