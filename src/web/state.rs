use std::sync::Arc;

use crate::config::ProjectionDefaults;
use crate::io::{ClimateLookup, SpeciesRepository};

/// Shared, read-only state handed to every request.
///
/// Nothing is written after startup; requests never see each other.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn SpeciesRepository>,
    pub climate: Arc<dyn ClimateLookup>,
    pub defaults: ProjectionDefaults,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn SpeciesRepository>,
        climate: Arc<dyn ClimateLookup>,
        defaults: ProjectionDefaults,
    ) -> Self {
        Self {
            repository,
            climate,
            defaults,
        }
    }

    /// Release climate resources before shutdown.
    pub fn shutdown(&self) {
        self.climate.close();
    }
}
