use std::collections::BTreeSet;

use crate::analysis::{project_many, project_sequestration, sum_yearly_across_species};
use crate::error::CarbonError;
use crate::io::{ClimateLookup, SpeciesRepository};
use crate::models::{ClimateSample, ProjectionResult, YearlyTotal};

/// Unified projection API over a species repository.
pub struct Projector<'a> {
    repository: &'a dyn SpeciesRepository,
}

impl<'a> Projector<'a> {
    /// Create a new Projector backed by the given repository.
    pub fn new(repository: &'a dyn SpeciesRepository) -> Self {
        Self { repository }
    }

    /// Species available for projection, sorted.
    pub fn species_ids(&self) -> BTreeSet<String> {
        self.repository.species_ids()
    }

    /// Project a single species, optionally scaled by a climate sample.
    pub fn project(
        &self,
        species_id: &str,
        years: u32,
        trees: u32,
        climate: Option<&ClimateSample>,
    ) -> Result<ProjectionResult, CarbonError> {
        project_sequestration(self.repository, species_id, years, trees, climate)
    }

    /// Project a single species at a location, sampling climate from `lookup`.
    pub fn project_at(
        &self,
        species_id: &str,
        years: u32,
        trees: u32,
        lookup: &dyn ClimateLookup,
        lat: f64,
        lon: f64,
    ) -> Result<ProjectionResult, CarbonError> {
        let sample = lookup.sample(lat, lon);
        self.project(species_id, years, trees, Some(&sample))
    }

    /// Project several species without climate; fails on the first error.
    pub fn project_many<S: AsRef<str>>(
        &self,
        species_ids: &[S],
        years: u32,
        trees: u32,
    ) -> Result<Vec<ProjectionResult>, CarbonError> {
        project_many(self.repository, species_ids, years, trees)
    }

    /// Project several species and their yearly stacked totals.
    pub fn compare<S: AsRef<str>>(
        &self,
        species_ids: &[S],
        years: u32,
        trees: u32,
    ) -> Result<(Vec<ProjectionResult>, Vec<YearlyTotal>), CarbonError> {
        let results = self.project_many(species_ids, years, trees)?;
        let totals = sum_yearly_across_species(&results);
        Ok((results, totals))
    }
}
