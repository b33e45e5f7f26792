use std::collections::{BTreeSet, HashMap};

use crate::error::CarbonError;
use crate::models::{GrowthRecord, GrowthRow, SpeciesParameters, SpeciesRow};

/// Read-only source of growth curves and species parameters.
///
/// Implementations must be safe for concurrent reads.
pub trait SpeciesRepository: Send + Sync {
    /// Growth records for a species. `UnknownSpecies` when there are none.
    fn growth_records(&self, species_id: &str) -> Result<Vec<GrowthRecord>, CarbonError>;

    /// Growth records no older than `max_age_years`.
    ///
    /// Rows past the horizon are never converted, so gaps there do not
    /// surface as `MissingField`.
    fn growth_records_within(
        &self,
        species_id: &str,
        max_age_years: u32,
    ) -> Result<Vec<GrowthRecord>, CarbonError> {
        Ok(self
            .growth_records(species_id)?
            .into_iter()
            .filter(|r| r.age_years <= max_age_years)
            .collect())
    }

    /// Resolved parameters for a species. `UnknownSpecies` or `MissingField`.
    fn species_parameters(&self, species_id: &str) -> Result<SpeciesParameters, CarbonError>;

    /// All species ids known to the repository.
    fn species_ids(&self) -> BTreeSet<String>;
}

/// Repository over normalized rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    growth: HashMap<String, Vec<GrowthRow>>,
    species: HashMap<String, SpeciesRow>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from loaded tables.
    ///
    /// Species master rows must be unique per species id.
    pub fn from_rows(
        growth_rows: Vec<GrowthRow>,
        species_rows: Vec<SpeciesRow>,
    ) -> Result<Self, CarbonError> {
        let mut repo = Self::new();
        for row in species_rows {
            if repo.species.contains_key(&row.species_id) {
                return Err(CarbonError::ParseError(format!(
                    "Duplicate species parameters for '{}'",
                    row.species_id
                )));
            }
            repo.insert_species_row(row);
        }
        for row in growth_rows {
            repo.insert_growth_row(row);
        }
        Ok(repo)
    }

    pub fn insert_growth(&mut self, record: GrowthRecord) {
        self.insert_growth_row(record.into());
    }

    pub fn insert_growth_row(&mut self, row: GrowthRow) {
        self.growth
            .entry(row.species_id.clone())
            .or_default()
            .push(row);
    }

    pub fn insert_parameters(&mut self, params: SpeciesParameters) {
        self.insert_species_row(params.into());
    }

    /// Insert or replace the parameter row for a species.
    pub fn insert_species_row(&mut self, row: SpeciesRow) {
        self.species.insert(row.species_id.clone(), row);
    }

    pub fn num_growth_records(&self) -> usize {
        self.growth.values().map(Vec::len).sum()
    }

    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    fn rows(&self, species_id: &str) -> Result<&[GrowthRow], CarbonError> {
        self.growth
            .get(species_id)
            .filter(|rows| !rows.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| CarbonError::UnknownSpecies(species_id.to_string()))
    }
}

impl SpeciesRepository for InMemoryRepository {
    fn growth_records(&self, species_id: &str) -> Result<Vec<GrowthRecord>, CarbonError> {
        self.rows(species_id)?.iter().map(GrowthRow::to_record).collect()
    }

    fn growth_records_within(
        &self,
        species_id: &str,
        max_age_years: u32,
    ) -> Result<Vec<GrowthRecord>, CarbonError> {
        self.rows(species_id)?
            .iter()
            .filter(|row| row.age_years <= max_age_years)
            .map(GrowthRow::to_record)
            .collect()
    }

    fn species_parameters(&self, species_id: &str) -> Result<SpeciesParameters, CarbonError> {
        self.species
            .get(species_id)
            .ok_or_else(|| CarbonError::UnknownSpecies(species_id.to_string()))?
            .resolve()
    }

    fn species_ids(&self) -> BTreeSet<String> {
        self.species.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InMemoryRepository {
        let mut repo = InMemoryRepository::new();
        repo.insert_parameters(SpeciesParameters::with_defaults("Ficus religiosa", 0.48));
        repo.insert_growth(GrowthRecord::new("Ficus religiosa", 3, 6.0, 4.0));
        repo.insert_growth(GrowthRecord::new("Ficus religiosa", 1, 2.0, 1.5));
        repo
    }

    #[test]
    fn test_growth_records_found() {
        let repo = sample();
        let records = repo.growth_records("Ficus religiosa").unwrap();
        assert_eq!(records.len(), 2);
        // Insertion order is preserved; sorting is the engine's job
        assert_eq!(records[0].age_years, 3);
    }

    #[test]
    fn test_unknown_species_growth() {
        let repo = sample();
        assert!(matches!(
            repo.growth_records("Pinus sylvestris"),
            Err(CarbonError::UnknownSpecies(ref id)) if id == "Pinus sylvestris"
        ));
    }

    #[test]
    fn test_unknown_species_parameters() {
        let repo = sample();
        assert!(matches!(
            repo.species_parameters("Pinus sylvestris"),
            Err(CarbonError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn test_species_ids_sorted() {
        let mut repo = sample();
        repo.insert_parameters(SpeciesParameters::with_defaults("Albizia lebbeck", 0.6));
        let ids: Vec<String> = repo.species_ids().into_iter().collect();
        assert_eq!(ids, vec!["Albizia lebbeck", "Ficus religiosa"]);
    }

    #[test]
    fn test_from_rows_rejects_duplicate_parameters() {
        let rows = vec![SpeciesRow::new("X"), SpeciesRow::new("X")];
        assert!(matches!(
            InMemoryRepository::from_rows(vec![], rows),
            Err(CarbonError::ParseError(_))
        ));
    }

    #[test]
    fn test_counts() {
        let repo = sample();
        assert_eq!(repo.num_growth_records(), 2);
        assert_eq!(repo.num_species(), 1);
    }

    #[test]
    fn test_growth_records_within_skips_rows_past_horizon() {
        let mut repo = sample();
        repo.insert_growth_row(GrowthRow {
            species_id: "Ficus religiosa".to_string(),
            age_years: 50,
            diameter_cm: Some(60.0),
            height_m: None,
        });

        let records = repo.growth_records_within("Ficus religiosa", 10).unwrap();
        assert_eq!(records.len(), 2);
        assert!(matches!(
            repo.growth_records_within("Ficus religiosa", 60),
            Err(CarbonError::MissingField { .. })
        ));
        assert!(matches!(
            repo.growth_records_within("Pinus sylvestris", 10),
            Err(CarbonError::UnknownSpecies(_))
        ));
    }
}
