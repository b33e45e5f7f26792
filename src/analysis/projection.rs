use tracing::debug;

use super::allometry::{above_ground_biomass, co2_equivalent, total_biomass};
use super::climate_response::multiplier_for;
use crate::error::CarbonError;
use crate::io::SpeciesRepository;
use crate::models::{
    ClimateSample, GrowthRecord, ProjectionPoint, ProjectionResult, SpeciesParameters,
};

/// Validate the shared scenario parameters (horizon and tree count).
pub(crate) fn check_scenario(years: u32, trees: u32) -> Result<(), CarbonError> {
    if years == 0 {
        return Err(CarbonError::InvalidInput(
            "years must be a positive integer".to_string(),
        ));
    }
    if trees == 0 {
        return Err(CarbonError::InvalidInput(
            "trees must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// CO₂-equivalent stored in a single tree of the given size, in kg.
pub fn co2_per_tree(record: &GrowthRecord, params: &SpeciesParameters) -> Result<f64, CarbonError> {
    let agb = above_ground_biomass(record.diameter_cm, record.height_m, params.wood_density_g_cm3)
        .map_err(|e| match e {
            CarbonError::InvalidInput(msg) => CarbonError::InvalidInput(format!(
                "{} at age {}: {msg}",
                record.species_id, record.age_years
            )),
            other => other,
        })?;
    let biomass = total_biomass(agb, params.root_to_shoot_ratio)?;
    co2_equivalent(biomass, params.carbon_fraction)
}

/// Expected surviving trees after `age_years` of exponential mortality.
pub fn trees_alive(trees: u32, annual_survival_rate: f64, age_years: u32) -> f64 {
    trees as f64 * annual_survival_rate.powf(age_years as f64)
}

/// Project CO₂ sequestration for one species.
///
/// Growth records up to `years` are sorted by age, converted to CO₂ per tree,
/// scaled by surviving trees and, when a climate sample is given, by the
/// climate multiplier. The cumulative column is the running sum of the
/// yearly column.
pub fn project_sequestration<R: SpeciesRepository + ?Sized>(
    repository: &R,
    species_id: &str,
    years: u32,
    trees: u32,
    climate: Option<&ClimateSample>,
) -> Result<ProjectionResult, CarbonError> {
    check_scenario(years, trees)?;

    let records = repository.growth_records_within(species_id, years)?;
    let params = repository.species_parameters(species_id)?;

    let mut retained: Vec<GrowthRecord> = records
        .into_iter()
        .filter(|r| r.age_years <= years)
        .collect();
    retained.sort_by_key(|r| r.age_years);

    if retained.is_empty() {
        return Err(CarbonError::EmptyHorizon {
            species: species_id.to_string(),
            years,
        });
    }

    let (multiplier, climate_debug) = match climate {
        Some(sample) => {
            let (m, d) = multiplier_for(sample);
            (m, Some(d))
        }
        None => (1.0, None),
    };

    debug!(
        species = species_id,
        records = retained.len(),
        years,
        trees,
        multiplier,
        "projecting sequestration"
    );

    let mut points = Vec::with_capacity(retained.len());
    let mut cumulative = 0.0;

    for record in &retained {
        let per_tree_kg = co2_per_tree(record, &params)?;
        let alive = trees_alive(trees, params.annual_survival_rate, record.age_years);
        let co2_year_tons = per_tree_kg * alive / 1000.0 * multiplier;
        cumulative += co2_year_tons;

        points.push(ProjectionPoint {
            age_years: record.age_years,
            trees_alive: alive,
            co2_year_tons,
            co2_cumulative_tons: cumulative,
        });
    }

    Ok(ProjectionResult {
        species_id: species_id.to_string(),
        points,
        climate_debug,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::InMemoryRepository;
    use crate::models::{GrowthRow, SpeciesRow};
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    const TEAK: &str = "Tectona grandis";

    fn teak_repository(survival: f64) -> InMemoryRepository {
        let mut repo = InMemoryRepository::new();
        let mut params = SpeciesParameters::with_defaults(TEAK, 0.6);
        params.annual_survival_rate = survival;
        repo.insert_parameters(params);
        // Deliberately out of order
        for (age, d, h) in [(10, 20.0, 15.0), (2, 4.0, 3.5), (5, 11.0, 8.0), (20, 31.0, 22.0)] {
            repo.insert_growth(GrowthRecord::new(TEAK, age, d, h));
        }
        repo
    }

    #[test]
    fn test_points_sorted_and_filtered() {
        let repo = teak_repository(0.95);
        let result = project_sequestration(&repo, TEAK, 10, 100, None).unwrap();
        assert_eq!(result.ages(), vec![2, 5, 10]);
        assert!(result.climate_debug.is_none());
    }

    #[test]
    fn test_reference_tree_values() {
        let repo = teak_repository(0.95);
        let result = project_sequestration(&repo, TEAK, 10, 100, None).unwrap();
        let last = result.points.last().unwrap();
        let alive = 100.0 * 0.95f64.powi(10);
        assert_approx_eq!(last.trees_alive, alive, 1e-9);
        assert_approx_eq!(last.co2_year_tons, 436.0476 * alive / 1000.0, 1e-3);
    }

    #[test]
    fn test_cumulative_is_running_sum() {
        let repo = teak_repository(0.95);
        let result = project_sequestration(&repo, TEAK, 30, 250, None).unwrap();
        let mut running = 0.0;
        for p in &result.points {
            running += p.co2_year_tons;
            assert_approx_eq!(p.co2_cumulative_tons, running, 1e-9);
        }
        assert_approx_eq!(result.total_co2_tons(), running, 1e-9);
    }

    #[test]
    fn test_empty_horizon() {
        let mut repo = InMemoryRepository::new();
        repo.insert_parameters(SpeciesParameters::with_defaults("Late bloomer", 0.5));
        repo.insert_growth(GrowthRecord::new("Late bloomer", 30, 25.0, 18.0));
        match project_sequestration(&repo, "Late bloomer", 20, 100, None) {
            Err(CarbonError::EmptyHorizon { species, years }) => {
                assert_eq!(species, "Late bloomer");
                assert_eq!(years, 20);
            }
            other => panic!("expected EmptyHorizon, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_species() {
        let repo = teak_repository(0.95);
        assert!(matches!(
            project_sequestration(&repo, "Nonexistent", 10, 100, None),
            Err(CarbonError::UnknownSpecies(ref id)) if id == "Nonexistent"
        ));
    }

    #[test]
    fn test_growth_without_parameters_is_unknown() {
        let mut repo = InMemoryRepository::new();
        repo.insert_growth(GrowthRecord::new("Orphan", 1, 2.0, 2.0));
        assert!(matches!(
            project_sequestration(&repo, "Orphan", 10, 100, None),
            Err(CarbonError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn test_missing_wood_density() {
        let mut repo = InMemoryRepository::new();
        repo.insert_species_row(SpeciesRow::new("No density"));
        repo.insert_growth(GrowthRecord::new("No density", 1, 2.0, 2.0));
        assert!(matches!(
            project_sequestration(&repo, "No density", 10, 100, None),
            Err(CarbonError::MissingField { ref field, .. }) if field == "wood_density_g_cm3"
        ));
    }

    #[test]
    fn test_missing_height_column() {
        let mut repo = InMemoryRepository::new();
        repo.insert_parameters(SpeciesParameters::with_defaults("No height", 0.5));
        repo.insert_growth_row(GrowthRow {
            species_id: "No height".to_string(),
            age_years: 3,
            diameter_cm: Some(5.0),
            height_m: None,
        });
        assert!(matches!(
            project_sequestration(&repo, "No height", 10, 100, None),
            Err(CarbonError::MissingField { ref field, .. }) if field == "height_m"
        ));
    }

    #[test]
    fn test_non_positive_diameter_is_invalid() {
        let mut repo = InMemoryRepository::new();
        repo.insert_parameters(SpeciesParameters::with_defaults("Broken", 0.5));
        repo.insert_growth(GrowthRecord::new("Broken", 1, 0.0, 2.0));
        assert!(matches!(
            project_sequestration(&repo, "Broken", 10, 100, None),
            Err(CarbonError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_years_and_trees_rejected() {
        let repo = teak_repository(0.95);
        assert!(matches!(
            project_sequestration(&repo, TEAK, 0, 100, None),
            Err(CarbonError::InvalidInput(_))
        ));
        assert!(matches!(
            project_sequestration(&repo, TEAK, 10, 0, None),
            Err(CarbonError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_climate_scales_every_year() {
        let repo = teak_repository(0.95);
        let plain = project_sequestration(&repo, TEAK, 20, 100, None).unwrap();
        let sample = ClimateSample::new(25.0, 2000.0);
        let scaled = project_sequestration(&repo, TEAK, 20, 100, Some(&sample)).unwrap();
        let (m, _) = multiplier_for(&sample);
        for (a, b) in plain.points.iter().zip(&scaled.points) {
            assert_approx_eq!(b.co2_year_tons, a.co2_year_tons * m, 1e-9);
            assert_approx_eq!(b.trees_alive, a.trees_alive, 1e-12);
        }
        let debug = scaled.climate_debug.unwrap();
        assert_approx_eq!(debug.multiplier, 1.07, 0.001);
    }

    #[test]
    fn test_unavailable_climate_is_neutral() {
        let repo = teak_repository(0.95);
        let plain = project_sequestration(&repo, TEAK, 20, 100, None).unwrap();
        let sample = ClimateSample::unavailable();
        let neutral = project_sequestration(&repo, TEAK, 20, 100, Some(&sample)).unwrap();
        assert_approx_eq!(neutral.total_co2_tons(), plain.total_co2_tons(), 1e-12);
        assert_eq!(neutral.climate_debug.unwrap().multiplier, 1.0);
    }

    #[test]
    fn test_full_survival_keeps_tree_count() {
        let repo = teak_repository(1.0);
        let result = project_sequestration(&repo, TEAK, 20, 40, None).unwrap();
        for p in &result.points {
            assert_approx_eq!(p.trees_alive, 40.0, 1e-12);
        }
    }

    #[test]
    fn test_stable_sort_on_duplicate_ages() {
        let mut repo = InMemoryRepository::new();
        repo.insert_parameters(SpeciesParameters::with_defaults("Dup", 0.5));
        repo.insert_growth(GrowthRecord::new("Dup", 5, 10.0, 8.0));
        repo.insert_growth(GrowthRecord::new("Dup", 5, 12.0, 9.0));
        let result = project_sequestration(&repo, "Dup", 5, 10, None).unwrap();
        assert_eq!(result.points.len(), 2);
        assert!(result.points[0].co2_year_tons < result.points[1].co2_year_tons);
    }

    proptest! {
        #[test]
        fn prop_trees_alive_strictly_decreasing(
            survival in 0.5f64..0.999,
            trees in 1u32..100_000,
        ) {
            let mut prev = trees_alive(trees, survival, 0);
            for age in 1..60 {
                let next = trees_alive(trees, survival, age);
                prop_assert!(next < prev);
                prev = next;
            }
        }

        #[test]
        fn prop_cumulative_non_decreasing(
            survival in 0.5f64..=1.0,
            trees in 1u32..10_000,
            years in 1u32..40,
        ) {
            let repo = teak_repository(survival);
            if let Ok(result) = project_sequestration(&repo, TEAK, years, trees, None) {
                let last = result.points.last().unwrap().co2_cumulative_tons;
                let sum: f64 = result.points.iter().map(|p| p.co2_year_tons).sum();
                prop_assert!((last - sum).abs() <= 1e-9 * (1.0 + sum));
                for w in result.points.windows(2) {
                    prop_assert!(w[1].co2_cumulative_tons >= w[0].co2_cumulative_tons);
                    prop_assert!(w[1].trees_alive <= w[0].trees_alive);
                }
            }
        }
    }
}
