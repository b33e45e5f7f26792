use std::collections::BTreeMap;

use tracing::warn;

use super::projection::{check_scenario, project_sequestration};
use crate::error::CarbonError;
use crate::io::SpeciesRepository;
use crate::models::{ProjectionResult, YearlyTotal};

/// Project several species under the same horizon and tree count.
///
/// Climate is not applied. The first failing species aborts the whole call
/// and no partial results are returned.
pub fn project_many<R, S>(
    repository: &R,
    species_ids: &[S],
    years: u32,
    trees: u32,
) -> Result<Vec<ProjectionResult>, CarbonError>
where
    R: SpeciesRepository + ?Sized,
    S: AsRef<str>,
{
    check_scenario(years, trees)?;

    let mut results = Vec::with_capacity(species_ids.len());
    for species_id in species_ids {
        let species_id = species_id.as_ref();
        match project_sequestration(repository, species_id, years, trees, None) {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!(species = species_id, error = %e, "multi-species projection aborted");
                return Err(e);
            }
        }
    }
    Ok(results)
}

/// Sum `co2_year_tons` across species at each age.
///
/// Output is ordered by age. An age missing from some series contributes
/// nothing for that series.
pub fn sum_yearly_across_species(results: &[ProjectionResult]) -> Vec<YearlyTotal> {
    let mut totals: BTreeMap<u32, f64> = BTreeMap::new();
    for result in results {
        for point in &result.points {
            *totals.entry(point.age_years).or_insert(0.0) += point.co2_year_tons;
        }
    }
    totals
        .into_iter()
        .map(|(age_years, co2_year_tons)| YearlyTotal {
            age_years,
            co2_year_tons,
        })
        .collect()
}
