use tracing::warn;

use crate::error::CarbonError;
use crate::models::{GrowthRow, SpeciesRow};

pub(crate) const SPECIES_ALIASES: &[&str] = &[
    "species_id",
    "species",
    "species_scientific",
    "tree",
    "tree_species",
    "name",
];
pub(crate) const AGE_ALIASES: &[&str] = &["age_years", "age"];
pub(crate) const DIAMETER_ALIASES: &[&str] = &["diameter_cm", "dbh_cm", "dbh"];
pub(crate) const HEIGHT_ALIASES: &[&str] = &["height_m", "height"];
pub(crate) const WOOD_DENSITY_ALIASES: &[&str] = &["wood_density_g_cm3", "wood_density", "density"];
pub(crate) const CARBON_FRACTION_ALIASES: &[&str] =
    &["carbon_fraction", "carbon_fraction_cf", "cf"];
pub(crate) const ROOT_TO_SHOOT_ALIASES: &[&str] =
    &["root_to_shoot_ratio", "root_shoot_ratio", "rs_ratio"];
pub(crate) const SURVIVAL_ALIASES: &[&str] = &["annual_survival_rate", "survival_rate", "survival"];

/// A header row plus string cells, as read from CSV or a worksheet.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the first alias present in the header, case-insensitively.
    pub fn find_column(&self, aliases: &[&str]) -> Option<usize> {
        let normalized: Vec<String> = self
            .headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        aliases
            .iter()
            .find_map(|alias| normalized.iter().position(|h| h == alias))
    }

    fn require_column(&self, table: &str, aliases: &[&str]) -> Result<usize, CarbonError> {
        self.find_column(aliases).ok_or_else(|| {
            CarbonError::ParseError(format!(
                "{table} table has no {} column (expected one of: {})",
                aliases[0],
                aliases.join(", ")
            ))
        })
    }
}

fn cell(row: &[String], idx: Option<usize>) -> Option<&str> {
    let value = row.get(idx?)?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("na") || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value)
    }
}

fn number(
    row: &[String],
    idx: Option<usize>,
    line: usize,
    column: &str,
) -> Result<Option<f64>, CarbonError> {
    match cell(row, idx) {
        None => Ok(None),
        Some(text) => text.parse::<f64>().map(Some).map_err(|_| {
            CarbonError::ParseError(format!(
                "Row {line}, column '{column}': '{text}' is not a number"
            ))
        }),
    }
}

fn age(text: &str, line: usize) -> Result<u32, CarbonError> {
    let value: f64 = text.parse().map_err(|_| {
        CarbonError::ParseError(format!("Row {line}, column 'age_years': '{text}' is not a number"))
    })?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(CarbonError::ParseError(format!(
            "Row {line}, column 'age_years': '{text}' is not a non-negative whole number of years"
        )));
    }
    Ok(value as u32)
}

/// Normalize a growth-curve table.
///
/// Species and age columns are required. Diameter and height columns may be
/// absent; the affected species then fail with `MissingField` on lookup.
pub fn growth_rows_from_table(table: &RawTable) -> Result<Vec<GrowthRow>, CarbonError> {
    let species_col = table.require_column("Growth", SPECIES_ALIASES)?;
    let age_col = table.require_column("Growth", AGE_ALIASES)?;
    let diameter_col = table.find_column(DIAMETER_ALIASES);
    let height_col = table.find_column(HEIGHT_ALIASES);

    let mut rows = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        // 1-based, counting the header line
        let line = i + 2;
        let (Some(species), Some(age_text)) = (cell(row, Some(species_col)), cell(row, Some(age_col)))
        else {
            warn!(line, "skipping growth row without species or age");
            continue;
        };
        rows.push(GrowthRow {
            species_id: species.to_string(),
            age_years: age(age_text, line)?,
            diameter_cm: number(row, diameter_col, line, "diameter_cm")?,
            height_m: number(row, height_col, line, "height_m")?,
        });
    }
    Ok(rows)
}

/// Normalize a species master table. Only the species column is required.
pub fn species_rows_from_table(table: &RawTable) -> Result<Vec<SpeciesRow>, CarbonError> {
    let species_col = table.require_column("Species", SPECIES_ALIASES)?;
    let density_col = table.find_column(WOOD_DENSITY_ALIASES);
    let cf_col = table.find_column(CARBON_FRACTION_ALIASES);
    let rs_col = table.find_column(ROOT_TO_SHOOT_ALIASES);
    let survival_col = table.find_column(SURVIVAL_ALIASES);

    let mut rows = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let line = i + 2;
        let Some(species) = cell(row, Some(species_col)) else {
            warn!(line, "skipping species row without an id");
            continue;
        };
        rows.push(SpeciesRow {
            species_id: species.to_string(),
            wood_density_g_cm3: number(row, density_col, line, "wood_density_g_cm3")?,
            carbon_fraction: number(row, cf_col, line, "carbon_fraction")?,
            root_to_shoot_ratio: number(row, rs_col, line, "root_to_shoot_ratio")?,
            annual_survival_rate: number(row, survival_col, line, "annual_survival_rate")?,
        });
    }
    Ok(rows)
}
