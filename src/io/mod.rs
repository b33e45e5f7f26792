mod repository;
mod table;
mod csv_io;
mod json_io;
mod excel_io;
mod climate;

use std::path::Path;

use tracing::info;

use crate::error::CarbonError;
use crate::models::ProjectionResult;

pub use repository::{InMemoryRepository, SpeciesRepository};
pub use table::{growth_rows_from_table, species_rows_from_table, RawTable};
pub use csv_io::{read_table_csv, read_table_csv_from_bytes, write_projections_csv};
pub use json_io::{read_projections_json, write_projections_json};
pub use excel_io::{read_table_excel, write_projections_excel};
pub use climate::{ClimateLookup, RasterGrid, FixedClimate, WorldClimLookup};

/// Read a CSV or Excel table, chosen by file extension.
pub fn read_table(path: impl AsRef<Path>) -> Result<RawTable, CarbonError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => read_table_csv(path),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_table_excel(path),
        _ => Err(CarbonError::ParseError(format!(
            "Unsupported file format: .{ext}. Use .csv, .xlsx, .xls or .ods"
        ))),
    }
}

/// Load and normalize the growth-curve and species-master datasets.
pub fn load_repository(
    growth_path: impl AsRef<Path>,
    species_path: impl AsRef<Path>,
) -> Result<InMemoryRepository, CarbonError> {
    let growth_rows = growth_rows_from_table(&read_table(growth_path.as_ref())?)?;
    let species_rows = species_rows_from_table(&read_table(species_path.as_ref())?)?;
    let repo = InMemoryRepository::from_rows(growth_rows, species_rows)?;
    info!(
        growth = %growth_path.as_ref().display(),
        species = %species_path.as_ref().display(),
        records = repo.num_growth_records(),
        species_count = repo.num_species(),
        "loaded species datasets"
    );
    Ok(repo)
}

/// Load a repository from in-memory CSV data.
pub fn load_repository_from_csv_bytes(
    growth_csv: &[u8],
    species_csv: &[u8],
) -> Result<InMemoryRepository, CarbonError> {
    let growth_rows = growth_rows_from_table(&read_table_csv_from_bytes(growth_csv)?)?;
    let species_rows = species_rows_from_table(&read_table_csv_from_bytes(species_csv)?)?;
    InMemoryRepository::from_rows(growth_rows, species_rows)
}

/// Trait for writing projection results to a file.
pub trait ProjectionWriter {
    fn write(&self, results: &[ProjectionResult], path: &Path) -> Result<(), CarbonError>;
}

/// CSV format writer.
pub struct CsvFormat;

impl ProjectionWriter for CsvFormat {
    fn write(&self, results: &[ProjectionResult], path: &Path) -> Result<(), CarbonError> {
        write_projections_csv(results, path)
    }
}

/// JSON format writer.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl ProjectionWriter for JsonFormat {
    fn write(&self, results: &[ProjectionResult], path: &Path) -> Result<(), CarbonError> {
        write_projections_json(results, path, self.pretty)
    }
}

/// Excel (.xlsx) format writer.
pub struct ExcelFormat;

impl ProjectionWriter for ExcelFormat {
    fn write(&self, results: &[ProjectionResult], path: &Path) -> Result<(), CarbonError> {
        write_projections_excel(results, path)
    }
}

/// Writer for a file extension (`csv`, `json`, `xlsx`).
pub fn writer_for_extension(ext: &str, pretty: bool) -> Option<Box<dyn ProjectionWriter>> {
    match ext.to_lowercase().as_str() {
        "csv" => Some(Box::new(CsvFormat)),
        "json" => Some(Box::new(JsonFormat { pretty })),
        "xlsx" => Some(Box::new(ExcelFormat)),
        _ => None,
    }
}
