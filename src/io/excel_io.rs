use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use rust_xlsxwriter::Workbook;

use crate::error::CarbonError;
use crate::models::ProjectionResult;

use super::table::RawTable;

const MAX_SHEET_NAME: usize = 31;

/// Read the first worksheet of a spreadsheet (.xlsx, .xlsm, .xls, .xlsb
/// or .ods) into a raw table.
///
/// The first row is taken as the header.
pub fn read_table_excel(path: impl AsRef<Path>) -> Result<RawTable, CarbonError> {
    let mut workbook = open_workbook_auto(path.as_ref())?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CarbonError::Excel("No sheets found in workbook".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|c| c.to_string()).collect::<Vec<String>>());

    let headers = rows
        .next()
        .ok_or_else(|| CarbonError::Excel(format!("Sheet '{sheet_name}' is empty")))?;

    Ok(RawTable::new(headers, rows.collect()))
}

/// Worksheet-safe, unique name derived from a species id.
fn sheet_name(species_id: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = species_id
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim();
    let base: String = if cleaned.is_empty() {
        "Species".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME).collect()
    };

    let mut name = base.clone();
    let mut n = 2;
    while !used.insert(name.to_lowercase()) {
        let suffix = format!(" ({n})");
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        name = format!("{}{suffix}", base.chars().take(keep).collect::<String>());
        n += 1;
    }
    name
}

/// Write projection results to an Excel (.xlsx) file, one sheet per species.
pub fn write_projections_excel(
    results: &[ProjectionResult],
    path: impl AsRef<Path>,
) -> Result<(), CarbonError> {
    let mut workbook = Workbook::new();
    let mut used = HashSet::new();

    let headers = [
        "age_years",
        "trees_alive",
        "co2_year_tons",
        "co2_cumulative_tons",
    ];

    for result in results {
        let name = sheet_name(&result.species_id, &mut used);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;

        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        for (i, point) in result.points.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_number(row, 0, point.age_years as f64)?;
            worksheet.write_number(row, 1, point.trees_alive)?;
            worksheet.write_number(row, 2, point.co2_year_tons)?;
            worksheet.write_number(row, 3, point.co2_cumulative_tons)?;
        }

        if let Some(debug) = &result.climate_debug {
            worksheet.write_string(0, 5, "climate_multiplier")?;
            worksheet.write_number(1, 5, debug.multiplier)?;
        }
    }

    if results.is_empty() {
        workbook.add_worksheet();
    }

    workbook.save(path.as_ref())?;
    Ok(())
}
