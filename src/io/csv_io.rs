use std::io::Read;
use std::path::Path;

use crate::error::CarbonError;
use crate::models::ProjectionResult;

use super::table::RawTable;

/// CSV row structure for exported projections.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct ProjectionRow {
    pub species_id: String,
    pub age_years: u32,
    pub trees_alive: f64,
    pub co2_year_tons: f64,
    pub co2_cumulative_tons: f64,
    pub climate_multiplier: f64,
}

impl ProjectionRow {
    pub(crate) fn rows(result: &ProjectionResult) -> impl Iterator<Item = ProjectionRow> + '_ {
        let multiplier = result.climate_multiplier();
        result.points.iter().map(move |p| ProjectionRow {
            species_id: result.species_id.clone(),
            age_years: p.age_years,
            trees_alive: p.trees_alive,
            co2_year_tons: p.co2_year_tons,
            co2_cumulative_tons: p.co2_cumulative_tons,
            climate_multiplier: multiplier,
        })
    }
}

fn parse_table<R: Read>(rdr: &mut csv::Reader<R>) -> Result<RawTable, CarbonError> {
    let headers = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(RawTable::new(headers, rows))
}

/// Read a CSV file into a raw header + cells table.
pub fn read_table_csv(path: impl AsRef<Path>) -> Result<RawTable, CarbonError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    parse_table(&mut rdr)
}

/// Read CSV bytes into a raw header + cells table.
pub fn read_table_csv_from_bytes(data: &[u8]) -> Result<RawTable, CarbonError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);
    parse_table(&mut rdr)
}

/// Write projection series to a CSV file, one row per species and age.
pub fn write_projections_csv(
    results: &[ProjectionResult],
    path: impl AsRef<Path>,
) -> Result<(), CarbonError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for result in results {
        for row in ProjectionRow::rows(result) {
            wtr.serialize(row)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClimateDebug, ProjectionPoint};

    #[test]
    fn test_read_table_from_bytes() {
        let data = b"species, age_years ,dbh_cm\nTectona grandis, 5 ,11.0\nTectona grandis,10,19.5\n";
        let table = read_table_csv_from_bytes(data).unwrap();
        assert_eq!(table.headers, vec!["species", "age_years", "dbh_cm"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "5");
    }

    #[test]
    fn test_read_table_flexible_rows() {
        let data = b"species,age_years,dbh_cm\nX,1\n";
        let table = read_table_csv_from_bytes(data).unwrap();
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn test_write_projections_csv() {
        let result = ProjectionResult {
            species_id: "Tectona grandis".to_string(),
            points: vec![
                ProjectionPoint {
                    age_years: 5,
                    trees_alive: 77.4,
                    co2_year_tons: 1.5,
                    co2_cumulative_tons: 1.5,
                },
                ProjectionPoint {
                    age_years: 10,
                    trees_alive: 59.9,
                    co2_year_tons: 2.5,
                    co2_cumulative_tons: 4.0,
                },
            ],
            climate_debug: Some(ClimateDebug {
                temp_c: Some(25.0),
                precip_mm: Some(2000.0),
                temp_factor: Some(1.0),
                rain_factor: Some(1.07),
                multiplier: 1.07,
            }),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_projections_csv(&[result], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "species_id,age_years,trees_alive,co2_year_tons,co2_cumulative_tons,climate_multiplier"
        );
        assert!(lines.next().unwrap().starts_with("Tectona grandis,5,"));
        assert!(lines.next().unwrap().ends_with(",1.07"));
    }
}
