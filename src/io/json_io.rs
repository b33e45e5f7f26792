use std::path::Path;

use crate::error::CarbonError;
use crate::models::ProjectionResult;

/// Write projection results to a JSON file.
pub fn write_projections_json(
    results: &[ProjectionResult],
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), CarbonError> {
    let content = if pretty {
        serde_json::to_string_pretty(results)?
    } else {
        serde_json::to_string(results)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}

/// Read projection results previously written with [`write_projections_json`].
pub fn read_projections_json(path: impl AsRef<Path>) -> Result<Vec<ProjectionResult>, CarbonError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectionPoint;

    fn sample() -> ProjectionResult {
        ProjectionResult {
            species_id: "Azadirachta indica".to_string(),
            points: vec![ProjectionPoint {
                age_years: 3,
                trees_alive: 85.7,
                co2_year_tons: 0.42,
                co2_cumulative_tons: 0.42,
            }],
            climate_debug: None,
        }
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projections.json");
        write_projections_json(&[sample()], &path, true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'));
        assert!(content.contains("\"species_id\": \"Azadirachta indica\""));

        let loaded = read_projections_json(&path).unwrap();
        assert_eq!(loaded, vec![sample()]);
    }

    #[test]
    fn test_compact_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projections.json");
        write_projections_json(&[sample()], &path, false).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains('\n'));
    }

    #[test]
    fn test_read_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[{").unwrap();
        assert!(matches!(read_projections_json(&path), Err(CarbonError::Json(_))));
    }
}
