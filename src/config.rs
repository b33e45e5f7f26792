use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CarbonError;

/// Application configuration loaded from TOML. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub climate: ClimateConfig,
    pub defaults: ProjectionDefaults,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CarbonError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CarbonError> {
        Ok(toml::from_str(content)?)
    }
}

/// Location of the growth-curve and species-master datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    /// Base file name of the growth curves, without extension
    pub growth_curves: String,
    /// Base file name of the species master table, without extension
    pub species_master: String,
    /// Preferred dataset revision suffix, e.g. `v2` for `growth_curves_filled_v2.csv`
    pub version_tag: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            growth_curves: "growth_curves_filled".to_string(),
            species_master: "species_master_filled".to_string(),
            version_tag: "v2".to_string(),
        }
    }
}

impl DataConfig {
    /// `<dir>/<base>_<version_tag>.csv` when it exists, else `<dir>/<base>.csv`.
    pub fn pick_csv(&self, base_name: &str) -> PathBuf {
        let preferred = self
            .dir
            .join(format!("{base_name}_{}.csv", self.version_tag));
        if preferred.exists() {
            preferred
        } else {
            self.dir.join(format!("{base_name}.csv"))
        }
    }

    pub fn growth_curves_path(&self) -> PathBuf {
        self.pick_csv(&self.growth_curves)
    }

    pub fn species_master_path(&self) -> PathBuf {
        self.pick_csv(&self.species_master)
    }
}

/// WorldClim grid locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    /// BIO1, mean annual temperature
    pub bio1: PathBuf,
    /// BIO12, annual precipitation in mm
    pub bio12: PathBuf,
    /// Factor converting BIO1 cell values to °C (0.1 for °C·10 encodings)
    pub temperature_scale: f64,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            bio1: PathBuf::from("data/worldclim/bio/wc2.1_10m_bio_1.tif"),
            bio12: PathBuf::from("data/worldclim/bio/wc2.1_10m_bio_12.tif"),
            temperature_scale: 0.1,
        }
    }
}

/// Default scenario used when the caller does not specify one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionDefaults {
    pub years: u32,
    pub trees: u32,
}

impl Default for ProjectionDefaults {
    fn default() -> Self {
        Self {
            years: 20,
            trees: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5050,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.defaults.years, 20);
        assert_eq!(config.server.port, 5050);
        assert!((config.climate.temperature_scale - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_default_grids_are_worldclim_geotiffs() {
        let climate = ClimateConfig::default();
        assert!(climate.bio1.ends_with("wc2.1_10m_bio_1.tif"));
        assert!(climate.bio12.ends_with("wc2.1_10m_bio_12.tif"));
    }

    #[test]
    fn test_partial_section() {
        let config = AppConfig::from_toml("[defaults]\ntrees = 500\n").unwrap();
        assert_eq!(config.defaults.trees, 500);
        assert_eq!(config.defaults.years, 20);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml("[server]\nport = \"eighty\""),
            Err(CarbonError::Config(_))
        ));
    }

    #[test]
    fn test_pick_csv_prefers_versioned() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataConfig {
            dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        std::fs::write(dir.path().join("growth_curves_filled.csv"), "").unwrap();
        assert_eq!(
            data.growth_curves_path(),
            dir.path().join("growth_curves_filled.csv")
        );

        std::fs::write(dir.path().join("growth_curves_filled_v2.csv"), "").unwrap();
        assert_eq!(
            data.growth_curves_path(),
            dir.path().join("growth_curves_filled_v2.csv")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("afforest.toml");
        std::fs::write(
            &path,
            "[data]\ndir = \"datasets\"\nversion_tag = \"v3\"\n\n[server]\nport = 8080\n",
        )
        .unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.data.dir, PathBuf::from("datasets"));
        assert_eq!(config.data.version_tag, "v3");
        assert_eq!(config.data.growth_curves, "growth_curves_filled");
        assert_eq!(config.server.port, 8080);
    }
}
