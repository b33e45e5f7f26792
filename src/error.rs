use thiserror::Error;

/// Errors that can occur while loading species data or projecting sequestration.
#[derive(Error, Debug)]
pub enum CarbonError {
    #[error("Unknown species: '{0}'")]
    UnknownSpecies(String),

    #[error("Missing field '{field}' for species '{species}'")]
    MissingField { species: String, field: String },

    #[error("No growth data for '{species}' within {years} years")]
    EmptyHorizon { species: String, years: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Climate grids could not be acquired. Lookups degrade this to a neutral
    /// multiplier; it never aborts a projection.
    #[error("Climate data unavailable: {0}")]
    ClimateUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Raster error: {0}")]
    Raster(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl CarbonError {
    pub(crate) fn missing_field(species: impl Into<String>, field: impl Into<String>) -> Self {
        CarbonError::MissingField {
            species: species.into(),
            field: field.into(),
        }
    }
}

impl From<calamine::Error> for CarbonError {
    fn from(e: calamine::Error) -> Self {
        CarbonError::Excel(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CarbonError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        CarbonError::Excel(e.to_string())
    }
}

impl From<tiff::TiffError> for CarbonError {
    fn from(e: tiff::TiffError) -> Self {
        CarbonError::Raster(e.to_string())
    }
}

impl From<toml::de::Error> for CarbonError {
    fn from(e: toml::de::Error) -> Self {
        CarbonError::Config(e.to_string())
    }
}
