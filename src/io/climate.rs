use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::{debug, info, warn};

use crate::config::ClimateConfig;
use crate::error::CarbonError;
use crate::models::ClimateSample;

/// Source of mean annual climate at a coordinate.
///
/// Failures are never propagated: an unusable location yields
/// [`ClimateSample::unavailable`].
pub trait ClimateLookup: Send + Sync {
    fn sample(&self, lat: f64, lon: f64) -> ClimateSample;

    /// Release any held resources. Called on shutdown.
    fn close(&self) {}
}

/// Lookup returning the same sample everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClimate {
    sample: ClimateSample,
}

impl FixedClimate {
    pub fn new(sample: ClimateSample) -> Self {
        Self { sample }
    }
}

impl ClimateLookup for FixedClimate {
    fn sample(&self, _lat: f64, _lon: f64) -> ClimateSample {
        self.sample
    }
}

/// Single-band raster in geographic (lon/lat) coordinates, north-up.
///
/// Read from an ESRI ASCII grid (`.asc`) or band 1 of a GeoTIFF (`.tif`).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    pub ncols: usize,
    pub nrows: usize,
    /// Western edge of the grid
    pub x_min: f64,
    /// Southern edge of the grid
    pub y_min: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub nodata: Option<f64>,
    /// Row-major, northernmost row first
    values: Vec<f64>,
}

/// Whole, positive grid dimension from a header or tag value.
fn dimension(name: &str, value: f64) -> Result<usize, CarbonError> {
    if !value.is_finite() || value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(CarbonError::ParseError(format!(
            "Grid {name} must be a positive whole number, got {value}"
        )));
    }
    Ok(value as usize)
}

fn cell_count(ncols: usize, nrows: usize) -> Result<usize, CarbonError> {
    ncols.checked_mul(nrows).ok_or_else(|| {
        CarbonError::ParseError(format!("Grid of {ncols} x {nrows} cells is too large"))
    })
}

impl RasterGrid {
    /// Open a grid, choosing the format by extension (`.tif`/`.tiff` or ASCII).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CarbonError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "tif" | "tiff" => {
                let file = std::fs::File::open(path)?;
                Self::from_geotiff(std::io::BufReader::new(file))
            }
            _ => Self::parse_ascii(&std::fs::read_to_string(path)?),
        }
    }

    /// Parse the text of an ESRI ASCII grid.
    pub fn parse_ascii(text: &str) -> Result<Self, CarbonError> {
        let mut tokens = text.split_whitespace().peekable();

        let mut ncols = None;
        let mut nrows = None;
        let mut x = None;
        let mut y = None;
        let mut x_is_center = false;
        let mut y_is_center = false;
        let mut cellsize = None;
        let mut nodata = None;

        while let Some(&key) = tokens.peek() {
            if key.parse::<f64>().is_ok() {
                break;
            }
            tokens.next();
            let value = tokens
                .next()
                .ok_or_else(|| CarbonError::ParseError(format!("Grid header '{key}' has no value")))?;
            let number: f64 = value.parse().map_err(|_| {
                CarbonError::ParseError(format!("Grid header '{key}': '{value}' is not a number"))
            })?;
            match key.to_lowercase().as_str() {
                "ncols" => ncols = Some(dimension("ncols", number)?),
                "nrows" => nrows = Some(dimension("nrows", number)?),
                "xllcorner" => x = Some(number),
                "xllcenter" => {
                    x = Some(number);
                    x_is_center = true;
                }
                "yllcorner" => y = Some(number),
                "yllcenter" => {
                    y = Some(number);
                    y_is_center = true;
                }
                "cellsize" => cellsize = Some(number),
                "nodata_value" => nodata = Some(number),
                other => {
                    return Err(CarbonError::ParseError(format!(
                        "Unknown grid header '{other}'"
                    )))
                }
            }
        }

        let missing = |name: &str| CarbonError::ParseError(format!("Grid header '{name}' missing"));
        let ncols = ncols.ok_or_else(|| missing("ncols"))?;
        let nrows = nrows.ok_or_else(|| missing("nrows"))?;
        let cellsize = cellsize.ok_or_else(|| missing("cellsize"))?;
        let mut x_min = x.ok_or_else(|| missing("xllcorner"))?;
        let mut y_min = y.ok_or_else(|| missing("yllcorner"))?;
        if x_is_center {
            x_min -= cellsize / 2.0;
        }
        if y_is_center {
            y_min -= cellsize / 2.0;
        }

        let values = tokens
            .map(|t| {
                t.parse::<f64>()
                    .map_err(|_| CarbonError::ParseError(format!("Grid value '{t}' is not a number")))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        Self::new(ncols, nrows, x_min, y_min, cellsize, cellsize, nodata, values)
    }

    /// Read band 1 of a GeoTIFF georeferenced by pixel scale and tiepoint.
    ///
    /// `GDAL_NODATA` is honoured when present.
    pub fn from_geotiff<R: Read + Seek>(reader: R) -> Result<Self, CarbonError> {
        let mut decoder = Decoder::new(reader)?;
        let (width, height) = decoder.dimensions()?;
        let ncols = dimension("width", width as f64)?;
        let nrows = dimension("height", height as f64)?;

        let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag)?;
        let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag)?;
        if scale.len() < 2 || tiepoint.len() < 6 {
            return Err(CarbonError::Raster(
                "GeoTIFF pixel scale or tiepoint is incomplete".to_string(),
            ));
        }
        let (cell_width, cell_height) = (scale[0], scale[1]);
        // Tiepoint maps raster (i, j) to model (x, y)
        let x_min = tiepoint[3] - tiepoint[0] * cell_width;
        let y_max = tiepoint[4] + tiepoint[1] * cell_height;
        let y_min = y_max - nrows as f64 * cell_height;

        let nodata = match decoder.find_tag(Tag::GdalNodata)? {
            Some(value) => value
                .into_string()
                .ok()
                .and_then(|s| s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).parse().ok()),
            None => None,
        };

        let raw: Vec<f64> = match decoder.read_image()? {
            DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::F64(v) => v,
            DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
            #[allow(unreachable_patterns)]
            _ => {
                return Err(CarbonError::Raster(
                    "Unsupported GeoTIFF sample format".to_string(),
                ))
            }
        };

        // Interleaved multi-band images keep band 1 only
        let cells = cell_count(ncols, nrows)?;
        let bands = if cells > 0 { raw.len() / cells } else { 0 };
        let values = if bands > 1 && raw.len() == cells * bands {
            raw.into_iter().step_by(bands).collect()
        } else {
            raw
        };

        Self::new(ncols, nrows, x_min, y_min, cell_width, cell_height, nodata, values)
    }

    #[allow(clippy::too_many_arguments)]
    fn new(
        ncols: usize,
        nrows: usize,
        x_min: f64,
        y_min: f64,
        cell_width: f64,
        cell_height: f64,
        nodata: Option<f64>,
        values: Vec<f64>,
    ) -> Result<Self, CarbonError> {
        if !(cell_width > 0.0 && cell_width.is_finite())
            || !(cell_height > 0.0 && cell_height.is_finite())
        {
            return Err(CarbonError::ParseError(
                "Grid cell size must be positive".to_string(),
            ));
        }
        if !x_min.is_finite() || !y_min.is_finite() {
            return Err(CarbonError::ParseError(
                "Grid origin must be finite".to_string(),
            ));
        }
        let expected = cell_count(ncols, nrows)?;
        if values.len() != expected {
            return Err(CarbonError::ParseError(format!(
                "Grid has {} values, expected {expected}",
                values.len()
            )));
        }
        Ok(Self {
            ncols,
            nrows,
            x_min,
            y_min,
            cell_width,
            cell_height,
            nodata,
            values,
        })
    }

    /// Value of the cell containing (lat, lon), or `None` outside the grid,
    /// on nodata, or on non-finite values.
    pub fn sample(&self, lat: f64, lon: f64) -> Option<f64> {
        let col = ((lon - self.x_min) / self.cell_width).floor();
        let row_from_bottom = ((lat - self.y_min) / self.cell_height).floor();
        if !col.is_finite() || !row_from_bottom.is_finite() || col < 0.0 || row_from_bottom < 0.0 {
            return None;
        }
        if col >= self.ncols as f64 || row_from_bottom >= self.nrows as f64 {
            return None;
        }
        let (col, row_from_bottom) = (col as usize, row_from_bottom as usize);
        let row = self.nrows - 1 - row_from_bottom;
        let value = *self.values.get(row * self.ncols + col)?;
        if !value.is_finite() || self.nodata == Some(value) {
            return None;
        }
        Some(value)
    }
}

/// The two WorldClim layers needed for the climate response.
#[derive(Debug)]
struct ClimateGrids {
    temperature: RasterGrid,
    precipitation: RasterGrid,
}

/// WorldClim BIO1 (mean annual temperature) and BIO12 (annual precipitation)
/// lookup.
///
/// Grids are opened on the first sample and kept until [`WorldClimLookup::close`].
/// A failed open is logged and retried on the next sample.
#[derive(Debug)]
pub struct WorldClimLookup {
    temperature_path: PathBuf,
    precipitation_path: PathBuf,
    temperature_scale: f64,
    grids: RwLock<Option<Arc<ClimateGrids>>>,
}

impl WorldClimLookup {
    pub fn new(
        temperature_path: impl Into<PathBuf>,
        precipitation_path: impl Into<PathBuf>,
        temperature_scale: f64,
    ) -> Self {
        Self {
            temperature_path: temperature_path.into(),
            precipitation_path: precipitation_path.into(),
            temperature_scale,
            grids: RwLock::new(None),
        }
    }

    pub fn from_config(config: &ClimateConfig) -> Self {
        Self::new(&config.bio1, &config.bio12, config.temperature_scale)
    }

    pub fn is_open(&self) -> bool {
        self.grids.read().map(|g| g.is_some()).unwrap_or(false)
    }

    /// Release the grids. The next sample reopens them.
    pub fn close(&self) {
        if let Ok(mut guard) = self.grids.write() {
            if guard.take().is_some() {
                info!("closed climate grids");
            }
        }
    }

    fn load(&self) -> Result<ClimateGrids, CarbonError> {
        let open = |path: &Path| {
            if !path.exists() {
                return Err(CarbonError::ClimateUnavailable(format!(
                    "{} not found",
                    path.display()
                )));
            }
            RasterGrid::open(path).map_err(|e| {
                CarbonError::ClimateUnavailable(format!("{}: {e}", path.display()))
            })
        };
        let grids = ClimateGrids {
            temperature: open(&self.temperature_path)?,
            precipitation: open(&self.precipitation_path)?,
        };
        info!(
            temperature = %self.temperature_path.display(),
            precipitation = %self.precipitation_path.display(),
            "opened climate grids"
        );
        Ok(grids)
    }

    fn grids(&self) -> Result<Arc<ClimateGrids>, CarbonError> {
        if let Some(grids) = self.grids.read().ok().and_then(|g| g.clone()) {
            return Ok(grids);
        }
        let mut guard = self
            .grids
            .write()
            .map_err(|_| CarbonError::ClimateUnavailable("climate grid lock poisoned".to_string()))?;
        if let Some(grids) = guard.as_ref() {
            return Ok(Arc::clone(grids));
        }
        let grids = Arc::new(self.load()?);
        *guard = Some(Arc::clone(&grids));
        Ok(grids)
    }
}

impl ClimateLookup for WorldClimLookup {
    fn sample(&self, lat: f64, lon: f64) -> ClimateSample {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            warn!(lat, lon, "coordinate out of range; climate unavailable");
            return ClimateSample::unavailable();
        }
        let grids = match self.grids() {
            Ok(grids) => grids,
            Err(e) => {
                warn!(error = %e, "using neutral climate multiplier");
                return ClimateSample::unavailable();
            }
        };
        let temp = grids.temperature.sample(lat, lon);
        let precip = grids.precipitation.sample(lat, lon);
        match (temp, precip) {
            (Some(t), Some(p)) => ClimateSample::new(t * self.temperature_scale, p),
            _ => {
                debug!(lat, lon, "no climate data at coordinate");
                ClimateSample::unavailable()
            }
        }
    }

    fn close(&self) {
        WorldClimLookup::close(self);
    }
}
