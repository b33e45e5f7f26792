use crate::models::{ClimateDebug, ClimateSample};

/// Temperature of peak growth response, °C.
pub const OPTIMAL_TEMP_C: f64 = 25.0;
/// Width of the temperature bell curve, °C.
pub const TEMP_SCALE_C: f64 = 12.0;
/// Precipitation saturation scale, mm.
pub const RAIN_SCALE_MM: f64 = 900.0;
/// Asymptotic maximum of the rain factor.
pub const RAIN_FACTOR_MAX: f64 = 1.2;
/// Lower clamp of the climate multiplier.
pub const MIN_MULTIPLIER: f64 = 0.5;
/// Upper clamp of the climate multiplier.
pub const MAX_MULTIPLIER: f64 = 1.6;

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Bell curve peaking at 25 °C.
pub fn temperature_factor(temp_c: f64) -> f64 {
    (-((temp_c - OPTIMAL_TEMP_C) / TEMP_SCALE_C).powi(2)).exp()
}

/// Saturating curve from 0 (no rain) towards 1.2.
pub fn rain_factor(precip_mm: f64) -> f64 {
    (1.0 - (-precip_mm / RAIN_SCALE_MM).exp()) * RAIN_FACTOR_MAX
}

/// Climate suitability multiplier, clamped to `[0.5, 1.6]`.
///
/// Absent, partial or malformed input yields the neutral multiplier 1.0.
/// The returned debug record always explains the value.
pub fn climate_multiplier(temp_c: Option<f64>, precip_mm: Option<f64>) -> (f64, ClimateDebug) {
    let sample = ClimateSample {
        mean_annual_temp_c: temp_c,
        mean_annual_precip_mm: precip_mm,
    };
    multiplier_for(&sample)
}

/// Same as [`climate_multiplier`], taking a `ClimateSample`.
pub fn multiplier_for(sample: &ClimateSample) -> (f64, ClimateDebug) {
    let Some((t, p)) = sample.values() else {
        return (1.0, ClimateDebug::neutral());
    };

    let tf = temperature_factor(t);
    let rf = rain_factor(p);
    let multiplier = (tf * rf).clamp(MIN_MULTIPLIER, MAX_MULTIPLIER);

    let debug = ClimateDebug {
        temp_c: Some(round_to(t, 2)),
        precip_mm: Some(round_to(p, 2)),
        temp_factor: Some(round_to(tf, 3)),
        rain_factor: Some(round_to(rf, 3)),
        multiplier: round_to(multiplier, 3),
    };
    (multiplier, debug)
}
