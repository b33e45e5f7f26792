use crate::error::CarbonError;

/// Chave et al. (2014) moist-forest coefficient.
pub const CHAVE_COEFFICIENT: f64 = 0.0673;
/// Chave et al. (2014) moist-forest exponent.
pub const CHAVE_EXPONENT: f64 = 0.976;
/// Molecular-weight ratio of CO₂ to carbon (44/12).
pub const CO2_PER_CARBON: f64 = 3.67;

fn require_positive(name: &str, value: f64) -> Result<f64, CarbonError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CarbonError::InvalidInput(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn require_non_negative(name: &str, value: f64) -> Result<f64, CarbonError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CarbonError::InvalidInput(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}

/// Above-ground biomass in kg: `AGB = 0.0673 * (ρ * D² * H)^0.976`.
///
/// `diameter_cm` in cm, `height_m` in m, `wood_density` in g/cm³.
///
/// # Examples
///
/// ```
/// use afforestation_impact::analysis::above_ground_biomass;
///
/// let agb = above_ground_biomass(20.0, 15.0, 0.6).unwrap();
/// assert!((agb - 199.05).abs() < 0.01);
/// assert!(above_ground_biomass(0.0, 15.0, 0.6).is_err());
/// ```
pub fn above_ground_biomass(
    diameter_cm: f64,
    height_m: f64,
    wood_density: f64,
) -> Result<f64, CarbonError> {
    let d = require_positive("diameter_cm", diameter_cm)?;
    let h = require_positive("height_m", height_m)?;
    let rho = require_positive("wood_density", wood_density)?;
    Ok(CHAVE_COEFFICIENT * (rho * d.powi(2) * h).powf(CHAVE_EXPONENT))
}

/// Total (above + below ground) biomass in kg: `AGB * (1 + R)`.
pub fn total_biomass(agb_kg: f64, root_to_shoot_ratio: f64) -> Result<f64, CarbonError> {
    let agb = require_non_negative("agb_kg", agb_kg)?;
    let r = require_non_negative("root_to_shoot_ratio", root_to_shoot_ratio)?;
    Ok(agb * (1.0 + r))
}

/// CO₂-equivalent mass in kg: `biomass * CF * 3.67`.
pub fn co2_equivalent(biomass_kg: f64, carbon_fraction: f64) -> Result<f64, CarbonError> {
    let biomass = require_non_negative("biomass_kg", biomass_kg)?;
    if !(carbon_fraction > 0.0 && carbon_fraction <= 1.0) {
        return Err(CarbonError::InvalidInput(format!(
            "carbon_fraction must be in (0, 1], got {carbon_fraction}"
        )));
    }
    Ok(biomass * carbon_fraction * CO2_PER_CARBON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    #[test]
    fn test_agb_reference_tree() {
        let agb = above_ground_biomass(20.0, 15.0, 0.6).unwrap();
        let expected = 0.0673 * (0.6f64 * 400.0 * 15.0).powf(0.976);
        assert_approx_eq!(agb, expected, 1e-9);
        assert_approx_eq!(agb, 199.05, 0.01);
    }

    #[test]
    fn test_reference_tree_chain() {
        let agb = above_ground_biomass(20.0, 15.0, 0.6).unwrap();
        let total = total_biomass(agb, 0.27).unwrap();
        assert_approx_eq!(total, 252.80, 0.01);
        let co2 = co2_equivalent(total, 0.47).unwrap();
        assert_approx_eq!(co2, 436.05, 0.01);
    }

    #[test]
    fn test_agb_rejects_non_positive() {
        assert!(matches!(
            above_ground_biomass(0.0, 10.0, 0.5),
            Err(CarbonError::InvalidInput(_))
        ));
        assert!(above_ground_biomass(10.0, -1.0, 0.5).is_err());
        assert!(above_ground_biomass(10.0, 10.0, 0.0).is_err());
        assert!(above_ground_biomass(f64::NAN, 10.0, 0.5).is_err());
    }

    #[test]
    fn test_total_biomass_zero_ratio() {
        assert_approx_eq!(total_biomass(100.0, 0.0).unwrap(), 100.0, 1e-12);
    }

    #[test]
    fn test_total_biomass_rejects_negative_ratio() {
        assert!(total_biomass(100.0, -0.1).is_err());
    }

    #[test]
    fn test_co2_of_zero_biomass() {
        assert_eq!(co2_equivalent(0.0, 0.47).unwrap(), 0.0);
    }

    #[test]
    fn test_co2_rejects_bad_fraction() {
        assert!(co2_equivalent(10.0, 0.0).is_err());
        assert!(co2_equivalent(10.0, 1.01).is_err());
        assert!(co2_equivalent(-1.0, 0.5).is_err());
    }

    proptest! {
        #[test]
        fn prop_agb_increasing_in_each_argument(
            d in 1.0f64..150.0,
            h in 1.0f64..60.0,
            rho in 0.1f64..1.2,
            bump in 0.01f64..5.0,
        ) {
            let base = above_ground_biomass(d, h, rho).unwrap();
            prop_assert!(above_ground_biomass(d + bump, h, rho).unwrap() > base);
            prop_assert!(above_ground_biomass(d, h + bump, rho).unwrap() > base);
            prop_assert!(above_ground_biomass(d, h, rho + bump / 10.0).unwrap() > base);
        }

        #[test]
        fn prop_co2_linear(
            biomass in 0.0f64..10_000.0,
            cf in 0.05f64..0.5,
            k in 0.1f64..2.0,
        ) {
            let base = co2_equivalent(biomass, cf).unwrap();
            let scaled_biomass = co2_equivalent(biomass * k, cf).unwrap();
            prop_assert!((scaled_biomass - base * k).abs() <= 1e-9 * (1.0 + base * k));
            let scaled_cf = co2_equivalent(biomass, cf * k).unwrap();
            prop_assert!((scaled_cf - base * k).abs() <= 1e-9 * (1.0 + base * k));
        }
    }
}
