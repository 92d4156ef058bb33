//! Feature normalization to risk-monotonic factors
//!
//! Global invariants enforced:
//! - Every factor lies in [0,1] and 1.0 always means higher fire risk
//! - Out-of-range inputs are silently clamped, never rejected

use crate::input::RiskInput;

/// Clamp to the unit interval
pub(crate) fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Normalized, risk-monotonic factors.
///
/// Humidity and precipitation are inverted during normalization so
/// that a higher factor always means higher risk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedFactors {
    pub temperature: f64,
    pub humidity: f64,
    pub wind: f64,
    pub precipitation: f64,
    pub vegetation: f64,
}

/// Normalize raw readings into risk-monotonic factors
///
/// Transforms:
/// - temperature: clamp((T - 15) / 30) — saturates at 45°C
/// - humidity: clamp(1 - H / 100) — drier air scores higher
/// - wind: clamp(W / 40)
/// - precipitation: clamp(1 - P / 10) — above 10mm contributes nothing
/// - vegetation: pass-through of vegetation_density (default 0.5)
pub fn normalize(input: &RiskInput) -> NormalizedFactors {
    NormalizedFactors {
        temperature: clamp01((input.temperature - 15.0) / 30.0),
        humidity: clamp01(1.0 - input.humidity / 100.0),
        wind: clamp01(input.wind_speed / 40.0),
        precipitation: clamp01(1.0 - input.precipitation / 10.0),
        vegetation: clamp01(input.vegetation_density_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(temperature: f64, humidity: f64, wind_speed: f64, precipitation: f64) -> RiskInput {
        RiskInput {
            latitude: 0.0,
            longitude: 0.0,
            temperature,
            humidity,
            wind_speed,
            precipitation,
            vegetation_density: None,
            elevation: None,
            drought_index: None,
        }
    }

    #[test]
    fn test_temperature_range() {
        assert_eq!(normalize(&input(15.0, 50.0, 0.0, 0.0)).temperature, 0.0);
        assert_eq!(normalize(&input(30.0, 50.0, 0.0, 0.0)).temperature, 0.5);
        assert_eq!(normalize(&input(45.0, 50.0, 0.0, 0.0)).temperature, 1.0);
    }

    #[test]
    fn test_temperature_saturates_above_45() {
        assert_eq!(normalize(&input(60.0, 50.0, 0.0, 0.0)).temperature, 1.0);
    }

    #[test]
    fn test_temperature_clamped_below_15() {
        assert_eq!(normalize(&input(-10.0, 50.0, 0.0, 0.0)).temperature, 0.0);
    }

    #[test]
    fn test_humidity_inverted() {
        let dry = normalize(&input(25.0, 10.0, 0.0, 0.0));
        let humid = normalize(&input(25.0, 90.0, 0.0, 0.0));
        assert!(dry.humidity > humid.humidity);
        assert!((dry.humidity - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_humidity_over_100_clamped() {
        assert_eq!(normalize(&input(25.0, 120.0, 0.0, 0.0)).humidity, 0.0);
    }

    #[test]
    fn test_wind_range() {
        assert_eq!(normalize(&input(25.0, 50.0, 20.0, 0.0)).wind, 0.5);
        assert_eq!(normalize(&input(25.0, 50.0, 40.0, 0.0)).wind, 1.0);
        assert_eq!(normalize(&input(25.0, 50.0, 80.0, 0.0)).wind, 1.0);
    }

    #[test]
    fn test_precipitation_inverted_and_saturating() {
        assert_eq!(normalize(&input(25.0, 50.0, 0.0, 0.0)).precipitation, 1.0);
        assert_eq!(normalize(&input(25.0, 50.0, 0.0, 5.0)).precipitation, 0.5);
        // Anything above 10mm contributes zero risk
        assert_eq!(normalize(&input(25.0, 50.0, 0.0, 10.0)).precipitation, 0.0);
        assert_eq!(normalize(&input(25.0, 50.0, 0.0, 25.0)).precipitation, 0.0);
    }

    #[test]
    fn test_vegetation_defaults_to_half() {
        assert_eq!(normalize(&input(25.0, 50.0, 0.0, 0.0)).vegetation, 0.5);
    }

    #[test]
    fn test_vegetation_out_of_range_clamped() {
        let mut i = input(25.0, 50.0, 0.0, 0.0);
        i.vegetation_density = Some(1.7);
        assert_eq!(normalize(&i).vegetation, 1.0);
        i.vegetation_density = Some(-0.2);
        assert_eq!(normalize(&i).vegetation, 0.0);
    }

    #[test]
    fn test_all_factors_within_unit_interval() {
        for t in [-40.0, 0.0, 20.0, 45.0, 80.0] {
            for h in [-5.0, 0.0, 55.0, 100.0, 140.0] {
                for w in [-3.0, 0.0, 40.0, 200.0] {
                    for p in [-1.0, 0.0, 10.0, 100.0] {
                        let f = normalize(&input(t, h, w, p));
                        for v in [f.temperature, f.humidity, f.wind, f.precipitation, f.vegetation]
                        {
                            assert!((0.0..=1.0).contains(&v), "factor {v} out of range");
                        }
                    }
                }
            }
        }
    }
}
