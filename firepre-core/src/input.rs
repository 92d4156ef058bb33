//! Scoring inputs and optional-field defaults

use serde::Deserialize;

/// Vegetation density assumed when the caller provides none
pub const DEFAULT_VEGETATION_DENSITY: f64 = 0.5;
/// Elevation (meters) assumed when the caller provides none
pub const DEFAULT_ELEVATION: f64 = 300.0;
/// Drought index assumed when the caller provides none
pub const DEFAULT_DROUGHT_INDEX: f64 = 0.3;

/// Raw weather and environmental readings for one scoring request.
///
/// The core never rejects an input: out-of-range values are clamped
/// during normalization and absent optional fields take documented
/// defaults. Range validation belongs to the boundary layer.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskInput {
    pub latitude: f64,
    pub longitude: f64,
    /// Air temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Precipitation in mm
    pub precipitation: f64,
    /// Vegetation density in [0,1]
    #[serde(default)]
    pub vegetation_density: Option<f64>,
    /// Elevation in meters
    #[serde(default)]
    pub elevation: Option<f64>,
    /// Drought index in [0,1]
    #[serde(default)]
    pub drought_index: Option<f64>,
}

impl RiskInput {
    /// Vegetation density with the default applied
    pub fn vegetation_density_or_default(&self) -> f64 {
        self.vegetation_density.unwrap_or(DEFAULT_VEGETATION_DENSITY)
    }

    /// Elevation with the default applied
    pub fn elevation_or_default(&self) -> f64 {
        self.elevation.unwrap_or(DEFAULT_ELEVATION)
    }

    /// Drought index with the default applied
    pub fn drought_index_or_default(&self) -> f64 {
        self.drought_index.unwrap_or(DEFAULT_DROUGHT_INDEX)
    }
}
