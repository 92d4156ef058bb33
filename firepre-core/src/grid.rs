//! Synthetic feature-grid encoding for model input
//!
//! The predictive model consumes a square RGB-like grid built from the
//! scalar readings rather than real satellite imagery: temperature and
//! drought drive the red channel, humidity and vegetation the green,
//! precipitation the blue, and wind adds a horizontal gradient that
//! brightens red and darkens blue across the grid.

use crate::input::RiskInput;
use crate::normalize::clamp01;

/// Default grid edge length in pixels
pub const DEFAULT_GRID_SIZE: usize = 128;

/// Square RGB grid encoding of one input, row-major
#[derive(Debug, Clone)]
pub struct FeatureGrid {
    size: usize,
    pixels: Vec<[f32; 3]>,
}

impl FeatureGrid {
    /// Encode an input into a size x size grid.
    ///
    /// Channel construction (normalization ranges follow the model's
    /// training encoding, not the heuristic scorer's):
    /// - red = min(1, temp_norm * (1 + drought * 0.5) + wind_norm * (x/size) * 0.2)
    /// - green = (humidity_norm + vegetation) / 2
    /// - blue = max(0, precip_norm - wind_norm * (x/size) * 0.1)
    pub fn from_input(input: &RiskInput, size: usize) -> FeatureGrid {
        let temp_norm = clamp01((input.temperature - 15.0) / 25.0);
        let humidity_norm = clamp01(input.humidity / 100.0);
        let wind_norm = clamp01(input.wind_speed / 50.0);
        let precip_norm = clamp01(input.precipitation / 25.0);
        let veg_norm = clamp01(input.vegetation_density_or_default());
        let drought_norm = clamp01(input.drought_index_or_default());

        let red_base = temp_norm * (1.0 + drought_norm * 0.5);
        let green = ((humidity_norm + veg_norm) / 2.0) as f32;

        // Channels vary only along x (the wind gradient), so compute one
        // row and repeat it
        let mut row = Vec::with_capacity(size);
        for x in 0..size {
            let wind_effect = wind_norm * (x as f64 / size as f64);
            let red = (red_base + wind_effect * 0.2).min(1.0) as f32;
            let blue = (precip_norm - wind_effect * 0.1).max(0.0) as f32;
            row.push([red, green, blue]);
        }

        let mut pixels = Vec::with_capacity(size * size);
        for _ in 0..size {
            pixels.extend_from_slice(&row);
        }

        FeatureGrid { size, pixels }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        self.pixels[y * self.size + x]
    }

    /// Mean value of each channel across the whole grid
    pub fn channel_means(&self) -> [f64; 3] {
        let mut sums = [0.0f64; 3];
        for px in &self.pixels {
            for (sum, v) in sums.iter_mut().zip(px.iter()) {
                *sum += f64::from(*v);
            }
        }
        let n = self.pixels.len() as f64;
        [sums[0] / n, sums[1] / n, sums[2] / n]
    }
}
