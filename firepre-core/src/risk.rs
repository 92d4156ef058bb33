//! Heuristic risk scoring and classification
//!
//! Global invariants enforced:
//! - Deterministic scoring: identical factors yield identical scores
//! - Weights sum to 1.0, so the score naturally lies in [0,1]

use crate::normalize::{clamp01, NormalizedFactors};

/// Discrete risk level derived from a continuous risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,      // index 0
    Moderate, // index 1
    High,     // index 2
    VeryHigh, // index 3
    Extreme,  // index 4
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
            RiskLevel::Extreme => "Extreme",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Moderate => 1,
            RiskLevel::High => 2,
            RiskLevel::VeryHigh => 3,
            RiskLevel::Extreme => 4,
        }
    }

    /// Level for an index, clamping anything above 4 to Extreme
    pub fn from_index(index: usize) -> RiskLevel {
        match index {
            0 => RiskLevel::Low,
            1 => RiskLevel::Moderate,
            2 => RiskLevel::High,
            3 => RiskLevel::VeryHigh,
            _ => RiskLevel::Extreme,
        }
    }
}

/// Level index for a risk score: floor(score * 5) clamped to [0,4]
pub fn level_index(score: f64) -> usize {
    // Saturating cast: negative products floor to 0
    ((score * 5.0) as usize).min(4)
}

/// Classify a risk score into its discrete level
pub fn level_for_score(score: f64) -> RiskLevel {
    RiskLevel::from_index(level_index(score))
}

/// Impact bucket for a single normalized factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Low => "Low",
            Impact::Medium => "Medium",
            Impact::High => "High",
        }
    }

    /// Bucket a normalized factor: High above 0.7, Medium above 0.3, else Low
    pub fn from_factor(factor: f64) -> Impact {
        if factor > 0.7 {
            Impact::High
        } else if factor > 0.3 {
            Impact::Medium
        } else {
            Impact::Low
        }
    }
}

/// Configurable weights for the heuristic risk score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    pub temperature: f64,
    pub humidity: f64,
    pub wind: f64,
    pub precipitation: f64,
    pub vegetation: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        FactorWeights {
            temperature: 0.30,
            humidity: 0.25,
            wind: 0.20,
            precipitation: 0.15,
            vegetation: 0.10,
        }
    }
}

impl FactorWeights {
    pub fn sum(&self) -> f64 {
        self.temperature + self.humidity + self.wind + self.precipitation + self.vegetation
    }
}

/// Per-factor weighted contributions to the heuristic score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contributions {
    pub temperature: f64,
    pub humidity: f64,
    pub wind: f64,
    pub precipitation: f64,
    pub vegetation: f64,
}

impl Contributions {
    pub fn total(&self) -> f64 {
        self.temperature + self.humidity + self.wind + self.precipitation + self.vegetation
    }
}

/// Weighted contribution of each normalized factor
pub fn weighted_contributions(
    factors: &NormalizedFactors,
    weights: &FactorWeights,
) -> Contributions {
    Contributions {
        temperature: factors.temperature * weights.temperature,
        humidity: factors.humidity * weights.humidity,
        wind: factors.wind * weights.wind,
        precipitation: factors.precipitation * weights.precipitation,
        vegetation: factors.vegetation * weights.vegetation,
    }
}

/// Deterministic heuristic risk score: sum of weighted contributions,
/// clamped to [0,1]
pub fn heuristic_score(factors: &NormalizedFactors, weights: &FactorWeights) -> f64 {
    clamp01(weighted_contributions(factors, weights).total())
}
