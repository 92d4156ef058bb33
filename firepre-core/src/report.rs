//! Prediction result assembly and output generation
//!
//! Field names are the wire contract consumed by existing clients; the
//! factors map uses a BTreeMap so serialization order is deterministic.

use crate::input::RiskInput;
use crate::normalize::NormalizedFactors;
use crate::reconcile::ModelDetails;
use crate::risk::{Contributions, Impact, RiskLevel};
use serde::Serialize;
use std::collections::BTreeMap;

/// Round to a fixed number of decimal places
pub(crate) fn round_dp(v: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (v * scale).round() / scale
}

/// One input's share of the heuristic score, with a human-readable
/// impact bucket
#[derive(Debug, Clone, Serialize)]
pub struct FactorContribution {
    /// Raw input value
    pub value: f64,
    /// "Low", "Medium", or "High"
    pub impact: &'static str,
    /// Static explanation of the factor's direction
    pub description: &'static str,
    /// Weighted contribution to the heuristic score, 4 decimals
    pub contribution: f64,
}

/// Complete scoring result for one request
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub risk_level: String,
    /// Authoritative heuristic score, 6 decimals
    pub risk_score: f64,
    /// Provenance confidence, 2 decimals
    pub confidence: f64,
    pub factors: BTreeMap<&'static str, FactorContribution>,
    pub recommendations: Vec<String>,
    pub model_details: ModelDetails,
}

fn factor(
    value: f64,
    normalized: f64,
    description: &'static str,
    contribution: f64,
) -> FactorContribution {
    FactorContribution {
        value,
        impact: Impact::from_factor(normalized).as_str(),
        description,
        contribution: round_dp(contribution, 4),
    }
}

/// Build the per-factor breakdown for a result
pub fn build_factors(
    input: &RiskInput,
    factors: &NormalizedFactors,
    contributions: &Contributions,
) -> BTreeMap<&'static str, FactorContribution> {
    let mut map = BTreeMap::new();
    map.insert(
        "temperature",
        factor(
            input.temperature,
            factors.temperature,
            "Higher temperatures increase wildfire risk",
            contributions.temperature,
        ),
    );
    map.insert(
        "humidity",
        factor(
            input.humidity,
            factors.humidity,
            "Lower humidity increases wildfire risk",
            contributions.humidity,
        ),
    );
    map.insert(
        "wind_speed",
        factor(
            input.wind_speed,
            factors.wind,
            "Higher wind speeds can spread wildfires faster",
            contributions.wind,
        ),
    );
    map.insert(
        "precipitation",
        factor(
            input.precipitation,
            factors.precipitation,
            "Lower precipitation leads to drier conditions and higher risk",
            contributions.precipitation,
        ),
    );
    map.insert(
        "vegetation_density",
        factor(
            input.vegetation_density_or_default(),
            factors.vegetation,
            "Higher vegetation density provides more fuel for wildfires",
            contributions.vegetation,
        ),
    );
    map
}

/// Assemble the final result from the pipeline stages
pub fn build_result(
    input: &RiskInput,
    normalized: &NormalizedFactors,
    contributions: &Contributions,
    risk_score: f64,
    level: RiskLevel,
    confidence: f64,
    model_details: ModelDetails,
) -> PredictionResult {
    PredictionResult {
        risk_level: level.as_str().to_string(),
        risk_score: round_dp(risk_score, 6),
        confidence: round_dp(confidence, 2),
        factors: build_factors(input, normalized, contributions),
        recommendations: crate::advisor::recommendations(level)
            .iter()
            .map(|r| (*r).to_string())
            .collect(),
        model_details,
    }
}

/// Render a result as pretty JSON
pub fn render_json(result: &PredictionResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}

/// Render a result as human-readable text
pub fn render_text(result: &PredictionResult) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Risk level: {} (score {:.6}, confidence {:.2})\n",
        result.risk_level, result.risk_score, result.confidence
    ));

    output.push_str(&format!(
        "\n{:<20} {:<12} {:<8} {}\n",
        "FACTOR", "VALUE", "IMPACT", "CONTRIBUTION"
    ));
    for (name, f) in &result.factors {
        output.push_str(&format!(
            "{:<20} {:<12} {:<8} {:.4}\n",
            name, f.value, f.impact, f.contribution
        ));
    }

    output.push_str("\nRecommendations:\n");
    for rec in &result.recommendations {
        output.push_str(&format!("  - {rec}\n"));
    }

    output.push_str(&format!(
        "\nModel: {} (raw score {:.6}, level {}{})\n",
        result.model_details.source,
        result.model_details.original_score,
        result.model_details.original_level,
        if result.model_details.adjustment_applied {
            ", adjusted"
        } else {
            ""
        }
    ));

    output
}
