//! Reconciliation of the heuristic and model scores
//!
//! The heuristic score is authoritative; the model outcome is recorded
//! for audit and only influences the confidence tag.

use crate::model::ModelOutcome;
use crate::report::round_dp;
use crate::risk::RiskLevel;
use serde::Serialize;

/// Confidence when the model path fell back to a mock estimate
pub const MOCK_CONFIDENCE: f64 = 0.6;
/// Confidence when the backing model answered
pub const MODEL_CONFIDENCE: f64 = 0.8;

/// Audit record comparing the model's raw score with the heuristic
#[derive(Debug, Clone, Serialize)]
pub struct ModelDetails {
    pub source: String,
    pub original_score: f64,
    pub original_level: String,
    pub adjustment_applied: bool,
}

/// Derive confidence and the audit record for one request.
///
/// Confidence reflects provenance, not statistical uncertainty: it is
/// 0.6 for any mock source and 0.8 otherwise. `adjustment_applied`
/// marks results where the authoritative heuristic diverged from the
/// model path (mock source, or scores more than 0.01 apart).
pub fn reconcile(heuristic_score: f64, outcome: &ModelOutcome) -> (f64, ModelDetails) {
    let confidence = if outcome.source.is_mock() {
        MOCK_CONFIDENCE
    } else {
        MODEL_CONFIDENCE
    };

    let adjustment_applied =
        outcome.source.is_mock() || (heuristic_score - outcome.score).abs() > 0.01;

    let details = ModelDetails {
        source: outcome.source.as_str().to_string(),
        original_score: round_dp(outcome.score, 6),
        original_level: RiskLevel::from_index(outcome.level_index).as_str().to_string(),
        adjustment_applied,
    };

    (confidence, details)
}
