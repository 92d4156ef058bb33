//! Firepre core library - wildfire risk scoring from weather and
//! environmental readings

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Scoring is total: any well-typed input yields a result, never an error
// - The heuristic score is authoritative; the model score is advisory and logged
// - Fixed tables (levels, weights, recommendations) are constants, never rebuilt per call
// - The model handle is loaded at most once per engine and read-only afterwards

pub mod advisor;
pub mod config;
pub mod grid;
pub mod input;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod risk;

pub use config::ResolvedConfig;
pub use input::RiskInput;
pub use report::{render_json, render_text, PredictionResult};
pub use risk::RiskLevel;

use tracing::{debug, info};

/// The risk-scoring engine: two independent score paths (heuristic and
/// model) reconciled into one explained result.
///
/// The engine owns the memoized model loader, so a single engine should
/// be shared across requests; it is safe to use from concurrent callers.
#[derive(Debug, Default)]
pub struct RiskEngine {
    config: ResolvedConfig,
    loader: model::ModelLoader,
}

impl RiskEngine {
    /// Engine with explicit configuration
    pub fn new(config: ResolvedConfig) -> RiskEngine {
        RiskEngine {
            config,
            loader: model::ModelLoader::new(),
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Score one input. Total-function: internal model failures degrade
    /// to the mock path and never surface.
    pub fn score(&self, input: &RiskInput) -> PredictionResult {
        debug!(
            latitude = input.latitude,
            longitude = input.longitude,
            temperature = input.temperature,
            humidity = input.humidity,
            wind_speed = input.wind_speed,
            precipitation = input.precipitation,
            vegetation_density = input.vegetation_density_or_default(),
            elevation = input.elevation_or_default(),
            drought_index = input.drought_index_or_default(),
            "scoring request"
        );

        // Authoritative path: deterministic weighted heuristic
        let normalized = normalize::normalize(input);
        let contributions = risk::weighted_contributions(&normalized, &self.config.weights);
        let risk_score = normalize::clamp01(contributions.total());

        // Advisory path: learned model, or its mock stand-in
        let outcome = model::model_outcome(&self.loader, &self.config, input);
        debug!(
            heuristic = risk_score,
            model = outcome.score,
            source = outcome.source.as_str(),
            "score comparison"
        );

        let (confidence, model_details) = reconcile::reconcile(risk_score, &outcome);
        let level = risk::level_for_score(risk_score);

        info!(
            level = level.as_str(),
            score = risk_score,
            confidence,
            "prediction"
        );

        report::build_result(
            input,
            &normalized,
            &contributions,
            risk_score,
            level,
            confidence,
            model_details,
        )
    }
}

/// Score one input with default configuration and a throwaway engine.
///
/// Prefer building a [`RiskEngine`] once and reusing it: this
/// convenience re-probes the model directory on every call.
pub fn score(input: &RiskInput) -> PredictionResult {
    RiskEngine::default().score(input)
}
