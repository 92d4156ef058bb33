//! Model adapter: discovery, single-flight loading, isolated invocation,
//! and the deterministic mock fallback
//!
//! The learned model is a secondary signal. Every failure mode here
//! (missing artifact, load error, invocation error, timeout) degrades
//! to the mock estimate and is recorded in the outcome's source tag;
//! nothing propagates to the caller.

use crate::config::ResolvedConfig;
use crate::grid::FeatureGrid;
use crate::input::RiskInput;
use crate::normalize::clamp01;
use crate::risk::level_index;
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use rand::Rng;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Failures internal to the model path. All of them are recovered by
/// falling back to the mock estimate.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("no backing model artifact available")]
    Unavailable,
    #[error("model invocation failed: {0}")]
    Invocation(String),
    #[error("model invocation timed out")]
    Timeout,
}

/// Provenance of a model outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// The backing model produced the score
    Model,
    /// No backing artifact was found; the mock estimate was used
    MockNoModel,
    /// The backing model failed or timed out; the mock estimate was used
    MockDueToError,
}

impl ModelSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSource::Model => "model",
            ModelSource::MockNoModel => "mock_no_model",
            ModelSource::MockDueToError => "mock_due_to_error",
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, ModelSource::MockNoModel | ModelSource::MockDueToError)
    }
}

/// Raw model-path result for one request, recorded for audit
#[derive(Debug, Clone, Copy)]
pub struct ModelOutcome {
    /// Probability in [0,1]
    pub score: f64,
    /// Level index in 0..=4 for the raw score
    pub level_index: usize,
    pub source: ModelSource,
}

/// Capability of a backing predictive model
pub trait ModelBackend {
    /// Wildfire probability in [0,1] for an encoded feature grid
    fn predict(&self, grid: &FeatureGrid) -> Result<f64, ModelError>;
}

/// Logistic model over the grid's channel means, loaded from a JSON
/// artifact `{"bias": .., "weights": [r, g, b]}`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LinearModel {
    pub bias: f64,
    pub weights: [f64; 3],
}

impl ModelBackend for LinearModel {
    fn predict(&self, grid: &FeatureGrid) -> Result<f64, ModelError> {
        let means = grid.channel_means();
        let z = self.bias
            + self.weights[0] * means[0]
            + self.weights[1] * means[1]
            + self.weights[2] * means[2];
        if !z.is_finite() {
            return Err(ModelError::Invocation(format!(
                "non-finite activation {z} from weights {:?}",
                self.weights
            )));
        }
        Ok(clamp01(sigmoid(z)))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Candidate artifact file names, highest priority first: a freshly
/// created model wins over a format-converted one, which wins over the
/// original.
pub const MODEL_CANDIDATES: &[&str] = &[
    "wildfire_model_new.json",
    "wildfire_model_converted.json",
    "wildfire_model.json",
];

/// First existing location from a priority-ordered candidate list
pub fn discover_first(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.exists()).cloned()
}

/// First existing candidate artifact under the models directory
pub fn discover_model(models_dir: &Path) -> Option<PathBuf> {
    let candidates: Vec<PathBuf> = MODEL_CANDIDATES
        .iter()
        .map(|name| models_dir.join(name))
        .collect();
    discover_first(&candidates)
}

/// Parse a model artifact from disk
pub fn load_model(path: &Path) -> Result<LinearModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model artifact: {}", path.display()))?;
    let model: LinearModel = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse model artifact: {}", path.display()))?;
    Ok(model)
}

/// Single-flight memoized model loader.
///
/// The filesystem is probed at most once per loader lifetime; the
/// loaded handle (or the absence of one) is cached and shared across
/// concurrent callers. Concurrent first loads serialize inside the
/// cell; later lookups take no lock.
#[derive(Debug, Default)]
pub struct ModelLoader {
    cell: OnceCell<Option<LinearModel>>,
}

impl ModelLoader {
    pub fn new() -> ModelLoader {
        ModelLoader::default()
    }

    /// Cached handle, probing and loading on first call only
    pub fn get_or_load(&self, models_dir: &Path) -> Option<&LinearModel> {
        self.cell
            .get_or_init(|| match discover_model(models_dir) {
                Some(path) => match load_model(&path) {
                    Ok(model) => {
                        info!(artifact = %path.display(), "model loaded");
                        Some(model)
                    }
                    Err(e) => {
                        warn!(artifact = %path.display(), error = %e, "model load failed, using mock predictions");
                        None
                    }
                },
                None => {
                    warn!(dir = %models_dir.display(), "no model artifact found, using mock predictions");
                    None
                }
            })
            .as_ref()
    }
}

/// Run a prediction on its own thread and wait at most `timeout`.
///
/// A slow or hung backend must not stall the scoring request; a timeout
/// is treated exactly like an invocation failure by the caller.
pub fn invoke_with_timeout<B>(
    backend: B,
    grid: FeatureGrid,
    timeout: Duration,
) -> Result<f64, ModelError>
where
    B: ModelBackend + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(backend.predict(&grid));
    });
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(_) => Err(ModelError::Timeout),
    }
}

/// Model-free estimate used whenever no backing model can answer.
///
/// Signed weights over the model-encoding normalization ranges with a
/// 0.5 baseline; the confidence is randomized in [0.70, 0.95) and only
/// logged, it never reaches the final result.
#[derive(Debug, Clone, Copy)]
pub struct MockEstimate {
    pub score: f64,
    pub level_index: usize,
    pub confidence: f64,
}

/// Compute the mock estimate for an input
pub fn mock_prediction(input: &RiskInput) -> MockEstimate {
    const TEMPERATURE_WEIGHT: f64 = 0.3;
    const HUMIDITY_WEIGHT: f64 = -0.25;
    const WIND_WEIGHT: f64 = 0.25;
    const PRECIPITATION_WEIGHT: f64 = -0.2;
    const BASELINE: f64 = 0.5;

    let temp_norm = clamp01((input.temperature - 15.0) / 25.0);
    let humidity_norm = clamp01(input.humidity / 100.0);
    let wind_norm = clamp01(input.wind_speed / 50.0);
    let precip_norm = clamp01(input.precipitation / 25.0);

    let score = clamp01(
        temp_norm * TEMPERATURE_WEIGHT
            + humidity_norm * HUMIDITY_WEIGHT
            + wind_norm * WIND_WEIGHT
            + precip_norm * PRECIPITATION_WEIGHT
            + BASELINE,
    );

    let confidence = rand::thread_rng().gen_range(0.70..0.95);

    MockEstimate {
        score,
        level_index: level_index(score),
        confidence,
    }
}

/// Score through the backing model, or say why it could not answer
fn try_model_score(
    loader: &ModelLoader,
    config: &ResolvedConfig,
    input: &RiskInput,
) -> Result<f64, ModelError> {
    let model = loader
        .get_or_load(&config.models_dir)
        .ok_or(ModelError::Unavailable)?;
    let grid = FeatureGrid::from_input(input, config.grid_size);
    invoke_with_timeout(*model, grid, config.model_timeout)
}

/// Produce the model-path outcome for one request: the backing model
/// when available and healthy, the mock estimate otherwise.
pub fn model_outcome(
    loader: &ModelLoader,
    config: &ResolvedConfig,
    input: &RiskInput,
) -> ModelOutcome {
    let source = match try_model_score(loader, config, input) {
        Ok(probability) => {
            debug!(probability, "raw model output");
            return ModelOutcome {
                score: probability,
                level_index: level_index(probability),
                source: ModelSource::Model,
            };
        }
        Err(ModelError::Unavailable) => ModelSource::MockNoModel,
        Err(e) => {
            warn!(error = %e, "model invocation failed, falling back to mock prediction");
            ModelSource::MockDueToError
        }
    };

    let mock = mock_prediction(input);
    debug!(score = mock.score, confidence = mock.confidence, "mock estimate");
    ModelOutcome {
        score: mock.score,
        level_index: mock.level_index,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

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
    fn test_mock_prediction_within_bounds() {
        for (t, h, w, p) in [
            (-10.0, 100.0, 0.0, 50.0),
            (20.0, 50.0, 10.0, 5.0),
            (50.0, 0.0, 80.0, 0.0),
        ] {
            let mock = mock_prediction(&input(t, h, w, p));
            assert!((0.0..=1.0).contains(&mock.score));
            assert!(mock.level_index <= 4);
            assert!((0.70..0.95).contains(&mock.confidence));
        }
    }

    #[test]
    fn test_mock_score_is_deterministic() {
        let a = mock_prediction(&input(32.0, 30.0, 25.0, 0.0));
        let b = mock_prediction(&input(32.0, 30.0, 25.0, 0.0));
        assert_eq!(a.score, b.score);
        assert_eq!(a.level_index, b.level_index);
    }

    #[test]
    fn test_mock_baseline_at_neutral_extremes() {
        // Every normalized term is zero here, leaving only the baseline
        let mock = mock_prediction(&input(15.0, 0.0, 0.0, 0.0));
        assert_eq!(mock.score, 0.5);
    }

    #[test]
    fn test_linear_model_predicts_probability() {
        let model = LinearModel {
            bias: -1.0,
            weights: [2.0, -1.0, -0.5],
        };
        let grid = FeatureGrid::from_input(&input(40.0, 20.0, 30.0, 0.0), 16);
        let p = model.predict(&grid).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_linear_model_rejects_non_finite_activation() {
        let model = LinearModel {
            bias: f64::NAN,
            weights: [0.0, 0.0, 0.0],
        };
        let grid = FeatureGrid::from_input(&input(25.0, 50.0, 10.0, 0.0), 8);
        assert!(matches!(
            model.predict(&grid),
            Err(ModelError::Invocation(_))
        ));
    }

    #[test]
    fn test_discover_prefers_new_over_converted_over_original() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = r#"{"bias": 0.0, "weights": [1.0, -1.0, -1.0]}"#;

        fs::write(dir.path().join("wildfire_model.json"), artifact).unwrap();
        assert_eq!(
            discover_model(dir.path()).unwrap(),
            dir.path().join("wildfire_model.json")
        );

        fs::write(dir.path().join("wildfire_model_converted.json"), artifact).unwrap();
        assert_eq!(
            discover_model(dir.path()).unwrap(),
            dir.path().join("wildfire_model_converted.json")
        );

        fs::write(dir.path().join("wildfire_model_new.json"), artifact).unwrap();
        assert_eq!(
            discover_model(dir.path()).unwrap(),
            dir.path().join("wildfire_model_new.json")
        );
    }

    #[test]
    fn test_discover_empty_dir_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_model(dir.path()).is_none());
    }

    #[test]
    fn test_load_model_rejects_malformed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wildfire_model.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_model(&path).is_err());
    }

    #[test]
    fn test_loader_memoizes_absence() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModelLoader::new();
        assert!(loader.get_or_load(dir.path()).is_none());

        // An artifact appearing later must not be picked up: the probe
        // happens at most once per loader lifetime
        fs::write(
            dir.path().join("wildfire_model.json"),
            r#"{"bias": 0.0, "weights": [1.0, -1.0, -1.0]}"#,
        )
        .unwrap();
        assert!(loader.get_or_load(dir.path()).is_none());
    }

    #[test]
    fn test_loader_returns_same_handle() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("wildfire_model.json"),
            r#"{"bias": 0.5, "weights": [1.0, -1.0, -1.0]}"#,
        )
        .unwrap();
        let loader = ModelLoader::new();
        let first = loader.get_or_load(dir.path()).unwrap() as *const LinearModel;
        let second = loader.get_or_load(dir.path()).unwrap() as *const LinearModel;
        assert_eq!(first, second);
    }

    struct HangingBackend;

    impl ModelBackend for HangingBackend {
        fn predict(&self, _grid: &FeatureGrid) -> Result<f64, ModelError> {
            std::thread::sleep(Duration::from_secs(5));
            Ok(0.5)
        }
    }

    #[test]
    fn test_invoke_timeout_is_bounded() {
        let grid = FeatureGrid::from_input(&input(25.0, 50.0, 10.0, 0.0), 8);
        let result = invoke_with_timeout(HangingBackend, grid, Duration::from_millis(50));
        assert!(matches!(result, Err(ModelError::Timeout)));
    }

    #[test]
    fn test_invoke_returns_backend_result() {
        let model = LinearModel {
            bias: 0.0,
            weights: [0.0, 0.0, 0.0],
        };
        let grid = FeatureGrid::from_input(&input(25.0, 50.0, 10.0, 0.0), 8);
        let p = invoke_with_timeout(model, grid, Duration::from_secs(1)).unwrap();
        assert_eq!(p, 0.5);
    }

    fn config_for(dir: &Path) -> ResolvedConfig {
        ResolvedConfig {
            models_dir: dir.to_path_buf(),
            grid_size: 16,
            ..ResolvedConfig::default()
        }
    }

    #[test]
    fn test_outcome_without_artifact_is_mock() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModelLoader::new();
        let outcome = model_outcome(&loader, &config_for(dir.path()), &input(30.0, 30.0, 20.0, 0.0));
        assert_eq!(outcome.source, ModelSource::MockNoModel);
        assert!((0.0..=1.0).contains(&outcome.score));
        assert!(outcome.level_index <= 4);
    }

    #[test]
    fn test_outcome_with_artifact_uses_model() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("wildfire_model_new.json"),
            r#"{"bias": -0.5, "weights": [1.5, -1.0, -0.8]}"#,
        )
        .unwrap();
        let loader = ModelLoader::new();
        let outcome = model_outcome(&loader, &config_for(dir.path()), &input(30.0, 30.0, 20.0, 0.0));
        assert_eq!(outcome.source, ModelSource::Model);
        assert!((0.0..=1.0).contains(&outcome.score));
    }

    #[test]
    fn test_source_tags() {
        assert_eq!(ModelSource::Model.as_str(), "model");
        assert_eq!(ModelSource::MockNoModel.as_str(), "mock_no_model");
        assert_eq!(ModelSource::MockDueToError.as_str(), "mock_due_to_error");
        assert!(!ModelSource::Model.is_mock());
        assert!(ModelSource::MockNoModel.is_mock());
        assert!(ModelSource::MockDueToError.is_mock());
    }
}
