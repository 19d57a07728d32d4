//! Umbrella crate for context featurization.
//!
//! Re-exports the featurizer and vector-math crates, and adds what a caller
//! needs around them: YAML configuration loading ([`config`]), a JSON request
//! shape, and a pluggable metrics observer timing every featurization.

pub mod config;

pub use featurizer::{
    ContextFeatures, ContextFeaturizer, EntityAnnotation, Extractor, FEATURIZER_ALGORITHM,
    FEATURIZER_VERSION, FeatureMeta, FeaturizerConfig, FeaturizerError, Lexicon, Token,
    Utterance, compute_context_features, is_content_token, lexicon_scores,
};
pub use vecmath::{
    VecMathError, cosine_similarity, l2_normalize_in_place, norm, scalar_divide, vector_add,
    zeroes,
};

pub use crate::config::{ConfigLoadError, CtxfeatConfig, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};
use tracing::warn;

/// Errors surfaced by the request-level helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Featurizer(FeaturizerError),
    InvalidRequest(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Featurizer(err) => write!(f, "featurization failed: {err}"),
            PipelineError::InvalidRequest(msg) => write!(f, "invalid feature request: {msg}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Featurizer(err) => Some(err),
            PipelineError::InvalidRequest(_) => None,
        }
    }
}

impl From<FeaturizerError> for PipelineError {
    fn from(value: FeaturizerError) -> Self {
        PipelineError::Featurizer(value)
    }
}

/// A batch of utterances to featurize against one lexicon.
///
/// ```json
/// {
///   "lexicon": [[0.1, 0.9], [1.0, 0.0]],
///   "utterances": [
///     { "tokens": [ { "vector": [0.3, 0.4], "tfidf": 0.7, "is_word": true } ] }
///   ]
/// }
/// ```
///
/// `lexicon` may be omitted. Token, utterance and lexicon shapes are validated
/// while parsing, so a request that parses is safe to featurize up to the
/// lexicon/utterance dimension check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRequest {
    #[serde(default)]
    pub lexicon: Lexicon,
    pub utterances: Vec<Utterance>,
}

impl FeatureRequest {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(json).map_err(|err| PipelineError::InvalidRequest(err.to_string()))
    }
}

/// Metrics observer for featurization calls.
pub trait PipelineMetrics: Send + Sync {
    fn record_featurize(&self, latency: Duration, result: Result<(), FeaturizerError>);
    fn record_batch(&self, latency: Duration, size: usize, result: Result<(), FeaturizerError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_featurize(self, result: Result<(), FeaturizerError>) {
        self.recorder.record_featurize(self.start.elapsed(), result);
    }

    fn record_batch(self, size: usize, result: Result<(), FeaturizerError>) {
        self.recorder
            .record_batch(self.start.elapsed(), size, result);
    }
}

/// Featurize one utterance, reporting latency and outcome to the installed
/// metrics recorder.
pub fn featurize_utterance(
    featurizer: &ContextFeaturizer,
    utterance: &Utterance,
    lexicon: &Lexicon,
) -> Result<ContextFeatures, PipelineError> {
    let span = MetricsSpan::start();
    let result = featurizer.featurize(utterance, lexicon);
    if let Err(err) = &result {
        warn!(error = %err, tokens = utterance.len(), "featurize_failure");
    }
    if let Some(span) = span {
        span.record_featurize(result.as_ref().map(|_| ()).map_err(Clone::clone));
    }
    result.map_err(PipelineError::from)
}

/// Featurize a batch of utterances, reporting once for the whole batch.
pub fn featurize_batch(
    featurizer: &ContextFeaturizer,
    utterances: &[Utterance],
    lexicon: &Lexicon,
) -> Result<Vec<ContextFeatures>, PipelineError> {
    let span = MetricsSpan::start();
    let result = featurizer.featurize_batch(utterances, lexicon);
    if let Err(err) = &result {
        warn!(error = %err, batch = utterances.len(), "featurize_batch_failure");
    }
    if let Some(span) = span {
        span.record_batch(
            utterances.len(),
            result.as_ref().map(|_| ()).map_err(Clone::clone),
        );
    }
    result.map_err(PipelineError::from)
}

/// Featurize every utterance of a parsed request with `cfg`.
pub fn process_request(
    request: &FeatureRequest,
    cfg: &FeaturizerConfig,
) -> Result<Vec<ContextFeatures>, PipelineError> {
    let featurizer = ContextFeaturizer::new(cfg.clone())?;
    featurize_batch(&featurizer, &request.utterances, &request.lexicon)
}
