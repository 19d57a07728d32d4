//! Configuration for context featurization.
//!
//! [`FeaturizerConfig`] is handed to [`crate::ContextFeaturizer::new`] once
//! and validated there; nothing in this crate reads configuration from the
//! environment or from process-wide state.

use serde::{Deserialize, Serialize};

use crate::error::FeaturizerError;
use crate::token::Extractor;

/// Tunables for the context featurizer.
///
/// The defaults reproduce the classic behavior: TF-IDF capped at `1.0`,
/// lexicon entries with no non-negative similarity scored `0.0`, and tokens
/// tagged by the `pattern` or `system` extractors left out of the embedding
/// centroid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeaturizerConfig {
    /// Configuration schema version.
    ///
    /// Bump when a change here can alter the produced feature vectors, so
    /// vectors computed under different settings can be told apart.
    pub version: u32,
    /// Upper bound applied to each token's TF-IDF weight.
    pub tfidf_cap: f32,
    /// Score used for a lexicon vector when no token has a defined,
    /// non-negative similarity to it.
    pub similarity_fallback: f32,
    /// Entity extractors whose tags disqualify a token from the centroid.
    pub excluded_extractors: Vec<Extractor>,
    /// Featurize batches on the rayon thread pool.
    pub use_parallel: bool,
}

impl FeaturizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tfidf_cap(mut self, cap: f32) -> Self {
        self.tfidf_cap = cap;
        self
    }

    pub fn with_similarity_fallback(mut self, fallback: f32) -> Self {
        self.similarity_fallback = fallback;
        self
    }

    pub fn with_excluded_extractors(mut self, extractors: Vec<Extractor>) -> Self {
        self.excluded_extractors = extractors;
        self
    }

    /// Enable or disable rayon for [`crate::ContextFeaturizer::featurize_batch`].
    /// Output is identical either way.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Whether a tag from `extractor` removes a token from the centroid.
    pub fn excludes(&self, extractor: &Extractor) -> bool {
        self.excluded_extractors.contains(extractor)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), FeaturizerError> {
        if self.version < 1 {
            return Err(FeaturizerError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if !self.tfidf_cap.is_finite() || self.tfidf_cap <= 0.0 {
            return Err(FeaturizerError::InvalidConfigTfidfCap {
                cap: self.tfidf_cap,
            });
        }
        if !(0.0..=1.0).contains(&self.similarity_fallback) {
            return Err(FeaturizerError::InvalidConfigFallback {
                fallback: self.similarity_fallback,
            });
        }
        Ok(())
    }
}

impl Default for FeaturizerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            tfidf_cap: 1.0,
            similarity_fallback: 0.0,
            excluded_extractors: vec![Extractor::Pattern, Extractor::System],
            use_parallel: false,
        }
    }
}
