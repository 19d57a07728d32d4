//! Output types of the featurizer.
//!
//! The layout of [`ContextFeatures::values`] is part of the public contract:
//! downstream classifiers are trained against it. Any change to the layout or
//! to how either half is computed must bump [`crate::FEATURIZER_VERSION`].

use serde::{Deserialize, Serialize};

/// Feature vector for one utterance.
///
/// `values` holds `embedding_dim + lexicon_len` numbers: the TF-IDF weighted
/// embedding centroid first, then one similarity score per lexicon vector in
/// lexicon order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextFeatures {
    pub values: Vec<f32>,
    pub meta: FeatureMeta,
}

/// How a [`ContextFeatures`] was produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureMeta {
    /// Featurizer algorithm version.
    pub featurizer_version: u16,
    /// Human-readable algorithm identifier.
    pub algorithm_name: String,
    /// Embedding dimension `D` of the utterance.
    pub embedding_dim: usize,
    /// Number of lexicon vectors.
    pub lexicon_len: usize,
    /// Tokens that passed the content filter and fed the centroid.
    /// Zero means the whole vector is the all-zero fallback.
    pub content_tokens: usize,
    /// [`crate::FeaturizerConfig::version`] in effect.
    pub config_version: u32,
}

impl ContextFeatures {
    /// The weighted mean embedding (first `embedding_dim` values).
    pub fn embedding(&self) -> &[f32] {
        &self.values[..self.split()]
    }

    /// Per-lexicon similarity scores (trailing `lexicon_len` values).
    pub fn lexicon_scores(&self) -> &[f32] {
        &self.values[self.split()..]
    }

    // clamped to values.len(); meta may disagree on hand-built values
    fn split(&self) -> usize {
        self.meta.embedding_dim.min(self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_degenerate(&self) -> bool {
        self.meta.content_tokens == 0
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

impl AsRef<[f32]> for ContextFeatures {
    fn as_ref(&self) -> &[f32] {
        &self.values
    }
}
