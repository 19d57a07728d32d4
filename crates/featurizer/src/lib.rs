//! # Context featurization
//!
//! Turns a tokenized utterance into the fixed-length feature vector consumed
//! by a context/intent classifier.
//!
//! ## Contract
//!
//! - Tokens arrive already embedded and TF-IDF weighted; this crate never
//!   tokenizes, embeds, or detects entities.
//! - Featurization is a pure function of `(utterance, lexicon, config)`: no
//!   I/O, no clocks, no process-wide state. Identical inputs give
//!   bit-identical outputs, and calls may run concurrently.
//! - Output length is always `D + |lexicon|`, where `D` is the embedding
//!   dimension of the utterance.
//!
//! ## Feature layout
//!
//! 1. **Centroid** (`D` values): unit-normalized embeddings of content tokens
//!    averaged with weight `min(tfidf_cap, tfidf)`. Content tokens are word
//!    tokens carrying no `pattern`/`system` entity tag (configurable).
//! 2. **Lexicon scores** (`|lexicon|` values): for each lexicon vector, the
//!    largest non-negative cosine similarity to any token, else the
//!    configured fallback (`0.0`). Scores lie in `[0, 1]`.
//!
//! An utterance without content tokens maps to all zeros.
//!
//! ## Example
//!
//! ```
//! use featurizer::{ContextFeaturizer, FeaturizerConfig, Lexicon, Token, Utterance};
//!
//! let utterance = Utterance::new(vec![
//!     Token::word(vec![1.0, 0.0], 0.5).unwrap(),
//!     Token::non_word(vec![0.0, 1.0]).unwrap(),
//! ])
//! .unwrap();
//! let lexicon = Lexicon::new(vec![vec![1.0, 0.0]]).unwrap();
//!
//! let featurizer = ContextFeaturizer::new(FeaturizerConfig::default()).unwrap();
//! let features = featurizer.featurize(&utterance, &lexicon).unwrap();
//!
//! assert_eq!(features.values, vec![1.0, 0.0, 1.0]);
//! ```

pub mod config;
mod error;
mod featurize;
pub mod features;
mod token;
mod utterance;

use rayon::prelude::*;
use tracing::debug;

pub use crate::config::FeaturizerConfig;
pub use crate::error::FeaturizerError;
pub use crate::featurize::{compute_context_features, is_content_token, lexicon_scores};
pub use crate::features::{ContextFeatures, FeatureMeta};
pub use crate::token::{EntityAnnotation, Extractor, Token};
pub use crate::utterance::{Lexicon, Utterance};

/// Current featurizer algorithm version for this crate.
pub const FEATURIZER_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const FEATURIZER_ALGORITHM: &str = "tfidf_centroid_lexmax_v1";

/// Featurizer bound to one validated configuration.
///
/// Holds no mutable state, so a single instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ContextFeaturizer {
    cfg: FeaturizerConfig,
}

impl ContextFeaturizer {
    /// Validate `cfg` and build a featurizer around it.
    pub fn new(cfg: FeaturizerConfig) -> Result<Self, FeaturizerError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &FeaturizerConfig {
        &self.cfg
    }

    /// Feature vector of one utterance.
    pub fn featurize(
        &self,
        utterance: &Utterance,
        lexicon: &Lexicon,
    ) -> Result<ContextFeatures, FeaturizerError> {
        featurize::featurize_validated(utterance, lexicon, &self.cfg)
    }

    /// Feature vectors for many utterances against one lexicon, in input
    /// order. Runs on rayon when `use_parallel` is set; the first error
    /// encountered aborts the batch.
    pub fn featurize_batch(
        &self,
        utterances: &[Utterance],
        lexicon: &Lexicon,
    ) -> Result<Vec<ContextFeatures>, FeaturizerError> {
        debug!(
            batch = utterances.len(),
            parallel = self.cfg.use_parallel,
            "featurizing batch"
        );
        if self.cfg.use_parallel {
            utterances
                .par_iter()
                .map(|u| self.featurize(u, lexicon))
                .collect()
        } else {
            utterances
                .iter()
                .map(|u| self.featurize(u, lexicon))
                .collect()
        }
    }
}
