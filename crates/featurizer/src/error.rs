use thiserror::Error;
use vecmath::VecMathError;

/// Errors returned while validating featurizer inputs or computing features.
///
/// Input-shape errors are raised at construction time ([`crate::Utterance::new`],
/// [`crate::Lexicon::new`], [`crate::Token::new`]) so a malformed payload never
/// reaches the numeric code. The only shape check left for featurization is
/// the lexicon/utterance dimension agreement, since the two are built apart.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeaturizerError {
    #[error("utterance has no tokens")]
    EmptyUtterance,

    #[error("token embedding must have at least one dimension")]
    EmptyEmbedding,

    #[error("token {index} has dimension {found}, expected {expected}")]
    TokenDimension {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("lexicon vector {index} has dimension {found}, expected {expected}")]
    LexiconDimension {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("embedding contains a non-finite component at position {position}")]
    NonFiniteEmbedding { position: usize },

    #[error("lexicon vector {index} contains a non-finite component at position {position}")]
    NonFiniteLexicon { index: usize, position: usize },

    #[error("tfidf weight must be finite and >= 0 (got {tfidf})")]
    InvalidTfidf { tfidf: f32 },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("invalid config: tfidf_cap must be finite and > 0 (got {cap})")]
    InvalidConfigTfidfCap { cap: f32 },

    #[error("invalid config: similarity_fallback must lie in [0, 1] (got {fallback})")]
    InvalidConfigFallback { fallback: f32 },

    #[error("vector math failure: {0}")]
    VecMath(#[from] VecMathError),
}
