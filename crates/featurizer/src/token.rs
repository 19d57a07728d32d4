use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FeaturizerError;

/// Which extractor produced an entity annotation.
///
/// Serialized as a lowercase string. Unknown names are kept verbatim in
/// [`Extractor::Other`] so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Extractor {
    /// Regular-expression / pattern matched entity.
    Pattern,
    /// Built-in system entity (numbers, dates, amounts, ...).
    System,
    /// Entity matched from a user-defined list.
    List,
    Other(String),
}

impl Extractor {
    pub fn as_str(&self) -> &str {
        match self {
            Extractor::Pattern => "pattern",
            Extractor::System => "system",
            Extractor::List => "list",
            Extractor::Other(name) => name.as_str(),
        }
    }
}

impl From<String> for Extractor {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pattern" => Extractor::Pattern,
            "system" => Extractor::System,
            "list" => Extractor::List,
            _ => Extractor::Other(value),
        }
    }
}

impl From<&str> for Extractor {
    fn from(value: &str) -> Self {
        Extractor::from(value.to_string())
    }
}

impl From<Extractor> for String {
    fn from(value: Extractor) -> Self {
        match value {
            Extractor::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity detected over a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    pub extractor: Extractor,
    /// Entity type name, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityAnnotation {
    pub fn new(extractor: impl Into<Extractor>) -> Self {
        Self {
            extractor: extractor.into(),
            name: None,
        }
    }

    pub fn named(extractor: impl Into<Extractor>, name: impl Into<String>) -> Self {
        Self {
            extractor: extractor.into(),
            name: Some(name.into()),
        }
    }
}

/// A token of an utterance as produced by upstream tokenization.
///
/// Tokens are validated on construction (and on deserialization): the
/// embedding is non-empty and finite, and the TF-IDF weight is finite and
/// non-negative. Fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawToken")]
pub struct Token {
    vector: Vec<f32>,
    tfidf: f32,
    is_word: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entities: Vec<EntityAnnotation>,
}

/// Unvalidated wire shape of a [`Token`].
#[derive(Deserialize)]
struct RawToken {
    vector: Vec<f32>,
    tfidf: f32,
    is_word: bool,
    #[serde(default)]
    entities: Vec<EntityAnnotation>,
}

impl TryFrom<RawToken> for Token {
    type Error = FeaturizerError;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        Token::new(raw.vector, raw.tfidf, raw.is_word, raw.entities)
    }
}

impl Token {
    pub fn new(
        vector: Vec<f32>,
        tfidf: f32,
        is_word: bool,
        entities: Vec<EntityAnnotation>,
    ) -> Result<Self, FeaturizerError> {
        if vector.is_empty() {
            return Err(FeaturizerError::EmptyEmbedding);
        }
        if let Some(position) = vector.iter().position(|x| !x.is_finite()) {
            return Err(FeaturizerError::NonFiniteEmbedding { position });
        }
        if !tfidf.is_finite() || tfidf < 0.0 {
            return Err(FeaturizerError::InvalidTfidf { tfidf });
        }
        Ok(Self {
            vector,
            tfidf,
            is_word,
            entities,
        })
    }

    /// A plain word token without entity tags.
    pub fn word(vector: Vec<f32>, tfidf: f32) -> Result<Self, FeaturizerError> {
        Self::new(vector, tfidf, true, Vec::new())
    }

    /// A punctuation / whitespace token.
    pub fn non_word(vector: Vec<f32>) -> Result<Self, FeaturizerError> {
        Self::new(vector, 0.0, false, Vec::new())
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    pub fn tfidf(&self) -> f32 {
        self.tfidf
    }

    pub fn is_word(&self) -> bool {
        self.is_word
    }

    pub fn entities(&self) -> &[EntityAnnotation] {
        &self.entities
    }
}
