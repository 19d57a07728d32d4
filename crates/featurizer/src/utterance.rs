use serde::{Deserialize, Serialize};

use crate::error::FeaturizerError;
use crate::token::Token;

/// A tokenized utterance: a non-empty sequence of tokens sharing one
/// embedding dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUtterance")]
pub struct Utterance {
    tokens: Vec<Token>,
    #[serde(skip)]
    dim: usize,
}

#[derive(Deserialize)]
struct RawUtterance {
    tokens: Vec<Token>,
}

impl TryFrom<RawUtterance> for Utterance {
    type Error = FeaturizerError;

    fn try_from(raw: RawUtterance) -> Result<Self, Self::Error> {
        Utterance::new(raw.tokens)
    }
}

impl Utterance {
    /// Build an utterance, rejecting an empty token list and tokens whose
    /// embedding dimension differs from the first token's.
    pub fn new(tokens: Vec<Token>) -> Result<Self, FeaturizerError> {
        let dim = tokens
            .first()
            .map(Token::dim)
            .ok_or(FeaturizerError::EmptyUtterance)?;
        if let Some((index, token)) = tokens.iter().enumerate().find(|(_, t)| t.dim() != dim) {
            return Err(FeaturizerError::TokenDimension {
                index,
                expected: dim,
                found: token.dim(),
            });
        }
        Ok(Self { tokens, dim })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Embedding dimension shared by every token.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always `false`; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Reference vectors for domain terms of interest.
///
/// May be empty. All entries share one dimension, checked on construction;
/// agreement with the utterance dimension is checked at featurization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct Lexicon {
    vectors: Vec<Vec<f32>>,
}

impl TryFrom<Vec<Vec<f32>>> for Lexicon {
    type Error = FeaturizerError;

    fn try_from(vectors: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Lexicon::new(vectors)
    }
}

impl From<Lexicon> for Vec<Vec<f32>> {
    fn from(lexicon: Lexicon) -> Self {
        lexicon.vectors
    }
}

impl Lexicon {
    pub fn new(vectors: Vec<Vec<f32>>) -> Result<Self, FeaturizerError> {
        if let Some(first) = vectors.first() {
            let dim = first.len();
            for (index, v) in vectors.iter().enumerate() {
                if v.len() != dim {
                    return Err(FeaturizerError::LexiconDimension {
                        index,
                        expected: dim,
                        found: v.len(),
                    });
                }
                if let Some(position) = v.iter().position(|x| !x.is_finite()) {
                    return Err(FeaturizerError::NonFiniteLexicon { index, position });
                }
            }
        }
        Ok(Self { vectors })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Shared dimension of the entries, `None` for an empty lexicon.
    pub fn dim(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Fail with [`FeaturizerError::LexiconDimension`] unless the entries
    /// match `dim`. An empty lexicon matches every dimension.
    pub fn ensure_dim(&self, dim: usize) -> Result<(), FeaturizerError> {
        match self.dim() {
            Some(found) if found != dim => Err(FeaturizerError::LexiconDimension {
                index: 0,
                expected: dim,
                found,
            }),
            _ => Ok(()),
        }
    }
}
