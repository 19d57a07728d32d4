//! The featurization algorithm.
//!
//! 1. Score each lexicon vector by the best non-negative cosine similarity
//!    against any token of the utterance.
//! 2. Keep content tokens: word tokens carrying no tag from an excluded
//!    extractor.
//! 3. With no content tokens, return `D + |lexicon|` zeros.
//! 4. Otherwise average the unit-normalized content embeddings weighted by
//!    `min(tfidf_cap, tfidf)`.
//! 5. Concatenate centroid and lexicon scores.

use tracing::{debug, trace};
use vecmath::{cosine_similarity, rescale_to_magnitude, scalar_divide, vector_add_assign, zeroes};

use crate::config::FeaturizerConfig;
use crate::error::FeaturizerError;
use crate::features::{ContextFeatures, FeatureMeta};
use crate::token::Token;
use crate::utterance::{Lexicon, Utterance};
use crate::{FEATURIZER_ALGORITHM, FEATURIZER_VERSION};

/// Compute the context feature vector of `utterance` against `lexicon`.
///
/// Validates `cfg` first; prefer [`crate::ContextFeaturizer`] when featurizing
/// many utterances with one configuration.
pub fn compute_context_features(
    utterance: &Utterance,
    lexicon: &Lexicon,
    cfg: &FeaturizerConfig,
) -> Result<ContextFeatures, FeaturizerError> {
    cfg.validate()?;
    featurize_validated(utterance, lexicon, cfg)
}

/// Featurization proper; `cfg` must already be validated.
pub(crate) fn featurize_validated(
    utterance: &Utterance,
    lexicon: &Lexicon,
    cfg: &FeaturizerConfig,
) -> Result<ContextFeatures, FeaturizerError> {
    let dim = utterance.dim();
    lexicon.ensure_dim(dim)?;

    let content: Vec<&Token> = utterance
        .tokens()
        .iter()
        .filter(|t| is_content_token(t, cfg))
        .collect();

    let meta = FeatureMeta {
        featurizer_version: FEATURIZER_VERSION,
        algorithm_name: FEATURIZER_ALGORITHM.to_string(),
        embedding_dim: dim,
        lexicon_len: lexicon.len(),
        content_tokens: content.len(),
        config_version: cfg.version,
    };

    if content.is_empty() {
        trace!(
            tokens = utterance.len(),
            dim,
            lexicon_len = lexicon.len(),
            "no content tokens; emitting zero features"
        );
        return Ok(ContextFeatures {
            values: zeroes(dim + lexicon.len()),
            meta,
        });
    }

    let scores = lexicon_scores(utterance, lexicon, cfg)?;
    let mut values = weighted_mean_embedding(&content, dim, cfg)?;
    values.extend(scores);

    debug!(
        tokens = utterance.len(),
        content_tokens = content.len(),
        dim,
        lexicon_len = lexicon.len(),
        "featurized utterance"
    );

    Ok(ContextFeatures { values, meta })
}

/// A token feeds the centroid when it is a word and no entity tag on it
/// comes from an excluded extractor. One excluded tag is enough to drop it.
pub fn is_content_token(token: &Token, cfg: &FeaturizerConfig) -> bool {
    token.is_word()
        && !token
            .entities()
            .iter()
            .any(|entity| cfg.excludes(&entity.extractor))
}

/// Best non-negative similarity of each lexicon vector to any token.
///
/// All tokens take part, content or not. Undefined similarities (zero-norm
/// vectors) and negative ones are dropped before the max; when nothing is
/// left the entry is `cfg.similarity_fallback`.
pub fn lexicon_scores(
    utterance: &Utterance,
    lexicon: &Lexicon,
    cfg: &FeaturizerConfig,
) -> Result<Vec<f32>, FeaturizerError> {
    let mut scores = Vec::with_capacity(lexicon.len());
    for lex in lexicon.vectors() {
        let mut best: Option<f32> = None;
        for token in utterance.tokens() {
            match cosine_similarity(token.vector(), lex)? {
                Some(sim) if sim >= 0.0 => {
                    best = Some(best.map_or(sim, |b| b.max(sim)));
                }
                _ => {}
            }
        }
        scores.push(best.unwrap_or(cfg.similarity_fallback));
    }
    Ok(scores)
}

/// TF-IDF weighted centroid of unit-normalized embeddings.
///
/// Each token contributes its embedding rescaled to magnitude
/// `min(tfidf_cap, tfidf)`; the sum is divided by the total weight, or by 1
/// when every weight is zero. A zero-norm embedding still counts toward the
/// total weight but adds no direction.
fn weighted_mean_embedding(
    content: &[&Token],
    dim: usize,
    cfg: &FeaturizerConfig,
) -> Result<Vec<f32>, FeaturizerError> {
    let mut sum = zeroes(dim);
    let mut total_weight = 0.0f32;
    for token in content {
        let weight = token.tfidf().min(cfg.tfidf_cap);
        total_weight += weight;
        vector_add_assign(&mut sum, &rescale_to_magnitude(token.vector(), weight))?;
    }
    let divisor = if total_weight == 0.0 { 1.0 } else { total_weight };
    Ok(scalar_divide(&sum, divisor)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{EntityAnnotation, Extractor};

    fn word(vector: Vec<f32>, tfidf: f32) -> Token {
        Token::word(vector, tfidf).unwrap()
    }

    fn tagged(vector: Vec<f32>, tfidf: f32, extractors: &[&str]) -> Token {
        let entities = extractors.iter().map(|e| EntityAnnotation::new(*e)).collect();
        Token::new(vector, tfidf, true, entities).unwrap()
    }

    fn utt(tokens: Vec<Token>) -> Utterance {
        Utterance::new(tokens).unwrap()
    }

    fn lex(vectors: Vec<Vec<f32>>) -> Lexicon {
        Lexicon::new(vectors).unwrap()
    }

    fn approx_eq(a: &[f32], b: &[f32]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn single_token_unit_direction() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![word(vec![1.0, 0.0], 0.5)]);
        let out = compute_context_features(&u, &Lexicon::empty(), &cfg).unwrap();
        assert_eq!(out.values, vec![1.0, 0.0]);
        assert_eq!(out.meta.content_tokens, 1);
    }

    #[test]
    fn identical_lexicon_vector_scores_one() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![word(vec![0.2, 0.7, 0.1], 1.0), word(vec![1.0, 0.0, 0.0], 1.0)]);
        let out = compute_context_features(&u, &lex(vec![vec![0.2, 0.7, 0.1]]), &cfg).unwrap();
        assert!((out.lexicon_scores()[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn negative_similarities_fall_back() {
        let cfg = FeaturizerConfig::default();
        // cos([1,0], [-1, sqrt(3)]) = -0.5
        let u = utt(vec![word(vec![1.0, 0.0], 1.0)]);
        let out =
            compute_context_features(&u, &lex(vec![vec![-1.0, 3.0f32.sqrt()]]), &cfg).unwrap();
        assert_eq!(out.lexicon_scores(), &[0.0]);

        let cfg = FeaturizerConfig::new().with_similarity_fallback(0.1);
        let out =
            compute_context_features(&u, &lex(vec![vec![-1.0, 3.0f32.sqrt()]]), &cfg).unwrap();
        assert_eq!(out.lexicon_scores(), &[0.1]);
    }

    #[test]
    fn extreme_magnitude_embeddings_keep_direction() {
        let cfg = FeaturizerConfig::default();
        let l = lex(vec![vec![1.0, 0.0]]);
        for scale in [1.0e20f32, 1.0e-25, f32::MAX] {
            let u = utt(vec![word(vec![scale, 0.0], 1.0)]);
            let out = compute_context_features(&u, &l, &cfg).unwrap();
            assert_eq!(out.values, vec![1.0, 0.0, 1.0], "scale {scale}");
        }
    }

    #[test]
    fn lexicon_takes_max_over_tokens() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![
            word(vec![1.0, 0.0], 1.0),
            word(vec![1.0, 1.0], 1.0),
            word(vec![-1.0, 0.0], 1.0),
        ]);
        let out = compute_context_features(&u, &lex(vec![vec![0.0, 1.0]]), &cfg).unwrap();
        assert!((out.lexicon_scores()[0] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn zero_norm_lexicon_entry_scores_zero() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![word(vec![1.0, 0.0], 1.0)]);
        let out =
            compute_context_features(&u, &lex(vec![vec![0.0, 0.0], vec![1.0, 0.0]]), &cfg).unwrap();
        assert_eq!(out.lexicon_scores()[0], 0.0);
        assert!((out.lexicon_scores()[1] - 1.0).abs() < 1e-6);
        assert!(out.values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn lexicon_considers_non_content_tokens() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![
            word(vec![1.0, 0.0], 1.0),
            tagged(vec![0.0, 1.0], 1.0, &["system"]),
        ]);
        let out = compute_context_features(&u, &lex(vec![vec![0.0, 1.0]]), &cfg).unwrap();
        assert!((out.lexicon_scores()[0] - 1.0).abs() < 1e-6);
        assert_eq!(out.meta.content_tokens, 1);
    }

    #[test]
    fn content_filter_rules() {
        let cfg = FeaturizerConfig::default();
        assert!(is_content_token(&word(vec![1.0], 1.0), &cfg));
        assert!(!is_content_token(&Token::non_word(vec![1.0]).unwrap(), &cfg));
        assert!(!is_content_token(&tagged(vec![1.0], 1.0, &["pattern"]), &cfg));
        assert!(!is_content_token(&tagged(vec![1.0], 1.0, &["system"]), &cfg));
        assert!(is_content_token(&tagged(vec![1.0], 1.0, &["list"]), &cfg));
        // any excluded tag disqualifies, whatever else is present
        assert!(!is_content_token(&tagged(vec![1.0], 1.0, &["list", "system"]), &cfg));
    }

    #[test]
    fn custom_excluded_extractors() {
        let cfg = FeaturizerConfig::new().with_excluded_extractors(vec![Extractor::List]);
        assert!(is_content_token(&tagged(vec![1.0], 1.0, &["system"]), &cfg));
        assert!(!is_content_token(&tagged(vec![1.0], 1.0, &["list"]), &cfg));
    }

    #[test]
    fn no_content_tokens_yields_all_zeros() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![
            Token::non_word(vec![1.0, 2.0, 3.0]).unwrap(),
            tagged(vec![0.0, 1.0, 0.0], 1.0, &["pattern"]),
        ]);
        let l = lex(vec![vec![0.0, 1.0, 0.0], vec![1.0, 2.0, 3.0]]);
        let out = compute_context_features(&u, &l, &cfg).unwrap();
        assert_eq!(out.values, vec![0.0; 5]);
        assert!(out.is_degenerate());
    }

    #[test]
    fn tfidf_cap_equalizes_heavy_tokens() {
        let cfg = FeaturizerConfig::default();
        let l = Lexicon::empty();
        let heavy = utt(vec![word(vec![1.0, 0.0], 5.0), word(vec![0.0, 1.0], 0.5)]);
        let capped = utt(vec![word(vec![1.0, 0.0], 1.0), word(vec![0.0, 1.0], 0.5)]);
        let a = compute_context_features(&heavy, &l, &cfg).unwrap();
        let b = compute_context_features(&capped, &l, &cfg).unwrap();
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn weighted_mean_matches_hand_computation() {
        let cfg = FeaturizerConfig::default();
        // weights 1.0 and 0.5 on orthogonal unit directions
        let u = utt(vec![word(vec![2.0, 0.0], 1.0), word(vec![0.0, 3.0], 0.5)]);
        let out = compute_context_features(&u, &Lexicon::empty(), &cfg).unwrap();
        assert!(approx_eq(&out.values, &[1.0 / 1.5, 0.5 / 1.5]));
    }

    #[test]
    fn same_direction_different_weights_keeps_direction() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![word(vec![3.0, 4.0], 0.2), word(vec![6.0, 8.0], 0.9)]);
        let out = compute_context_features(&u, &Lexicon::empty(), &cfg).unwrap();
        assert!(approx_eq(out.embedding(), &[0.6, 0.8]));
    }

    #[test]
    fn zero_total_weight_divides_by_one() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![word(vec![1.0, 0.0], 0.0), word(vec![0.0, 1.0], 0.0)]);
        let out = compute_context_features(&u, &Lexicon::empty(), &cfg).unwrap();
        assert_eq!(out.values, vec![0.0, 0.0]);
        assert_eq!(out.meta.content_tokens, 2);
    }

    #[test]
    fn zero_norm_content_token_stays_finite() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![word(vec![0.0, 0.0], 1.0), word(vec![0.0, 2.0], 1.0)]);
        let out = compute_context_features(&u, &Lexicon::empty(), &cfg).unwrap();
        assert!(approx_eq(&out.values, &[0.0, 0.5]));
    }

    #[test]
    fn lexicon_dimension_mismatch_is_error() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![word(vec![1.0, 0.0], 1.0)]);
        let err = compute_context_features(&u, &lex(vec![vec![1.0, 0.0, 0.0]]), &cfg).unwrap_err();
        assert_eq!(
            err,
            FeaturizerError::LexiconDimension {
                index: 0,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn lexicon_dimension_checked_even_when_degenerate() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![Token::non_word(vec![1.0, 0.0]).unwrap()]);
        assert!(compute_context_features(&u, &lex(vec![vec![1.0]]), &cfg).is_err());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = FeaturizerConfig::new().with_tfidf_cap(0.0);
        let u = utt(vec![word(vec![1.0, 0.0], 1.0)]);
        assert!(matches!(
            compute_context_features(&u, &Lexicon::empty(), &cfg),
            Err(FeaturizerError::InvalidConfigTfidfCap { .. })
        ));
    }

    #[test]
    fn output_layout_embedding_then_lexicon() {
        let cfg = FeaturizerConfig::default();
        let u = utt(vec![word(vec![0.0, 0.0, 5.0], 1.0)]);
        let l = lex(vec![vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0]]);
        let out = compute_context_features(&u, &l, &cfg).unwrap();
        assert_eq!(out.len(), 5);
        assert!(approx_eq(&out.values, &[0.0, 0.0, 1.0, 1.0, 0.0]));
        assert_eq!(out.meta.embedding_dim, 3);
        assert_eq!(out.meta.lexicon_len, 2);
    }
}
