//! Bag-of-words logistic regression loaded from a JSON artifact.
//!
//! Artifact shape:
//!
//! ```json
//! {
//!   "vocabulary": { "great": 0, "boring": 1 },
//!   "coefficients": [1.7, -2.1],
//!   "intercept": 0.05
//! }
//! ```
//!
//! Texts are tokenized into lowercase runs of two or more word characters and
//! counted against the vocabulary; unknown tokens are ignored.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::collaborators::TextClassifier;
use crate::error::SentimentError;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    vocabulary: HashMap<String, usize>,
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Count-vectorizer plus logistic regression.
#[derive(Debug, Clone)]
pub struct BagOfWordsModel {
    vocabulary: HashMap<String, usize>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl BagOfWordsModel {
    /// Read and validate an artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Artifact`] if the file cannot be read, and
    /// the errors of [`BagOfWordsModel::from_json`] otherwise.
    pub fn load(path: &Path) -> Result<Self, SentimentError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SentimentError::Artifact(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate an artifact.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::Deserialize`] if the JSON does not match the artifact shape.
    /// - [`SentimentError::Artifact`] if a vocabulary index has no coefficient
    ///   or any weight is not finite.
    pub fn from_json(raw: &str) -> Result<Self, SentimentError> {
        let artifact: ModelArtifact =
            serde_json::from_str(raw).map_err(|e| SentimentError::Deserialize {
                context: "sentiment model artifact".to_owned(),
                source: e,
            })?;

        let width = artifact.coefficients.len();
        if let Some((token, idx)) = artifact.vocabulary.iter().find(|(_, idx)| **idx >= width) {
            return Err(SentimentError::Artifact(format!(
                "token '{token}' maps to feature {idx} but only {width} coefficients exist"
            )));
        }
        if !artifact.intercept.is_finite() || artifact.coefficients.iter().any(|c| !c.is_finite())
        {
            return Err(SentimentError::Artifact(
                "non-finite weight in model artifact".to_owned(),
            ));
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            coefficients: artifact.coefficients,
            intercept: artifact.intercept,
        })
    }

    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Sparse term counts for `text`, keyed by feature index.
    fn vectorize(&self, text: &str) -> HashMap<usize, f64> {
        let lower = text.to_lowercase();
        let mut counts = HashMap::new();
        for token in TOKEN_RE.find_iter(&lower) {
            if let Some(&idx) = self.vocabulary.get(token.as_str()) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        counts
    }

    fn positive_probability(&self, text: &str) -> f64 {
        let z = self
            .vectorize(text)
            .into_iter()
            .map(|(idx, count)| self.coefficients[idx] * count)
            .sum::<f64>()
            + self.intercept;
        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl TextClassifier for BagOfWordsModel {
    fn predict(&self, texts: &[String]) -> Result<Vec<u8>, SentimentError> {
        Ok(texts
            .iter()
            .map(|t| u8::from(self.positive_probability(t) >= 0.5))
            .collect())
    }

    fn predict_proba(&self, texts: &[String]) -> Result<Vec<[f64; 2]>, SentimentError> {
        Ok(texts
            .iter()
            .map(|t| {
                let p = self.positive_probability(t);
                [1.0 - p, p]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = r#"{
        "vocabulary": { "great": 0, "boring": 1, "loved": 2 },
        "coefficients": [2.0, -2.5, 1.5],
        "intercept": 0.0
    }"#;

    fn model() -> BagOfWordsModel {
        BagOfWordsModel::from_json(ARTIFACT).expect("valid artifact")
    }

    #[test]
    fn unknown_text_is_exactly_even() {
        let proba = model().predict_proba(&["nothing known here".to_owned()]).unwrap();
        assert!((proba[0][1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn positive_words_push_probability_up() {
        let m = model();
        let texts = vec!["Great great and LOVED".to_owned(), "so boring".to_owned()];
        let proba = m.predict_proba(&texts).unwrap();
        let preds = m.predict(&texts).unwrap();
        assert!(proba[0][1] > 0.9);
        assert!(proba[1][1] < 0.1);
        assert_eq!(preds, vec![1, 0]);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let proba = model().predict_proba(&["great but boring".to_owned()]).unwrap();
        assert!((proba[0][0] + proba[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_letter_tokens_are_ignored() {
        let m = BagOfWordsModel::from_json(
            r#"{"vocabulary": {"a": 0}, "coefficients": [5.0], "intercept": 0.0}"#,
        )
        .unwrap();
        let proba = m.predict_proba(&["a a a".to_owned()]).unwrap();
        assert!((proba[0][1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = BagOfWordsModel::from_json(
            r#"{"vocabulary": {"great": 3}, "coefficients": [1.0], "intercept": 0.0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SentimentError::Artifact(_)));
    }

    #[test]
    fn malformed_json_is_deserialize_error() {
        let err = BagOfWordsModel::from_json("{not json").unwrap_err();
        assert!(matches!(err, SentimentError::Deserialize { .. }));
    }

    #[test]
    fn missing_file_is_artifact_error() {
        let err = BagOfWordsModel::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SentimentError::Artifact(_)));
    }

    #[test]
    fn sigmoid_is_stable_for_large_inputs() {
        assert!((sigmoid(1000.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(-1000.0).abs() < 1e-12);
    }
}
