//! Three-way judgments from a binary probability model.

use std::sync::Arc;

use crate::collaborators::TextClassifier;
use crate::error::SentimentError;
use crate::normalize::normalize;
use crate::types::{Category, Judgment, JudgmentSignal};

/// Lower bound of the neutral band (inclusive).
pub const NEUTRAL_BAND_LOW: f64 = 0.4;
/// Upper bound of the neutral band (inclusive).
pub const NEUTRAL_BAND_HIGH: f64 = 0.6;

/// Category for one item.
///
/// The band is checked first: an item the model calls positive with
/// probability 0.45 is still neutral.
#[must_use]
pub fn categorize(positive_probability: f64, prediction: u8) -> Category {
    if (NEUTRAL_BAND_LOW..=NEUTRAL_BAND_HIGH).contains(&positive_probability) {
        Category::Neutral
    } else if prediction == 1 {
        Category::Positive
    } else {
        Category::Negative
    }
}

/// Wraps an optional [`TextClassifier`]. `None` means the model artifact
/// failed to load at startup.
#[derive(Clone, Default)]
pub struct BinaryClassifierAdapter {
    model: Option<Arc<dyn TextClassifier>>,
}

impl BinaryClassifierAdapter {
    #[must_use]
    pub fn new(model: Option<Arc<dyn TextClassifier>>) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Judge each text. Texts are normalized before they reach the model;
    /// judgments keep the original text for example retention.
    ///
    /// An empty input yields an empty output even without a model. Items the
    /// model returns no prediction for are dropped.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::ModelUnavailable`] if no model is loaded.
    /// - Whatever the model returns if the batch fails.
    pub fn classify_batch(&self, texts: &[String]) -> Result<Vec<Judgment>, SentimentError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let model = self.model.as_ref().ok_or(SentimentError::ModelUnavailable)?;

        let cleaned: Vec<String> = texts.iter().map(|t| normalize(t)).collect();
        let predictions = model.predict(&cleaned)?;
        let probabilities = model.predict_proba(&cleaned)?;

        if predictions.len() != texts.len() || probabilities.len() != texts.len() {
            tracing::warn!(
                texts = texts.len(),
                predictions = predictions.len(),
                probabilities = probabilities.len(),
                "classifier returned fewer results than inputs; unmatched items dropped"
            );
        }

        let judgments = texts
            .iter()
            .zip(predictions)
            .zip(probabilities)
            .map(|((text, prediction), proba)| {
                let positive_probability = proba[1];
                Judgment {
                    text: text.clone(),
                    category: categorize(positive_probability, prediction),
                    signal: JudgmentSignal::Probability(positive_probability),
                    summary: None,
                }
            })
            .collect();

        Ok(judgments)
    }
}
