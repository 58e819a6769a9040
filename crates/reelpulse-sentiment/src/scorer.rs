//! Source-level 0–10 scores.
//!
//! The classifier path and the LLM path report on different domains and use
//! different formulas. They are kept as separate [`Scorer`]s; merging them
//! would change the reported numbers.

use crate::types::{Category, Judgment};

/// Turns a source's judgments into a single score on the 0–10 scale.
pub trait Scorer {
    /// Returns `0.0` for an empty slice.
    fn score(&self, judgments: &[Judgment]) -> f64;
}

/// Classifier path: `(positive + 0.5 * neutral) / total * 10`.
///
/// Neutral items count as half credit toward positivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbabilityWeightedScorer;

impl Scorer for ProbabilityWeightedScorer {
    fn score(&self, judgments: &[Judgment]) -> f64 {
        let (mut positive, mut neutral) = (0usize, 0usize);
        for j in judgments {
            match j.category {
                Category::Positive => positive += 1,
                Category::Neutral => neutral += 1,
                Category::Negative => {}
            }
        }
        weighted_score(positive, neutral, judgments.len())
    }
}

/// LLM path: mean review score remapped from `[-1, 1]` to `[0, 10]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRemapScorer;

impl Scorer for LinearRemapScorer {
    fn score(&self, judgments: &[Judgment]) -> f64 {
        if judgments.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let denom = judgments.len() as f64;
        let average = judgments.iter().map(Judgment::score).sum::<f64>() / denom;
        round_to_tenth((average + 1.0) / 2.0 * 10.0)
    }
}

/// Shared formula behind [`ProbabilityWeightedScorer`], usable from counts alone.
#[must_use]
pub fn weighted_score(positive: usize, neutral: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let (positive, neutral, total) = (positive as f64, neutral as f64, total as f64);
    round_to_tenth((positive + neutral * 0.5) / total * 10.0)
}

/// Round to one decimal place, halves to even (6.25 -> 6.2, 8.75 -> 8.8).
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
