//! Folding judgments into per-source distributions and merging sources.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::scorer::Scorer;
use crate::types::{AggregateSentiment, Category, Judgment, OverallSentiment, SourceSentiment};

/// Default number of examples kept per category for short-form sources.
pub const DEFAULT_EXAMPLE_CAP: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct SentimentAggregator {
    example_cap: usize,
}

impl Default for SentimentAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_EXAMPLE_CAP)
    }
}

impl SentimentAggregator {
    #[must_use]
    pub fn new(example_cap: usize) -> Self {
        Self { example_cap }
    }

    /// Count categories, keep the first `example_cap` examples of each in
    /// input order, and score the batch with `scorer`.
    #[must_use]
    pub fn fold(
        &self,
        source_label: &str,
        judgments: &[Judgment],
        scorer: &dyn Scorer,
    ) -> SourceSentiment {
        let mut out = SourceSentiment::empty(source_label, None);

        for judgment in judgments {
            let (count, examples) = match judgment.category {
                Category::Positive => (&mut out.positive, &mut out.positive_examples),
                Category::Neutral => (&mut out.neutral, &mut out.neutral_examples),
                Category::Negative => (&mut out.negative, &mut out.negative_examples),
            };
            *count += 1;
            if examples.len() < self.example_cap {
                examples.push(judgment.example().to_string());
            }
        }

        out.content_count = judgments.len();
        out.sentiment_score = scorer.score(judgments);
        out
    }

    /// Combine per-source results.
    ///
    /// The first entry is the primary source: its score becomes the overall
    /// score. Category totals are summed across every source. An empty input
    /// yields an all-zero aggregate.
    #[must_use]
    pub fn merge(&self, sources: Vec<(String, SourceSentiment)>) -> AggregateSentiment {
        let mut overall = OverallSentiment {
            score: sources
                .first()
                .map_or(0.0, |(_, primary)| primary.sentiment_score),
            ..OverallSentiment::default()
        };

        let mut per_source = BTreeMap::new();
        for (key, sentiment) in sources {
            // A repeated key keeps its first result.
            if let Entry::Vacant(slot) = per_source.entry(key) {
                overall.total_positive += sentiment.positive;
                overall.total_neutral += sentiment.neutral;
                overall.total_negative += sentiment.negative;
                slot.insert(sentiment);
            }
        }

        AggregateSentiment {
            per_source,
            overall,
        }
    }
}
