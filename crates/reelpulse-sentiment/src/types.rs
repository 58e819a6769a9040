use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single piece of text returned by a collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub text: String,
    /// Collector-specific identifier (tweet id, video id, `sample-N`).
    pub source_id: String,
}

/// Three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Positive,
    Neutral,
    Negative,
}

impl Category {
    /// Map a free-text label onto a category.
    ///
    /// Case-insensitive substring match: "positive" wins over "negative" when
    /// both appear; anything else is neutral.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("positive") {
            Category::Positive
        } else if lower.contains("negative") {
            Category::Negative
        } else {
            Category::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Positive => "positive",
            Category::Neutral => "neutral",
            Category::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The numeric half of a judgment. Which variant is present depends on the
/// adapter that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JudgmentSignal {
    /// Classifier path: probability of the positive class, in `[0, 1]`.
    Probability(f64),
    /// LLM path: review score, nominally in `[-1, 1]`.
    Score(f64),
}

/// Outcome of scoring one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgment {
    /// The text that was judged, as received (before normalization).
    pub text: String,
    pub category: Category,
    pub signal: JudgmentSignal,
    pub summary: Option<String>,
}

impl Judgment {
    /// Text retained as a representative example: the summary when one
    /// exists, otherwise the original text.
    #[must_use]
    pub fn example(&self) -> &str {
        self.summary.as_deref().unwrap_or(&self.text)
    }

    /// The LLM score, or `0.0` for classifier judgments.
    #[must_use]
    pub fn score(&self) -> f64 {
        match self.signal {
            JudgmentSignal::Score(s) => s,
            JudgmentSignal::Probability(_) => 0.0,
        }
    }
}

/// Sentiment distribution for one source.
///
/// Invariant: `positive + neutral + negative == content_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSentiment {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// 0–10 scale; `0.0` when `content_count == 0`.
    pub sentiment_score: f64,
    pub positive_examples: Vec<String>,
    pub neutral_examples: Vec<String>,
    pub negative_examples: Vec<String>,
    pub content_count: usize,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<SampleTimeline>,
}

impl SourceSentiment {
    /// Zero-valued result for `source`, optionally carrying an error.
    #[must_use]
    pub fn empty(source: &str, error: Option<String>) -> Self {
        Self {
            source: source.to_string(),
            error,
            ..Self::default()
        }
    }
}

/// Totals across all sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallSentiment {
    /// Score of the primary (first) source. Sources are not fused into a
    /// combined score.
    pub score: f64,
    pub total_positive: usize,
    pub total_neutral: usize,
    pub total_negative: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSentiment {
    /// Keyed by source name (`twitter`, `youtube`).
    pub per_source: BTreeMap<String, SourceSentiment>,
    pub overall: OverallSentiment,
}

/// Illustrative 7-day sentiment split. Not derived from real judgments.
///
/// Invariant: `positive[i] + neutral[i] + negative[i] == 100` for every `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTimeline {
    pub dates: Vec<String>,
    pub positive: Vec<u32>,
    pub neutral: Vec<u32>,
    pub negative: Vec<u32>,
}

/// A video returned by the long-form search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub url: String,
}

/// A video review after LLM analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub video: VideoInfo,
    pub summary: String,
    pub sentiment: Category,
    pub score: f64,
}

/// Output of the long-form review pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewBatch {
    pub reviews: Vec<Review>,
    /// Set when the reviews are the canned fallback set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The content channels the engine knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Twitter,
    YouTube,
}

impl SourceKind {
    /// Key used in [`AggregateSentiment::per_source`].
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            SourceKind::Twitter => "twitter",
            SourceKind::YouTube => "youtube",
        }
    }

    /// Human-readable label stored in [`SourceSentiment::source`].
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Twitter => "Twitter",
            SourceKind::YouTube => "YouTube",
        }
    }
}
