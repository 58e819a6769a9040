//! Long-form review analysis through a generative model.
//!
//! The model is asked for a numbered three-part answer (summary, sentiment
//! label, score in `[-1, 1]`). Parsing tolerates any part being missing.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::collaborators::Completion;
use crate::error::SentimentError;
use crate::types::{Category, Judgment, JudgmentSignal};

/// Default cap on characters sent to the model.
pub const DEFAULT_MAX_CHARS: usize = 4000;

const EMPTY_TEXT_PLACEHOLDER: &str = "No transcript available";
const NO_SUMMARY: &str = "No summary available";
const ANALYSIS_FAILED: &str = "Error analyzing review content";

static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)1\.\s*(.*?)(?:2\.|\n\n|$)").expect("valid summary regex"));
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)2\.\s*(.*?)(?:3\.|\n\n|$)").expect("valid label regex"));
static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)3\.\s*(.*?)(?:\n\n|$)").expect("valid score regex"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number regex"));

/// The three parts of a model answer after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAnalysis {
    pub summary: String,
    pub category: Category,
    /// First number in section 3, clamped to `[-1, 1]`. A reply such as
    /// "8 out of 10" therefore reads as `1.0` rather than the raw `8.0`, which
    /// keeps the remapped source score within 0 to 10.
    pub score: f64,
}

/// Parse a numbered three-part answer.
///
/// Missing sections fall back to `"No summary available"`, neutral and `0.0`.
#[must_use]
pub fn parse_analysis(answer: &str) -> ParsedAnalysis {
    let section = |re: &Regex| {
        re.captures(answer)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    let summary = section(&SUMMARY_RE).unwrap_or_else(|| NO_SUMMARY.to_string());
    let category = section(&LABEL_RE).map_or(Category::Neutral, |l| Category::from_label(&l));
    let score = section(&SCORE_RE)
        .and_then(|s| {
            NUMBER_RE
                .find(&s)
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
        .map_or(0.0, |s| s.clamp(-1.0, 1.0));

    ParsedAnalysis {
        summary,
        category,
        score,
    }
}

/// Judges long-form content with an optional [`Completion`] collaborator.
///
/// Without a collaborator every call returns the default judgment.
#[derive(Clone)]
pub struct LlmReviewAnalyzer {
    completion: Option<Arc<dyn Completion>>,
    max_chars: usize,
}

impl LlmReviewAnalyzer {
    #[must_use]
    pub fn new(completion: Option<Arc<dyn Completion>>) -> Self {
        Self {
            completion,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Truncated text as it is sent to the model.
    #[must_use]
    pub fn prepare_text(&self, text: &str) -> String {
        if text.is_empty() {
            return EMPTY_TEXT_PLACEHOLDER.to_string();
        }
        text.chars().take(self.max_chars).collect()
    }

    #[must_use]
    pub fn build_prompt(&self, text: &str, context: &str) -> String {
        let body = self.prepare_text(text);
        format!(
            "The following is a transcript from a YouTube review of the movie \"{context}\".\n\
             Please analyze this review and provide:\n\
             1. A brief summary (2-3 sentences)\n\
             2. The overall sentiment (positive, negative, or neutral)\n\
             3. A sentiment score from -1.0 (very negative) to 1.0 (very positive)\n\
             \n\
             Transcript:\n\
             {body}\n"
        )
    }

    /// Judge `text`, using `context` (typically the movie title) in the prompt.
    ///
    /// Never fails: collaborator errors produce a neutral judgment with score
    /// `0.0` and a summary noting the failure.
    pub async fn analyze(&self, text: &str, context: &str) -> Judgment {
        match self.try_analyze(text, context).await {
            Ok(judgment) => judgment,
            Err(e) => {
                tracing::warn!(
                    context,
                    error = %e,
                    "review analysis failed, using default judgment"
                );
                Judgment {
                    text: self.prepare_text(text),
                    category: Category::Neutral,
                    signal: JudgmentSignal::Score(0.0),
                    summary: Some(ANALYSIS_FAILED.to_string()),
                }
            }
        }
    }

    async fn try_analyze(&self, text: &str, context: &str) -> Result<Judgment, SentimentError> {
        let completion = self.completion.as_ref().ok_or_else(|| {
            SentimentError::SourceUnavailable("no completion client configured".to_string())
        })?;

        let prompt = self.build_prompt(text, context);
        let answer = completion.complete(&prompt).await?;
        let parsed = parse_analysis(&answer);

        tracing::debug!(
            context,
            sentiment = %parsed.category,
            score = parsed.score,
            "review analysed"
        );

        Ok(Judgment {
            text: self.prepare_text(text),
            category: parsed.category,
            signal: JudgmentSignal::Score(parsed.score),
            summary: Some(parsed.summary),
        })
    }
}

#[cfg(test)]
#[path = "llm_test.rs"]
mod tests;
