//! Sentiment engine orchestration.
//!
//! [`SentimentEngine`] wires the collaborators, adapters and aggregator
//! together. Every public operation returns a well-formed result; collaborator
//! failures degrade to sample content and are reported through the `error`
//! field instead of being returned.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reelpulse_core::AppConfig;

use crate::aggregator::SentimentAggregator;
use crate::classifier::BinaryClassifierAdapter;
use crate::collaborators::{
    Completion, ShortFormSource, TextClassifier, TranscriptSource, VideoSearch,
};
use crate::error::SentimentError;
use crate::llm::{LlmReviewAnalyzer, DEFAULT_MAX_CHARS};
use crate::model::BagOfWordsModel;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::samples::SampleContentGenerator;
use crate::scorer::{LinearRemapScorer, ProbabilityWeightedScorer};
use crate::sources::{
    HttpSettings, OpenAiClient, TimedTextClient, TwitterClient, YouTubeClient,
};
use crate::types::{
    AggregateSentiment, Judgment, JudgmentSignal, Review, ReviewBatch, SourceKind,
    SourceSentiment, VideoInfo,
};

/// Examples kept per category for short-form posts.
pub const SHORT_FORM_EXAMPLE_CAP: usize = 5;
/// Examples kept per category for long-form reviews.
pub const LONG_FORM_EXAMPLE_CAP: usize = 3;

/// Upper bound the short-form search API accepts for one request.
const SHORT_FORM_MAX_RESULTS: usize = 100;

const NO_SUMMARY: &str = "No summary available";
const NO_YOUTUBE_DATA: &str = "No YouTube data available";

/// Tunables for [`SentimentEngine`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Posts requested per short-form search.
    pub twitter_limit: usize,
    pub retry: RetryPolicy,
    pub youtube_max_videos: usize,
    pub transcript_max_chars: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            twitter_limit: 30,
            retry: RetryPolicy::default(),
            youtube_max_videos: 3,
            transcript_max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            twitter_limit: config.twitter_limit,
            retry: RetryPolicy {
                max_attempts: config.twitter_max_attempts,
                backoff_unit: Duration::from_secs(config.retry_backoff_base_secs),
            },
            youtube_max_videos: config.youtube_max_videos,
            transcript_max_chars: config.transcript_max_chars,
        }
    }
}

pub struct SentimentEngine {
    settings: EngineSettings,
    classifier: BinaryClassifierAdapter,
    short_form: Option<Arc<dyn ShortFormSource>>,
    video_search: Option<Arc<dyn VideoSearch>>,
    transcripts: Option<Arc<dyn TranscriptSource>>,
    analyzer: LlmReviewAnalyzer,
    samples: SampleContentGenerator,
}

impl SentimentEngine {
    /// Engine with no collaborators: every source falls back to sample content
    /// and the classifier reports the model as not loaded.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        let analyzer = LlmReviewAnalyzer::new(None).with_max_chars(settings.transcript_max_chars);
        Self {
            settings,
            classifier: BinaryClassifierAdapter::default(),
            short_form: None,
            video_search: None,
            transcripts: None,
            analyzer,
            samples: SampleContentGenerator::new(),
        }
    }

    /// Build an engine from application config.
    ///
    /// The classifier artifact is loaded once here. A missing artifact or
    /// credential is logged and leaves the matching collaborator unset.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let http = HttpSettings {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        };
        let mut engine = Self::new(EngineSettings::from_config(config));

        if let Some(model) = load_model(&config.model_path) {
            engine = engine.with_classifier(model);
        }

        match config.twitter_bearer_token.as_deref() {
            Some(token) => match TwitterClient::new(token, &http) {
                Ok(client) => engine = engine.with_short_form_source(Arc::new(client)),
                Err(e) => tracing::warn!(error = %e, "failed to build twitter client"),
            },
            None => tracing::info!("TWITTER_BEARER_TOKEN not set; twitter uses sample content"),
        }

        match config.youtube_api_key.as_deref() {
            Some(key) => match YouTubeClient::new(key, &http) {
                Ok(client) => engine = engine.with_video_search(Arc::new(client)),
                Err(e) => tracing::warn!(error = %e, "failed to build youtube client"),
            },
            None => tracing::info!("YOUTUBE_API_KEY not set; youtube uses sample reviews"),
        }

        match TimedTextClient::new(&http) {
            Ok(client) => engine = engine.with_transcript_source(Arc::new(client)),
            Err(e) => tracing::warn!(error = %e, "failed to build transcript client"),
        }

        match config.openai_api_key.as_deref() {
            Some(key) => match OpenAiClient::new(key, &config.openai_model, &http) {
                Ok(client) => engine = engine.with_completion(Arc::new(client)),
                Err(e) => tracing::warn!(error = %e, "failed to build openai client"),
            },
            None => tracing::info!("OPENAI_API_KEY not set; reviews get default judgments"),
        }

        engine
    }

    #[must_use]
    pub fn with_classifier(mut self, model: Arc<dyn TextClassifier>) -> Self {
        self.classifier = BinaryClassifierAdapter::new(Some(model));
        self
    }

    #[must_use]
    pub fn with_short_form_source(mut self, source: Arc<dyn ShortFormSource>) -> Self {
        self.short_form = Some(source);
        self
    }

    #[must_use]
    pub fn with_video_search(mut self, search: Arc<dyn VideoSearch>) -> Self {
        self.video_search = Some(search);
        self
    }

    #[must_use]
    pub fn with_transcript_source(mut self, transcripts: Arc<dyn TranscriptSource>) -> Self {
        self.transcripts = Some(transcripts);
        self
    }

    #[must_use]
    pub fn with_completion(mut self, completion: Arc<dyn Completion>) -> Self {
        self.analyzer = LlmReviewAnalyzer::new(Some(completion))
            .with_max_chars(self.settings.transcript_max_chars);
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: SampleContentGenerator) -> Self {
        self.samples = samples;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn has_classifier(&self) -> bool {
        self.classifier.is_loaded()
    }

    /// The sample corpus the short-form fallback would judge for `title`.
    #[must_use]
    pub fn sample_posts(&self, title: &str) -> Vec<String> {
        self.samples.sample_posts(title)
    }

    /// Short-form sentiment for a movie title.
    ///
    /// Live posts come from the short-form source, retried on rate limits.
    /// An unavailable source, exhausted retries, any other error or an empty
    /// result all switch to the sample corpus and record why in `error`.
    pub async fn twitter_sentiment(&self, title: &str) -> SourceSentiment {
        let label = SourceKind::Twitter.label();
        let query = format!("{title} movie");

        let (texts, fallback_error) = match self.fetch_posts(&query).await {
            Ok(texts) if !texts.is_empty() => {
                tracing::info!(title, source = label, count = texts.len(), "collected live posts");
                (texts, None)
            }
            Ok(_) => {
                let err =
                    SentimentError::EmptyResult(format!("no posts found for query '{query}'"));
                tracing::info!(title, source = label, "no live posts, using sample content");
                (self.samples.sample_posts(title), Some(err.to_string()))
            }
            Err(e) => {
                tracing::warn!(
                    title,
                    source = label,
                    error = %e,
                    "post collection failed, using sample content"
                );
                (self.samples.sample_posts(title), Some(e.to_string()))
            }
        };

        let mut result = self.classify_texts(label, &texts, SHORT_FORM_EXAMPLE_CAP);
        result.error = join_errors(result.error.take(), fallback_error);

        tracing::info!(
            title,
            source = label,
            content_count = result.content_count,
            score = result.sentiment_score,
            "short-form sentiment complete"
        );
        result
    }

    /// Search long-form reviews of `title`, fetch transcripts and judge each
    /// with the LLM analyzer.
    ///
    /// Videos without a transcript, or whose transcript fetch fails, are
    /// skipped. When nothing is left the three canned sample reviews are
    /// returned with `error` set.
    pub async fn process_reviews(&self, title: &str) -> ReviewBatch {
        let query = format!("{title} movie review");

        let videos = match self.search_videos(&query).await {
            Ok(videos) if !videos.is_empty() => videos,
            Ok(_) => {
                return self.sample_batch(title, format!("No YouTube videos found for '{title}'"));
            }
            Err(e) => {
                tracing::warn!(title, error = %e, "video search failed");
                return self.sample_batch(title, e.to_string());
            }
        };
        tracing::info!(title, count = videos.len(), "found review videos");

        let Some(transcripts) = self.transcripts.as_ref() else {
            return self.sample_batch(
                title,
                SentimentError::SourceUnavailable("transcript source not configured".to_string())
                    .to_string(),
            );
        };

        let total = videos.len();
        let mut reviews = Vec::with_capacity(total);
        for (index, video) in videos.into_iter().enumerate() {
            tracing::debug!(
                title,
                video_id = %video.video_id,
                position = index + 1,
                total,
                "processing video"
            );

            let transcript = match transcripts.get_transcript(&video.video_id).await {
                Ok(Some(text)) if !text.trim().is_empty() => text,
                Ok(_) => {
                    tracing::warn!(
                        video_id = %video.video_id,
                        "no transcript available, skipping video"
                    );
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        video_id = %video.video_id,
                        error = %e,
                        "transcript fetch failed, skipping video"
                    );
                    continue;
                }
            };

            let judgment = self.analyzer.analyze(&transcript, title).await;
            let score = judgment.score();
            reviews.push(Review {
                video,
                summary: judgment.summary.unwrap_or_else(|| NO_SUMMARY.to_string()),
                sentiment: judgment.category,
                score,
            });
        }

        if reviews.is_empty() {
            return self.sample_batch(
                title,
                format!("No transcripts available for '{title}' videos"),
            );
        }

        tracing::info!(title, analysed = reviews.len(), total, "review processing complete");
        ReviewBatch {
            reviews,
            error: None,
        }
    }

    /// Long-form sentiment: [`process_reviews`](Self::process_reviews) folded
    /// with the linear-remap scorer. Summaries serve as examples and the
    /// reviews themselves are attached.
    pub async fn youtube_sentiment(&self, title: &str) -> SourceSentiment {
        let label = SourceKind::YouTube.label();
        let batch = self.process_reviews(title).await;

        if batch.reviews.is_empty() {
            let mut empty = SourceSentiment::empty(label, Some(NO_YOUTUBE_DATA.to_string()));
            empty.reviews = Some(Vec::new());
            return empty;
        }

        let judgments: Vec<Judgment> = batch
            .reviews
            .iter()
            .map(|review| Judgment {
                text: review.summary.clone(),
                category: review.sentiment,
                signal: JudgmentSignal::Score(review.score),
                summary: Some(review.summary.clone()),
            })
            .collect();

        let mut result = SentimentAggregator::new(LONG_FORM_EXAMPLE_CAP).fold(
            label,
            &judgments,
            &LinearRemapScorer,
        );
        result.error = batch.error;
        result.reviews = Some(batch.reviews);

        tracing::info!(
            title,
            source = label,
            content_count = result.content_count,
            score = result.sentiment_score,
            "long-form sentiment complete"
        );
        result
    }

    /// Short-form sentiment as the primary source, with an illustrative
    /// timeline attached to it.
    pub async fn movie_sentiment(&self, title: &str) -> AggregateSentiment {
        self.combined_sentiment(title, &[SourceKind::Twitter]).await
    }

    /// Run each requested source in order and merge the results. The first
    /// source is primary and supplies the overall score. Repeated kinds run
    /// once.
    pub async fn combined_sentiment(
        &self,
        title: &str,
        sources: &[SourceKind],
    ) -> AggregateSentiment {
        let mut seen = HashSet::new();
        let mut results = Vec::with_capacity(sources.len());

        for &kind in sources {
            if !seen.insert(kind) {
                continue;
            }
            let result = match kind {
                SourceKind::Twitter => {
                    let mut twitter = self.twitter_sentiment(title).await;
                    let today = chrono::Local::now().date_naive();
                    twitter.timeline = Some(self.samples.timeline(today));
                    twitter
                }
                SourceKind::YouTube => self.youtube_sentiment(title).await,
            };
            results.push((kind.key().to_string(), result));
        }

        SentimentAggregator::default().merge(results)
    }

    async fn fetch_posts(&self, query: &str) -> Result<Vec<String>, SentimentError> {
        let source = self.short_form.as_ref().ok_or_else(|| {
            SentimentError::SourceUnavailable("twitter client not configured".to_string())
        })?;
        let max_results = self.settings.twitter_limit.min(SHORT_FORM_MAX_RESULTS);

        let items = retry_with_backoff(self.settings.retry, "twitter", || {
            source.search(query, max_results)
        })
        .await?;

        Ok(items.into_iter().map(|item| item.text).collect())
    }

    async fn search_videos(&self, query: &str) -> Result<Vec<VideoInfo>, SentimentError> {
        let search = self.video_search.as_ref().ok_or_else(|| {
            SentimentError::SourceUnavailable("youtube client not configured".to_string())
        })?;
        search
            .search_videos(query, self.settings.youtube_max_videos)
            .await
    }

    fn classify_texts(&self, label: &str, texts: &[String], example_cap: usize) -> SourceSentiment {
        match self.classifier.classify_batch(texts) {
            Ok(judgments) => SentimentAggregator::new(example_cap).fold(
                label,
                &judgments,
                &ProbabilityWeightedScorer,
            ),
            Err(e) => {
                tracing::warn!(source = label, error = %e, "classification failed");
                SourceSentiment::empty(label, Some(e.to_string()))
            }
        }
    }

    fn sample_batch(&self, title: &str, reason: String) -> ReviewBatch {
        tracing::warn!(title, reason = %reason, "using sample reviews");
        ReviewBatch {
            reviews: self.samples.sample_reviews(title),
            error: Some(reason),
        }
    }
}

fn load_model(path: &Path) -> Option<Arc<dyn TextClassifier>> {
    match BagOfWordsModel::load(path) {
        Ok(model) => {
            tracing::info!(
                path = %path.display(),
                vocabulary = model.vocabulary_size(),
                "sentiment model loaded"
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "sentiment model unavailable");
            None
        }
    }
}

/// Both errors are kept when a classifier failure follows a source fallback.
fn join_errors(first: Option<String>, second: Option<String>) -> Option<String> {
    match (first, second) {
        (Some(a), Some(b)) => Some(format!("{a}; {b}")),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_errors_keeps_both_messages() {
        assert_eq!(
            join_errors(Some("a".to_owned()), Some("b".to_owned())).as_deref(),
            Some("a; b")
        );
        assert_eq!(join_errors(None, Some("b".to_owned())).as_deref(), Some("b"));
        assert_eq!(join_errors(Some("a".to_owned()), None).as_deref(), Some("a"));
        assert_eq!(join_errors(None, None), None);
    }

    #[test]
    fn settings_follow_config_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.twitter_limit, 30);
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.youtube_max_videos, 3);
        assert_eq!(settings.transcript_max_chars, 4000);
    }

    #[test]
    fn bare_engine_has_no_classifier() {
        assert!(!SentimentEngine::new(EngineSettings::default()).has_classifier());
    }

    #[test]
    fn missing_model_file_is_not_fatal() {
        assert!(load_model(Path::new("/definitely/not/here/model.json")).is_none());
    }
}
