//! Engine scenarios against in-memory collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reelpulse_sentiment::samples::SAMPLE_POST_COUNT;
use reelpulse_sentiment::{
    Category, Completion, EngineSettings, RawItem, RetryPolicy, SampleContentGenerator,
    SentimentEngine, SentimentError, ShortFormSource, SourceKind, TextClassifier,
    TranscriptSource, VideoInfo, VideoSearch,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Classifies by keyword: "loved" is confidently positive, "hated" confidently
/// negative, anything else lands in the neutral band.
struct KeywordClassifier;

impl KeywordClassifier {
    fn probability(text: &str) -> f64 {
        if text.contains("loved") {
            0.95
        } else if text.contains("hated") {
            0.05
        } else {
            0.5
        }
    }
}

impl TextClassifier for KeywordClassifier {
    fn predict(&self, texts: &[String]) -> Result<Vec<u8>, SentimentError> {
        Ok(texts
            .iter()
            .map(|t| u8::from(Self::probability(t) >= 0.5))
            .collect())
    }

    fn predict_proba(&self, texts: &[String]) -> Result<Vec<[f64; 2]>, SentimentError> {
        Ok(texts
            .iter()
            .map(|t| {
                let p = Self::probability(t);
                [1.0 - p, p]
            })
            .collect())
    }
}

enum PostsBehaviour {
    Items(Vec<&'static str>),
    NotInstalled,
    RateLimitedTimes(u32, Vec<&'static str>),
}

struct FakePosts {
    behaviour: PostsBehaviour,
    calls: AtomicU32,
    queries: Mutex<Vec<(String, usize)>>,
}

impl FakePosts {
    fn new(behaviour: PostsBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: AtomicU32::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }
}

fn items(texts: &[&str]) -> Vec<RawItem> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| RawItem {
            text: (*t).to_owned(),
            source_id: i.to_string(),
        })
        .collect()
}

#[async_trait]
impl ShortFormSource for FakePosts {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawItem>, SentimentError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.queries
            .lock()
            .unwrap()
            .push((query.to_owned(), max_results));
        match &self.behaviour {
            PostsBehaviour::Items(texts) => Ok(items(texts)),
            PostsBehaviour::NotInstalled => Err(SentimentError::SourceUnavailable(
                "twitter client not installed".to_owned(),
            )),
            PostsBehaviour::RateLimitedTimes(n, texts) => {
                if call <= *n {
                    Err(SentimentError::RateLimited {
                        source_name: "twitter".to_owned(),
                        retry_after_secs: None,
                    })
                } else {
                    Ok(items(texts))
                }
            }
        }
    }
}

struct FakeVideos(Vec<VideoInfo>);

#[async_trait]
impl VideoSearch for FakeVideos {
    async fn search_videos(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<VideoInfo>, SentimentError> {
        Ok(self.0.iter().take(max_results).cloned().collect())
    }
}

struct FailingVideos;

#[async_trait]
impl VideoSearch for FailingVideos {
    async fn search_videos(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<VideoInfo>, SentimentError> {
        Err(SentimentError::UnexpectedStatus {
            status: 403,
            url: "https://example.test".to_owned(),
        })
    }
}

/// `None` entries simulate a failing fetch.
struct FakeTranscripts(HashMap<&'static str, Option<Option<&'static str>>>);

#[async_trait]
impl TranscriptSource for FakeTranscripts {
    async fn get_transcript(&self, video_id: &str) -> Result<Option<String>, SentimentError> {
        match self.0.get(video_id) {
            Some(Some(t)) => Ok(t.map(str::to_owned)),
            Some(None) => Err(SentimentError::SourceUnavailable("transcripts disabled".to_owned())),
            None => Ok(None),
        }
    }
}

/// Answers according to keywords in the transcript inside the prompt.
struct KeywordCompletion;

#[async_trait]
impl Completion for KeywordCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, SentimentError> {
        if prompt.contains("masterpiece") {
            Ok("1. A masterpiece.\n2. Positive\n3. 0.9".to_owned())
        } else if prompt.contains("garbage") {
            Ok("1. Not good.\n2. Negative\n3. -0.5".to_owned())
        } else {
            Err(SentimentError::Judging("model overloaded".to_owned()))
        }
    }
}

fn video(id: &str) -> VideoInfo {
    VideoInfo {
        video_id: id.to_owned(),
        title: format!("Review {id}"),
        channel: "Channel".to_owned(),
        url: format!("https://www.youtube.com/watch?v={id}"),
    }
}

fn settings() -> EngineSettings {
    EngineSettings {
        retry: RetryPolicy {
            max_attempts: 3,
            backoff_unit: Duration::ZERO,
        },
        ..EngineSettings::default()
    }
}

fn engine() -> SentimentEngine {
    SentimentEngine::new(settings())
        .with_classifier(Arc::new(KeywordClassifier))
        .with_samples(SampleContentGenerator::with_seed(17))
}

// ---------------------------------------------------------------------------
// Short-form path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn live_posts_are_classified() {
    let posts = FakePosts::new(PostsBehaviour::Items(vec![
        "I loved it",
        "it was fine",
        "I hated it",
        "loved the score",
    ]));
    let engine = engine().with_short_form_source(posts.clone());

    let result = engine.twitter_sentiment("Dune").await;

    assert_eq!(result.source, "Twitter");
    assert_eq!((result.positive, result.neutral, result.negative), (2, 1, 1));
    assert_eq!(result.content_count, 4);
    // (2 + 0.5) / 4 * 10 = 6.25, half rounds to even
    assert!((result.sentiment_score - 6.2).abs() < 1e-9);
    assert_eq!(result.positive_examples, vec!["I loved it", "loved the score"]);
    assert!(result.error.is_none());

    let queries = posts.queries.lock().unwrap();
    assert_eq!(queries.as_slice(), &[("Dune movie".to_owned(), 30)]);
}

#[tokio::test]
async fn not_installed_source_falls_back_to_samples() {
    let engine = engine().with_short_form_source(FakePosts::new(PostsBehaviour::NotInstalled));

    let result = engine.twitter_sentiment("Inception").await;

    assert_eq!(result.source, "Twitter");
    assert_eq!(result.content_count, SAMPLE_POST_COUNT);
    assert_eq!(
        result.positive + result.neutral + result.negative,
        result.content_count
    );
    assert_eq!(result.error.as_deref(), Some("twitter client not installed"));
}

#[tokio::test]
async fn missing_source_falls_back_to_samples() {
    let result = engine().twitter_sentiment("Inception").await;
    assert_eq!(result.content_count, SAMPLE_POST_COUNT);
    assert_eq!(result.error.as_deref(), Some("twitter client not configured"));
}

#[tokio::test]
async fn empty_result_falls_back_to_samples() {
    let engine = engine().with_short_form_source(FakePosts::new(PostsBehaviour::Items(vec![])));
    let result = engine.twitter_sentiment("Inception").await;
    assert_eq!(result.content_count, SAMPLE_POST_COUNT);
    assert!(result.error.unwrap().starts_with("no usable content"));
}

#[tokio::test]
async fn rate_limit_is_retried_before_succeeding() {
    let posts = FakePosts::new(PostsBehaviour::RateLimitedTimes(2, vec!["loved it"]));
    let engine = engine().with_short_form_source(posts.clone());

    let result = engine.twitter_sentiment("Dune").await;

    assert_eq!(posts.calls.load(Ordering::SeqCst), 3);
    assert_eq!(result.content_count, 1);
    assert_eq!(result.positive, 1);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn exhausted_rate_limit_falls_back_to_samples() {
    let posts = FakePosts::new(PostsBehaviour::RateLimitedTimes(10, vec!["loved it"]));
    let engine = engine().with_short_form_source(posts.clone());

    let result = engine.twitter_sentiment("Dune").await;

    assert_eq!(posts.calls.load(Ordering::SeqCst), 3);
    assert_eq!(result.content_count, SAMPLE_POST_COUNT);
    assert_eq!(result.error.as_deref(), Some("rate limited by twitter"));
}

#[tokio::test]
async fn missing_model_yields_zero_result_with_error() {
    let engine = SentimentEngine::new(settings())
        .with_short_form_source(FakePosts::new(PostsBehaviour::Items(vec!["loved it"])));

    let result = engine.twitter_sentiment("Dune").await;

    assert_eq!(result.content_count, 0);
    assert!(result.sentiment_score.abs() < f64::EPSILON);
    assert_eq!(result.error.as_deref(), Some("Sentiment model not loaded"));
}

#[tokio::test]
async fn fallback_and_missing_model_report_both_errors() {
    let result = SentimentEngine::new(settings()).twitter_sentiment("Dune").await;
    assert_eq!(
        result.error.as_deref(),
        Some("Sentiment model not loaded; twitter client not configured")
    );
}

// ---------------------------------------------------------------------------
// Long-form path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_videos_yield_canned_reviews() {
    let engine = engine().with_video_search(Arc::new(FakeVideos(vec![])));

    let batch = engine.process_reviews("Dune").await;

    assert_eq!(batch.reviews.len(), 3);
    let sentiments: Vec<Category> = batch.reviews.iter().map(|r| r.sentiment).collect();
    assert_eq!(
        sentiments,
        vec![Category::Positive, Category::Neutral, Category::Negative]
    );
    let scores: Vec<f64> = batch.reviews.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![0.8, 0.1, -0.7]);
    assert!(batch.error.is_some());
}

#[tokio::test]
async fn failing_search_yields_canned_reviews() {
    let engine = engine().with_video_search(Arc::new(FailingVideos));
    let batch = engine.process_reviews("Dune").await;
    assert_eq!(batch.reviews.len(), 3);
    assert!(batch.error.unwrap().contains("403"));
}

#[tokio::test]
async fn videos_without_transcripts_are_skipped() {
    let transcripts = FakeTranscripts(HashMap::from([
        ("good", Some(Some("an absolute masterpiece of a film"))),
        ("silent", Some(None)),
        ("broken", None),
        ("bad", Some(Some("pure garbage from start to end"))),
    ]));
    let engine = engine()
        .with_video_search(Arc::new(FakeVideos(vec![
            video("good"),
            video("silent"),
            video("broken"),
            video("bad"),
        ])))
        .with_transcript_source(Arc::new(transcripts))
        .with_completion(Arc::new(KeywordCompletion));

    // Only the first three videos are requested by default.
    let batch = engine.process_reviews("Dune").await;

    assert!(batch.error.is_none());
    assert_eq!(batch.reviews.len(), 1);
    assert_eq!(batch.reviews[0].video.video_id, "good");
    assert_eq!(batch.reviews[0].summary, "A masterpiece.");
    assert_eq!(batch.reviews[0].sentiment, Category::Positive);
}

#[tokio::test]
async fn failed_analysis_keeps_review_with_default_judgment() {
    let transcripts = FakeTranscripts(HashMap::from([("meh", Some(Some("it exists")))]));
    let engine = engine()
        .with_video_search(Arc::new(FakeVideos(vec![video("meh")])))
        .with_transcript_source(Arc::new(transcripts))
        .with_completion(Arc::new(KeywordCompletion));

    let batch = engine.process_reviews("Dune").await;

    assert_eq!(batch.reviews.len(), 1);
    assert_eq!(batch.reviews[0].sentiment, Category::Neutral);
    assert!(batch.reviews[0].score.abs() < f64::EPSILON);
    assert_eq!(batch.reviews[0].summary, "Error analyzing review content");
}

#[tokio::test]
async fn youtube_sentiment_remaps_review_scores() {
    let transcripts = FakeTranscripts(HashMap::from([
        ("a", Some(Some("masterpiece"))),
        ("b", Some(Some("garbage"))),
    ]));
    let engine = engine()
        .with_video_search(Arc::new(FakeVideos(vec![video("a"), video("b")])))
        .with_transcript_source(Arc::new(transcripts))
        .with_completion(Arc::new(KeywordCompletion));

    let result = engine.youtube_sentiment("Dune").await;

    assert_eq!(result.source, "YouTube");
    assert_eq!(result.content_count, 2);
    assert_eq!((result.positive, result.neutral, result.negative), (1, 0, 1));
    // mean(0.9, -0.5) = 0.2 -> (1.2 / 2) * 10 = 6.0
    assert!((result.sentiment_score - 6.0).abs() < 1e-9);
    assert_eq!(result.positive_examples, vec!["A masterpiece."]);
    assert_eq!(result.reviews.as_ref().map(Vec::len), Some(2));
}

#[tokio::test]
async fn youtube_sentiment_on_sample_reviews() {
    let result = engine().youtube_sentiment("Dune").await;

    assert_eq!(result.content_count, 3);
    // mean(0.8, 0.1, -0.7) = 0.0667 -> 5.3
    assert!((result.sentiment_score - 5.3).abs() < 1e-9);
    assert!(result.error.is_some());
    assert_eq!(result.reviews.as_ref().map(Vec::len), Some(3));
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn movie_sentiment_attaches_timeline_to_twitter() {
    let engine = engine().with_short_form_source(FakePosts::new(PostsBehaviour::Items(vec![
        "loved it", "hated it",
    ])));

    let aggregate = engine.movie_sentiment("Dune").await;

    let twitter = &aggregate.per_source["twitter"];
    let timeline = twitter.timeline.as_ref().expect("timeline attached");
    assert_eq!(timeline.dates.len(), 7);
    for i in 0..7 {
        assert_eq!(timeline.positive[i] + timeline.neutral[i] + timeline.negative[i], 100);
    }
    assert!((aggregate.overall.score - twitter.sentiment_score).abs() < 1e-9);
    assert_eq!(aggregate.overall.total_positive, 1);
    assert_eq!(aggregate.overall.total_negative, 1);
}

#[tokio::test]
async fn combined_sentiment_uses_first_source_as_primary() {
    let engine = engine().with_short_form_source(FakePosts::new(PostsBehaviour::Items(vec![
        "loved it",
    ])));

    let aggregate = engine
        .combined_sentiment("Dune", &[SourceKind::YouTube, SourceKind::Twitter])
        .await;

    let youtube = &aggregate.per_source["youtube"];
    let twitter = &aggregate.per_source["twitter"];
    assert!((aggregate.overall.score - youtube.sentiment_score).abs() < 1e-9);
    assert_eq!(
        aggregate.overall.total_positive,
        youtube.positive + twitter.positive
    );
    assert!(youtube.timeline.is_none());
}

#[tokio::test]
async fn aggregate_serializes_with_contract_keys() {
    let aggregate = engine().movie_sentiment("Dune").await;
    let json = serde_json::to_value(&aggregate).unwrap();

    let twitter = &json["per_source"]["twitter"];
    for key in [
        "positive",
        "neutral",
        "negative",
        "sentiment_score",
        "positive_examples",
        "neutral_examples",
        "negative_examples",
        "content_count",
        "source",
        "error",
        "timeline",
    ] {
        assert!(twitter.get(key).is_some(), "missing key {key}");
    }
    for key in ["score", "total_positive", "total_neutral", "total_negative"] {
        assert!(json["overall"].get(key).is_some(), "missing key {key}");
    }
}
