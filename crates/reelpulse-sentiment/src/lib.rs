//! Multi-source movie sentiment engine.
//!
//! Short-form posts are judged by a bag-of-words classifier with a neutral
//! band; long-form video reviews are summarised and scored by a generative
//! model. Per-source distributions are merged into one aggregate. Every live
//! source degrades to sample content when it is missing, rate limited or
//! empty, so callers always receive a well-formed result.

pub mod aggregator;
pub mod classifier;
pub mod collaborators;
pub mod error;
pub mod llm;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod retry;
pub mod samples;
pub mod scorer;
pub mod sources;
pub mod types;

pub use aggregator::SentimentAggregator;
pub use classifier::BinaryClassifierAdapter;
pub use collaborators::{
    Completion, ShortFormSource, TextClassifier, TranscriptSource, VideoSearch,
};
pub use error::{is_retriable, SentimentError};
pub use llm::LlmReviewAnalyzer;
pub use model::BagOfWordsModel;
pub use normalize::normalize;
pub use pipeline::{EngineSettings, SentimentEngine};
pub use retry::RetryPolicy;
pub use samples::SampleContentGenerator;
pub use scorer::{LinearRemapScorer, ProbabilityWeightedScorer, Scorer};
pub use sources::{HttpSettings, OpenAiClient, TimedTextClient, TwitterClient, YouTubeClient};
pub use types::{
    AggregateSentiment, Category, Judgment, JudgmentSignal, OverallSentiment, RawItem, Review,
    ReviewBatch, SampleTimeline, SourceKind, SourceSentiment, VideoInfo,
};
