//! Interfaces to the external systems the engine depends on.
//!
//! Each trait returns a [`SentimentError`] variant rather than panicking, so
//! the engine can decide between retrying, falling back, or degrading.

use async_trait::async_trait;

use crate::error::SentimentError;
use crate::types::{RawItem, VideoInfo};

/// A binary sentiment classifier over raw (already normalized) texts.
///
/// Vectorization is an implementation detail of the classifier.
pub trait TextClassifier: Send + Sync {
    /// Binary prediction per text: `1` = positive class, `0` = negative class.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Judging`] if the batch cannot be scored.
    fn predict(&self, texts: &[String]) -> Result<Vec<u8>, SentimentError>;

    /// Class probabilities per text, ordered `[negative, positive]`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Judging`] if the batch cannot be scored.
    fn predict_proba(&self, texts: &[String]) -> Result<Vec<[f64; 2]>, SentimentError>;
}

/// Short-form social post search.
#[async_trait]
pub trait ShortFormSource: Send + Sync {
    /// # Errors
    ///
    /// [`SentimentError::RateLimited`] when the provider throttles the caller;
    /// [`SentimentError::SourceUnavailable`] when the client cannot be used at all.
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<RawItem>, SentimentError>;
}

/// Long-form video search.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// # Errors
    ///
    /// Returns an error on transport or response-shape failures.
    async fn search_videos(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<VideoInfo>, SentimentError>;
}

/// Transcript lookup for a single video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// `Ok(None)` means the video has no transcript.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or parse failures.
    async fn get_transcript(&self, video_id: &str) -> Result<Option<String>, SentimentError>;
}

/// Synchronous request/response text completion.
#[async_trait]
pub trait Completion: Send + Sync {
    /// # Errors
    ///
    /// Returns an error on transport failures or an empty completion.
    async fn complete(&self, prompt: &str) -> Result<String, SentimentError>;
}
