use thiserror::Error;

/// Errors produced at collaborator boundaries.
///
/// The engine never returns these to its callers; it matches on the variant to
/// pick between retrying, falling back to sample content, or recording a
/// zero-valued result with an `error` message.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// The classifier artifact was never loaded.
    #[error("Sentiment model not loaded")]
    ModelUnavailable,

    /// A collaborator is missing or not configured.
    #[error("{0}")]
    SourceUnavailable(String),

    #[error("rate limited by {source_name}")]
    RateLimited {
        source_name: String,
        retry_after_secs: Option<u64>,
    },

    #[error("no usable content: {0}")]
    EmptyResult(String),

    #[error("judging failed: {0}")]
    Judging(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("model artifact error: {0}")]
    Artifact(String),
}

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Only rate limiting is transient here; every other failure class goes
/// straight to the fallback path.
#[must_use]
pub fn is_retriable(err: &SentimentError) -> bool {
    matches!(err, SentimentError::RateLimited { .. })
}
