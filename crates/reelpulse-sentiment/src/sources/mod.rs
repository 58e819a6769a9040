//! HTTP implementations of the collaborator traits.
//!
//! Each client offers `new` for the production endpoint and `with_base_url`
//! for pointing at a mock server.

mod openai;
mod transcript;
mod twitter;
mod youtube;

pub use openai::OpenAiClient;
pub use transcript::TimedTextClient;
pub use twitter::TwitterClient;
pub use youtube::YouTubeClient;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::SentimentError;

/// Connection settings shared by every HTTP collaborator.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "reelpulse/0.1 (movie-sentiment)".to_string(),
        }
    }
}

fn build_client(settings: &HttpSettings) -> Result<Client, SentimentError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(settings.user_agent.as_str())
        .build()?)
}

/// Resolve `path` against `base_url`, normalising the base to end in one slash
/// so the join appends rather than replaces the last segment.
fn endpoint(base_url: &str, path: &str) -> Result<Url, SentimentError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised)
        .and_then(|base| base.join(path))
        .map_err(|e| {
            SentimentError::SourceUnavailable(format!("invalid base URL '{base_url}': {e}"))
        })
}

/// Map a non-2xx response onto [`SentimentError::UnexpectedStatus`].
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SentimentError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SentimentError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(
    body: &str,
    context: &str,
) -> Result<T, SentimentError> {
    serde_json::from_str(body).map_err(|e| SentimentError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
