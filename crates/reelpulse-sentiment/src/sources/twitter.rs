//! Short-form posts from the X/Twitter API v2 recent-search endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use super::{build_client, check_status, endpoint, parse_json, HttpSettings};
use crate::collaborators::ShortFormSource;
use crate::error::SentimentError;
use crate::types::RawItem;

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/";
const SEARCH_PATH: &str = "2/tweets/search/recent";

/// The API rejects `max_results` outside this range.
const MIN_RESULTS: usize = 10;
const MAX_RESULTS: usize = 100;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Deserialize)]
struct Tweet {
    id: String,
    text: String,
}

pub struct TwitterClient {
    client: Client,
    bearer_token: String,
    search_url: Url,
}

impl TwitterClient {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(bearer_token: &str, settings: &HttpSettings) -> Result<Self, SentimentError> {
        Self::with_base_url(bearer_token, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built, or
    /// [`SentimentError::SourceUnavailable`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        bearer_token: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            client: build_client(settings)?,
            bearer_token: bearer_token.to_owned(),
            search_url: endpoint(base_url, SEARCH_PATH)?,
        })
    }

    fn build_url(&self, query: &str, max_results: usize) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair(
                "max_results",
                &max_results.clamp(MIN_RESULTS, MAX_RESULTS).to_string(),
            );
        url
    }
}

/// Seconds until the epoch timestamp in `x-rate-limit-reset`, if present.
fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let reset: i64 = headers
        .get("x-rate-limit-reset")?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    u64::try_from(reset - chrono::Utc::now().timestamp()).ok()
}

#[async_trait]
impl ShortFormSource for TwitterClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawItem>, SentimentError> {
        let url = self.build_url(query, max_results);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = retry_after(response.headers());
            tracing::debug!(?retry_after_secs, "twitter search rate limited");
            return Err(SentimentError::RateLimited {
                source_name: "twitter".to_string(),
                retry_after_secs,
            });
        }

        let body = check_status(response)?.text().await?;
        let parsed: SearchResponse = parse_json(&body, "twitter recent search")?;

        // The API floor is 10 results, so a smaller request is trimmed here.
        Ok(parsed
            .data
            .into_iter()
            .take(max_results)
            .map(|t| RawItem {
                text: t.text,
                source_id: t.id,
            })
            .collect())
    }
}
