//! Video search via the YouTube Data API v3.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{build_client, check_status, endpoint, parse_json, HttpSettings};
use crate::collaborators::VideoSearch;
use crate::error::SentimentError;
use crate::types::VideoInfo;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/";
const SEARCH_PATH: &str = "youtube/v3/search";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
}

/// Canonical watch URL for a video id.
#[must_use]
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    search_url: Url,
}

impl YouTubeClient {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, settings: &HttpSettings) -> Result<Self, SentimentError> {
        Self::with_base_url(api_key, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built, or
    /// [`SentimentError::SourceUnavailable`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            client: build_client(settings)?,
            api_key: api_key.to_owned(),
            search_url: endpoint(base_url, SEARCH_PATH)?,
        })
    }

    fn build_url(&self, query: &str, max_results: usize) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .append_pair("q", query)
            .append_pair("type", "video")
            .append_pair("maxResults", &max_results.to_string())
            .append_pair("relevanceLanguage", "en")
            .append_pair("key", &self.api_key);
        url
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search_videos(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<VideoInfo>, SentimentError> {
        let response = self
            .client
            .get(self.build_url(query, max_results))
            .send()
            .await?;
        let body = check_status(response)?.text().await?;
        let parsed: SearchResponse = parse_json(&body, "youtube search")?;

        // Channel and playlist hits carry no videoId.
        Ok(parsed
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(VideoInfo {
                    url: watch_url(&video_id),
                    video_id,
                    title: item.snippet.title,
                    channel: item.snippet.channel_title,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_carries_search_parameters() {
        let client =
            YouTubeClient::with_base_url("yt-key", &HttpSettings::default(), "http://localhost:1")
                .unwrap();
        let url = client.build_url("Dune movie review", 3);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("part".to_owned(), "snippet".to_owned())));
        assert!(pairs.contains(&("q".to_owned(), "Dune movie review".to_owned())));
        assert!(pairs.contains(&("type".to_owned(), "video".to_owned())));
        assert!(pairs.contains(&("maxResults".to_owned(), "3".to_owned())));
        assert!(pairs.contains(&("relevanceLanguage".to_owned(), "en".to_owned())));
        assert!(pairs.contains(&("key".to_owned(), "yt-key".to_owned())));
    }

    #[test]
    fn watch_url_uses_video_id() {
        assert_eq!(watch_url("abc123"), "https://www.youtube.com/watch?v=abc123");
    }
}
