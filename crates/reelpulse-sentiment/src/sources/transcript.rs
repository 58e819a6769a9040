//! Caption text from YouTube's public timed-text endpoint.
//!
//! The endpoint answers with an XML document of `<text>` segments, or an empty
//! body when the video has no captions in the requested language.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, Url};

use super::{build_client, check_status, endpoint, HttpSettings};
use crate::collaborators::TranscriptSource;
use crate::error::SentimentError;

const DEFAULT_BASE_URL: &str = "https://www.youtube.com/";
const TIMEDTEXT_PATH: &str = "api/timedtext";
const DEFAULT_LANG: &str = "en";

pub struct TimedTextClient {
    client: Client,
    timedtext_url: Url,
}

impl TimedTextClient {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: &HttpSettings) -> Result<Self, SentimentError> {
        Self::with_base_url(settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built, or
    /// [`SentimentError::SourceUnavailable`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            client: build_client(settings)?,
            timedtext_url: endpoint(base_url, TIMEDTEXT_PATH)?,
        })
    }

    fn build_url(&self, video_id: &str) -> Url {
        let mut url = self.timedtext_url.clone();
        url.query_pairs_mut()
            .append_pair("lang", DEFAULT_LANG)
            .append_pair("v", video_id);
        url
    }
}

/// Join the text of every `<text>` segment with single spaces.
///
/// # Errors
///
/// Returns [`SentimentError::Xml`] for malformed documents.
pub fn parse_timed_text(xml: &str) -> Result<String, SentimentError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_segment = false;
    let mut current = String::new();
    let mut segments: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                in_segment = true;
                current.clear();
            }
            Ok(Event::Text(e)) if in_segment => {
                current.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::CData(e)) if in_segment => {
                current.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                in_segment = false;
                let segment = current.split_whitespace().collect::<Vec<_>>().join(" ");
                if !segment.is_empty() {
                    segments.push(segment);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SentimentError::Xml(e)),
            _ => {}
        }
    }

    Ok(segments.join(" "))
}

#[async_trait]
impl TranscriptSource for TimedTextClient {
    async fn get_transcript(&self, video_id: &str) -> Result<Option<String>, SentimentError> {
        let response = self.client.get(self.build_url(video_id)).send().await?;
        let body = check_status(response)?.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let transcript = parse_timed_text(&body)?;
        if transcript.is_empty() {
            Ok(None)
        } else {
            Ok(Some(transcript))
        }
    }
}
