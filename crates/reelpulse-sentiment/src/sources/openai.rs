//! Chat completions against the OpenAI API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::{build_client, check_status, endpoint, parse_json, HttpSettings};
use crate::collaborators::Completion;
use crate::error::SentimentError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/";
const COMPLETIONS_PATH: &str = "v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes movie reviews.";
const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.3;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    completions_url: Url,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        model: &str,
        settings: &HttpSettings,
    ) -> Result<Self, SentimentError> {
        Self::with_base_url(api_key, model, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built, or
    /// [`SentimentError::SourceUnavailable`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            client: build_client(settings)?,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            completions_url: endpoint(base_url, COMPLETIONS_PATH)?,
        })
    }
}

#[async_trait]
impl Completion for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, SentimentError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(SentimentError::RateLimited {
                source_name: "openai".to_string(),
                retry_after_secs: None,
            });
        }

        let body = check_status(response)?.text().await?;
        let parsed: ChatResponse = parse_json(&body, "openai chat completion")?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SentimentError::Judging("completion returned no choices".to_string()))
    }
}
