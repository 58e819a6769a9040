use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration. Every credential is optional: a missing key means
/// the matching collaborator is not constructed and its source falls back to
/// sample content.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub model_path: PathBuf,
    pub twitter_bearer_token: Option<String>,
    pub youtube_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub twitter_limit: usize,
    pub twitter_max_attempts: u32,
    pub retry_backoff_base_secs: u64,
    pub youtube_max_videos: usize,
    pub transcript_max_chars: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("model_path", &self.model_path)
            .field(
                "twitter_bearer_token",
                &self.twitter_bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_model", &self.openai_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("twitter_limit", &self.twitter_limit)
            .field("twitter_max_attempts", &self.twitter_max_attempts)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("youtube_max_videos", &self.youtube_max_videos)
            .field("transcript_max_chars", &self.transcript_max_chars)
            .finish()
    }
}
