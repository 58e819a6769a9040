use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank credentials are treated the same as missing ones.
    let secret = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("REELPULSE_ENV", "development"));
    let log_level = or_default("REELPULSE_LOG_LEVEL", "info");
    let model_path = PathBuf::from(or_default(
        "REELPULSE_MODEL_PATH",
        "./models/sentiment_model.json",
    ));

    let twitter_bearer_token = secret("TWITTER_BEARER_TOKEN");
    let youtube_api_key = secret("YOUTUBE_API_KEY");
    let openai_api_key = secret("OPENAI_API_KEY");
    let openai_model = or_default("REELPULSE_OPENAI_MODEL", "gpt-3.5-turbo");

    let request_timeout_secs = parse_u64("REELPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("REELPULSE_USER_AGENT", "reelpulse/0.1 (movie-sentiment)");

    let twitter_limit = parse_usize("REELPULSE_TWITTER_LIMIT", "30")?;
    let twitter_max_attempts = parse_u32("REELPULSE_TWITTER_MAX_ATTEMPTS", "3")?;
    let retry_backoff_base_secs = parse_u64("REELPULSE_RETRY_BACKOFF_BASE_SECS", "1")?;
    let youtube_max_videos = parse_usize("REELPULSE_YOUTUBE_MAX_VIDEOS", "3")?;
    let transcript_max_chars = parse_usize("REELPULSE_TRANSCRIPT_MAX_CHARS", "4000")?;

    Ok(AppConfig {
        env,
        log_level,
        model_path,
        twitter_bearer_token,
        youtube_api_key,
        openai_api_key,
        openai_model,
        request_timeout_secs,
        user_agent,
        twitter_limit,
        twitter_max_attempts,
        retry_backoff_base_secs,
        youtube_max_videos,
        transcript_max_chars,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
