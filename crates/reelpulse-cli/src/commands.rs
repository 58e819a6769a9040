//! Command handlers. Each builds an engine from config and prints JSON to
//! stdout; logs go to stderr.

use std::io::Write;

use reelpulse_core::AppConfig;
use reelpulse_sentiment::{SampleContentGenerator, SentimentEngine, SourceKind};
use serde::Serialize;

fn build_engine(config: &AppConfig, seed: Option<u64>) -> SentimentEngine {
    let engine = SentimentEngine::from_config(config);
    match seed {
        Some(seed) => engine.with_samples(SampleContentGenerator::with_seed(seed)),
        None => engine,
    }
}

fn render<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    Ok(if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    })
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let rendered = render(value, compact)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

pub(crate) async fn run_analyze(
    config: &AppConfig,
    title: &str,
    sources: &[SourceKind],
    seed: Option<u64>,
    compact: bool,
) -> anyhow::Result<()> {
    let engine = build_engine(config, seed);
    tracing::info!(title, sources = sources.len(), "analyzing");
    let aggregate = engine.combined_sentiment(title, sources).await;
    print_json(&aggregate, compact)
}

pub(crate) async fn run_reviews(
    config: &AppConfig,
    title: &str,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let engine = build_engine(config, seed);
    let batch = engine.process_reviews(title).await;
    print_json(&batch, false)
}

/// Prints the sample corpus without touching the network or the model.
pub(crate) fn run_samples(title: &str, seed: Option<u64>) -> anyhow::Result<()> {
    let samples = match seed {
        Some(seed) => SampleContentGenerator::with_seed(seed),
        None => SampleContentGenerator::new(),
    };
    print_json(&samples.sample_posts(title), false)
}
