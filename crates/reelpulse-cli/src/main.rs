mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use reelpulse_sentiment::SourceKind;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "reelpulse")]
#[command(about = "Movie sentiment from social posts and video reviews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a movie and print the aggregate sentiment as JSON
    Analyze {
        /// Movie title
        title: String,

        /// Which sources to run; the first one listed is primary
        #[arg(long, value_enum, default_value_t = SourceArg::Twitter)]
        source: SourceArg,

        /// Seed for sample content, for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Analyse video reviews of a movie and print them as JSON
    Reviews {
        /// Movie title
        title: String,

        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the sample posts used when live collection is unavailable
    Samples {
        /// Movie title
        title: String,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Twitter,
    Youtube,
    /// Twitter as primary, then YouTube
    All,
}

impl SourceArg {
    fn kinds(self) -> &'static [SourceKind] {
        match self {
            SourceArg::Twitter => &[SourceKind::Twitter],
            SourceArg::Youtube => &[SourceKind::YouTube],
            SourceArg::All => &[SourceKind::Twitter, SourceKind::YouTube],
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = reelpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Analyze {
            title,
            source,
            seed,
            compact,
        } => commands::run_analyze(&config, &title, source.kinds(), seed, compact).await,
        Commands::Reviews { title, seed } => commands::run_reviews(&config, &title, seed).await,
        Commands::Samples { title, seed } => commands::run_samples(&title, seed),
    }
}
