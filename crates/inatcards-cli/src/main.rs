mod pipeline;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use inatcards_acquire::config::{DEFAULT_API_URL, DEFAULT_MIN_COUNT, DEFAULT_SITE_URL};
use inatcards_acquire::{InatClient, InatEndpoints};
use inatcards_anki::{AnkiClient, DEFAULT_ANKI_URL, DEFAULT_DECK, DEFAULT_MODEL};
use pipeline::{RunOptions, Sink};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inatcards")]
#[command(about = "Turn iNaturalist taxa into photo flashcards")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// iNaturalist site root that serves taxon pages
    #[arg(long, global = true, default_value = DEFAULT_SITE_URL)]
    site_url: String,

    /// iNaturalist API root that serves species counts
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Download taxon photos into a local directory
    Download {
        #[command(flatten)]
        input: Input,

        /// Directory to save photos into
        #[arg(short, long)]
        dest: PathBuf,
    },

    /// Create Anki notes through AnkiConnect
    Anki {
        #[command(flatten)]
        input: Input,

        /// Deck to add notes to
        #[arg(long, default_value = DEFAULT_DECK)]
        anki_deck: String,

        /// Note type to create (if missing) and use
        #[arg(long, default_value = DEFAULT_MODEL)]
        anki_model: String,

        /// Extra tags, comma-separated (every note is also tagged "inaturalist")
        #[arg(long, value_delimiter = ',')]
        anki_tags: Vec<String>,

        /// AnkiConnect endpoint
        #[arg(long, default_value = DEFAULT_ANKI_URL)]
        anki_url: String,
    },
}

#[derive(Args)]
struct Input {
    /// Taxon page URLs (…/taxa/…) or observation search URLs (…/observations?…)
    #[arg(required = true)]
    urls: Vec<String>,

    /// Skip species with fewer observations than this
    #[arg(long, default_value_t = DEFAULT_MIN_COUNT)]
    min_count: u64,

    /// Stop each search after this many taxa
    #[arg(long)]
    limit: Option<usize>,
}

impl Input {
    fn options(&self) -> RunOptions {
        RunOptions {
            min_count: self.min_count,
            limit: self.limit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn,hyper_util=info",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn,hyper_util=info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let inat = InatClient::new(InatEndpoints::new(cli.site_url, cli.api_url))?;

    let (input, sink) = match cli.command {
        Commands::Download { input, dest } => {
            tracing::info!(dest = %dest.display(), urls = input.urls.len(), "Downloading taxon photos");
            (input, Sink::Download { dest })
        }
        Commands::Anki {
            input,
            anki_deck,
            anki_model,
            anki_tags,
            anki_url,
        } => {
            tracing::info!(
                deck = %anki_deck,
                model = %anki_model,
                url = %anki_url,
                urls = input.urls.len(),
                "Publishing taxa to Anki"
            );
            let sink = Sink::Anki {
                client: AnkiClient::new(anki_url)?,
                deck: anki_deck,
                model: anki_model,
                tags: anki_tags.into_iter().filter(|t| !t.is_empty()).collect(),
            };
            (input, sink)
        }
    };

    sink.prepare().await?;

    let summary = pipeline::run(&inat, &sink, &input.urls, input.options()).await;
    tracing::info!(
        taxa = summary.taxa,
        failed = summary.failed_urls.len(),
        "Done"
    );

    if !summary.failed_urls.is_empty() {
        anyhow::bail!(
            "{} of {} URLs failed: {}",
            summary.failed_urls.len(),
            input.urls.len(),
            summary.failed_urls.join(", ")
        );
    }

    Ok(())
}
