use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lyrics_acquire::filter::{dedup_preserving_order, SongFilter};
use lyrics_acquire::HttpFetcher;
use lyrics_model::CollectConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lyrics")]
#[command(about = "Collect song lyrics from album pages into a plain-text corpus")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

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
    /// Fetch every album page and append its songs' lyrics to the corpus file
    Collect {
        /// JSON config file (albums, delay, output, retry); built-in albums if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Corpus file to append lyrics to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seconds to wait before every request
        #[arg(short, long)]
        delay: Option<u64>,

        /// Attempts per page, including the first (1 disables retries)
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Stop at the first album or song that fails
        #[arg(long)]
        fail_fast: bool,

        /// Don't draw the per-album progress bar
        #[arg(long)]
        no_progress: bool,

        /// Write a JSON run report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Show the albums and markers a collect run would use
    Albums {
        /// JSON config file; built-in albums if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Filter and deduplicate a list of links (one per line) offline
    Filter {
        /// Marker the song URLs must carry (e.g., "Izone")
        #[arg(short, long)]
        marker: String,

        /// File with one href per line
        file: PathBuf,
    },

    /// Print the tag-stripped text of a saved lyric block
    Strip {
        /// File containing the markup
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
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

    match cli.command {
        Commands::Collect {
            config,
            output,
            delay,
            max_attempts,
            timeout,
            fail_fast,
            no_progress,
            report,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(output) = output {
                config.output = output;
            }
            if let Some(delay) = delay {
                config.delay_secs = delay;
            }
            if let Some(max_attempts) = max_attempts {
                config.retry.max_attempts = max_attempts;
            }
            if timeout.is_some() {
                config.request_timeout_secs = timeout;
            }
            config.fail_fast |= fail_fast;
            config.show_progress &= !no_progress;

            let errors = config.validate();
            if !errors.is_empty() {
                for e in &errors {
                    tracing::error!("{e}");
                }
                anyhow::bail!("{} config errors, nothing collected", errors.len());
            }

            tracing::info!(
                albums = config.albums.len(),
                delay = config.delay_secs,
                output = %config.output.display(),
                "Collecting lyrics"
            );
            let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout())?;
            let run = lyrics_acquire::collect(&fetcher, &config).await?;

            for album in &run.albums {
                if let Some(error) = &album.error {
                    tracing::warn!(album = %album.url, "{error}");
                }
                for failure in &album.failures {
                    tracing::warn!(song = %failure.url, "{}", failure.reason);
                }
            }
            if let Some(report) = report {
                let json = serde_json::to_string_pretty(&run)?;
                std::fs::write(&report, &json)
                    .with_context(|| format!("Failed to write report {}", report.display()))?;
                tracing::info!(path = %report.display(), "Wrote run report");
            }
        }
        Commands::Albums { config } => {
            let config = load_config(config.as_ref())?;
            for album in &config.albums {
                println!("{}\t{}", album.marker, album.url);
            }
            tracing::info!(
                albums = config.albums.len(),
                delay = config.delay_secs,
                output = %config.output.display(),
                "Effective album list"
            );
        }
        Commands::Filter { marker, file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let hrefs: Vec<String> = contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            let total = hrefs.len();
            let filter = SongFilter::new(&marker)?;
            let songs = dedup_preserving_order(filter.filter(hrefs));
            for song in &songs {
                println!("{song}");
            }
            tracing::info!(links = total, songs = songs.len(), marker = %marker, "Filtered links");
        }
        Commands::Strip { file } => {
            let markup = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            print!("{}", lyrics_acquire::strip::strip_tags(&markup));
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<CollectConfig> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading config");
            CollectConfig::from_json_file(path)
        }
        None => Ok(CollectConfig::default()),
    }
}
