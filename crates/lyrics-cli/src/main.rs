use anyhow::{Context, Result};
use clap::Parser;
use lyrics_acquire::config::{DEFAULT_OUTPUT_DIR, DEFAULT_ROOT_URL};
use lyrics_acquire::{CrawlConfig, Crawler};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::MakeWriterExt;

const USAGE: &str = r#"Wrong arguments. Usage: lyrics <START_PAGE> <END_PAGE>, e.g. "lyrics 1 5""#;

#[derive(Parser)]
#[command(name = "lyrics")]
#[command(about = "Crawl the lyrics catalog and save each song's lyrics and mood tags")]
#[command(version)]
struct Cli {
    /// First catalog page to fetch
    start_page: u32,

    /// Page to stop at (not fetched)
    end_page: u32,

    /// Catalog root URL
    #[arg(long, default_value = DEFAULT_ROOT_URL)]
    root_url: String,

    /// Output directory for per-song folders
    #[arg(short = 'O', long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Max song pages fetched at once per catalog page (default: all of them)
    #[arg(long)]
    concurrency: Option<NonZeroUsize>,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    init_logging(&cli.log_level, cli.utc);

    let config = CrawlConfig::new(&cli.root_url, cli.output_dir).with_concurrency(cli.concurrency);
    tracing::info!(
        start = cli.start_page,
        end = cli.end_page,
        root = %config.root_url,
        output = %config.output_dir.display(),
        "Crawling lyrics catalog"
    );
    if cli.start_page >= cli.end_page {
        tracing::warn!(start = cli.start_page, end = cli.end_page, "Page range is empty");
    }

    let crawler = Crawler::new(config)?;
    let report = crawler.crawl_range(cli.start_page, cli.end_page).await?;

    let empty = report.empty_pages();
    if !empty.is_empty() {
        tracing::info!(pages = ?empty, "Pages without songs");
    }

    if let Some(path) = cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, &json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote run report");
    }

    Ok(())
}

/// Progress goes to stdout, warnings and errors to stderr.
fn init_logging(level: &LogLevel, utc: bool) {
    // Suppress noisy HTML-parsing crates at debug/trace
    let level = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }
}
