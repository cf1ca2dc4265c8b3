//! `goodscrape`: command line front end for the crawl and harvest pipelines.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use log::{error, info, warn, LevelFilter};
use url::Url;

use scrape_core::{SortOrder, DEFAULT_BASE_URL};
use scrape_engine::{
    BookRecordBuilder, BookTable, FetchSettings, Fetcher as _, HarvestSettings,
    ListIdentifierCrawler, Pacing, ReqwestFetcher, ReviewHarvestEngine, ReviewTable,
    WebDriverSession,
};
use scrape_logging::LogDestination;

#[derive(Parser)]
#[command(name = "goodscrape", version, about = "Collects book and review tables from a catalog site")]
struct Cli {
    /// Log file path; terminal logging is always on.
    #[arg(long, global = true, default_value = "data/goodscrape.log")]
    log_file: PathBuf,

    /// Log at debug level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl curated lists from a seed URL and write the book table.
    Books {
        /// Seed listing URL, typically a tag page linking curated lists.
        #[arg(long)]
        seed: String,

        /// Output directory for books.csv.
        #[arg(long, default_value = "data")]
        out: PathBuf,

        /// Seconds to wait between requests.
        #[arg(long, default_value_t = 2)]
        delay: u64,
    },
    /// Harvest review listings for every book id in an existing book table.
    Reviews {
        /// Path to a previously written books.csv.
        #[arg(long)]
        books: PathBuf,

        /// Output directory for reviews.csv.
        #[arg(long, default_value = "data")]
        out: PathBuf,

        /// WebDriver endpoint of a running browser driver.
        #[arg(long, default_value = "http://localhost:4444")]
        webdriver: String,

        /// Review sort order: default, newest or oldest.
        #[arg(long, default_value = "default")]
        sort: SortOrder,

        /// Bound on per-book attempt restarts.
        #[arg(long, default_value_t = 5)]
        max_attempts: u32,

        /// Seconds to wait between in-session steps.
        #[arg(long, default_value_t = 2)]
        delay: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    scrape_logging::initialize(LogDestination::Both(&cli.log_file), level);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build async runtime")
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Books { seed, out, delay } => run_books(&seed, &out, delay).await,
        Command::Reviews {
            books,
            out,
            webdriver,
            sort,
            max_attempts,
            delay,
        } => run_reviews(&books, &out, &webdriver, sort, max_attempts, delay).await,
    }
}

async fn run_books(seed: &str, out: &Path, delay: u64) -> anyhow::Result<()> {
    let seed = Url::parse(seed).context("invalid seed url")?;
    let pacing = Pacing::with_request_delay(Duration::from_secs(delay));
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).context("build http client")?;

    // Probe once before the long crawl so an unreachable site fails fast
    // instead of producing an empty truncated table.
    fetcher
        .fetch(seed.as_str())
        .await
        .context("seed url unreachable")?;

    let crawler = ListIdentifierCrawler::new(fetcher.clone(), pacing.clone());
    let report = crawler.crawl(&seed).await;
    if report.truncated {
        warn!("crawl was truncated; the book id set may be incomplete");
    }
    info!(
        "crawl found {} book ids across {} lists",
        report.book_ids.len(),
        report.list_urls.len()
    );

    let base = seed.join("/").context("derive site root from seed")?;
    let builder = BookRecordBuilder::new(fetcher, base, pacing);
    let mut table = BookTable::new();
    for book_id in &report.book_ids {
        match builder.build(book_id).await {
            Ok(record) => table.push(record),
            Err(err) => warn!("book {book_id}: {err}, skipping"),
        }
    }

    let rows = table.len();
    let path = table.finalize(out, "books.csv").context("write book table")?;
    info!("wrote {rows} book rows to {}", path.display());
    Ok(())
}

async fn run_reviews(
    books: &Path,
    out: &Path,
    webdriver: &str,
    sort: SortOrder,
    max_attempts: u32,
    delay: u64,
) -> anyhow::Result<()> {
    let book_ids = read_book_id_column(books)
        .with_context(|| format!("read book ids from {}", books.display()))?;
    if book_ids.is_empty() {
        warn!("no book ids in {}, nothing to harvest", books.display());
        return Ok(());
    }
    info!("harvesting reviews for {} books", book_ids.len());

    let session = WebDriverSession::connect(webdriver)
        .await
        .with_context(|| format!("connect to webdriver at {webdriver}"))?;
    let settings = HarvestSettings {
        sort,
        max_attempts,
        pacing: Pacing::with_request_delay(Duration::from_secs(delay)),
        ..HarvestSettings::default()
    };
    let base = Url::parse(DEFAULT_BASE_URL).context("base url")?;
    let mut engine = ReviewHarvestEngine::new(session, base, settings);

    let mut table = ReviewTable::new();
    let report = engine.run(&book_ids, &mut table).await;
    engine.shutdown().await;
    info!(
        "harvested {} books, skipped {}",
        report.harvested, report.skipped
    );

    let rows = table.len();
    let path = table
        .finalize(out, "reviews.csv")
        .context("write review table")?;
    info!("wrote {rows} review rows to {}", path.display());
    Ok(())
}

/// Reads the `book_id` column of a book table written by a previous run.
fn read_book_id_column(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers().context("read header row")?.clone();
    let column = headers
        .iter()
        .position(|name| name == "book_id")
        .context("no book_id column")?;

    let mut ids = Vec::new();
    for row in reader.records() {
        let row = row.context("read row")?;
        if let Some(id) = row.get(column) {
            if !id.is_empty() {
                ids.push(id.to_string());
            }
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::read_book_id_column;

    #[test]
    fn reads_the_book_id_column_by_header_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "title,book_id\nA,123\nB,456\nC,").unwrap();

        let ids = read_book_id_column(file.path()).unwrap();
        assert_eq!(ids, vec!["123", "456"]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "title,author\nA,B").unwrap();

        assert!(read_book_id_column(file.path()).is_err());
    }
}
