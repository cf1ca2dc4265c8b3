//! Scrape engine: fetching, page parsing, harvest orchestration and sinks.
mod book;
mod extract;
mod fetch;
mod harvest;
mod lists;
mod persist;
mod review_page;
mod session;
mod table;
mod webdriver;

pub use book::BookRecordBuilder;
pub use extract::{registry, ExtractInput, ExtractNote, FieldExtractor};
pub use fetch::{FetchError, FetchFailure, FetchSettings, Fetcher, Pacing, ReqwestFetcher};
pub use harvest::{
    HarvestError, HarvestSettings, ReviewHarvestEngine, RunReport, REVIEW_PAGE_LIMIT,
};
pub use lists::{CrawlReport, ListIdentifierCrawler};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use review_page::parse_review_page;
pub use session::{PageAdvance, ReviewSession, SessionError};
pub use table::{BookTable, ReviewTable, SinkError};
pub use webdriver::WebDriverSession;
