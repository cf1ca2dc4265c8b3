use log::{error, warn};
use scraper::Html;
use url::Url;

use scrape_core::{book_page_url, BookRecord, NamedCount};

use crate::extract::{self, ExtractInput, ExtractNote};
use crate::fetch::{FetchError, FetchFailure, Fetcher, Pacing};

/// Upper bound on lists pages followed beyond the first.
const MAX_EXTRA_LIST_PAGES: usize = 11;

/// Assembles one [`BookRecord`] per book id: one primary document fetch, a
/// registry pass over it, and secondary fetches for shelves and lists.
pub struct BookRecordBuilder<F: Fetcher> {
    fetcher: F,
    base: Url,
    pacing: Pacing,
}

impl<F: Fetcher> BookRecordBuilder<F> {
    pub fn new(fetcher: F, base: Url, pacing: Pacing) -> Self {
        Self {
            fetcher,
            base,
            pacing,
        }
    }

    /// Builds the record. Every field resolves independently to a value or
    /// its sentinel; only transport failures propagate.
    pub async fn build(&self, book_id: &str) -> Result<BookRecord, FetchError> {
        let url = book_page_url(&self.base, book_id)
            .map_err(|err| FetchError::new(FetchFailure::InvalidUrl, err.to_string()))?;
        let raw = self.fetcher.fetch(url.as_str()).await?;
        self.pacing.pause().await;

        let doc = Html::parse_document(&raw);
        let mut record = BookRecord::unavailable(book_id);
        let input = ExtractInput {
            doc: &doc,
            raw: &raw,
        };
        for extractor in extract::registry() {
            if let Some(note) = extractor.apply(&input, &mut record) {
                log_note(book_id, &note);
            }
        }

        record.shelves = self.fetch_shelves(book_id, &doc).await?;
        record.lists = self.fetch_lists(book_id, &doc).await?;
        Ok(record)
    }

    async fn fetch_shelves(
        &self,
        book_id: &str,
        doc: &Html,
    ) -> Result<Vec<NamedCount>, FetchError> {
        let Some(href) = extract::top_shelves_href(doc) else {
            warn!("shelves not found for {book_id}");
            return Ok(Vec::new());
        };
        let url = self.absolute(&href)?;
        let raw = self.fetcher.fetch(url.as_str()).await?;
        self.pacing.pause().await;
        Ok(extract::shelf_rows(&Html::parse_document(&raw)))
    }

    /// The lists overview paginates; follow the next-page control a bounded
    /// number of times, pacing each hop.
    async fn fetch_lists(&self, book_id: &str, doc: &Html) -> Result<Vec<NamedCount>, FetchError> {
        let Some(href) = extract::more_lists_href(doc) else {
            warn!("lists not found for {book_id}");
            return Ok(Vec::new());
        };

        let url = self.absolute(&href)?;
        let raw = self.fetcher.fetch(url.as_str()).await?;
        self.pacing.pause().await;
        let mut page = Html::parse_document(&raw);
        let mut rows = extract::list_rows(&page);

        let mut followed = 0;
        while let Some(next) = extract::next_page_href(&page) {
            if followed >= MAX_EXTRA_LIST_PAGES {
                break;
            }
            let next_url = self.absolute(&next)?;
            let raw = self.fetcher.fetch(next_url.as_str()).await?;
            self.pacing.pause().await;
            page = Html::parse_document(&raw);
            rows.extend(extract::list_rows(&page));
            followed += 1;
        }
        Ok(rows)
    }

    fn absolute(&self, href: &str) -> Result<Url, FetchError> {
        self.base
            .join(href)
            .map_err(|err| FetchError::new(FetchFailure::InvalidUrl, err.to_string()))
    }
}

fn log_note(book_id: &str, note: &ExtractNote) {
    match note {
        ExtractNote::Missing { field } => warn!("{field} not found for {book_id}"),
        ExtractNote::Failed { field, detail } => {
            error!("{field} extraction failed for {book_id}: {detail}")
        }
    }
}
