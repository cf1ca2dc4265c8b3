use std::time::Instant;

use log::{debug, info, warn};
use url::Url;

use scrape_core::{book_page_url, duplicate_saturated, ReviewRecord, SortOrder};

use crate::fetch::Pacing;
use crate::review_page::parse_review_page;
use crate::session::{PageAdvance, ReviewSession, SessionError};
use crate::table::ReviewTable;

/// The site only renders the first ten pages of a review listing.
pub const REVIEW_PAGE_LIMIT: u8 = 10;

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub sort: SortOrder,
    /// Bound on full attempt restarts per book. The restarts themselves are
    /// unconditional; only their number is capped.
    pub max_attempts: u32,
    pub page_limit: u8,
    pub pacing: Pacing,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            sort: SortOrder::Default,
            max_attempts: 5,
            page_limit: REVIEW_PAGE_LIMIT,
            pacing: Pacing::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("invalid book url for {book_id}: {source}")]
    BookUrl {
        book_id: String,
        source: url::ParseError,
    },
    #[error("session transport failure for book {book_id}: {message}")]
    Transport { book_id: String, message: String },
    #[error("retries exhausted for book {book_id} after {attempts} attempts")]
    RetriesExhausted { book_id: String, attempts: u32 },
}

/// How one attempt ended. Transport failures are not attempt ends; they
/// surface as errors and skip the book.
enum AttemptEnd {
    Complete(Vec<ReviewRecord>),
    UiFailure(String),
}

/// Where the attempt state machine currently is.
enum AttemptState {
    Init,
    ModeSwitch,
    LanguageFilter,
    PageScrape(u8),
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub harvested: usize,
    pub skipped: usize,
}

/// Drives one rendering session through review listings, book by book.
pub struct ReviewHarvestEngine<S: ReviewSession> {
    session: S,
    base: Url,
    settings: HarvestSettings,
}

impl<S: ReviewSession> ReviewHarvestEngine<S> {
    pub fn new(session: S, base: Url, settings: HarvestSettings) -> Self {
        Self {
            session,
            base,
            settings,
        }
    }

    /// Harvests every book id in order, appending each book's accepted batch
    /// to the table. One book's failure never aborts the run.
    pub async fn run(&mut self, book_ids: &[String], table: &mut ReviewTable) -> RunReport {
        let mut report = RunReport::default();
        for book_id in book_ids {
            let started = Instant::now();
            match self.harvest_book(book_id).await {
                Ok(reviews) => {
                    info!(
                        "book {book_id}: harvested {} reviews in {:.1}s",
                        reviews.len(),
                        started.elapsed().as_secs_f64()
                    );
                    table.append(reviews);
                    report.harvested += 1;
                }
                Err(HarvestError::Transport { message, .. }) => {
                    info!("book {book_id}: transport failure ({message}), skipping");
                    report.skipped += 1;
                }
                Err(err) => {
                    warn!("book {book_id}: {err}, skipping");
                    report.skipped += 1;
                }
            }
        }
        report
    }

    /// Collects up to `page_limit` pages of reviews for one book, restarting
    /// the whole attempt on UI faults or duplicate saturation.
    pub async fn harvest_book(
        &mut self,
        book_id: &str,
    ) -> Result<Vec<ReviewRecord>, HarvestError> {
        let url = book_page_url(&self.base, book_id).map_err(|source| HarvestError::BookUrl {
            book_id: book_id.to_string(),
            source,
        })?;

        for attempt in 1..=self.settings.max_attempts {
            match self.run_attempt(book_id, url.as_str()).await {
                Ok(AttemptEnd::Complete(reviews)) => {
                    if duplicate_saturated(&reviews) {
                        warn!(
                            "book {book_id}: duplicate saturation on attempt {attempt}, \
                             discarding and restarting"
                        );
                        continue;
                    }
                    debug!(
                        "book {book_id}: attempt {attempt} accepted with {} reviews",
                        reviews.len()
                    );
                    return Ok(reviews);
                }
                Ok(AttemptEnd::UiFailure(message)) => {
                    warn!("book {book_id}: ui failure on attempt {attempt} ({message}), restarting");
                }
                Err(SessionError::Transport(message)) => {
                    return Err(HarvestError::Transport {
                        book_id: book_id.to_string(),
                        message,
                    });
                }
                Err(SessionError::Ui(message)) => {
                    warn!("book {book_id}: ui failure on attempt {attempt} ({message}), restarting");
                }
            }
        }

        Err(HarvestError::RetriesExhausted {
            book_id: book_id.to_string(),
            attempts: self.settings.max_attempts,
        })
    }

    /// One pass of the attempt state machine:
    /// Init -> ModeSwitch -> LanguageFilter -> PageScrape(1..=limit) -> Done.
    async fn run_attempt(&mut self, book_id: &str, url: &str) -> Result<AttemptEnd, SessionError> {
        let mut reviews = Vec::new();
        let mut state = AttemptState::Init;
        loop {
            state = match state {
                AttemptState::Init => {
                    self.session.navigate(url).await?;
                    AttemptState::ModeSwitch
                }
                AttemptState::ModeSwitch => {
                    if self.settings.sort != SortOrder::Default {
                        match self.session.switch_sort(book_id, self.settings.sort).await {
                            Ok(()) => self.settings.pacing.pause().await,
                            Err(SessionError::Ui(message)) => {
                                return Ok(AttemptEnd::UiFailure(message))
                            }
                            Err(err) => return Err(err),
                        }
                    }
                    AttemptState::LanguageFilter
                }
                AttemptState::LanguageFilter => {
                    // The default listing keeps mixing languages unless the
                    // filter is first cycled through a non-English value.
                    if self.settings.sort == SortOrder::Default {
                        match self.session.select_language("es").await {
                            Ok(()) => self.settings.pacing.settle().await,
                            Err(SessionError::Ui(message)) => {
                                return Ok(AttemptEnd::UiFailure(message))
                            }
                            Err(err) => return Err(err),
                        }
                    }
                    match self.session.select_language("en").await {
                        Ok(()) => self.settings.pacing.settle().await,
                        Err(SessionError::Ui(message)) => return Ok(AttemptEnd::UiFailure(message)),
                        Err(err) => return Err(err),
                    }
                    AttemptState::PageScrape(1)
                }
                AttemptState::PageScrape(page) => {
                    if self.session.dismiss_interstitial().await {
                        debug!("book {book_id}: dismissed interstitial before page {page}");
                    }
                    let source = self.session.page_source().await?;
                    reviews.extend(parse_review_page(&source, book_id, url));
                    if page >= self.settings.page_limit {
                        AttemptState::Done
                    } else {
                        match self.session.next_page(page + 1).await {
                            Ok(PageAdvance::Advanced) => {
                                self.settings.pacing.pause().await;
                                AttemptState::PageScrape(page + 1)
                            }
                            Ok(PageAdvance::Exhausted) => AttemptState::Done,
                            Err(SessionError::Ui(message)) => {
                                return Ok(AttemptEnd::UiFailure(message))
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
                AttemptState::Done => return Ok(AttemptEnd::Complete(reviews)),
            };
        }
    }

    /// Tears down the session. Call exactly once at run end, also on early
    /// termination.
    pub async fn shutdown(mut self) {
        if let Err(err) = self.session.close().await {
            warn!("session teardown failed: {err}");
        }
    }
}
