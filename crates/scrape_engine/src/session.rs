use scrape_core::SortOrder;

/// Result of asking the pager for the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAdvance {
    /// The control existed and was clicked.
    Advanced,
    /// No further page control; the listing is exhausted.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session transport itself failed (connection lost, navigation
    /// refused). Not recoverable by restarting the attempt.
    #[error("session transport failure: {0}")]
    Transport(String),
    /// An in-page interaction diverged from expectation (missing control,
    /// blocked click). Recoverable by a full attempt restart.
    #[error("ui interaction failed: {0}")]
    Ui(String),
}

/// Capability interface over the stateful rendering session.
///
/// The harvest state machine only speaks this trait, so it can be exercised
/// against a scripted fake; the production implementation drives a WebDriver
/// browser.
#[async_trait::async_trait]
pub trait ReviewSession: Send {
    /// Loads the given URL, replacing the current document.
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// Returns the source of the current rendered document.
    async fn page_source(&mut self) -> Result<String, SessionError>;

    /// Issues the in-session re-sort action for the book's review listing.
    async fn switch_sort(&mut self, book_id: &str, order: SortOrder) -> Result<(), SessionError>;

    /// Selects a value of the display-language filter.
    async fn select_language(&mut self, code: &str) -> Result<(), SessionError>;

    /// Best-effort dismissal of an interstitial dialog. Returns whether one
    /// was dismissed; failure is never fatal.
    async fn dismiss_interstitial(&mut self) -> bool;

    /// Clicks the pagination control for the given page, if it exists.
    async fn next_page(&mut self, page: u8) -> Result<PageAdvance, SessionError>;

    /// Tears the session down. Called exactly once at run end.
    async fn close(&mut self) -> Result<(), SessionError>;
}
