use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};

use scrape_core::SortOrder;

use crate::session::{PageAdvance, ReviewSession, SessionError};

/// WebDriver-backed rendering session, the production implementation of
/// [`ReviewSession`].
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connects to a running WebDriver endpoint (chromedriver or geckodriver).
    pub async fn connect(webdriver_url: &str) -> Result<Self, SessionError> {
        let client = ClientBuilder::native()
            .connect(webdriver_url)
            .await
            .map_err(|err| SessionError::Transport(err.to_string()))?;
        Ok(Self { client })
    }
}

fn transport(err: CmdError) -> SessionError {
    SessionError::Transport(err.to_string())
}

fn ui(err: CmdError) -> SessionError {
    SessionError::Ui(err.to_string())
}

#[async_trait::async_trait]
impl ReviewSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.client.goto(url).await.map_err(transport)
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        self.client.source().await.map_err(transport)
    }

    /// Re-sorting has no dedicated endpoint; inject the same same-origin
    /// action link the listing itself renders and click it.
    async fn switch_sort(&mut self, book_id: &str, order: SortOrder) -> Result<(), SessionError> {
        let sort = order.as_param();
        let script = format!(
            concat!(
                r#"document.getElementById("reviews").insertAdjacentHTML("beforeend", "#,
                r#"'<a data-remote="true" rel="nofollow" class="actionLinkLite loadingLink" "#,
                r#"data-keep-on-success="true" id="switch{sort}" "#,
                r#"href="/book/reviews/{book_id}?rating=&sort={sort}">Switch Mode</a>');"#,
                r#"document.getElementById("switch{sort}").click();"#
            ),
            sort = sort,
            book_id = book_id,
        );
        self.client
            .execute(&script, Vec::new())
            .await
            .map(|_| ())
            .map_err(ui)
    }

    async fn select_language(&mut self, code: &str) -> Result<(), SessionError> {
        let select = self
            .client
            .find(Locator::Css("select[name='language_code']"))
            .await
            .map_err(ui)?;
        select.select_by_value(code).await.map_err(ui)
    }

    async fn dismiss_interstitial(&mut self) -> bool {
        match self.client.find(Locator::Css("button.gr-iconButton")).await {
            Ok(button) => button.click().await.is_ok(),
            Err(_) => false,
        }
    }

    async fn next_page(&mut self, page: u8) -> Result<PageAdvance, SessionError> {
        let xpath = format!("//a[@rel='next'][text()='{page}']");
        let controls = self
            .client
            .find_all(Locator::XPath(&xpath))
            .await
            .map_err(transport)?;
        match controls.into_iter().next() {
            Some(control) => {
                control.click().await.map_err(ui)?;
                Ok(PageAdvance::Advanced)
            }
            None => Ok(PageAdvance::Exhausted),
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.client.clone().close().await.map_err(transport)
    }
}
