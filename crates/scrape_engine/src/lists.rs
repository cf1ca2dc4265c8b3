use std::collections::HashSet;

use log::{info, warn};
use scraper::{Html, Selector};
use url::Url;

use scrape_core::{book_id_from_href, paged_url};

use crate::fetch::{Fetcher, Pacing};

/// Result of one id-discovery crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub list_urls: Vec<String>,
    /// De-duplicated book ids in first-seen order.
    pub book_ids: Vec<String>,
    /// True when any pagination pass ended on a non-404 fetch failure, so
    /// the id set may be incomplete.
    pub truncated: bool,
}

/// Discovers book ids via two-level pagination over curated list pages.
pub struct ListIdentifierCrawler<F: Fetcher> {
    fetcher: F,
    pacing: Pacing,
}

impl<F: Fetcher> ListIdentifierCrawler<F> {
    pub fn new(fetcher: F, pacing: Pacing) -> Self {
        Self { fetcher, pacing }
    }

    /// Level one pages the seed for list URLs; level two pages each list for
    /// item hrefs. Fetch failures never error out of the crawl: the worst
    /// case is an empty, truncation-flagged report.
    pub async fn crawl(&self, seed: &Url) -> CrawlReport {
        let mut report = CrawlReport::default();

        let list_hrefs = self
            .paginate(seed, "a.listTitle", &mut report.truncated)
            .await;
        let mut seen_lists = HashSet::new();
        for href in list_hrefs {
            let Ok(url) = seed.join(&href) else {
                continue;
            };
            let url = url.to_string();
            if seen_lists.insert(url.clone()) {
                report.list_urls.push(url);
            }
        }
        info!("found {} curated lists", report.list_urls.len());

        let mut seen_ids = HashSet::new();
        for list_url in report.list_urls.clone() {
            let Ok(url) = Url::parse(&list_url) else {
                continue;
            };
            let item_hrefs = self
                .paginate(&url, "a.bookTitle", &mut report.truncated)
                .await;
            for href in item_hrefs {
                let Some(id) = book_id_from_href(&href) else {
                    continue;
                };
                if seen_ids.insert(id.clone()) {
                    report.book_ids.push(id);
                }
            }
            info!("{} book ids collected after {list_url}", report.book_ids.len());
        }
        report
    }

    /// Pages `?page=N` from 1, collecting matching anchor hrefs, until a page
    /// has no matches or a fetch fails. A 404 is the normal end-of-pagination
    /// signal; any other failure flags possible truncation.
    async fn paginate(&self, url: &Url, css: &str, truncated: &mut bool) -> Vec<String> {
        let Ok(selector) = Selector::parse(css) else {
            return Vec::new();
        };

        let mut hrefs = Vec::new();
        let mut page = 1u32;
        loop {
            let page_url = paged_url(url, page);
            let html = match self.fetcher.fetch(page_url.as_str()).await {
                Ok(html) => html,
                Err(err) if err.is_http_not_found() => {
                    info!("pagination of {url} ended after {} pages", page - 1);
                    break;
                }
                Err(err) => {
                    warn!("pagination of {url} truncated on page {page}: {err}");
                    *truncated = true;
                    break;
                }
            };
            self.pacing.pause().await;

            let doc = Html::parse_document(&html);
            let matches: Vec<String> = doc
                .select(&selector)
                .filter_map(|a| a.value().attr("href"))
                .map(ToString::to_string)
                .collect();
            if matches.is_empty() {
                info!("pagination of {url} ended after {} pages", page - 1);
                break;
            }
            hrefs.extend(matches);
            page += 1;
        }
        hrefs
    }
}
