use url::Url;

/// Host every crawl and harvest runs against.
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com/";

/// Review listing sort orders. `Default` is the site's relevance-ish order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Default,
    Newest,
    Oldest,
}

impl SortOrder {
    /// Value of the in-session re-sort action's `sort` parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Default => "default",
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SortOrder::Default),
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// The book page, which doubles as the review listing entry point.
pub fn book_page_url(base: &Url, book_id: &str) -> Result<Url, url::ParseError> {
    base.join(&format!("book/show/{book_id}"))
}

/// Appends or replaces the `page` pagination parameter.
pub fn paged_url(url: &Url, page: u32) -> Url {
    let mut paged = url.clone();
    let retained: Vec<(String, String)> = paged
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = paged.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("page", &page.to_string());
    }
    paged
}
