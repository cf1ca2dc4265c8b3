/// Extracts the numeric book id from an item href such as
/// `/book/show/12345.The_Title` or `https://host/book/show/12345-title`.
///
/// The id is the leading decimal run of the last path segment. Hrefs without
/// one yield `None` and are dropped by the crawler.
pub fn book_id_from_href(href: &str) -> Option<String> {
    let last = href.trim_end_matches('/').rsplit('/').next()?;
    let digits: String = last.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits)
}
