use scrape_core::{book_page_url, paged_url, SortOrder, DEFAULT_BASE_URL};
use url::Url;

#[test]
fn book_page_joins_id_onto_base() {
    let base = Url::parse(DEFAULT_BASE_URL).unwrap();
    let url = book_page_url(&base, "12345").unwrap();
    assert_eq!(url.as_str(), "https://www.goodreads.com/book/show/12345");
}

#[test]
fn paged_url_appends_and_replaces_page() {
    let url = Url::parse("https://example.com/list/popular_lists").unwrap();
    let page1 = paged_url(&url, 1);
    assert_eq!(
        page1.as_str(),
        "https://example.com/list/popular_lists?page=1"
    );
    let page2 = paged_url(&page1, 2);
    assert_eq!(
        page2.as_str(),
        "https://example.com/list/popular_lists?page=2"
    );
}

#[test]
fn paged_url_keeps_other_parameters() {
    let url = Url::parse("https://example.com/list?ref=abc").unwrap();
    assert_eq!(
        paged_url(&url, 3).as_str(),
        "https://example.com/list?ref=abc&page=3"
    );
}

#[test]
fn sort_order_round_trips_through_params() {
    assert_eq!(SortOrder::Default.as_param(), "default");
    assert_eq!("newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
    assert_eq!("oldest".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
    assert!("best".parse::<SortOrder>().is_err());
}
