use pretty_assertions::assert_eq;
use scrape_core::{BookRecord, NamedCount, RatingDistribution};
use scrape_engine::{BookRecordBuilder, FetchSettings, Pacing, ReqwestFetcher};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOOK_PAGE: &str = r##"<html><body>
<h1 id="bookTitle"> The Silent Valley </h1>
<span itemprop="name">A. Narrator</span>
<div class="infoBox">
  <div class="infoBoxRowTitle">ISBN</div>
  <div class="infoBoxRowItem">0618346252 (ISBN13: 9780618346257)</div>
</div>
<nobr class="greyText">(first published 1954)</nobr>
<span itemprop="numberOfPages">423 pages</span>
<div class="left">
  <a class="actionLinkLite bookPageGenreLink" href="/genres/fiction">Fiction</a>
  <a class="actionLinkLite bookPageGenreLink" href="/genres/historical">Historical</a>
</div>
<div class="left">
  <a class="actionLinkLite bookPageGenreLink" href="/genres/classics">Classics</a>
</div>
<meta itemprop="ratingCount" content="2500000">
<meta itemprop="reviewCount" content="30000">
<span itemprop="ratingValue">4.36</span>
<img id="coverImage" src="https://images.example/cover.jpg">
<script>new renderRatingGraph([1000, 800, 400, 100, 50]);</script>
<a href="/book/shelves/1">See top shelves&#8230;</a>
<a href="/list/book/1">More lists with this book...</a>
</body></html>"##;

const SHELVES_PAGE: &str = r#"<html><body>
<div class="shelfStat">to-read 5000 people</div>
<div class="shelfStat">currently reading 1200 people</div>
</body></html>"#;

const LISTS_PAGE_1: &str = r#"<html><body>
<div class="cell">Best Rural Novels 500 books</div>
<a class="next_page" href="/list/book/1_p2">next</a>
</body></html>"#;

const LISTS_PAGE_2: &str = r#"<html><body>
<div class="cell">Quiet Classics 120 books</div>
</body></html>"#;

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

fn builder(server: &MockServer) -> BookRecordBuilder<ReqwestFetcher> {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("client");
    let base = Url::parse(&format!("{}/", server.uri())).expect("base url");
    BookRecordBuilder::new(fetcher, base, Pacing::zero())
}

#[tokio::test]
async fn builds_complete_record_with_shelves_and_paginated_lists() {
    let server = MockServer::start().await;
    mount_page(&server, "/book/show/1", BOOK_PAGE).await;
    mount_page(&server, "/book/shelves/1", SHELVES_PAGE).await;
    mount_page(&server, "/list/book/1", LISTS_PAGE_1).await;
    mount_page(&server, "/list/book/1_p2", LISTS_PAGE_2).await;

    let record = builder(&server).build("1").await.expect("build ok");

    assert_eq!(record.book_id, "1");
    assert_eq!(record.isbn, "0618346252");
    assert_eq!(record.year_first_published, Some(1954));
    assert_eq!(record.title, "The Silent Valley");
    assert_eq!(record.author, "A. Narrator");
    assert_eq!(record.num_pages, Some(423));
    assert_eq!(
        record.genres,
        vec!["Fiction > Historical".to_string(), "Classics".to_string()]
    );
    assert_eq!(
        record.shelves,
        vec![
            NamedCount::new("to-read", 5000),
            NamedCount::new("currently reading", 1200),
        ]
    );
    assert_eq!(
        record.lists,
        vec![
            NamedCount::new("Best Rural Novels", 500),
            NamedCount::new("Quiet Classics", 120),
        ]
    );
    assert_eq!(record.num_ratings, Some(2_500_000));
    assert_eq!(record.num_reviews, Some(30_000));
    assert_eq!(record.average_rating, Some(4.36));
    assert_eq!(
        record.rating_distribution,
        RatingDistribution([1000, 800, 400, 100, 50])
    );
    assert_eq!(
        record.book_img.as_deref(),
        Some("https://images.example/cover.jpg")
    );
}

#[tokio::test]
async fn empty_page_yields_all_sentinels_not_an_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/book/show/77", "<html><body></body></html>").await;

    let record = builder(&server).build("77").await.expect("build ok");
    assert_eq!(record, BookRecord::unavailable("77"));
}

#[tokio::test]
async fn same_document_builds_identical_records() {
    let server = MockServer::start().await;
    mount_page(&server, "/book/show/1", BOOK_PAGE).await;
    mount_page(&server, "/book/shelves/1", SHELVES_PAGE).await;
    mount_page(&server, "/list/book/1", LISTS_PAGE_1).await;
    mount_page(&server, "/list/book/1_p2", LISTS_PAGE_2).await;

    let builder = builder(&server);
    let first = builder.build("1").await.expect("first build");
    let second = builder.build("1").await.expect("second build");
    assert_eq!(first, second);
}

#[tokio::test]
async fn transport_failure_on_primary_document_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/show/9"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = builder(&server).build("9").await.unwrap_err();
    assert_eq!(err.kind, scrape_engine::FetchFailure::HttpStatus(500));
}
