use pretty_assertions::assert_eq;
use scrape_engine::{FetchSettings, ListIdentifierCrawler, Pacing, ReqwestFetcher};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, route: &str, page: u32, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

fn crawler(server: &MockServer) -> (ListIdentifierCrawler<ReqwestFetcher>, Url) {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("client");
    let seed = Url::parse(&format!("{}/list/tag/rural", server.uri())).expect("seed url");
    (ListIdentifierCrawler::new(fetcher, Pacing::zero()), seed)
}

#[tokio::test]
async fn crawl_collects_deduplicated_ids_across_lists() {
    let server = MockServer::start().await;
    // Unmounted pages answer 404, the normal end-of-pagination signal.
    mount_page(
        &server,
        "/list/tag/rural",
        1,
        r#"<a class="listTitle" href="/list/show/1.Best">Best</a>
           <a class="listTitle" href="/list/show/2.Other">Other</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/list/show/1.Best",
        1,
        r#"<a class="bookTitle" href="/book/show/123-abc">A</a>
           <a class="bookTitle" href="/book/show/456.def">B</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/list/show/2.Other",
        1,
        r#"<a class="bookTitle" href="/book/show/123-abc">A</a>
           <a class="bookTitle" href="/book/show/789">C</a>"#,
    )
    .await;

    let (crawler, seed) = crawler(&server);
    let report = crawler.crawl(&seed).await;

    assert_eq!(
        report.list_urls,
        vec![
            format!("{}/list/show/1.Best", server.uri()),
            format!("{}/list/show/2.Other", server.uri()),
        ]
    );
    assert_eq!(report.book_ids, vec!["123", "456", "789"]);
    assert!(!report.truncated);
}

#[tokio::test]
async fn crawl_follows_seed_pagination() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/list/tag/rural",
        1,
        r#"<a class="listTitle" href="/list/show/1.Best">Best</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/list/tag/rural",
        2,
        r#"<a class="listTitle" href="/list/show/2.Other">Other</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/list/show/1.Best",
        1,
        r#"<a class="bookTitle" href="/book/show/11">A</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/list/show/2.Other",
        1,
        r#"<a class="bookTitle" href="/book/show/22">B</a>"#,
    )
    .await;

    let (crawler, seed) = crawler(&server);
    let report = crawler.crawl(&seed).await;

    assert_eq!(report.list_urls.len(), 2);
    assert_eq!(report.book_ids, vec!["11", "22"]);
    assert!(!report.truncated);
}

#[tokio::test]
async fn seed_transport_failure_yields_empty_truncated_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list/tag/rural"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (crawler, seed) = crawler(&server);
    let report = crawler.crawl(&seed).await;

    assert!(report.list_urls.is_empty());
    assert!(report.book_ids.is_empty());
    assert!(report.truncated);
}

#[tokio::test]
async fn list_transport_failure_flags_truncation_but_keeps_earlier_ids() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/list/tag/rural",
        1,
        r#"<a class="listTitle" href="/list/show/1.Best">Best</a>
           <a class="listTitle" href="/list/show/2.Other">Other</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/list/show/1.Best",
        1,
        r#"<a class="bookTitle" href="/book/show/11">A</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/list/show/2.Other"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (crawler, seed) = crawler(&server);
    let report = crawler.crawl(&seed).await;

    assert_eq!(report.book_ids, vec!["11"]);
    assert!(report.truncated);
}
