use pretty_assertions::assert_eq;
use scrape_engine::parse_review_page;

const LISTING: &str = r#"<html><body>
<div class="review" id="review_1">
  <a class="user" href="/user/show/9-ana">Ana</a>
  <a class="reviewDate" href="/review/show/1">Jan 04, 2020</a>
  <span class="staticStars" title="it was amazing"></span>
  <span class="readable">
    <span id="short">A fine sta...</span>
    <span id="full" style="display:none">A fine start to the series.</span>
  </span>
  <span class="likesCount">12 likes</span>
  <div class="bookshelves">
    <a href="/shelf/1">favorites</a>
    <a href="/shelf/2">fiction</a>
  </div>
</div>
<div class="review" id="review_2">
  <a class="reviewDate" href="/review/show/2">Feb 10, 2021</a>
  <span class="readable">
    <span id="short2">Short enough to show whole.</span>
  </span>
</div>
<div class="review">
  <span class="readable"><span>no id, dropped</span></span>
</div>
</body></html>"#;

#[test]
fn parses_full_and_minimal_review_nodes() {
    let reviews = parse_review_page(LISTING, "42", "https://example.test/book/show/42");

    assert_eq!(reviews.len(), 2);

    let first = &reviews[0];
    assert_eq!(first.book_id, "42");
    assert_eq!(first.review_url, "https://example.test/book/show/42");
    assert_eq!(first.review_id, "review_1");
    assert_eq!(first.date, "Jan 04, 2020");
    assert_eq!(first.rating, Some(5));
    assert_eq!(first.user, "/user/show/9-ana");
    assert_eq!(first.text, "A fine start to the series.");
    assert_eq!(first.num_likes, 12);
    assert_eq!(first.shelves, vec!["favorites", "fiction"]);

    let second = &reviews[1];
    assert_eq!(second.review_id, "review_2");
    assert_eq!(second.rating, None);
    assert_eq!(second.user, "");
    assert_eq!(second.text, "Short enough to show whole.");
    assert_eq!(second.num_likes, 0);
    assert!(second.shelves.is_empty());
}

#[test]
fn unknown_star_label_fails_closed() {
    let html = r#"<div class="review" id="r1">
        <span class="staticStars" title="it was fine"></span>
    </div>"#;
    let reviews = parse_review_page(html, "1", "u");
    assert_eq!(reviews[0].rating, None);
}

#[test]
fn likes_without_label_are_zero() {
    let html = r#"<div class="review" id="r1">
        <span class="likesCount">12</span>
    </div>"#;
    let reviews = parse_review_page(html, "1", "u");
    assert_eq!(reviews[0].num_likes, 0);
}

#[test]
fn empty_listing_yields_no_records() {
    assert!(parse_review_page("<html><body></body></html>", "1", "u").is_empty());
}
