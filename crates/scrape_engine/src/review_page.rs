use scraper::{ElementRef, Html, Selector};

use scrape_core::{rating_from_text, ReviewRecord};

/// Parses every review node of one rendered listing page.
///
/// Nodes missing individual pieces still yield a record with that field's
/// sentinel; a node without an id attribute is dropped, since review_id is
/// the dedup key.
pub fn parse_review_page(html: &str, book_id: &str, review_url: &str) -> Vec<ReviewRecord> {
    let doc = Html::parse_document(html);
    let Ok(node_selector) = Selector::parse("div.review") else {
        return Vec::new();
    };

    let mut reviews = Vec::new();
    for node in doc.select(&node_selector) {
        let Some(review_id) = node.value().attr("id") else {
            continue;
        };
        reviews.push(ReviewRecord {
            book_id: book_id.to_string(),
            review_url: review_url.to_string(),
            review_id: review_id.to_string(),
            date: review_date(node),
            rating: review_rating(node),
            user: review_user(node),
            text: review_text(node),
            num_likes: review_likes(node),
            shelves: review_shelves(node),
        });
    }
    reviews
}

fn first_in<'a>(node: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    node.select(&selector).next()
}

fn review_rating(node: ElementRef<'_>) -> Option<u8> {
    let stars = first_in(node, "span.staticStars")?;
    rating_from_text(stars.value().attr("title").unwrap_or(""))
}

fn review_date(node: ElementRef<'_>) -> String {
    first_in(node, "a.reviewDate")
        .map(|a| a.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn review_user(node: ElementRef<'_>) -> String {
    first_in(node, "a.user")
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .to_string()
}

/// The readable span holds a visible display span and, for long reviews, a
/// hidden span with the expanded text. Prefer the expanded one.
fn review_text(node: ElementRef<'_>) -> String {
    let Some(readable) = first_in(node, "span.readable") else {
        return String::new();
    };

    let mut display_text = String::new();
    let mut full_text = String::new();
    for child in readable.children().filter_map(ElementRef::wrap) {
        if child.value().name() != "span" {
            continue;
        }
        match child.value().attr("style") {
            None => display_text = child.text().collect::<String>(),
            Some("display:none") => full_text = child.text().collect::<String>(),
            Some(_) => {}
        }
    }

    if full_text.is_empty() {
        display_text
    } else {
        full_text
    }
}

fn review_likes(node: ElementRef<'_>) -> u32 {
    let Some(likes) = first_in(node, "span.likesCount") else {
        return 0;
    };
    let text = likes.text().collect::<String>();
    if !text.contains("likes") {
        return 0;
    }
    text.split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn review_shelves(node: ElementRef<'_>) -> Vec<String> {
    let Some(shelves_node) = first_in(node, "div.bookshelves") else {
        return Vec::new();
    };
    let Ok(anchor) = Selector::parse("a") else {
        return Vec::new();
    };
    shelves_node
        .select(&anchor)
        .map(|a| a.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
