use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use scrape_core::{parse_name_count_row, BookRecord, NamedCount, RatingDistribution};

/// Outcome of one field extraction when the value could not be produced.
///
/// `Missing` is a recognized absence (the field legitimately does not exist
/// on this document); `Failed` is a shape the extractor did not expect. Both
/// resolve to the field's sentinel; they differ only in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractNote {
    Missing { field: &'static str },
    Failed { field: &'static str, detail: String },
}

/// A parsed document plus its raw text, for extractors that read script blobs.
pub struct ExtractInput<'a> {
    pub doc: &'a Html,
    pub raw: &'a str,
}

/// One named field extractor with the uniform three-way contract: typed value
/// into the record, or the sentinel already present plus a note.
pub struct FieldExtractor {
    pub name: &'static str,
    apply: fn(&ExtractInput<'_>, &mut BookRecord) -> Option<ExtractNote>,
}

impl FieldExtractor {
    pub fn apply(&self, input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
        (self.apply)(input, record)
    }
}

/// Every single-document field of a book record, in column order. Shelves and
/// lists need secondary fetches and live in the record builder instead.
pub fn registry() -> &'static [FieldExtractor] {
    &[
        FieldExtractor { name: "isbn", apply: extract_isbn },
        FieldExtractor { name: "year_first_published", apply: extract_year },
        FieldExtractor { name: "title", apply: extract_title },
        FieldExtractor { name: "author", apply: extract_author },
        FieldExtractor { name: "num_pages", apply: extract_num_pages },
        FieldExtractor { name: "genres", apply: extract_genres },
        FieldExtractor { name: "num_ratings", apply: extract_num_ratings },
        FieldExtractor { name: "num_reviews", apply: extract_num_reviews },
        FieldExtractor { name: "average_rating", apply: extract_average_rating },
        FieldExtractor { name: "rating_distribution", apply: extract_rating_distribution },
        FieldExtractor { name: "book_img", apply: extract_book_img },
    ]
}

fn missing(field: &'static str) -> Option<ExtractNote> {
    Some(ExtractNote::Missing { field })
}

fn failed(field: &'static str, detail: impl Into<String>) -> Option<ExtractNote> {
    Some(ExtractNote::Failed {
        field,
        detail: detail.into(),
    })
}

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector).next()
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_title(input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
    match select_first(input.doc, "h1#bookTitle") {
        Some(node) => {
            record.title = collapsed_text(node);
            None
        }
        None => missing("title"),
    }
}

fn extract_author(input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
    match select_first(input.doc, r#"span[itemprop="name"]"#) {
        Some(node) => {
            record.author = collapsed_text(node);
            None
        }
        None => missing("author"),
    }
}

/// The ISBN row label is either "ISBN" or "ISBN13"; the number is the first
/// token of the sibling value cell.
fn extract_isbn(input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
    let Ok(selector) = Selector::parse("div.infoBoxRowTitle") else {
        return failed("isbn", "bad selector");
    };
    let label = input.doc.select(&selector).find(|node| {
        let text = collapsed_text(*node);
        text == "ISBN" || text == "ISBN13"
    });
    let Some(label) = label else {
        return missing("isbn");
    };
    let value = label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .next()
        .map(collapsed_text);
    match value
        .as_deref()
        .and_then(|text| text.split_whitespace().next())
    {
        Some(isbn) => {
            record.isbn = isbn.to_string();
            None
        }
        None => missing("isbn"),
    }
}

fn extract_year(input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
    let Some(node) = select_first(input.doc, "nobr.greyText") else {
        return missing("year_first_published");
    };
    let text = collapsed_text(node);
    let pattern = match Regex::new(r"([0-9]{3,4})") {
        Ok(pattern) => pattern,
        Err(err) => return failed("year_first_published", err.to_string()),
    };
    match pattern
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok())
    {
        Some(year) => {
            record.year_first_published = Some(year);
            None
        }
        None => failed("year_first_published", format!("no year in {text:?}")),
    }
}

fn extract_num_pages(input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
    let Some(node) = select_first(input.doc, r#"span[itemprop="numberOfPages"]"#) else {
        return missing("num_pages");
    };
    let text = collapsed_text(node);
    match text.split_whitespace().next().and_then(|n| n.parse().ok()) {
        Some(pages) => {
            record.num_pages = Some(pages);
            None
        }
        None => failed("num_pages", format!("unparseable page count {text:?}")),
    }
}

/// One genre path per `div.left` block, joined into "Parent > Child" form.
fn extract_genres(input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
    let Ok(blocks) = Selector::parse("div.left") else {
        return failed("genres", "bad selector");
    };
    let Ok(links) = Selector::parse("a.actionLinkLite.bookPageGenreLink") else {
        return failed("genres", "bad selector");
    };
    let mut genres = Vec::new();
    for block in input.doc.select(&blocks) {
        let path = block
            .select(&links)
            .map(collapsed_text)
            .collect::<Vec<_>>()
            .join(" > ");
        if !path.trim().is_empty() {
            genres.push(path);
        }
    }
    if genres.is_empty() {
        return missing("genres");
    }
    record.genres = genres;
    None
}

fn meta_content_count(doc: &Html, css: &str) -> Option<Result<u64, String>> {
    let node = select_first(doc, css)?;
    let content = node.value().attr("content")?.trim();
    Some(content.parse::<u64>().map_err(|_| content.to_string()))
}

fn extract_num_ratings(input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
    match meta_content_count(input.doc, r#"meta[itemprop="ratingCount"]"#) {
        Some(Ok(count)) => {
            record.num_ratings = Some(count);
            None
        }
        Some(Err(text)) => failed("num_ratings", format!("unparseable count {text:?}")),
        None => missing("num_ratings"),
    }
}

fn extract_num_reviews(input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
    match meta_content_count(input.doc, r#"meta[itemprop="reviewCount"]"#) {
        Some(Ok(count)) => {
            record.num_reviews = Some(count);
            None
        }
        Some(Err(text)) => failed("num_reviews", format!("unparseable count {text:?}")),
        None => missing("num_reviews"),
    }
}

fn extract_average_rating(
    input: &ExtractInput<'_>,
    record: &mut BookRecord,
) -> Option<ExtractNote> {
    let Some(node) = select_first(input.doc, r#"span[itemprop="ratingValue"]"#) else {
        return missing("average_rating");
    };
    let text = collapsed_text(node);
    match text.parse::<f64>() {
        Ok(value) => {
            record.average_rating = Some(value);
            None
        }
        Err(_) => failed("average_rating", format!("unparseable rating {text:?}")),
    }
}

/// The distribution only exists in a `renderRatingGraph([...])` script call
/// in the raw document, five counts with the 5-star bucket first.
fn extract_rating_distribution(
    input: &ExtractInput<'_>,
    record: &mut BookRecord,
) -> Option<ExtractNote> {
    let pattern = match Regex::new(r"renderRatingGraph\(\s*\[([0-9,\s]+)") {
        Ok(pattern) => pattern,
        Err(err) => return failed("rating_distribution", err.to_string()),
    };
    let Some(caps) = pattern.captures(input.raw) else {
        return failed("rating_distribution", "renderRatingGraph blob not found");
    };
    let counts: Vec<i64> = caps[1]
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect();
    if counts.len() < 5 {
        return failed(
            "rating_distribution",
            format!("expected 5 buckets, found {}", counts.len()),
        );
    }
    record.rating_distribution =
        RatingDistribution([counts[0], counts[1], counts[2], counts[3], counts[4]]);
    None
}

fn extract_book_img(input: &ExtractInput<'_>, record: &mut BookRecord) -> Option<ExtractNote> {
    match select_first(input.doc, "img#coverImage").and_then(|node| node.value().attr("src")) {
        Some(src) => {
            record.book_img = Some(src.to_string());
            None
        }
        None => missing("book_img"),
    }
}

/// Href of the "See top shelves…" link, if the document has one.
pub fn top_shelves_href(doc: &Html) -> Option<String> {
    anchor_href_by_text(doc, "See top shelves…")
}

/// Href of the "More lists with this book..." link, if present.
pub fn more_lists_href(doc: &Html) -> Option<String> {
    anchor_href_by_text(doc, "More lists with this book...")
}

/// Href of the lists pagination "next page" control.
pub fn next_page_href(doc: &Html) -> Option<String> {
    let node = select_first(doc, "a.next_page")?;
    node.value().attr("href").map(ToString::to_string)
}

fn anchor_href_by_text(doc: &Html, text: &str) -> Option<String> {
    let selector = Selector::parse("a").ok()?;
    doc.select(&selector)
        .find(|node| collapsed_text(*node) == text)
        .and_then(|node| node.value().attr("href"))
        .map(ToString::to_string)
}

/// Name/count pairs from the shelf stat blocks of a top-shelves page.
pub fn shelf_rows(doc: &Html) -> Vec<NamedCount> {
    name_count_rows(doc, "div.shelfStat")
}

/// Name/count pairs from the cells of one lists page.
pub fn list_rows(doc: &Html) -> Vec<NamedCount> {
    name_count_rows(doc, "div.cell")
}

fn name_count_rows(doc: &Html, css: &str) -> Vec<NamedCount> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    doc.select(&selector)
        .filter_map(|node| parse_name_count_row(&collapsed_text(node)))
        .collect()
}
