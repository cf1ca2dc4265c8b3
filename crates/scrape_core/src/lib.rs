//! Scrape core: pure record types and parsing helpers, no IO.
mod dedup;
mod ident;
mod rating;
mod record;
mod rows;
mod urls;

pub use dedup::{duplicate_saturated, DUPLICATE_SATURATION_THRESHOLD};
pub use ident::book_id_from_href;
pub use rating::rating_from_text;
pub use record::{
    BookRecord, NamedCount, RatingDistribution, ReviewRecord, BOOK_COLUMNS, RATING_BUCKETS,
    REVIEW_COLUMNS,
};
pub use rows::parse_name_count_row;
pub use urls::{book_page_url, paged_url, SortOrder, DEFAULT_BASE_URL};
