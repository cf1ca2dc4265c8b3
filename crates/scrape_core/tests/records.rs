use scrape_core::{BookRecord, RatingDistribution, BOOK_COLUMNS, RATING_BUCKETS, REVIEW_COLUMNS};

#[test]
fn unavailable_record_is_all_sentinels() {
    let record = BookRecord::unavailable("42");
    assert_eq!(record.book_id, "42");
    assert_eq!(record.isbn, "");
    assert_eq!(record.title, "");
    assert_eq!(record.author, "");
    assert_eq!(record.year_first_published, None);
    assert_eq!(record.num_pages, None);
    assert!(record.genres.is_empty());
    assert!(record.shelves.is_empty());
    assert!(record.lists.is_empty());
    assert_eq!(record.num_ratings, None);
    assert_eq!(record.num_reviews, None);
    assert_eq!(record.average_rating, None);
    assert!(record.rating_distribution.is_unavailable());
    assert_eq!(record.book_img, None);
}

#[test]
fn distribution_has_five_buckets_highest_first() {
    assert_eq!(RATING_BUCKETS.len(), 5);
    assert_eq!(RATING_BUCKETS[0], "5 Stars");
    assert_eq!(RATING_BUCKETS[4], "1 Star");
    assert_eq!(RatingDistribution::unavailable().0, [-1; 5]);
    assert!(!RatingDistribution([0, 0, 0, 0, 0]).is_unavailable());
}

#[test]
fn column_orders_are_fixed() {
    assert_eq!(BOOK_COLUMNS[0], "book_id");
    assert_eq!(BOOK_COLUMNS[12], "rating_distribution");
    assert_eq!(BOOK_COLUMNS[13], "book_img");
    assert_eq!(REVIEW_COLUMNS[0], "book_id");
    assert_eq!(REVIEW_COLUMNS[8], "shelves");
}
