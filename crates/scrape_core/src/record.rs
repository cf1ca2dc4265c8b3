/// Column order of the book table. Fixed external contract for downstream
/// analysis pipelines; do not reorder.
pub const BOOK_COLUMNS: [&str; 14] = [
    "book_id",
    "isbn",
    "year_first_published",
    "title",
    "author",
    "num_pages",
    "genres",
    "shelves",
    "lists",
    "num_ratings",
    "num_reviews",
    "average_rating",
    "rating_distribution",
    "book_img",
];

/// Column order of the review table.
pub const REVIEW_COLUMNS: [&str; 9] = [
    "book_id",
    "review_url",
    "review_id",
    "date",
    "rating",
    "user",
    "text",
    "num_likes",
    "shelves",
];

/// Star-bucket labels of the rating distribution, highest first.
pub const RATING_BUCKETS: [&str; 5] = ["5 Stars", "4 Stars", "3 Stars", "2 Stars", "1 Star"];

/// An ordered name/count pair from a shelves or lists page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCount {
    pub name: String,
    pub count: i64,
}

impl NamedCount {
    pub fn new(name: impl Into<String>, count: i64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Counts per star bucket, highest bucket first. All buckets are -1 when the
/// distribution could not be read; they are never partially filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingDistribution(pub [i64; 5]);

impl RatingDistribution {
    /// The all-buckets-unavailable sentinel.
    pub fn unavailable() -> Self {
        Self([-1; 5])
    }

    pub fn is_unavailable(&self) -> bool {
        self.0 == [-1; 5]
    }
}

impl Default for RatingDistribution {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// One row of the book table.
///
/// Every field is either a typed value or an explicit sentinel (empty string,
/// `None`, empty collection, all-`-1` distribution). A field is never absent.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub book_id: String,
    pub isbn: String,
    pub year_first_published: Option<u16>,
    pub title: String,
    pub author: String,
    pub num_pages: Option<u32>,
    /// Hierarchical genre paths, e.g. "Fiction > Historical".
    pub genres: Vec<String>,
    pub shelves: Vec<NamedCount>,
    pub lists: Vec<NamedCount>,
    pub num_ratings: Option<u64>,
    pub num_reviews: Option<u64>,
    pub average_rating: Option<f64>,
    pub rating_distribution: RatingDistribution,
    pub book_img: Option<String>,
}

impl BookRecord {
    /// The all-sentinel record the field extractors fill in.
    pub fn unavailable(book_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            isbn: String::new(),
            year_first_published: None,
            title: String::new(),
            author: String::new(),
            num_pages: None,
            genres: Vec::new(),
            shelves: Vec::new(),
            lists: Vec::new(),
            num_ratings: None,
            num_reviews: None,
            average_rating: None,
            rating_distribution: RatingDistribution::unavailable(),
            book_img: None,
        }
    }
}

/// One row of the review table.
///
/// `review_id` is only a trustworthy key within a single harvest attempt;
/// see `duplicate_saturated` for the invalidation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub book_id: String,
    pub review_url: String,
    pub review_id: String,
    pub date: String,
    /// 1 through 5, or `None` when the reviewer left no star rating.
    pub rating: Option<u8>,
    /// Profile link of the reviewer.
    pub user: String,
    /// Expanded long-form text when present, display text otherwise.
    pub text: String,
    pub num_likes: u32,
    /// Reviewer shelf tags, in page order.
    pub shelves: Vec<String>,
}
