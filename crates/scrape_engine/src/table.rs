use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use scrape_core::{
    BookRecord, NamedCount, RatingDistribution, ReviewRecord, BOOK_COLUMNS, RATING_BUCKETS,
    REVIEW_COLUMNS,
};

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sequence builder for the book table: rows accumulate in memory and are
/// finalized exactly once per run.
#[derive(Debug, Default)]
pub struct BookTable {
    rows: Vec<BookRecord>,
}

impl BookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: BookRecord) {
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the delimited extract with a header row, atomically.
    pub fn finalize(self, dir: &Path, filename: &str) -> Result<PathBuf, SinkError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(BOOK_COLUMNS)?;
        for record in &self.rows {
            writer.write_record([
                record.book_id.clone(),
                record.isbn.clone(),
                opt_cell(record.year_first_published),
                record.title.clone(),
                record.author.clone(),
                opt_cell(record.num_pages),
                json_array(&record.genres),
                json_counts(&record.shelves),
                json_counts(&record.lists),
                opt_cell(record.num_ratings),
                opt_cell(record.num_reviews),
                opt_cell(record.average_rating),
                json_distribution(&record.rating_distribution),
                record.book_img.clone().unwrap_or_default(),
            ])?;
        }
        persist_csv(writer, dir, filename)
    }
}

/// Sequence builder for the review table. Batches append per accepted
/// attempt; a discarded attempt never reaches the table.
#[derive(Debug, Default)]
pub struct ReviewTable {
    rows: Vec<ReviewRecord>,
}

impl ReviewTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, batch: Vec<ReviewRecord>) {
        self.rows.extend(batch);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn finalize(self, dir: &Path, filename: &str) -> Result<PathBuf, SinkError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(REVIEW_COLUMNS)?;
        for record in &self.rows {
            writer.write_record([
                record.book_id.clone(),
                record.review_url.clone(),
                record.review_id.clone(),
                record.date.clone(),
                opt_cell(record.rating),
                record.user.clone(),
                record.text.clone(),
                record.num_likes.to_string(),
                json_array(&record.shelves),
            ])?;
        }
        persist_csv(writer, dir, filename)
    }
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn json_array(items: &[String]) -> String {
    Value::from(items.to_vec()).to_string()
}

/// Insertion order matters here: the cells mirror page order, which is why
/// serde_json's preserve_order feature is on.
fn json_counts(counts: &[NamedCount]) -> String {
    let mut map = Map::new();
    for entry in counts {
        map.insert(entry.name.clone(), Value::from(entry.count));
    }
    Value::Object(map).to_string()
}

fn json_distribution(distribution: &RatingDistribution) -> String {
    let mut map = Map::new();
    for (bucket, count) in RATING_BUCKETS.iter().zip(distribution.0) {
        map.insert((*bucket).to_string(), Value::from(count));
    }
    Value::Object(map).to_string()
}

fn persist_csv(writer: csv::Writer<Vec<u8>>, dir: &Path, filename: &str) -> Result<PathBuf, SinkError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| SinkError::Io(std::io::Error::other(err.to_string())))?;
    let content = String::from_utf8(bytes)
        .map_err(|err| SinkError::Io(std::io::Error::other(err.to_string())))?;
    Ok(AtomicFileWriter::new(dir.to_path_buf()).write(filename, &content)?)
}
