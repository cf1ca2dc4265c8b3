use crate::NamedCount;

/// Parses one shelves/lists row of the form `<name...> <count> <suffix>`,
/// e.g. "to read 1,024 people" or "Best Historical Fiction 2,341 books".
///
/// The count is the second-to-last whitespace-delimited token with grouping
/// separators stripped; the name is every token before it. Rows that do not
/// fit the shape are dropped by the caller.
pub fn parse_name_count_row(row: &str) -> Option<NamedCount> {
    let tokens: Vec<&str> = row.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }
    let count_token = tokens[tokens.len() - 2];
    let count: i64 = count_token.replace(',', "").parse().ok()?;
    let name = tokens[..tokens.len() - 2].join(" ");
    if name.is_empty() {
        return None;
    }
    Some(NamedCount::new(name, count))
}
