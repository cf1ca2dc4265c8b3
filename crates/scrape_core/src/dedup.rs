use std::collections::HashMap;

use crate::ReviewRecord;

/// Number of recurring review ids that invalidates a harvest attempt.
///
/// The rendered review pager sometimes serves the same page twice; a handful
/// of repeats is tolerable, saturation means the attempt is stale.
pub const DUPLICATE_SATURATION_THRESHOLD: usize = 30;

/// True when at least [`DUPLICATE_SATURATION_THRESHOLD`] distinct review_id
/// values occur more than once across the attempt.
pub fn duplicate_saturated(reviews: &[ReviewRecord]) -> bool {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for review in reviews {
        *counts.entry(review.review_id.as_str()).or_insert(0) += 1;
    }
    let recurring = counts.values().filter(|&&count| count > 1).count();
    recurring >= DUPLICATE_SATURATION_THRESHOLD
}
