//! Merging rule results into the final deletion list.

use common::model::{DeletionMap, ExceptionList};

/// Union rule results in the given order.
///
/// A key that recurs takes the later result's record (and reason) but keeps
/// the position where it first appeared.
pub fn union<I>(rule_results: I) -> DeletionMap
where
    I: IntoIterator<Item = DeletionMap>,
{
    let mut merged = DeletionMap::new();
    for result in rule_results {
        for (login_key, record) in result {
            merged.insert(login_key, record);
        }
    }
    merged
}

/// Remove allow-listed keys, returning how many were removed.
pub fn exclude(candidates: &mut DeletionMap, exceptions: &ExceptionList) -> usize {
    let before = candidates.len();
    candidates.retain(|login_key, _| !exceptions.contains(login_key));
    before - candidates.len()
}

/// Union rule results in order, then drop every allow-listed key.
pub fn merge<I>(rule_results: I, exceptions: &ExceptionList) -> DeletionMap
where
    I: IntoIterator<Item = DeletionMap>,
{
    let mut merged = union(rule_results);
    exclude(&mut merged, exceptions);
    merged
}
