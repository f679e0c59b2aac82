use indexmap::IndexMap;
use indexmap::map::Entry;

use super::record::{ContactRecord, IdentityRecord};

/// Deletion candidates keyed by login key, in insertion order.
pub type DeletionMap = IndexMap<String, ContactRecord>;

/// Records that carry the cross-directory join key.
pub trait Keyed {
    fn login_key(&self) -> &str;
}

impl Keyed for IdentityRecord {
    fn login_key(&self) -> &str {
        &self.login_key
    }
}

impl Keyed for ContactRecord {
    fn login_key(&self) -> &str {
        &self.login_key
    }
}

/// Insertion-ordered records of one directory, unique by login key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<R> {
    records: IndexMap<String, R>,
}

pub type IdentitySnapshot = Snapshot<IdentityRecord>;
pub type ContactSnapshot = Snapshot<ContactRecord>;

impl<R> Default for Snapshot<R> {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }
}

impl<R: Keyed> Snapshot<R> {
    /// Build a snapshot from a directory listing.
    ///
    /// A repeated login key replaces the earlier record in place.
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        let mut snapshot = Self::default();
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    pub fn insert(&mut self, record: R) {
        match self.records.entry(record.login_key().to_string()) {
            Entry::Occupied(mut entry) => {
                tracing::warn!(
                    login_key = %entry.key(),
                    "Duplicate login key in directory snapshot, keeping the later record"
                );
                entry.insert(record);
            }
            Entry::Vacant(entry) => {
                entry.insert(record);
            }
        }
    }

    pub fn get(&self, login_key: &str) -> Option<&R> {
        self.records.get(login_key)
    }

    pub fn contains_key(&self, login_key: &str) -> bool {
        self.records.contains_key(login_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Keyed> FromIterator<R> for Snapshot<R> {
    fn from_iter<T: IntoIterator<Item = R>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_preserves_listing_order() {
        let snapshot: ContactSnapshot = ["carol", "alice", "bob"]
            .into_iter()
            .map(|key| ContactRecord::new(key, "2024-01-01"))
            .collect();

        assert_eq!(
            snapshot.keys().collect::<Vec<_>>(),
            vec!["carol", "alice", "bob"]
        );
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.contains_key("alice"));
        assert!(!snapshot.contains_key("dave"));
    }

    #[test]
    fn test_duplicate_key_keeps_later_record_in_place() {
        let snapshot = IdentitySnapshot::from_records([
            IdentityRecord::new("alice", "2023-01-01", "2023-02-01"),
            IdentityRecord::new("bob", "2023-01-01", "2023-02-01"),
            IdentityRecord::new("alice", "2023-01-01", "2024-06-01"),
        ]);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["alice", "bob"]);
        assert_eq!(snapshot.get("alice").unwrap().last_login, "2024-06-01");
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = IdentitySnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.get("anyone").is_none());
    }
}
