use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Login keys that are never reported for deletion.
///
/// Configured either as a comma-separated string (`"svc-admin, break-glass"`)
/// or as a list. Entries are trimmed and blank entries dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawExceptionList", into = "Vec<String>")]
pub struct ExceptionList {
    keys: BTreeSet<String>,
}

/// A scalar entry. Environment providers type `100234` or `true` as
/// numbers and booleans; they are still login keys.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Flag(bool),
}

impl From<RawKey> for String {
    fn from(key: RawKey) -> Self {
        match key {
            RawKey::Text(value) => value,
            RawKey::Signed(value) => value.to_string(),
            RawKey::Unsigned(value) => value.to_string(),
            RawKey::Flag(value) => value.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExceptionList {
    Delimited(RawKey),
    List(Vec<RawKey>),
}

impl From<RawExceptionList> for ExceptionList {
    fn from(raw: RawExceptionList) -> Self {
        match raw {
            RawExceptionList::Delimited(value) => Self::parse(&String::from(value)),
            RawExceptionList::List(values) => values.into_iter().map(String::from).collect(),
        }
    }
}

impl From<ExceptionList> for Vec<String> {
    fn from(list: ExceptionList) -> Self {
        list.keys.into_iter().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExceptionList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let keys = iter
            .into_iter()
            .map(|key| key.as_ref().trim().to_string())
            .filter(|key| !key.is_empty())
            .collect();
        Self { keys }
    }
}

impl ExceptionList {
    /// Parse a comma-separated list of login keys.
    pub fn parse(value: &str) -> Self {
        value.split(',').collect()
    }

    pub fn contains(&self, login_key: &str) -> bool {
        self.keys.contains(login_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
