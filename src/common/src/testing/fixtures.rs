//! Record fixtures.

use chrono::NaiveDate;

use crate::model::{ContactRecord, DATE_FORMAT, IdentityRecord};

/// Identity record whose creation date equals its last login.
pub fn identity(login_key: &str, last_login: &str) -> IdentityRecord {
    IdentityRecord::new(login_key, last_login, last_login)
}

/// Contact record with only a key and a creation date.
pub fn contact(login_key: &str, date_created: &str) -> ContactRecord {
    ContactRecord::new(login_key, date_created)
}

/// Parse a `YYYY-MM-DD` literal.
///
/// # Panics
///
/// Panics on a malformed literal.
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .unwrap_or_else(|e| panic!("invalid test date '{value}': {e}"))
}
