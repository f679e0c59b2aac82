//! Whole-day ages of record dates.

use chrono::NaiveDate;
use common::model::DATE_FORMAT;
use thiserror::Error;

use crate::error::{DateField, ReconcileError};

/// A record date that is missing or not a `YYYY-MM-DD` calendar date.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid calendar date '{value}', expected YYYY-MM-DD")]
pub struct InvalidDateFormat {
    pub value: String,
}

/// Whole days elapsed from `date` to `reference`.
///
/// Negative when `date` lies after `reference`.
pub fn age_in_days(date: &str, reference: NaiveDate) -> Result<i64, InvalidDateFormat> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| InvalidDateFormat {
        value: date.to_string(),
    })?;
    Ok(reference.signed_duration_since(date).num_days())
}

/// Age evaluation pinned to one reference date for a whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgeEvaluator {
    reference: NaiveDate,
}

impl AgeEvaluator {
    pub fn new(reference: NaiveDate) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// Age of one date of a record, with the record attached to any error.
    pub fn days_since(
        &self,
        login_key: &str,
        field: DateField,
        date: &str,
    ) -> Result<i64, ReconcileError> {
        age_in_days(date, self.reference).map_err(|source| ReconcileError::InvalidDateFormat {
            login_key: login_key.to_string(),
            field,
            source,
        })
    }
}
