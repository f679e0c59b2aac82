use std::fmt;

use thiserror::Error;

use crate::age::InvalidDateFormat;

/// Record date a rule evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateField {
    ContactCreated,
    IdentityLastLogin,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::ContactCreated => f.write_str("contact creation date"),
            DateField::IdentityLastLogin => f.write_str("identity last login"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A record date could not be read. Fatal to the run.
    #[error("Invalid {field} for '{login_key}': {source}")]
    InvalidDateFormat {
        login_key: String,
        field: DateField,
        #[source]
        source: InvalidDateFormat,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
