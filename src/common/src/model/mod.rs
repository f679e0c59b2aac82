//! Normalized directory snapshots.
//!
//! Both directories are reduced to records keyed by a shared login key so
//! they can be joined without further lookups. Dates are kept as the
//! `YYYY-MM-DD` text the directories export; they are only interpreted when a
//! rule needs their age.

mod exceptions;
mod record;
mod snapshot;

pub use exceptions::ExceptionList;
pub use record::{AutoAccept, ContactRecord, DeletionReason, IdentityRecord};
pub use snapshot::{ContactSnapshot, DeletionMap, IdentitySnapshot, Keyed, Snapshot};

/// Date format used by every record date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
