//! Account reconciliation between an identity directory and a
//! contact-center directory.
//!
//! Three fixed rules select contact-center accounts for deletion:
//!
//! 1. Orphaned accounts (no identity) older than the grace period
//! 2. Training accounts whose identity has been inactive
//! 3. Accounts whose identity has been inactive for the long window
//!
//! Rule results are merged in that order, later rules overwriting the reason
//! of earlier ones, and allow-listed keys are removed. Nothing is ever
//! deleted; the result is written out as a dated CSV report.
//!
//! ## Usage
//!
//! ```no_run
//! use common::config::RulesConfig;
//! use common::model::{ContactSnapshot, ExceptionList, IdentitySnapshot};
//! use reconciler::Reconciler;
//!
//! let reconciler = Reconciler::new(RulesConfig::default())?;
//! let today = chrono::Utc::now().date_naive();
//!
//! let outcome = reconciler.reconcile(
//!     &IdentitySnapshot::default(),
//!     &ContactSnapshot::default(),
//!     today,
//!     &ExceptionList::default(),
//! )?;
//! assert!(outcome.candidates.is_empty());
//! # Ok::<(), reconciler::ReconcileError>(())
//! ```

pub mod age;
pub mod engine;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod rules;

pub use age::{AgeEvaluator, InvalidDateFormat, age_in_days};
pub use engine::{ReconciliationOutcome, ReconciliationSummary, Reconciler};
pub use error::{DateField, ReconcileError};
pub use merge::merge;
pub use pipeline::{Sweep, SweepError, SweepOutcome};
pub use report::{ReportEmitter, ReportError};
pub use rules::Rule;
