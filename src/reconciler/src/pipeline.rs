//! One sweep: fetch both directories, reconcile, write the report.

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use common::config::Configuration;
use common::directory::{ContactDirectory, DirectoryError, ExportDirectory, IdentityDirectory};
use common::model::{ContactSnapshot, DeletionMap, ExceptionList, IdentitySnapshot};
use common::storage::{create_object_store, create_object_store_from_dsn};
use object_store::path::Path as ObjectPath;
use thiserror::Error;

use crate::engine::{ReconciliationSummary, Reconciler};
use crate::error::ReconcileError;
use crate::report::{ReportEmitter, ReportError};

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Clone, Debug)]
pub struct SweepOutcome {
    pub summary: ReconciliationSummary,
    pub candidates: DeletionMap,
    /// Where the report was written; `None` on dry runs and empty results
    pub report_path: Option<ObjectPath>,
}

pub struct Sweep {
    identity: Arc<dyn IdentityDirectory>,
    contact: Arc<dyn ContactDirectory>,
    reconciler: Reconciler,
    exceptions: ExceptionList,
    emitter: ReportEmitter,
}

impl Sweep {
    pub fn new(
        identity: Arc<dyn IdentityDirectory>,
        contact: Arc<dyn ContactDirectory>,
        reconciler: Reconciler,
        exceptions: ExceptionList,
        emitter: ReportEmitter,
    ) -> Self {
        Self {
            identity,
            contact,
            reconciler,
            exceptions,
            emitter,
        }
    }

    /// Wire a sweep from configuration.
    ///
    /// Exports are read from the directory DSN, which shares the report store
    /// unless configured separately.
    pub fn from_config(config: &Configuration) -> anyhow::Result<Self> {
        let report_store =
            create_object_store(&config.storage).context("Failed to open report storage")?;
        let export_store = match config.directory.dsn.as_deref() {
            Some(dsn) if dsn != config.storage.dsn => create_object_store_from_dsn(dsn)
                .context("Failed to open directory export storage")?,
            _ => report_store.clone(),
        };

        let directory = Arc::new(ExportDirectory::new(export_store, &config.directory));
        let reconciler = Reconciler::new(config.rules.clone())?;
        let emitter = ReportEmitter::new(report_store, &config.report);

        Ok(Self::new(
            directory.clone(),
            directory,
            reconciler,
            config.exceptions.clone(),
            emitter,
        ))
    }

    /// Fetch complete listings of both directories concurrently.
    pub async fn fetch_snapshots(
        &self,
    ) -> Result<(IdentitySnapshot, ContactSnapshot), DirectoryError> {
        let (identities, contacts) = tokio::try_join!(
            self.identity.fetch_identity_snapshot(),
            self.contact.fetch_contact_snapshot()
        )?;
        Ok((
            IdentitySnapshot::from_records(identities),
            ContactSnapshot::from_records(contacts),
        ))
    }

    /// Run a full sweep as of `reference`.
    ///
    /// On a dry run the candidates are logged and no report is written.
    pub async fn run(
        &self,
        reference: NaiveDate,
        dry_run: bool,
    ) -> Result<SweepOutcome, SweepError> {
        let (identity, contact) = self.fetch_snapshots().await?;
        tracing::info!(
            identity_accounts = identity.len(),
            contact_accounts = contact.len(),
            "Fetched directory snapshots"
        );

        let outcome = self
            .reconciler
            .reconcile(&identity, &contact, reference, &self.exceptions)?;
        outcome.summary.log();

        let report_path = if dry_run {
            for record in outcome.candidates.values() {
                tracing::info!(
                    login_key = %record.login_key,
                    reason = ?record.delete_reason,
                    "Dry run: would flag account"
                );
            }
            None
        } else {
            self.emitter.emit(&outcome.candidates, reference).await?
        };

        Ok(SweepOutcome {
            summary: outcome.summary,
            candidates: outcome.candidates,
            report_path,
        })
    }
}
