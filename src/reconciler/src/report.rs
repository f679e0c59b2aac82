//! CSV report of the final deletion list.

use std::sync::Arc;

use chrono::NaiveDate;
use common::config::ReportConfig;
use common::model::{ContactRecord, DATE_FORMAT, DeletionMap};
use object_store::{ObjectStore, PutPayload, path::Path as ObjectPath};
use thiserror::Error;

pub const REPORT_HEADERS: [&str; 8] = [
    "LoginID",
    "First Name",
    "Last Name",
    "Security Profile",
    "Routing Profile",
    "Hierarchy",
    "AutoAccept",
    "Delete Reason",
];

/// Cell value for a field the contact directory did not provide
pub const NOT_APPLICABLE: &str = "N/A";

const REPORT_SUFFIX: &str = "_deleted_agents.csv";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write report to {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: object_store::Error,
    },
}

fn or_not_applicable(value: Option<&str>) -> String {
    value.unwrap_or(NOT_APPLICABLE).to_string()
}

fn report_row(record: &ContactRecord) -> [String; 8] {
    [
        record.login_key.clone(),
        or_not_applicable(record.first_name.as_deref()),
        or_not_applicable(record.last_name.as_deref()),
        or_not_applicable(record.security_profiles_display().as_deref()),
        or_not_applicable(record.routing_profile_name.as_deref()),
        or_not_applicable(record.hierarchy_group_name.as_deref()),
        record.auto_accept.as_str().to_string(),
        record
            .delete_reason
            .map(|reason| reason.code().to_string())
            .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
    ]
}

/// Encode the deletion list as CSV, one row per entry in map order.
pub fn render_csv(candidates: &DeletionMap) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_HEADERS)?;
    for record in candidates.values() {
        writer.write_record(report_row(record))?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::Csv(e.into_error().into()))
}

/// Object path of the report for `date`, e.g. `logs/2024-07-01_deleted_agents.csv`.
pub fn report_path(prefix: &str, date: NaiveDate) -> ObjectPath {
    let file_name = format!("{}{REPORT_SUFFIX}", date.format(DATE_FORMAT));
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        ObjectPath::from(file_name)
    } else {
        ObjectPath::from(format!("{prefix}/{file_name}"))
    }
}

/// Writes deletion reports to an object store.
#[derive(Clone, Debug)]
pub struct ReportEmitter {
    object_store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl ReportEmitter {
    pub fn new(object_store: Arc<dyn ObjectStore>, config: &ReportConfig) -> Self {
        Self {
            object_store,
            prefix: config.prefix.clone(),
        }
    }

    /// Upload the report for `date`, overwriting any earlier report that day.
    ///
    /// Returns `None` without writing anything when there are no candidates.
    pub async fn emit(
        &self,
        candidates: &DeletionMap,
        date: NaiveDate,
    ) -> Result<Option<ObjectPath>, ReportError> {
        if candidates.is_empty() {
            tracing::info!(date = %date, "No accounts flagged, skipping report");
            return Ok(None);
        }

        let body = render_csv(candidates)?;
        let path = report_path(&self.prefix, date);
        let size = body.len();

        self.object_store
            .put(&path, PutPayload::from(body))
            .await
            .map_err(|source| ReportError::Storage {
                path: path.to_string(),
                source,
            })?;

        tracing::info!(
            path = %path,
            rows = candidates.len(),
            bytes = size,
            "Wrote deletion report"
        );
        Ok(Some(path))
    }
}
