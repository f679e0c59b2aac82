//! Directory exports stored as paginated JSON documents.
//!
//! Layout under the configured prefixes:
//!
//! ```text
//! identity/page-0.json      {"Users": [...], "PaginationToken": "page-1"}
//! identity/page-1.json      {"Users": [...]}
//! contact/reference.json    {"RoutingProfiles": [...], "SecurityProfiles": [...],
//!                            "HierarchyGroups": [...]}
//! contact/page-0.json       {"Users": [...], "NextToken": "page-1"}
//! ```
//!
//! A page token is the file stem of the next page.

use std::sync::Arc;

use async_trait::async_trait;
use object_store::ObjectStore;
use object_store::path::Path as ObjectPath;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::contact::{RawContactUser, ReferenceCatalog, normalize_contact_user};
use super::identity::{RawIdentityUser, normalize_identity_user};
use super::{
    ContactDirectory, DirectoryError, DirectoryResult, IdentityDirectory, Page, PagedSource,
    collect_all,
};
use crate::config::DirectoryConfig;
use crate::model::{ContactRecord, IdentityRecord};

/// Token of the first page of every export.
pub const FIRST_PAGE_TOKEN: &str = "page-0";

/// File name of the contact-center reference catalog.
pub const REFERENCE_CATALOG_FILE: &str = "reference.json";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityExportPage {
    pub users: Vec<RawIdentityUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactExportPage {
    pub users: Vec<RawContactUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Identity and contact-center directories backed by exports in object storage.
pub struct ExportDirectory {
    object_store: Arc<dyn ObjectStore>,
    identity_prefix: String,
    contact_prefix: String,
}

impl ExportDirectory {
    pub fn new(object_store: Arc<dyn ObjectStore>, config: &DirectoryConfig) -> Self {
        Self {
            object_store,
            identity_prefix: config.identity_prefix.clone(),
            contact_prefix: config.contact_prefix.clone(),
        }
    }

    fn page_path(prefix: &str, token: Option<&str>) -> ObjectPath {
        let token = token.unwrap_or(FIRST_PAGE_TOKEN);
        ObjectPath::from(format!("{prefix}/{token}.json"))
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &ObjectPath) -> DirectoryResult<T> {
        let result = match self.object_store.get(path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(DirectoryError::MissingPage {
                    path: path.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let bytes = result.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|source| DirectoryError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Load the routing profile, security profile and hierarchy group tables.
    pub async fn reference_catalog(&self) -> DirectoryResult<ReferenceCatalog> {
        let path = ObjectPath::from(format!("{}/{REFERENCE_CATALOG_FILE}", self.contact_prefix));
        self.read_json(&path).await
    }

    fn identity_pages(&self) -> IdentityPages<'_> {
        IdentityPages { directory: self }
    }

    fn contact_pages(&self) -> ContactPages<'_> {
        ContactPages { directory: self }
    }
}

struct IdentityPages<'a> {
    directory: &'a ExportDirectory,
}

#[async_trait]
impl PagedSource<RawIdentityUser> for IdentityPages<'_> {
    async fn fetch_page(&self, token: Option<&str>) -> DirectoryResult<Page<RawIdentityUser>> {
        let path = ExportDirectory::page_path(&self.directory.identity_prefix, token);
        let page: IdentityExportPage = self.directory.read_json(&path).await?;
        Ok(Page {
            items: page.users,
            next_token: page.pagination_token,
        })
    }
}

struct ContactPages<'a> {
    directory: &'a ExportDirectory,
}

#[async_trait]
impl PagedSource<RawContactUser> for ContactPages<'_> {
    async fn fetch_page(&self, token: Option<&str>) -> DirectoryResult<Page<RawContactUser>> {
        let path = ExportDirectory::page_path(&self.directory.contact_prefix, token);
        let page: ContactExportPage = self.directory.read_json(&path).await?;
        Ok(Page {
            items: page.users,
            next_token: page.next_token,
        })
    }
}

#[async_trait]
impl IdentityDirectory for ExportDirectory {
    async fn fetch_identity_snapshot(&self) -> DirectoryResult<Vec<IdentityRecord>> {
        let users = collect_all(&self.identity_pages()).await?;
        let listed = users.len();
        let records: Vec<_> = users
            .into_iter()
            .filter_map(normalize_identity_user)
            .collect();

        tracing::info!(
            prefix = %self.identity_prefix,
            listed,
            keyed = records.len(),
            "Fetched identity directory export"
        );
        Ok(records)
    }
}

#[async_trait]
impl ContactDirectory for ExportDirectory {
    async fn fetch_contact_snapshot(&self) -> DirectoryResult<Vec<ContactRecord>> {
        let catalog = self.reference_catalog().await?;
        let users = collect_all(&self.contact_pages()).await?;
        let listed = users.len();
        let records: Vec<_> = users
            .into_iter()
            .filter_map(|user| normalize_contact_user(user, &catalog))
            .collect();

        tracing::info!(
            prefix = %self.contact_prefix,
            listed,
            keyed = records.len(),
            "Fetched contact-center directory export"
        );
        Ok(records)
    }
}
