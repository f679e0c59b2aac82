//! Directory sources feeding the reconciler.
//!
//! Each directory is listed page by page, normalized into snapshot records,
//! and handed over as a complete listing. Sources never filter by rule; they
//! only drop accounts that cannot be keyed.
//!
//! - `contact`: raw contact-center users, reference catalog and normalization
//! - `identity`: raw identity users and login key resolution
//! - `export`: paginated JSON exports read from object storage
//! - `memory`: prepared record lists

pub mod contact;
pub mod export;
pub mod identity;
pub mod memory;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ContactRecord, IdentityRecord};

pub use contact::{RawContactUser, ReferenceCatalog, normalize_contact_user};
pub use export::ExportDirectory;
pub use identity::{RawIdentityUser, normalize_identity_user, resolve_login_key};
pub use memory::InMemoryDirectory;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Object store error: {0}")]
    Storage(#[from] object_store::Error),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Export page not found: {path}")]
    MissingPage { path: String },

    #[error("Pagination token '{token}' was returned twice")]
    PaginationCycle { token: String },
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// One page of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token of the next page, `None` on the last page
    pub next_token: Option<String>,
}

/// A directory listing split into token-linked pages.
#[async_trait]
pub trait PagedSource<T: Send>: Send + Sync {
    /// Fetch the page for `token`, or the first page when `token` is `None`.
    async fn fetch_page(&self, token: Option<&str>) -> DirectoryResult<Page<T>>;
}

/// Follow pagination tokens until the last page and concatenate all items.
pub async fn collect_all<T, S>(source: &S) -> DirectoryResult<Vec<T>>
where
    T: Send,
    S: PagedSource<T> + ?Sized,
{
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.fetch_page(token.as_deref()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_token {
            Some(next) if !next.is_empty() => {
                if !seen.insert(next.clone()) {
                    return Err(DirectoryError::PaginationCycle { token: next });
                }
                token = Some(next);
            }
            _ => break,
        }
    }

    tracing::debug!(pages, items = items.len(), "Collected paginated listing");
    Ok(items)
}

/// Full listing of the identity directory.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn fetch_identity_snapshot(&self) -> DirectoryResult<Vec<IdentityRecord>>;
}

/// Full listing of the contact-center directory.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn fetch_contact_snapshot(&self) -> DirectoryResult<Vec<ContactRecord>>;
}
