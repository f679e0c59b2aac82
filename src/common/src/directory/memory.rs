use async_trait::async_trait;

use super::{ContactDirectory, DirectoryResult, IdentityDirectory};
use crate::model::{ContactRecord, IdentityRecord};

/// Both directories served from prepared record lists.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDirectory {
    identities: Vec<IdentityRecord>,
    contacts: Vec<ContactRecord>,
}

impl InMemoryDirectory {
    pub fn new(identities: Vec<IdentityRecord>, contacts: Vec<ContactRecord>) -> Self {
        Self {
            identities,
            contacts,
        }
    }

    pub fn with_identity(mut self, record: IdentityRecord) -> Self {
        self.identities.push(record);
        self
    }

    pub fn with_contact(mut self, record: ContactRecord) -> Self {
        self.contacts.push(record);
        self
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryDirectory {
    async fn fetch_identity_snapshot(&self) -> DirectoryResult<Vec<IdentityRecord>> {
        Ok(self.identities.clone())
    }
}

#[async_trait]
impl ContactDirectory for InMemoryDirectory {
    async fn fetch_contact_snapshot(&self) -> DirectoryResult<Vec<ContactRecord>> {
        Ok(self.contacts.clone())
    }
}
