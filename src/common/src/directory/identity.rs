//! Identity directory users and login key resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DATE_FORMAT, IdentityRecord};

/// Attribute holding the federated identities of a user, as a JSON array.
pub const IDENTITIES_ATTRIBUTE: &str = "identities";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserAttribute {
    pub name: String,
    pub value: String,
}

/// A user as listed by the identity directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawIdentityUser {
    pub username: String,
    pub user_create_date: DateTime<Utc>,
    pub user_last_modified_date: DateTime<Utc>,
    #[serde(default)]
    pub attributes: Vec<UserAttribute>,
}

#[derive(Deserialize)]
struct FederatedIdentity {
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
}

/// Resolve the key a user is joined on.
///
/// Federated users are keyed by the `userId` of their first linked identity,
/// everyone else by username. `None` means the user cannot be keyed: the
/// identities attribute is malformed, empty, or lacks a `userId`.
pub fn resolve_login_key(user: &RawIdentityUser) -> Option<String> {
    let Some(attribute) = user
        .attributes
        .iter()
        .find(|attribute| attribute.name == IDENTITIES_ATTRIBUTE)
    else {
        return Some(user.username.clone());
    };

    match serde_json::from_str::<Vec<FederatedIdentity>>(&attribute.value) {
        Ok(identities) => identities
            .into_iter()
            .next()
            .and_then(|identity| identity.user_id)
            .filter(|user_id| !user_id.is_empty()),
        Err(e) => {
            tracing::warn!(
                username = %user.username,
                error = %e,
                "Failed to parse identities attribute"
            );
            None
        }
    }
}

/// Normalize a listed user, dropping users that cannot be keyed.
pub fn normalize_identity_user(user: RawIdentityUser) -> Option<IdentityRecord> {
    let Some(login_key) = resolve_login_key(&user) else {
        tracing::debug!(username = %user.username, "Skipping identity user without login key");
        return None;
    };

    Some(IdentityRecord {
        login_key,
        date_created: user.user_create_date.format(DATE_FORMAT).to_string(),
        last_login: user.user_last_modified_date.format(DATE_FORMAT).to_string(),
    })
}
