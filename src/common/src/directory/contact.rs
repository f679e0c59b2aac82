//! Contact-center users and their reference lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AutoAccept, ContactRecord, DATE_FORMAT};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityInfo {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhoneConfig {
    pub auto_accept: bool,
}

/// A user as described by the contact-center directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawContactUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    pub last_modified_time: DateTime<Utc>,
    #[serde(default)]
    pub routing_profile_id: Option<String>,
    #[serde(default)]
    pub identity_info: Option<IdentityInfo>,
    #[serde(default)]
    pub security_profile_ids: Vec<String>,
    #[serde(default)]
    pub hierarchy_group_id: Option<String>,
    #[serde(default)]
    pub phone_config: Option<PhoneConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferenceEntry {
    pub id: String,
    pub name: String,
}

impl ReferenceEntry {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Id to name tables for the objects a contact-center user points at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferenceCatalog {
    #[serde(default)]
    pub routing_profiles: Vec<ReferenceEntry>,
    #[serde(default)]
    pub security_profiles: Vec<ReferenceEntry>,
    #[serde(default)]
    pub hierarchy_groups: Vec<ReferenceEntry>,
}

fn lookup<'a>(entries: &'a [ReferenceEntry], id: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.name.as_str())
}

impl ReferenceCatalog {
    pub fn routing_profile(&self, id: &str) -> Option<&str> {
        lookup(&self.routing_profiles, id)
    }

    pub fn security_profile(&self, id: &str) -> Option<&str> {
        lookup(&self.security_profiles, id)
    }

    pub fn hierarchy_group(&self, id: &str) -> Option<&str> {
        lookup(&self.hierarchy_groups, id)
    }
}

/// Normalize a described user, resolving its references through `catalog`.
///
/// Unknown reference ids resolve to nothing; unknown security profiles are
/// dropped from the list. Users without a username are skipped.
pub fn normalize_contact_user(
    user: RawContactUser,
    catalog: &ReferenceCatalog,
) -> Option<ContactRecord> {
    let Some(login_key) = user.username.filter(|name| !name.is_empty()) else {
        tracing::debug!(user_id = %user.id, "Skipping contact user without username");
        return None;
    };

    let routing_profile_name = user.routing_profile_id.as_deref().and_then(|id| {
        let name = catalog.routing_profile(id);
        if name.is_none() {
            tracing::warn!(
                user_id = %user.id,
                routing_profile_id = %id,
                "Routing profile not found"
            );
        }
        name.map(str::to_string)
    });

    let security_profile_names = (!user.security_profile_ids.is_empty()).then(|| {
        user.security_profile_ids
            .iter()
            .filter_map(|id| catalog.security_profile(id))
            .map(str::to_string)
            .collect()
    });

    let hierarchy_group_name = user
        .hierarchy_group_id
        .as_deref()
        .and_then(|id| catalog.hierarchy_group(id))
        .map(str::to_string);

    let IdentityInfo {
        first_name,
        last_name,
    } = user.identity_info.unwrap_or_default();

    Some(ContactRecord {
        login_key,
        first_name,
        last_name,
        date_created: user.last_modified_time.format(DATE_FORMAT).to_string(),
        routing_profile_name,
        security_profile_names,
        hierarchy_group_name,
        auto_accept: AutoAccept::from(user.phone_config.map(|config| config.auto_accept)),
        delete_reason: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn catalog() -> ReferenceCatalog {
        ReferenceCatalog {
            routing_profiles: vec![
                ReferenceEntry::new("rp-1", "Basic Routing"),
                ReferenceEntry::new("rp-2", "NHT-Training"),
            ],
            security_profiles: vec![
                ReferenceEntry::new("sp-1", "Agent"),
                ReferenceEntry::new("sp-2", "CallCenterManager"),
            ],
            hierarchy_groups: vec![ReferenceEntry::new("hg-1", "Tier 1")],
        }
    }

    fn user(username: Option<&str>) -> RawContactUser {
        RawContactUser {
            id: "6b8a2f4e".to_string(),
            username: username.map(str::to_string),
            last_modified_time: Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap(),
            routing_profile_id: None,
            identity_info: None,
            security_profile_ids: vec![],
            hierarchy_group_id: None,
            phone_config: None,
        }
    }

    #[test]
    fn test_fully_described_user() {
        let raw = RawContactUser {
            routing_profile_id: Some("rp-2".to_string()),
            identity_info: Some(IdentityInfo {
                first_name: Some("Bob".to_string()),
                last_name: Some("Builder".to_string()),
            }),
            security_profile_ids: vec!["sp-2".to_string(), "sp-1".to_string()],
            hierarchy_group_id: Some("hg-1".to_string()),
            phone_config: Some(PhoneConfig { auto_accept: true }),
            ..user(Some("bob"))
        };

        let record = normalize_contact_user(raw, &catalog()).unwrap();

        assert_eq!(record.login_key, "bob");
        assert_eq!(record.first_name.as_deref(), Some("Bob"));
        assert_eq!(record.last_name.as_deref(), Some("Builder"));
        assert_eq!(record.date_created, "2024-04-01");
        assert_eq!(record.routing_profile_name.as_deref(), Some("NHT-Training"));
        assert_eq!(
            record.security_profile_names,
            Some(vec!["CallCenterManager".to_string(), "Agent".to_string()])
        );
        assert_eq!(record.hierarchy_group_name.as_deref(), Some("Tier 1"));
        assert_eq!(record.auto_accept, AutoAccept::Enabled);
        assert_eq!(record.delete_reason, None);
    }

    #[test]
    fn test_sparse_user_has_absent_fields() {
        let record = normalize_contact_user(user(Some("alice")), &catalog()).unwrap();

        assert_eq!(record.first_name, None);
        assert_eq!(record.routing_profile_name, None);
        assert_eq!(record.security_profile_names, None);
        assert_eq!(record.hierarchy_group_name, None);
        assert_eq!(record.auto_accept, AutoAccept::NotApplicable);
    }

    #[test]
    fn test_unknown_references_resolve_to_nothing() {
        let raw = RawContactUser {
            routing_profile_id: Some("rp-missing".to_string()),
            security_profile_ids: vec!["sp-missing".to_string(), "sp-1".to_string()],
            hierarchy_group_id: Some("hg-missing".to_string()),
            ..user(Some("carol"))
        };

        let record = normalize_contact_user(raw, &catalog()).unwrap();
        assert_eq!(record.routing_profile_name, None);
        assert_eq!(record.security_profile_names, Some(vec!["Agent".to_string()]));
        assert_eq!(record.hierarchy_group_name, None);
    }

    #[test]
    fn test_unresolved_security_profiles_are_kept_empty() {
        let raw = RawContactUser {
            security_profile_ids: vec!["sp-missing".to_string()],
            ..user(Some("dave"))
        };

        let record = normalize_contact_user(raw, &catalog()).unwrap();
        assert_eq!(record.security_profile_names, Some(vec![]));
        assert_eq!(record.security_profiles_display().as_deref(), Some(""));
    }

    #[test]
    fn test_user_without_username_is_skipped() {
        assert!(normalize_contact_user(user(None), &catalog()).is_none());
        assert!(normalize_contact_user(user(Some("")), &catalog()).is_none());
    }
}
