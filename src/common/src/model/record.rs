use std::fmt;

use serde::{Deserialize, Serialize};

/// One account of the identity directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Federated identity id, or the username for unfederated accounts
    pub login_key: String,
    pub date_created: String,
    /// Last-modified date of the account, used as an approximation of the last login
    pub last_login: String,
}

impl IdentityRecord {
    pub fn new(
        login_key: impl Into<String>,
        date_created: impl Into<String>,
        last_login: impl Into<String>,
    ) -> Self {
        Self {
            login_key: login_key.into(),
            date_created: date_created.into(),
            last_login: last_login.into(),
        }
    }
}

/// Phone auto-accept setting of a contact-center account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoAccept {
    Enabled,
    Disabled,
    /// The account has no phone configuration
    #[default]
    NotApplicable,
}

impl AutoAccept {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoAccept::Enabled => "True",
            AutoAccept::Disabled => "False",
            AutoAccept::NotApplicable => "N/A",
        }
    }
}

impl From<Option<bool>> for AutoAccept {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => AutoAccept::Enabled,
            Some(false) => AutoAccept::Disabled,
            None => AutoAccept::NotApplicable,
        }
    }
}

impl fmt::Display for AutoAccept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an account was selected for deletion, one variant per rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeletionReason {
    /// Rule 1: contact account without identity, past the grace period
    OrphanedStale,
    /// Rule 2: training account whose identity has been inactive
    TrainingAccountInactive,
    /// Rule 3: identity inactive for the long inactivity window
    IdentityInactive,
}

impl DeletionReason {
    /// Numeric code written to the report.
    pub fn code(&self) -> u8 {
        match self {
            DeletionReason::OrphanedStale => 1,
            DeletionReason::TrainingAccountInactive => 2,
            DeletionReason::IdentityInactive => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionReason::OrphanedStale => "ORPHANED_STALE",
            DeletionReason::TrainingAccountInactive => "TRAINING_ACCOUNT_INACTIVE",
            DeletionReason::IdentityInactive => "IDENTITY_INACTIVE",
        }
    }
}

impl fmt::Display for DeletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One agent account of the contact-center directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Account username, joined against `IdentityRecord::login_key`
    pub login_key: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_created: String,
    pub routing_profile_name: Option<String>,
    /// `None` when the account carries no security profile ids; names whose
    /// ids did not resolve are left out
    pub security_profile_names: Option<Vec<String>>,
    pub hierarchy_group_name: Option<String>,
    pub auto_accept: AutoAccept,
    /// Set only on records selected for deletion
    pub delete_reason: Option<DeletionReason>,
}

impl ContactRecord {
    pub fn new(login_key: impl Into<String>, date_created: impl Into<String>) -> Self {
        Self {
            login_key: login_key.into(),
            date_created: date_created.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = Some(first_name.to_string());
        self.last_name = Some(last_name.to_string());
        self
    }

    pub fn with_routing_profile(mut self, name: &str) -> Self {
        self.routing_profile_name = Some(name.to_string());
        self
    }

    pub fn with_security_profiles<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.security_profile_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_hierarchy_group(mut self, name: &str) -> Self {
        self.hierarchy_group_name = Some(name.to_string());
        self
    }

    pub fn with_auto_accept(mut self, auto_accept: AutoAccept) -> Self {
        self.auto_accept = auto_accept;
        self
    }

    /// Security profile names joined for display, `None` when the account has none.
    ///
    /// An account whose ids all failed to resolve displays as an empty string.
    pub fn security_profiles_display(&self) -> Option<String> {
        self.security_profile_names
            .as_ref()
            .map(|names| names.join(", "))
    }

    /// A copy of this record tagged with `reason`.
    pub fn annotated(&self, reason: DeletionReason) -> Self {
        Self {
            delete_reason: Some(reason),
            ..self.clone()
        }
    }
}
