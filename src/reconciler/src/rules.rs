//! The three deletion rules.
//!
//! Each rule reads both snapshots and returns freshly annotated copies of the
//! contact records it selects. Rules never see each other's output; ordering
//! only matters when results are merged.

use std::fmt;

use common::config::RulesConfig;
use common::model::{ContactSnapshot, DeletionMap, DeletionReason, IdentitySnapshot};

use crate::age::AgeEvaluator;
use crate::error::{DateField, ReconcileError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    OrphanedStale,
    TrainingAccountInactive,
    IdentityInactive,
}

impl Rule {
    /// Merge order. Later rules overwrite earlier ones for the same key.
    pub const ORDERED: [Rule; 3] = [
        Rule::OrphanedStale,
        Rule::TrainingAccountInactive,
        Rule::IdentityInactive,
    ];

    pub fn reason(self) -> DeletionReason {
        match self {
            Rule::OrphanedStale => DeletionReason::OrphanedStale,
            Rule::TrainingAccountInactive => DeletionReason::TrainingAccountInactive,
            Rule::IdentityInactive => DeletionReason::IdentityInactive,
        }
    }

    pub fn evaluate(
        self,
        identity: &IdentitySnapshot,
        contact: &ContactSnapshot,
        rules: &RulesConfig,
        ages: &AgeEvaluator,
    ) -> Result<DeletionMap, ReconcileError> {
        match self {
            Rule::OrphanedStale => orphaned_stale(identity, contact, rules, ages),
            Rule::TrainingAccountInactive => {
                inactive_training_accounts(identity, contact, rules, ages)
            }
            Rule::IdentityInactive => inactive_identities(identity, contact, rules, ages),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.reason(), f)
    }
}

/// Rule 1: contact accounts with no identity, older than the orphan grace period.
pub fn orphaned_stale(
    identity: &IdentitySnapshot,
    contact: &ContactSnapshot,
    rules: &RulesConfig,
    ages: &AgeEvaluator,
) -> Result<DeletionMap, ReconcileError> {
    let mut selected = DeletionMap::new();

    for record in contact
        .iter()
        .filter(|record| !identity.contains_key(&record.login_key))
    {
        let age = ages.days_since(
            &record.login_key,
            DateField::ContactCreated,
            &record.date_created,
        )?;
        if age > rules.orphan_grace_days {
            selected.insert(
                record.login_key.clone(),
                record.annotated(DeletionReason::OrphanedStale),
            );
        }
    }

    Ok(selected)
}

/// Rule 2: training accounts past their minimum age whose identity has not
/// logged in recently.
///
/// A record without a routing profile, or without an identity, never matches.
pub fn inactive_training_accounts(
    identity: &IdentitySnapshot,
    contact: &ContactSnapshot,
    rules: &RulesConfig,
    ages: &AgeEvaluator,
) -> Result<DeletionMap, ReconcileError> {
    let marker = rules.training_marker.to_lowercase();
    let mut selected = DeletionMap::new();

    for record in contact.iter() {
        let Some(profile) = record.routing_profile_name.as_deref() else {
            continue;
        };
        if !profile.to_lowercase().contains(&marker) {
            continue;
        }

        let account_age = ages.days_since(
            &record.login_key,
            DateField::ContactCreated,
            &record.date_created,
        )?;
        if account_age <= rules.training_min_account_age_days {
            continue;
        }

        let Some(identity_record) = identity.get(&record.login_key) else {
            continue;
        };
        let inactive_for = ages.days_since(
            &identity_record.login_key,
            DateField::IdentityLastLogin,
            &identity_record.last_login,
        )?;
        if inactive_for > rules.training_inactivity_days {
            selected.insert(
                record.login_key.clone(),
                record.annotated(DeletionReason::TrainingAccountInactive),
            );
        }
    }

    Ok(selected)
}

/// Rule 3: identities inactive past the long window that still own a contact account.
pub fn inactive_identities(
    identity: &IdentitySnapshot,
    contact: &ContactSnapshot,
    rules: &RulesConfig,
    ages: &AgeEvaluator,
) -> Result<DeletionMap, ReconcileError> {
    let mut selected = DeletionMap::new();

    for identity_record in identity.iter() {
        let inactive_for = ages.days_since(
            &identity_record.login_key,
            DateField::IdentityLastLogin,
            &identity_record.last_login,
        )?;
        if inactive_for <= rules.identity_inactivity_days {
            continue;
        }

        if let Some(record) = contact.get(&identity_record.login_key) {
            selected.insert(
                record.login_key.clone(),
                record.annotated(DeletionReason::IdentityInactive),
            );
        }
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::{ContactRecord, IdentityRecord};
    use common::testing::{contact, date, identity};

    fn ages() -> AgeEvaluator {
        AgeEvaluator::new(date("2024-07-01"))
    }

    fn snapshots(
        identities: Vec<IdentityRecord>,
        contacts: Vec<ContactRecord>,
    ) -> (IdentitySnapshot, ContactSnapshot) {
        (
            IdentitySnapshot::from_records(identities),
            ContactSnapshot::from_records(contacts),
        )
    }

    fn keys(map: &DeletionMap) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_orphaned_stale_selects_old_orphans_only() {
        let (ids, contacts) = snapshots(
            vec![identity("known", "2020-01-01")],
            vec![
                contact("alice", "2024-01-01"),
                contact("fresh", "2024-06-01"),
                contact("boundary", "2024-01-03"),
                contact("known", "2019-01-01"),
            ],
        );

        let selected = orphaned_stale(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap();

        assert_eq!(keys(&selected), vec!["alice"]);
        assert_eq!(
            selected["alice"].delete_reason,
            Some(DeletionReason::OrphanedStale)
        );
    }

    #[test]
    fn test_orphaned_stale_exactly_at_grace_period_is_kept() {
        // 2024-01-03 is exactly 180 days before 2024-07-01
        let (ids, contacts) = snapshots(vec![], vec![contact("edge", "2024-01-03")]);
        let selected = orphaned_stale(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_training_account_requires_every_condition() {
        let (ids, contacts) = snapshots(
            vec![
                identity("bob", "2024-05-01"),
                identity("recent", "2024-06-20"),
                identity("young", "2024-01-01"),
                identity("sales", "2024-01-01"),
            ],
            vec![
                contact("bob", "2024-04-01").with_routing_profile("NHT-Training"),
                contact("recent", "2024-04-01").with_routing_profile("nht wave 3"),
                contact("young", "2024-06-01").with_routing_profile("NHT-Training"),
                contact("sales", "2024-01-01").with_routing_profile("Sales"),
                contact("ghost", "2024-01-01").with_routing_profile("NHT-Training"),
                contact("unrouted", "2024-01-01"),
            ],
        );

        let selected =
            inactive_training_accounts(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap();

        assert_eq!(keys(&selected), vec!["bob"]);
        assert_eq!(
            selected["bob"].delete_reason,
            Some(DeletionReason::TrainingAccountInactive)
        );
    }

    #[test]
    fn test_training_marker_is_case_insensitive() {
        let (ids, contacts) = snapshots(
            vec![identity("dana", "2024-05-01")],
            vec![contact("dana", "2024-04-01").with_routing_profile("Agents-nHt")],
        );
        let rules = RulesConfig {
            training_marker: "NHT".to_string(),
            ..Default::default()
        };

        let selected = inactive_training_accounts(&ids, &contacts, &rules, &ages()).unwrap();
        assert_eq!(keys(&selected), vec!["dana"]);
    }

    #[test]
    fn test_training_rule_skips_dates_of_non_training_accounts() {
        let (ids, contacts) = snapshots(
            vec![],
            vec![contact("sales", "garbage").with_routing_profile("Sales")],
        );
        let selected =
            inactive_training_accounts(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_inactive_identity_needs_contact_account() {
        let (ids, contacts) = snapshots(
            vec![
                identity("carol", "2023-12-01"),
                identity("nocontact", "2023-01-01"),
                identity("active", "2024-06-01"),
            ],
            vec![
                contact("carol", "2024-06-30"),
                contact("active", "2020-01-01"),
            ],
        );

        let selected =
            inactive_identities(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap();

        assert_eq!(keys(&selected), vec!["carol"]);
        assert_eq!(
            selected["carol"].delete_reason,
            Some(DeletionReason::IdentityInactive)
        );
    }

    #[test]
    fn test_selected_record_is_the_contact_record() {
        let (ids, contacts) = snapshots(
            vec![identity("carol", "2023-12-01")],
            vec![
                contact("carol", "2024-06-30")
                    .with_name("Carol", "Danvers")
                    .with_security_profiles(["Agent"]),
            ],
        );

        let selected =
            inactive_identities(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap();
        let carol = &selected["carol"];
        assert_eq!(carol.first_name.as_deref(), Some("Carol"));
        assert_eq!(carol.date_created, "2024-06-30");
        assert_eq!(contacts.get("carol").unwrap().delete_reason, None);
    }

    #[test]
    fn test_inactive_identity_boundary() {
        // 2024-01-03 is 180 days before the reference, 2024-01-02 is 181
        let (ids, contacts) = snapshots(
            vec![
                identity("at-limit", "2024-01-03"),
                identity("past-limit", "2024-01-02"),
            ],
            vec![
                contact("at-limit", "2024-06-01"),
                contact("past-limit", "2024-06-01"),
            ],
        );

        let selected =
            inactive_identities(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap();
        assert_eq!(keys(&selected), vec!["past-limit"]);
    }

    #[test]
    fn test_training_account_boundaries() {
        // 2024-05-02 is 60 days old, 2024-05-01 is 61; 2024-06-01 is 30, 2024-05-31 is 31
        let (ids, contacts) = snapshots(
            vec![
                identity("young", "2024-01-01"),
                identity("recent", "2024-06-01"),
                identity("stale", "2024-05-31"),
            ],
            vec![
                contact("young", "2024-05-02").with_routing_profile("NHT-Training"),
                contact("recent", "2024-05-01").with_routing_profile("NHT-Training"),
                contact("stale", "2024-05-01").with_routing_profile("NHT-Training"),
            ],
        );

        let selected =
            inactive_training_accounts(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap();
        assert_eq!(keys(&selected), vec!["stale"]);
    }

    #[test]
    fn test_bad_date_aborts_rule() {
        let (ids, contacts) = snapshots(vec![], vec![contact("broken", "")]);
        let err = orphaned_stale(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::InvalidDateFormat {
                ref login_key,
                field: DateField::ContactCreated,
                ..
            } if login_key == "broken"
        ));

        let (ids, contacts) = snapshots(vec![identity("broken", "2024-13-01")], vec![]);
        let err =
            inactive_identities(&ids, &contacts, &RulesConfig::default(), &ages()).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::InvalidDateFormat {
                field: DateField::IdentityLastLogin,
                ..
            }
        ));
    }

    #[test]
    fn test_rule_order_and_reasons() {
        assert_eq!(
            Rule::ORDERED.map(Rule::reason),
            [
                DeletionReason::OrphanedStale,
                DeletionReason::TrainingAccountInactive,
                DeletionReason::IdentityInactive,
            ]
        );
        assert_eq!(Rule::IdentityInactive.to_string(), "IDENTITY_INACTIVE");
    }
}
