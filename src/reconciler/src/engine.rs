//! Reconciliation run over two directory snapshots.

use chrono::NaiveDate;
use common::config::RulesConfig;
use common::model::{ContactSnapshot, DeletionMap, ExceptionList, IdentitySnapshot};
use serde::Serialize;

use crate::age::AgeEvaluator;
use crate::error::ReconcileError;
use crate::merge::{exclude, union};
use crate::rules::Rule;

/// Counts describing one reconciliation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub reference_date: NaiveDate,
    pub identity_accounts: usize,
    pub contact_accounts: usize,
    /// Matches per rule before merging
    pub orphaned_stale: usize,
    pub training_account_inactive: usize,
    pub identity_inactive: usize,
    /// Candidates dropped because they are allow-listed
    pub excepted: usize,
    /// Entries in the final deletion list
    pub flagged: usize,
}

impl ReconciliationSummary {
    fn record_rule(&mut self, rule: Rule, matched: usize) {
        match rule {
            Rule::OrphanedStale => self.orphaned_stale = matched,
            Rule::TrainingAccountInactive => self.training_account_inactive = matched,
            Rule::IdentityInactive => self.identity_inactive = matched,
        }
    }

    pub fn log(&self) {
        tracing::info!(
            reference_date = %self.reference_date,
            identity_accounts = self.identity_accounts,
            contact_accounts = self.contact_accounts,
            orphaned_stale = self.orphaned_stale,
            training_account_inactive = self.training_account_inactive,
            identity_inactive = self.identity_inactive,
            excepted = self.excepted,
            flagged = self.flagged,
            "Reconciliation summary"
        );
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReconciliationOutcome {
    /// Final deletion list, in merge order
    pub candidates: DeletionMap,
    pub summary: ReconciliationSummary,
}

/// Evaluates the deletion rules and merges their results.
#[derive(Clone, Debug)]
pub struct Reconciler {
    rules: RulesConfig,
}

impl Reconciler {
    /// Create a reconciler, rejecting invalid thresholds.
    pub fn new(rules: RulesConfig) -> Result<Self, ReconcileError> {
        rules
            .validate()
            .map_err(|e| ReconcileError::InvalidConfiguration(e.to_string()))?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Run every rule against the snapshots as of `reference` and merge.
    ///
    /// The first unreadable record date aborts the run; no partial list is
    /// returned.
    pub fn reconcile(
        &self,
        identity: &IdentitySnapshot,
        contact: &ContactSnapshot,
        reference: NaiveDate,
        exceptions: &ExceptionList,
    ) -> Result<ReconciliationOutcome, ReconcileError> {
        let ages = AgeEvaluator::new(reference);
        let mut summary = ReconciliationSummary {
            reference_date: reference,
            identity_accounts: identity.len(),
            contact_accounts: contact.len(),
            ..Default::default()
        };

        let mut results = Vec::with_capacity(Rule::ORDERED.len());
        for rule in Rule::ORDERED {
            let result = rule.evaluate(identity, contact, &self.rules, &ages)?;
            tracing::debug!(rule = %rule, matched = result.len(), "Evaluated deletion rule");
            summary.record_rule(rule, result.len());
            results.push(result);
        }

        let mut candidates = union(results);
        summary.excepted = exclude(&mut candidates, exceptions);
        summary.flagged = candidates.len();

        Ok(ReconciliationOutcome {
            candidates,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::DeletionReason;
    use common::testing::{contact, date, identity};

    #[test]
    fn test_invalid_rules_rejected() {
        let err = Reconciler::new(RulesConfig {
            identity_inactivity_days: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_summary_counts_each_stage() {
        let identities = IdentitySnapshot::from_records([
            identity("bob", "2023-12-01"),
            identity("carol", "2023-12-01"),
        ]);
        let contacts = ContactSnapshot::from_records([
            contact("alice", "2024-01-01"),
            contact("bob", "2024-04-01").with_routing_profile("NHT-Training"),
            contact("carol", "2024-04-01"),
        ]);

        let reconciler = Reconciler::new(RulesConfig::default()).unwrap();
        let outcome = reconciler
            .reconcile(
                &identities,
                &contacts,
                date("2024-07-01"),
                &ExceptionList::parse("carol"),
            )
            .unwrap();

        let summary = &outcome.summary;
        assert_eq!(summary.identity_accounts, 2);
        assert_eq!(summary.contact_accounts, 3);
        assert_eq!(summary.orphaned_stale, 1);
        assert_eq!(summary.training_account_inactive, 1);
        assert_eq!(summary.identity_inactive, 2);
        assert_eq!(summary.excepted, 1);
        assert_eq!(summary.flagged, 2);

        // bob matched rules 2 and 3, the later rule wins
        assert_eq!(
            outcome.candidates["bob"].delete_reason,
            Some(DeletionReason::IdentityInactive)
        );
        assert_eq!(
            outcome.candidates["alice"].delete_reason,
            Some(DeletionReason::OrphanedStale)
        );
    }

    #[test]
    fn test_reconcile_fails_whole_run_on_bad_date() {
        let contacts = ContactSnapshot::from_records([
            contact("alice", "2024-01-01"),
            contact("broken", "01/01/2024"),
        ]);
        let reconciler = Reconciler::new(RulesConfig::default()).unwrap();

        let result = reconciler.reconcile(
            &IdentitySnapshot::default(),
            &contacts,
            date("2024-07-01"),
            &ExceptionList::default(),
        );
        assert!(matches!(
            result,
            Err(ReconcileError::InvalidDateFormat { .. })
        ));
    }
}
