//! Mutually exclusive label reconciliation.
//!
//! Adding a label that belongs to an exclusion group evicts every other
//! member of that group from the pull request. The resulting label set is
//! written with a single replace-all call, and only when it differs from
//! what is currently on the pull request.
use log::*;
use std::collections::BTreeSet;

use crate::{
    Result,
    error::StewardError,
    forge::{
        traits::Forge,
        types::{Lookup, PrLabelsRequest},
    },
};

/// Outcome of reconciling a label set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Full, sorted label set that should be on the pull request.
    pub to_apply: Vec<String>,
    /// Labels evicted by exclusion groups, sorted.
    pub removed: Vec<String>,
    /// Whether `to_apply` differs from the existing label set.
    pub changed: bool,
}

/// Compute the target label set for `labels_to_add` given the labels that
/// currently exist and the configured exclusion groups.
pub fn reconcile(
    existing: &[String],
    labels_to_add: &[String],
    exclusion_groups: &[Vec<String>],
) -> Reconciliation {
    let existing: BTreeSet<&str> = existing.iter().map(String::as_str).collect();
    let adding: BTreeSet<&str> =
        labels_to_add.iter().map(String::as_str).collect();

    let removed: BTreeSet<&str> = exclusion_groups
        .iter()
        .filter(|group| group.iter().any(|l| adding.contains(l.as_str())))
        .flat_map(|group| group.iter().map(String::as_str))
        .filter(|l| !adding.contains(l) && existing.contains(l))
        .collect();

    let to_apply: BTreeSet<&str> = existing
        .difference(&removed)
        .copied()
        .chain(adding.iter().copied())
        .collect();

    Reconciliation {
        changed: to_apply != existing,
        to_apply: to_apply.into_iter().map(String::from).collect(),
        removed: removed.into_iter().map(String::from).collect(),
    }
}

/// Applies label additions to pull requests, honoring exclusion groups.
#[derive(Debug, Clone)]
pub struct LabelReconciler {
    exclusion_groups: Vec<Vec<String>>,
}

impl LabelReconciler {
    pub fn new(exclusion_groups: Vec<Vec<String>>) -> Self {
        Self { exclusion_groups }
    }

    /// Add labels to an issue or pull request. The current label set is
    /// fetched fresh; the write is skipped entirely when nothing changes.
    pub async fn add_labels(
        &self,
        forge: &dyn Forge,
        number: u64,
        labels_to_add: &[String],
    ) -> Result<Reconciliation> {
        let existing = match forge.get_labels(number).await? {
            Lookup::Found(labels) => labels,
            Lookup::NotFound => {
                return Err(StewardError::not_found(format!(
                    "issue or pull request #{number} in {}",
                    forge.repo_name()
                )));
            }
        };

        let result = reconcile(&existing, labels_to_add, &self.exclusion_groups);

        if !result.changed {
            info!("labels on #{number} already up to date: {:?}", existing);
            return Ok(result);
        }

        if !result.removed.is_empty() {
            info!("removing excluded labels from #{number}: {:?}", result.removed);
        }

        info!("setting labels on #{number}: {:?}", result.to_apply);

        forge
            .replace_labels(PrLabelsRequest {
                pr_number: number,
                labels: result.to_apply.clone(),
            })
            .await?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::traits::MockForge;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn status_group() -> Vec<Vec<String>> {
        vec![strings(&[
            "has-conflicts",
            "has-failures",
            "has-issues",
            "in-progress",
            "please-review",
        ])]
    }

    #[test]
    fn adding_excluded_label_evicts_present_member() {
        let result = reconcile(
            &strings(&["in-progress"]),
            &strings(&["please-review"]),
            &status_group(),
        );

        assert_eq!(result.to_apply, strings(&["please-review"]));
        assert_eq!(result.removed, strings(&["in-progress"]));
        assert!(result.changed);
    }

    #[test]
    fn exclusion_applies_to_every_member_of_group() {
        let groups = vec![strings(&["x", "y", "z"])];
        let existing = strings(&["y", "z", "unrelated"]);

        let result = reconcile(&existing, &strings(&["x"]), &groups);
        assert_eq!(result.to_apply, strings(&["unrelated", "x"]));

        let result = reconcile(&existing, &strings(&["y"]), &groups);
        assert_eq!(result.to_apply, strings(&["unrelated", "y"]));
        assert_eq!(result.removed, strings(&["z"]));
    }

    #[test]
    fn label_without_group_is_simply_added() {
        let result = reconcile(
            &strings(&["bug"]),
            &strings(&["documentation"]),
            &status_group(),
        );

        assert_eq!(result.to_apply, strings(&["bug", "documentation"]));
        assert!(result.removed.is_empty());
        assert!(result.changed);
    }

    #[test]
    fn already_present_labels_are_a_no_op() {
        let result = reconcile(
            &strings(&["please-review", "bug"]),
            &strings(&["please-review"]),
            &status_group(),
        );

        assert_eq!(result.to_apply, strings(&["bug", "please-review"]));
        assert!(!result.changed);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let groups = status_group();
        let cases = [
            (strings(&[]), strings(&["in-progress"])),
            (strings(&["in-progress", "bug"]), strings(&["has-failures"])),
            (
                strings(&["has-conflicts", "has-issues"]),
                strings(&["please-review", "has-issues"]),
            ),
            (strings(&["a", "a", "b"]), strings(&["b", "c", "c"])),
        ];

        for (existing, adding) in cases {
            let first = reconcile(&existing, &adding, &groups);
            let second = reconcile(&first.to_apply, &adding, &groups);
            assert!(!second.changed, "not idempotent for {existing:?} + {adding:?}");
            assert_eq!(first.to_apply, second.to_apply);
        }
    }

    #[test]
    fn overlapping_groups_are_order_independent() {
        let existing = strings(&["a", "b", "c"]);
        let adding = strings(&["a"]);
        let forward = vec![strings(&["a", "b"]), strings(&["a", "c"])];
        let reversed = vec![strings(&["a", "c"]), strings(&["a", "b"])];

        let one = reconcile(&existing, &adding, &forward);
        let two = reconcile(&existing, &adding, &reversed);

        assert_eq!(one, two);
        assert_eq!(one.to_apply, strings(&["a"]));
    }

    #[test]
    fn duplicate_existing_labels_do_not_count_as_change() {
        let result =
            reconcile(&strings(&["b", "a", "b"]), &strings(&["a"]), &[]);

        assert_eq!(result.to_apply, strings(&["a", "b"]));
        assert!(!result.changed);
    }

    #[tokio::test]
    async fn add_labels_replaces_full_set_once() {
        let mut forge = MockForge::new();
        forge
            .expect_get_labels()
            .withf(|number| *number == 7)
            .times(1)
            .returning(|_| Ok(Lookup::Found(vec!["in-progress".into(), "bug".into()])));
        forge
            .expect_replace_labels()
            .times(1)
            .withf(|req| {
                req.pr_number == 7
                    && req.labels == vec!["bug".to_string(), "please-review".to_string()]
            })
            .returning(|req| Ok(req.labels));

        let reconciler = LabelReconciler::new(status_group());
        let result = reconciler
            .add_labels(&forge, 7, &strings(&["please-review"]))
            .await
            .unwrap();

        assert!(result.changed);
    }

    #[tokio::test]
    async fn add_labels_skips_write_when_unchanged() {
        let mut forge = MockForge::new();
        forge
            .expect_get_labels()
            .returning(|_| Ok(Lookup::Found(vec!["please-review".into()])));
        forge.expect_replace_labels().times(0);

        let reconciler = LabelReconciler::new(status_group());
        let result = reconciler
            .add_labels(&forge, 7, &strings(&["please-review"]))
            .await
            .unwrap();

        assert!(!result.changed);
    }

    #[tokio::test]
    async fn add_labels_fails_fast_when_entity_missing() {
        let mut forge = MockForge::new();
        forge.expect_get_labels().returning(|_| Ok(Lookup::NotFound));
        forge.expect_repo_name().returning(|| "acme/widgets".into());
        forge.expect_replace_labels().times(0);

        let reconciler = LabelReconciler::new(status_group());
        let err = reconciler
            .add_labels(&forge, 404, &strings(&["please-review"]))
            .await
            .unwrap_err();

        assert!(matches!(err, StewardError::NotFound { .. }));
        assert!(err.to_string().contains("#404 in acme/widgets"));
    }
}
