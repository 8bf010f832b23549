//! Rule conflict detection
//!
//! Checks a candidate rule against the rules already stored for its type pair.
//! Conflicts are returned as messages; nothing is written.

use rig_model::CompatibilityRule;
use tracing::warn;

/// Message for a rule whose source and target types are equal
pub const SAME_TYPE_CONFLICT: &str = "Rule cannot apply to two components of the same type";

/// Describe every existing rule the candidate would conflict with
///
/// An existing rule conflicts when it links the same spec keys of the same type
/// pair with the same operator or its opposite (`EQUALS`/`NOT_EQUALS`,
/// `GREATER_THAN`/`LESS_THAN_EQUALS`, `LESS_THAN`/`GREATER_THAN_EQUALS`). A
/// stored rule with the candidate's id is the candidate itself and is skipped.
/// An empty result means the rule is safe to persist.
pub fn detect_conflicts(
    candidate: &CompatibilityRule,
    existing: &[CompatibilityRule],
) -> Vec<String> {
    if candidate.source_type == candidate.target_type {
        return vec![SAME_TYPE_CONFLICT.to_string()];
    }

    let mut conflicts = Vec::new();

    for rule in existing {
        if candidate.id.is_some() && rule.id == candidate.id {
            continue;
        }
        if rule.type_pair() != candidate.type_pair() {
            continue;
        }
        if rule.source_key != candidate.source_key || rule.target_key != candidate.target_key {
            continue;
        }

        let clashes = rule.operator == candidate.operator
            || candidate.operator.opposite() == Some(rule.operator);
        if clashes {
            conflicts.push(describe_conflict(rule));
        }
    }

    if !conflicts.is_empty() {
        warn!(
            "Rule {} {} {} ({} -> {}): {} conflict(s)",
            candidate.source_key,
            candidate.operator.symbol(),
            candidate.target_key,
            candidate.source_type,
            candidate.target_type,
            conflicts.len()
        );
    }
    conflicts
}

fn describe_conflict(rule: &CompatibilityRule) -> String {
    let id = rule
        .id
        .map(|id| format!(" #{}", id))
        .unwrap_or_default();
    let what = if rule.description.is_empty() {
        format!(
            "{} {} {}",
            rule.source_key,
            rule.operator.symbol(),
            rule.target_key
        )
    } else {
        rule.description.clone()
    };
    format!("Conflicts with existing rule{}: {}", id, what)
}
