//! Pairwise Compatibility Checker
//!
//! Decides and explains compatibility of two components against the rules of a
//! `RuleTable`. A single check is directional: it consults only the rules keyed
//! by `(source.type, target.type)`. Configuration-level callers use
//! `is_compatible_either` to accept a pair when either orientation passes.

use rig_model::{CompatibilityRule, Component};
use serde::Serialize;
use tracing::debug;

use crate::evaluator::evaluate;
use crate::table::RuleTable;

/// Reason reported for two components of the same type
pub const SAME_TYPE_REASON: &str =
    "Components of the same type cannot be used in one configuration";

/// Fallback reason when neither orientation names a violated rule
const GENERIC_REASON: &str = "Components are incompatible";

/// Why an existing component rejects a candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncompatibilityDetail {
    pub component_id: i64,
    pub component_name: String,
    pub reason: String,
}

/// Rule-driven compatibility checks over one rule snapshot
#[derive(Debug, Clone, Copy)]
pub struct PairwiseChecker<'a> {
    rules: &'a RuleTable,
}

impl<'a> PairwiseChecker<'a> {
    pub fn new(rules: &'a RuleTable) -> Self {
        Self { rules }
    }

    /// Directed check: every applicable `(source, target)` rule must hold
    ///
    /// Same type is never compatible. Two peripherals are always compatible.
    /// No rules for the pair means no constraint.
    pub fn is_compatible(&self, source: &Component, target: &Component) -> bool {
        if source.component_type == target.component_type {
            return false;
        }
        if source.is_peripheral() && target.is_peripheral() {
            return true;
        }
        self.first_violation(source, target).is_none()
    }

    /// Either orientation passes
    pub fn is_compatible_either(&self, a: &Component, b: &Component) -> bool {
        self.is_compatible(a, b) || self.is_compatible(b, a)
    }

    /// Explanation of the first violated `(source, target)` rule, or `None`
    pub fn incompatibility_reason(&self, source: &Component, target: &Component) -> Option<String> {
        if source.component_type == target.component_type {
            return Some(SAME_TYPE_REASON.to_string());
        }
        if source.is_peripheral() && target.is_peripheral() {
            return None;
        }
        self.first_violation(source, target)
            .map(|(rule, source_value, target_value)| {
                describe_violation(rule, source_value, target_value)
            })
    }

    /// Reason for a pair failing both orientations, `None` when either passes
    pub fn pair_reason(&self, a: &Component, b: &Component) -> Option<String> {
        if self.is_compatible_either(a, b) {
            return None;
        }
        Some(
            self.incompatibility_reason(a, b)
                .or_else(|| self.incompatibility_reason(b, a))
                .unwrap_or_else(|| GENERIC_REASON.to_string()),
        )
    }

    /// For each existing component that conflicts with `candidate`, the first
    /// violated rule in either orientation
    pub fn incompatibility_details(
        &self,
        candidate: &Component,
        existing: &[Component],
    ) -> Vec<IncompatibilityDetail> {
        let mut details = Vec::new();

        for other in existing {
            if candidate.is_peripheral() && other.is_peripheral() {
                continue;
            }

            let reason = if candidate.component_type == other.component_type {
                Some(SAME_TYPE_REASON.to_string())
            } else {
                self.first_violation(candidate, other)
                    .or_else(|| self.first_violation(other, candidate))
                    .map(|(rule, source_value, target_value)| {
                        if rule.description.is_empty() {
                            describe_violation(rule, source_value, target_value)
                        } else {
                            rule.description.clone()
                        }
                    })
            };

            if let Some(reason) = reason {
                details.push(IncompatibilityDetail {
                    component_id: other.id,
                    component_name: other.display_name(),
                    reason,
                });
            }
        }

        details
    }

    /// Walk the `(source, target)` rules and return the first one violated,
    /// with its resolved operands
    ///
    /// A rule whose operand is missing on either side is not applicable.
    fn first_violation<'c>(
        &self,
        source: &'c Component,
        target: &'c Component,
    ) -> Option<(&'a CompatibilityRule, &'c str, &'c str)> {
        let rules = self
            .rules
            .rules_for(source.component_type, target.component_type);

        for rule in rules {
            let source_value = source.spec(&rule.source_key);
            let target_value = target.spec(&rule.target_key);

            if source_value.is_empty() || target_value.is_empty() {
                continue;
            }

            if !evaluate(rule, source_value, target_value) {
                debug!(
                    "{} -> {}: rule {:?} violated ({} {} {})",
                    source.display_name(),
                    target.display_name(),
                    rule.id,
                    source_value,
                    rule.operator.symbol(),
                    target_value
                );
                return Some((rule, source_value, target_value));
            }
        }

        None
    }
}

/// "<description> (current values: X and Y)"
///
/// Rules without a description are explained from their keys and operator.
pub(crate) fn describe_violation(
    rule: &CompatibilityRule,
    source_value: &str,
    target_value: &str,
) -> String {
    let head = if rule.description.is_empty() {
        format!(
            "`{}` {} `{}`",
            rule.source_key,
            rule.operator.phrase(),
            rule.target_key
        )
    } else {
        rule.description.clone()
    };
    format!(
        "{} (current values: {} and {})",
        head, source_value, target_value
    )
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use rig_model::{ComponentType, Operator};

    fn socket_table() -> RuleTable {
        RuleTable::from_rules(
            [CompatibilityRule::new(
                ComponentType::Cpu,
                ComponentType::Motherboard,
                "socket",
                "socket",
                Operator::Equals,
            )
            .with_id(1)],
            false,
        )
    }

    fn cpu(socket: &str) -> Component {
        Component::new(1, "Ryzen 5 7600", ComponentType::Cpu).with_spec("socket", socket)
    }

    fn board(socket: &str) -> Component {
        Component::new(2, "B650 Board", ComponentType::Motherboard).with_spec("socket", socket)
    }

    #[test]
    fn test_same_type_never_compatible() {
        let table = RuleTable::new();
        let checker = PairwiseChecker::new(&table);

        assert!(!checker.is_compatible(&cpu("AM5"), &cpu("AM5")));
        let kb1 = Component::new(3, "KB1", ComponentType::Keyboard);
        let kb2 = Component::new(4, "KB2", ComponentType::Keyboard);
        assert!(!checker.is_compatible(&kb1, &kb2));
        assert_eq!(
            checker.incompatibility_reason(&kb1, &kb2).as_deref(),
            Some(SAME_TYPE_REASON)
        );
    }

    #[test]
    fn test_no_rules_means_compatible() {
        let table = RuleTable::new();
        let checker = PairwiseChecker::new(&table);
        let gpu = Component::new(5, "GPU", ComponentType::Gpu);

        assert!(checker.is_compatible(&cpu("AM5"), &gpu));
        assert!(checker.incompatibility_reason(&cpu("AM5"), &gpu).is_none());
    }

    #[test]
    fn test_rule_violation_and_reason() {
        let table = socket_table();
        let checker = PairwiseChecker::new(&table);

        assert!(checker.is_compatible(&cpu("AM5"), &board("AM5")));
        assert!(!checker.is_compatible(&cpu("AM4"), &board("AM5")));

        let reason = checker
            .incompatibility_reason(&cpu("AM4"), &board("AM5"))
            .unwrap();
        assert_eq!(reason, "`socket` must equal `socket` (current values: AM4 and AM5)");
    }

    #[test]
    fn test_directional_lookup() {
        let table = socket_table();
        let checker = PairwiseChecker::new(&table);

        // no (MB, CPU) rules: the reverse orientation passes
        assert!(checker.is_compatible(&board("AM5"), &cpu("AM4")));
        assert!(checker.is_compatible_either(&cpu("AM4"), &board("AM5")));
        assert!(checker.pair_reason(&cpu("AM4"), &board("AM5")).is_none());
    }

    #[test]
    fn test_missing_attribute_skips_rule() {
        let table = socket_table();
        let checker = PairwiseChecker::new(&table);
        let bare_board = Component::new(2, "Bare", ComponentType::Motherboard);

        assert!(checker.is_compatible(&cpu("AM4"), &bare_board));
    }

    #[test]
    fn test_peripherals_always_compatible() {
        let table = RuleTable::from_rules(
            [CompatibilityRule::new(
                ComponentType::Monitor,
                ComponentType::Keyboard,
                "connector",
                "connector",
                Operator::Equals,
            )],
            false,
        );
        let checker = PairwiseChecker::new(&table);
        let monitor = Component::new(1, "Monitor", ComponentType::Monitor).with_spec("connector", "HDMI");
        let keyboard = Component::new(2, "Keyboard", ComponentType::Keyboard).with_spec("connector", "USB");

        assert!(checker.is_compatible(&monitor, &keyboard));
    }

    #[test]
    fn test_description_used_in_reason() {
        let table = RuleTable::from_rules(
            [CompatibilityRule::new(
                ComponentType::Gpu,
                ComponentType::Case,
                "length",
                "max_gpu_length",
                Operator::LessThanEquals,
            )
            .with_description("Graphics card length must fit the case")],
            false,
        );
        let checker = PairwiseChecker::new(&table);
        let gpu = Component::new(1, "Long GPU", ComponentType::Gpu).with_spec("length", "340");
        let case = Component::new(2, "Mini Case", ComponentType::Case).with_spec("max_gpu_length", "300");

        let reason = checker.pair_reason(&gpu, &case).unwrap();
        assert_eq!(
            reason,
            "Graphics card length must fit the case (current values: 340 and 300)"
        );
    }

    #[test]
    fn test_incompatibility_details_both_orientations() {
        let table = socket_table();
        let checker = PairwiseChecker::new(&table);
        let ram = Component::new(3, "RAM", ComponentType::Ram);
        let existing = vec![board("AM5"), ram, cpu("AM5")];

        let details = checker.incompatibility_details(&cpu("AM4"), &existing);

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].component_id, 2);
        assert!(details[0].reason.contains("current values: AM4 and AM5"));
        assert_eq!(details[1].reason, SAME_TYPE_REASON);

        // candidate as target of the rule
        let details = checker.incompatibility_details(&board("LGA1700"), &[cpu("AM5")]);
        assert_eq!(details.len(), 1);
    }
}
