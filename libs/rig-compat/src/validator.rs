//! Configuration Validator
//!
//! Two walks over the same relation: `validate` stops at the first failure,
//! `issues` visits every required type and every pair and reports them all.

use rig_model::{Component, ComponentType};

use crate::checker::PairwiseChecker;

/// Required-slot and pairwise checks over a component set
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationValidator<'a> {
    checker: PairwiseChecker<'a>,
    required: &'a [ComponentType],
}

impl<'a> ConfigurationValidator<'a> {
    pub fn new(checker: PairwiseChecker<'a>, required: &'a [ComponentType]) -> Self {
        Self { checker, required }
    }

    /// Whether the set is buildable
    ///
    /// An empty set is valid. Otherwise every required type must be present and
    /// every unordered pair must pass in at least one orientation.
    pub fn validate(&self, components: &[Component]) -> bool {
        if components.is_empty() {
            return true;
        }

        for required in self.required {
            if !components.iter().any(|c| c.component_type == *required) {
                return false;
            }
        }

        for (i, a) in components.iter().enumerate() {
            for b in &components[i + 1..] {
                if !self.checker.is_compatible_either(a, b) {
                    return false;
                }
            }
        }

        true
    }

    /// Every missing required type, then every incompatible pair
    pub fn issues(&self, components: &[Component]) -> Vec<String> {
        let mut issues = Vec::new();
        if components.is_empty() {
            return issues;
        }

        for required in self.missing_types(components) {
            issues.push(format!(
                "Missing required component: {} ({})",
                required.display_name(),
                required.code()
            ));
        }

        for (i, a) in components.iter().enumerate() {
            for b in &components[i + 1..] {
                if let Some(reason) = self.checker.pair_reason(a, b) {
                    issues.push(format!(
                        "Incompatible: {} ({}) and {} ({}) - {}",
                        a.display_name(),
                        a.component_type,
                        b.display_name(),
                        b.component_type,
                        reason
                    ));
                }
            }
        }

        issues
    }

    /// Required types with no component in the set, in configured order
    pub fn missing_types(&self, components: &[Component]) -> Vec<ComponentType> {
        self.required
            .iter()
            .copied()
            .filter(|t| !components.iter().any(|c| c.component_type == *t))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::table::RuleTable;
    use rig_model::{CompatibilityRule, Operator};

    const REQUIRED: &[ComponentType] = &[ComponentType::Cpu, ComponentType::Motherboard];

    fn table() -> RuleTable {
        RuleTable::from_rules(
            [CompatibilityRule::new(
                ComponentType::Cpu,
                ComponentType::Motherboard,
                "socket",
                "socket",
                Operator::Equals,
            )
            .with_id(1)],
            true,
        )
    }

    fn cpu(socket: &str) -> Component {
        Component::new(1, "CPU One", ComponentType::Cpu).with_spec("socket", socket)
    }

    fn board(socket: &str) -> Component {
        Component::new(2, "Board Two", ComponentType::Motherboard).with_spec("socket", socket)
    }

    #[test]
    fn test_empty_is_valid() {
        let table = table();
        let validator = ConfigurationValidator::new(PairwiseChecker::new(&table), REQUIRED);

        assert!(validator.validate(&[]));
        assert!(validator.issues(&[]).is_empty());
    }

    #[test]
    fn test_missing_required_type() {
        let table = table();
        let validator = ConfigurationValidator::new(PairwiseChecker::new(&table), REQUIRED);
        let components = vec![cpu("AM5")];

        assert!(!validator.validate(&components));
        let issues = validator.issues(&components);
        assert_eq!(issues, vec!["Missing required component: Motherboard (MB)".to_string()]);
    }

    #[test]
    fn test_incompatible_pair() {
        let table = table();
        let validator = ConfigurationValidator::new(PairwiseChecker::new(&table), REQUIRED);

        assert!(validator.validate(&[cpu("AM5"), board("AM5")]));

        let components = vec![cpu("AM4"), board("AM5")];
        assert!(!validator.validate(&components));
        let issues = validator.issues(&components);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Incompatible: CPU One (CPU) and Board Two (MB) - "));
        assert!(issues[0].contains("current values: AM4 and AM5"));
    }

    #[test]
    fn test_issues_do_not_short_circuit() {
        let table = table();
        let required = [
            ComponentType::Cpu,
            ComponentType::Motherboard,
            ComponentType::Ram,
            ComponentType::Psu,
        ];
        let validator = ConfigurationValidator::new(PairwiseChecker::new(&table), &required);
        let gpu_a = Component::new(3, "GPU A", ComponentType::Gpu);
        let gpu_b = Component::new(4, "GPU B", ComponentType::Gpu);
        let components = vec![cpu("AM4"), board("AM5"), gpu_a, gpu_b];

        assert!(!validator.validate(&components));
        let issues = validator.issues(&components);
        // RAM, PSU missing; CPU/MB socket; GPU/GPU same type
        assert_eq!(issues.len(), 4);
        assert_eq!(validator.missing_types(&components).len(), 2);
    }
}
