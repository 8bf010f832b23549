//! Rule Evaluator - evaluate one rule against two attribute values
//!
//! Callers resolve both operands first and skip the rule when either is empty.
//! Semantics per operator:
//! - `EQUALS` / `NOT_EQUALS`: verbatim string comparison
//! - ordered comparisons: both operands parsed as `f64`; if either fails to
//!   parse the rule counts as satisfied
//! - `CONTAINS`: source value contains target value, except for PCIe
//!   interface/slot pairs which compare version numbers

use regex::Regex;
use rig_model::{parse_number, CompatibilityRule, Operator};
use std::sync::OnceLock;
use tracing::debug;

const PCIE_INTERFACE_KEY: &str = "interface";
const PCIE_SLOTS_KEY: &str = "pcie_slots";

/// Evaluate `rule` against already-resolved, non-empty operand values
///
/// Returns `true` when the rule is satisfied.
pub fn evaluate(rule: &CompatibilityRule, source_value: &str, target_value: &str) -> bool {
    match rule.operator {
        Operator::Equals => source_value == target_value,
        Operator::NotEquals => source_value != target_value,
        Operator::GreaterThan
        | Operator::LessThan
        | Operator::GreaterThanEquals
        | Operator::LessThanEquals => {
            let (Some(source), Some(target)) = (parse_number(source_value), parse_number(target_value))
            else {
                // Non-numeric operands: rule not applicable
                debug!(
                    "Rule {:?} {} {} {}: non-numeric '{}' / '{}', skipped",
                    rule.id,
                    rule.source_key,
                    rule.operator.symbol(),
                    rule.target_key,
                    source_value,
                    target_value
                );
                return true;
            };
            compare_numbers(rule.operator, source, target)
        },
        Operator::Contains => {
            if is_pcie_check(&rule.source_key, &rule.target_key) {
                pcie_compatible(source_value, target_value, &rule.source_key)
            } else {
                source_value.contains(target_value)
            }
        },
    }
}

fn compare_numbers(operator: Operator, source: f64, target: f64) -> bool {
    match operator {
        Operator::GreaterThan => source > target,
        Operator::LessThan => source < target,
        Operator::GreaterThanEquals => source >= target,
        Operator::LessThanEquals => source <= target,
        _ => true,
    }
}

// ============================================================================
// PCIe version handling
// ============================================================================

/// Whether a CONTAINS rule links a card interface to board slots
fn is_pcie_check(source_key: &str, target_key: &str) -> bool {
    (source_key == PCIE_INTERFACE_KEY && target_key == PCIE_SLOTS_KEY)
        || (source_key == PCIE_SLOTS_KEY && target_key == PCIE_INTERFACE_KEY)
}

/// PCIe is backward compatible: a card works in a slot of equal or newer version
///
/// Falls back to containment in either direction when a version number cannot
/// be extracted from one of the values.
fn pcie_compatible(source_value: &str, target_value: &str, source_key: &str) -> bool {
    let (Some(source_version), Some(target_version)) =
        (pcie_version(source_value), pcie_version(target_value))
    else {
        return source_value.contains(target_value) || target_value.contains(source_value);
    };

    if source_key == PCIE_INTERFACE_KEY {
        // source is the card, target the slots
        target_version >= source_version
    } else {
        source_version >= target_version
    }
}

/// Extract the first version number ("PCIe 4.0 x16" -> 4.0)
fn pcie_version(value: &str) -> Option<f64> {
    static VERSION: OnceLock<Option<Regex>> = OnceLock::new();
    let re = VERSION
        .get_or_init(|| Regex::new(r"(\d+\.\d+|\d+)").ok())
        .as_ref()?;
    re.captures(value)?.get(1)?.as_str().parse::<f64>().ok()
}
