//! Rule table - in-memory snapshot of the rules a check needs
//!
//! Loaded once per check invocation from the rule store and indexed by the
//! directed `(source_type, target_type)` pair. Inactive rules are dropped.

use rig_model::{CompatibilityRule, ComponentType};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

type TypePair = (ComponentType, ComponentType);

/// Directed rule index
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    by_pair: FxHashMap<TypePair, Vec<CompatibilityRule>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded rules
    ///
    /// Rules sharing an id are kept once, so overlapping store queries can be
    /// concatenated. With `symmetric` set, each mirrorable rule is also indexed
    /// under the reversed pair.
    pub fn from_rules(rules: impl IntoIterator<Item = CompatibilityRule>, symmetric: bool) -> Self {
        let mut table = Self::new();
        let mut seen: FxHashSet<i64> = FxHashSet::default();

        for rule in rules {
            if !rule.active {
                continue;
            }
            if let Some(id) = rule.id {
                if !seen.insert(id) {
                    continue;
                }
            }
            if symmetric {
                if let Some(mirror) = rule.mirrored() {
                    table.insert(mirror);
                }
            }
            table.insert(rule);
        }

        debug!("Rule table: {} rules over {} pairs", table.len(), table.by_pair.len());
        table
    }

    pub fn insert(&mut self, rule: CompatibilityRule) {
        self.by_pair.entry(rule.type_pair()).or_default().push(rule);
    }

    /// Rules keyed exactly by `(source, target)`; empty when none exist
    pub fn rules_for(&self, source: ComponentType, target: ComponentType) -> &[CompatibilityRule] {
        self.by_pair
            .get(&(source, target))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of indexed rules
    pub fn len(&self) -> usize {
        self.by_pair.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }
}
