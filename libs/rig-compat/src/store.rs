//! Collaborator interfaces for component and rule lookup
//!
//! The engine only reads through these traits; persistence is owned by the
//! implementor. `InMemoryStore` backs the CLI and the tests.

use parking_lot::RwLock;
use rig_model::{CompatibilityRule, Component, ComponentType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Component lookup
pub trait ComponentCatalog: Send + Sync {
    fn find_by_id(&self, id: i64) -> Result<Option<Component>>;

    fn find_by_type(&self, component_type: ComponentType) -> Result<Vec<Component>>;
}

/// Rule lookup and persistence
pub trait RuleStore: Send + Sync {
    /// Rules keyed exactly by `(source, target)`
    fn rules_for_pair(
        &self,
        source: ComponentType,
        target: ComponentType,
    ) -> Result<Vec<CompatibilityRule>>;

    /// Rules where the type is the source or the target
    fn rules_for_type(&self, component_type: ComponentType) -> Result<Vec<CompatibilityRule>>;

    /// Insert or update a rule, returning it with its id assigned
    fn save_rule(&self, rule: CompatibilityRule) -> Result<CompatibilityRule>;
}

/// Serialized catalog: components plus rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub rules: Vec<CompatibilityRule>,
}

impl CatalogSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Catalog and rule store held in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    components: RwLock<Vec<Component>>,
    rules: RwLock<Vec<CompatibilityRule>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot; rules without an id are numbered after the highest one
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let mut next = snapshot.rules.iter().filter_map(|r| r.id).max().unwrap_or(0);
        let rules = snapshot
            .rules
            .into_iter()
            .map(|mut rule| {
                if rule.id.is_none() {
                    next += 1;
                    rule.id = Some(next);
                }
                rule
            })
            .collect();

        let store = Self {
            components: RwLock::new(snapshot.components),
            rules: RwLock::new(rules),
        };
        debug!(
            "In-memory store: {} components, {} rules",
            store.components.read().len(),
            store.rules.read().len()
        );
        store
    }

    /// Add or replace a component by id
    pub fn add_component(&self, component: Component) {
        let mut components = self.components.write();
        match components.iter_mut().find(|c| c.id == component.id) {
            Some(slot) => *slot = component,
            None => components.push(component),
        }
    }

    pub fn component_count(&self) -> usize {
        self.components.read().len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.read().len()
    }

    /// Every stored rule, active or not
    pub fn all_rules(&self) -> Vec<CompatibilityRule> {
        self.rules.read().clone()
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            components: self.components.read().clone(),
            rules: self.rules.read().clone(),
        }
    }

    fn insert_rule(&self, mut rule: CompatibilityRule) -> CompatibilityRule {
        let mut rules = self.rules.write();

        if let Some(id) = rule.id {
            if let Some(slot) = rules.iter_mut().find(|r| r.id == Some(id)) {
                *slot = rule.clone();
                return rule;
            }
        } else {
            let next = rules.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
            rule.id = Some(next);
        }

        rules.push(rule.clone());
        rule
    }
}

impl ComponentCatalog for InMemoryStore {
    fn find_by_id(&self, id: i64) -> Result<Option<Component>> {
        Ok(self.components.read().iter().find(|c| c.id == id).cloned())
    }

    fn find_by_type(&self, component_type: ComponentType) -> Result<Vec<Component>> {
        Ok(self
            .components
            .read()
            .iter()
            .filter(|c| c.component_type == component_type)
            .cloned()
            .collect())
    }
}

impl RuleStore for InMemoryStore {
    fn rules_for_pair(
        &self,
        source: ComponentType,
        target: ComponentType,
    ) -> Result<Vec<CompatibilityRule>> {
        Ok(self
            .rules
            .read()
            .iter()
            .filter(|r| r.source_type == source && r.target_type == target)
            .cloned()
            .collect())
    }

    fn rules_for_type(&self, component_type: ComponentType) -> Result<Vec<CompatibilityRule>> {
        Ok(self
            .rules
            .read()
            .iter()
            .filter(|r| r.source_type == component_type || r.target_type == component_type)
            .cloned()
            .collect())
    }

    fn save_rule(&self, rule: CompatibilityRule) -> Result<CompatibilityRule> {
        Ok(self.insert_rule(rule))
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use rig_model::Operator;

    fn rule(source: ComponentType, target: ComponentType) -> CompatibilityRule {
        CompatibilityRule::new(source, target, "k", "k", Operator::Equals)
    }

    #[test]
    fn test_save_assigns_ids_and_updates() {
        let store = InMemoryStore::new();

        let first = store.save_rule(rule(ComponentType::Cpu, ComponentType::Motherboard)).unwrap();
        let second = store.save_rule(rule(ComponentType::Gpu, ComponentType::Case)).unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));

        let updated = store
            .save_rule(rule(ComponentType::Gpu, ComponentType::Case).with_id(2).with_description("fits"))
            .unwrap();
        assert_eq!(updated.id, Some(2));
        assert_eq!(store.rule_count(), 2);
        assert_eq!(store.all_rules()[1].description, "fits");
    }

    #[test]
    fn test_rule_lookups() {
        let store = InMemoryStore::from_snapshot(CatalogSnapshot {
            components: vec![],
            rules: vec![
                rule(ComponentType::Cpu, ComponentType::Motherboard).with_id(5),
                rule(ComponentType::Motherboard, ComponentType::Ram),
                rule(ComponentType::Gpu, ComponentType::Case),
            ],
        });

        let pair = store
            .rules_for_pair(ComponentType::Cpu, ComponentType::Motherboard)
            .unwrap();
        assert_eq!(pair.len(), 1);
        assert!(store
            .rules_for_pair(ComponentType::Motherboard, ComponentType::Cpu)
            .unwrap()
            .is_empty());

        let board = store.rules_for_type(ComponentType::Motherboard).unwrap();
        assert_eq!(board.len(), 2);
        // numbered after the highest explicit id
        assert_eq!(board[1].id, Some(6));
    }

    #[test]
    fn test_catalog_lookups() {
        let store = InMemoryStore::new();
        store.add_component(Component::new(1, "CPU", ComponentType::Cpu));
        store.add_component(Component::new(2, "Other CPU", ComponentType::Cpu));
        store.add_component(Component::new(1, "Renamed", ComponentType::Cpu));

        assert_eq!(store.component_count(), 2);
        assert_eq!(store.find_by_id(1).unwrap().unwrap().name, "Renamed");
        assert!(store.find_by_id(9).unwrap().is_none());
        assert_eq!(store.find_by_type(ComponentType::Cpu).unwrap().len(), 2);
        assert!(store.find_by_type(ComponentType::Gpu).unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_from_json() {
        let snapshot = CatalogSnapshot::from_json(
            r#"{
                "components": [{"id": 1, "name": "Ryzen", "type": "CPU", "specs": {"socket": "AM5"}}],
                "rules": [{"source_type": "CPU", "target_type": "MB",
                           "source_key": "socket", "target_key": "socket", "operator": "EQUALS"}]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.components[0].spec("socket"), "AM5");
        assert_eq!(snapshot.rules[0].operator, Operator::Equals);
    }
}
