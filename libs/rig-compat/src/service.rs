//! Compatibility service - the operations exposed to callers
//!
//! Each call loads the rule subset it needs from the `RuleStore` once, builds a
//! `RuleTable` snapshot and runs the engine on that snapshot only.

use rig_model::{CompatibilityRule, Component, ComponentType};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::analyzer::{AnalysisContext, AnalysisResult, ConfigurationAnalyzer};
use crate::checker::{IncompatibilityDetail, PairwiseChecker};
use crate::config::EngineConfig;
use crate::conflicts::detect_conflicts;
use crate::error::{CompatError, Result};
use crate::store::{ComponentCatalog, RuleStore};
use crate::table::RuleTable;
use crate::validator::ConfigurationValidator;

/// Compatibility engine over a component catalog and a rule store
pub struct CompatibilityService<C, R> {
    catalog: Arc<C>,
    rules: Arc<R>,
    config: EngineConfig,
    analyzer: ConfigurationAnalyzer,
}

impl<C: ComponentCatalog, R: RuleStore> CompatibilityService<C, R> {
    pub fn new(catalog: Arc<C>, rules: Arc<R>, config: EngineConfig) -> Self {
        Self {
            catalog,
            rules,
            config,
            analyzer: ConfigurationAnalyzer::new(),
        }
    }

    /// Replace the analyzer, e.g. to run a custom set of dimensions
    pub fn with_analyzer(mut self, analyzer: ConfigurationAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Rule snapshots
    // ========================================================================

    /// Rules between two types, both orientations
    fn pair_table(&self, a: ComponentType, b: ComponentType) -> Result<RuleTable> {
        let mut rules = self.rules.rules_for_pair(a, b)?;
        if a != b {
            rules.extend(self.rules.rules_for_pair(b, a)?);
        }
        Ok(RuleTable::from_rules(rules, self.config.symmetric_rules))
    }

    /// Rules touching any of the given types
    fn table_for<'c>(&self, components: impl IntoIterator<Item = &'c Component>) -> Result<RuleTable> {
        let mut seen = FxHashSet::default();
        let mut rules = Vec::new();
        for component in components {
            if seen.insert(component.component_type) {
                rules.extend(self.rules.rules_for_type(component.component_type)?);
            }
        }
        Ok(RuleTable::from_rules(rules, self.config.symmetric_rules))
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn component(&self, id: i64) -> Result<Component> {
        self.catalog
            .find_by_id(id)?
            .ok_or_else(|| CompatError::NotFound(format!("component {}", id)))
    }

    /// Resolve ids in order; any unknown id is an error
    pub fn components(&self, ids: &[i64]) -> Result<Vec<Component>> {
        ids.iter().map(|id| self.component(*id)).collect()
    }

    /// Rules where the type is source or target, each rule once
    pub fn rules_for_type(&self, component_type: ComponentType) -> Result<Vec<CompatibilityRule>> {
        let mut seen = FxHashSet::default();
        let mut rules = self.rules.rules_for_type(component_type)?;
        rules.retain(|r| r.id.map_or(true, |id| seen.insert(id)));
        Ok(rules)
    }

    // ========================================================================
    // Pairwise
    // ========================================================================

    /// Directed check of `source` against `target`
    pub fn check_components_compatibility(&self, source: &Component, target: &Component) -> Result<bool> {
        let table = self.pair_table(source.component_type, target.component_type)?;
        let compatible = PairwiseChecker::new(&table).is_compatible(source, target);
        debug!(
            "{} -> {}: {}",
            source.display_name(),
            target.display_name(),
            if compatible { "compatible" } else { "incompatible" }
        );
        Ok(compatible)
    }

    /// First violated `(source, target)` rule, explained
    pub fn incompatibility_reason(&self, source: &Component, target: &Component) -> Result<Option<String>> {
        let table = self.pair_table(source.component_type, target.component_type)?;
        Ok(PairwiseChecker::new(&table).incompatibility_reason(source, target))
    }

    /// Whether `candidate` fits with every existing component, in either orientation
    pub fn check_configuration_compatibility(
        &self,
        candidate: &Component,
        existing: &[Component],
    ) -> Result<bool> {
        let table = self.table_for(std::iter::once(candidate).chain(existing))?;
        let checker = PairwiseChecker::new(&table);
        Ok(existing
            .iter()
            .all(|other| checker.is_compatible_either(candidate, other)))
    }

    /// Why `candidate` conflicts with each existing component that rejects it
    pub fn incompatibility_details(
        &self,
        candidate: &Component,
        existing: &[Component],
    ) -> Result<Vec<IncompatibilityDetail>> {
        let table = self.table_for(std::iter::once(candidate).chain(existing))?;
        Ok(PairwiseChecker::new(&table).incompatibility_details(candidate, existing))
    }

    /// Catalog components of `target_type` compatible with `source`
    pub fn compatible_components(
        &self,
        source: &Component,
        target_type: ComponentType,
    ) -> Result<Vec<Component>> {
        let table = self.pair_table(source.component_type, target_type)?;
        let checker = PairwiseChecker::new(&table);
        let candidates = self.catalog.find_by_type(target_type)?;
        let total = candidates.len();

        let compatible: Vec<Component> = candidates
            .into_iter()
            .filter(|c| checker.is_compatible_either(source, c))
            .collect();
        debug!(
            "{}: {}/{} {} components compatible",
            source.display_name(),
            compatible.len(),
            total,
            target_type
        );
        Ok(compatible)
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn validate_configuration(&self, components: &[Component]) -> Result<bool> {
        let table = self.table_for(components)?;
        let validator =
            ConfigurationValidator::new(PairwiseChecker::new(&table), &self.config.required_types);
        Ok(validator.validate(components))
    }

    pub fn configuration_issues(&self, components: &[Component]) -> Result<Vec<String>> {
        let table = self.table_for(components)?;
        let validator =
            ConfigurationValidator::new(PairwiseChecker::new(&table), &self.config.required_types);
        Ok(validator.issues(components))
    }

    /// Full multi-dimension analysis
    ///
    /// Never fails: if the rule snapshot cannot be loaded the result holds a
    /// single CRITICAL_ERROR and is marked incompatible.
    pub fn analyze_configuration(&self, components: &[Component]) -> AnalysisResult {
        let table = match self.table_for(components) {
            Ok(table) => table,
            Err(e) => {
                error!("Configuration analysis failed: {}", e);
                return AnalysisResult::failed(e);
            },
        };
        let ctx = AnalysisContext::new(components, PairwiseChecker::new(&table), &self.config);
        self.analyzer.analyze(&ctx)
    }

    // ========================================================================
    // Rule authoring
    // ========================================================================

    /// Conflicts the rule would introduce; empty means safe to save
    pub fn check_rule_conflicts(&self, rule: &CompatibilityRule) -> Result<Vec<String>> {
        if rule.source_type == rule.target_type {
            return Ok(detect_conflicts(rule, &[]));
        }
        let existing = self.rules.rules_for_pair(rule.source_type, rule.target_type)?;
        Ok(detect_conflicts(rule, &existing))
    }

    /// Validate, check for conflicts, then hand the rule to the store
    pub fn save_rule(&self, rule: CompatibilityRule) -> Result<CompatibilityRule> {
        rule.validate()
            .map_err(|e| CompatError::InvalidRule(e.to_string()))?;

        let conflicts = self.check_rule_conflicts(&rule)?;
        if !conflicts.is_empty() {
            warn!("Rule not saved: {}", conflicts.join("; "));
            return Err(CompatError::RuleConflict(conflicts));
        }

        let saved = self.rules.save_rule(rule)?;
        info!(
            "Saved rule {:?}: {} {} {} -> {} {}",
            saved.id,
            saved.source_type,
            saved.source_key,
            saved.operator.symbol(),
            saved.target_type,
            saved.target_key
        );
        Ok(saved)
    }
}
