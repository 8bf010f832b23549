//! Configuration Analyzer
//!
//! Runs a fixed sequence of analysis dimensions over a component list and
//! collects their issues into one `AnalysisResult`. Each dimension writes into
//! its own buffer: a dimension returning `Err` has its partial output
//! discarded and is reported as a single WARNING, while the remaining
//! dimensions still run.

mod dimensions;
mod issue;

pub use dimensions::{
    builtin_dimensions, Optimization, PairwiseCompatibility, PerformanceBalance, PhysicalFit,
    PowerConsumption, RequiredComponents, Thermal,
};
pub use issue::{
    AnalysisResult, AnalysisStatus, CompatibilityIssue, IssueCategory, IssueSeverity,
};

use rig_model::{Component, ComponentType};
use tracing::{debug, error, info};

use crate::checker::PairwiseChecker;
use crate::config::EngineConfig;
use crate::error::Result;

// ============================================================================
// Dimension trait
// ============================================================================

/// Inputs shared by every dimension of one analysis run
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub components: &'a [Component],
    pub checker: PairwiseChecker<'a>,
    pub config: &'a EngineConfig,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        components: &'a [Component],
        checker: PairwiseChecker<'a>,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            components,
            checker,
            config,
        }
    }

    /// First component of the given type
    pub fn first_of(&self, component_type: ComponentType) -> Option<&'a Component> {
        self.components
            .iter()
            .find(|c| c.component_type == component_type)
    }

    pub fn count_of(&self, component_type: ComponentType) -> usize {
        self.components
            .iter()
            .filter(|c| c.component_type == component_type)
            .count()
    }
}

/// One independently fault-isolated area of analysis
pub trait AnalysisDimension: Send + Sync {
    /// Capitalized name used in logs and failure issues ("Power")
    fn name(&self) -> &'static str;

    /// Category of the WARNING emitted when this dimension fails
    fn category(&self) -> IssueCategory;

    /// Append this dimension's findings to `issues`
    fn analyze(&self, ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) -> Result<()>;
}

// ============================================================================
// Analyzer
// ============================================================================

/// Ordered set of dimensions
pub struct ConfigurationAnalyzer {
    dimensions: Vec<Box<dyn AnalysisDimension>>,
}

impl Default for ConfigurationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationAnalyzer {
    /// Analyzer running the seven built-in dimensions
    pub fn new() -> Self {
        Self::with_dimensions(builtin_dimensions())
    }

    pub fn with_dimensions(dimensions: Vec<Box<dyn AnalysisDimension>>) -> Self {
        Self { dimensions }
    }

    pub fn dimension_names(&self) -> Vec<&'static str> {
        self.dimensions.iter().map(|d| d.name()).collect()
    }

    pub fn analyze(&self, ctx: &AnalysisContext<'_>) -> AnalysisResult {
        info!("Analyzing configuration of {} components", ctx.components.len());
        let mut result = AnalysisResult::new();

        if ctx.components.is_empty() {
            result.push(CompatibilityIssue::critical(
                IssueCategory::MissingComponent,
                "Empty configuration",
                "The configuration does not contain any components",
            ));
            return result;
        }

        for dimension in &self.dimensions {
            let mut issues = Vec::new();
            match dimension.analyze(ctx, &mut issues) {
                Ok(()) => {
                    debug!("{} analysis: {} issue(s)", dimension.name(), issues.len());
                    result.extend(issues);
                },
                Err(e) => {
                    error!("{} analysis failed: {}", dimension.name(), e);
                    result.push(CompatibilityIssue::warning(
                        dimension.category(),
                        format!("{} analysis failed", dimension.name()),
                        format!(
                            "{} analysis could not be completed: {}",
                            dimension.name(),
                            e
                        ),
                    ));
                },
            }
        }

        info!(
            "Analysis complete: {} critical, {} warnings, {} recommendations",
            result.critical_error_count(),
            result.warning_count(),
            result.recommendation_count()
        );
        result
    }
}
