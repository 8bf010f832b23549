//! Rig Compat - PC Configuration Compatibility Engine
//!
//! Decides whether an arbitrary set of hardware components can be assembled
//! into a working machine, and explains why not when it cannot:
//! - Rule evaluation of one directed rule against two attribute values
//! - Pairwise compatibility checks over an in-memory rule table
//! - Whole-configuration validation (required slots + every pair)
//! - Seven-dimension analysis (compatibility, power, balance, thermal, fit, ...)
//! - Conflict detection for rules being authored
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │  RuleStore  │────▶│  RuleTable   │────▶│ PairwiseChecker  │
//! │ (external)  │     │  (snapshot)  │     │ (evaluator)      │
//! └─────────────┘     └──────────────┘     └──────────────────┘
//!                                            │             │
//!                                            ▼             ▼
//!                                   ┌────────────┐  ┌────────────┐
//!                                   │ Validator  │  │  Analyzer  │
//!                                   └────────────┘  └────────────┘
//! ```
//!
//! All checks are synchronous and pure over the snapshot they are given.

pub mod analyzer;
mod checker;
pub mod config;
mod conflicts;
mod error;
mod evaluator;
mod service;
pub mod store;
mod table;
mod validator;

// Re-export public API
pub use analyzer::{
    AnalysisContext, AnalysisDimension, AnalysisResult, AnalysisStatus, CompatibilityIssue,
    ConfigurationAnalyzer, IssueCategory, IssueSeverity,
};
pub use checker::{IncompatibilityDetail, PairwiseChecker, SAME_TYPE_REASON};
pub use config::{AnalysisThresholds, EngineConfig};
pub use conflicts::{detect_conflicts, SAME_TYPE_CONFLICT};
pub use error::{CompatError, Result};
pub use evaluator::evaluate;
pub use service::CompatibilityService;
pub use store::{CatalogSnapshot, ComponentCatalog, InMemoryStore, RuleStore};
pub use table::RuleTable;
pub use validator::ConfigurationValidator;

// Re-export model types for convenience
pub use rig_model::{
    Component, ComponentType, CompatibilityRule, Configuration, ModelError, Operator, SpecMap,
};
