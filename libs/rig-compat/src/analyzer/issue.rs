//! Analysis issues and the aggregated result

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Severity / Category
// ============================================================================

/// How much an issue matters to the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    /// Blocks the build
    CriticalError,
    /// Degraded or suboptimal
    Warning,
    /// Optional improvement
    Recommendation,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CriticalError => "CRITICAL_ERROR",
            Self::Warning => "WARNING",
            Self::Recommendation => "RECOMMENDATION",
        }
    }

    /// 1 for critical errors, 2 for warnings, 3 for recommendations
    pub fn priority(&self) -> u8 {
        match self {
            Self::CriticalError => 1,
            Self::Warning => 2,
            Self::Recommendation => 3,
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area an issue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    Compatibility,
    Performance,
    Power,
    Thermal,
    Physical,
    Balance,
    MissingComponent,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compatibility => "COMPATIBILITY",
            Self::Performance => "PERFORMANCE",
            Self::Power => "POWER",
            Self::Thermal => "THERMAL",
            Self::Physical => "PHYSICAL",
            Self::Balance => "BALANCE",
            Self::MissingComponent => "MISSING_COMPONENT",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Issue
// ============================================================================

/// One finding of the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityIssue {
    pub severity: IssueSeverity,
    pub category: IssueCategory,
    pub title: String,
    pub description: String,
    /// Components the issue is about, when it concerns a specific pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<(String, String)>,
}

impl CompatibilityIssue {
    pub fn new(
        severity: IssueSeverity,
        category: IssueCategory,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            title: title.into(),
            description: description.into(),
            components: None,
        }
    }

    pub fn critical(
        category: IssueCategory,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(IssueSeverity::CriticalError, category, title, description)
    }

    pub fn warning(
        category: IssueCategory,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(IssueSeverity::Warning, category, title, description)
    }

    pub fn recommendation(
        category: IssueCategory,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(IssueSeverity::Recommendation, category, title, description)
    }

    /// Attach the two components involved
    pub fn between(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.components = Some((first.into(), second.into()));
        self
    }

    pub fn priority(&self) -> u8 {
        self.severity.priority()
    }

    pub fn is_critical(&self) -> bool {
        self.severity == IssueSeverity::CriticalError
    }
}

// ============================================================================
// Result
// ============================================================================

/// Overall verdict derived from the issue list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Critical,
    Warning,
    Good,
    Excellent,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered issues of one analysis run
///
/// `compatible` is kept equal to "no CRITICAL_ERROR issue present" by `push`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub compatible: bool,
    pub issues: Vec<CompatibilityIssue>,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self {
            compatible: true,
            issues: Vec::new(),
        }
    }

    /// Result of an analysis that could not process its input at all
    pub fn failed(message: impl fmt::Display) -> Self {
        let mut result = Self::new();
        result.push(CompatibilityIssue::critical(
            IssueCategory::Compatibility,
            "Configuration analysis failed",
            format!("Compatibility analysis could not be completed: {}", message),
        ));
        result
    }

    pub fn push(&mut self, issue: CompatibilityIssue) {
        if issue.is_critical() {
            self.compatible = false;
        }
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = CompatibilityIssue>) {
        for issue in issues {
            self.push(issue);
        }
    }

    pub fn count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn critical_error_count(&self) -> usize {
        self.count(IssueSeverity::CriticalError)
    }

    pub fn warning_count(&self) -> usize {
        self.count(IssueSeverity::Warning)
    }

    pub fn recommendation_count(&self) -> usize {
        self.count(IssueSeverity::Recommendation)
    }

    /// Issues of one severity, in emission order
    pub fn by_severity(&self, severity: IssueSeverity) -> Vec<&CompatibilityIssue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    pub fn critical_errors(&self) -> Vec<&CompatibilityIssue> {
        self.by_severity(IssueSeverity::CriticalError)
    }

    pub fn warnings(&self) -> Vec<&CompatibilityIssue> {
        self.by_severity(IssueSeverity::Warning)
    }

    pub fn recommendations(&self) -> Vec<&CompatibilityIssue> {
        self.by_severity(IssueSeverity::Recommendation)
    }

    pub fn status(&self) -> AnalysisStatus {
        if self.critical_error_count() > 0 {
            AnalysisStatus::Critical
        } else if self.warning_count() > 0 {
            AnalysisStatus::Warning
        } else if self.recommendation_count() > 0 {
            AnalysisStatus::Good
        } else {
            AnalysisStatus::Excellent
        }
    }

    /// 0 with any critical error, otherwise 100 minus 15 per warning and 5 per
    /// recommendation, never below 10
    pub fn score(&self) -> f64 {
        if self.critical_error_count() > 0 {
            return 0.0;
        }
        if self.issues.is_empty() {
            return 100.0;
        }
        let score = 100.0
            - self.warning_count() as f64 * 15.0
            - self.recommendation_count() as f64 * 5.0;
        score.max(10.0)
    }

    pub fn status_message(&self) -> String {
        match self.status() {
            AnalysisStatus::Critical => format!(
                "Configuration is incompatible: {} critical error(s) found",
                self.critical_error_count()
            ),
            AnalysisStatus::Warning => format!(
                "Configuration works, with {} warning(s)",
                self.warning_count()
            ),
            AnalysisStatus::Good => {
                "Configuration is compatible; optimization suggestions available".to_string()
            },
            AnalysisStatus::Excellent => "Configuration is fully compatible".to_string(),
        }
    }

    /// Overall advice for the status
    pub fn recommendation(&self) -> &'static str {
        match self.status() {
            AnalysisStatus::Critical => {
                "Resolve the critical compatibility errors before using this configuration"
            },
            AnalysisStatus::Warning => {
                "The configuration works, but review the warnings for optimal operation"
            },
            AnalysisStatus::Good => "Good configuration; consider the recommendations",
            AnalysisStatus::Excellent => "All components are fully compatible",
        }
    }

    /// "2 critical error(s), 1 warning(s)" or "No issues found"
    pub fn summary(&self) -> String {
        if self.issues.is_empty() {
            return "No issues found".to_string();
        }

        let mut parts = Vec::new();
        let critical = self.critical_error_count();
        let warnings = self.warning_count();
        let recommendations = self.recommendation_count();
        if critical > 0 {
            parts.push(format!("{} critical error(s)", critical));
        }
        if warnings > 0 {
            parts.push(format!("{} warning(s)", warnings));
        }
        if recommendations > 0 {
            parts.push(format!("{} recommendation(s)", recommendations));
        }
        parts.join(", ")
    }
}
