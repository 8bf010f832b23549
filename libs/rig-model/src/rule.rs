//! Compatibility rule definitions
//!
//! A rule is a directed constraint between two component types: it compares the
//! `source_key` attribute of the source component against the `target_key`
//! attribute of the target component with one operator. `(CPU, MB)` and
//! `(MB, CPU)` are different lookup keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::component::ComponentType;
use crate::error::{ModelError, Result};

// ============================================================================
// Operator
// ============================================================================

/// Comparison operator
///
/// Serialized by name; deserialized from either the name (`"GREATER_THAN"`)
/// or the symbol (`">"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanEquals,
    LessThanEquals,
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterThanEquals,
        Operator::LessThanEquals,
        Operator::Contains,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::GreaterThan => "GREATER_THAN",
            Self::LessThan => "LESS_THAN",
            Self::GreaterThanEquals => "GREATER_THAN_EQUALS",
            Self::LessThanEquals => "LESS_THAN_EQUALS",
            Self::Contains => "CONTAINS",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanEquals => ">=",
            Self::LessThanEquals => "<=",
            Self::Contains => "CONTAINS",
        }
    }

    /// Verb phrase used when explaining a violation ("must equal")
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Equals => "must equal",
            Self::NotEquals => "must differ from",
            Self::GreaterThan => "must be greater than",
            Self::LessThan => "must be less than",
            Self::GreaterThanEquals => "must be at least",
            Self::LessThanEquals => "must be at most",
            Self::Contains => "must contain",
        }
    }

    /// Ordered comparisons parse both operands as numbers
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::LessThan | Self::GreaterThanEquals | Self::LessThanEquals
        )
    }

    /// Operator that accepts exactly the complementary outcomes on the same keys
    ///
    /// `Contains` has no opposite in the operator set.
    pub fn opposite(&self) -> Option<Operator> {
        match self {
            Self::Equals => Some(Self::NotEquals),
            Self::NotEquals => Some(Self::Equals),
            Self::GreaterThan => Some(Self::LessThanEquals),
            Self::LessThanEquals => Some(Self::GreaterThan),
            Self::LessThan => Some(Self::GreaterThanEquals),
            Self::GreaterThanEquals => Some(Self::LessThan),
            Self::Contains => None,
        }
    }

    /// Operator that gives the same result with the operands swapped
    ///
    /// `a > b` holds exactly when `b < a`. Containment is not reversible.
    pub fn mirrored(&self) -> Option<Operator> {
        match self {
            Self::Equals => Some(Self::Equals),
            Self::NotEquals => Some(Self::NotEquals),
            Self::GreaterThan => Some(Self::LessThan),
            Self::LessThan => Some(Self::GreaterThan),
            Self::GreaterThanEquals => Some(Self::LessThanEquals),
            Self::LessThanEquals => Some(Self::GreaterThanEquals),
            Self::Contains => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name() == trimmed)
            .or_else(|| Self::ALL.iter().copied().find(|op| op.symbol() == trimmed))
            .ok_or_else(|| ModelError::UnknownOperator(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

// ============================================================================
// Compatibility Rule
// ============================================================================

/// Directed compatibility constraint between two component types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityRule {
    /// Assigned by the rule store; `None` for a rule not yet persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub source_type: ComponentType,
    pub target_type: ComponentType,

    /// Attribute read from the source component
    #[serde(alias = "source_property")]
    pub source_key: String,

    /// Attribute read from the target component
    #[serde(alias = "target_property")]
    pub target_key: String,

    #[serde(alias = "comparison_operator")]
    pub operator: Operator,

    /// Human-readable explanation shown on violation
    #[serde(default)]
    pub description: String,

    /// Inactive rules are kept for authoring but not used for checking
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CompatibilityRule {
    pub fn new(
        source_type: ComponentType,
        target_type: ComponentType,
        source_key: impl Into<String>,
        target_key: impl Into<String>,
        operator: Operator,
    ) -> Self {
        Self {
            id: None,
            source_type,
            target_type,
            source_key: source_key.into(),
            target_key: target_key.into(),
            operator,
            description: String::new(),
            active: true,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Lookup key of this rule
    pub fn type_pair(&self) -> (ComponentType, ComponentType) {
        (self.source_type, self.target_type)
    }

    /// Check the structural invariants of a rule
    pub fn validate(&self) -> Result<()> {
        if self.source_type == self.target_type {
            return Err(ModelError::SameTypeRule(self.source_type));
        }
        if self.source_key.trim().is_empty() {
            return Err(ModelError::EmptySpecKey("source_key"));
        }
        if self.target_key.trim().is_empty() {
            return Err(ModelError::EmptySpecKey("target_key"));
        }
        Ok(())
    }

    /// Same constraint expressed from the other component's side
    ///
    /// Returns `None` when the operator cannot be mirrored.
    pub fn mirrored(&self) -> Option<CompatibilityRule> {
        let operator = self.operator.mirrored()?;
        Some(CompatibilityRule {
            id: self.id,
            source_type: self.target_type,
            target_type: self.source_type,
            source_key: self.target_key.clone(),
            target_key: self.source_key.clone(),
            operator,
            description: self.description.clone(),
            active: self.active,
        })
    }
}
