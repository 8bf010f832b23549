//! Configuration container
//!
//! A configuration is a user-assembled set holding at most one component per
//! type. Totals are derived on demand and never stored.

use serde::{Deserialize, Serialize};

use crate::component::{total_power_draw, Component, ComponentType};
use crate::error::{ModelError, Result};
use crate::specs::parse_number;

/// Set of components, at most one per component type, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Component>", into = "Vec<Component>")]
pub struct Configuration {
    components: Vec<Component>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, rejecting a second component of any type
    pub fn from_components(components: impl IntoIterator<Item = Component>) -> Result<Self> {
        let mut config = Self::new();
        for component in components {
            config.insert(component)?;
        }
        Ok(config)
    }

    /// Add a component; a type already present is an error
    pub fn insert(&mut self, component: Component) -> Result<()> {
        if self.get(component.component_type).is_some() {
            return Err(ModelError::DuplicateComponentType(component.component_type));
        }
        self.components.push(component);
        Ok(())
    }

    /// Add a component, returning the one it displaced of the same type
    pub fn replace(&mut self, component: Component) -> Option<Component> {
        match self
            .components
            .iter_mut()
            .find(|c| c.component_type == component.component_type)
        {
            Some(slot) => Some(std::mem::replace(slot, component)),
            None => {
                self.components.push(component);
                None
            },
        }
    }

    pub fn remove(&mut self, component_type: ComponentType) -> Option<Component> {
        let pos = self
            .components
            .iter()
            .position(|c| c.component_type == component_type)?;
        Some(self.components.remove(pos))
    }

    pub fn get(&self, component_type: ComponentType) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.component_type == component_type)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.components.iter().map(|c| c.component_type)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Sum of component prices
    pub fn total_price(&self) -> f64 {
        self.components.iter().map(|c| c.price).sum()
    }

    /// Sum of numeric "performance" specs; non-numeric or absent values count 0
    pub fn total_performance(&self) -> f64 {
        self.components
            .iter()
            .filter(|c| !c.is_peripheral())
            .filter_map(|c| parse_number(c.spec("performance")))
            .sum()
    }

    /// Estimated total draw of every non-PSU component, in watts
    pub fn estimated_power_watts(&self) -> Result<i64> {
        total_power_draw(&self.components)
    }
}

impl TryFrom<Vec<Component>> for Configuration {
    type Error = ModelError;

    fn try_from(components: Vec<Component>) -> Result<Self> {
        Self::from_components(components)
    }
}

impl From<Configuration> for Vec<Component> {
    fn from(config: Configuration) -> Self {
        config.components
    }
}
