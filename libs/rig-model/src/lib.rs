//! Rig Model - data model for PC configurations
//!
//! Provides the plain-data side of the compatibility engine:
//! - Component types (core hardware slots and peripherals)
//! - Components with a string-keyed attribute bag (`SpecMap`)
//! - Directional compatibility rules and their comparison operators
//! - Configurations holding at most one component per type, with derived totals

pub mod component;
pub mod configuration;
pub mod error;
pub mod rule;
pub mod specs;

pub use component::{
    base_power_watts, total_power_draw, Component, ComponentType, BASE_POWER_WATTS,
};
pub use configuration::Configuration;
pub use error::{ModelError, Result};
pub use rule::{CompatibilityRule, Operator};
pub use specs::{parse_number, SpecMap};
