//! Engine configuration
//!
//! Loaded with figment from (lowest to highest priority):
//! 1. Built-in defaults
//! 2. An optional TOML / YAML / JSON file
//! 3. `RIG_`-prefixed environment variables (`RIG_THRESHOLDS__MIN_RAM_GB=16`)

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use rig_model::ComponentType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{CompatError, Result};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "RIG_";

/// Compatibility engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Slots a configuration must fill to be buildable
    pub required_types: Vec<ComponentType>,

    /// Also index mirrorable rules under the reversed type pair
    ///
    /// Off by default: rules are directional and configuration-level checks
    /// try both orientations.
    pub symmetric_rules: bool,

    /// Numeric limits used by the analysis dimensions
    pub thresholds: AnalysisThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            required_types: vec![
                ComponentType::Cpu,
                ComponentType::Motherboard,
                ComponentType::Ram,
                ComponentType::Psu,
                ComponentType::Storage,
                ComponentType::Case,
            ],
            symmetric_rules: false,
            thresholds: AnalysisThresholds::default(),
        }
    }
}

/// Analysis limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    /// Recommended PSU rating as a multiple of the estimated draw
    pub psu_headroom: f64,
    /// Load fraction above which the PSU is considered heavily loaded
    pub high_load_ratio: f64,
    /// Load fraction below which the PSU is considered oversized
    pub low_load_ratio: f64,
    /// CPU/GPU score ratio that warns about a bottleneck
    pub imbalance_warning_ratio: f64,
    /// CPU/GPU score ratio that recommends rebalancing
    pub imbalance_recommendation_ratio: f64,
    /// Memory below this many GB is insufficient
    pub min_ram_gb: u64,
    /// Memory above this many GB is likely oversized
    pub max_ram_gb: u64,
    /// CPU TDP above this fraction of the cooler rating leaves little headroom
    pub thermal_headroom_ratio: f64,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            psu_headroom: 1.2,
            high_load_ratio: 0.8,
            low_load_ratio: 0.3,
            imbalance_warning_ratio: 2.0,
            imbalance_recommendation_ratio: 1.5,
            min_ram_gb: 8,
            max_ram_gb: 64,
            thermal_headroom_ratio: 0.8,
        }
    }
}

impl EngineConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));

        if let Some(path) = path {
            let extension = path
                .extension()
                .and_then(|s| s.to_str())
                .ok_or_else(|| CompatError::Config("Config file must have an extension".into()))?;

            figment = match extension {
                "toml" => figment.merge(Toml::file(path)),
                "yaml" | "yml" => figment.merge(Yaml::file(path)),
                "json" => figment.merge(Json::file(path)),
                _ => {
                    return Err(CompatError::Config(format!(
                        "Unsupported config file format: {}",
                        extension
                    )))
                },
            };
            debug!("Engine config file: {}", path.display());
        }

        let config: EngineConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    pub fn is_required(&self, component_type: ComponentType) -> bool {
        self.required_types.contains(&component_type)
    }
}
