//! Component types and components
//!
//! `ComponentType` is the closed classification used as the key for rule
//! lookup; `Component` is a catalog entry with its attribute bag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::ModelError;
use crate::specs::SpecMap;

// ============================================================================
// Component Type
// ============================================================================

/// Hardware slot or peripheral classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentType {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "MB", alias = "MOTHERBOARD")]
    Motherboard,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "PSU")]
    Psu,
    #[serde(rename = "CASE")]
    Case,
    #[serde(rename = "COOLER")]
    Cooler,
    #[serde(rename = "STORAGE")]
    Storage,

    // Peripherals
    #[serde(rename = "MONITOR")]
    Monitor,
    #[serde(rename = "KEYBOARD")]
    Keyboard,
    #[serde(rename = "MOUSE")]
    Mouse,
    #[serde(rename = "HEADSET")]
    Headset,
    #[serde(rename = "SPEAKERS")]
    Speakers,
    #[serde(rename = "WEBCAM")]
    Webcam,
    #[serde(rename = "PRINTER")]
    Printer,
    #[serde(rename = "SCANNER")]
    Scanner,
    #[serde(rename = "GAMEPAD")]
    Gamepad,
    #[serde(rename = "NETWORK")]
    Network,
    #[serde(rename = "HEADPHONES")]
    Headphones,
    #[serde(rename = "MOUSEPAD")]
    Mousepad,
    #[serde(rename = "MICROPHONE")]
    Microphone,
}

impl ComponentType {
    /// Every type in declaration order
    pub const ALL: [ComponentType; 21] = [
        ComponentType::Cpu,
        ComponentType::Gpu,
        ComponentType::Motherboard,
        ComponentType::Ram,
        ComponentType::Psu,
        ComponentType::Case,
        ComponentType::Cooler,
        ComponentType::Storage,
        ComponentType::Monitor,
        ComponentType::Keyboard,
        ComponentType::Mouse,
        ComponentType::Headset,
        ComponentType::Speakers,
        ComponentType::Webcam,
        ComponentType::Printer,
        ComponentType::Scanner,
        ComponentType::Gamepad,
        ComponentType::Network,
        ComponentType::Headphones,
        ComponentType::Mousepad,
        ComponentType::Microphone,
    ];

    /// Short code used in rule tables and serialized data ("CPU", "MB", ...)
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Gpu => "GPU",
            Self::Motherboard => "MB",
            Self::Ram => "RAM",
            Self::Psu => "PSU",
            Self::Case => "CASE",
            Self::Cooler => "COOLER",
            Self::Storage => "STORAGE",
            Self::Monitor => "MONITOR",
            Self::Keyboard => "KEYBOARD",
            Self::Mouse => "MOUSE",
            Self::Headset => "HEADSET",
            Self::Speakers => "SPEAKERS",
            Self::Webcam => "WEBCAM",
            Self::Printer => "PRINTER",
            Self::Scanner => "SCANNER",
            Self::Gamepad => "GAMEPAD",
            Self::Network => "NETWORK",
            Self::Headphones => "HEADPHONES",
            Self::Mousepad => "MOUSEPAD",
            Self::Microphone => "MICROPHONE",
        }
    }

    /// Human-readable name for messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cpu => "Processor",
            Self::Gpu => "Graphics card",
            Self::Motherboard => "Motherboard",
            Self::Ram => "Memory",
            Self::Psu => "Power supply",
            Self::Case => "Case",
            Self::Cooler => "Cooler",
            Self::Storage => "Storage",
            Self::Monitor => "Monitor",
            Self::Keyboard => "Keyboard",
            Self::Mouse => "Mouse",
            Self::Headset => "Headset",
            Self::Speakers => "Speakers",
            Self::Webcam => "Webcam",
            Self::Printer => "Printer",
            Self::Scanner => "Scanner",
            Self::Gamepad => "Gamepad",
            Self::Network => "Network equipment",
            Self::Headphones => "Headphones",
            Self::Mousepad => "Mouse pad",
            Self::Microphone => "Microphone",
        }
    }

    /// Peripherals sit outside the case and are never constrained by rules
    /// against one another
    pub fn is_peripheral(&self) -> bool {
        !matches!(
            self,
            Self::Cpu
                | Self::Gpu
                | Self::Motherboard
                | Self::Ram
                | Self::Psu
                | Self::Case
                | Self::Cooler
                | Self::Storage
        )
    }

    /// Fallback draw in watts when a component publishes no usable figure
    pub fn base_power_watts(&self) -> i64 {
        base_power_watts(*self)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ComponentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        if wanted == "MOTHERBOARD" {
            return Ok(Self::Motherboard);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code() == wanted)
            .ok_or_else(|| ModelError::UnknownComponentType(s.to_string()))
    }
}

// ============================================================================
// Base Power Table
// ============================================================================

/// Per-type fallback power draw in watts; types not listed draw
/// `DEFAULT_BASE_POWER_WATTS`
pub const BASE_POWER_WATTS: &[(ComponentType, i64)] = &[
    (ComponentType::Cpu, 100),
    (ComponentType::Gpu, 200),
    (ComponentType::Ram, 5),
    (ComponentType::Motherboard, 30),
    (ComponentType::Storage, 10),
    (ComponentType::Cooler, 5),
    (ComponentType::Case, 0),
    (ComponentType::Psu, 0),
];

const DEFAULT_BASE_POWER_WATTS: i64 = 10;

/// Look up the fallback power draw for a component type
pub fn base_power_watts(component_type: ComponentType) -> i64 {
    BASE_POWER_WATTS
        .iter()
        .find(|(t, _)| *t == component_type)
        .map(|(_, watts)| *watts)
        .unwrap_or(DEFAULT_BASE_POWER_WATTS)
}

// ============================================================================
// Component
// ============================================================================

/// Catalog entry for a single hardware part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier
    pub id: i64,

    /// Product title
    #[serde(default)]
    pub name: String,

    /// Slot classification
    #[serde(rename = "type", alias = "component_type")]
    pub component_type: ComponentType,

    /// Named attributes used by rules and analysis
    #[serde(default)]
    pub specs: SpecMap,

    /// Unit price
    #[serde(default)]
    pub price: f64,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,
}

impl Component {
    pub fn new(id: i64, name: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            id,
            name: name.into(),
            component_type,
            specs: SpecMap::new(),
            price: 0.0,
            stock: 0,
        }
    }

    /// Builder-style attribute setter
    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.specs.insert(key, value);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Attribute value, `""` when absent
    pub fn spec(&self, key: &str) -> &str {
        self.specs.get(key)
    }

    /// Title for messages; falls back to "<type> #<id>" for untitled parts
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("{} #{}", self.component_type.display_name(), self.id)
        } else {
            self.name.clone()
        }
    }

    pub fn is_peripheral(&self) -> bool {
        self.component_type.is_peripheral()
    }

    /// Estimated draw in watts
    ///
    /// Reads "power_consumption", falling back to "tdp" when that key is absent.
    /// An absent or unparseable figure falls back to the per-type base table.
    /// Power supplies deliver power and always draw 0.
    pub fn power_draw_watts(&self) -> i64 {
        if self.component_type == ComponentType::Psu {
            return 0;
        }

        let (field, raw) = match self.spec("power_consumption") {
            "" => ("tdp", self.spec("tdp")),
            value => ("power_consumption", value),
        };

        if raw.is_empty() {
            let base = self.component_type.base_power_watts();
            debug!("{}: no power figure, base {}W", self.display_name(), base);
            return base;
        }

        match raw.trim().parse::<i64>() {
            Ok(watts) => {
                debug!("{}: {}W (from {})", self.display_name(), watts, field);
                watts
            },
            Err(_) => {
                let base = self.component_type.base_power_watts();
                warn!(
                    "{}: unparseable {} '{}', base {}W",
                    self.display_name(),
                    field,
                    raw,
                    base
                );
                base
            },
        }
    }
}

/// Total estimated draw of `components`, in watts
///
/// Fails instead of wrapping when the sum does not fit in an `i64`.
pub fn total_power_draw<'a>(
    components: impl IntoIterator<Item = &'a Component>,
) -> Result<i64, ModelError> {
    components.into_iter().try_fold(0i64, |total, c| {
        total
            .checked_add(c.power_draw_watts())
            .ok_or_else(|| ModelError::PowerDrawOverflow(c.display_name()))
    })
}
