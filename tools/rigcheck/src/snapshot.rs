//! Catalog snapshot and rule file loading
//!
//! Files are YAML (`.yaml` / `.yml`) or JSON (`.json`), chosen by extension.

use anyhow::{bail, Context, Result};
use rig_compat::{CatalogSnapshot, CompatibilityRule};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Load a catalog snapshot with `components` and `rules`
pub fn load_snapshot(path: &Path) -> Result<CatalogSnapshot> {
    let snapshot: CatalogSnapshot = load_file(path)?;
    debug!(
        "Loaded {}: {} components, {} rules",
        path.display(),
        snapshot.components.len(),
        snapshot.rules.len()
    );
    Ok(snapshot)
}

/// Load a single rule definition
pub fn load_rule(path: &Path) -> Result<CompatibilityRule> {
    load_file(path)
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid YAML in {}", path.display())),
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in {}", path.display())),
        other => bail!(
            "Unsupported file format '{}' for {} (expected yaml, yml or json)",
            other,
            path.display()
        ),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use rig_compat::{ComponentType, Operator};
    use std::io::Write;

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml_snapshot() {
        let file = temp_file(
            ".yaml",
            r#"
components:
  - id: 1
    name: Ryzen 5 7600
    type: CPU
    specs:
      socket: AM5
      tdp: "65"
  - id: 2
    name: B650M
    type: MOTHERBOARD
    specs:
      socket: AM5
rules:
  - source_type: CPU
    target_type: MB
    source_key: socket
    target_key: socket
    operator: "="
    description: CPU socket must match the motherboard
"#,
        );

        let snapshot = load_snapshot(file.path()).unwrap();

        assert_eq!(snapshot.components.len(), 2);
        assert_eq!(snapshot.components[1].component_type, ComponentType::Motherboard);
        assert_eq!(snapshot.components[0].spec("tdp"), "65");
        assert_eq!(snapshot.rules[0].operator, Operator::Equals);
        assert!(snapshot.rules[0].active);
    }

    #[test]
    fn test_load_json_rule() {
        let file = temp_file(
            ".json",
            r#"{"source_type": "GPU", "target_type": "CASE",
                "source_key": "length", "target_key": "max_gpu_length",
                "operator": "LESS_THAN_EQUALS"}"#,
        );

        let rule = load_rule(file.path()).unwrap();
        assert_eq!(rule.operator, Operator::LessThanEquals);
        assert!(rule.id.is_none());
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let file = temp_file(".txt", "components: []");
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_rejects_unknown_operator() {
        let file = temp_file(
            ".yaml",
            "source_type: CPU\ntarget_type: MB\nsource_key: a\ntarget_key: b\noperator: ROUGHLY\n",
        );
        assert!(load_rule(file.path()).is_err());
    }
}
