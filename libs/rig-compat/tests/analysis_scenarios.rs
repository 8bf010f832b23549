//! Integration tests for the compatibility service
//!
//! Runs full checks and analyses against an in-memory catalog and rule store.

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use rig_compat::{
    CatalogSnapshot, CompatError, CompatibilityRule, CompatibilityService, Component,
    ComponentType, EngineConfig, InMemoryStore, IssueCategory, IssueSeverity, Operator,
    SAME_TYPE_REASON,
};
use std::sync::Arc;

type Service = CompatibilityService<InMemoryStore, InMemoryStore>;

/// Rules in both orientations where a constraint should bind either way
fn rules() -> Vec<CompatibilityRule> {
    vec![
        CompatibilityRule::new(
            ComponentType::Cpu,
            ComponentType::Motherboard,
            "socket",
            "socket",
            Operator::Equals,
        )
        .with_description("CPU socket must match the motherboard socket"),
        CompatibilityRule::new(
            ComponentType::Motherboard,
            ComponentType::Cpu,
            "socket",
            "socket",
            Operator::Equals,
        )
        .with_description("Motherboard socket must match the CPU socket"),
        CompatibilityRule::new(
            ComponentType::Ram,
            ComponentType::Motherboard,
            "memory_type",
            "memory_type",
            Operator::Equals,
        )
        .with_description("Memory type must be supported by the motherboard"),
        CompatibilityRule::new(
            ComponentType::Motherboard,
            ComponentType::Ram,
            "memory_type",
            "memory_type",
            Operator::Equals,
        )
        .with_description("Memory type must be supported by the motherboard"),
        CompatibilityRule::new(
            ComponentType::Gpu,
            ComponentType::Motherboard,
            "interface",
            "pcie_slots",
            Operator::Contains,
        )
        .with_description("Graphics card interface must be available on the motherboard"),
    ]
}

fn base_build() -> Vec<Component> {
    vec![
        Component::new(1, "Ryzen 7 7700X", ComponentType::Cpu)
            .with_spec("socket", "AM5")
            .with_spec("tdp", "105")
            .with_spec("performance_score", "90"),
        Component::new(2, "B650 Tomahawk", ComponentType::Motherboard)
            .with_spec("socket", "AM5")
            .with_spec("memory_type", "DDR5")
            .with_spec("pcie_slots", "PCIe 4.0 x16"),
        Component::new(3, "32GB DDR5 Kit", ComponentType::Ram)
            .with_spec("memory_type", "DDR5")
            .with_spec("capacity", "32GB"),
        Component::new(4, "RM650", ComponentType::Psu).with_spec("power", "650"),
        Component::new(5, "990 Pro", ComponentType::Storage).with_spec("type", "NVMe SSD"),
        Component::new(6, "Meshify C", ComponentType::Case).with_spec("max_gpu_length", "315"),
    ]
}

fn service_with(components: Vec<Component>) -> Service {
    let store = Arc::new(InMemoryStore::from_snapshot(CatalogSnapshot {
        components,
        rules: rules(),
    }));
    CompatibilityService::new(store.clone(), store, EngineConfig::default())
}

fn service() -> Service {
    service_with(base_build())
}

fn find(components: &[Component], t: ComponentType) -> Component {
    components
        .iter()
        .find(|c| c.component_type == t)
        .cloned()
        .unwrap()
}

fn replace(mut components: Vec<Component>, component: Component) -> Vec<Component> {
    components.retain(|c| c.component_type != component.component_type);
    components.push(component);
    components
}

// ============================================================================
// Pairwise properties
// ============================================================================

#[test]
fn test_same_type_never_compatible() {
    let service = service();
    for t in ComponentType::ALL {
        let a = Component::new(100, "A", t);
        let b = Component::new(101, "B", t);
        assert!(!service.check_components_compatibility(&a, &b).unwrap(), "{}", t);
    }
}

#[test]
fn test_no_rules_means_compatible() {
    let service = service();
    let cooler = Component::new(7, "NH-D15", ComponentType::Cooler).with_spec("socket", "LGA1700");
    let storage = Component::new(5, "990 Pro", ComponentType::Storage);

    assert!(service.check_components_compatibility(&cooler, &storage).unwrap());
    assert!(service.check_components_compatibility(&storage, &cooler).unwrap());
}

#[test]
fn test_pcie_rule_through_service() {
    let service = service();
    let board = find(&base_build(), ComponentType::Motherboard);
    let gen3 = Component::new(8, "Gen3 card", ComponentType::Gpu).with_spec("interface", "PCIe 3.0 x16");
    let gen5 = Component::new(9, "Gen5 card", ComponentType::Gpu).with_spec("interface", "PCIe 5.0 x16");

    assert!(service.check_components_compatibility(&gen3, &board).unwrap());
    assert!(!service.check_components_compatibility(&gen5, &board).unwrap());
}

#[test]
fn test_configuration_compatibility_and_details() {
    let service = service();
    let build = base_build();
    let intel = Component::new(10, "Core i7-14700K", ComponentType::Cpu).with_spec("socket", "LGA1700");
    let others: Vec<Component> = build
        .iter()
        .filter(|c| c.component_type != ComponentType::Cpu)
        .cloned()
        .collect();

    assert!(service
        .check_configuration_compatibility(&find(&build, ComponentType::Cpu), &others)
        .unwrap());
    assert!(!service.check_configuration_compatibility(&intel, &others).unwrap());

    let details = service.incompatibility_details(&intel, &build).unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].component_id, 1);
    assert_eq!(details[0].reason, SAME_TYPE_REASON);
    assert_eq!(details[1].component_id, 2);
    assert_eq!(details[1].reason, "CPU socket must match the motherboard socket");
}

#[test]
fn test_compatible_components_filters_catalog() {
    let mut catalog = base_build();
    catalog.push(
        Component::new(11, "Z790 Hero", ComponentType::Motherboard)
            .with_spec("socket", "LGA1700")
            .with_spec("memory_type", "DDR5"),
    );
    let service = service_with(catalog);
    let cpu = service.component(1).unwrap();

    let boards = service
        .compatible_components(&cpu, ComponentType::Motherboard)
        .unwrap();
    assert_eq!(boards.iter().map(|b| b.id).collect::<Vec<_>>(), vec![2]);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validator_and_analyzer_agree() {
    let service = service();
    let good = base_build();
    let bad_ram = replace(
        base_build(),
        Component::new(3, "16GB DDR4", ComponentType::Ram)
            .with_spec("memory_type", "DDR4")
            .with_spec("capacity", "16GB"),
    );
    let missing_psu: Vec<Component> = base_build()
        .into_iter()
        .filter(|c| c.component_type != ComponentType::Psu)
        .collect();

    for components in [good, bad_ram, missing_psu] {
        let valid = service.validate_configuration(&components).unwrap();
        let issues = service.configuration_issues(&components).unwrap();
        let analysis = service.analyze_configuration(&components);
        let blocking = analysis.issues.iter().any(|i| {
            i.severity == IssueSeverity::CriticalError
                && matches!(
                    i.category,
                    IssueCategory::MissingComponent | IssueCategory::Compatibility
                )
        });

        assert_eq!(valid, issues.is_empty());
        assert_eq!(valid, !blocking);
    }
}

#[test]
fn test_empty_configuration() {
    let service = service();

    assert!(service.validate_configuration(&[]).unwrap());

    let result = service.analyze_configuration(&[]);
    assert!(!result.compatible);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].severity, IssueSeverity::CriticalError);
}

// ============================================================================
// Analysis
// ============================================================================

#[test]
fn test_clean_build_is_compatible() {
    let result = service().analyze_configuration(&base_build());

    assert!(result.compatible);
    assert_eq!(result.critical_error_count(), 0);
    // oversized PSU, single memory module
    assert_eq!(result.recommendation_count(), 2);
}

#[test]
fn test_missing_required_type_always_reported() {
    let service = service();
    let without_case: Vec<Component> = base_build()
        .into_iter()
        .filter(|c| c.component_type != ComponentType::Case)
        .chain([Component::new(20, "Gen5 card", ComponentType::Gpu).with_spec("interface", "PCIe 5.0")])
        .collect();

    let result = service.analyze_configuration(&without_case);

    assert!(!result.compatible);
    assert!(result.issues.iter().any(|i| i.category == IssueCategory::MissingComponent
        && i.severity == IssueSeverity::CriticalError
        && i.description.contains("(CASE)")));
}

#[test]
fn test_power_scenarios() {
    let service = service();
    let build_drawing = |watts: i64| {
        vec![
            Component::new(4, "PSU", ComponentType::Psu).with_spec("power", "500"),
            Component::new(1, "CPU", ComponentType::Cpu)
                .with_spec("power_consumption", watts.to_string()),
        ]
    };
    let power_issues = |watts: i64| {
        service
            .analyze_configuration(&build_drawing(watts))
            .issues
            .into_iter()
            .filter(|i| i.category == IssueCategory::Power)
            .collect::<Vec<_>>()
    };

    let over = power_issues(600);
    assert_eq!(over.len(), 1);
    assert_eq!(over[0].severity, IssueSeverity::CriticalError);
    assert!(over[0].description.contains("720W"));

    let high = power_issues(450);
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].severity, IssueSeverity::Warning);

    let low = power_issues(100);
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].severity, IssueSeverity::Recommendation);

    assert!(power_issues(200).is_empty());
}

#[test]
fn test_thermal_scenarios() {
    let service = service();
    let thermal = |tdp: &str| {
        let components = vec![
            Component::new(1, "CPU", ComponentType::Cpu).with_spec("tdp", tdp),
            Component::new(7, "Cooler", ComponentType::Cooler).with_spec("max_tdp", "100"),
        ];
        service
            .analyze_configuration(&components)
            .issues
            .into_iter()
            .filter(|i| i.category == IssueCategory::Thermal)
            .map(|i| i.severity)
            .collect::<Vec<_>>()
    };

    assert_eq!(thermal("150"), vec![IssueSeverity::CriticalError]);
    assert_eq!(thermal("95"), vec![IssueSeverity::Warning]);
    assert!(thermal("50").is_empty());
}

#[test]
fn test_gpu_too_long_for_case() {
    let build = replace(
        base_build(),
        Component::new(12, "RTX 4090", ComponentType::Gpu)
            .with_spec("interface", "PCIe 4.0 x16")
            .with_spec("length", "336")
            .with_spec("performance_score", "100"),
    );

    let result = service().analyze_configuration(&build);

    let physical = result
        .critical_errors()
        .into_iter()
        .filter(|i| i.category == IssueCategory::Physical)
        .count();
    assert_eq!(physical, 1);
    assert!(!result.compatible);
}

#[test]
fn test_issue_order_follows_dimensions() {
    let build = vec![
        Component::new(1, "CPU", ComponentType::Cpu)
            .with_spec("socket", "AM5")
            .with_spec("tdp", "150")
            .with_spec("performance_score", "30"),
        Component::new(2, "Board", ComponentType::Motherboard).with_spec("socket", "AM4"),
        Component::new(7, "Cooler", ComponentType::Cooler).with_spec("max_tdp", "100"),
        Component::new(12, "GPU", ComponentType::Gpu).with_spec("performance_score", "100"),
    ];

    let result = service().analyze_configuration(&build);
    let categories: Vec<IssueCategory> = result.issues.iter().map(|i| i.category).collect();

    let first = |c: IssueCategory| categories.iter().position(|x| *x == c).unwrap();
    assert!(first(IssueCategory::MissingComponent) < first(IssueCategory::Compatibility));
    assert!(first(IssueCategory::Compatibility) < first(IssueCategory::Balance));
    assert!(first(IssueCategory::Balance) < first(IssueCategory::Thermal));
}

// ============================================================================
// Rule authoring
// ============================================================================

#[test]
fn test_rule_conflicts() {
    let service = service();

    let contradicting = CompatibilityRule::new(
        ComponentType::Cpu,
        ComponentType::Motherboard,
        "socket",
        "socket",
        Operator::NotEquals,
    );
    assert!(!service.check_rule_conflicts(&contradicting).unwrap().is_empty());

    let unrelated = CompatibilityRule::new(
        ComponentType::Cpu,
        ComponentType::Motherboard,
        "chipset_support",
        "chipset",
        Operator::Contains,
    );
    assert!(service.check_rule_conflicts(&unrelated).unwrap().is_empty());

    match service.save_rule(contradicting) {
        Err(CompatError::RuleConflict(conflicts)) => assert_eq!(conflicts.len(), 1),
        other => panic!("expected conflict, got {:?}", other),
    }
    assert!(service.save_rule(unrelated).is_ok());
}
