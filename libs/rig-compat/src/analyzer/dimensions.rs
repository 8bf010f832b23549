//! Built-in analysis dimensions, in execution order

use rig_model::{parse_number, total_power_draw, Component, ComponentType};
use tracing::{debug, info};

use super::{AnalysisContext, AnalysisDimension, CompatibilityIssue, IssueCategory, IssueSeverity};
use crate::error::{CompatError, Result};
use crate::validator::ConfigurationValidator;

/// The seven dimensions run by `ConfigurationAnalyzer::new`
pub fn builtin_dimensions() -> Vec<Box<dyn AnalysisDimension>> {
    vec![
        Box::new(RequiredComponents),
        Box::new(PairwiseCompatibility),
        Box::new(PowerConsumption),
        Box::new(PerformanceBalance),
        Box::new(Thermal),
        Box::new(PhysicalFit),
        Box::new(Optimization),
    ]
}

// ============================================================================
// Required components
// ============================================================================

/// One CRITICAL_ERROR per required type with no component
pub struct RequiredComponents;

impl AnalysisDimension for RequiredComponents {
    fn name(&self) -> &'static str {
        "Required components"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::MissingComponent
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) -> Result<()> {
        let validator = ConfigurationValidator::new(ctx.checker, &ctx.config.required_types);

        for missing in validator.missing_types(ctx.components) {
            issues.push(CompatibilityIssue::critical(
                IssueCategory::MissingComponent,
                "Missing required component",
                format!(
                    "Missing required component: {} ({})",
                    missing.display_name(),
                    missing.code()
                ),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Pairwise compatibility
// ============================================================================

/// One issue per unordered pair failing in both orientations
pub struct PairwiseCompatibility;

impl PairwiseCompatibility {
    /// Severity from the wording of the violation
    pub fn severity_for(reason: &str) -> IssueSeverity {
        let lower = reason.to_lowercase();
        if ["socket", "incompatible", "same type"]
            .iter()
            .any(|k| lower.contains(k))
        {
            return IssueSeverity::CriticalError;
        }
        if ["performance", "balance", "recommend", "insufficient"]
            .iter()
            .any(|k| lower.contains(k))
        {
            return IssueSeverity::Warning;
        }
        IssueSeverity::CriticalError
    }

    /// Category from the wording of the violation
    pub fn category_for(reason: &str) -> IssueCategory {
        let lower = reason.to_lowercase();
        if lower.contains("performance") || lower.contains("balance") {
            IssueCategory::Balance
        } else if lower.contains("power") || lower.contains("wattage") {
            IssueCategory::Power
        } else if lower.contains("length") || lower.contains("size") {
            IssueCategory::Physical
        } else {
            IssueCategory::Compatibility
        }
    }
}

impl AnalysisDimension for PairwiseCompatibility {
    fn name(&self) -> &'static str {
        "Compatibility"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::Compatibility
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) -> Result<()> {
        let components = ctx.components;

        for (i, a) in components.iter().enumerate() {
            for b in &components[i + 1..] {
                let Some(reason) = ctx.checker.pair_reason(a, b) else {
                    continue;
                };
                issues.push(
                    CompatibilityIssue::new(
                        Self::severity_for(&reason),
                        Self::category_for(&reason),
                        "Incompatible components",
                        reason,
                    )
                    .between(a.display_name(), b.display_name()),
                );
            }
        }
        Ok(())
    }
}

// ============================================================================
// Power
// ============================================================================

/// PSU rating against the estimated draw of everything else
pub struct PowerConsumption;

impl PowerConsumption {
    fn total_draw(components: &[Component]) -> Result<i64> {
        total_power_draw(components).map_err(|e| CompatError::Analysis(e.to_string()))
    }
}

impl AnalysisDimension for PowerConsumption {
    fn name(&self) -> &'static str {
        "Power"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::Power
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) -> Result<()> {
        let Some(psu) = ctx.first_of(ComponentType::Psu) else {
            // reported by the required-components dimension
            return Ok(());
        };

        let raw = match psu.spec("power") {
            "" => psu.spec("wattage"),
            value => value,
        };

        if raw.is_empty() {
            issues.push(CompatibilityIssue::warning(
                IssueCategory::Power,
                "Unknown PSU rating",
                "The power supply does not state its output, so power sufficiency cannot be checked",
            ));
            return Ok(());
        }

        let rated = match raw.trim().parse::<i64>() {
            Ok(watts) => watts,
            Err(_) => {
                issues.push(CompatibilityIssue::warning(
                    IssueCategory::Power,
                    "Invalid PSU rating",
                    format!("Cannot determine the power supply output from '{}'", raw),
                ));
                return Ok(());
            },
        };

        let total = Self::total_draw(ctx.components)?;
        let thresholds = &ctx.config.thresholds;
        // only evaluated on branches where rated > 0
        let load = || total as f64 / rated as f64 * 100.0;
        info!("Power analysis: PSU {}W, estimated draw {}W", rated, total);

        if total > rated {
            let recommended = (total as f64 * thresholds.psu_headroom) as i64;
            issues.push(CompatibilityIssue::critical(
                IssueCategory::Power,
                "Insufficient power supply",
                format!(
                    "The selected power supply ({}W) cannot run this configuration. \
                     At least {}W is required; a {}W or higher unit is recommended.",
                    rated, total, recommended
                ),
            ));
        } else if total as f64 > rated as f64 * thresholds.high_load_ratio {
            issues.push(CompatibilityIssue::warning(
                IssueCategory::Power,
                "High PSU load",
                format!(
                    "Power supply load is {:.1}% (keep it under {:.0}%)",
                    load(),
                    thresholds.high_load_ratio * 100.0
                ),
            ));
        } else if rated > 0 && (total as f64) < rated as f64 * thresholds.low_load_ratio {
            issues.push(CompatibilityIssue::recommendation(
                IssueCategory::Power,
                "Oversized power supply",
                format!(
                    "Power supply load is only {:.1}%, a smaller unit would do",
                    load()
                ),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Performance balance
// ============================================================================

/// CPU/GPU score ratio, plus memory size
pub struct PerformanceBalance;

impl PerformanceBalance {
    fn cpu_gpu(ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) {
        let (Some(cpu), Some(gpu)) = (
            ctx.first_of(ComponentType::Cpu),
            ctx.first_of(ComponentType::Gpu),
        ) else {
            return;
        };
        let (Some(cpu_score), Some(gpu_score)) = (
            parse_number(cpu.spec("performance_score")),
            parse_number(gpu.spec("performance_score")),
        ) else {
            return;
        };

        let low = cpu_score.min(gpu_score);
        if low <= 0.0 {
            debug!("Non-positive performance score, balance skipped");
            return;
        }
        let ratio = cpu_score.max(gpu_score) / low;
        let thresholds = &ctx.config.thresholds;

        if ratio > thresholds.imbalance_warning_ratio {
            let bottleneck = if cpu_score < gpu_score {
                "processor"
            } else {
                "graphics card"
            };
            issues.push(
                CompatibilityIssue::warning(
                    IssueCategory::Balance,
                    "Performance imbalance",
                    format!(
                        "Significant imbalance between CPU and GPU (ratio {:.2}); the {} may become a bottleneck",
                        ratio, bottleneck
                    ),
                )
                .between(cpu.display_name(), gpu.display_name()),
            );
        } else if ratio > thresholds.imbalance_recommendation_ratio {
            issues.push(CompatibilityIssue::recommendation(
                IssueCategory::Balance,
                "Slight performance imbalance",
                "Consider a more balanced CPU to GPU pairing",
            ));
        }
    }

    fn memory(ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) {
        let Some(ram) = ctx.first_of(ComponentType::Ram) else {
            return;
        };
        let digits: String = ram
            .spec("capacity")
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let Ok(capacity) = digits.parse::<u64>() else {
            return;
        };
        let thresholds = &ctx.config.thresholds;

        if capacity < thresholds.min_ram_gb {
            issues.push(CompatibilityIssue::warning(
                IssueCategory::Performance,
                "Insufficient memory",
                format!(
                    "At least {}GB of RAM is recommended for current workloads",
                    thresholds.min_ram_gb
                ),
            ));
        } else if capacity > thresholds.max_ram_gb {
            issues.push(CompatibilityIssue::recommendation(
                IssueCategory::Performance,
                "Oversized memory",
                format!("{}GB of RAM is likely more than most workloads need", capacity),
            ));
        }
    }
}

impl AnalysisDimension for PerformanceBalance {
    fn name(&self) -> &'static str {
        "Performance balance"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::Balance
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) -> Result<()> {
        Self::cpu_gpu(ctx, issues);
        Self::memory(ctx, issues);
        Ok(())
    }
}

// ============================================================================
// Thermal
// ============================================================================

/// CPU TDP against the cooler rating
pub struct Thermal;

impl AnalysisDimension for Thermal {
    fn name(&self) -> &'static str {
        "Thermal"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::Thermal
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) -> Result<()> {
        let (Some(cpu), Some(cooler)) = (
            ctx.first_of(ComponentType::Cpu),
            ctx.first_of(ComponentType::Cooler),
        ) else {
            return Ok(());
        };
        let (Some(cpu_tdp), Some(cooler_tdp)) =
            (parse_number(cpu.spec("tdp")), parse_number(cooler.spec("max_tdp")))
        else {
            return Ok(());
        };

        if cpu_tdp > cooler_tdp {
            issues.push(
                CompatibilityIssue::critical(
                    IssueCategory::Thermal,
                    "Insufficient cooling",
                    format!(
                        "The cooler cannot handle the CPU (TDP {}W > {}W)",
                        cpu_tdp, cooler_tdp
                    ),
                )
                .between(cpu.display_name(), cooler.display_name()),
            );
        } else if cpu_tdp > cooler_tdp * ctx.config.thresholds.thermal_headroom_ratio {
            issues.push(CompatibilityIssue::warning(
                IssueCategory::Thermal,
                "Low cooling headroom",
                format!(
                    "CPU TDP {}W is close to the cooler limit of {}W; a cooler with more headroom is recommended",
                    cpu_tdp, cooler_tdp
                ),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Physical fit
// ============================================================================

/// Graphics card length against the case clearance
pub struct PhysicalFit;

impl AnalysisDimension for PhysicalFit {
    fn name(&self) -> &'static str {
        "Physical fit"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::Physical
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) -> Result<()> {
        let (Some(case), Some(gpu)) = (
            ctx.first_of(ComponentType::Case),
            ctx.first_of(ComponentType::Gpu),
        ) else {
            return Ok(());
        };
        let (Some(max_length), Some(length)) = (
            parse_number(case.spec("max_gpu_length")),
            parse_number(gpu.spec("length")),
        ) else {
            return Ok(());
        };

        if length > max_length {
            issues.push(
                CompatibilityIssue::critical(
                    IssueCategory::Physical,
                    "Graphics card does not fit",
                    format!(
                        "Graphics card length ({}mm) exceeds the case maximum ({}mm)",
                        length, max_length
                    ),
                )
                .between(gpu.display_name(), case.display_name()),
            );
        }
        Ok(())
    }
}

// ============================================================================
// Optimization
// ============================================================================

/// Non-blocking suggestions
pub struct Optimization;

impl AnalysisDimension for Optimization {
    fn name(&self) -> &'static str {
        "Optimization"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::Performance
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>, issues: &mut Vec<CompatibilityIssue>) -> Result<()> {
        let has_ssd = ctx.components.iter().any(|c| {
            c.component_type == ComponentType::Storage
                && c.spec("type").to_lowercase().contains("ssd")
        });
        if !has_ssd {
            issues.push(CompatibilityIssue::recommendation(
                IssueCategory::Performance,
                "SSD recommended",
                "An SSD greatly improves system and application load times",
            ));
        }

        if ctx.count_of(ComponentType::Ram) == 1 {
            issues.push(CompatibilityIssue::recommendation(
                IssueCategory::Performance,
                "Dual-channel memory recommended",
                "Two memory modules instead of one improve performance",
            ));
        }
        Ok(())
    }
}
