//! Terminal and JSON rendering of check results

use colored::*;
use rig_compat::{
    AnalysisResult, AnalysisStatus, CompatibilityIssue, CompatibilityRule, Component,
    Configuration, IssueSeverity,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Analysis result with its derived summary fields
pub fn analysis_json(result: &AnalysisResult) -> Value {
    json!({
        "compatible": result.compatible,
        "status": result.status(),
        "score": result.score(),
        "summary": result.summary(),
        "status_message": result.status_message(),
        "recommendation": result.recommendation(),
        "counts": {
            "critical_errors": result.critical_error_count(),
            "warnings": result.warning_count(),
            "recommendations": result.recommendation_count(),
        },
        "issues": result.issues,
    })
}

pub fn totals_json(build: &Configuration) -> Value {
    json!({
        "components": build.len(),
        "price": build.total_price(),
        "performance": build.total_performance(),
        "estimated_power_watts": build.estimated_power_watts().ok(),
    })
}

pub fn totals_line(build: &Configuration) -> String {
    let draw = match build.estimated_power_watts() {
        Ok(watts) => format!("~{}W draw", watts),
        Err(_) => "draw unknown".to_string(),
    };
    format!(
        "{} {} parts, {:.2} total, {}",
        "Totals:".bright_cyan(),
        build.len(),
        build.total_price(),
        draw
    )
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn severity_label(severity: IssueSeverity) -> ColoredString {
    match severity {
        IssueSeverity::CriticalError => "CRITICAL".red().bold(),
        IssueSeverity::Warning => "WARNING".yellow(),
        IssueSeverity::Recommendation => "HINT".bright_cyan(),
    }
}

fn status_label(status: AnalysisStatus) -> ColoredString {
    match status {
        AnalysisStatus::Critical => "CRITICAL".red().bold(),
        AnalysisStatus::Warning => "WARNING".yellow().bold(),
        AnalysisStatus::Good => "GOOD".green(),
        AnalysisStatus::Excellent => "EXCELLENT".bright_green().bold(),
    }
}

/// One line per component: "#id TYPE name"
pub fn component_line(component: &Component) -> String {
    format!(
        "#{:<5} {:<10} {}",
        component.id,
        component.component_type.code(),
        component.display_name()
    )
}

pub fn rule_line(rule: &CompatibilityRule) -> String {
    let id = rule
        .id
        .map(|id| format!("#{}", id))
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!(
        "{:<5} {}.{} {} {}.{}",
        id,
        rule.source_type,
        rule.source_key,
        rule.operator.symbol(),
        rule.target_type,
        rule.target_key
    );
    if !rule.description.is_empty() {
        line.push_str(&format!("  ({})", rule.description));
    }
    if !rule.active {
        line.push_str(" [inactive]");
    }
    line
}

fn issue_lines(issue: &CompatibilityIssue) -> Vec<String> {
    let mut lines = vec![format!(
        "  {} [{}] {}",
        severity_label(issue.severity),
        issue.category,
        issue.title.bold()
    )];
    lines.push(format!("      {}", issue.description));
    if let Some((first, second)) = &issue.components {
        lines.push(format!("      {} {} / {}", "between".dimmed(), first, second));
    }
    lines
}

pub fn print_analysis(result: &AnalysisResult) {
    println!(
        "{} {}  score {:.0}  ({})",
        "Status:".bright_cyan(),
        status_label(result.status()),
        result.score(),
        result.summary()
    );
    println!("{}", result.status_message());
    println!();

    for issue in &result.issues {
        for line in issue_lines(issue) {
            println!("{}", line);
        }
    }
    if !result.issues.is_empty() {
        println!();
    }
    println!("{} {}", "Recommendation:".bright_cyan(), result.recommendation());
}
