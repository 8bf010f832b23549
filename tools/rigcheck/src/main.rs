//! Rigcheck - offline compatibility checks for rig builds
//!
//! Loads a catalog snapshot (components + rules) and runs the compatibility
//! engine against it: pair checks, configuration validation, full analysis,
//! catalog filtering and rule conflict checks.

mod report;
mod snapshot;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rig_compat::{CompatibilityService, ComponentType, EngineConfig, InMemoryStore};
use rig_model::Configuration;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

type Service = CompatibilityService<InMemoryStore, InMemoryStore>;

#[derive(Parser)]
#[command(name = "rigcheck")]
#[command(about = "Rigcheck - PC build compatibility checks")]
#[command(long_about = "Rigcheck - PC build compatibility checks

Commands:
  check       Check two components against each other
  validate    Validate a configuration (required slots + every pair)
  analyze     Full analysis: compatibility, power, balance, thermal, fit
  compatible  List catalog components of a type that fit a component
  conflicts   Check a rule file against the stored rules
  rules       List the rules touching a component type

Examples:
  rigcheck --catalog catalog.yaml check 1 2
  rigcheck --catalog catalog.yaml analyze 1 2 3 4 5 6
  rigcheck --catalog catalog.yaml compatible 1 MB
  rigcheck --catalog catalog.yaml --json conflicts new-rule.yaml")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog snapshot (YAML or JSON with `components` and `rules`)
    #[arg(long, global = true, env = "RIG_CATALOG", default_value = "catalog.yaml")]
    catalog: PathBuf,

    /// Engine configuration file (TOML, YAML or JSON)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check two components against each other
    Check {
        /// Source component id
        source: i64,
        /// Target component id
        target: i64,
    },

    /// Validate a configuration
    Validate {
        /// Component ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Analyze a configuration across all dimensions
    Analyze {
        /// Component ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// List catalog components of a type compatible with a component
    Compatible {
        /// Source component id
        source: i64,
        /// Target component type (CPU, GPU, MB, RAM, ...)
        component_type: ComponentType,
    },

    /// Check a rule file for conflicts with the stored rules
    Conflicts {
        /// Rule definition (YAML or JSON)
        rule_file: PathBuf,
    },

    /// List the rules where a type is source or target
    Rules {
        /// Component type (CPU, GPU, MB, RAM, ...)
        component_type: ComponentType,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure colored output
    if cli.no_color || cli.json {
        colored::control::set_override(false);
    }

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::load(cli.config.as_deref())
        .context("Failed to load engine configuration")?;
    let snapshot = snapshot::load_snapshot(&cli.catalog)?;
    let store = Arc::new(InMemoryStore::from_snapshot(snapshot));
    debug!(
        "Catalog {}: {} components, {} rules",
        cli.catalog.display(),
        store.component_count(),
        store.rule_count()
    );
    let service = CompatibilityService::new(store.clone(), store, config);

    let ok = match cli.command {
        Commands::Check { source, target } => handle_check(&service, source, target, cli.json)?,
        Commands::Validate { ids } => handle_validate(&service, &ids, cli.json)?,
        Commands::Analyze { ids } => handle_analyze(&service, &ids, cli.json)?,
        Commands::Compatible {
            source,
            component_type,
        } => handle_compatible(&service, source, component_type, cli.json)?,
        Commands::Conflicts { rule_file } => handle_conflicts(&service, &rule_file, cli.json)?,
        Commands::Rules { component_type } => handle_rules(&service, component_type, cli.json)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_check(service: &Service, source: i64, target: i64, as_json: bool) -> Result<bool> {
    let a = service.component(source)?;
    let b = service.component(target)?;

    let forward = service.check_components_compatibility(&a, &b)?;
    let forward_reason = service.incompatibility_reason(&a, &b)?;
    let reverse = service.check_components_compatibility(&b, &a)?;
    let reverse_reason = service.incompatibility_reason(&b, &a)?;
    let either = forward || reverse;

    if as_json {
        report::print_json(&json!({
            "source": a,
            "target": b,
            "compatible": forward,
            "reason": forward_reason,
            "reverse_compatible": reverse,
            "reverse_reason": reverse_reason,
        }))?;
        return Ok(either);
    }

    for (from, to, compatible, reason) in [
        (&a, &b, forward, &forward_reason),
        (&b, &a, reverse, &reverse_reason),
    ] {
        let verdict = if compatible { "OK".green() } else { "FAIL".red() };
        println!("{} {} -> {}", verdict, from.display_name(), to.display_name());
        if let Some(reason) = reason {
            println!("     {}", reason);
        }
    }
    Ok(either)
}

fn handle_validate(service: &Service, ids: &[i64], as_json: bool) -> Result<bool> {
    let components = service.components(ids)?;
    let valid = service.validate_configuration(&components)?;
    let issues = service.configuration_issues(&components)?;

    if as_json {
        report::print_json(&json!({ "valid": valid, "issues": issues }))?;
        return Ok(valid);
    }

    for component in &components {
        println!("  {}", report::component_line(component));
    }
    println!();
    if valid {
        println!("{} Valid", "OK".green());
    } else {
        println!("{} Invalid", "FAIL".red());
        for issue in &issues {
            eprintln!("   {} {}", "ERROR".red(), issue);
        }
    }
    Ok(valid)
}

fn handle_analyze(service: &Service, ids: &[i64], as_json: bool) -> Result<bool> {
    let components = service.components(ids)?;
    let result = service.analyze_configuration(&components);
    // Totals only make sense for a one-per-slot build
    let build = Configuration::from_components(components.iter().cloned()).ok();

    if as_json {
        let mut value = report::analysis_json(&result);
        if let Some(build) = &build {
            value["totals"] = report::totals_json(build);
        }
        report::print_json(&value)?;
    } else {
        report::print_analysis(&result);
        if let Some(build) = &build {
            println!("{}", report::totals_line(build));
        }
    }
    Ok(result.compatible)
}

fn handle_compatible(
    service: &Service,
    source: i64,
    component_type: ComponentType,
    as_json: bool,
) -> Result<bool> {
    let component = service.component(source)?;
    let compatible = service.compatible_components(&component, component_type)?;

    if as_json {
        report::print_json(&compatible)?;
        return Ok(true);
    }

    println!(
        "{} {} compatible with {}",
        compatible.len().to_string().bright_cyan(),
        component_type.display_name(),
        component.display_name()
    );
    for candidate in &compatible {
        println!("  {}", report::component_line(candidate));
    }
    Ok(true)
}

fn handle_conflicts(service: &Service, rule_file: &std::path::Path, as_json: bool) -> Result<bool> {
    let rule = snapshot::load_rule(rule_file)?;
    let conflicts = service.check_rule_conflicts(&rule)?;

    if as_json {
        report::print_json(&json!({ "rule": rule, "conflicts": conflicts }))?;
        return Ok(conflicts.is_empty());
    }

    println!("{}", report::rule_line(&rule));
    if conflicts.is_empty() {
        println!("{} No conflicts", "OK".green());
    } else {
        for conflict in &conflicts {
            println!("{} {}", "CONFLICT".red(), conflict);
        }
    }
    Ok(conflicts.is_empty())
}

fn handle_rules(service: &Service, component_type: ComponentType, as_json: bool) -> Result<bool> {
    let rules = service.rules_for_type(component_type)?;

    if as_json {
        report::print_json(&rules)?;
        return Ok(true);
    }

    println!(
        "{} rule(s) for {}",
        rules.len().to_string().bright_cyan(),
        component_type.display_name()
    );
    for rule in &rules {
        println!("  {}", report::rule_line(rule));
    }
    Ok(true)
}
