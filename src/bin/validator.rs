//! Schema Validator CLI
//!
//! Validates LinkML-style schemas, auto-repairs undefined conventional
//! slots, and exports the inheritance graph.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use linkml_slot_repair::{discover, load, InheritanceGraph, RepairReport, ValidatorConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-validator")]
#[command(about = "Validate and auto-repair LinkML-style schemas")]
struct Cli {
    /// Configuration file (overrides default locations)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate schema files or directories
    Validate {
        /// Files or directories to validate
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Auto-repair one schema file
    Repair {
        /// Schema file to repair
        path: PathBuf,
        /// Write the repaired schema here
        #[arg(short, long, conflicts_with = "write")]
        output: Option<PathBuf>,
        /// Overwrite the input file with the repaired schema
        #[arg(long)]
        write: bool,
    },

    /// Generate a JSON report with validation and repair preview
    Report {
        /// Files or directories to include
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the inheritance graph as DOT
    Graph {
        /// Schema file
        path: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Save the configuration to this file
        #[arg(long)]
        save: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns Ok(false) when any schema is invalid
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = ValidatorConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Validate { paths } => validate_paths(&config, &paths),
        Commands::Repair {
            path,
            output,
            write,
        } => {
            let target = if write { Some(path.clone()) } else { output };
            repair_file(&config, &path, target.as_deref())
        }
        Commands::Report { paths, output } => {
            write_report(&config, &paths, output.as_deref())?;
            Ok(true)
        }
        Commands::Graph { path, output } => {
            let loaded = load(&path)?;
            let graph = InheritanceGraph::build(&loaded.schema);

            for group in graph.cyclic_groups() {
                warn!(classes = ?group, "inheritance cycle");
            }

            let dot = graph.to_dot();
            match output {
                Some(out) => {
                    std::fs::write(&out, &dot)
                        .with_context(|| format!("Failed to write {}", out.display()))?;
                    println!(
                        "✅ Exported {} classes, {} edges to {:?}",
                        graph.node_count(),
                        graph.edge_count(),
                        out
                    );
                }
                None => print!("{}", dot),
            }
            Ok(true)
        }
        Commands::Config { save } => {
            if let Some(path) = save {
                config
                    .save(&path)
                    .with_context(|| format!("Failed to save configuration to {}", path))?;
                println!("✅ Configuration saved to {}", path);
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            Ok(true)
        }
    }
}

fn validate_paths(config: &ValidatorConfig, paths: &[PathBuf]) -> anyhow::Result<bool> {
    let validator = config.validator();
    let files = discover(paths, &config.input)?;
    let mut invalid = 0usize;

    println!("🔍 Validating {} schema file(s)...", files.len());

    for file in &files {
        let loaded = load(file)?;
        let report = validator.validate(&loaded.schema);

        if report.is_valid() {
            println!("  ✅ {}", file.display());
            continue;
        }

        invalid += 1;
        println!("  ❌ {} - {} error(s)", file.display(), report.len());
        for error in &report {
            warn!(
                file = %file.display(),
                code = error.kind.code(),
                class = %error.class_name,
                target = %error.slot_or_enum_name,
                "{}",
                error.message
            );
            println!("     └─ {}", error);
        }
    }

    println!();
    if invalid == 0 {
        println!("✅ All schemas are valid");
    } else {
        println!("❌ {} of {} schema(s) invalid", invalid, files.len());
    }
    Ok(invalid == 0)
}

fn repair_file(config: &ValidatorConfig, path: &Path, target: Option<&Path>) -> anyhow::Result<bool> {
    let repairer = config.auto_repairer()?;
    let loaded = load(path)?;
    let report = repairer.repair(&loaded.schema);

    print_repair(path, &report);

    if let Some(target) = target {
        if report.changed() {
            let yaml = report.schema.to_yaml_string()?;
            std::fs::write(target, yaml)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            info!(path = %target.display(), checksum = report.checksum_after.short(), "wrote repaired schema");
            println!("✅ Repaired schema written to {:?}", target);
        } else {
            println!("ℹ️  Nothing repaired, {:?} left untouched", target);
        }
    }

    Ok(report.is_valid())
}

fn print_repair(path: &Path, report: &RepairReport) {
    println!("🔧 Repairing {}", path.display());

    for action in &report.actions {
        info!(
            strategy = %action.strategy_name,
            slot = %action.slot_name,
            classes = ?action.applies_to_classes,
            "repair action"
        );
        println!(
            "  ✅ {} via {} (used by {})",
            action.slot_name,
            action.strategy_name,
            action.applies_to_classes.join(", ")
        );
    }

    for error in &report.remaining {
        warn!(code = error.kind.code(), class = %error.class_name, "{}", error.message);
        println!("  ❌ {}", error);
    }

    println!();
    if report.is_valid() {
        println!("✅ Schema is valid after {} repair(s)", report.actions.len());
    } else {
        println!(
            "❌ {} error(s) remain after {} repair(s)",
            report.remaining.len(),
            report.actions.len()
        );
    }
}

fn write_report(config: &ValidatorConfig, paths: &[PathBuf], output: Option<&Path>) -> anyhow::Result<()> {
    let validator = config.validator();
    let repairer = config.auto_repairer()?;
    let files = discover(paths, &config.input)?;

    let mut entries = Vec::with_capacity(files.len());
    let mut valid_count = 0usize;

    for file in &files {
        let loaded = load(file)?;
        let validation = validator.validate(&loaded.schema);
        let repair = repairer.repair(&loaded.schema);
        if validation.is_valid() {
            valid_count += 1;
        }

        entries.push(serde_json::json!({
            "path": file.display().to_string(),
            "source_checksum": loaded.source_checksum,
            "valid": validation.is_valid(),
            "errors": validation,
            "repair": repair,
            "valid_after_repair": repair.is_valid(),
        }));
    }

    let report = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "schemas": files.len(),
        "valid": valid_count,
        "files": entries,
    });

    let report_json = config.output.format.render(&report)?;

    if let Some(path) = output {
        std::fs::write(path, &report_json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✅ Report written to {:?}", path);
    } else {
        println!("{}", report_json);
    }

    Ok(())
}
