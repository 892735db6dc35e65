//! Single-mod command handlers (inspect, deps, compat)

use anyhow::{bail, Context, Result};
use std::path::Path;

use modcheck::ModRecord;

fn parse_mod(input: &Path) -> Result<ModRecord> {
    match modcheck::parse(input) {
        Some(record) => Ok(record),
        None => bail!("No mod metadata found in {}", input.display()),
    }
}

/// Handle `inspect`
pub fn inspect(input: &Path, json: bool) -> Result<()> {
    let record = parse_mod(input)?;

    if json {
        let out = serde_json::to_string_pretty(&record)
            .context("Failed to serialize mod record")?;
        println!("{out}");
        return Ok(());
    }

    println!("{:<15} {}", "Loader", record.loader);
    print_field("Mod ID", record.mod_id.as_deref());
    print_field("Name", record.name.as_deref());
    print_field("Version", record.mod_version.as_deref());
    print_field("Minecraft", record.minecraft_version.as_deref());
    print_field("Loader version", record.loader_version.as_deref());
    print_field("Description", record.description.as_deref());

    if !record.required_dependencies.is_empty() {
        println!("{:<15} {}", "Requires", record.required_dependencies.join(", "));
    }
    if !record.optional_dependencies.is_empty() {
        println!("{:<15} {}", "Suggests", record.optional_dependencies.join(", "));
    }
    if !record.incompatibilities.is_empty() {
        let ids: Vec<&str> = record.incompatibilities.iter().map(String::as_str).collect();
        println!("{:<15} {}", "Conflicts", ids.join(", "));
    }

    Ok(())
}

fn print_field(label: &str, value: Option<&str>) {
    match value {
        Some(value) => println!("{label:<15} {value}"),
        None => println!("{label:<15} (not set)"),
    }
}

/// Handle `deps`
pub fn deps(input: &Path) -> Result<()> {
    let record = parse_mod(input)?;

    println!("Required:");
    for dep in &record.required_dependencies {
        println!("  {dep}");
    }
    println!("Optional:");
    for dep in &record.optional_dependencies {
        println!("  {dep}");
    }
    println!("Incompatible:");
    for id in &record.incompatibilities {
        println!("  {id}");
    }

    Ok(())
}

/// Handle `compat`. Exit status reflects the answer.
pub fn compat(input: &Path, mc: &str, loader: &str, loader_version: &str) -> Result<()> {
    // Surface "no metadata" distinctly from "incompatible"
    parse_mod(input)?;

    if modcheck::is_compatible(input, mc, loader, loader_version) {
        println!("compatible");
        Ok(())
    } else {
        println!("not compatible");
        std::process::exit(1);
    }
}
