//! Folder-wide command handlers (check, list)

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;

/// Folder from the argument or the configured default
pub fn resolve_folder(provided: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = provided {
        return Ok(dir);
    }

    let config = Config::load()?;
    config.get_mods_dir().map(PathBuf::from).context(
        "No mods folder given. Run 'modcheck configure --mods-dir PATH' to set a default.",
    )
}

/// Handle `check`. Exit status reflects whether findings were produced.
pub fn check(folder: Option<PathBuf>) -> Result<()> {
    let folder = resolve_folder(folder)?;
    let findings = modcheck::validate_folder_path(&folder)
        .with_context(|| format!("Failed to scan {}", folder.display()))?;

    if findings.is_empty() {
        println!("No problems found.");
        return Ok(());
    }

    for finding in &findings {
        println!("{finding}");
    }
    eprintln!("{} problem(s) found", findings.len());
    std::process::exit(1);
}

/// Handle `list`
pub fn list(folder: Option<PathBuf>, mc: Option<String>) -> Result<()> {
    let folder = resolve_folder(folder)?;
    let records = match mc.as_deref() {
        Some(version) => modcheck::mods_supporting(&folder, version),
        None => modcheck::scan_folder(&folder),
    }
    .with_context(|| format!("Failed to scan {}", folder.display()))?;

    for record in &records {
        println!(
            "{:<30} {:<10} {:<10} {}",
            record.label(),
            record.mod_version.as_deref().unwrap_or("-"),
            record.minecraft_version.as_deref().unwrap_or("-"),
            record.loader,
        );
    }
    eprintln!("{} mod(s)", records.len());

    Ok(())
}
