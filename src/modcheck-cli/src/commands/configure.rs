//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up modcheck CLI defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
pub fn handle(mods_dir: Option<PathBuf>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if let Some(dir) = mods_dir {
        set_mods_dir(&mut config, dir)?;
    } else {
        show_usage();
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    match config.get_mods_dir() {
        Some(dir) => println!("Mods folder: {}", dir.display()),
        None => println!("No mods folder configured"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Set the default mods folder in configuration
fn set_mods_dir(config: &mut Config, dir: PathBuf) -> Result<()> {
    config.set_mods_dir(dir.clone());
    config.save()?;

    println!("Mods folder configured: {}", dir.display());
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: modcheck configure --mods-dir PATH/TO/mods");
    println!("   or: modcheck configure --show");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_exists() {
        let result = Config::config_path();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_load() {
        // Should be able to load config (may be empty)
        let result = Config::load();
        assert!(result.is_ok());
    }
}
