//! CLI argument definitions for modcheck

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modcheck")]
#[command(about = "Minecraft mods folder inspector and dependency checker", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse one mod and show its metadata
    #[command(visible_alias = "i")]
    Inspect {
        /// Path to a mod jar or loader config file
        input: PathBuf,

        /// Emit the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a mod's dependencies and incompatibilities
    #[command(visible_alias = "d")]
    Deps {
        /// Path to a mod jar or loader config file
        input: PathBuf,
    },

    /// Check one mod against a target environment
    Compat {
        /// Path to a mod jar or loader config file
        input: PathBuf,

        /// Target minecraft version (e.g. "1.20.1" or "1.20.x")
        #[arg(long)]
        mc: String,

        /// Target loader (forge, neoforge, fabric, quilt)
        #[arg(long)]
        loader: String,

        /// Target loader version
        #[arg(long, default_value = "")]
        loader_version: String,
    },

    /// Validate a mods folder (missing deps, cycles, duplicate ids, conflicts)
    #[command(visible_alias = "c")]
    Check {
        /// Mods folder (uses configured default if not provided)
        folder: Option<PathBuf>,
    },

    /// List the mods parsed from a folder
    #[command(visible_alias = "l")]
    List {
        /// Mods folder (uses configured default if not provided)
        folder: Option<PathBuf>,

        /// Only mods supporting this minecraft version
        #[arg(long)]
        mc: Option<String>,
    },

    /// Configure default settings
    Configure {
        /// Set the default mods folder
        #[arg(long)]
        mods_dir: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
