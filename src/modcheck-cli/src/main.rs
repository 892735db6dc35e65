//! modcheck - Minecraft mods folder inspector and dependency checker

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Diagnostics go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { input, json } => commands::mods::inspect(&input, json),

        Commands::Deps { input } => commands::mods::deps(&input),

        Commands::Compat {
            input,
            mc,
            loader,
            loader_version,
        } => commands::mods::compat(&input, &mc, &loader, &loader_version),

        Commands::Check { folder } => commands::folder::check(folder),

        Commands::List { folder, mc } => commands::folder::list(folder, mc),

        Commands::Configure { mods_dir, show } => commands::configure::handle(mods_dir, show),
    }
}
