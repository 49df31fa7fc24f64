use std::env;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use common::config::Settings;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "error" };
    let filter = match env::var("LOG") {
        Ok(l) => EnvFilter::new(l),
        Err(_) => EnvFilter::new(default_level),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env();
    match &cli.command {
        Commands::Check => commands::check::check(&settings),
        Commands::Ls => commands::ls::list(&settings),
        Commands::Context(args) => commands::context::context(&settings, args),
        Commands::Version(args) => commands::version::version(&settings, args),
    }
}
