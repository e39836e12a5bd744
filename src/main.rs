//! svgmux - an SVG sprite aggregator for build pipelines.
//!
//! Concatenates a configured, ordered set of SVG sources into a single
//! sprite asset, recomputes only when a watched input changes, and
//! exposes the raw document to a companion HTML-generation step.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod freshness;
mod logger;
mod pass;
mod sprite;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{Config, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(Config::load(cli)?);

    match &cli.command {
        Commands::Init { force } => cli::init::init_config_file(&config, *force),
        Commands::Build { .. } => cli::build::run_build(&config),
        Commands::Watch { .. } => cli::watch::run_watch(),
        Commands::Clean => cli::build::run_clean(&config),
    }
}
