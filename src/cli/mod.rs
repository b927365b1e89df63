// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command-line interface declaration.
//!
//! The CLI is a thin harness: each subcommand maps straight onto a pipeline
//! step (or an introspection command) and carries no logic of its own.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Xcode Beta Builder.
#[derive(Debug, Parser)]
#[command(name = "xcb", version, about = "Builds, packages, and distributes Xcode beta builds")]
pub struct Cli {
    /// Global options.
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by all subcommands.
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Configuration file (defaults to xcb.toml in the working directory).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report the intended deploy without performing it.
    #[arg(long, global = true)]
    pub dry: bool,

    /// Echo every constructed toolchain command and its output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Console log level (0-6).
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<u8>,

    /// Write logs to this file as well.
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean the build.
    Clean,
    /// Build the beta release of the app.
    Build,
    /// Package the beta release as an IPA file.
    Package,
    /// Build and archive the app.
    Archive,
    /// Prepare the app for deployment.
    Prepare,
    /// Deploy the beta using the configured deployment strategy.
    Deploy,
    /// Deploy the last build without rebuilding.
    Redeploy,
    /// Cut a release using the configured release strategy.
    Release,
    /// Show the current and next build number.
    Version,
    /// Show the resolved configuration.
    Options,
}

/// Parse command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
