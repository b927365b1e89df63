// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command handlers.
//!
//! Each handler wires a parsed CLI command to the pipeline (or to a small
//! introspection routine) against an explicitly passed configuration.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{Pipeline, Step};

/// Run a pipeline step (and its dependencies) against the configuration.
///
/// # Errors
///
/// Returns strategy-resolution failures and the first failing step's error.
pub async fn run_pipeline_command(step: Step, config: &Config) -> Result<()> {
    let pipeline = Pipeline::from_config(Arc::new(config.clone()))?;
    pipeline.run(step).await
}

/// Run the configured release strategy.
///
/// # Errors
///
/// Returns a usage error when no release strategy is configured, or the
/// strategy's own failure.
pub async fn run_release_command(config: &Config) -> Result<()> {
    let pipeline = Pipeline::from_config(Arc::new(config.clone()))?;
    pipeline.release().await
}

/// Print the current and next build number.
///
/// # Errors
///
/// Returns metadata read failures; a missing version prints as such.
pub fn run_version_command(config: &Config) -> Result<()> {
    match config.build_number()? {
        Some(current) => {
            println!("build number: {current}");
            if let Some(next) = config.next_build_number()? {
                println!("next:         {next}");
            }
        }
        None => println!("build number: (none found)"),
    }
    Ok(())
}

/// Print the resolved configuration options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}
