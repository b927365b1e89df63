// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Clean | Build | Package | Archive | Prepare | Deploy | Redeploy
//!   Release | Version | Options
//! ```

use std::process::ExitCode;

use xcb_rs::cli::{self, Command, GlobalOptions};
use xcb_rs::cmd::{
    run_options_command, run_pipeline_command, run_release_command, run_version_command,
};
use xcb_rs::config::Config;
use xcb_rs::logging::{LogConfig, LogLevel, init_logging};
use xcb_rs::pipeline::Step;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    LogConfig::builder()
        .with_console_level(console_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(command) => match load_config(&cli.global) {
            Ok(config) => run_command(command, &config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_command(command: &Command, config: &Config) -> xcb_rs::error::Result<()> {
    match command {
        Command::Clean => run_pipeline_command(Step::Clean, config).await,
        Command::Build => run_pipeline_command(Step::Build, config).await,
        Command::Package => run_pipeline_command(Step::Package, config).await,
        Command::Archive => run_pipeline_command(Step::Archive, config).await,
        Command::Prepare => run_pipeline_command(Step::Prepare, config).await,
        Command::Deploy => run_pipeline_command(Step::Deploy, config).await,
        Command::Redeploy => run_pipeline_command(Step::Redeploy, config).await,
        Command::Release => run_release_command(config).await,
        Command::Version => run_version_command(config),
        Command::Options => {
            run_options_command(config);
            Ok(())
        }
    }
}

fn load_config(global: &GlobalOptions) -> xcb_rs::error::Result<Config> {
    let mut loader = Config::builder().add_toml_file_optional("xcb.toml");
    if let Some(path) = &global.config {
        loader = loader.add_toml_file(path);
    }
    let mut config = loader.with_env_prefix("XCB").build().map_err(|e| {
        eprintln!("Failed to load config: {e}");
        e
    })?;

    // CLI overrides are the operator's last word before the pipeline runs
    config.global.dry |= global.dry;
    config.global.verbose |= global.verbose;

    Ok(config)
}
