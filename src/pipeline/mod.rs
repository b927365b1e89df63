// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pipeline orchestration.
//!
//! # Architecture
//!
//! ```text
//! Pipeline::from_config(config)
//!      |
//!      v
//!   Step graph (static)
//!   clean --> build --> package --> archive
//!                |          |
//!                |          +--> prepare --> deploy
//!                +--> archive
//!   redeploy: prepare + deploy without rebuilding
//!
//! Steps run sequentially, dependency-first, fail-fast. The shared
//! Configuration is passed explicitly; there is no ambient singleton.
//! ```

use anyhow::Context as _;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ProcessError, Result, UsageError, XcbError, XcbResult};
use crate::strategy::{Deployable, DeploymentStrategy, Releasable, ReleaseStrategy};
use crate::toolchain::parser::BuildOutputParser;
use crate::toolchain::{BUILD_LOG, ProcessBuilder};

/// A named pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Remove previous build products (honors `skip_clean`).
    Clean,
    /// Compile the project, capturing the toolchain log.
    Build,
    /// Package and sign the device build.
    Package,
    /// Save a toolchain-native archive.
    Archive,
    /// Let the deployment strategy validate preconditions.
    Prepare,
    /// Ship the packaged build.
    Deploy,
    /// Prepare + deploy without rebuilding.
    Redeploy,
}

impl Step {
    /// Returns the display name for this step.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Build => "build",
            Self::Package => "package",
            Self::Archive => "archive",
            Self::Prepare => "prepare",
            Self::Deploy => "deploy",
            Self::Redeploy => "redeploy",
        }
    }

    /// Dependency-first execution order for this step.
    ///
    /// `redeploy` deliberately re-runs only the deployment half of the graph.
    #[must_use]
    pub const fn execution_order(self) -> &'static [Self] {
        match self {
            Self::Clean => &[Self::Clean],
            Self::Build => &[Self::Clean, Self::Build],
            Self::Package => &[Self::Clean, Self::Build, Self::Package],
            Self::Archive => &[Self::Clean, Self::Build, Self::Archive],
            Self::Prepare => &[Self::Clean, Self::Build, Self::Package, Self::Prepare],
            Self::Deploy => &[
                Self::Clean,
                Self::Build,
                Self::Package,
                Self::Prepare,
                Self::Deploy,
            ],
            Self::Redeploy => &[Self::Redeploy],
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pre-validated spinner style for long-running toolchain steps.
fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        })
        .clone()
}

fn step_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Orchestrates pipeline steps over a shared configuration.
pub struct Pipeline {
    /// Shared configuration, read-only after setup.
    config: Arc<Config>,
    /// Bound deployment strategy, if configured.
    deployment: Option<DeploymentStrategy>,
    /// Bound release strategy, if configured.
    release: Option<ReleaseStrategy>,
}

impl Pipeline {
    /// Build a pipeline, resolving the configured strategy bindings.
    ///
    /// # Errors
    ///
    /// Returns a strategy-not-found error when a configured strategy name is
    /// not registered.
    pub fn from_config(config: Arc<Config>) -> XcbResult<Self> {
        let deployment = DeploymentStrategy::from_config(&config)?;
        let release = ReleaseStrategy::from_config(&config)?;
        Ok(Self {
            config,
            deployment,
            release,
        })
    }

    /// Run a step and everything it depends on, in order, fail-fast.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; later steps do not run.
    pub async fn run(&self, step: Step) -> Result<()> {
        for step in step.execution_order() {
            debug!(step = %step, "running pipeline step");
            self.run_step(*step).await?;
        }
        Ok(())
    }

    async fn run_step(&self, step: Step) -> Result<()> {
        match step {
            Step::Clean => self.clean().await,
            Step::Build => self.build().await,
            Step::Package => self.package().await,
            Step::Archive => self.archive().await.map(|_| ()),
            Step::Prepare => self.prepare().await,
            Step::Deploy => self.deploy().await,
            Step::Redeploy => self.redeploy().await,
        }
    }

    /// Invoke the toolchain's clean action unless `skip_clean` is set.
    async fn clean(&self) -> Result<()> {
        let config = &self.config;
        if config.global.skip_clean {
            debug!("skip_clean set, leaving previous build products in place");
            return Ok(());
        }

        info!("Cleaning project");
        ProcessBuilder::new(&config.tools.xcodebuild)
            .args(config.build_arguments()?)
            .arg("clean")
            .log_to(BUILD_LOG)
            .echo(config.global.verbose)
            .run()
            .await?;
        info!("Done");
        Ok(())
    }

    /// Invoke the toolchain's build action and verify the captured log.
    ///
    /// The toolchain has no structured failure channel; the parser verdict
    /// over the captured log decides, with the exit status as a backstop.
    async fn build(&self) -> Result<()> {
        let config = &self.config;

        info!("Building project");
        let spinner = (!config.global.verbose).then(|| step_spinner("Building project"));

        let code = ProcessBuilder::new(&config.tools.xcodebuild)
            .args(config.build_arguments()?)
            .arg("build")
            .log_to(BUILD_LOG)
            .echo(config.global.verbose)
            .allow_failure()
            .run()
            .await?;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let log = std::fs::read_to_string(BUILD_LOG).unwrap_or_default();
        if BuildOutputParser::new(&log).failed() {
            return Err(XcbError::BuildFailed.into());
        }
        if code != 0 {
            return Err(ProcessError::NonZeroExit {
                command: "xcodebuild".to_string(),
                code,
            }
            .into());
        }

        info!("Done");
        Ok(())
    }

    /// Package the device build; simulator and desktop SDKs skip packaging.
    async fn package(&self) -> Result<()> {
        let config = &self.config;

        if config.project.sdk.is_device() {
            self.package_device_build().await?;
        } else {
            info!(sdk = %config.project.sdk, "non-device SDK, skipping packaging");
        }

        if config.global.copy_bundle {
            let from = config.built_app_path()?;
            let to = config.app_bundle_path()?;
            info!(from = %from.display(), to = %to.display(), "Copying app bundle");
            copy_dir_recursive(&from, &to)
                .with_context(|| format!("failed to copy app bundle to {}", to.display()))?;
        }

        Ok(())
    }

    /// Construct, sign, and zip the distributable device artifacts.
    async fn package_device_build(&self) -> Result<()> {
        let config = &self.config;

        // the identity check precedes every subprocess, auto-archive included
        let identity = config
            .package
            .signing_identity
            .clone()
            .ok_or(UsageError::MissingSigningIdentity)?;

        if config.global.auto_archive {
            self.archive().await?;
        }

        info!("Packaging and signing");
        let destination = config.paths.package_destination();
        tokio::fs::create_dir_all(&destination)
            .await
            .with_context(|| format!("failed to create {}", destination.display()))?;

        let built_app = config.built_app_path()?;
        let ipa = config.ipa_path()?;

        let mut package = ProcessBuilder::new(&config.tools.xcrun)
            .arg("-sdk")
            .arg(config.project.sdk.to_string())
            .arg("PackageApplication")
            .arg("-v")
            .arg(built_app.display().to_string())
            .arg("-o")
            .arg(ipa.display().to_string())
            .arg("--sign")
            .arg(identity);
        if let Some(profile) = &config.package.provisioning_profile {
            package = package.arg("--embed").arg(profile.display().to_string());
        }
        if let Some(extra) = &config.package.extra_args {
            package = package.args(extra.to_vec());
        }
        package
            .log_to(BUILD_LOG)
            .echo(config.global.verbose)
            .run()
            .await?;
        info!("Done");

        info!("Zipping dSYM");
        let dsym = config.dsym_path()?;
        ProcessBuilder::new(&config.tools.zip)
            .arg("-r")
            .arg(dsym.display().to_string())
            .arg(config.built_dsym_path()?.display().to_string())
            .log_to(BUILD_LOG)
            .echo(config.global.verbose)
            .run()
            .await?;
        info!("Done");

        if config.global.verbose {
            info!(path = %ipa.display(), "IPA file");
            info!(path = %dsym.display(), "dSYM file");
        }

        Ok(())
    }

    /// Save a toolchain-native archive, returning the final saved path.
    async fn archive(&self) -> Result<PathBuf> {
        let config = &self.config;

        info!("Archiving build");
        let destination = config.paths.archive_path();
        tokio::fs::create_dir_all(&destination)
            .await
            .with_context(|| format!("failed to create {}", destination.display()))?;
        let archive = destination.join(format!("{}.xcarchive", config.archive_name()?));

        ProcessBuilder::new(&config.tools.xcodebuild)
            .args(config.build_arguments()?)
            .arg("archive")
            .arg("-archivePath")
            .arg(archive.display().to_string())
            .log_to(BUILD_LOG)
            .echo(config.global.verbose)
            .run()
            .await?;

        info!(path = %archive.display(), "Archive saved");
        Ok(archive)
    }

    async fn prepare(&self) -> Result<()> {
        let strategy = self
            .deployment
            .as_ref()
            .ok_or(UsageError::NoDeploymentStrategy)?;
        strategy.prepare().await
    }

    async fn deploy(&self) -> Result<()> {
        let strategy = self
            .deployment
            .as_ref()
            .ok_or(UsageError::NoDeploymentStrategy)?;
        strategy.deploy().await
    }

    /// Re-run prepare + deploy against the artifacts of the last build.
    async fn redeploy(&self) -> Result<()> {
        self.prepare().await?;
        self.deploy().await
    }

    /// Run the bound release strategy (prepare, then release).
    ///
    /// # Errors
    ///
    /// Returns a usage error when no release strategy is configured, or the
    /// strategy's own failure.
    pub async fn release(&self) -> Result<()> {
        let strategy = self.release.as_ref().ok_or(UsageError::NoReleaseStrategy)?;
        strategy.prepare().await?;
        strategy.release().await
    }
}

/// Copy a bundle directory tree.
fn copy_dir_recursive(from: &Path, to: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
