// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git release strategy.
//!
//! A release is a tag named after the current build number, optionally
//! pushed to the configured remote, followed by a version bump in the
//! project metadata so the next build starts from a fresh number.

use anyhow::Context as _;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::strategy::Releasable;
use crate::toolchain::ProcessBuilder;

/// Tags and bumps through the git CLI.
#[derive(Debug, Clone)]
pub struct GitReleaseStrategy {
    config: Arc<Config>,
}

impl GitReleaseStrategy {
    /// Create a new strategy bound to the shared configuration.
    #[must_use]
    pub const fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    async fn do_prepare(&self) -> Result<()> {
        ProcessBuilder::which("git")?
            .args(["rev-parse", "--is-inside-work-tree"])
            .output()
            .await
            .context("not inside a git work tree")?;
        Ok(())
    }

    async fn do_release(&self) -> Result<()> {
        let config = &self.config;

        let version = config
            .build_number()?
            .context("cannot tag a release without a build number")?;
        let tag = format!("{}{}", config.release.tag_prefix, version);

        if config.global.dry {
            info!(tag = %tag, "** Dry Run - release tag not created **");
            return Ok(());
        }

        info!(tag = %tag, "Tagging release");
        ProcessBuilder::which("git")?
            .args(["tag", &tag])
            .run()
            .await
            .with_context(|| format!("failed to create tag '{tag}'"))?;

        if config.release.push_tag {
            info!(remote = %config.release.remote, tag = %tag, "Pushing tag");
            ProcessBuilder::which("git")?
                .args(["push", &config.release.remote, &tag])
                .run()
                .await
                .with_context(|| format!("failed to push tag '{tag}'"))?;
        }

        if config.increment_build_number_in_metadata()? {
            let next = config.build_number()?.unwrap_or_default();
            info!(version = %next, "Bumped build number");
        }

        Ok(())
    }
}

impl Releasable for GitReleaseStrategy {
    fn name(&self) -> &'static str {
        "git"
    }

    fn prepare<'a>(&'a self) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.do_prepare())
    }

    fn release<'a>(&'a self) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.do_release())
    }
}
