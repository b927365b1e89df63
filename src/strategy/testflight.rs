// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! TestFlight deployment strategy.
//!
//! Builds a multipart upload from the packaged IPA, the resolved release
//! notes, and (optionally) the zipped dSYM bundle. A failed upload is
//! reported, not raised: the local build artifacts are already produced and
//! must not be invalidated by a network problem.

use futures_util::future::BoxFuture;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Result, StrategyError};
use crate::strategy::{Deployable, notes};

/// Global HTTP client - initialized once, reused across uploads.
/// Falls back to a basic client if custom configuration fails.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("xcb-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Uploads builds to the TestFlight distribution service.
#[derive(Debug, Clone)]
pub struct TestFlightStrategy {
    config: Arc<Config>,
}

impl TestFlightStrategy {
    /// Create a new strategy bound to the shared configuration.
    #[must_use]
    pub const fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    async fn do_prepare(&self) -> Result<()> {
        let ipa = self.config.ipa_path()?;
        if ipa.exists() {
            info!(ipa = %ipa.display(), "package ready for upload");
        } else {
            warn!(ipa = %ipa.display(), "package not found yet, deploy will fail until it is built");
        }
        Ok(())
    }

    async fn do_deploy(&self) -> Result<()> {
        let config = &self.config;

        let release_notes = notes::resolve_release_notes(config).await?;
        let ipa = config.ipa_path()?;

        if config.global.verbose {
            info!(ipa = %ipa.display(), "upload payload");
            info!(notes = %release_notes, "release notes");
        }

        if config.global.dry {
            info!(ipa = %ipa.display(), notes = %release_notes, "** Dry Run - no upload performed **");
            return Ok(());
        }

        let form = self.build_form(&ipa, release_notes).await?;

        info!("Uploading build to TestFlight");
        let response = global_client()
            .post(&config.deploy.endpoint)
            .multipart(form)
            .send()
            .await;

        match response {
            Err(e) => {
                error!(error = %e, "TestFlight upload failed");
            }
            Ok(response) => {
                let status = response.status().as_u16();
                if matches!(status, 200 | 201) {
                    if let Ok(body) = response.json::<serde_json::Value>().await {
                        debug!(response = %body, "service response");
                    }
                    info!("Done");
                } else {
                    let body = response.text().await.unwrap_or_default();
                    error!(status, body = %body, "TestFlight upload rejected");
                }
            }
        }

        Ok(())
    }

    /// Assemble the multipart payload.
    async fn build_form(&self, ipa: &Path, release_notes: String) -> Result<Form> {
        let config = &self.config;

        let ipa_bytes = tokio::fs::read(ipa)
            .await
            .map_err(|_| StrategyError::MissingArtifact {
                path: ipa.display().to_string(),
            })?;
        let ipa_part = Part::bytes(ipa_bytes)
            .file_name(config.ipa_name()?)
            .mime_str("application/octet-stream")?;

        let mut form = Form::new()
            .text("api_token", config.deploy.api_token.clone())
            .text("team_token", config.deploy.team_token.clone())
            .text("notes", release_notes)
            .text(
                "distribution_lists",
                config.deploy.distribution_lists.join(","),
            )
            .text("notify", config.deploy.notify.to_string())
            .text("replace", config.deploy.replace.to_string())
            .part("file", ipa_part);

        if config.deploy.upload_dsym {
            let dsym = config.dsym_path()?;
            let dsym_bytes =
                tokio::fs::read(&dsym)
                    .await
                    .map_err(|_| StrategyError::MissingArtifact {
                        path: dsym.display().to_string(),
                    })?;
            let dsym_part = Part::bytes(dsym_bytes)
                .file_name(config.dsym_name()?)
                .mime_str("application/zip")?;
            form = form.part("dsym", dsym_part);
        }

        Ok(form)
    }
}

impl Deployable for TestFlightStrategy {
    fn name(&self) -> &'static str {
        "testflight"
    }

    fn prepare<'a>(&'a self) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.do_prepare())
    }

    fn deploy<'a>(&'a self) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.do_deploy())
    }
}
