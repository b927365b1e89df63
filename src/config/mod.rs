// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for xcb-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. xcb.toml (cwd)
//! 3. --config
//! 4. XCB_* env vars
//! 5. CLI overrides
//! ```
//!
//! Every path- and argument-producing accessor below is a function of the
//! current configuration state. The derived-data scan and the build-log
//! scrape touch the filesystem and are recomputed on each call.

pub mod loader;
pub mod paths;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, UsageError, XcbResult};
use crate::toolchain::BUILD_LOG;
use crate::toolchain::parser::BuildOutputParser;
use crate::version;

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{
    BuildDir, BuildStepConfig, DeployConfig, GlobalConfig, PackageConfig, ProjectConfig,
    ReleaseConfig, ToolsConfig,
};

/// Complete application configuration.
///
/// Constructed once per pipeline run, mutated only by the operator's CLI
/// overrides before any step executes, then treated as read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project identity.
    pub project: ProjectConfig,
    /// Paths.
    pub paths: PathsConfig,
    /// Behavior flags.
    pub global: GlobalConfig,
    /// Tool paths.
    pub tools: ToolsConfig,
    /// Build invocation passthrough.
    pub build: BuildStepConfig,
    /// Packaging and signing.
    pub package: PackageConfig,
    /// Deployment strategy binding.
    pub deploy: DeployConfig,
    /// Release strategy binding.
    pub release: ReleaseConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xcb_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("xcb.toml")
    ///     .with_env_prefix("XCB")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match
    /// the `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    // --- Toolchain argument construction ---

    /// Ordered argument list for an `xcodebuild` invocation, without the
    /// trailing action.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::SchemeRequired`] when a workspace is configured
    /// without a scheme, and [`UsageError::MissingTarget`] when neither a
    /// workspace nor a target is configured.
    pub fn build_arguments(&self) -> std::result::Result<Vec<String>, UsageError> {
        let mut args = Vec::new();

        if let Some(workspace) = &self.project.workspace_path {
            let scheme = self
                .project
                .scheme
                .as_ref()
                .ok_or(UsageError::SchemeRequired)?;
            args.push("-workspace".to_string());
            args.push(workspace.display().to_string());
            args.push("-scheme".to_string());
            args.push(scheme.clone());
        } else {
            let target = self.project.target.as_ref().ok_or(UsageError::MissingTarget)?;
            args.push("-target".to_string());
            args.push(target.clone());
            if let Some(project) = &self.project.project_file_path {
                args.push("-project".to_string());
                args.push(project.display().to_string());
            }
        }

        args.push("-sdk".to_string());
        args.push(self.project.sdk.to_string());
        args.push("-configuration".to_string());
        args.push(self.project.configuration.to_string());

        if let BuildDir::Path(dir) = &self.paths.build_dir {
            args.push(format!("BUILD_DIR={}", paths::expand_home(dir).display()));
        }

        if let Some(extra) = &self.build.extra_args {
            args.extend(extra.to_vec());
        }

        Ok(args)
    }

    // --- Artifact naming ---

    /// Name prefix for every produced artifact: `app_name`, falling back to
    /// `target`.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::MissingAppIdentity`] when neither is set.
    pub fn artifact_prefix(&self) -> std::result::Result<&str, UsageError> {
        self.project
            .app_name
            .as_deref()
            .or(self.project.target.as_deref())
            .ok_or(UsageError::MissingAppIdentity)
    }

    /// File name of the built bundle, `<name>.<app_extension>`.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::MissingAppIdentity`] when no name is resolvable.
    pub fn app_file_name(&self) -> std::result::Result<String, UsageError> {
        Ok(format!(
            "{}.{}",
            self.artifact_prefix()?,
            self.project.app_extension
        ))
    }

    /// Version suffix shared by all packaged artifact names.
    ///
    /// Empty unless `include_version_in_package` is set and a build number is
    /// resolvable; otherwise `-<build_number>`.
    ///
    /// # Errors
    ///
    /// Propagates metadata read failures from the version resolver.
    pub fn version_suffix(&self) -> XcbResult<String> {
        if !self.global.include_version_in_package {
            return Ok(String::new());
        }
        Ok(version::build_number(self)?
            .map(|number| format!("-{number}"))
            .unwrap_or_default())
    }

    /// Name of the packaged IPA.
    ///
    /// # Errors
    ///
    /// Returns a usage error without an app identity; propagates metadata
    /// read failures.
    pub fn ipa_name(&self) -> XcbResult<String> {
        Ok(format!(
            "{}{}.ipa",
            self.artifact_prefix()?,
            self.version_suffix()?
        ))
    }

    /// Name of the zipped dSYM bundle.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Config::ipa_name`].
    pub fn dsym_name(&self) -> XcbResult<String> {
        Ok(format!(
            "{}{}.dSYM.zip",
            self.artifact_prefix()?,
            self.version_suffix()?
        ))
    }

    /// Name of the zipped desktop package.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Config::ipa_name`].
    pub fn zipped_package_name(&self) -> XcbResult<String> {
        Ok(format!(
            "{}{}.zip",
            self.artifact_prefix()?,
            self.version_suffix()?
        ))
    }

    /// Archive name, without the version suffix.
    ///
    /// # Errors
    ///
    /// Returns a usage error without an app identity.
    pub fn archive_name(&self) -> std::result::Result<&str, UsageError> {
        self.artifact_prefix()
    }

    // --- Artifact paths ---

    /// Full path of the packaged IPA.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Config::ipa_name`].
    pub fn ipa_path(&self) -> XcbResult<PathBuf> {
        Ok(self.paths.package_destination().join(self.ipa_name()?))
    }

    /// Full path of the zipped dSYM bundle.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Config::ipa_name`].
    pub fn dsym_path(&self) -> XcbResult<PathBuf> {
        Ok(self.paths.package_destination().join(self.dsym_name()?))
    }

    /// Destination path of the copied app bundle.
    ///
    /// # Errors
    ///
    /// Returns a usage error without an app identity.
    pub fn app_bundle_path(&self) -> XcbResult<PathBuf> {
        Ok(self.paths.package_destination().join(self.app_file_name()?))
    }

    /// Products subdirectory name, `<configuration>-<sdk>`.
    ///
    /// The desktop SDK drops the suffix entirely.
    #[must_use]
    pub fn built_products_subdir(&self) -> String {
        format!(
            "{}{}",
            self.project.configuration,
            self.project.sdk.product_dir_suffix()
        )
    }

    /// Path of the built app bundle inside the products directory.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::UnknownBuildDir`] when no resolution mechanism
    /// produced a products directory, or a usage error without an app
    /// identity.
    pub fn built_app_path(&self) -> XcbResult<PathBuf> {
        Ok(self
            .build_products_dir()?
            .join(self.built_products_subdir())
            .join(self.app_file_name()?))
    }

    /// Path of the built dSYM bundle, next to the app bundle.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Config::built_app_path`].
    pub fn built_dsym_path(&self) -> XcbResult<PathBuf> {
        let app = self.built_app_path()?;
        Ok(PathBuf::from(format!("{}.dSYM", app.display())))
    }

    /// Resolve the build products root directory.
    ///
    /// Exactly one of three mechanisms applies, in priority order: the
    /// explicit configured path, the derived-data scan, and finally the
    /// path scraped from the captured build log.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::UnknownBuildDir`] when none of them produced a
    /// directory.
    pub fn build_products_dir(&self) -> std::result::Result<PathBuf, UsageError> {
        match &self.paths.build_dir {
            BuildDir::Path(dir) => Ok(paths::expand_home(dir)),
            BuildDir::Derived => self
                .derived_build_dir()
                .or_else(|| self.derived_build_dir_from_build_output())
                .ok_or(UsageError::UnknownBuildDir),
        }
    }

    /// Scan the derived-data cache for this workspace's build directory.
    ///
    /// Matches `<workspace-stem>-*` entries whose `info.plist` content
    /// mentions the configured workspace path. `None` means "currently
    /// unknown", not an error; callers fall back or fail explicitly.
    #[must_use]
    pub fn derived_build_dir(&self) -> Option<PathBuf> {
        let workspace = self.project.workspace_path.as_ref()?;
        let workspace_str = workspace.display().to_string();
        let stem = workspace
            .file_name()?
            .to_str()?
            .split('.')
            .next()?
            .to_string();
        let prefix = format!("{stem}-");

        let entries = std::fs::read_dir(self.paths.derived_data()).ok()?;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(&prefix) {
                continue;
            }
            let Ok(info) = std::fs::read_to_string(entry.path().join("info.plist")) else {
                continue;
            };
            if info.contains(&workspace_str) {
                return Some(entry.path().join("Build").join("Products"));
            }
        }
        None
    }

    /// Recover the products directory from the captured build log.
    #[must_use]
    pub fn derived_build_dir_from_build_output(&self) -> Option<PathBuf> {
        let output = std::fs::read_to_string(BUILD_LOG).ok()?;
        BuildOutputParser::new(&output).build_output_dir()
    }

    // --- Version metadata (delegated to the resolver) ---

    /// Current build number from the configured metadata files.
    ///
    /// # Errors
    ///
    /// Propagates metadata read failures; a missing file is `Ok(None)`.
    pub fn build_number(&self) -> XcbResult<Option<String>> {
        version::build_number(self)
    }

    /// Next build number, or `None` when no current one exists.
    ///
    /// # Errors
    ///
    /// Propagates metadata read failures.
    pub fn next_build_number(&self) -> XcbResult<Option<String>> {
        Ok(self
            .build_number()?
            .map(|number| version::next_build_number(&number)))
    }

    /// Bump the version stored in the configured metadata file.
    ///
    /// # Errors
    ///
    /// Propagates metadata read/write failures. A disabled increment flag or
    /// an absent metadata source is a `false` no-op, never an error.
    pub fn increment_build_number_in_metadata(&self) -> XcbResult<bool> {
        version::increment_build_number_in_metadata(self)
    }

    // --- Introspection ---

    /// Format configuration options for display.
    ///
    /// Sensitive fields are hidden with a `[hidden]` marker. Output is
    /// deterministically ordered.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        let set_opt = |options: &mut BTreeMap<String, String>, key: &str, v: &Option<String>| {
            if let Some(v) = v {
                options.insert(key.to_string(), v.clone());
            }
        };

        set_opt(&mut options, "project.app_name", &self.project.app_name);
        set_opt(&mut options, "project.target", &self.project.target);
        set_opt(&mut options, "project.scheme", &self.project.scheme);
        if let Some(workspace) = &self.project.workspace_path {
            options.insert(
                "project.workspace_path".into(),
                workspace.display().to_string(),
            );
        }
        options.insert(
            "project.configuration".into(),
            self.project.configuration.to_string(),
        );
        options.insert("project.sdk".into(), self.project.sdk.to_string());
        options.insert(
            "project.app_extension".into(),
            self.project.app_extension.clone(),
        );

        options.insert(
            "paths.build_dir".into(),
            String::from(self.paths.build_dir.clone()),
        );
        options.insert(
            "paths.package_destination".into(),
            self.paths.package_destination.display().to_string(),
        );
        options.insert(
            "paths.archive_path".into(),
            self.paths.archive_path.display().to_string(),
        );

        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert("global.verbose".into(), self.global.verbose.to_string());
        options.insert(
            "global.skip_clean".into(),
            self.global.skip_clean.to_string(),
        );
        options.insert(
            "global.auto_archive".into(),
            self.global.auto_archive.to_string(),
        );
        options.insert(
            "global.increment_version".into(),
            self.global.increment_version.to_string(),
        );
        options.insert(
            "global.include_version_in_package".into(),
            self.global.include_version_in_package.to_string(),
        );
        options.insert(
            "global.copy_bundle".into(),
            self.global.copy_bundle.to_string(),
        );

        options.insert(
            "tools.xcodebuild".into(),
            self.tools.xcodebuild.display().to_string(),
        );
        options.insert("tools.xcrun".into(), self.tools.xcrun.display().to_string());
        options.insert("tools.zip".into(), self.tools.zip.display().to_string());

        set_opt(&mut options, "deploy.strategy", &self.deploy.strategy);
        if !self.deploy.api_token.is_empty() {
            options.insert("deploy.api_token".into(), "[hidden]".into());
        }
        if !self.deploy.team_token.is_empty() {
            options.insert("deploy.team_token".into(), "[hidden]".into());
        }
        options.insert("deploy.endpoint".into(), self.deploy.endpoint.clone());

        set_opt(&mut options, "release.strategy", &self.release.strategy);
        options.insert("release.remote".into(), self.release.remote.clone());
        options.insert("release.tag_prefix".into(), self.release.tag_prefix.clone());

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
