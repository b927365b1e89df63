// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for xcb-rs.
//!
//! # Config Structure
//!
//! ```text
//! Config: ProjectConfig, PathsConfig, GlobalConfig, ToolsConfig,
//!         BuildStepConfig, PackageConfig, DeployConfig, ReleaseConfig
//! ```
//!
//! # Build Configuration
//!
//! ```text
//! BuildConfiguration: Debug | Release | Adhoc (default) | Custom
//! Sdk:                iphoneos (default) | iphonesimulator | macosx | custom
//! BuildDir:           "derived" sentinel | explicit path (default "build")
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Build configuration name (Debug, Release, Adhoc, or a custom scheme-defined one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildConfiguration {
    Debug,
    Release,
    Adhoc,
    /// Any other configuration name defined by the project.
    Custom(String),
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        Self::Adhoc
    }
}

impl std::fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "Debug"),
            Self::Release => write!(f, "Release"),
            Self::Adhoc => write!(f, "Adhoc"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl From<String> for BuildConfiguration {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "debug" => Self::Debug,
            "release" => Self::Release,
            "adhoc" => Self::Adhoc,
            _ => Self::Custom(value),
        }
    }
}

impl From<BuildConfiguration> for String {
    fn from(value: BuildConfiguration) -> Self {
        value.to_string()
    }
}

/// SDK the toolchain builds against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sdk {
    Iphoneos,
    Iphonesimulator,
    Macosx,
    /// Versioned or otherwise non-standard SDK identifier.
    Custom(String),
}

impl Default for Sdk {
    fn default() -> Self {
        Self::Iphoneos
    }
}

impl Sdk {
    /// Whether this SDK targets a physical device.
    ///
    /// Only device builds get packaged into a signed IPA + dSYM bundle.
    #[must_use]
    pub const fn is_device(&self) -> bool {
        matches!(self, Self::Iphoneos)
    }

    /// Suffix appended to the configuration name in the products directory.
    ///
    /// The desktop SDK writes products to a bare `<configuration>` directory.
    #[must_use]
    pub fn product_dir_suffix(&self) -> String {
        match self {
            Self::Macosx => String::new(),
            other => format!("-{other}"),
        }
    }
}

impl std::fmt::Display for Sdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iphoneos => write!(f, "iphoneos"),
            Self::Iphonesimulator => write!(f, "iphonesimulator"),
            Self::Macosx => write!(f, "macosx"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl From<String> for Sdk {
    fn from(value: String) -> Self {
        match value.as_str() {
            "iphoneos" => Self::Iphoneos,
            "iphonesimulator" => Self::Iphonesimulator,
            "macosx" => Self::Macosx,
            _ => Self::Custom(value),
        }
    }
}

impl From<Sdk> for String {
    fn from(value: Sdk) -> Self {
        value.to_string()
    }
}

/// Build output directory: an explicit path, or the "derived" sentinel meaning
/// the toolchain picks (and we discover) the location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildDir {
    /// Toolchain-chosen derived-data location, discovered at build time.
    Derived,
    /// Explicit build directory passed to the toolchain.
    Path(PathBuf),
}

impl Default for BuildDir {
    fn default() -> Self {
        Self::Path(PathBuf::from("build"))
    }
}

impl BuildDir {
    /// Whether this is the "derived" sentinel.
    #[must_use]
    pub const fn is_derived(&self) -> bool {
        matches!(self, Self::Derived)
    }
}

impl From<String> for BuildDir {
    fn from(value: String) -> Self {
        if value == "derived" {
            Self::Derived
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

impl From<BuildDir> for String {
    fn from(value: BuildDir) -> Self {
        match value {
            BuildDir::Derived => "derived".to_string(),
            BuildDir::Path(path) => path.display().to_string(),
        }
    }
}

/// Free-form passthrough arguments, accepted as a scalar or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraArgs {
    One(String),
    Many(Vec<String>),
}

impl ExtraArgs {
    /// Flatten to an argument vector regardless of form.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(arg) => vec![arg.clone()],
            Self::Many(args) => args.clone(),
        }
    }
}

/// Project identity: what gets built and against what.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Application name, preferred over `target` for artifact naming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Build target (project-based builds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Scheme (required for workspace-based builds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Workspace file path. Mutually exclusive with target-based builds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_path: Option<PathBuf>,
    /// Project file path (optional for target-based builds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_file_path: Option<PathBuf>,
    /// Build configuration name.
    pub configuration: BuildConfiguration,
    /// SDK identifier.
    pub sdk: Sdk,
    /// Extension of the built bundle.
    pub app_extension: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            target: None,
            scheme: None,
            workspace_path: None,
            project_file_path: None,
            configuration: BuildConfiguration::default(),
            sdk: Sdk::default(),
            app_extension: "app".to_string(),
        }
    }
}

/// Behavior flags and log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Skip the network-performing deploy, report intent only.
    pub dry: bool,
    /// Echo every constructed toolchain command and its output.
    pub verbose: bool,
    /// Leave previous build products in place.
    pub skip_clean: bool,
    /// Archive automatically as part of packaging.
    pub auto_archive: bool,
    /// Bump the metadata version as part of a release.
    pub increment_version: bool,
    /// Append `-<build_number>` to packaged artifact names.
    pub include_version_in_package: bool,
    /// Copy the built bundle to the package destination.
    pub copy_bundle: bool,

    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            verbose: false,
            skip_clean: false,
            auto_archive: false,
            increment_version: false,
            include_version_in_package: false,
            copy_bundle: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Tool paths configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Xcode build driver.
    pub xcodebuild: PathBuf,
    /// Xcode tool runner (packaging/signing).
    pub xcrun: PathBuf,
    /// Archiver used for the dSYM bundle.
    pub zip: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            xcodebuild: PathBuf::from("/usr/bin/xcodebuild"),
            xcrun: PathBuf::from("/usr/bin/xcrun"),
            zip: PathBuf::from("zip"),
        }
    }
}

/// Extra arguments forwarded verbatim to the build invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildStepConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_args: Option<ExtraArgs>,
}

/// Packaging and signing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Code-signing identity; required for device packaging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_identity: Option<String>,
    /// Provisioning profile embedded into the IPA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_profile: Option<PathBuf>,
    /// Extra arguments forwarded verbatim to the packaging invocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_args: Option<ExtraArgs>,
}

/// Deployment strategy binding and distribution-service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Deployment strategy name; `None` disables the deploy steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Distribution-service API token.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_token: String,
    /// Distribution-service team token.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub team_token: String,
    /// Upload endpoint.
    pub endpoint: String,
    /// Distribution list names, joined with commas in the upload payload.
    pub distribution_lists: Vec<String>,
    /// Notify testers about the new build.
    pub notify: bool,
    /// Replace an existing build with the same version.
    pub replace: bool,
    /// Attach the zipped dSYM bundle to the upload.
    pub upload_dsym: bool,
    /// Pre-resolved release notes; when unset, notes are gathered interactively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
}

/// Default upload endpoint for the `testflight` strategy.
pub const TESTFLIGHT_ENDPOINT: &str = "https://testflightapp.com/api/builds.json";

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            strategy: None,
            api_token: String::new(),
            team_token: String::new(),
            endpoint: TESTFLIGHT_ENDPOINT.to_string(),
            distribution_lists: Vec::new(),
            notify: false,
            replace: false,
            upload_dsym: false,
            release_notes: None,
        }
    }
}

/// Release strategy binding and git settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Release strategy name; `None` disables the release command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Remote the release tag is pushed to.
    pub remote: String,
    /// Prefix prepended to the build number when tagging.
    pub tag_prefix: String,
    /// Push the tag after creating it.
    pub push_tag: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            strategy: None,
            remote: "origin".to_string(),
            tag_prefix: "v".to_string(),
            push_tag: true,
        }
    }
}
