// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              XcbError (~24 bytes)
//!                     |
//!   +--------+-------+--------+--------+
//!   |    |   |    |     |     |    |   |
//!   v    v   v    v     v     v    v   v
//! Bail Usage Cfg Proc Version Strat Io Other
//!       Box  Box  Box   Box    Box Box Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Usage    SchemeRequired, MissingAppIdentity, MissingSigningIdentity, ...
//!   Config   InvalidValue
//!   Process  ExecutableNotFound, SpawnFailed, NonZeroExit
//!   Version  Io, Parse
//!   Strategy NotFound, MissingArtifact
//!
//! All variants boxed => XcbError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`XcbError`].
pub type XcbResult<T> = std::result::Result<T, XcbError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum XcbError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// The build log contained the toolchain failure marker.
    ///
    /// The message is fixed; details live in the captured build log.
    #[error("** BUILD FAILED **")]
    BuildFailed,

    /// Required configuration is missing or inconsistent at the point of use.
    #[error("usage error: {0}")]
    Usage(#[from] Box<UsageError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Version metadata error.
    #[error("version error: {0}")]
    Version(#[from] Box<VersionError>),

    /// Strategy selection or execution error.
    #[error("strategy error: {0}")]
    Strategy(#[from] Box<StrategyError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`XcbError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> XcbError {
    XcbError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for XcbError {
                fn from(err: $error) -> Self {
                    XcbError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    UsageError => Usage,
    ConfigError => Config,
    ProcessError => Process,
    VersionError => Version,
    StrategyError => Strategy,
    std::io::Error => Io,
}

// --- Usage Errors ---

/// Invalid or missing required configuration, detected at the point of use.
///
/// These are never silently defaulted; every variant is fatal.
#[derive(Debug, Error)]
pub enum UsageError {
    /// Workspace builds need a scheme to select what gets built.
    #[error("a scheme is required when building from a workspace")]
    SchemeRequired,

    /// Neither a workspace nor a target was configured.
    #[error("a target (or a workspace and scheme) must be set in the builder configuration")]
    MissingTarget,

    /// Neither `app_name` nor `target` is set, so no artifact can be named.
    #[error("app_name or target must be set in the builder configuration")]
    MissingAppIdentity,

    /// Packaging a device build requires a signing identity.
    #[error("no signing identity found, cannot package the build")]
    MissingSigningIdentity,

    /// No build-dir mechanism produced a usable products directory.
    #[error("build products directory could not be determined")]
    UnknownBuildDir,

    /// A deployment step was requested but no strategy is bound.
    #[error("no deployment strategy configured")]
    NoDeploymentStrategy,

    /// A release was requested but no strategy is bound.
    #[error("no release strategy configured")]
    NoReleaseStrategy,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },
}

// --- Version Metadata Errors ---

/// Errors reading or rewriting version metadata files.
///
/// A *missing* metadata file is not an error; it is modelled as `Ok(None)`
/// by the version resolver.
#[derive(Debug, Error)]
pub enum VersionError {
    /// I/O error on a metadata file that does exist.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The property list could not be parsed as XML.
    #[error("failed to parse property list '{path}': {message}")]
    Parse { path: String, message: String },
}

// --- Strategy Errors ---

/// Deployment/release strategy errors.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The configured strategy name is not registered.
    #[error("unknown strategy '{name}'")]
    NotFound { name: String },

    /// The artifact a strategy operates on has not been produced.
    #[error("packaged artifact not found: {path}")]
    MissingArtifact { path: String },
}
