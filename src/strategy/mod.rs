// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deployment and release strategies.
//!
//! # Architecture
//!
//! ```text
//! DeploymentStrategy enum --> Deployable (prepare/deploy)
//!     TestFlight            multipart upload + release notes
//!
//! ReleaseStrategy enum ----> Releasable (prepare/release)
//!     Git                   tag + version bump
//!
//! Selection by name at pipeline setup; unknown names are a typed
//! "strategy not found" error. Every strategy holds an Arc back to the
//! shared Configuration.
//! ```
//!
//! # The Strategy Pattern
//!
//! Both enums dispatch through a trait implemented via a delegation macro,
//! one match arm per variant. Adding a strategy:
//!
//! 1. Create the strategy struct in this module
//! 2. Implement `Deployable` (or `Releasable`) for the struct
//! 3. Add a variant to the enum and its name to `for_name`
//! 4. Add the variant name to the macro invocation

pub mod git;
pub mod notes;
pub mod testflight;

use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, StrategyError, XcbResult};

use git::GitReleaseStrategy;
use testflight::TestFlightStrategy;

/// Trait for deployment strategy implementations.
pub trait Deployable {
    /// Returns the strategy name.
    fn name(&self) -> &str;

    /// Validates preconditions for a deploy.
    fn prepare<'a>(&'a self) -> BoxFuture<'a, Result<()>>;

    /// Ships the packaged artifact.
    fn deploy<'a>(&'a self) -> BoxFuture<'a, Result<()>>;
}

/// Trait for release strategy implementations.
pub trait Releasable {
    /// Returns the strategy name.
    fn name(&self) -> &str;

    /// Validates preconditions for a release.
    fn prepare<'a>(&'a self) -> BoxFuture<'a, Result<()>>;

    /// Cuts the release.
    fn release<'a>(&'a self) -> BoxFuture<'a, Result<()>>;
}

/// A deployment strategy, dispatched at compile time.
#[derive(Debug, Clone)]
pub enum DeploymentStrategy {
    /// Hosted distribution service upload.
    TestFlight(TestFlightStrategy),
}

impl DeploymentStrategy {
    /// Look up a deployment strategy by its registered name.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::NotFound`] for unregistered names.
    pub fn for_name(name: &str, config: Arc<Config>) -> XcbResult<Self> {
        match name {
            "testflight" => Ok(Self::TestFlight(TestFlightStrategy::new(config))),
            _ => Err(StrategyError::NotFound {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Build the strategy bound by the configuration, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::NotFound`] when the configured name is not
    /// registered.
    pub fn from_config(config: &Arc<Config>) -> XcbResult<Option<Self>> {
        config
            .deploy
            .strategy
            .as_deref()
            .map(|name| Self::for_name(name, Arc::clone(config)))
            .transpose()
    }
}

/// A release strategy, dispatched at compile time.
#[derive(Debug, Clone)]
pub enum ReleaseStrategy {
    /// Tag-and-bump release through the git CLI.
    Git(GitReleaseStrategy),
}

impl ReleaseStrategy {
    /// Look up a release strategy by its registered name.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::NotFound`] for unregistered names.
    pub fn for_name(name: &str, config: Arc<Config>) -> XcbResult<Self> {
        match name {
            "git" => Ok(Self::Git(GitReleaseStrategy::new(config))),
            _ => Err(StrategyError::NotFound {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Build the strategy bound by the configuration, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::NotFound`] when the configured name is not
    /// registered.
    pub fn from_config(config: &Arc<Config>) -> XcbResult<Option<Self>> {
        config
            .release
            .strategy
            .as_deref()
            .map(|name| Self::for_name(name, Arc::clone(config)))
            .transpose()
    }
}

/// Macro to implement Deployable for the enum by delegating to inner types.
macro_rules! impl_deployable_for_strategy {
    ($($variant:ident),+ $(,)?) => {
        impl Deployable for DeploymentStrategy {
            fn name(&self) -> &str {
                match self {
                    $(DeploymentStrategy::$variant(s) => Deployable::name(s),)+
                }
            }

            fn prepare<'a>(&'a self) -> BoxFuture<'a, Result<()>> {
                match self {
                    $(DeploymentStrategy::$variant(s) => Deployable::prepare(s),)+
                }
            }

            fn deploy<'a>(&'a self) -> BoxFuture<'a, Result<()>> {
                match self {
                    $(DeploymentStrategy::$variant(s) => Deployable::deploy(s),)+
                }
            }
        }
    };
}

/// Macro to implement Releasable for the enum by delegating to inner types.
macro_rules! impl_releasable_for_strategy {
    ($($variant:ident),+ $(,)?) => {
        impl Releasable for ReleaseStrategy {
            fn name(&self) -> &str {
                match self {
                    $(ReleaseStrategy::$variant(s) => Releasable::name(s),)+
                }
            }

            fn prepare<'a>(&'a self) -> BoxFuture<'a, Result<()>> {
                match self {
                    $(ReleaseStrategy::$variant(s) => Releasable::prepare(s),)+
                }
            }

            fn release<'a>(&'a self) -> BoxFuture<'a, Result<()>> {
                match self {
                    $(ReleaseStrategy::$variant(s) => Releasable::release(s),)+
                }
            }
        }
    };
}

impl_deployable_for_strategy!(TestFlight);
impl_releasable_for_strategy!(Git);

#[cfg(test)]
mod tests;
