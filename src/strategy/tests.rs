// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Deployable, DeploymentStrategy, Releasable, ReleaseStrategy};
use crate::config::Config;
use crate::error::{StrategyError, XcbError};
use std::sync::Arc;

fn shared_config() -> Arc<Config> {
    Arc::new(Config::default())
}

#[test]
fn deployment_strategy_resolves_by_name() {
    let strategy = DeploymentStrategy::for_name("testflight", shared_config()).unwrap();
    assert_eq!(strategy.name(), "testflight");
}

#[test]
fn deployment_strategy_rejects_unknown_name() {
    let err = DeploymentStrategy::for_name("hockeyapp", shared_config()).unwrap_err();
    assert!(matches!(
        err,
        XcbError::Strategy(boxed)
            if matches!(&*boxed, StrategyError::NotFound { name } if name == "hockeyapp")
    ));
}

#[test]
fn release_strategy_resolves_by_name() {
    let strategy = ReleaseStrategy::for_name("git", shared_config()).unwrap();
    assert_eq!(strategy.name(), "git");
}

#[test]
fn release_strategy_rejects_unknown_name() {
    let err = ReleaseStrategy::for_name("svn", shared_config()).unwrap_err();
    assert!(matches!(err, XcbError::Strategy(_)));
}

#[test]
fn no_strategy_configured_means_no_binding() {
    let config = shared_config();
    assert!(DeploymentStrategy::from_config(&config).unwrap().is_none());
    assert!(ReleaseStrategy::from_config(&config).unwrap().is_none());
}

#[test]
fn configured_strategy_builds_from_config() {
    let mut config = Config::default();
    config.deploy.strategy = Some("testflight".to_string());
    config.release.strategy = Some("git".to_string());
    let config = Arc::new(config);

    let deployment = DeploymentStrategy::from_config(&config).unwrap().unwrap();
    assert_eq!(deployment.name(), "testflight");

    let release = ReleaseStrategy::from_config(&config).unwrap().unwrap();
    assert_eq!(release.name(), "git");
}

#[test]
fn misconfigured_strategy_name_is_an_error() {
    let mut config = Config::default();
    config.deploy.strategy = Some("carrier-pigeon".to_string());
    let config = Arc::new(config);
    assert!(DeploymentStrategy::from_config(&config).is_err());
}
