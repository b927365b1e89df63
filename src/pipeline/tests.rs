// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Pipeline, Step, copy_dir_recursive};
use crate::config::Config;
use crate::config::types::Sdk;
use crate::error::UsageError;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Configuration whose tool paths cannot possibly spawn, so any test that
/// accidentally reaches a subprocess fails loudly with a spawn error.
fn unreachable_tools_config() -> Config {
    let mut config = Config::default();
    config.project.target = Some("Demo".to_string());
    config.tools.xcodebuild = PathBuf::from("/nonexistent/xcodebuild");
    config.tools.xcrun = PathBuf::from("/nonexistent/xcrun");
    config.tools.zip = PathBuf::from("/nonexistent/zip");
    config
}

fn pipeline(config: Config) -> Pipeline {
    Pipeline::from_config(Arc::new(config)).expect("pipeline should build")
}

// =============================================================================
// Step graph
// =============================================================================

#[test]
fn step_execution_order_is_dependency_first() {
    assert_eq!(Step::Clean.execution_order(), &[Step::Clean]);
    assert_eq!(Step::Build.execution_order(), &[Step::Clean, Step::Build]);
    assert_eq!(
        Step::Package.execution_order(),
        &[Step::Clean, Step::Build, Step::Package]
    );
    assert_eq!(
        Step::Archive.execution_order(),
        &[Step::Clean, Step::Build, Step::Archive]
    );
    assert_eq!(
        Step::Deploy.execution_order(),
        &[
            Step::Clean,
            Step::Build,
            Step::Package,
            Step::Prepare,
            Step::Deploy
        ]
    );
}

#[test]
fn redeploy_skips_the_build_half_of_the_graph() {
    assert_eq!(Step::Redeploy.execution_order(), &[Step::Redeploy]);
}

#[test]
fn step_names() {
    assert_eq!(Step::Clean.name(), "clean");
    assert_eq!(Step::Redeploy.name(), "redeploy");
    assert_eq!(Step::Package.to_string(), "package");
}

// =============================================================================
// Step guards
// =============================================================================

#[tokio::test]
async fn clean_is_a_noop_when_skip_clean_is_set() {
    let mut config = unreachable_tools_config();
    config.global.skip_clean = true;
    // the toolchain binary doesn't exist, so reaching it would error
    pipeline(config).clean().await.expect("skip must not spawn");
}

#[tokio::test]
async fn package_without_signing_identity_fails_before_any_subprocess() {
    let mut config = unreachable_tools_config();
    config.project.sdk = Sdk::Iphoneos;
    config.global.auto_archive = true;

    let err = pipeline(config).package().await.expect_err("must fail");
    // a spawn error here would mean a subprocess ran before the guard
    assert!(matches!(
        err.downcast_ref::<UsageError>(),
        Some(UsageError::MissingSigningIdentity)
    ));
}

#[tokio::test]
async fn package_skips_non_device_sdks() {
    let mut config = unreachable_tools_config();
    config.project.sdk = Sdk::Iphonesimulator;
    // no signing identity and unreachable tools: skipping is the only way
    // this can succeed
    pipeline(config).package().await.expect("simulator skips");
}

#[tokio::test]
async fn deploy_without_strategy_is_a_usage_error() {
    let err = pipeline(unreachable_tools_config())
        .deploy()
        .await
        .expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<UsageError>(),
        Some(UsageError::NoDeploymentStrategy)
    ));
}

#[tokio::test]
async fn redeploy_without_strategy_is_a_usage_error() {
    let err = pipeline(unreachable_tools_config())
        .redeploy()
        .await
        .expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<UsageError>(),
        Some(UsageError::NoDeploymentStrategy)
    ));
}

#[tokio::test]
async fn release_without_strategy_is_a_usage_error() {
    let err = pipeline(unreachable_tools_config())
        .release()
        .await
        .expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<UsageError>(),
        Some(UsageError::NoReleaseStrategy)
    ));
}

#[test]
fn from_config_rejects_unknown_strategy_names() {
    let mut config = unreachable_tools_config();
    config.deploy.strategy = Some("carrier-pigeon".to_string());
    assert!(Pipeline::from_config(Arc::new(config)).is_err());
}

// =============================================================================
// Bundle copy
// =============================================================================

#[test]
fn copy_dir_recursive_copies_nested_trees() {
    let temp = temp_dir();
    let src = temp.path().join("Demo.app");
    std::fs::create_dir_all(src.join("Frameworks")).unwrap();
    std::fs::write(src.join("Info.plist"), "plist").unwrap();
    std::fs::write(src.join("Frameworks").join("lib.dylib"), "bits").unwrap();

    let dst = temp.path().join("out").join("Demo.app");
    copy_dir_recursive(&src, &dst).unwrap();

    assert_eq!(std::fs::read_to_string(dst.join("Info.plist")).unwrap(), "plist");
    assert_eq!(
        std::fs::read_to_string(dst.join("Frameworks").join("lib.dylib")).unwrap(),
        "bits"
    );
}
