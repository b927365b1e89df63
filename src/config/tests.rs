// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::Config;
use super::paths::expand_home;
use super::types::{BuildConfiguration, BuildDir, ExtraArgs, Sdk};
use crate::error::UsageError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn workspace_config() -> Config {
    let mut config = Config::default();
    config.project.workspace_path = Some(PathBuf::from("Demo.xcworkspace"));
    config.project.scheme = Some("Demo".to_string());
    config
}

// =============================================================================
// build_arguments
// =============================================================================

#[test]
fn build_arguments_for_workspace_and_scheme() {
    let config = workspace_config();
    let args = config.build_arguments().unwrap();
    assert_eq!(
        args,
        vec![
            "-workspace",
            "Demo.xcworkspace",
            "-scheme",
            "Demo",
            "-sdk",
            "iphoneos",
            "-configuration",
            "Adhoc",
            "BUILD_DIR=build",
        ]
    );
}

#[test]
fn build_arguments_require_scheme_with_workspace() {
    let mut config = workspace_config();
    config.project.scheme = None;
    assert!(matches!(
        config.build_arguments(),
        Err(UsageError::SchemeRequired)
    ));
}

#[test]
fn build_arguments_for_target_and_project() {
    let mut config = Config::default();
    config.project.target = Some("Demo".to_string());
    config.project.project_file_path = Some(PathBuf::from("Demo.xcodeproj"));
    let args = config.build_arguments().unwrap();
    assert_eq!(&args[..4], &["-target", "Demo", "-project", "Demo.xcodeproj"]);
}

#[test]
fn build_arguments_require_some_build_target() {
    let config = Config::default();
    assert!(matches!(
        config.build_arguments(),
        Err(UsageError::MissingTarget)
    ));
}

#[test]
fn build_arguments_skip_build_dir_for_derived_sentinel() {
    let mut config = workspace_config();
    config.paths.build_dir = BuildDir::Derived;
    let args = config.build_arguments().unwrap();
    assert!(!args.iter().any(|arg| arg.starts_with("BUILD_DIR=")));
}

#[test]
fn build_arguments_append_scalar_extra_args() {
    let mut config = workspace_config();
    config.build.extra_args = Some(ExtraArgs::One("ONLY_ACTIVE_ARCH=NO".to_string()));
    let args = config.build_arguments().unwrap();
    assert_eq!(args.last().unwrap(), "ONLY_ACTIVE_ARCH=NO");
}

#[test]
fn build_arguments_append_list_extra_args() {
    let mut config = workspace_config();
    config.build.extra_args = Some(ExtraArgs::Many(vec![
        "-arch".to_string(),
        "armv7".to_string(),
    ]));
    let args = config.build_arguments().unwrap();
    assert_eq!(&args[args.len() - 2..], &["-arch", "armv7"]);
}

// =============================================================================
// Artifact naming
// =============================================================================

#[test]
fn app_file_name_requires_an_identity() {
    let config = Config::default();
    assert!(matches!(
        config.app_file_name(),
        Err(UsageError::MissingAppIdentity)
    ));
}

#[test]
fn app_file_name_uses_configured_extension() {
    let mut config = Config::default();
    config.project.app_name = Some("Demo".to_string());
    assert_eq!(config.app_file_name().unwrap(), "Demo.app");

    config.project.app_extension = "framework".to_string();
    assert_eq!(config.app_file_name().unwrap(), "Demo.framework");
}

#[test]
fn artifact_names_prefer_app_name_over_target() {
    let mut config = Config::default();
    config.project.app_name = Some("Foo".to_string());
    config.project.target = Some("Bar".to_string());
    assert_eq!(config.ipa_name().unwrap(), "Foo.ipa");
    assert_eq!(config.archive_name().unwrap(), "Foo");
    assert_eq!(config.dsym_name().unwrap(), "Foo.dSYM.zip");
}

#[test]
fn artifact_names_fall_back_to_target() {
    let mut config = Config::default();
    config.project.target = Some("Bar".to_string());
    assert_eq!(config.ipa_name().unwrap(), "Bar.ipa");
    assert_eq!(config.archive_name().unwrap(), "Bar");
}

#[test]
fn version_suffix_is_shared_by_all_packaged_names() {
    let temp = temp_dir();
    let podspec = temp.path().join("demo.podspec");
    std::fs::write(&podspec, "version = '1.0.3'\n").unwrap();

    let mut config = Config::default();
    config.project.app_name = Some("Foo".to_string());
    config.paths.podspec = Some(podspec);
    config.global.include_version_in_package = true;

    assert_eq!(config.ipa_name().unwrap(), "Foo-1.0.3.ipa");
    assert_eq!(config.dsym_name().unwrap(), "Foo-1.0.3.dSYM.zip");
    assert_eq!(config.zipped_package_name().unwrap(), "Foo-1.0.3.zip");
}

#[test]
fn version_suffix_is_empty_when_flag_is_off() {
    let temp = temp_dir();
    let podspec = temp.path().join("demo.podspec");
    std::fs::write(&podspec, "version = '1.0.3'\n").unwrap();

    let mut config = Config::default();
    config.project.app_name = Some("Foo".to_string());
    config.paths.podspec = Some(podspec);

    assert_eq!(config.ipa_name().unwrap(), "Foo.ipa");
}

#[test]
fn version_suffix_is_empty_without_a_build_number() {
    let mut config = Config::default();
    config.project.app_name = Some("Foo".to_string());
    config.global.include_version_in_package = true;
    assert_eq!(config.ipa_name().unwrap(), "Foo.ipa");
}

// =============================================================================
// Paths
// =============================================================================

#[test]
fn built_products_subdir_joins_configuration_and_sdk() {
    let mut config = Config::default();
    assert_eq!(config.built_products_subdir(), "Adhoc-iphoneos");

    config.project.configuration = BuildConfiguration::Release;
    config.project.sdk = Sdk::Iphonesimulator;
    assert_eq!(config.built_products_subdir(), "Release-iphonesimulator");
}

#[test]
fn built_products_subdir_has_no_suffix_on_desktop_sdk() {
    let mut config = Config::default();
    config.project.configuration = BuildConfiguration::Release;
    config.project.sdk = Sdk::Macosx;
    assert_eq!(config.built_products_subdir(), "Release");
}

#[test]
fn built_app_path_under_explicit_build_dir() {
    let mut config = Config::default();
    config.project.app_name = Some("Demo".to_string());
    config.project.target = Some("Demo".to_string());
    config.paths.build_dir = BuildDir::Path(PathBuf::from("/b"));
    assert_eq!(
        config.built_app_path().unwrap(),
        PathBuf::from("/b/Adhoc-iphoneos/Demo.app")
    );
    assert_eq!(
        config.built_dsym_path().unwrap(),
        PathBuf::from("/b/Adhoc-iphoneos/Demo.app.dSYM")
    );
}

#[test]
fn ipa_and_dsym_paths_join_package_destination() {
    let mut config = Config::default();
    config.project.app_name = Some("Demo".to_string());
    config.paths.package_destination = PathBuf::from("/pkg");
    assert_eq!(config.ipa_path().unwrap(), PathBuf::from("/pkg/Demo.ipa"));
    assert_eq!(
        config.dsym_path().unwrap(),
        PathBuf::from("/pkg/Demo.dSYM.zip")
    );
    assert_eq!(
        config.app_bundle_path().unwrap(),
        PathBuf::from("/pkg/Demo.app")
    );
}

#[test]
fn expand_home_resolves_tilde_prefix() {
    let home = dirs::home_dir().expect("home dir in test env");
    assert_eq!(
        expand_home(Path::new("~/Library/Archives")),
        home.join("Library/Archives")
    );
    assert_eq!(expand_home(Path::new("/abs/path")), Path::new("/abs/path"));
}

// =============================================================================
// Derived build dir scan
// =============================================================================

#[test]
fn derived_build_dir_matches_workspace_metadata() {
    let temp = temp_dir();
    let derived = temp.path();

    // a cache entry for another checkout of the same workspace name
    let other = derived.join("Demo-aaaaaaaa");
    std::fs::create_dir_all(&other).unwrap();
    std::fs::write(other.join("info.plist"), "WorkspacePath /elsewhere/Demo.xcworkspace").unwrap();

    // the entry for our workspace
    let ours = derived.join("Demo-bbbbbbbb");
    std::fs::create_dir_all(&ours).unwrap();
    std::fs::write(
        ours.join("info.plist"),
        "WorkspacePath /projects/Demo.xcworkspace",
    )
    .unwrap();

    let mut config = Config::default();
    config.project.workspace_path = Some(PathBuf::from("/projects/Demo.xcworkspace"));
    config.paths.derived_data = derived.to_path_buf();

    assert_eq!(
        config.derived_build_dir(),
        Some(ours.join("Build").join("Products"))
    );
}

#[test]
fn derived_build_dir_is_none_without_a_match() {
    let temp = temp_dir();
    let mut config = Config::default();
    config.project.workspace_path = Some(PathBuf::from("/projects/Demo.xcworkspace"));
    config.paths.derived_data = temp.path().to_path_buf();
    assert_eq!(config.derived_build_dir(), None);
}

#[test]
fn derived_build_dir_is_none_without_a_workspace() {
    let config = Config::default();
    assert_eq!(config.derived_build_dir(), None);
}

// =============================================================================
// Typed option parsing
// =============================================================================

#[test]
fn parse_resolves_typed_enums() {
    let toml = r#"
[project]
app_name = "Demo"
configuration = "Debug"
sdk = "macosx"

[paths]
build_dir = "derived"
"#;
    let config = Config::parse(toml).unwrap();
    assert_eq!(config.project.configuration, BuildConfiguration::Debug);
    assert_eq!(config.project.sdk, Sdk::Macosx);
    assert!(config.paths.build_dir.is_derived());
}

#[test]
fn parse_keeps_custom_configuration_names() {
    let toml = r#"
[project]
configuration = "Beta"
sdk = "iphoneos17.0"
"#;
    let config = Config::parse(toml).unwrap();
    assert_eq!(
        config.project.configuration,
        BuildConfiguration::Custom("Beta".to_string())
    );
    assert_eq!(config.project.configuration.to_string(), "Beta");
    assert!(!config.project.sdk.is_device());
}

#[test]
fn default_config_matches_tool_conventions() {
    let config = Config::default();
    assert_eq!(config.project.configuration, BuildConfiguration::Adhoc);
    assert_eq!(config.project.sdk, Sdk::Iphoneos);
    assert_eq!(config.project.app_extension, "app");
    assert_eq!(config.paths.build_dir, BuildDir::Path(PathBuf::from("build")));
    assert_eq!(config.tools.xcodebuild, PathBuf::from("/usr/bin/xcodebuild"));
    assert_eq!(config.tools.xcrun, PathBuf::from("/usr/bin/xcrun"));
    assert_eq!(
        config.deploy.endpoint,
        "https://testflightapp.com/api/builds.json"
    );
}
