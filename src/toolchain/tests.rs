// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::ProcessBuilder;
use super::parser::BuildOutputParser;
use crate::error::{ProcessError, XcbError};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

// =============================================================================
// BuildOutputParser
// =============================================================================

const FAILED_LOG: &str = "\
CompileC build/Demo.build/main.o main.m normal armv7
ld: library not found for -lMissing
** BUILD FAILED **

The following build commands failed:
	Ld build/Adhoc-iphoneos/Demo.app/Demo normal armv7
";

const SUCCESS_LOG: &str = "\
CompileC build/Demo.build/main.o main.m normal armv7
Touch /tmp/DerivedData/Demo-abc/Build/Products/Adhoc-iphoneos/Demo.app
    /usr/bin/touch -c /tmp/DerivedData/Demo-abc/Build/Products/Adhoc-iphoneos/Demo.app
** BUILD SUCCEEDED **
";

#[test]
fn parser_detects_failure_marker() {
    assert!(BuildOutputParser::new(FAILED_LOG).failed());
}

#[test]
fn parser_detects_signing_failure() {
    let log = "Code Sign error: no identity found\n";
    assert!(BuildOutputParser::new(log).failed());
}

#[test]
fn parser_accepts_successful_log() {
    assert!(!BuildOutputParser::new(SUCCESS_LOG).failed());
}

#[test]
fn parser_recovers_build_output_dir() {
    let dir = BuildOutputParser::new(SUCCESS_LOG).build_output_dir();
    assert_eq!(
        dir,
        Some(std::path::PathBuf::from(
            "/tmp/DerivedData/Demo-abc/Build/Products/Adhoc-iphoneos"
        ))
    );
}

#[test]
fn parser_returns_none_without_marker_line() {
    assert_eq!(BuildOutputParser::new(FAILED_LOG).build_output_dir(), None);
}

// =============================================================================
// ProcessBuilder
// =============================================================================

#[tokio::test]
async fn run_captures_combined_output_to_log() {
    let temp = temp_dir();
    let log = temp.path().join("build.output");

    let code = ProcessBuilder::new("/bin/sh")
        .args(["-c", "echo out; echo err >&2"])
        .log_to(&log)
        .run()
        .await
        .expect("process should succeed");

    assert_eq!(code, 0);
    let captured = std::fs::read_to_string(&log).expect("log should exist");
    assert!(captured.contains("out"));
    assert!(captured.contains("err"));
}

#[tokio::test]
async fn run_overwrites_previous_log() {
    let temp = temp_dir();
    let log = temp.path().join("build.output");
    std::fs::write(&log, "stale contents\n").unwrap();

    ProcessBuilder::new("/bin/sh")
        .args(["-c", "echo fresh"])
        .log_to(&log)
        .run()
        .await
        .unwrap();

    let captured = std::fs::read_to_string(&log).unwrap();
    assert!(captured.contains("fresh"));
    assert!(!captured.contains("stale"));
}

#[tokio::test]
async fn run_fails_on_non_zero_exit() {
    let err = ProcessBuilder::new("/bin/sh")
        .args(["-c", "exit 3"])
        .run()
        .await
        .expect_err("non-zero exit should fail");

    match err {
        XcbError::Process(boxed) => match *boxed {
            ProcessError::NonZeroExit { code, .. } => assert_eq!(code, 3),
            other => panic!("expected NonZeroExit, got {other:?}"),
        },
        other => panic!("expected process error, got {other:?}"),
    }
}

#[tokio::test]
async fn allow_failure_returns_exit_code() {
    let code = ProcessBuilder::new("/bin/sh")
        .args(["-c", "exit 3"])
        .allow_failure()
        .run()
        .await
        .expect("allow_failure should not error");
    assert_eq!(code, 3);
}

#[tokio::test]
async fn run_fails_to_spawn_missing_executable() {
    let err = ProcessBuilder::new("/nonexistent/tool")
        .run()
        .await
        .expect_err("missing executable should fail");
    assert!(matches!(
        err,
        XcbError::Process(boxed) if matches!(*boxed, ProcessError::SpawnFailed { .. })
    ));
}

#[tokio::test]
async fn output_returns_trimmed_stdout() {
    let out = ProcessBuilder::new("/bin/sh")
        .args(["-c", "echo '  hello  '"])
        .output()
        .await
        .unwrap();
    assert_eq!(out, "hello");
}

#[test]
fn which_resolves_known_executable() {
    let builder = ProcessBuilder::which("sh").expect("sh should be in PATH");
    let _ = builder;
}

#[test]
fn which_rejects_unknown_executable() {
    let err = ProcessBuilder::which("definitely-not-a-real-tool-xcb").unwrap_err();
    assert!(matches!(err, ProcessError::ExecutableNotFound { .. }));
}
