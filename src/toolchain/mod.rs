// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Toolchain invocation.
//!
//! ```text
//! ProcessBuilder::new(xcodebuild)
//!   .args(config.build_arguments()) .arg(action)
//!   .log_to(BUILD_LOG) .echo(verbose)
//!        |
//!        v
//!      run()
//!   spawn, drain stdout+stderr concurrently,
//!   write combined capture to the log artifact,
//!   validate exit code (skip if allow_failure)
//!        |
//!        v
//!   BuildOutputParser over the captured log
//!   failed? / build_output_dir
//! ```
//!
//! The toolchain has no machine-readable success channel; the captured log
//! plus [`parser::BuildOutputParser`] is the only recovery mechanism.

pub mod parser;
mod process;

pub use process::ProcessBuilder;

/// Fixed-name log artifact every toolchain invocation writes to.
pub const BUILD_LOG: &str = "build.output";

#[cfg(test)]
mod tests;
