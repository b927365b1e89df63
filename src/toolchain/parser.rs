// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stateless parser over captured toolchain output.

use std::path::{Path, PathBuf};

/// Marker the toolchain prints when a build does not succeed.
const FAILURE_MARKER: &str = "BUILD FAILED";

/// Marker printed when signing prevents the build from succeeding.
const SIGNING_FAILURE_MARKER: &str = "Code Sign error";

/// Parser over the full captured text of a toolchain invocation.
///
/// Two pure functions over an immutable string; all the fragility of
/// scraping unstructured compiler output is isolated here.
#[derive(Debug, Clone, Copy)]
pub struct BuildOutputParser<'a> {
    output: &'a str,
}

impl<'a> BuildOutputParser<'a> {
    /// Create a parser over captured output.
    #[must_use]
    pub const fn new(output: &'a str) -> Self {
        Self { output }
    }

    /// Whether the output contains a recognized failure marker.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.output.contains(FAILURE_MARKER) || self.output.contains(SIGNING_FAILURE_MARKER)
    }

    /// The directory build products were written to, recovered from the
    /// toolchain's `touch -c <product path>` step.
    ///
    /// `None` when the marker line is absent. Product paths containing
    /// spaces are not recoverable from this line.
    #[must_use]
    pub fn build_output_dir(&self) -> Option<PathBuf> {
        let line = self.output.lines().find(|line| line.contains("touch -c"))?;
        let product = line.split_whitespace().last()?;
        Path::new(product).parent().map(Path::to_path_buf)
    }
}
