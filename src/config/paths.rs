// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! build_dir            "derived" | explicit path   (build)
//! package_destination  where IPA/dSYM/bundle land  (.)
//! archive_path         xcarchive destination       (~/Library/Developer/Xcode/Archives)
//! derived_data         derived-data scan root      (~/Library/Developer/Xcode/DerivedData)
//! info_plist/podspec   version metadata sources
//! ```
//!
//! Paths starting with `~` are expanded against the home directory on access.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::types::BuildDir;

/// Build and artifact paths configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Build output directory or the "derived" sentinel.
    pub build_dir: BuildDir,
    /// Directory the packaged IPA and dSYM are written to.
    pub package_destination: PathBuf,
    /// Directory archives are saved to.
    pub archive_path: PathBuf,
    /// Root of the toolchain's derived-data cache.
    pub derived_data: PathBuf,
    /// Property-list version metadata file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_plist: Option<PathBuf>,
    /// Spec-file version metadata file; takes precedence over the plist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podspec: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            build_dir: BuildDir::default(),
            package_destination: PathBuf::from("."),
            archive_path: PathBuf::from("~/Library/Developer/Xcode/Archives"),
            derived_data: PathBuf::from("~/Library/Developer/Xcode/DerivedData"),
            info_plist: None,
            podspec: None,
        }
    }
}

impl PathsConfig {
    /// Package destination with `~` expanded.
    #[must_use]
    pub fn package_destination(&self) -> PathBuf {
        expand_home(&self.package_destination)
    }

    /// Archive destination with `~` expanded.
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        expand_home(&self.archive_path)
    }

    /// Derived-data root with `~` expanded.
    #[must_use]
    pub fn derived_data(&self) -> PathBuf {
        expand_home(&self.derived_data)
    }
}

/// Expand a leading `~` against the user's home directory.
///
/// Paths without a `~` prefix (and environments without a resolvable home)
/// are returned unchanged.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(stripped))
}
