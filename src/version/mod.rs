// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Version metadata resolver.
//!
//! ```text
//! build_number(config)
//!     podspec set + on disk? --> first non-blank line, version = '<v>'
//!     plist set + on disk?   --> CFBundleVersion <string> value
//!     otherwise              --> None (a missing version is a valid state)
//!
//! increment_build_number_in_metadata(config)
//!     flag off / source absent --> false (no-op)
//!     podspec --> textual substitution of the version assignment
//!     plist   --> structured locate + in-place splice of the value node
//! ```

use regex::Regex;
use roxmltree::Document;
use std::path::Path;
use std::sync::OnceLock;

use crate::config::Config;
use crate::error::{VersionError, XcbResult};

/// Matches a `version = '<value>'` assignment, either quote style.
fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)version\s*=\s*["']([^"']+)["']"#).expect("version regex is valid")
    })
}

fn io_error(path: &Path, source: std::io::Error) -> VersionError {
    VersionError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Current build number from the configured metadata files.
///
/// The podspec takes precedence over the property list; a source that is not
/// configured, or configured but absent on disk, is skipped. No version
/// anywhere is a legitimate state (e.g. a first build) and yields `Ok(None)`.
///
/// # Errors
///
/// Returns an error only when a metadata file exists but cannot be read or
/// parsed.
pub fn build_number(config: &Config) -> XcbResult<Option<String>> {
    if let Some(podspec) = &config.paths.podspec
        && podspec.exists()
    {
        return podspec_version(podspec);
    }

    if let Some(plist) = &config.paths.info_plist
        && plist.exists()
    {
        return plist_version(plist);
    }

    Ok(None)
}

/// Read the version assignment from a podspec file.
///
/// The assignment must sit on the first non-blank line; this mirrors the
/// layout convention of the spec files this tool consumes and is not a
/// general podspec parser.
fn podspec_version(path: &Path) -> XcbResult<Option<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;

    let Some(line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return Ok(None);
    };

    Ok(version_re()
        .captures(line)
        .map(|captures| captures[1].to_string()))
}

/// Read `CFBundleVersion` from a property-list file.
fn plist_version(path: &Path) -> XcbResult<Option<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let doc = Document::parse(&content).map_err(|e| VersionError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(bundle_version_node(&doc).and_then(|value| value.text().map(str::to_string)))
}

/// Find the `<string>` element holding the `CFBundleVersion` value.
fn bundle_version_node<'a>(doc: &'a Document<'a>) -> Option<roxmltree::Node<'a, 'a>> {
    doc.descendants()
        .find(|node| node.has_tag_name("key") && node.text() == Some("CFBundleVersion"))
        .and_then(|key| key.next_sibling_element())
}

/// Next build number: split on `.`, bump the final numeric component, rejoin.
///
/// This is a textual increment, not a semantic-version one; leading zeros and
/// non-numeric trailers are dropped from the final component the way a bare
/// integer conversion would drop them.
#[must_use]
pub fn next_build_number(current: &str) -> String {
    let mut components: Vec<&str> = current.split('.').collect();
    let last = components.pop().unwrap_or_default();
    let next = leading_int(last) + 1;

    let mut parts: Vec<String> = components.iter().map(ToString::to_string).collect();
    parts.push(next.to_string());
    parts.join(".")
}

/// Integer value of the leading digit run, 0 when there is none.
fn leading_int(s: &str) -> u64 {
    s.trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Bump the version stored in the configured metadata file.
///
/// Returns `false` without touching anything when the increment flag is off
/// or the relevant metadata source is disabled or absent; that is a no-op,
/// not an error. The podspec takes precedence, matching [`build_number`].
///
/// # Errors
///
/// Returns an error when a metadata file exists but cannot be read, parsed,
/// or rewritten.
pub fn increment_build_number_in_metadata(config: &Config) -> XcbResult<bool> {
    if !config.global.increment_version {
        return Ok(false);
    }

    if let Some(podspec) = &config.paths.podspec {
        if podspec.exists() {
            return bump_podspec(podspec);
        }
        return Ok(false);
    }

    if let Some(plist) = &config.paths.info_plist {
        if plist.exists() {
            return bump_plist(plist);
        }
        return Ok(false);
    }

    Ok(false)
}

/// Substitute the old version assignment for the new one, first occurrence
/// only, so the assignment line is the file's only textual change.
fn bump_podspec(path: &Path) -> XcbResult<bool> {
    let Some(old) = podspec_version(path)? else {
        return Ok(false);
    };
    let new = next_build_number(&old);

    let content = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let updated = content.replacen(
        &format!("version = '{old}'"),
        &format!("version = '{new}'"),
        1,
    );
    std::fs::write(path, updated).map_err(|e| io_error(path, e))?;

    Ok(true)
}

/// Splice the new version into the `CFBundleVersion` value node, leaving the
/// rest of the document byte-identical.
fn bump_plist(path: &Path) -> XcbResult<bool> {
    let mut content = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let doc = Document::parse(&content).map_err(|e| VersionError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let Some(value) = bundle_version_node(&doc) else {
        return Ok(false);
    };
    let Some(text) = value.first_child().filter(|node| node.is_text()) else {
        return Ok(false);
    };
    let Some(old) = text.text() else {
        return Ok(false);
    };

    let new = next_build_number(old);
    let range = text.range();
    drop(doc);

    content.replace_range(range, &new);
    std::fs::write(path, content).map_err(|e| io_error(path, e))?;

    Ok(true)
}
