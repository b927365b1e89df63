// xcb-rs: Xcode Beta Builder - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release-notes resolution.
//!
//! Resolution order: configured notes, then `$EDITOR` against a scratch
//! file, then an interactive console prompt. The interactive paths block on
//! operator input without a timeout; a build being deployed by a human is
//! allowed to wait for that human.

use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;

/// Resolve the release notes for the current deploy.
///
/// Notes are never silently empty: if neither the configuration nor the
/// editor produced text, the console prompt blocks until the operator
/// finishes their input with two consecutive newlines.
///
/// # Errors
///
/// Returns an error when the scratch directory cannot be created, the editor
/// cannot be spawned, or stdin is closed mid-prompt.
pub async fn resolve_release_notes(config: &Config) -> Result<String> {
    if let Some(notes) = &config.deploy.release_notes {
        return Ok(notes.clone());
    }

    if let Some(notes) = notes_from_editor().await? {
        return Ok(notes);
    }

    notes_from_prompt().await
}

/// Gather notes through `$EDITOR` against a scratch file.
///
/// Returns `None` when no editor is configured or the edit session produced
/// no text. The scratch directory is removed on every exit path.
async fn notes_from_editor() -> Result<Option<String>> {
    let Ok(editor) = std::env::var("EDITOR") else {
        return Ok(None);
    };
    if editor.trim().is_empty() {
        return Ok(None);
    }

    let dir = tempfile::tempdir().context("failed to create scratch directory for release notes")?;
    let path = dir.path().join("release_notes");

    debug!(editor = %editor, file = %path.display(), "editing release notes");

    // EDITOR may carry its own flags, so it goes through the shell
    Command::new("/bin/sh")
        .arg("-c")
        .arg(format!("{editor} '{}'", path.display()))
        .status()
        .await
        .with_context(|| format!("failed to launch editor '{editor}'"))?;

    match std::fs::read_to_string(&path) {
        Ok(notes) if !notes.trim().is_empty() => Ok(Some(notes)),
        _ => Ok(None),
    }
}

/// Gather notes from the console, line by line.
///
/// Input is accumulated until two consecutive newline terminators are seen.
/// The wait is unbounded.
async fn notes_from_prompt() -> Result<String> {
    println!("Enter the release notes for this build (hit enter twice when done):");

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut accumulated = String::new();

    loop {
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .context("failed to read release notes from stdin")?;
        if read == 0 {
            break;
        }
        accumulated.push_str(&line);
        if accumulated.ends_with("\n\n") {
            break;
        }
    }

    Ok(accumulated.trim().to_string())
}
