//! Script discovery and static argument extraction.
//!
//! Listing is a flat, non-recursive directory scan for Python sources.
//! Argument extraction is a best-effort regex scan for
//! `add_argument("--flag", ..., help="...")` calls; it never parses the
//! script, so options registered dynamically or behind helper functions
//! are not found.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// File-name suffix of candidate scripts.
pub const SCRIPT_SUFFIX: &str = ".py";

/// Regex pattern matching one option registration.
///
/// Group 1 is the long flag. Group 2 is the help text, captured only when
/// `help=` appears inside the same call's parentheses.
pub const ADD_ARGUMENT_PATTERN: &str = r#"add_argument\s*\(\s*(?:["']-\w["']\s*,\s*)?["'](--[\w-]+)["'](?:[^()]*?help\s*=\s*["']([^"']*)["'])?"#;

static ADD_ARGUMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ADD_ARGUMENT_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A discovered candidate script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptRef {
    /// File name, e.g. `train.py`.
    pub name: String,
    /// Scanned directory joined with `name`.
    pub path: String,
}

/// One statically recovered command-line option, or the placeholder
/// returned when the script could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgDescriptor {
    Flag { name: String, help: String },
    Unreadable { error: String },
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Whether `name` looks like a candidate script: any name ending in
/// [`SCRIPT_SUFFIX`], dot-files included.
pub fn is_script_name(name: &str) -> bool {
    name.ends_with(SCRIPT_SUFFIX)
}

/// List the scripts directly inside `dir`, sorted by file name.
///
/// Sub-directories are not descended into and entries that are not regular
/// files (after following symlinks) are skipped. A `dir` that exists but is
/// not a directory lists nothing. Non-UTF-8 names are decoded lossily.
pub fn list_scripts(dir: &Path) -> Result<Vec<ScriptRef>, CoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CoreError::DirectoryNotFound(dir.display().to_string()));
        }
        Err(e) if e.kind() == io::ErrorKind::NotADirectory => return Ok(Vec::new()),
        Err(e) => return Err(CoreError::Io(e)),
    };

    let mut scripts = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_script_name(&name) {
            continue;
        }
        let path = entry.path();
        // `fs::metadata` follows symlinks, `DirEntry::metadata` does not.
        if !fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
            continue;
        }
        scripts.push(ScriptRef {
            name,
            path: path.display().to_string(),
        });
    }

    scripts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(scripts)
}

// ---------------------------------------------------------------------------
// Argument extraction
// ---------------------------------------------------------------------------

/// Extract declared options from the script at `path`.
///
/// Never fails: a read error yields a single [`ArgDescriptor::Unreadable`].
pub fn extract_args(path: &Path) -> Vec<ArgDescriptor> {
    match read_source(path) {
        Ok(text) => extract_args_from_source(&text),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Script not readable");
            vec![ArgDescriptor::Unreadable {
                error: e.to_string(),
            }]
        }
    }
}

/// Scan already-loaded source text. One descriptor per match, in source
/// order, duplicates kept.
pub fn extract_args_from_source(text: &str) -> Vec<ArgDescriptor> {
    ADD_ARGUMENT_RE
        .captures_iter(text)
        .map(|caps| ArgDescriptor::Flag {
            name: caps[1].to_string(),
            help: caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
        .collect()
}

/// Read a file as text, replacing invalid UTF-8 sequences.
fn read_source(path: &Path) -> Result<String, CoreError> {
    let bytes = fs::read(path).map_err(|source| CoreError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
