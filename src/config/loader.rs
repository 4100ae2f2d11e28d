// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::model::{RawGraphFile, RawSettingsFile, Settings, TaskGraph};
use crate::errors::Result;

/// First fenced block, optionally tagged `json`.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fenced block pattern is valid")
});

/// Return the body of the first Markdown code fence in `text`, or `text`
/// itself when there is none.
///
/// Graph descriptions produced by a model usually arrive wrapped in
/// ```` ```json ```` fences; plain JSON passes through untouched.
pub fn extract_json(text: &str) -> &str {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
}

/// Parse a graph description without semantic validation.
pub fn parse_graph_str(text: &str) -> Result<RawGraphFile> {
    let body = extract_json(text);
    let raw: RawGraphFile = serde_json::from_str(body)?;
    Ok(raw)
}

/// Parse and validate a graph description held in memory.
pub fn graph_from_str(text: &str) -> Result<TaskGraph> {
    let raw = parse_graph_str(text)?;
    TaskGraph::try_from(raw)
}

/// Load a graph file from `path` and return the raw `RawGraphFile`.
///
/// This only performs JSON deserialization; it does **not** check ids,
/// dependencies or cycles. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawGraphFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = contents.len(), "read graph file");
    parse_graph_str(&contents)
}

/// Load a graph file from path and validate it into a [`TaskGraph`].
///
/// Rejects:
///   - an empty task list,
///   - empty or duplicate ids,
///   - unknown or self references in `depends_on`,
///   - dependency cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<TaskGraph> {
    let raw = load_from_path(&path)?;
    TaskGraph::try_from(raw)
}

/// Load and validate a TOML settings file.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawSettingsFile = toml::from_str(&contents)?;
    Settings::try_from(raw)
}

/// Load settings from `path` when it exists, otherwise fall back to defaults.
pub fn load_settings_if_exists(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    if path.is_file() {
        load_settings(path)
    } else {
        debug!(path = %path.display(), "no settings file; using defaults");
        Ok(Settings::default())
    }
}

/// Settings file looked up in the current working directory when `--config`
/// is not given.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from("Taskgraph.toml")
}
