// src/config/mod.rs

//! Graph description and settings handling.
//!
//! - [`model`] holds the serde models for the JSON graph and TOML settings,
//!   plus the validated [`TaskGraph`] and [`Settings`] types.
//! - [`loader`] reads files and strips Markdown fences.
//! - [`validate`] converts raw models into validated ones.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{graph_from_str, load_and_validate, load_settings, load_settings_if_exists};
pub use model::{
    RawGraphFile, RawSettingsFile, Settings, SettingsSection, TaskCommand, TaskGraph, TaskSpec,
};
