// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::engine::TaskName;

#[derive(Error, Debug)]
pub enum TaskgraphError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("Unsatisfiable graph: tasks {0:?} can never become ready")]
    UnsatisfiableGraph(Vec<TaskName>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TaskgraphError>;
