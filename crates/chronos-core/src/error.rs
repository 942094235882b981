//! Core error types for chronos-core.
//!
//! Session engine operations never fail -- preconditions are enforced as
//! silent no-ops. The fallible surface is configuration I/O and taxonomy
//! validation, covered here with thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chronos-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Taxonomy validation errors
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Config directory could not be resolved or created
    #[error("Failed to resolve config directory: {0}")]
    DirUnavailable(String),
}

/// Taxonomy validation errors.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// No teaching modes configured
    #[error("Taxonomy must define at least one teaching mode")]
    EmptyModes,

    /// No teaching actions configured
    #[error("Taxonomy must define at least one teaching action")]
    EmptyActions,

    /// Duplicate key within one axis
    #[error("Duplicate taxonomy key: {0}")]
    DuplicateKey(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
