//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when caller input is malformed, at any nesting
//!   level. Carries the offending field path.
//! - [`KeyNotFound`] thrown when an item is absent **or** not owned by the
//!   caller. The two cases are never distinguished.
//! - [`VersionConflict`] thrown when an update targets a stale trip version.
//! - [`Database`] thrown when the store fails. The transaction is always
//!   rolled back.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`VersionConflict`]: EngineError::VersionConflict
//!  [`Database`]: EngineError::Database
use std::fmt;

use sea_orm::DbErr;
use thiserror::Error;

/// A caller-fixable input error.
///
/// `path` points at the first offending field, using `cities[2].activities[1].name`
/// notation (0-based indices).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn required(path: impl Into<String>) -> Self {
        Self::new(path, "is required")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(ValidationError),
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("Version conflict: {0}")]
    VersionConflict(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<ValidationError> for EngineError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::VersionConflict(a), Self::VersionConflict(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidData(a), Self::InvalidData(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
