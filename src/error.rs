//! Error types in crimemine
//!

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures shared by every engine in the workspace.
///
/// Everything except [`Error::Internal`] is caller-fixable: a bad column mapping, an empty
/// dataset or an out-of-range parameter. The hosting layer usually maps those to a client error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("no rows with valid datetime/lat/lon values")]
    EmptyResult,
    #[error("area-based grouping requires a usable area column (got {})", area_name(.0))]
    MissingAreaColumn(Option<String>),
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("{stage} failed: {message}")]
    Internal {
        stage: &'static str,
        message: String,
    },
}

impl Error {
    /// Whether the failure stems from the caller's input rather than from the computation.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Error::Internal { .. })
    }

    pub fn internal(stage: &'static str, message: impl Into<String>) -> Self {
        Error::Internal {
            stage,
            message: message.into(),
        }
    }
}

fn area_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("`{}`", name),
        None => "none".to_string(),
    }
}
