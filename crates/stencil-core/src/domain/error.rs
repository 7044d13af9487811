//! Domain-level errors: input that can never be valid, regardless of the
//! state of the filesystem or network.

use thiserror::Error;

/// Root domain error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("invalid variable name '{name}': {reason}")]
    InvalidVariableName { name: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Examples: my-project, my_app, blog123".into(),
            ],
            Self::InvalidVariableName { name, reason } => vec![
                format!("Variable name '{}' is invalid: {}", name, reason),
                "Variable names must be valid identifiers".into(),
                "Example: --var author_name=Alice".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } | Self::InvalidVariableName { .. } => {
                ErrorCategory::Validation
            }
        }
    }
}

/// Coarse classification used for display styling and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

// ── tests ─────────────────────────────────────────────────────────────────────
