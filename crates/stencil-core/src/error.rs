//! Unified error handling for Stencil Core.
//!
//! Wraps domain and application errors behind one type so driving adapters
//! (the CLI) handle a single error surface with suggestions and categories.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ErrorCategory};

/// Root error type for Stencil Core operations.
#[derive(Debug, Error, Clone)]
pub enum StencilError {
    /// Invalid input (names, variables).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Resolution or generation failure.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl StencilError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
        }
    }
}

/// Convenient result type alias.
pub type StencilResult<T> = Result<T, StencilError>;

// ── tests ─────────────────────────────────────────────────────────────────────
