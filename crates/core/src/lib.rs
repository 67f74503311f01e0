//! Shared primitives for all Rust crates in Custodia.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;
/// Ownership failure types.
pub mod ownership;

use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::Principal;
pub use ownership::{GuardedOperation, OwnershipViolation};

/// Result type used across Custodia crates.
pub type AppResult<T> = Result<T, AppError>;

/// Boxed error kept as the source of a wrapping failure.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Write rejected because the caller does not own the record.
    #[error("ownership violation: {0}")]
    OwnershipViolation(#[from] OwnershipViolation),

    /// A unit of work was rolled back because one of its steps failed.
    #[error("transaction aborted during {operation}")]
    TransactionAborted {
        /// Operation that was running when the unit of work aborted.
        operation: String,
        /// Failure that caused the rollback.
        #[source]
        source: BoxedError,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps a failure that aborted a unit of work.
    pub fn aborted(operation: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        Self::TransactionAborted {
            operation: operation.into(),
            source: source.into(),
        }
    }
}

/// Iterates an error and its causes from outermost to innermost.
pub fn error_chain<'a>(
    error: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(error), |&link| link.source())
}

/// Returns the first link of the cause chain that is a `T`.
#[must_use]
pub fn find_cause<'a, T: StdError + 'static>(
    error: &'a (dyn StdError + 'static),
) -> Option<&'a T> {
    error_chain(error).find_map(|link| link.downcast_ref::<T>())
}

/// Renders every link of the cause chain on one line.
#[must_use]
pub fn render_chain(error: &(dyn StdError + 'static)) -> String {
    error_chain(error)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}
