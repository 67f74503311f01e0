use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Write operation protected by the ownership guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedOperation {
    /// Full or partial update of an existing record.
    Update,
    /// Removal of an existing record.
    Delete,
}

impl GuardedOperation {
    /// Returns the stable operation label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for GuardedOperation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Raised when a principal other than the record owner attempts a write.
///
/// This is a domain failure, distinct from storage or validation errors, and callers
/// can recover by retrying as the owning principal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OwnershipViolation {
    operation: GuardedOperation,
    message: String,
}

impl OwnershipViolation {
    /// Creates a violation for the given operation.
    #[must_use]
    pub fn new(operation: GuardedOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }

    /// Returns the rejected operation.
    #[must_use]
    pub fn operation(&self) -> GuardedOperation {
        self.operation
    }

    /// Returns the message that is safe to show to the caller.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}
