use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppResult, NonEmptyString};

/// Authenticated caller resolved for one request.
///
/// A principal is immutable for the lifetime of the request that resolved it and is
/// passed explicitly into every operation that needs to know who is acting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    name: NonEmptyString,
}

impl Principal {
    /// Creates a principal from its identifier.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
        })
    }

    /// Returns the stable principal identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Compares identifiers ignoring letter case.
    #[must_use]
    pub fn matches_ignoring_case(&self, other: &str) -> bool {
        self.name().to_lowercase() == other.to_lowercase()
    }
}

impl Display for Principal {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Principal;

    #[test]
    fn principal_rejects_blank_names() {
        assert!(Principal::new("  ").is_err());
    }

    #[test]
    fn case_insensitive_match_folds_unicode() {
        let principal = Principal::new("Émile").unwrap_or_else(|_| unreachable!());
        assert!(principal.matches_ignoring_case("émile"));
        assert!(!principal.matches_ignoring_case("emile"));
    }
}
