use custodia_core::{AppResult, NonEmptyString};

use crate::audit::{AuditFields, Auditable};
use crate::record::RecordId;

/// Logical name of the indexed last-name field.
pub const PERSON_LAST_NAME_FIELD: &str = "last_name";

/// Person record owned by the principal that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: RecordId,
    first_name: NonEmptyString,
    last_name: NonEmptyString,
    audit: AuditFields,
}

impl Person {
    /// Creates a person from validated content and audit fields.
    #[must_use]
    pub fn new(id: RecordId, draft: PersonDraft, audit: AuditFields) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            audit,
        }
    }

    /// Rebuilds a person read back from storage.
    pub fn restore(
        id: RecordId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        audit: AuditFields,
    ) -> AppResult<Self> {
        Ok(Self::new(id, PersonDraft::new(first_name, last_name)?, audit))
    }

    /// Returns the storage-assigned identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Replaces every content field.
    pub fn replace_content(&mut self, draft: PersonDraft) {
        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
    }

    /// Replaces the content fields present in `patch`.
    pub fn apply_patch(&mut self, patch: PersonPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
    }
}

impl Auditable for Person {
    fn audit(&self) -> &AuditFields {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditFields {
        &mut self.audit
    }
}

/// Validated content of a person, without identity or audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDraft {
    first_name: NonEmptyString,
    last_name: NonEmptyString,
}

impl PersonDraft {
    /// Creates validated person content.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            first_name: NonEmptyString::new(first_name)?,
            last_name: NonEmptyString::new(last_name)?,
        })
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }
}

/// Partial person content; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    first_name: Option<NonEmptyString>,
    last_name: Option<NonEmptyString>,
}

impl PersonPatch {
    /// Creates a validated patch.
    pub fn new(first_name: Option<String>, last_name: Option<String>) -> AppResult<Self> {
        Ok(Self {
            first_name: first_name.map(NonEmptyString::new).transpose()?,
            last_name: last_name.map(NonEmptyString::new).transpose()?,
        })
    }
}
