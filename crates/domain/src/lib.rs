//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod ownership_guard;
mod person;
mod record;

pub use audit::{AuditFields, Auditable};
pub use ownership_guard::OwnershipGuard;
pub use person::{PERSON_LAST_NAME_FIELD, Person, PersonDraft, PersonPatch};
pub use record::RecordId;
