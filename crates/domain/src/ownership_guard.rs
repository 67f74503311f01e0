//! Ownership checks run by the lifecycle hooks of [`crate::Auditable`].
//!
//! Updates and deletes are checked differently. An update is validated against the
//! owner captured at load time and the modifier stamped for the current request, so a
//! write that also touches the in-memory owner cannot slip past. A delete is never
//! stamped, so its check takes the principal resolved for the request and compares it
//! with the live owner field.

use custodia_core::{GuardedOperation, OwnershipViolation, Principal};

use crate::audit::AuditFields;

/// Enforces that only the creating principal writes a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGuard;

impl OwnershipGuard {
    /// Snapshots the current owner. Runs right after a record is read.
    pub fn capture_loaded_owner(fields: &mut AuditFields) {
        let owner = fields.owner().to_owned();
        fields.set_loaded_owner(owner);
    }

    /// Checks a pending update.
    ///
    /// A record that was never loaded has no snapshot and is always rejected.
    pub fn check_update(fields: &AuditFields) -> Result<(), OwnershipViolation> {
        match fields.loaded_owner() {
            Some(loaded_owner) if loaded_owner == fields.modifier() => Ok(()),
            Some(_) => Err(OwnershipViolation::new(
                GuardedOperation::Update,
                "cannot modify a record owned by another principal",
            )),
            None => Err(OwnershipViolation::new(
                GuardedOperation::Update,
                "cannot modify a record that was not loaded from storage",
            )),
        }
    }

    /// Checks a pending removal on behalf of `principal`.
    pub fn check_delete(
        fields: &AuditFields,
        principal: Option<&Principal>,
    ) -> Result<(), OwnershipViolation> {
        let Some(principal) = principal else {
            return Err(OwnershipViolation::new(
                GuardedOperation::Delete,
                "cannot delete a record without an authenticated principal",
            ));
        };

        if !principal.matches_ignoring_case(fields.owner()) {
            return Err(OwnershipViolation::new(
                GuardedOperation::Delete,
                "cannot delete a record owned by another principal",
            ));
        }

        Ok(())
    }
}
