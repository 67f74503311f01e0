//! Audit fields carried by every persisted resource.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use custodia_core::{AppError, AppResult, OwnershipViolation, Principal};
use serde::{Deserialize, Serialize};

use crate::ownership_guard::OwnershipGuard;

/// Stored timestamps keep microsecond precision, matching PostgreSQL `timestamptz`.
const TIMESTAMP_PRECISION_DIGITS: u16 = 6;

/// Ownership and modification metadata of one record.
///
/// The owner is fixed when the fields are first stamped and there is no way to change
/// it afterwards. `loaded_owner` is transient: it is never serialized and stays unset
/// until the record passes through [`Auditable::on_load`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    owner: String,
    modifier: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    #[serde(skip)]
    loaded_owner: Option<String>,
}

impl AuditFields {
    /// Stamps the fields of a record created by `principal` at `now`.
    #[must_use]
    pub fn created_by(principal: &Principal, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(TIMESTAMP_PRECISION_DIGITS);
        Self {
            owner: principal.name().to_owned(),
            modifier: principal.name().to_owned(),
            created_at: now,
            modified_at: now,
            loaded_owner: None,
        }
    }

    /// Rebuilds fields read back from storage.
    pub fn restore(
        owner: impl Into<String>,
        modifier: impl Into<String>,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        if modified_at < created_at {
            return Err(AppError::Internal(format!(
                "stored modification time {modified_at} precedes creation time {created_at}"
            )));
        }

        Ok(Self {
            owner: owner.into(),
            modifier: modifier.into(),
            created_at,
            modified_at,
            loaded_owner: None,
        })
    }

    /// Returns the principal that created the record.
    #[must_use]
    pub fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Returns the principal of the most recent write.
    #[must_use]
    pub fn modifier(&self) -> &str {
        self.modifier.as_str()
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the time of the most recent write.
    #[must_use]
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Returns the owner captured when the record was loaded, if it was.
    #[must_use]
    pub fn loaded_owner(&self) -> Option<&str> {
        self.loaded_owner.as_deref()
    }

    /// Stamps a write by `principal` at `now`.
    ///
    /// The modification time always moves forward, even when the clock reads the same
    /// instant as the previous write. Owner and creation time are left untouched.
    pub fn record_modification(&mut self, principal: &Principal, now: DateTime<Utc>) {
        let now = now.trunc_subsecs(TIMESTAMP_PRECISION_DIGITS);
        let earliest = self.modified_at + TimeDelta::microseconds(1);

        self.modifier = principal.name().to_owned();
        self.modified_at = now.max(earliest);
    }

    pub(crate) fn set_loaded_owner(&mut self, owner: String) {
        self.loaded_owner = Some(owner);
    }
}

/// Equality over persisted state; the transient load snapshot is ignored.
impl PartialEq for AuditFields {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
            && self.modifier == other.modifier
            && self.created_at == other.created_at
            && self.modified_at == other.modified_at
    }
}

impl Eq for AuditFields {}

/// Capability shared by every resource whose writes are restricted to its owner.
///
/// Storage-facing code calls the hooks around its own operations: `on_load` right
/// after a record is read, `on_before_update` right before a changed record is
/// persisted and `on_before_delete` right before a record is removed.
pub trait Auditable {
    /// Returns the audit fields.
    fn audit(&self) -> &AuditFields;

    /// Returns the audit fields for stamping.
    fn audit_mut(&mut self) -> &mut AuditFields;

    /// Captures the owner snapshot used by the update check.
    fn on_load(&mut self) {
        OwnershipGuard::capture_loaded_owner(self.audit_mut());
    }

    /// Rejects the pending update unless the stamped modifier owned the record at load.
    fn on_before_update(&self) -> Result<(), OwnershipViolation> {
        OwnershipGuard::check_update(self.audit())
    }

    /// Rejects the pending removal unless `principal` owns the record.
    fn on_before_delete(&self, principal: Option<&Principal>) -> Result<(), OwnershipViolation> {
        OwnershipGuard::check_delete(self.audit(), principal)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};
    use custodia_core::Principal;

    use super::AuditFields;

    fn principal(name: &str) -> Principal {
        Principal::new(name).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn creation_stamps_owner_and_modifier() {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .unwrap_or_else(|| unreachable!());
        let fields = AuditFields::created_by(&principal("user1"), now);

        assert_eq!(fields.owner(), "user1");
        assert_eq!(fields.modifier(), "user1");
        assert_eq!(fields.created_at(), now);
        assert_eq!(fields.modified_at(), now);
        assert!(fields.loaded_owner().is_none());
    }

    #[test]
    fn modification_keeps_owner_and_moves_time_forward() {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .unwrap_or_else(|| unreachable!());
        let mut fields = AuditFields::created_by(&principal("user1"), now);

        fields.record_modification(&principal("user2"), now);

        assert_eq!(fields.owner(), "user1");
        assert_eq!(fields.modifier(), "user2");
        assert_eq!(fields.created_at(), now);
        assert_eq!(fields.modified_at(), now + TimeDelta::microseconds(1));
    }

    #[test]
    fn modification_never_moves_time_backwards() {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .unwrap_or_else(|| unreachable!());
        let mut fields = AuditFields::created_by(&principal("user1"), now);

        fields.record_modification(&principal("user1"), now - TimeDelta::hours(1));

        assert!(fields.modified_at() > fields.created_at());
    }

    #[test]
    fn restore_rejects_inverted_timestamps() {
        let now = Utc::now();
        let restored = AuditFields::restore("user1", "user1", now, now - TimeDelta::seconds(1));
        assert!(restored.is_err());
    }

    #[test]
    fn loaded_owner_is_not_serialized() {
        let mut fields = AuditFields::created_by(&principal("user1"), Utc::now());
        fields.set_loaded_owner("user1".to_owned());

        let encoded = serde_json::to_value(&fields).unwrap_or_default();
        assert!(encoded.get("loadedOwner").is_none());
        assert_eq!(encoded.get("owner").and_then(|value| value.as_str()), Some("user1"));
    }
}
