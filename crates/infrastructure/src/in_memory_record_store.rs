use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use custodia_application::{RecordStore, RecordTransaction, Resource};
use custodia_core::{AppError, AppResult};
use custodia_domain::{AuditFields, RecordId};
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

/// In-memory record store implementation.
///
/// A transaction holds the table write lock from `begin` until it is committed or
/// dropped, so read-modify-write cycles are serialized.
pub struct InMemoryRecordStore<R: Resource> {
    records: Arc<RwLock<HashMap<RecordId, R>>>,
}

impl<R: Resource> InMemoryRecordStore<R> {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<R: Resource> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> RecordStore<R> for InMemoryRecordStore<R> {
    async fn insert(&self, draft: R::Draft, audit: AuditFields) -> AppResult<R> {
        let record = R::assemble(RecordId::new(), draft, audit);
        self.records
            .write()
            .await
            .insert(record.record_id(), record.clone());

        Ok(record)
    }

    async fn find(&self, id: RecordId) -> AppResult<Option<R>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<R>> {
        let records = self.records.read().await;
        Ok(sorted_by_creation(records.values().cloned().collect()))
    }

    async fn find_by_field(&self, field_logical_name: &str, value: &str) -> AppResult<Vec<R>> {
        let records = self.records.read().await;
        Ok(sorted_by_creation(
            records
                .values()
                .filter(|record| record.indexed_value(field_logical_name) == Some(value))
                .cloned()
                .collect(),
        ))
    }

    async fn begin(&self) -> AppResult<Box<dyn RecordTransaction<R>>> {
        Ok(Box::new(InMemoryTransaction {
            records: Arc::clone(&self.records).write_owned().await,
            staged: Vec::new(),
        }))
    }
}

enum StagedChange<R> {
    Save(R),
    Remove(RecordId),
}

struct InMemoryTransaction<R: Resource> {
    records: OwnedRwLockWriteGuard<HashMap<RecordId, R>>,
    staged: Vec<StagedChange<R>>,
}

#[async_trait]
impl<R: Resource> RecordTransaction<R> for InMemoryTransaction<R> {
    async fn find_for_update(&mut self, id: RecordId) -> AppResult<Option<R>> {
        Ok(self.records.get(&id).cloned())
    }

    async fn save(&mut self, record: &R) -> AppResult<()> {
        if !self.records.contains_key(&record.record_id()) {
            return Err(missing_record(R::RESOURCE_NAME, record.record_id()));
        }

        self.staged.push(StagedChange::Save(record.clone()));
        Ok(())
    }

    async fn remove(&mut self, id: RecordId) -> AppResult<()> {
        if !self.records.contains_key(&id) {
            return Err(missing_record(R::RESOURCE_NAME, id));
        }

        self.staged.push(StagedChange::Remove(id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let InMemoryTransaction {
            mut records,
            staged,
        } = *self;

        for change in staged {
            match change {
                StagedChange::Save(record) => {
                    records.insert(record.record_id(), record);
                }
                StagedChange::Remove(id) => {
                    records.remove(&id);
                }
            }
        }

        Ok(())
    }
}

fn sorted_by_creation<R: Resource>(mut records: Vec<R>) -> Vec<R> {
    records.sort_by(|left, right| {
        left.audit()
            .created_at()
            .cmp(&right.audit().created_at())
            .then_with(|| left.record_id().cmp(&right.record_id()))
    });
    records
}

fn missing_record(resource_name: &str, id: RecordId) -> AppError {
    AppError::NotFound(format!("{resource_name} '{id}' does not exist"))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use custodia_application::{RecordStore, Resource};
    use custodia_core::Principal;
    use custodia_domain::{AuditFields, Auditable, PERSON_LAST_NAME_FIELD, Person, PersonDraft};

    use super::InMemoryRecordStore;

    fn audit(owner: &str) -> AuditFields {
        let principal = Principal::new(owner).unwrap_or_else(|_| unreachable!());
        AuditFields::created_by(&principal, Utc::now())
    }

    fn draft(first_name: &str, last_name: &str) -> PersonDraft {
        PersonDraft::new(first_name, last_name).unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn insert_assigns_identifier_and_keeps_audit() {
        let store = InMemoryRecordStore::<Person>::new();

        let inserted = store.insert(draft("Frodo", "Baggins"), audit("user1")).await;
        assert!(inserted.is_ok());
        let inserted = inserted.unwrap_or_else(|_| unreachable!());

        let found = store.find(inserted.id()).await.unwrap_or_default();
        assert_eq!(found.as_ref().map(|person| person.audit().owner()), Some("user1"));
        assert!(found.is_some_and(|person| person.audit().loaded_owner().is_none()));
    }

    #[tokio::test]
    async fn dropped_transaction_discards_staged_changes() {
        let store = InMemoryRecordStore::<Person>::new();
        let inserted = store
            .insert(draft("Frodo", "Baggins"), audit("user1"))
            .await
            .unwrap_or_else(|_| unreachable!());

        {
            let mut transaction = store.begin().await.unwrap_or_else(|_| unreachable!());
            let mut person = transaction
                .find_for_update(inserted.id())
                .await
                .unwrap_or_default()
                .unwrap_or_else(|| unreachable!());
            person.replace_content(draft("Bilbo", "Baggins"));
            assert!(transaction.save(&person).await.is_ok());
            assert!(transaction.remove(inserted.id()).await.is_ok());
        }

        let found = store.find(inserted.id()).await.unwrap_or_default();
        assert_eq!(found.map(|person| person.first_name().to_owned()), Some("Frodo".to_owned()));
    }

    #[tokio::test]
    async fn committed_transaction_applies_changes_in_order() {
        let store = InMemoryRecordStore::<Person>::new();
        let kept = store
            .insert(draft("Frodo", "Baggins"), audit("user1"))
            .await
            .unwrap_or_else(|_| unreachable!());
        let removed = store
            .insert(draft("Lobelia", "Sackville"), audit("user2"))
            .await
            .unwrap_or_else(|_| unreachable!());

        let mut transaction = store.begin().await.unwrap_or_else(|_| unreachable!());
        let mut person = kept.clone();
        person.replace_content(draft("Bilbo", "Baggins"));
        assert!(transaction.save(&person).await.is_ok());
        assert!(transaction.remove(removed.id()).await.is_ok());
        assert!(transaction.commit().await.is_ok());

        let listed = store.list().await.unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].first_name(), "Bilbo");
    }

    #[tokio::test]
    async fn save_of_unknown_record_is_not_found() {
        let store = InMemoryRecordStore::<Person>::new();
        let detached = Person::assemble(
            custodia_domain::RecordId::new(),
            draft("Frodo", "Baggins"),
            audit("user1"),
        );

        let mut transaction = store.begin().await.unwrap_or_else(|_| unreachable!());
        assert!(transaction.save(&detached).await.is_err());
    }

    #[tokio::test]
    async fn find_by_field_matches_exact_values_across_owners() {
        let store = InMemoryRecordStore::<Person>::new();
        for (first_name, last_name, owner) in [
            ("Frodo", "Baggins", "user1"),
            ("Bilbo", "Baggins", "user2"),
            ("Samwise", "Gamgee", "user1"),
            ("Otho", "baggins", "user2"),
        ] {
            assert!(
                store
                    .insert(draft(first_name, last_name), audit(owner))
                    .await
                    .is_ok()
            );
        }

        let found = store
            .find_by_field(PERSON_LAST_NAME_FIELD, "Baggins")
            .await
            .unwrap_or_default();

        let mut first_names: Vec<&str> = found.iter().map(Person::first_name).collect();
        first_names.sort_unstable();
        assert_eq!(first_names, vec!["Bilbo", "Frodo"]);
    }
}
