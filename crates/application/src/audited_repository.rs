//! Generic CRUD over auditable resources.
//!
//! Every operation runs the resource lifecycle hooks around the store calls: records
//! pass through `on_load` as soon as they are read, updates are stamped for the acting
//! principal and then checked by `on_before_update` before anything is saved, and
//! deletes are checked by `on_before_delete` before removal. A rejected write drops
//! its unit of work, so nothing is persisted.

use std::sync::Arc;

use chrono::Utc;
use custodia_core::{AppError, AppResult, Principal};
use custodia_domain::{AuditFields, RecordId};

use crate::record_ports::{RecordStore, Resource};

/// Repository enforcing record ownership for one resource type.
pub struct AuditedRepository<R: Resource> {
    store: Arc<dyn RecordStore<R>>,
}

impl<R: Resource> Clone for AuditedRepository<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Resource> AuditedRepository<R> {
    /// Creates a repository on top of a store implementation.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore<R>>) -> Self {
        Self { store }
    }

    /// Creates a record owned by `principal`.
    pub async fn create(&self, principal: &Principal, draft: R::Draft) -> AppResult<R> {
        let audit = AuditFields::created_by(principal, Utc::now());
        let mut record = self.store.insert(draft, audit).await?;
        record.on_load();
        Ok(record)
    }

    /// Reads one record.
    pub async fn read(&self, id: RecordId) -> AppResult<R> {
        let mut record = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| not_found::<R>(id))?;
        record.on_load();
        Ok(record)
    }

    /// Lists every record regardless of owner.
    pub async fn list(&self) -> AppResult<Vec<R>> {
        Ok(loaded(self.store.list().await?))
    }

    /// Lists records whose indexed field equals `value`, regardless of owner.
    pub async fn search(&self, field_logical_name: &str, value: &str) -> AppResult<Vec<R>> {
        if !R::INDEXED_FIELDS.contains(&field_logical_name) {
            return Err(AppError::Validation(format!(
                "field '{field_logical_name}' is not searchable for {}",
                R::RESOURCE_NAME
            )));
        }

        Ok(loaded(
            self.store.find_by_field(field_logical_name, value).await?,
        ))
    }

    /// Replaces the content of a record owned by `principal`.
    pub async fn update(
        &self,
        principal: &Principal,
        id: RecordId,
        draft: R::Draft,
    ) -> AppResult<R> {
        self.modify(principal, id, move |record| record.replace_content(draft))
            .await
    }

    /// Changes part of the content of a record owned by `principal`.
    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: RecordId,
        patch: R::Patch,
    ) -> AppResult<R> {
        self.modify(principal, id, move |record| record.apply_patch(patch))
            .await
    }

    /// Removes a record owned by `principal`.
    pub async fn delete(&self, principal: Option<&Principal>, id: RecordId) -> AppResult<()> {
        let operation = format!("{} delete", R::RESOURCE_NAME);
        let mut transaction = self.store.begin().await?;

        let mut record = transaction
            .find_for_update(id)
            .await?
            .ok_or_else(|| not_found::<R>(id))?;
        record.on_load();

        if let Err(violation) = record.on_before_delete(principal) {
            drop(transaction);
            return Err(AppError::aborted(operation, AppError::from(violation)));
        }

        transaction
            .remove(id)
            .await
            .map_err(|error| AppError::aborted(operation.as_str(), error))?;
        transaction
            .commit()
            .await
            .map_err(|error| AppError::aborted(operation, error))
    }

    async fn modify<F>(&self, principal: &Principal, id: RecordId, mutation: F) -> AppResult<R>
    where
        F: FnOnce(&mut R) + Send,
    {
        let operation = format!("{} update", R::RESOURCE_NAME);
        let mut transaction = self.store.begin().await?;

        let mut record = transaction
            .find_for_update(id)
            .await?
            .ok_or_else(|| not_found::<R>(id))?;
        record.on_load();

        mutation(&mut record);
        // Stamping must precede the guard, which reads the stamped modifier.
        record
            .audit_mut()
            .record_modification(principal, Utc::now());

        if let Err(violation) = record.on_before_update() {
            drop(transaction);
            return Err(AppError::aborted(operation, AppError::from(violation)));
        }

        transaction
            .save(&record)
            .await
            .map_err(|error| AppError::aborted(operation.as_str(), error))?;
        transaction
            .commit()
            .await
            .map_err(|error| AppError::aborted(operation, error))?;

        Ok(record)
    }
}

fn loaded<R: Resource>(mut records: Vec<R>) -> Vec<R> {
    for record in &mut records {
        record.on_load();
    }
    records
}

fn not_found<R: Resource>(id: RecordId) -> AppError {
    AppError::NotFound(format!("{} '{id}' does not exist", R::RESOURCE_NAME))
}
