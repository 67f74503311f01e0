use std::sync::Arc;

use custodia_core::{AppResult, Principal};
use custodia_domain::{
    AuditFields, PERSON_LAST_NAME_FIELD, Person, PersonDraft, PersonPatch, RecordId,
};

use crate::audited_repository::AuditedRepository;
use crate::record_ports::{RecordStore, Resource};

impl Resource for Person {
    type Draft = PersonDraft;
    type Patch = PersonPatch;

    const RESOURCE_NAME: &'static str = "person";
    const INDEXED_FIELDS: &'static [&'static str] = &[PERSON_LAST_NAME_FIELD];

    fn assemble(id: RecordId, draft: PersonDraft, audit: AuditFields) -> Self {
        Person::new(id, draft, audit)
    }

    fn record_id(&self) -> RecordId {
        self.id()
    }

    fn replace_content(&mut self, draft: PersonDraft) {
        Person::replace_content(self, draft);
    }

    fn apply_patch(&mut self, patch: PersonPatch) {
        Person::apply_patch(self, patch);
    }

    fn indexed_value(&self, field_logical_name: &str) -> Option<&str> {
        (field_logical_name == PERSON_LAST_NAME_FIELD).then(|| self.last_name())
    }
}

/// Application service for person records.
#[derive(Clone)]
pub struct PersonService {
    repository: AuditedRepository<Person>,
}

impl PersonService {
    /// Creates a service from a store implementation.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore<Person>>) -> Self {
        Self {
            repository: AuditedRepository::new(store),
        }
    }

    /// Creates a person owned by `principal`.
    pub async fn create_person(
        &self,
        principal: &Principal,
        draft: PersonDraft,
    ) -> AppResult<Person> {
        self.repository.create(principal, draft).await
    }

    /// Returns one person.
    pub async fn get_person(&self, id: RecordId) -> AppResult<Person> {
        self.repository.read(id).await
    }

    /// Returns every person.
    pub async fn list_people(&self) -> AppResult<Vec<Person>> {
        self.repository.list().await
    }

    /// Returns the people with the given last name.
    pub async fn find_by_last_name(&self, last_name: &str) -> AppResult<Vec<Person>> {
        self.repository
            .search(PERSON_LAST_NAME_FIELD, last_name)
            .await
    }

    /// Replaces a person's content.
    pub async fn update_person(
        &self,
        principal: &Principal,
        id: RecordId,
        draft: PersonDraft,
    ) -> AppResult<Person> {
        self.repository.update(principal, id, draft).await
    }

    /// Changes the fields present in `patch`.
    pub async fn patch_person(
        &self,
        principal: &Principal,
        id: RecordId,
        patch: PersonPatch,
    ) -> AppResult<Person> {
        self.repository.partial_update(principal, id, patch).await
    }

    /// Deletes a person.
    pub async fn delete_person(
        &self,
        principal: Option<&Principal>,
        id: RecordId,
    ) -> AppResult<()> {
        self.repository.delete(principal, id).await
    }
}
