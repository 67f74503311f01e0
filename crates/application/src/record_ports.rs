use async_trait::async_trait;
use custodia_core::AppResult;
use custodia_domain::{AuditFields, Auditable, RecordId};

/// Persisted resource handled by [`crate::AuditedRepository`].
pub trait Resource: Auditable + Clone + Send + Sync + 'static {
    /// Complete client-supplied content used by create and full update.
    type Draft: Send + 'static;
    /// Partial client-supplied content used by partial update.
    type Patch: Send + 'static;

    /// Singular label used in messages and operation names.
    const RESOURCE_NAME: &'static str;

    /// Logical names of the fields that can be searched.
    const INDEXED_FIELDS: &'static [&'static str];

    /// Assembles a resource from the identifier assigned by storage.
    fn assemble(id: RecordId, draft: Self::Draft, audit: AuditFields) -> Self;

    /// Returns the storage-assigned identifier.
    fn record_id(&self) -> RecordId;

    /// Replaces every content field.
    fn replace_content(&mut self, draft: Self::Draft);

    /// Replaces the content fields present in `patch`.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Returns the value of an indexed field.
    fn indexed_value(&self, field_logical_name: &str) -> Option<&str>;
}

/// Storage port with generic CRUD operations keyed by record identifier.
///
/// Implementations return records exactly as stored. Lifecycle hooks are the caller's
/// responsibility.
#[async_trait]
pub trait RecordStore<R: Resource>: Send + Sync {
    /// Persists a new record and returns it with its assigned identifier.
    async fn insert(&self, draft: R::Draft, audit: AuditFields) -> AppResult<R>;

    /// Looks up a record by identifier.
    async fn find(&self, id: RecordId) -> AppResult<Option<R>>;

    /// Lists every record ordered by creation time.
    async fn list(&self) -> AppResult<Vec<R>>;

    /// Lists records whose indexed field equals `value`.
    async fn find_by_field(&self, field_logical_name: &str, value: &str) -> AppResult<Vec<R>>;

    /// Opens a unit of work for a read-modify-write cycle.
    async fn begin(&self) -> AppResult<Box<dyn RecordTransaction<R>>>;
}

/// Unit of work opened by [`RecordStore::begin`].
///
/// Nothing staged through a transaction becomes visible until [`commit`] succeeds.
/// Dropping the transaction without committing rolls it back.
///
/// [`commit`]: RecordTransaction::commit
#[async_trait]
pub trait RecordTransaction<R: Resource>: Send {
    /// Reads a record and holds it against concurrent writers until the unit ends.
    async fn find_for_update(&mut self, id: RecordId) -> AppResult<Option<R>>;

    /// Stages the mutable fields of an existing record.
    ///
    /// Owner and creation time are never written back.
    async fn save(&mut self, record: &R) -> AppResult<()>;

    /// Stages removal of a record.
    async fn remove(&mut self, id: RecordId) -> AppResult<()>;

    /// Makes every staged change durable.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
