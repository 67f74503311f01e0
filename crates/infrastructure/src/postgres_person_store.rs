use async_trait::async_trait;
use chrono::{DateTime, Utc};
use custodia_application::{RecordStore, RecordTransaction};
use custodia_core::{AppError, AppResult};
use custodia_domain::{
    AuditFields, Auditable, PERSON_LAST_NAME_FIELD, Person, PersonDraft, RecordId,
};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

/// PostgreSQL-backed person store.
#[derive(Clone)]
pub struct PostgresPersonStore {
    pool: PgPool,
}

impl PostgresPersonStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PersonRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    owner: String,
    modifier: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl TryFrom<PersonRow> for Person {
    type Error = AppError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let audit = AuditFields::restore(row.owner, row.modifier, row.created_at, row.modified_at)?;
        Person::restore(
            RecordId::from_uuid(row.id),
            row.first_name,
            row.last_name,
            audit,
        )
    }
}

fn people_from_rows(rows: Vec<PersonRow>) -> AppResult<Vec<Person>> {
    rows.into_iter().map(Person::try_from).collect()
}

#[async_trait]
impl RecordStore<Person> for PostgresPersonStore {
    async fn insert(&self, draft: PersonDraft, audit: AuditFields) -> AppResult<Person> {
        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            INSERT INTO people (first_name, last_name, owner, modifier, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, owner, modifier, created_at, modified_at
            "#,
        )
        .bind(draft.first_name())
        .bind(draft.last_name())
        .bind(audit.owner())
        .bind(audit.modifier())
        .bind(audit.created_at())
        .bind(audit.modified_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert person: {error}")))?;

        Person::try_from(row)
    }

    async fn find(&self, id: RecordId) -> AppResult<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, first_name, last_name, owner, modifier, created_at, modified_at
            FROM people
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find person '{id}': {error}")))?;

        row.map(Person::try_from).transpose()
    }

    async fn list(&self) -> AppResult<Vec<Person>> {
        let rows = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, first_name, last_name, owner, modifier, created_at, modified_at
            FROM people
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list people: {error}")))?;

        people_from_rows(rows)
    }

    async fn find_by_field(&self, field_logical_name: &str, value: &str) -> AppResult<Vec<Person>> {
        if field_logical_name != PERSON_LAST_NAME_FIELD {
            return Err(AppError::Validation(format!(
                "field '{field_logical_name}' is not searchable"
            )));
        }

        let rows = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, first_name, last_name, owner, modifier, created_at, modified_at
            FROM people
            WHERE last_name = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to search people by last name: {error}"))
        })?;

        people_from_rows(rows)
    }

    async fn begin(&self) -> AppResult<Box<dyn RecordTransaction<Person>>> {
        let transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))?;

        Ok(Box::new(PostgresPersonTransaction { transaction }))
    }
}

struct PostgresPersonTransaction {
    transaction: Transaction<'static, Postgres>,
}

#[async_trait]
impl RecordTransaction<Person> for PostgresPersonTransaction {
    async fn find_for_update(&mut self, id: RecordId) -> AppResult<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, first_name, last_name, owner, modifier, created_at, modified_at
            FROM people
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock person '{id}': {error}")))?;

        row.map(Person::try_from).transpose()
    }

    async fn save(&mut self, person: &Person) -> AppResult<()> {
        let id = person.id();
        let result = sqlx::query(
            r#"
            UPDATE people
            SET first_name = $2,
                last_name = $3,
                modifier = $4,
                modified_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(person.first_name())
        .bind(person.last_name())
        .bind(person.audit().modifier())
        .bind(person.audit().modified_at())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update person '{id}': {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("person '{id}' does not exist")));
        }

        Ok(())
    }

    async fn remove(&mut self, id: RecordId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM people
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete person '{id}': {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("person '{id}' does not exist")));
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
    }
}
