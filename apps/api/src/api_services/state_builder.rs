use std::sync::Arc;

use custodia_application::{AuthenticationService, PasswordHasher, PersonService, RecordStore};
use custodia_core::AppError;
use custodia_domain::Person;
use custodia_infrastructure::{
    Argon2PasswordHasher, InMemoryPrincipalDirectory, InMemoryRecordStore, PostgresPersonStore,
};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, StorageBackendConfig};
use crate::state::AppState;

use super::database::connect_and_migrate;

/// Builds the state served by the router, or `None` once a migrate-only run is done.
pub async fn build_app_state(config: &ApiConfig) -> Result<Option<AppState>, AppError> {
    let person_store: Arc<dyn RecordStore<Person>> = match &config.storage {
        StorageBackendConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = connect_and_migrate(database_url, *max_connections).await?;
            if config.migrate_only {
                return Ok(None);
            }

            info!("using postgres person store");
            Arc::new(PostgresPersonStore::new(pool))
        }
        StorageBackendConfig::Memory => {
            warn!("using in-memory person store; records are lost on shutdown");
            Arc::new(InMemoryRecordStore::<Person>::new())
        }
    };

    let authentication_service = build_authentication_service(
        Arc::new(Argon2PasswordHasher::new()),
        &config.principals,
    )?;

    Ok(Some(AppState {
        person_service: PersonService::new(person_store),
        authentication_service,
    }))
}

/// Hashes the configured credentials into a principal directory.
pub fn build_authentication_service(
    password_hasher: Arc<dyn PasswordHasher>,
    principals: &[(String, String)],
) -> Result<AuthenticationService, AppError> {
    let directory =
        InMemoryPrincipalDirectory::from_credentials(password_hasher.as_ref(), principals)?;
    Ok(AuthenticationService::new(Arc::new(directory), password_hasher))
}
