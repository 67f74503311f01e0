//! Principal authentication ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use custodia_core::{AppError, AppResult, Principal};

/// Port for password hashing operations. Keeps application code free of direct
/// cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Port for looking up known principals.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Returns the password hash registered for a principal name.
    async fn find_password_hash(&self, name: &str) -> AppResult<Option<String>>;
}

/// Resolves request credentials to a principal.
#[derive(Clone)]
pub struct AuthenticationService {
    directory: Arc<dyn PrincipalDirectory>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl AuthenticationService {
    /// Creates a service from its ports.
    #[must_use]
    pub fn new(
        directory: Arc<dyn PrincipalDirectory>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            directory,
            password_hasher,
        }
    }

    /// Verifies a name and password pair.
    ///
    /// Unknown names and wrong passwords produce the same error.
    pub async fn authenticate(&self, name: &str, password: &str) -> AppResult<Principal> {
        let Some(password_hash) = self.directory.find_password_hash(name).await? else {
            // Hash anyway so unknown names cost as much as wrong passwords.
            let _ = self.password_hasher.hash_password(password);
            return Err(invalid_credentials());
        };

        if !self
            .password_hasher
            .verify_password(password, password_hash.as_str())?
        {
            return Err(invalid_credentials());
        }

        Principal::new(name)
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("invalid credentials".to_owned())
}
