use std::collections::HashMap;

use async_trait::async_trait;
use custodia_application::{PasswordHasher, PrincipalDirectory};
use custodia_core::{AppError, AppResult, Principal};
use tracing::info;

/// Principal directory loaded once at startup.
///
/// Only password hashes are retained.
pub struct InMemoryPrincipalDirectory {
    password_hashes: HashMap<String, String>,
}

impl InMemoryPrincipalDirectory {
    /// Hashes each `(name, password)` pair and builds the directory.
    pub fn from_credentials(
        password_hasher: &dyn PasswordHasher,
        credentials: &[(String, String)],
    ) -> AppResult<Self> {
        let mut password_hashes = HashMap::with_capacity(credentials.len());
        for (name, password) in credentials {
            let principal = Principal::new(name.as_str())?;
            if password.is_empty() {
                return Err(AppError::Validation(format!(
                    "principal '{principal}' has an empty password"
                )));
            }

            let hash = password_hasher.hash_password(password)?;
            if password_hashes
                .insert(principal.name().to_owned(), hash)
                .is_some()
            {
                return Err(AppError::Validation(format!(
                    "principal '{principal}' is configured more than once"
                )));
            }
        }

        info!(principals = password_hashes.len(), "principal directory loaded");
        Ok(Self { password_hashes })
    }
}

#[async_trait]
impl PrincipalDirectory for InMemoryPrincipalDirectory {
    async fn find_password_hash(&self, name: &str) -> AppResult<Option<String>> {
        Ok(self.password_hashes.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use custodia_application::{PasswordHasher, PrincipalDirectory};
    use custodia_core::{AppError, AppResult};

    use super::InMemoryPrincipalDirectory;

    struct ReversingHasher;

    impl PasswordHasher for ReversingHasher {
        fn hash_password(&self, password: &str) -> AppResult<String> {
            Ok(password.chars().rev().collect())
        }

        fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
            Ok(password.chars().rev().collect::<String>() == hash)
        }
    }

    fn credentials(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, password)| ((*name).to_owned(), (*password).to_owned()))
            .collect()
    }

    #[tokio::test]
    async fn stores_hashes_not_passwords() {
        let directory = InMemoryPrincipalDirectory::from_credentials(
            &ReversingHasher,
            &credentials(&[("user1", "password"), ("user2", "secret")]),
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            directory.find_password_hash("user1").await.unwrap_or_default(),
            Some("drowssap".to_owned())
        );
        assert_eq!(
            directory.find_password_hash("user3").await.unwrap_or_default(),
            None
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = InMemoryPrincipalDirectory::from_credentials(
            &ReversingHasher,
            &credentials(&[("user1", "a"), ("user1", "b")]),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn blank_names_and_empty_passwords_are_rejected() {
        assert!(
            InMemoryPrincipalDirectory::from_credentials(
                &ReversingHasher,
                &credentials(&[(" ", "password")])
            )
            .is_err()
        );
        assert!(
            InMemoryPrincipalDirectory::from_credentials(
                &ReversingHasher,
                &credentials(&[("user1", "")])
            )
            .is_err()
        );
    }
}
