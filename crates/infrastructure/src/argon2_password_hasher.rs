//! Argon2id hashing for principal credentials.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use custodia_application::PasswordHasher as PasswordHasherPort;
use custodia_core::{AppError, AppResult};

/// Memory cost in KiB used by [`Argon2PasswordHasher::new`].
pub const DEFAULT_MEMORY_COST_KIB: u32 = 19_456;

/// Iteration count used by [`Argon2PasswordHasher::new`].
pub const DEFAULT_TIME_COST: u32 = 2;

/// Argon2id password hasher.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with m=19456 KiB, t=2, p=1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_MEMORY_COST_KIB, DEFAULT_TIME_COST)
            .unwrap_or_else(|_| Self::from_params(Params::default()))
    }

    /// Creates a hasher with explicit memory and time costs and a single lane.
    pub fn with_cost(memory_cost_kib: u32, time_cost: u32) -> AppResult<Self> {
        let params = Params::new(memory_cost_kib, time_cost, 1, None).map_err(|error| {
            AppError::Validation(format!("invalid argon2 parameters: {error}"))
        })?;

        Ok(Self::from_params(params))
    }

    fn from_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash).map_err(|error| {
            AppError::Internal(format!("failed to parse password hash: {error}"))
        })?;

        // Parameters embedded in the stored hash take precedence over this hasher's.
        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use custodia_application::PasswordHasher as PasswordHasherPort;
    use custodia_core::{AppError, AppResult};

    use super::Argon2PasswordHasher;

    fn cheap_hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_cost(1024, 1).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn hash_and_verify_correct_password() -> AppResult<()> {
        let hasher = cheap_hasher();
        let hash = hasher.hash_password("password")?;
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("password", &hash)?);
        Ok(())
    }

    #[test]
    fn verify_wrong_password_returns_false() -> AppResult<()> {
        let hasher = cheap_hasher();
        let hash = hasher.hash_password("password")?;
        assert!(!hasher.verify_password("Password", &hash)?);
        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> AppResult<()> {
        let hasher = cheap_hasher();
        assert_ne!(
            hasher.hash_password("password")?,
            hasher.hash_password("password")?
        );
        Ok(())
    }

    #[test]
    fn malformed_hash_is_internal_error() {
        let result = cheap_hasher().verify_password("password", "not-a-phc-string");
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn zero_time_cost_is_rejected() {
        assert!(matches!(
            Argon2PasswordHasher::with_cost(1024, 0),
            Err(AppError::Validation(_))
        ));
    }
}
