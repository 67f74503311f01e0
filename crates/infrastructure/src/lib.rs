//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_principal_directory;
mod in_memory_record_store;
mod postgres_person_store;

pub use argon2_password_hasher::{
    Argon2PasswordHasher, DEFAULT_MEMORY_COST_KIB, DEFAULT_TIME_COST,
};
pub use in_memory_principal_directory::InMemoryPrincipalDirectory;
pub use in_memory_record_store::InMemoryRecordStore;
pub use postgres_person_store::PostgresPersonStore;
