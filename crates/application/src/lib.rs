//! Application services and ports.

#![forbid(unsafe_code)]

mod audited_repository;
mod authentication_service;
mod person_service;
mod record_ports;

pub use audited_repository::AuditedRepository;
pub use authentication_service::{AuthenticationService, PasswordHasher, PrincipalDirectory};
pub use person_service::PersonService;
pub use record_ports::{RecordStore, RecordTransaction, Resource};
