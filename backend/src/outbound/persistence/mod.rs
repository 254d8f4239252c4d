//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel row structs and domain types; the
//! row structs and `schema.rs` never leave this module. Connections come from
//! a `bb8` pool through `diesel-async`, and every database failure is mapped
//! into the owning port's error enum.
//!
//! ```ignore
//! use looma_backend::outbound::persistence::{DbPool, DieselSchoolRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/looma")).await?;
//! let schools = DieselSchoolRepository::new(pool);
//! ```

mod diesel_activity_repositories;
mod diesel_basic_error_mapping;
mod diesel_school_repository;
mod diesel_session_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_activity_repositories::{DieselAccessLogRepository, DieselQrScanRepository};
pub use diesel_school_repository::DieselSchoolRepository;
pub use diesel_session_repository::DieselSessionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
