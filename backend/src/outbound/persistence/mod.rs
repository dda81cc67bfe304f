//! PostgreSQL persistence adapters using Diesel.
//!
//! Row structs and table definitions are internal; only the repository, the
//! pool and the migration runner are exposed.

mod diesel_basic_error_mapping;
mod diesel_results_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_results_repository::DieselResultsRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
