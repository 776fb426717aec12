//! Persistence adapters for the repository ports.
//!
//! PostgreSQL implementations use the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling; the in-memory implementations
//! back tests and database-less deployments.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, PoolConfig, DieselStudentRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/roster");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselStudentRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_course_repository;
mod diesel_student_repository;
mod memory;
mod models;
mod pool;
mod schema;

pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_student_repository::DieselStudentRepository;
pub use memory::{InMemoryCourseRepository, InMemoryStudentRepository, in_memory_repositories};
pub use pool::{DbPool, PoolConfig, PoolError};
