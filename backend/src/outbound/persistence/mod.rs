//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows and domain types and contain no
//! business logic. Row structs and the schema are private to this module.
//!
//! # Example
//!
//! ```no_run
//! use auth_backend::outbound::persistence::{
//!     DbPool, DieselUserDirectory, PoolConfig, run_migrations,
//! };
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/auth";
//! run_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let directory = DieselUserDirectory::new(pool);
//! # let _ = directory;
//! # Ok(())
//! # }
//! ```

mod diesel_user_directory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
