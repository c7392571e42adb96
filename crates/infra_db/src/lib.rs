//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the bind portal using SQLx.
//!
//! # Architecture
//!
//! - **Repositories** map table rows to and from domain parts with runtime
//!   queries and `FromRow` row types
//! - **Adapters** implement domain ports on top of the repositories
//!
//! # Optimistic Concurrency
//!
//! Every update is `UPDATE ... WHERE id = $1 AND version = $2`. Zero
//! affected rows means someone else saved first; the adapter reports a
//! conflict instead of overwriting their change.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresWorkflowAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/bind_portal")).await?;
//! run_migrations(&pool).await?;
//! let port = PostgresWorkflowAdapter::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresWorkflowAdapter;
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
