//! Domain port adapters backed by PostgreSQL
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresWorkflowAdapter;
//! use domain_submission::WorkflowPort;
//!
//! let port: Arc<dyn WorkflowPort> = Arc::new(PostgresWorkflowAdapter::new(pool));
//! let submission = port.get_submission(id).await?;
//! ```

pub mod workflow;

pub use workflow::PostgresWorkflowAdapter;
