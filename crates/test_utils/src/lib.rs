//! Test Utilities Crate
//!
//! Shared test infrastructure for the bind portal.
//!
//! # Modules
//!
//! - `fixtures`: reference carriers, contacts, forms and fees
//! - `builders`: submission and quote builders
//! - `scenario`: drive the bind workflow to a given stage
//! - `database`: migrated Postgres testcontainers
//! - `assertions`: fee and workflow assertions
//! - `generators`: proptest strategies

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;
pub mod scenario;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;
pub use scenario::*;
