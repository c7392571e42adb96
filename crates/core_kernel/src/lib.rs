//! Core Kernel - Foundational types for the bind portal
//!
//! This crate provides the building blocks shared by every domain crate:
//! - [`Usd`] amounts with cent rounding and `$1,234.56` display
//! - [`Percent`] rates bounded to 0..=100
//! - Typed identifiers for submissions, quotes, carriers and parties
//! - Port error and health types for the ports-and-adapters layout

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Usd, Percent, MoneyError};
pub use identifiers::{
    SubmissionId, DocumentId, EnvelopeId, QuoteId, CarrierId, AgencyId, UserId,
};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth, OperationMetadata,
};
