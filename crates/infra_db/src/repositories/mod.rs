//! Repositories for the portal tables
//!
//! Each repository owns the SQL for one table and maps rows to and from
//! the domain's stored parts. Reads go through the pool; writes take a
//! connection so the adapter can group them in one transaction.

pub mod carrier;
pub mod quote;
pub mod submission;

pub use carrier::{CarrierRepository, CarrierRow};
pub use quote::{QuoteRepository, QuoteRow, SUBMISSION_CARRIER_KEY};
pub use submission::{DerivedFlags, SubmissionRepository, SubmissionRow};
