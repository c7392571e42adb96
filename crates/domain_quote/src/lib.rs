//! Quote Domain
//!
//! Carriers, the quote aggregate and the premium/fee calculator.
//!
//! # Architecture
//!
//! The crate is infrastructure-agnostic:
//! - **Aggregate**: [`Quote`] owns its status and its [`FeeSchedule`]
//! - **Value Objects**: [`FeeSchedule`], [`FinancePlan`], [`QuoteCoverage`]
//! - **Domain Events**: [`QuoteEvent`]
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_quote::{FeeInputs, FeeSchedule};
//!
//! let fees = FeeSchedule::calculate(
//!     FeeInputs::new(dec!(1000)).tax_percent(dec!(5)).policy_fee(dec!(50)).broker_fee(dec!(100)),
//! )?;
//! assert_eq!(fees.final_amount().to_string(), "$1,200.00");
//! ```

pub mod carrier;
pub mod error;
pub mod events;
pub mod fees;
pub mod quote;

pub use carrier::Carrier;
pub use error::QuoteError;
pub use events::QuoteEvent;
pub use fees::{FeeInputs, FeeLineItem, FeeRevision, FeeSchedule};
pub use quote::{
    FinancePlan, NewQuote, Quote, QuoteCoverage, QuoteLimits, QuoteParts, QuoteStatus,
};
