//! Quote domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the quote domain
///
/// Messages are user facing; the API layer returns them verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    /// Invalid status transition attempted
    #[error("Invalid quote status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: String,
        to: String,
    },

    #[error("carrierQuoteUSD must be greater than 0")]
    NonPositiveCarrierQuote,

    #[error("premiumTaxPercent must be between 0 and 100")]
    TaxPercentOutOfRange,

    /// A fee addend was negative; carries the field name
    #[error("{0} must be a non-negative number")]
    NegativeFee(&'static str),

    #[error("wholesaleFeePercent must be between 0 and 100")]
    WholesalePercentOutOfRange,

    /// Fees cannot change once the quote is past approval
    #[error("Quote fees cannot be changed while the quote is {0}")]
    FeesLocked(String),

    /// Required field is missing
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Financial error: {0}")]
    Financial(String),
}

impl QuoteError {
    pub fn validation(message: impl Into<String>) -> Self {
        QuoteError::Validation(message.into())
    }

    pub(crate) fn transition(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        QuoteError::InvalidStatusTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

impl From<MoneyError> for QuoteError {
    fn from(err: MoneyError) -> Self {
        QuoteError::Financial(err.to_string())
    }
}
