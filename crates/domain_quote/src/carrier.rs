//! Insurance carriers that quote on submissions

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CarrierId, Percent};

use crate::error::QuoteError;

/// A carrier (insurer) that can be routed submissions and enter quotes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    pub id: CarrierId,
    pub name: String,
    pub email: String,
    /// Two-letter state codes the carrier writes in
    pub states_served: Vec<String>,
    pub industries: Vec<String>,
    /// Legacy wholesale fee. Kept on the record for display only; it is
    /// never added to a quote total.
    pub wholesale_fee_percent: Percent,
    pub created_at: DateTime<Utc>,
}

impl Carrier {
    /// Creates a carrier, validating name, email and the wholesale percent
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        wholesale_fee_percent: Decimal,
    ) -> Result<Self, QuoteError> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_lowercase();

        if name.is_empty() {
            return Err(QuoteError::MissingRequiredField("name".to_string()));
        }
        if !email.contains('@') {
            return Err(QuoteError::validation(format!("Invalid carrier email: {email}")));
        }
        let wholesale_fee_percent =
            Percent::new(wholesale_fee_percent).map_err(|_| QuoteError::WholesalePercentOutOfRange)?;

        Ok(Self {
            id: CarrierId::new(),
            name,
            email,
            states_served: Vec::new(),
            industries: Vec::new(),
            wholesale_fee_percent,
            created_at: Utc::now(),
        })
    }

    pub fn with_states(mut self, states: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.states_served = states.into_iter().map(|s| s.into().to_uppercase()).collect();
        self
    }

    pub fn with_industries(mut self, industries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.industries = industries.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the carrier writes business in the given state
    pub fn serves_state(&self, state: &str) -> bool {
        self.states_served.iter().any(|s| s.eq_ignore_ascii_case(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_carrier_validation() {
        assert!(Carrier::new("", "a@b.com", dec!(5)).is_err());
        assert!(Carrier::new("Acme", "not-an-email", dec!(5)).is_err());
        assert_eq!(
            Carrier::new("Acme", "uw@acme.com", dec!(101)),
            Err(QuoteError::WholesalePercentOutOfRange)
        );
    }

    #[test]
    fn test_serves_state_case_insensitive() {
        let carrier = Carrier::new("Acme", "uw@acme.com", dec!(0))
            .unwrap()
            .with_states(["tx", "CA"]);
        assert!(carrier.serves_state("TX"));
        assert!(carrier.serves_state("ca"));
        assert!(!carrier.serves_state("NY"));
    }
}
