//! Premium and fee calculation
//!
//! A quote's price is the sum of four addends:
//!
//! ```text
//! final = carrier quote + premium tax + policy fee + broker fee
//! premium tax = carrier quote * tax percent / 100   (rounded to cents)
//! ```
//!
//! [`FeeSchedule`] can only be produced by [`FeeSchedule::calculate`] (or the
//! revision helpers that call it), so the derived fields are recomputed on
//! every change and `final_amount` can never drift from its components.
//! Carrier wholesale fees are not part of the total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Percent, Usd};

use crate::error::QuoteError;

/// Raw fee inputs as entered by an admin or agency user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeInputs {
    #[serde(rename = "carrierQuoteUSD")]
    pub carrier_quote: Decimal,
    #[serde(default)]
    pub premium_tax_percent: Option<Decimal>,
    #[serde(default, rename = "policyFeeUSD")]
    pub policy_fee: Option<Decimal>,
    #[serde(default, rename = "brokerFeeAmountUSD")]
    pub broker_fee: Option<Decimal>,
}

impl FeeInputs {
    pub fn new(carrier_quote: Decimal) -> Self {
        Self {
            carrier_quote,
            ..Default::default()
        }
    }

    pub fn tax_percent(mut self, percent: Decimal) -> Self {
        self.premium_tax_percent = Some(percent);
        self
    }

    pub fn policy_fee(mut self, fee: Decimal) -> Self {
        self.policy_fee = Some(fee);
        self
    }

    pub fn broker_fee(mut self, fee: Decimal) -> Self {
        self.broker_fee = Some(fee);
        self
    }
}

/// A partial change to a quote's addends
///
/// `premium_tax_percent: Some(None)` clears the tax rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeRevision {
    pub carrier_quote: Option<Decimal>,
    pub premium_tax_percent: Option<Option<Decimal>>,
    pub policy_fee: Option<Decimal>,
    pub broker_fee: Option<Decimal>,
}

impl FeeRevision {
    pub fn is_empty(&self) -> bool {
        self.carrier_quote.is_none()
            && self.premium_tax_percent.is_none()
            && self.policy_fee.is_none()
            && self.broker_fee.is_none()
    }
}

/// The computed price breakdown of a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "FeeInputs")]
pub struct FeeSchedule {
    #[serde(rename = "carrierQuoteUSD")]
    carrier_quote: Usd,
    premium_tax_percent: Option<Percent>,
    #[serde(rename = "premiumTaxAmountUSD")]
    premium_tax_amount: Usd,
    #[serde(rename = "policyFeeUSD")]
    policy_fee: Usd,
    #[serde(rename = "brokerFeeAmountUSD")]
    broker_fee: Usd,
    #[serde(rename = "finalAmountUSD")]
    final_amount: Usd,
}

impl FeeSchedule {
    /// Validates the inputs and computes tax and final amount
    ///
    /// # Errors
    ///
    /// - [`QuoteError::NonPositiveCarrierQuote`] if the carrier quote is zero or negative
    /// - [`QuoteError::TaxPercentOutOfRange`] if the tax percent is outside 0..=100
    /// - [`QuoteError::NegativeFee`] if the policy or broker fee is negative
    pub fn calculate(inputs: FeeInputs) -> Result<Self, QuoteError> {
        let carrier_quote =
            Usd::positive(inputs.carrier_quote).map_err(|_| QuoteError::NonPositiveCarrierQuote)?;

        let premium_tax_percent = inputs
            .premium_tax_percent
            .map(Percent::new)
            .transpose()
            .map_err(|_| QuoteError::TaxPercentOutOfRange)?;

        let policy_fee = Usd::non_negative(inputs.policy_fee.unwrap_or_default())
            .map_err(|_| QuoteError::NegativeFee("policyFeeUSD"))?;
        let broker_fee = Usd::non_negative(inputs.broker_fee.unwrap_or_default())
            .map_err(|_| QuoteError::NegativeFee("brokerFeeAmountUSD"))?;

        let premium_tax_amount = premium_tax_percent
            .map(|pct| carrier_quote.percent_of(pct))
            .unwrap_or_default();

        let final_amount = [carrier_quote, premium_tax_amount, policy_fee, broker_fee]
            .iter()
            .try_fold(Usd::zero(), |acc, part| acc.checked_add(part))?;

        Ok(Self {
            carrier_quote,
            premium_tax_percent,
            premium_tax_amount,
            policy_fee,
            broker_fee,
            final_amount,
        })
    }

    /// Returns the inputs this schedule was computed from
    pub fn inputs(&self) -> FeeInputs {
        FeeInputs {
            carrier_quote: self.carrier_quote.amount(),
            premium_tax_percent: self.premium_tax_percent.map(|p| p.as_percentage()),
            policy_fee: Some(self.policy_fee.amount()),
            broker_fee: Some(self.broker_fee.amount()),
        }
    }

    /// Recomputes the schedule with a new broker fee, other addends unchanged
    pub fn with_broker_fee(&self, broker_fee: Decimal) -> Result<Self, QuoteError> {
        self.revise(&FeeRevision {
            broker_fee: Some(broker_fee),
            ..Default::default()
        })
    }

    /// Applies any subset of addend changes and recomputes everything
    pub fn revise(&self, revision: &FeeRevision) -> Result<Self, QuoteError> {
        let mut inputs = self.inputs();
        if let Some(carrier_quote) = revision.carrier_quote {
            inputs.carrier_quote = carrier_quote;
        }
        if let Some(percent) = revision.premium_tax_percent {
            inputs.premium_tax_percent = percent;
        }
        if let Some(fee) = revision.policy_fee {
            inputs.policy_fee = Some(fee);
        }
        if let Some(fee) = revision.broker_fee {
            inputs.broker_fee = Some(fee);
        }
        Self::calculate(inputs)
    }

    pub fn carrier_quote(&self) -> Usd {
        self.carrier_quote
    }

    pub fn premium_tax_percent(&self) -> Option<Percent> {
        self.premium_tax_percent
    }

    pub fn premium_tax_amount(&self) -> Usd {
        self.premium_tax_amount
    }

    pub fn policy_fee(&self) -> Usd {
        self.policy_fee
    }

    pub fn broker_fee(&self) -> Usd {
        self.broker_fee
    }

    pub fn final_amount(&self) -> Usd {
        self.final_amount
    }

    /// Labelled addends for proposal and invoice rendering
    ///
    /// The carrier premium is always listed; zero-valued fees are omitted.
    pub fn line_items(&self) -> Vec<FeeLineItem> {
        let mut items = vec![FeeLineItem::new("Carrier Premium", self.carrier_quote)];
        if !self.premium_tax_amount.is_zero() {
            let label = match self.premium_tax_percent {
                Some(pct) => format!("Premium Tax ({pct})"),
                None => "Premium Tax".to_string(),
            };
            items.push(FeeLineItem::new(label, self.premium_tax_amount));
        }
        if !self.policy_fee.is_zero() {
            items.push(FeeLineItem::new("Policy Fee", self.policy_fee));
        }
        if !self.broker_fee.is_zero() {
            items.push(FeeLineItem::new("Broker Fee", self.broker_fee));
        }
        items
    }
}

impl TryFrom<FeeInputs> for FeeSchedule {
    type Error = QuoteError;

    fn try_from(inputs: FeeInputs) -> Result<Self, Self::Error> {
        FeeSchedule::calculate(inputs)
    }
}

/// One labelled row of a price breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLineItem {
    pub label: String,
    pub amount: Usd,
}

impl FeeLineItem {
    fn new(label: impl Into<String>, amount: Usd) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}
