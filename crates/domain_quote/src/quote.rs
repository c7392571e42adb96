//! Quote Aggregate Root
//!
//! A quote is one carrier's price for one submission. It is entered by a
//! system admin, posted to the agency, approved by the agency and then moves
//! with the submission through bind.
//!
//! # Lifecycle
//!
//! ```text
//! Entered -> Posted -> Approved -> BindRequested -> Bound
//! ```
//!
//! # Invariants
//!
//! - The fee schedule is always internally consistent (see [`FeeSchedule`])
//! - Fees are frozen once a bind has been requested
//! - The agency may change the broker fee only while the quote is Posted or Approved

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{CarrierId, QuoteId, SubmissionId, Usd, UserId};

use crate::error::QuoteError;
use crate::events::QuoteEvent;
use crate::fees::{FeeInputs, FeeRevision, FeeSchedule};

/// Quote lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    /// Entered by an admin, not yet visible to the agency
    Entered,
    /// Visible to the agency
    Posted,
    /// Accepted by the agency; documents may be generated
    Approved,
    BindRequested,
    Bound,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Entered => "ENTERED",
            QuoteStatus::Posted => "POSTED",
            QuoteStatus::Approved => "APPROVED",
            QuoteStatus::BindRequested => "BIND_REQUESTED",
            QuoteStatus::Bound => "BOUND",
        }
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, target),
            (Entered, Posted) |
            (Posted, Approved) |
            (Approved, BindRequested) |
            (BindRequested, Bound)
        )
    }

    /// Whether an admin may still revise the price
    pub fn fees_editable(&self) -> bool {
        matches!(self, QuoteStatus::Entered | QuoteStatus::Posted | QuoteStatus::Approved)
    }

    /// Whether the agency may change its broker fee
    pub fn broker_fee_editable(&self) -> bool {
        matches!(self, QuoteStatus::Posted | QuoteStatus::Approved)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENTERED" => Ok(QuoteStatus::Entered),
            "POSTED" => Ok(QuoteStatus::Posted),
            "APPROVED" => Ok(QuoteStatus::Approved),
            "BIND_REQUESTED" => Ok(QuoteStatus::BindRequested),
            "BOUND" => Ok(QuoteStatus::Bound),
            other => Err(QuoteError::validation(format!("Unknown quote status: {other}"))),
        }
    }
}

/// Premium financing offered alongside the quote
///
/// When present, a finance agreement becomes a required document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancePlan {
    pub provider: String,
    pub down_payment: Usd,
    pub installments: u32,
    pub installment_amount: Usd,
}

impl FinancePlan {
    /// Total of the down payment and all installments
    pub fn total_payable(&self) -> Usd {
        self.down_payment + Usd::new(self.installment_amount.amount() * Decimal::from(self.installments))
    }
}

/// Coverage limits as entered on the quote (free-form, e.g. "$1,000,000")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLimits {
    pub general_liability: Option<String>,
    pub aggregate_limit: Option<String>,
    pub fire_legal_limit: Option<String>,
    pub medical_expense_limit: Option<String>,
    pub deductible: Option<String>,
}

/// Policy details the admin records alongside the price
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCoverage {
    #[serde(default)]
    pub limits: QuoteLimits,
    #[serde(default)]
    pub endorsements: Vec<String>,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub policy_number: Option<String>,
    pub carrier_reference: Option<String>,
    pub special_notes: Option<String>,
}

/// Everything needed to enter a new quote
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub submission_id: SubmissionId,
    pub carrier_id: CarrierId,
    pub fees: FeeInputs,
    pub coverage: QuoteCoverage,
    pub finance_plan: Option<FinancePlan>,
    pub entered_by: UserId,
}

/// Stored state of a quote, used by adapters to rebuild the aggregate
///
/// Only fee inputs are carried; derived amounts are recomputed on restore.
#[derive(Debug, Clone)]
pub struct QuoteParts {
    pub id: QuoteId,
    pub submission_id: SubmissionId,
    pub carrier_id: CarrierId,
    pub fees: FeeInputs,
    pub status: QuoteStatus,
    pub coverage: QuoteCoverage,
    pub finance_plan: Option<FinancePlan>,
    pub entered_by: UserId,
    pub entered_at: DateTime<Utc>,
    pub posted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub version: u32,
    pub updated_at: DateTime<Utc>,
}

/// The Quote aggregate root
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    id: QuoteId,
    submission_id: SubmissionId,
    carrier_id: CarrierId,
    #[serde(flatten)]
    fees: FeeSchedule,
    status: QuoteStatus,
    coverage: QuoteCoverage,
    finance_plan: Option<FinancePlan>,
    entered_by: UserId,
    entered_at: DateTime<Utc>,
    posted_at: Option<DateTime<Utc>>,
    approved_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    events: Vec<QuoteEvent>,
    /// Version for optimistic concurrency
    version: u32,
    updated_at: DateTime<Utc>,
}

impl Quote {
    /// Enters a new quote in the `Entered` status
    ///
    /// # Errors
    ///
    /// Returns the fee validation error if the price inputs are invalid
    pub fn enter(new: NewQuote) -> Result<Self, QuoteError> {
        let fees = FeeSchedule::calculate(new.fees)?;
        let now = Utc::now();
        let id = QuoteId::new();

        Ok(Self {
            id,
            submission_id: new.submission_id,
            carrier_id: new.carrier_id,
            status: QuoteStatus::Entered,
            coverage: new.coverage,
            finance_plan: new.finance_plan,
            entered_by: new.entered_by,
            entered_at: now,
            posted_at: None,
            approved_at: None,
            events: vec![QuoteEvent::QuoteEntered {
                quote_id: id,
                submission_id: new.submission_id,
                carrier_id: new.carrier_id,
                final_amount: fees.final_amount(),
                entered_by: new.entered_by,
                timestamp: now,
            }],
            fees,
            version: 1,
            updated_at: now,
        })
    }

    /// Rebuilds a quote from stored parts, recomputing its fee schedule
    pub fn restore(parts: QuoteParts) -> Result<Self, QuoteError> {
        Ok(Self {
            id: parts.id,
            submission_id: parts.submission_id,
            carrier_id: parts.carrier_id,
            fees: FeeSchedule::calculate(parts.fees)?,
            status: parts.status,
            coverage: parts.coverage,
            finance_plan: parts.finance_plan,
            entered_by: parts.entered_by,
            entered_at: parts.entered_at,
            posted_at: parts.posted_at,
            approved_at: parts.approved_at,
            events: Vec::new(),
            version: parts.version,
            updated_at: parts.updated_at,
        })
    }

    pub fn id(&self) -> QuoteId {
        self.id
    }

    pub fn submission_id(&self) -> SubmissionId {
        self.submission_id
    }

    pub fn carrier_id(&self) -> CarrierId {
        self.carrier_id
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    pub fn final_amount(&self) -> Usd {
        self.fees.final_amount()
    }

    pub fn status(&self) -> QuoteStatus {
        self.status
    }

    pub fn coverage(&self) -> &QuoteCoverage {
        &self.coverage
    }

    pub fn finance_plan(&self) -> Option<&FinancePlan> {
        self.finance_plan.as_ref()
    }

    pub fn has_finance_plan(&self) -> bool {
        self.finance_plan.is_some()
    }

    pub fn entered_by(&self) -> UserId {
        self.entered_by
    }

    pub fn entered_at(&self) -> DateTime<Utc> {
        self.entered_at
    }

    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.posted_at
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Called by adapters after a successful versioned write
    pub fn mark_persisted(&mut self) {
        self.version += 1;
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<QuoteEvent> {
        std::mem::take(&mut self.events)
    }

    /// Makes the quote visible to the agency
    pub fn post(&mut self) -> Result<(), QuoteError> {
        let now = self.transition(QuoteStatus::Posted)?;
        self.posted_at = Some(now);
        self.events.push(QuoteEvent::QuotePosted {
            quote_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    /// Records the agency's acceptance
    pub fn approve(&mut self, approved_by: UserId) -> Result<(), QuoteError> {
        let now = self.transition(QuoteStatus::Approved)?;
        self.approved_at = Some(now);
        self.events.push(QuoteEvent::QuoteApproved {
            quote_id: self.id,
            approved_by,
            timestamp: now,
        });
        Ok(())
    }

    pub fn mark_bind_requested(&mut self) -> Result<(), QuoteError> {
        let now = self.transition(QuoteStatus::BindRequested)?;
        self.events.push(QuoteEvent::BindRequested {
            quote_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    pub fn mark_bound(&mut self) -> Result<(), QuoteError> {
        let now = self.transition(QuoteStatus::Bound)?;
        self.events.push(QuoteEvent::QuoteBound {
            quote_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    /// Agency edit of the broker fee; the final amount is recomputed
    ///
    /// # Errors
    ///
    /// - [`QuoteError::FeesLocked`] unless the quote is Posted or Approved
    /// - [`QuoteError::NegativeFee`] for a negative amount
    pub fn update_broker_fee(&mut self, broker_fee: Decimal) -> Result<(), QuoteError> {
        if !self.status.broker_fee_editable() {
            return Err(QuoteError::FeesLocked(self.status.to_string()));
        }
        let revised = self.fees.with_broker_fee(broker_fee)?;
        self.replace_fees(revised);
        Ok(())
    }

    /// Admin revision of any subset of the addends
    pub fn revise_fees(&mut self, revision: &FeeRevision) -> Result<(), QuoteError> {
        if !self.status.fees_editable() {
            return Err(QuoteError::FeesLocked(self.status.to_string()));
        }
        if revision.is_empty() {
            return Ok(());
        }
        let revised = self.fees.revise(revision)?;
        self.replace_fees(revised);
        Ok(())
    }

    fn replace_fees(&mut self, revised: FeeSchedule) {
        let now = Utc::now();
        let previous_final_amount = self.fees.final_amount();
        self.fees = revised;
        self.updated_at = now;
        self.events.push(QuoteEvent::FeesRevised {
            quote_id: self.id,
            previous_final_amount,
            final_amount: self.fees.final_amount(),
            timestamp: now,
        });
    }

    fn transition(&mut self, target: QuoteStatus) -> Result<DateTime<Utc>, QuoteError> {
        if !self.status.can_transition_to(target) {
            return Err(QuoteError::transition(self.status, target));
        }
        let now = Utc::now();
        self.status = target;
        self.updated_at = now;
        Ok(now)
    }
}
