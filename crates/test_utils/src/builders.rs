//! Test Data Builders
//!
//! Builders with sensible defaults so tests only name the fields they
//! care about.

use rust_decimal::Decimal;

use core_kernel::{AgencyId, CarrierId, SubmissionId, Usd, UserId};
use domain_quote::{FeeInputs, FinancePlan, NewQuote, Quote, QuoteCoverage};
use domain_submission::{ApplicationForm, ClientContact, EnterQuote, NewSubmission, Submission};

use crate::fixtures::{ApplicationFixtures, FeeFixtures, IdFixtures, QuoteFixtures};

/// Builds [`NewSubmission`] requests and [`Submission`] aggregates
#[derive(Debug, Clone)]
pub struct SubmissionBuilder {
    agency_id: AgencyId,
    created_by: UserId,
    client_contact: ClientContact,
    application: ApplicationForm,
    draft: bool,
}

impl Default for SubmissionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionBuilder {
    pub fn new() -> Self {
        Self {
            agency_id: IdFixtures::agency_id(),
            created_by: IdFixtures::user_id(),
            client_contact: ApplicationFixtures::contact(),
            application: ApplicationFixtures::minimal_form(),
            draft: false,
        }
    }

    pub fn with_agency(mut self, agency_id: AgencyId) -> Self {
        self.agency_id = agency_id;
        self
    }

    pub fn with_created_by(mut self, user_id: UserId) -> Self {
        self.created_by = user_id;
        self
    }

    pub fn with_contact(mut self, contact: ClientContact) -> Self {
        self.client_contact = contact;
        self
    }

    pub fn with_application(mut self, application: ApplicationForm) -> Self {
        self.application = application;
        self
    }

    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.application.applicant.company_name = name.into();
        self
    }

    /// Broker fee the agency requests on the application
    pub fn with_broker_fee(mut self, fee: Decimal) -> Self {
        self.application.coverage.broker_fee = Some(Usd::new(fee));
        self
    }

    pub fn as_draft(mut self) -> Self {
        self.draft = true;
        self
    }

    pub fn request(self) -> NewSubmission {
        NewSubmission {
            agency_id: self.agency_id,
            created_by: self.created_by,
            client_contact: self.client_contact,
            application: self.application,
            draft: self.draft,
        }
    }

    /// # Panics
    ///
    /// Panics if the configured contact or form is invalid
    pub fn build(self) -> Submission {
        Submission::create(self.request()).expect("builder produced an invalid submission")
    }
}

/// Builds quote inputs for both the aggregate and the service layer
#[derive(Debug, Clone)]
pub struct QuoteBuilder {
    submission_id: SubmissionId,
    carrier_id: CarrierId,
    carrier_quote: Decimal,
    premium_tax_percent: Option<Decimal>,
    policy_fee: Option<Decimal>,
    broker_fee: Option<Decimal>,
    coverage: QuoteCoverage,
    finance_plan: Option<FinancePlan>,
    entered_by: UserId,
}

impl QuoteBuilder {
    /// Reference fees (total 1200) for the given submission and carrier
    pub fn new(submission_id: SubmissionId, carrier_id: CarrierId) -> Self {
        Self {
            submission_id,
            carrier_id,
            carrier_quote: FeeFixtures::carrier_quote(),
            premium_tax_percent: Some(FeeFixtures::tax_percent()),
            policy_fee: Some(FeeFixtures::policy_fee()),
            broker_fee: Some(FeeFixtures::broker_fee()),
            coverage: QuoteFixtures::coverage(),
            finance_plan: None,
            entered_by: IdFixtures::user_id(),
        }
    }

    pub fn with_carrier_quote(mut self, amount: Decimal) -> Self {
        self.carrier_quote = amount;
        self
    }

    pub fn with_tax_percent(mut self, percent: Option<Decimal>) -> Self {
        self.premium_tax_percent = percent;
        self
    }

    pub fn with_policy_fee(mut self, fee: Option<Decimal>) -> Self {
        self.policy_fee = fee;
        self
    }

    /// `None` lets the service fall back to the application's broker fee
    pub fn with_broker_fee(mut self, fee: Option<Decimal>) -> Self {
        self.broker_fee = fee;
        self
    }

    pub fn with_coverage(mut self, coverage: QuoteCoverage) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_finance_plan(mut self) -> Self {
        self.finance_plan = Some(QuoteFixtures::finance_plan());
        self
    }

    pub fn entered_by(mut self, user_id: UserId) -> Self {
        self.entered_by = user_id;
        self
    }

    fn fee_inputs(&self) -> FeeInputs {
        FeeInputs {
            carrier_quote: self.carrier_quote,
            premium_tax_percent: self.premium_tax_percent,
            policy_fee: self.policy_fee,
            broker_fee: self.broker_fee,
        }
    }

    /// Input for `BindWorkflowService::enter_quote`
    pub fn enter_request(self) -> EnterQuote {
        EnterQuote {
            submission_id: self.submission_id,
            carrier_id: self.carrier_id,
            carrier_quote: self.carrier_quote,
            premium_tax_percent: self.premium_tax_percent,
            policy_fee: self.policy_fee,
            broker_fee: self.broker_fee,
            coverage: self.coverage,
            finance_plan: self.finance_plan,
            entered_by: self.entered_by,
        }
    }

    /// # Panics
    ///
    /// Panics if the configured fees are invalid
    pub fn build(self) -> Quote {
        Quote::enter(NewQuote {
            fees: self.fee_inputs(),
            submission_id: self.submission_id,
            carrier_id: self.carrier_id,
            coverage: self.coverage,
            finance_plan: self.finance_plan,
            entered_by: self.entered_by,
        })
        .expect("builder produced an invalid quote")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_quote::QuoteStatus;
    use domain_submission::SubmissionStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_submission_builder_defaults() {
        let submission = SubmissionBuilder::new().with_broker_fee(dec!(75)).build();
        assert_eq!(submission.status(), SubmissionStatus::Submitted);
        assert_eq!(submission.application().broker_fee(), Usd::new(dec!(75)));
    }

    #[test]
    fn test_draft_submission() {
        let submission = SubmissionBuilder::new().as_draft().build();
        assert_eq!(submission.status(), SubmissionStatus::Draft);
    }

    #[test]
    fn test_quote_builder_reference_total() {
        let quote = QuoteBuilder::new(SubmissionId::new(), CarrierId::new()).build();
        assert_eq!(quote.status(), QuoteStatus::Entered);
        assert_eq!(quote.final_amount(), FeeFixtures::final_amount());
    }

    #[test]
    fn test_quote_builder_without_optional_fees() {
        let quote = QuoteBuilder::new(SubmissionId::new(), CarrierId::new())
            .with_tax_percent(None)
            .with_policy_fee(None)
            .with_broker_fee(None)
            .build();
        assert_eq!(quote.final_amount(), Usd::new(dec!(1000)));
    }
}
