//! Workflow scenarios
//!
//! Drives a [`BindWorkflowService`] to a given point of the bind workflow
//! so tests can start from "approved", "signed" or "paid" directly. Works
//! over any [`WorkflowPort`], in-memory or Postgres.

use std::sync::Arc;

use core_kernel::{QuoteId, UserId};
use domain_quote::{Carrier, Quote};
use domain_submission::{
    BindWorkflowService, MockPaymentProcessor, MockWorkflowPort, PaymentMethod, Submission, WorkflowError,
    WorkflowPort,
};

use crate::builders::{QuoteBuilder, SubmissionBuilder};
use crate::fixtures::{ApplicationFixtures, CarrierFixtures};

pub struct WorkflowScenario {
    pub service: BindWorkflowService,
    pub port: Arc<dyn WorkflowPort>,
    pub carrier: Carrier,
    pub admin: UserId,
}

impl WorkflowScenario {
    /// Registers the fixture carrier on `port`
    pub async fn over(port: Arc<dyn WorkflowPort>) -> Result<Self, WorkflowError> {
        let carrier = CarrierFixtures::sutton();
        port.insert_carrier(&carrier).await?;
        Ok(Self {
            service: BindWorkflowService::new(port.clone(), Arc::new(MockPaymentProcessor::new())),
            port,
            carrier,
            admin: UserId::new(),
        })
    }

    /// Scenario over a fresh [`MockWorkflowPort`]
    pub async fn in_memory() -> Self {
        let carrier = CarrierFixtures::sutton();
        let port: Arc<dyn WorkflowPort> = Arc::new(MockWorkflowPort::with_carriers(vec![carrier.clone()]).await);
        Self {
            service: BindWorkflowService::new(port.clone(), Arc::new(MockPaymentProcessor::new())),
            port,
            carrier,
            admin: UserId::new(),
        }
    }

    pub async fn submission(&self) -> Result<Submission, WorkflowError> {
        self.service.create_submission(SubmissionBuilder::new().request()).await
    }

    pub fn quote_for(&self, submission: &Submission) -> QuoteBuilder {
        QuoteBuilder::new(submission.id(), self.carrier.id).entered_by(self.admin)
    }

    /// Entered, posted and approved
    pub async fn approve(&self, quote: QuoteBuilder) -> Result<Quote, WorkflowError> {
        let quote = self.service.enter_quote(quote.enter_request()).await?;
        self.service.post_quote(quote.id()).await?;
        self.service.approve_quote(quote.id(), self.admin).await
    }

    /// A submission with an approved reference quote
    pub async fn approved(&self) -> Result<(Submission, Quote), WorkflowError> {
        let submission = self.submission().await?;
        let quote = self.approve(self.quote_for(&submission)).await?;
        Ok((self.port.get_submission(submission.id()).await?, quote))
    }

    /// Approved, documents generated and the envelope signed
    pub async fn signed(&self) -> Result<(Submission, Quote), WorkflowError> {
        let (submission, quote) = self.approved().await?;
        self.service.generate_documents(quote.id()).await?;
        let request = self.service.send_for_signature(submission.id()).await?;
        self.service
            .mark_signed(submission.id(), request.envelope_id, ApplicationFixtures::signer())
            .await?;
        Ok((self.port.get_submission(submission.id()).await?, quote))
    }

    /// Signed and paid in full by card
    pub async fn paid(&self) -> Result<(Submission, Quote), WorkflowError> {
        let (submission, quote) = self.signed().await?;
        self.service
            .process_payment(submission.id(), quote.final_amount().amount(), PaymentMethod::Card)
            .await?;
        Ok((self.port.get_submission(submission.id()).await?, quote))
    }

    /// Paid with bind requested
    pub async fn bind_requested(&self) -> Result<(Submission, Quote), WorkflowError> {
        let (submission, _) = self.paid().await?;
        let submission = self.service.request_bind(submission.id()).await?;
        let quote = self.port.get_quote(self.active_quote_id(&submission).await?).await?;
        Ok((submission, quote))
    }

    async fn active_quote_id(&self, submission: &Submission) -> Result<QuoteId, WorkflowError> {
        self.port
            .find_active_quote(submission.id())
            .await?
            .map(|q| q.id())
            .ok_or_else(|| WorkflowError::validation("no approved quote"))
    }
}
