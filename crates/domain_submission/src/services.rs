//! Bind workflow services
//!
//! [`BindWorkflowService`] runs every action of the submission-to-bind flow:
//! submission and quote lifecycle, document generation, e-signature, payment
//! and bind. Each action loads the aggregates, checks the workflow gate,
//! applies the transition and saves with a version check. A lost race
//! surfaces as a conflict instead of applying the action twice.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use core_kernel::{CarrierId, EnvelopeId, OperationMetadata, QuoteId, SubmissionId, Usd, UserId};
use domain_quote::{FeeInputs, FeeRevision, FinancePlan, NewQuote, Quote, QuoteCoverage};

use crate::documents::{DocumentType, SignedDocument, Signer};
use crate::error::WorkflowError;
use crate::events::SubmissionEvent;
use crate::payment::{PaymentProcessor, PaymentRequest};
use crate::ports::{QuoteQuery, SubmissionQuery, WorkflowPort};
use crate::stage::{PaymentMethod, PaymentRecord};
use crate::submission::{NewSubmission, Submission};
use crate::workflow::{evaluate_gates, timeline, TimelineStep, WorkflowAction, WorkflowGates, WorkflowSnapshot};

/// Addresses the service embeds in documents and envelopes
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Base URL of the signer portal
    pub signing_base_url: String,
    /// Path prefix under which quote documents are downloaded
    pub documents_base_path: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            signing_base_url: "http://localhost:8080/esign".to_string(),
            documents_base_path: "/api/v1/agency/quotes".to_string(),
        }
    }
}

/// Admin input for a new quote
#[derive(Debug, Clone)]
pub struct EnterQuote {
    pub submission_id: SubmissionId,
    pub carrier_id: CarrierId,
    pub carrier_quote: Decimal,
    pub premium_tax_percent: Option<Decimal>,
    pub policy_fee: Option<Decimal>,
    /// Defaults to the broker fee on the application
    pub broker_fee: Option<Decimal>,
    pub coverage: QuoteCoverage,
    pub finance_plan: Option<FinancePlan>,
    pub entered_by: UserId,
}

/// A quote with its submission and the gates computed from both
#[derive(Debug, Clone)]
pub struct QuoteWorkflowView {
    pub quote: Quote,
    pub submission: Submission,
    pub gates: WorkflowGates,
    pub timeline: Vec<TimelineStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    pub envelope_id: EnvelopeId,
    pub signing_url: String,
    pub documents_sent: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCompletion {
    pub signed_at: DateTime<Utc>,
    pub documents_signed: usize,
}

/// Orchestrates the bind workflow over a [`WorkflowPort`]
#[derive(Clone)]
pub struct BindWorkflowService {
    port: Arc<dyn WorkflowPort>,
    payments: Arc<dyn PaymentProcessor>,
    settings: WorkflowSettings,
}

impl BindWorkflowService {
    pub fn new(port: Arc<dyn WorkflowPort>, payments: Arc<dyn PaymentProcessor>) -> Self {
        Self {
            port,
            payments,
            settings: WorkflowSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: WorkflowSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn port(&self) -> &Arc<dyn WorkflowPort> {
        &self.port
    }

    // ========================================================================
    // Submission lifecycle
    // ========================================================================

    pub async fn create_submission(&self, new: NewSubmission) -> Result<Submission, WorkflowError> {
        let principal = new.created_by.to_string();
        let mut submission = Submission::create(new)?;
        self.port
            .insert_submission(&submission, Some(OperationMetadata::initiated_by(principal)))
            .await?;

        info!(submission_id = %submission.id(), agency_id = %submission.agency_id(), "Submission created");
        log_events(submission.take_events());
        Ok(submission)
    }

    pub async fn route_submission(&self, id: SubmissionId) -> Result<Submission, WorkflowError> {
        let mut submission = self.port.get_submission(id).await?;
        submission.route()?;
        self.save_submission(&mut submission).await?;

        info!(submission_id = %id, "Submission routed");
        Ok(submission)
    }

    pub async fn decline_submission(&self, id: SubmissionId, reason: Option<String>) -> Result<Submission, WorkflowError> {
        let mut submission = self.port.get_submission(id).await?;
        submission.decline(reason)?;
        self.save_submission(&mut submission).await?;

        info!(submission_id = %id, "Submission declined");
        Ok(submission)
    }

    // ========================================================================
    // Quote lifecycle
    // ========================================================================

    /// Enters a carrier quote and moves the submission to Quoted
    pub async fn enter_quote(&self, input: EnterQuote) -> Result<Quote, WorkflowError> {
        let mut submission = self.port.get_submission(input.submission_id).await?;
        // carrier must exist
        self.port.get_carrier(input.carrier_id).await?;

        let broker_fee = input
            .broker_fee
            .unwrap_or_else(|| submission.application().broker_fee().amount());
        let mut fees = FeeInputs::new(input.carrier_quote).broker_fee(broker_fee);
        if let Some(percent) = input.premium_tax_percent {
            fees = fees.tax_percent(percent);
        }
        if let Some(policy_fee) = input.policy_fee {
            fees = fees.policy_fee(policy_fee);
        }

        let mut quote = Quote::enter(NewQuote {
            submission_id: input.submission_id,
            carrier_id: input.carrier_id,
            fees,
            coverage: input.coverage,
            finance_plan: input.finance_plan,
            entered_by: input.entered_by,
        })?;
        submission.mark_quoted()?;

        self.port
            .insert_quote_with_submission(
                &quote,
                &submission,
                Some(OperationMetadata::initiated_by(input.entered_by.to_string())),
            )
            .await?;
        submission.mark_persisted();

        info!(
            quote_id = %quote.id(),
            submission_id = %submission.id(),
            final_amount = %quote.final_amount(),
            "Quote entered"
        );
        log_quote_events(&mut quote);
        log_events(submission.take_events());
        Ok(quote)
    }

    pub async fn post_quote(&self, id: QuoteId) -> Result<Quote, WorkflowError> {
        let mut quote = self.port.get_quote(id).await?;
        quote.post()?;
        self.save_quote(&mut quote).await?;

        info!(quote_id = %id, "Quote posted");
        Ok(quote)
    }

    pub async fn approve_quote(&self, id: QuoteId, approved_by: UserId) -> Result<Quote, WorkflowError> {
        let mut quote = self.port.get_quote(id).await?;
        self.port.get_submission(quote.submission_id()).await?.ensure_open()?;
        if let Some(active) = self.port.find_active_quote(quote.submission_id()).await? {
            if active.id() != id {
                return Err(WorkflowError::validation(
                    "Another quote has already been approved for this submission",
                ));
            }
        }
        quote.approve(approved_by)?;
        self.save_quote(&mut quote).await?;

        info!(quote_id = %id, approved_by = %approved_by, "Quote approved");
        Ok(quote)
    }

    /// Agency broker fee edit; the stored total is always the recomputed one
    ///
    /// Rejected once the documents have been sent for signature.
    pub async fn update_broker_fee(&self, id: QuoteId, broker_fee: Decimal) -> Result<Quote, WorkflowError> {
        let mut quote = self.port.get_quote(id).await?;
        self.port
            .get_submission(quote.submission_id())
            .await?
            .ensure_fees_editable()
            .inspect_err(|err| warn!(quote_id = %id, error = %err, "Broker fee update rejected"))?;
        quote.update_broker_fee(broker_fee)?;
        self.save_quote(&mut quote).await?;

        info!(
            quote_id = %id,
            broker_fee = %quote.fees().broker_fee(),
            final_amount = %quote.final_amount(),
            "Broker fee updated"
        );
        Ok(quote)
    }

    /// Admin revision of any fee addend
    pub async fn revise_quote_fees(&self, id: QuoteId, revision: FeeRevision) -> Result<Quote, WorkflowError> {
        let mut quote = self.port.get_quote(id).await?;
        self.port
            .get_submission(quote.submission_id())
            .await?
            .ensure_fees_editable()?;
        quote.revise_fees(&revision)?;
        self.save_quote(&mut quote).await?;

        info!(quote_id = %id, final_amount = %quote.final_amount(), "Quote fees revised");
        Ok(quote)
    }

    pub async fn quote_workflow(&self, id: QuoteId) -> Result<QuoteWorkflowView, WorkflowError> {
        let quote = self.port.get_quote(id).await?;
        let submission = self.port.get_submission(quote.submission_id()).await?;
        let snapshot = WorkflowSnapshot::of(&submission, &quote);

        Ok(QuoteWorkflowView {
            gates: evaluate_gates(&snapshot),
            timeline: timeline(&snapshot),
            quote,
            submission,
        })
    }

    pub async fn submission_quotes(&self, id: SubmissionId) -> Result<Vec<Quote>, WorkflowError> {
        Ok(self.port.find_quotes(QuoteQuery::for_submission(id)).await?)
    }

    pub async fn bind_requests(&self) -> Result<Vec<Submission>, WorkflowError> {
        Ok(self.port.find_submissions(SubmissionQuery::bind_requests()).await?)
    }

    // ========================================================================
    // Documents and e-signature
    // ========================================================================

    /// Creates or replaces every document the quote requires
    pub async fn generate_documents(&self, quote_id: QuoteId) -> Result<Vec<SignedDocument>, WorkflowError> {
        let quote = self.port.get_quote(quote_id).await?;
        let mut submission = self.port.get_submission(quote.submission_id()).await?;

        submission
            .ensure_open()
            .and_then(|_| WorkflowSnapshot::of(&submission, &quote).check(WorkflowAction::GenerateDocuments))
            .inspect_err(|err| warn!(quote_id = %quote_id, error = %err, "Document generation rejected"))?;

        let now = Utc::now();
        let documents: Vec<SignedDocument> = DocumentType::required(quote.has_finance_plan())
            .into_iter()
            .map(|document_type| {
                let url = format!(
                    "{}/{}/documents/{}",
                    self.settings.documents_base_path.trim_end_matches('/'),
                    quote.id().as_uuid(),
                    document_type.slug()
                );
                SignedDocument::generated(document_type, submission.id(), url, now)
            })
            .collect();

        submission.replace_documents(documents.clone())?;
        self.save_submission(&mut submission).await?;

        info!(
            quote_id = %quote_id,
            submission_id = %submission.id(),
            documents = documents.len(),
            "Documents generated"
        );
        Ok(documents)
    }

    pub async fn send_for_signature(&self, id: SubmissionId) -> Result<SignatureRequest, WorkflowError> {
        let mut submission = self.port.get_submission(id).await?;
        submission.ensure_open()?;
        let quote = self.active_quote(id).await?;

        WorkflowSnapshot::of(&submission, &quote)
            .check(WorkflowAction::Esign)
            .inspect_err(|err| warn!(submission_id = %id, error = %err, "Send for signature rejected"))?;

        let envelope_id = EnvelopeId::new();
        let documents_sent = submission.send_for_signature(envelope_id)?;
        self.save_submission(&mut submission).await?;

        let signing_url = format!(
            "{}?envelopeId={}&submissionId={}",
            self.settings.signing_base_url,
            envelope_id.as_uuid(),
            id.as_uuid()
        );
        info!(submission_id = %id, envelope_id = %envelope_id, documents_sent, "Documents sent for signature");
        Ok(SignatureRequest {
            envelope_id,
            signing_url,
            documents_sent,
        })
    }

    /// Records the signer completing the envelope
    pub async fn mark_signed(
        &self,
        id: SubmissionId,
        envelope_id: EnvelopeId,
        signer: Signer,
    ) -> Result<SignatureCompletion, WorkflowError> {
        signer
            .validate()
            .map_err(|_| WorkflowError::validation("Signer information is required (firstName, lastName, email)"))?;

        let mut submission = self.port.get_submission(id).await?;
        let documents_signed = submission
            .mark_signed(envelope_id, &signer)
            .inspect_err(|err| warn!(submission_id = %id, error = %err, "Signature rejected"))?;
        self.save_submission(&mut submission).await?;

        let signed_at = submission.workflow().esign_completed_at().unwrap_or_else(Utc::now);
        info!(submission_id = %id, signer = %signer.email, documents_signed, "E-signature completed");
        Ok(SignatureCompletion {
            signed_at,
            documents_signed,
        })
    }

    // ========================================================================
    // Payment and bind
    // ========================================================================

    /// Charges the client and marks the submission paid
    ///
    /// The payment is claimed with a versioned save before the processor is
    /// called, so of two concurrent calls at most one charges. A failed
    /// charge releases the claim.
    pub async fn process_payment(
        &self,
        id: SubmissionId,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<PaymentRecord, WorkflowError> {
        if amount <= Decimal::ZERO {
            return Err(WorkflowError::NonPositiveAmount);
        }
        let amount = Usd::new(amount);

        let mut submission = self.port.get_submission(id).await?;
        submission
            .ensure_open()
            .inspect_err(|err| warn!(submission_id = %id, error = %err, "Payment rejected"))?;
        if !submission.workflow().esign_completed() {
            warn!(submission_id = %id, "Payment rejected: e-signature incomplete");
            return Err(WorkflowError::EsignRequiredForPayment);
        }
        let quote = self.active_quote(id).await?;
        WorkflowSnapshot::of(&submission, &quote)
            .check(WorkflowAction::Pay)
            .inspect_err(|err| warn!(submission_id = %id, error = %err, "Payment rejected"))?;

        if amount != quote.final_amount() {
            warn!(
                submission_id = %id,
                amount = %amount,
                final_amount = %quote.final_amount(),
                "Payment amount differs from the quote total"
            );
        }

        submission
            .begin_payment()
            .inspect_err(|err| warn!(submission_id = %id, error = %err, "Payment rejected"))?;
        self.save_submission(&mut submission)
            .await
            .inspect_err(|err| warn!(submission_id = %id, error = %err, "Payment claim lost"))?;

        let charged = self
            .payments
            .charge(&PaymentRequest {
                submission_id: id,
                amount,
                method,
            })
            .await;
        let receipt = match charged {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(submission_id = %id, error = %err, "Payment failed");
                submission.release_payment();
                if let Err(release) = self.save_submission(&mut submission).await {
                    warn!(submission_id = %id, error = %release, "Payment claim not released");
                }
                return Err(WorkflowError::Payment(err.to_string()));
            }
        };

        let payment = PaymentRecord {
            amount,
            method,
            transaction_id: receipt.transaction_id,
            paid_at: receipt.paid_at,
        };
        submission.record_payment(payment.clone())?;
        self.save_submission(&mut submission).await?;

        info!(
            submission_id = %id,
            amount = %payment.amount,
            transaction_id = %payment.transaction_id,
            "Payment completed"
        );
        Ok(payment)
    }

    pub async fn request_bind(&self, id: SubmissionId) -> Result<Submission, WorkflowError> {
        let mut submission = self.port.get_submission(id).await?;
        submission.ensure_open()?;
        let mut quote = self.active_quote(id).await?;

        WorkflowSnapshot::of(&submission, &quote)
            .check(WorkflowAction::Bind)
            .inspect_err(|err| warn!(submission_id = %id, error = %err, "Bind request rejected"))?;

        submission.request_bind()?;
        quote.mark_bind_requested()?;
        self.save_both(&mut submission, &mut quote).await?;

        info!(submission_id = %id, quote_id = %quote.id(), "Bind requested");
        Ok(submission)
    }

    /// Admin approval of a pending bind request
    pub async fn approve_bind(&self, id: SubmissionId) -> Result<Submission, WorkflowError> {
        let mut submission = self.port.get_submission(id).await?;
        submission.ensure_open()?;
        let mut quote = self.active_quote(id).await?;

        submission
            .approve_bind()
            .inspect_err(|err| warn!(submission_id = %id, error = %err, "Bind approval rejected"))?;
        quote.mark_bound()?;
        self.save_both(&mut submission, &mut quote).await?;

        info!(submission_id = %id, quote_id = %quote.id(), "Bind approved");
        Ok(submission)
    }

    /// Bound submissions with the quote they were bound on
    pub async fn bound_policies(
        &self,
        query: SubmissionQuery,
    ) -> Result<Vec<(Submission, Option<Quote>)>, WorkflowError> {
        let submissions = self
            .port
            .find_submissions(query.with_status(crate::submission::SubmissionStatus::Bound))
            .await?;
        let mut policies = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let quote = self.port.find_active_quote(submission.id()).await?;
            policies.push((submission, quote));
        }
        Ok(policies)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn active_quote(&self, id: SubmissionId) -> Result<Quote, WorkflowError> {
        self.port
            .find_active_quote(id)
            .await?
            .ok_or(WorkflowError::QuoteNotApproved)
    }

    async fn save_submission(&self, submission: &mut Submission) -> Result<(), WorkflowError> {
        self.port.save_submission(submission, None).await?;
        submission.mark_persisted();
        log_events(submission.take_events());
        Ok(())
    }

    async fn save_quote(&self, quote: &mut Quote) -> Result<(), WorkflowError> {
        self.port.save_quote(quote, None).await?;
        quote.mark_persisted();
        log_quote_events(quote);
        Ok(())
    }

    async fn save_both(&self, submission: &mut Submission, quote: &mut Quote) -> Result<(), WorkflowError> {
        self.port.save_submission_and_quote(submission, quote, None).await?;
        submission.mark_persisted();
        quote.mark_persisted();
        log_events(submission.take_events());
        log_quote_events(quote);
        Ok(())
    }
}

fn log_events(events: Vec<SubmissionEvent>) {
    for event in events {
        debug!(
            submission_id = %event.submission_id(),
            event_type = event.event_type(),
            "Submission event"
        );
    }
}

fn log_quote_events(quote: &mut Quote) {
    for event in quote.take_events() {
        debug!(quote_id = %event.quote_id(), event_type = event.event_type(), "Quote event");
    }
}
