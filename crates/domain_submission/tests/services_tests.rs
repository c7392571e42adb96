//! Bind workflow service tests against the in-memory port

use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use core_kernel::{AgencyId, EnvelopeId, PortError, Usd, UserId};
use domain_quote::{Carrier, FinancePlan, Quote, QuoteCoverage, QuoteStatus};

use domain_submission::{
    ApplicantDetails, ApplicationForm, BindWorkflowService, ClientContact, CoverageRequest, DocumentType,
    EnterQuote, MockPaymentProcessor, MockWorkflowPort, NewSubmission, PaymentMethod, PaymentProcessor,
    PaymentReceipt, PaymentRequest, PaymentStatus, Signer, Submission, SubmissionQuery, SubmissionStatus,
    WorkflowError, WorkflowPort, DUPLICATE_QUOTE,
};

/// Counts charges and yields mid-charge so concurrent callers interleave
#[derive(Default)]
struct CountingProcessor {
    charges: AtomicUsize,
    decline: bool,
}

impl CountingProcessor {
    fn declining() -> Self {
        Self {
            decline: true,
            ..Default::default()
        }
    }

    fn charges(&self) -> usize {
        self.charges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentProcessor for CountingProcessor {
    async fn charge(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PortError> {
        self.charges.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.decline {
            return Err(PortError::connection("card declined"));
        }
        MockPaymentProcessor::new().charge(request).await
    }
}

struct Harness {
    service: BindWorkflowService,
    port: MockWorkflowPort,
    carrier: Carrier,
    admin: UserId,
}

impl Harness {
    async fn new() -> Self {
        Self::with_payments(Arc::new(MockPaymentProcessor::new())).await
    }

    async fn with_payments(payments: Arc<dyn PaymentProcessor>) -> Self {
        let carrier = Carrier::new("Sutton Specialty Insurance Company", "quotes@sutton.test", dec!(0)).unwrap();
        let port = MockWorkflowPort::with_carriers(vec![carrier.clone()]).await;
        let service = BindWorkflowService::new(Arc::new(port.clone()), payments);
        Self {
            service,
            port,
            carrier,
            admin: UserId::new(),
        }
    }

    async fn submission(&self) -> Submission {
        self.service
            .create_submission(NewSubmission {
                agency_id: AgencyId::new(),
                created_by: UserId::new(),
                client_contact: ClientContact {
                    name: "Dana Reyes".to_string(),
                    email: "dana@acme.test".to_string(),
                    phone: "555-0100".to_string(),
                    ..Default::default()
                },
                application: ApplicationForm {
                    applicant: ApplicantDetails {
                        company_name: "Acme Builders".to_string(),
                        state: Some("CA".to_string()),
                        ..Default::default()
                    },
                    coverage: CoverageRequest {
                        broker_fee: Some(Usd::new(dec!(50))),
                        ..Default::default()
                    },
                    ..Default::default()
                },
                draft: false,
            })
            .await
            .unwrap()
    }

    fn enter(&self, submission: &Submission, finance_plan: Option<FinancePlan>) -> EnterQuote {
        EnterQuote {
            submission_id: submission.id(),
            carrier_id: self.carrier.id,
            carrier_quote: dec!(1000),
            premium_tax_percent: Some(dec!(5)),
            policy_fee: Some(dec!(100)),
            broker_fee: None,
            coverage: QuoteCoverage::default(),
            finance_plan,
            entered_by: self.admin,
        }
    }

    /// Submission with an approved quote
    async fn approved(&self, finance_plan: Option<FinancePlan>) -> (Submission, Quote) {
        let submission = self.submission().await;
        let quote = self.service.enter_quote(self.enter(&submission, finance_plan)).await.unwrap();
        self.service.post_quote(quote.id()).await.unwrap();
        let quote = self.service.approve_quote(quote.id(), UserId::new()).await.unwrap();
        (submission, quote)
    }

    /// Approved, documents generated and signed
    async fn signed(&self) -> (Submission, Quote) {
        let (submission, quote) = self.approved(None).await;
        self.service.generate_documents(quote.id()).await.unwrap();
        let request = self.service.send_for_signature(submission.id()).await.unwrap();
        self.service
            .mark_signed(submission.id(), request.envelope_id, signer())
            .await
            .unwrap();
        (submission, quote)
    }
}

fn signer() -> Signer {
    Signer {
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        email: "dana@acme.test".to_string(),
    }
}

fn finance_plan() -> FinancePlan {
    FinancePlan {
        provider: "IPFS".to_string(),
        down_payment: Usd::new(dec!(300)),
        installments: 9,
        installment_amount: Usd::new(dec!(100)),
    }
}

// ============================================================================
// Happy Path
// ============================================================================

mod full_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_submission_to_bound_policy() {
        let h = Harness::new().await;
        let (submission, quote) = h.approved(None).await;
        assert_eq!(quote.final_amount(), Usd::new(dec!(1200)));

        let documents = h.service.generate_documents(quote.id()).await.unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents[0].document_url.ends_with("/documents/proposal"));

        let request = h.service.send_for_signature(submission.id()).await.unwrap();
        assert_eq!(request.documents_sent, 2);
        assert!(request.signing_url.contains("envelopeId="));

        let completion = h
            .service
            .mark_signed(submission.id(), request.envelope_id, signer())
            .await
            .unwrap();
        assert_eq!(completion.documents_signed, 2);

        let payment = h
            .service
            .process_payment(submission.id(), dec!(1200), PaymentMethod::Ach)
            .await
            .unwrap();
        assert!(payment.transaction_id.starts_with("MOCK-"));

        let requested = h.service.request_bind(submission.id()).await.unwrap();
        assert_eq!(requested.status(), SubmissionStatus::BindRequested);
        assert_eq!(h.service.bind_requests().await.unwrap().len(), 1);

        let bound = h.service.approve_bind(submission.id()).await.unwrap();
        assert_eq!(bound.status(), SubmissionStatus::Bound);
        assert!(bound.workflow().bind_approved());

        let view = h.service.quote_workflow(quote.id()).await.unwrap();
        assert_eq!(view.quote.status(), QuoteStatus::Bound);
        assert!(view.timeline.iter().all(|step| step.done));

        let policies = h.service.bound_policies(SubmissionQuery::default()).await.unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].1.as_ref().map(Quote::id), Some(quote.id()));
    }

    #[tokio::test]
    async fn test_finance_plan_generates_three_documents() {
        let h = Harness::new().await;
        let (submission, quote) = h.approved(Some(finance_plan())).await;

        let documents = h.service.generate_documents(quote.id()).await.unwrap();
        let types: Vec<DocumentType> = documents.iter().map(|d| d.document_type).collect();
        assert_eq!(
            types,
            vec![DocumentType::Proposal, DocumentType::CarrierForm, DocumentType::FinanceAgreement]
        );

        let view = h.service.quote_workflow(quote.id()).await.unwrap();
        assert_eq!(view.gates.required_documents, 3);
        assert!(view.gates.can_esign);
        assert_eq!(view.submission.id(), submission.id());
    }

    #[tokio::test]
    async fn test_regenerating_documents_keeps_one_per_type() {
        let h = Harness::new().await;
        let (submission, quote) = h.approved(None).await;

        h.service.generate_documents(quote.id()).await.unwrap();
        h.service.generate_documents(quote.id()).await.unwrap();

        let stored = h.port.get_submission(submission.id()).await.unwrap();
        assert_eq!(stored.signed_documents().len(), 2);
    }
}

// ============================================================================
// Gate Enforcement
// ============================================================================

mod gate_enforcement_tests {
    use super::*;

    #[tokio::test]
    async fn test_payment_before_esign_rejected() {
        let h = Harness::new().await;
        let (submission, quote) = h.approved(None).await;
        h.service.generate_documents(quote.id()).await.unwrap();

        let err = h
            .service
            .process_payment(submission.id(), dec!(1200), PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::EsignRequiredForPayment));
        assert_eq!(err.to_string(), "E-Signature must be completed before payment");

        let stored = h.port.get_submission(submission.id()).await.unwrap();
        assert_eq!(stored.workflow().payment_status(), PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_second_payment_rejected() {
        let h = Harness::new().await;
        let (submission, _) = h.signed().await;

        h.service
            .process_payment(submission.id(), dec!(1200), PaymentMethod::Card)
            .await
            .unwrap();
        let err = h
            .service
            .process_payment(submission.id(), dec!(1200), PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyPaid));
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let h = Harness::new().await;
        let (submission, _) = h.signed().await;

        let err = h
            .service
            .process_payment(submission.id(), dec!(0), PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NonPositiveAmount));
    }

    #[tokio::test]
    async fn test_bind_before_payment_rejected() {
        let h = Harness::new().await;
        let (submission, _) = h.signed().await;

        let err = h.service.request_bind(submission.id()).await.unwrap_err();
        assert_eq!(err.to_string(), "Payment must be completed before requesting bind");
    }

    #[tokio::test]
    async fn test_declined_submission_cannot_be_paid() {
        let processor = Arc::new(CountingProcessor::default());
        let h = Harness::with_payments(processor.clone()).await;
        let (submission, _) = h.signed().await;
        h.service.decline_submission(submission.id(), None).await.unwrap();

        let err = h
            .service
            .process_payment(submission.id(), dec!(1200), PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::SubmissionClosed(SubmissionStatus::Declined)));
        assert!(err.is_precondition());
        assert_eq!(processor.charges(), 0);

        let stored = h.port.get_submission(submission.id()).await.unwrap();
        assert!(stored.workflow().payment().is_none());
        assert!(h.service.request_bind(submission.id()).await.is_err());
    }

    #[tokio::test]
    async fn test_declined_submission_rejects_documents_and_signature() {
        let h = Harness::new().await;
        let (submission, quote) = h.approved(None).await;
        h.service.generate_documents(quote.id()).await.unwrap();
        h.service.decline_submission(submission.id(), None).await.unwrap();

        let err = h.service.generate_documents(quote.id()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::SubmissionClosed(_)));
        let err = h.service.send_for_signature(submission.id()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::SubmissionClosed(_)));
        assert!(h.service.update_broker_fee(quote.id(), dec!(150)).await.is_err());
    }

    #[tokio::test]
    async fn test_bound_submission_accepts_no_more_actions() {
        let h = Harness::new().await;
        let (submission, _) = h.signed().await;
        h.service
            .process_payment(submission.id(), dec!(1200), PaymentMethod::Card)
            .await
            .unwrap();
        h.service.request_bind(submission.id()).await.unwrap();
        h.service.approve_bind(submission.id()).await.unwrap();

        let err = h.service.approve_bind(submission.id()).await.unwrap_err();
        assert_eq!(err.to_string(), "Submission is BOUND and can no longer change");
        assert!(h.service.send_for_signature(submission.id()).await.is_err());
    }

    #[tokio::test]
    async fn test_documents_need_approved_quote() {
        let h = Harness::new().await;
        let submission = h.submission().await;
        let quote = h.service.enter_quote(h.enter(&submission, None)).await.unwrap();

        let err = h.service.generate_documents(quote.id()).await.unwrap_err();
        assert!(err.is_precondition());
    }

    #[tokio::test]
    async fn test_signature_with_wrong_envelope_rejected() {
        let h = Harness::new().await;
        let (submission, quote) = h.approved(None).await;
        h.service.generate_documents(quote.id()).await.unwrap();
        h.service.send_for_signature(submission.id()).await.unwrap();

        let err = h
            .service
            .mark_signed(submission.id(), EnvelopeId::new(), signer())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::EnvelopeMismatch(_)));

        let stored = h.port.get_submission(submission.id()).await.unwrap();
        assert!(!stored.workflow().esign_completed());
    }

    #[tokio::test]
    async fn test_signer_fields_required() {
        let h = Harness::new().await;
        let (submission, _) = h.approved(None).await;

        let err = h
            .service
            .mark_signed(
                submission.id(),
                EnvelopeId::new(),
                Signer {
                    first_name: String::new(),
                    ..signer()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Signer information is required (firstName, lastName, email)");
    }
}

// ============================================================================
// Quote Handling
// ============================================================================

mod quote_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_quote_for_carrier_rejected() {
        let h = Harness::new().await;
        let submission = h.submission().await;
        h.service.enter_quote(h.enter(&submission, None)).await.unwrap();

        let err = h.service.enter_quote(h.enter(&submission, None)).await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains(DUPLICATE_QUOTE));
        assert_eq!(h.service.submission_quotes(submission.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quote_for_unknown_carrier_not_found() {
        let h = Harness::new().await;
        let submission = h.submission().await;
        let mut input = h.enter(&submission, None);
        input.carrier_id = core_kernel::CarrierId::new();

        let err = h.service.enter_quote(input).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_broker_fee_update_recomputes_total() {
        let h = Harness::new().await;
        let submission = h.submission().await;
        let quote = h.service.enter_quote(h.enter(&submission, None)).await.unwrap();
        assert_eq!(quote.fees().broker_fee(), Usd::new(dec!(50)));

        h.service.post_quote(quote.id()).await.unwrap();
        let updated = h.service.update_broker_fee(quote.id(), dec!(150)).await.unwrap();
        assert_eq!(updated.final_amount(), Usd::new(dec!(1300)));

        let stored = h.port.get_quote(quote.id()).await.unwrap();
        assert_eq!(stored.final_amount(), Usd::new(dec!(1300)));
    }

    #[tokio::test]
    async fn test_broker_fee_locked_before_posting() {
        let h = Harness::new().await;
        let submission = h.submission().await;
        let quote = h.service.enter_quote(h.enter(&submission, None)).await.unwrap();

        assert!(h.service.update_broker_fee(quote.id(), dec!(150)).await.is_err());
    }

    #[tokio::test]
    async fn test_broker_fee_frozen_after_signature() {
        let h = Harness::new().await;
        let (submission, quote) = h.signed().await;
        h.service
            .process_payment(submission.id(), dec!(1200), PaymentMethod::Card)
            .await
            .unwrap();

        let err = h.service.update_broker_fee(quote.id(), dec!(5000)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::FeesLocked));
        assert!(err.is_precondition());

        let stored = h.port.get_quote(quote.id()).await.unwrap();
        assert_eq!(stored.final_amount(), quote.final_amount());
        let paid = h.port.get_submission(submission.id()).await.unwrap();
        assert_eq!(paid.workflow().payment().map(|p| p.amount), Some(stored.final_amount()));
    }

    #[tokio::test]
    async fn test_broker_fee_frozen_once_sent_for_signature() {
        let h = Harness::new().await;
        let (submission, quote) = h.approved(None).await;
        h.service.generate_documents(quote.id()).await.unwrap();

        let updated = h.service.update_broker_fee(quote.id(), dec!(150)).await.unwrap();
        assert_eq!(updated.final_amount(), Usd::new(dec!(1300)));

        h.service.send_for_signature(submission.id()).await.unwrap();
        let err = h.service.update_broker_fee(quote.id(), dec!(200)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::FeesLocked));
    }

    #[tokio::test]
    async fn test_only_one_quote_approved_per_submission() {
        let h = Harness::new().await;
        let (submission, _) = h.approved(None).await;

        let other = Carrier::new("Second Carrier", "second@carrier.test", dec!(0)).unwrap();
        h.port.insert_carrier(&other).await.unwrap();
        let mut input = h.enter(&submission, None);
        input.carrier_id = other.id;
        let second = h.service.enter_quote(input).await.unwrap();
        h.service.post_quote(second.id()).await.unwrap();

        let err = h.service.approve_quote(second.id(), UserId::new()).await.unwrap_err();
        assert!(err.is_validation());
    }
}

// ============================================================================
// Concurrency
// ============================================================================

mod concurrency_tests {
    use super::*;

    #[tokio::test]
    async fn test_stale_version_conflicts() {
        let h = Harness::new().await;
        let submission = h.submission().await;

        let stale = h.port.get_submission(submission.id()).await.unwrap();
        h.service.route_submission(submission.id()).await.unwrap();

        let err = h.port.save_submission(&stale, None).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(h.port.submission_version(submission.id()).await, Some(stale.version() + 1));
    }

    #[tokio::test]
    async fn test_concurrent_payments_charge_once() {
        let processor = Arc::new(CountingProcessor::default());
        let h = Harness::with_payments(processor.clone()).await;
        let (submission, _) = h.signed().await;

        let (first, second) = tokio::join!(
            h.service.process_payment(submission.id(), dec!(1200), PaymentMethod::Card),
            h.service.process_payment(submission.id(), dec!(1200), PaymentMethod::Card),
        );

        assert_eq!(processor.charges(), 1);
        let (paid, rejected) = match (first, second) {
            (Ok(paid), Err(err)) | (Err(err), Ok(paid)) => (paid, err),
            other => panic!("expected exactly one payment, got {other:?}"),
        };
        assert!(rejected.is_conflict() || rejected.is_precondition());

        let stored = h.port.get_submission(submission.id()).await.unwrap();
        assert_eq!(stored.workflow().payment(), Some(&paid));
    }

    #[tokio::test]
    async fn test_failed_charge_releases_claim() {
        let processor = Arc::new(CountingProcessor::declining());
        let h = Harness::with_payments(processor.clone()).await;
        let (submission, _) = h.signed().await;

        let err = h
            .service
            .process_payment(submission.id(), dec!(1200), PaymentMethod::Card)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Payment processing failed: Connection error: card declined");

        let stored = h.port.get_submission(submission.id()).await.unwrap();
        assert_eq!(stored.workflow().payment_status(), PaymentStatus::Pending);
        assert_eq!(stored.workflow().payment_started_at(), None);

        let err = h
            .service
            .process_payment(submission.id(), dec!(1200), PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Payment(_)));
        assert_eq!(processor.charges(), 2);
    }

    #[tokio::test]
    async fn test_declined_submission_is_terminal() {
        let h = Harness::new().await;
        let submission = h.submission().await;

        let declined = h
            .service
            .decline_submission(submission.id(), Some("Outside appetite".to_string()))
            .await
            .unwrap();
        assert_eq!(declined.decline_reason(), Some("Outside appetite"));
        assert!(h.service.route_submission(submission.id()).await.is_err());
    }
}
