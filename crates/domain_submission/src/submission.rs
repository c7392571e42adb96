//! Submission Aggregate Root
//!
//! A submission is one client's application, created by an agency user. It
//! owns the generated documents and the [`BindStage`] that tracks signature,
//! payment and bind.
//!
//! # Status lifecycle
//!
//! ```text
//! Draft -> Submitted -> Routed -> Quoted -> BindRequested -> Bound
//!              └─────────────────────┘
//! any non-terminal status -> Declined
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AgencyId, EnvelopeId, SubmissionId, UserId};

use crate::application::ApplicationForm;
use crate::documents::{DocumentType, SignatureStatus, SignedDocument, Signer};
use crate::error::WorkflowError;
use crate::events::SubmissionEvent;
use crate::stage::{BindStage, PaymentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    /// Sent to one or more carriers
    Routed,
    Quoted,
    BindRequested,
    Bound,
    Declined,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "DRAFT",
            SubmissionStatus::Submitted => "SUBMITTED",
            SubmissionStatus::Routed => "ROUTED",
            SubmissionStatus::Quoted => "QUOTED",
            SubmissionStatus::BindRequested => "BIND_REQUESTED",
            SubmissionStatus::Bound => "BOUND",
            SubmissionStatus::Declined => "DECLINED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Bound | SubmissionStatus::Declined)
    }

    /// Forward-only transitions; Declined from anywhere not terminal
    pub fn can_transition_to(&self, target: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        if target == Declined {
            return !self.is_terminal();
        }
        matches!(
            (self, target),
            (Draft, Submitted) |
            (Submitted, Routed) |
            (Submitted, Quoted) |
            (Routed, Quoted) |
            (Quoted, BindRequested) |
            (BindRequested, Bound)
        )
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(SubmissionStatus::Draft),
            "SUBMITTED" => Ok(SubmissionStatus::Submitted),
            "ROUTED" => Ok(SubmissionStatus::Routed),
            "QUOTED" => Ok(SubmissionStatus::Quoted),
            "BIND_REQUESTED" => Ok(SubmissionStatus::BindRequested),
            "BOUND" => Ok(SubmissionStatus::Bound),
            "DECLINED" => Ok(SubmissionStatus::Declined),
            other => Err(WorkflowError::validation(format!("Unknown submission status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// The insured's primary contact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "EIN", default)]
    pub ein: Option<String>,
    #[serde(default)]
    pub business_address: BusinessAddress,
}

/// Everything needed to open a submission
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub agency_id: AgencyId,
    pub created_by: UserId,
    pub client_contact: ClientContact,
    pub application: ApplicationForm,
    /// Keep as a draft instead of submitting immediately
    pub draft: bool,
}

/// Stored state of a submission, used by adapters to rebuild the aggregate
#[derive(Debug, Clone)]
pub struct SubmissionParts {
    pub id: SubmissionId,
    pub agency_id: AgencyId,
    pub created_by: UserId,
    pub client_contact: ClientContact,
    pub application: ApplicationForm,
    pub status: SubmissionStatus,
    pub signed_documents: Vec<SignedDocument>,
    pub workflow: BindStage,
    pub decline_reason: Option<String>,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The Submission aggregate root
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    id: SubmissionId,
    agency_id: AgencyId,
    created_by: UserId,
    client_contact: ClientContact,
    application: ApplicationForm,
    status: SubmissionStatus,
    signed_documents: Vec<SignedDocument>,
    workflow: BindStage,
    decline_reason: Option<String>,
    #[serde(skip)]
    events: Vec<SubmissionEvent>,
    /// Version for optimistic concurrency
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Submission {
    /// Opens a new submission after validating the contact and the form
    pub fn create(new: NewSubmission) -> Result<Self, WorkflowError> {
        let contact = &new.client_contact;
        if contact.name.trim().is_empty() {
            return Err(WorkflowError::validation("clientContact.name is required"));
        }
        if !contact.email.contains('@') {
            return Err(WorkflowError::validation("clientContact.email must be a valid email"));
        }
        new.application.check()?;

        let now = Utc::now();
        let id = SubmissionId::new();
        let status = if new.draft {
            SubmissionStatus::Draft
        } else {
            SubmissionStatus::Submitted
        };

        Ok(Self {
            id,
            agency_id: new.agency_id,
            created_by: new.created_by,
            client_contact: new.client_contact,
            application: new.application,
            status,
            signed_documents: Vec::new(),
            workflow: BindStage::Preparing,
            decline_reason: None,
            events: vec![SubmissionEvent::SubmissionCreated {
                submission_id: id,
                agency_id: new.agency_id,
                timestamp: now,
            }],
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn restore(parts: SubmissionParts) -> Self {
        Self {
            id: parts.id,
            agency_id: parts.agency_id,
            created_by: parts.created_by,
            client_contact: parts.client_contact,
            application: parts.application,
            status: parts.status,
            signed_documents: parts.signed_documents,
            workflow: parts.workflow,
            decline_reason: parts.decline_reason,
            events: Vec::new(),
            version: parts.version,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn agency_id(&self) -> AgencyId {
        self.agency_id
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn client_contact(&self) -> &ClientContact {
        &self.client_contact
    }

    pub fn application(&self) -> &ApplicationForm {
        &self.application
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn signed_documents(&self) -> &[SignedDocument] {
        &self.signed_documents
    }

    pub fn document(&self, document_type: DocumentType) -> Option<&SignedDocument> {
        self.signed_documents.iter().find(|d| d.document_type == document_type)
    }

    /// Number of distinct documents generated and not failed
    pub fn documents_generated(&self) -> usize {
        self.signed_documents
            .iter()
            .filter(|d| d.signature_status != SignatureStatus::Failed)
            .count()
    }

    pub fn workflow(&self) -> &BindStage {
        &self.workflow
    }

    pub fn decline_reason(&self) -> Option<&str> {
        self.decline_reason.as_deref()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Called by adapters after a successful versioned write
    pub fn mark_persisted(&mut self) {
        self.version += 1;
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<SubmissionEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Status lifecycle
    // ------------------------------------------------------------------

    pub fn submit(&mut self) -> Result<(), WorkflowError> {
        self.transition(SubmissionStatus::Submitted)
    }

    pub fn route(&mut self) -> Result<(), WorkflowError> {
        self.transition(SubmissionStatus::Routed)
    }

    /// Records that a quote was entered; repeat quotes leave the status alone
    pub fn mark_quoted(&mut self) -> Result<(), WorkflowError> {
        if self.status == SubmissionStatus::Quoted {
            return Ok(());
        }
        self.transition(SubmissionStatus::Quoted)
    }

    pub fn decline(&mut self, reason: Option<String>) -> Result<(), WorkflowError> {
        if self.workflow.payment_in_flight(Utc::now()) {
            return Err(WorkflowError::PaymentInProgress);
        }
        self.transition(SubmissionStatus::Declined)?;
        self.decline_reason = reason.clone();
        self.events.push(SubmissionEvent::Declined {
            submission_id: self.id,
            reason,
            timestamp: self.updated_at,
        });
        Ok(())
    }

    /// Rejects workflow actions once the submission is declined or bound
    pub fn ensure_open(&self) -> Result<(), WorkflowError> {
        if self.status.is_terminal() {
            return Err(WorkflowError::SubmissionClosed(self.status));
        }
        Ok(())
    }

    /// Fees freeze once the documents leave for signature
    pub fn ensure_fees_editable(&self) -> Result<(), WorkflowError> {
        self.ensure_open()?;
        match self.workflow {
            BindStage::Preparing => Ok(()),
            _ => Err(WorkflowError::FeesLocked),
        }
    }

    // ------------------------------------------------------------------
    // Documents and e-signature
    // ------------------------------------------------------------------

    /// Creates or replaces the given documents and resets any pending envelope
    pub fn replace_documents(&mut self, documents: Vec<SignedDocument>) -> Result<(), WorkflowError> {
        self.ensure_open()?;
        let stage = self.workflow.reset_for_documents()?;
        let now = Utc::now();
        let document_types: Vec<DocumentType> = documents.iter().map(|d| d.document_type).collect();

        self.signed_documents.retain(|d| !document_types.contains(&d.document_type));
        for doc in self.signed_documents.iter_mut() {
            doc.signature_status = SignatureStatus::Generated;
            doc.sent_for_signature_at = None;
        }
        self.signed_documents.extend(documents);
        self.signed_documents.sort_by_key(|d| d.document_type as u8);

        self.workflow = stage;
        self.updated_at = now;
        self.events.push(SubmissionEvent::DocumentsGenerated {
            submission_id: self.id,
            document_types,
            timestamp: now,
        });
        Ok(())
    }

    /// Issues an envelope and marks every document sent; returns the count
    pub fn send_for_signature(&mut self, envelope_id: EnvelopeId) -> Result<usize, WorkflowError> {
        self.ensure_open()?;
        if self.signed_documents.is_empty() {
            return Err(WorkflowError::NoDocuments);
        }
        let now = Utc::now();
        let stage = self.workflow.send_for_signature(envelope_id, now)?;

        for doc in self.signed_documents.iter_mut() {
            doc.mark_sent(now);
        }
        self.workflow = stage;
        self.updated_at = now;
        let documents = self.signed_documents.len();
        self.events.push(SubmissionEvent::SentForSignature {
            submission_id: self.id,
            envelope_id,
            documents,
            timestamp: now,
        });
        Ok(documents)
    }

    /// Marks every document signed by `signer` and completes the e-signature
    pub fn mark_signed(&mut self, envelope_id: EnvelopeId, signer: &Signer) -> Result<usize, WorkflowError> {
        self.ensure_open()?;
        if self.signed_documents.is_empty() {
            return Err(WorkflowError::NoDocuments);
        }
        let now = Utc::now();
        let stage = self.workflow.complete_signature(envelope_id, now)?;

        for doc in self.signed_documents.iter_mut() {
            doc.mark_signed(signer, now);
        }
        self.workflow = stage;
        self.updated_at = now;
        self.events.push(SubmissionEvent::SignatureCompleted {
            submission_id: self.id,
            signer_email: signer.email.clone(),
            timestamp: now,
        });
        Ok(self.signed_documents.len())
    }

    // ------------------------------------------------------------------
    // Payment and bind
    // ------------------------------------------------------------------

    /// Marks a charge as in flight; saved before the processor is called
    pub fn begin_payment(&mut self) -> Result<DateTime<Utc>, WorkflowError> {
        self.ensure_open()?;
        let now = Utc::now();
        self.workflow = self.workflow.begin_payment(now)?;
        self.updated_at = now;
        Ok(now)
    }

    pub fn release_payment(&mut self) {
        self.workflow = self.workflow.release_payment();
        self.updated_at = Utc::now();
    }

    pub fn record_payment(&mut self, payment: PaymentRecord) -> Result<(), WorkflowError> {
        self.ensure_open()?;
        let stage = self.workflow.record_payment(payment.clone())?;
        self.workflow = stage;
        self.updated_at = payment.paid_at;
        self.events.push(SubmissionEvent::PaymentRecorded {
            submission_id: self.id,
            amount: payment.amount,
            transaction_id: payment.transaction_id,
            timestamp: payment.paid_at,
        });
        Ok(())
    }

    pub fn request_bind(&mut self) -> Result<(), WorkflowError> {
        self.ensure_open()?;
        let now = Utc::now();
        let stage = self.workflow.request_bind(now)?;
        self.transition(SubmissionStatus::BindRequested)?;
        self.workflow = stage;
        self.events.push(SubmissionEvent::BindRequested {
            submission_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    pub fn approve_bind(&mut self) -> Result<(), WorkflowError> {
        self.ensure_open()?;
        let now = Utc::now();
        let stage = self.workflow.approve_bind(now)?;
        self.transition(SubmissionStatus::Bound)?;
        self.workflow = stage;
        self.events.push(SubmissionEvent::BindApproved {
            submission_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    fn transition(&mut self, target: SubmissionStatus) -> Result<(), WorkflowError> {
        if !self.status.can_transition_to(target) {
            return Err(WorkflowError::transition(self.status, target));
        }
        let now = Utc::now();
        let from = self.status;
        self.status = target;
        self.updated_at = now;
        self.events.push(SubmissionEvent::StatusChanged {
            submission_id: self.id,
            from,
            to: target,
            timestamp: now,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicantDetails;

    fn new_submission(draft: bool) -> Submission {
        Submission::create(NewSubmission {
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
                    ..Default::default()
                },
                ..Default::default()
            },
            draft,
        })
        .unwrap()
    }

    #[test]
    fn test_create_submitted_or_draft() {
        assert_eq!(new_submission(false).status(), SubmissionStatus::Submitted);
        let mut draft = new_submission(true);
        assert_eq!(draft.status(), SubmissionStatus::Draft);
        draft.submit().unwrap();
        assert_eq!(draft.status(), SubmissionStatus::Submitted);
    }

    #[test]
    fn test_status_is_forward_only() {
        let mut submission = new_submission(false);
        submission.route().unwrap();
        submission.mark_quoted().unwrap();
        submission.mark_quoted().unwrap();
        assert!(submission.route().is_err());
        assert!(submission.submit().is_err());
    }

    #[test]
    fn test_decline_is_terminal() {
        let mut submission = new_submission(false);
        submission.decline(Some("Outside appetite".to_string())).unwrap();
        assert_eq!(submission.decline_reason(), Some("Outside appetite"));
        assert!(submission.route().is_err());
        assert!(submission.decline(None).is_err());
    }

    #[test]
    fn test_declined_submission_rejects_workflow_actions() {
        let mut submission = new_submission(false);
        let id = submission.id();
        submission.decline(None).unwrap();

        let documents = vec![SignedDocument::generated(DocumentType::Proposal, id, "/v1", Utc::now())];
        assert!(matches!(
            submission.replace_documents(documents),
            Err(WorkflowError::SubmissionClosed(SubmissionStatus::Declined))
        ));
        assert!(matches!(submission.begin_payment(), Err(WorkflowError::SubmissionClosed(_))));
        assert!(matches!(submission.ensure_fees_editable(), Err(WorkflowError::SubmissionClosed(_))));
        assert_eq!(
            submission.ensure_open().unwrap_err().to_string(),
            "Submission is DECLINED and can no longer change"
        );
        assert!(submission.signed_documents().is_empty());
    }

    #[test]
    fn test_decline_waits_for_payment_in_flight() {
        let mut submission = new_submission(false);
        submission.workflow = BindStage::Signed {
            esign_completed_at: Utc::now(),
            payment_started_at: None,
        };
        submission.begin_payment().unwrap();
        assert!(matches!(submission.decline(None), Err(WorkflowError::PaymentInProgress)));

        submission.release_payment();
        submission.decline(None).unwrap();
        assert_eq!(submission.status(), SubmissionStatus::Declined);
    }

    #[test]
    fn test_send_without_documents_fails() {
        let mut submission = new_submission(false);
        assert!(matches!(
            submission.send_for_signature(EnvelopeId::new()),
            Err(WorkflowError::NoDocuments)
        ));
    }

    #[test]
    fn test_replace_documents_keeps_one_per_type() {
        let mut submission = new_submission(false);
        let now = Utc::now();
        let id = submission.id();
        let docs = |url: &str| {
            vec![
                SignedDocument::generated(DocumentType::CarrierForm, id, url, now),
                SignedDocument::generated(DocumentType::Proposal, id, url, now),
            ]
        };
        let first = docs("/v1");
        let second = docs("/v2");
        submission.replace_documents(first).unwrap();
        submission.replace_documents(second).unwrap();

        assert_eq!(submission.documents_generated(), 2);
        assert_eq!(submission.signed_documents()[0].document_type, DocumentType::Proposal);
        assert!(submission.signed_documents().iter().all(|d| d.document_url == "/v2"));
    }

    #[test]
    fn test_invalid_contact_rejected() {
        let result = Submission::create(NewSubmission {
            agency_id: AgencyId::new(),
            created_by: UserId::new(),
            client_contact: ClientContact::default(),
            application: ApplicationForm::default(),
            draft: false,
        });
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }
}
