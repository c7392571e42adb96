//! Workflow gate evaluation
//!
//! [`evaluate_gates`] decides which bind actions are open for a
//! submission/quote pair. The API returns the same [`WorkflowGates`] value the
//! services check before mutating, so the client can disable buttons from the
//! server's own answer.

use serde::{Deserialize, Serialize};

use domain_quote::{Quote, QuoteStatus};

use crate::documents::DocumentType;
use crate::error::WorkflowError;
use crate::stage::PaymentStatus;
use crate::submission::Submission;

/// The state the gates are computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub quote_status: QuoteStatus,
    pub has_finance_plan: bool,
    pub documents_generated: usize,
    pub esign_completed: bool,
    pub payment_status: PaymentStatus,
    pub bind_requested: bool,
    pub bind_approved: bool,
}

impl WorkflowSnapshot {
    pub fn of(submission: &Submission, quote: &Quote) -> Self {
        let stage = submission.workflow();
        Self {
            quote_status: quote.status(),
            has_finance_plan: quote.has_finance_plan(),
            documents_generated: submission.documents_generated(),
            esign_completed: stage.esign_completed(),
            payment_status: stage.payment_status(),
            bind_requested: stage.bind_requested(),
            bind_approved: stage.bind_approved(),
        }
    }

    /// Proposal and carrier forms, plus the finance agreement when financed
    pub fn required_documents(&self) -> usize {
        DocumentType::required(self.has_finance_plan).len()
    }
}

/// Which actions are currently permitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGates {
    pub can_generate_documents: bool,
    pub can_esign: bool,
    pub can_pay: bool,
    pub can_bind: bool,
    pub documents_generated: usize,
    pub required_documents: usize,
}

pub fn evaluate_gates(snapshot: &WorkflowSnapshot) -> WorkflowGates {
    let required = snapshot.required_documents();
    let paid = snapshot.payment_status == PaymentStatus::Paid;

    WorkflowGates {
        can_generate_documents: snapshot.quote_status == QuoteStatus::Approved && !snapshot.esign_completed,
        can_esign: snapshot.documents_generated >= required && !snapshot.esign_completed,
        can_pay: snapshot.esign_completed && !paid,
        can_bind: snapshot.esign_completed && paid && !snapshot.bind_requested,
        documents_generated: snapshot.documents_generated,
        required_documents: required,
    }
}

/// A gated bind action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    GenerateDocuments,
    Esign,
    Pay,
    Bind,
}

impl WorkflowSnapshot {
    /// `Ok` when the gate for `action` is open, otherwise the precondition
    /// that keeps it closed
    pub fn check(&self, action: WorkflowAction) -> Result<(), WorkflowError> {
        let gates = evaluate_gates(self);
        match action {
            WorkflowAction::GenerateDocuments if !gates.can_generate_documents => Err(if self.esign_completed {
                WorkflowError::EsignAlreadyCompleted
            } else {
                WorkflowError::QuoteNotApproved
            }),
            WorkflowAction::Esign if !gates.can_esign => Err(if self.esign_completed {
                WorkflowError::EsignAlreadyCompleted
            } else if self.documents_generated == 0 {
                WorkflowError::NoDocuments
            } else {
                WorkflowError::DocumentsIncomplete {
                    generated: self.documents_generated,
                    required: gates.required_documents,
                }
            }),
            WorkflowAction::Pay if !gates.can_pay => Err(if self.esign_completed {
                WorkflowError::AlreadyPaid
            } else {
                WorkflowError::EsignRequiredForPayment
            }),
            WorkflowAction::Bind if !gates.can_bind => Err(if !self.esign_completed {
                WorkflowError::EsignRequiredForBind
            } else if self.payment_status != PaymentStatus::Paid {
                WorkflowError::PaymentRequiredForBind
            } else {
                WorkflowError::BindAlreadyRequested
            }),
            _ => Ok(()),
        }
    }
}

/// One row of the status timeline shown on the quote page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    pub label: String,
    pub done: bool,
}

impl TimelineStep {
    fn new(label: &str, done: bool) -> Self {
        Self {
            label: label.to_string(),
            done,
        }
    }
}

pub fn timeline(snapshot: &WorkflowSnapshot) -> Vec<TimelineStep> {
    let quote_approved = matches!(
        snapshot.quote_status,
        QuoteStatus::Approved | QuoteStatus::BindRequested | QuoteStatus::Bound
    );
    let esign_label = if snapshot.esign_completed {
        "E-Signature Completed"
    } else {
        "Awaiting E-Signature"
    };
    let bind_label = if snapshot.bind_approved {
        "Policy Bound"
    } else {
        "Bind Requested"
    };

    vec![
        TimelineStep::new("Quote Approved", quote_approved),
        TimelineStep::new(
            "Documents Generated",
            snapshot.documents_generated >= snapshot.required_documents(),
        ),
        TimelineStep::new(esign_label, snapshot.esign_completed),
        TimelineStep::new("Payment Completed", snapshot.payment_status == PaymentStatus::Paid),
        TimelineStep::new(bind_label, snapshot.bind_requested || snapshot.bind_approved),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WorkflowSnapshot {
        WorkflowSnapshot {
            quote_status: QuoteStatus::Approved,
            has_finance_plan: false,
            documents_generated: 0,
            esign_completed: false,
            payment_status: PaymentStatus::Pending,
            bind_requested: false,
            bind_approved: false,
        }
    }

    #[test]
    fn test_unsigned_pending_cannot_pay_or_bind() {
        let gates = evaluate_gates(&snapshot());
        assert!(!gates.can_pay);
        assert!(!gates.can_bind);
        assert!(gates.can_generate_documents);
        assert!(!gates.can_esign);
    }

    #[test]
    fn test_finance_plan_requires_third_document() {
        let mut s = snapshot();
        s.documents_generated = 2;
        assert!(evaluate_gates(&s).can_esign);

        s.has_finance_plan = true;
        let gates = evaluate_gates(&s);
        assert!(!gates.can_esign);
        assert_eq!(gates.required_documents, 3);
    }

    #[test]
    fn test_posted_quote_cannot_generate_documents() {
        let mut s = snapshot();
        s.quote_status = QuoteStatus::Posted;
        assert!(!evaluate_gates(&s).can_generate_documents);
    }

    #[test]
    fn test_check_reports_blocking_precondition() {
        let mut s = snapshot();
        assert_eq!(
            s.check(WorkflowAction::Pay).unwrap_err().to_string(),
            "E-Signature must be completed before payment"
        );
        assert!(matches!(s.check(WorkflowAction::Esign), Err(WorkflowError::NoDocuments)));

        s.esign_completed = true;
        assert!(s.check(WorkflowAction::Pay).is_ok());
        assert_eq!(
            s.check(WorkflowAction::Bind).unwrap_err().to_string(),
            "Payment must be completed before requesting bind"
        );
        assert!(matches!(
            s.check(WorkflowAction::GenerateDocuments),
            Err(WorkflowError::EsignAlreadyCompleted)
        ));

        s.payment_status = PaymentStatus::Paid;
        s.bind_requested = true;
        assert!(matches!(s.check(WorkflowAction::Pay), Err(WorkflowError::AlreadyPaid)));
        assert!(matches!(s.check(WorkflowAction::Bind), Err(WorkflowError::BindAlreadyRequested)));
    }

    #[test]
    fn test_gates_serialize_camel_case() {
        let json = serde_json::to_value(evaluate_gates(&snapshot())).unwrap();
        assert_eq!(json["canGenerateDocuments"], true);
        assert_eq!(json["canBind"], false);
        assert_eq!(json["requiredDocuments"], 2);
    }

    #[test]
    fn test_timeline_labels_follow_progress() {
        let mut s = snapshot();
        let steps = timeline(&s);
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[2].label, "Awaiting E-Signature");
        assert_eq!(steps[4].label, "Bind Requested");
        assert!(steps[0].done);
        assert!(!steps[1].done);

        s.documents_generated = 2;
        s.esign_completed = true;
        s.payment_status = PaymentStatus::Paid;
        s.bind_requested = true;
        s.bind_approved = true;
        let steps = timeline(&s);
        assert!(steps.iter().all(|step| step.done));
        assert_eq!(steps[2].label, "E-Signature Completed");
        assert_eq!(steps[4].label, "Policy Bound");
    }
}
