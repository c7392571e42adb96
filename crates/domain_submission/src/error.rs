//! Submission and bind workflow errors

use thiserror::Error;

use core_kernel::{EnvelopeId, PortError};
use domain_quote::QuoteError;

use crate::submission::SubmissionStatus;

/// Errors raised by the submission aggregate and the bind workflow services
///
/// Precondition messages are shown to agency users verbatim, so their text
/// is part of the HTTP contract.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("E-Signature must be completed before payment")]
    EsignRequiredForPayment,

    #[error("Payment has already been completed")]
    AlreadyPaid,

    #[error("Payment is already being processed")]
    PaymentInProgress,

    #[error("E-Signature must be completed before requesting bind")]
    EsignRequiredForBind,

    #[error("Payment must be completed before requesting bind")]
    PaymentRequiredForBind,

    #[error("Bind has already been requested")]
    BindAlreadyRequested,

    #[error("Bind has not been requested for this submission")]
    BindNotRequested,

    #[error("Bind has already been approved")]
    BindAlreadyApproved,

    #[error("E-Signature has already been completed")]
    EsignAlreadyCompleted,

    #[error("Quote must be approved before documents can be generated")]
    QuoteNotApproved,

    #[error("No documents found for this submission")]
    NoDocuments,

    /// Fewer documents generated than the quote requires
    #[error("{required} documents must be generated before sending for signature ({generated} generated)")]
    DocumentsIncomplete {
        generated: usize,
        required: usize,
    },

    #[error("Documents have not been sent for signature")]
    NotSentForSignature,

    #[error("Envelope {0} does not match the envelope issued for this submission")]
    EnvelopeMismatch(EnvelopeId),

    /// Declined and bound submissions accept no further workflow actions
    #[error("Submission is {0} and can no longer change")]
    SubmissionClosed(SubmissionStatus),

    #[error("Fees cannot be changed after documents are sent for signature")]
    FeesLocked,

    #[error("Amount must be a positive number")]
    NonPositiveAmount,

    /// Invalid submission status transition attempted
    #[error("Invalid submission status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: String,
        to: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Payment processing failed: {0}")]
    Payment(String),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkflowError::Validation(message.into())
    }

    pub(crate) fn transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        WorkflowError::InvalidStatusTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// True when the action was attempted outside the state that allows it
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            WorkflowError::EsignRequiredForPayment
                | WorkflowError::AlreadyPaid
                | WorkflowError::PaymentInProgress
                | WorkflowError::EsignRequiredForBind
                | WorkflowError::PaymentRequiredForBind
                | WorkflowError::BindAlreadyRequested
                | WorkflowError::BindNotRequested
                | WorkflowError::BindAlreadyApproved
                | WorkflowError::EsignAlreadyCompleted
                | WorkflowError::QuoteNotApproved
                | WorkflowError::NoDocuments
                | WorkflowError::DocumentsIncomplete { .. }
                | WorkflowError::NotSentForSignature
                | WorkflowError::EnvelopeMismatch(_)
                | WorkflowError::InvalidStatusTransition { .. }
                | WorkflowError::SubmissionClosed(_)
                | WorkflowError::FeesLocked
        )
    }

    /// True for caller input problems (bad amounts, form validation, fee rules)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WorkflowError::Validation(_) | WorkflowError::NonPositiveAmount | WorkflowError::Quote(_)
        ) || matches!(self, WorkflowError::Port(PortError::Validation { .. }))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WorkflowError::Port(err) if err.is_not_found())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, WorkflowError::Port(err) if err.is_conflict())
    }
}

impl From<validator::ValidationErrors> for WorkflowError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_invalid_fields("", &errors, &mut fields);
        fields.sort();
        WorkflowError::Validation(format!("Invalid application fields: {}", fields.join(", ")))
    }
}

fn collect_invalid_fields(prefix: &str, errors: &validator::ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(_) => out.push(path),
            ValidationErrorsKind::Struct(inner) => collect_invalid_fields(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_invalid_fields(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}
