//! Domain events for the submission aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AgencyId, EnvelopeId, SubmissionId, Usd};

use crate::documents::DocumentType;
use crate::submission::SubmissionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmissionEvent {
    SubmissionCreated {
        submission_id: SubmissionId,
        agency_id: AgencyId,
        timestamp: DateTime<Utc>,
    },

    StatusChanged {
        submission_id: SubmissionId,
        from: SubmissionStatus,
        to: SubmissionStatus,
        timestamp: DateTime<Utc>,
    },

    DocumentsGenerated {
        submission_id: SubmissionId,
        document_types: Vec<DocumentType>,
        timestamp: DateTime<Utc>,
    },

    SentForSignature {
        submission_id: SubmissionId,
        envelope_id: EnvelopeId,
        documents: usize,
        timestamp: DateTime<Utc>,
    },

    /// Every document signed; carries the signer's email for the audit log
    SignatureCompleted {
        submission_id: SubmissionId,
        signer_email: String,
        timestamp: DateTime<Utc>,
    },

    PaymentRecorded {
        submission_id: SubmissionId,
        amount: Usd,
        transaction_id: String,
        timestamp: DateTime<Utc>,
    },

    BindRequested {
        submission_id: SubmissionId,
        timestamp: DateTime<Utc>,
    },

    BindApproved {
        submission_id: SubmissionId,
        timestamp: DateTime<Utc>,
    },

    Declined {
        submission_id: SubmissionId,
        reason: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl SubmissionEvent {
    pub fn submission_id(&self) -> SubmissionId {
        match self {
            SubmissionEvent::SubmissionCreated { submission_id, .. }
            | SubmissionEvent::StatusChanged { submission_id, .. }
            | SubmissionEvent::DocumentsGenerated { submission_id, .. }
            | SubmissionEvent::SentForSignature { submission_id, .. }
            | SubmissionEvent::SignatureCompleted { submission_id, .. }
            | SubmissionEvent::PaymentRecorded { submission_id, .. }
            | SubmissionEvent::BindRequested { submission_id, .. }
            | SubmissionEvent::BindApproved { submission_id, .. }
            | SubmissionEvent::Declined { submission_id, .. } => *submission_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            SubmissionEvent::SubmissionCreated { .. } => "SubmissionCreated",
            SubmissionEvent::StatusChanged { .. } => "StatusChanged",
            SubmissionEvent::DocumentsGenerated { .. } => "DocumentsGenerated",
            SubmissionEvent::SentForSignature { .. } => "SentForSignature",
            SubmissionEvent::SignatureCompleted { .. } => "SignatureCompleted",
            SubmissionEvent::PaymentRecorded { .. } => "PaymentRecorded",
            SubmissionEvent::BindRequested { .. } => "BindRequested",
            SubmissionEvent::BindApproved { .. } => "BindApproved",
            SubmissionEvent::Declined { .. } => "Declined",
        }
    }
}
