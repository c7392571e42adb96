//! Generated documents and their signature status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use core_kernel::SubmissionId;

use crate::error::WorkflowError;

/// Kind of document sent to the client for signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Quote summary and fee breakdown
    Proposal,
    /// The 12-page carrier application packet
    CarrierForm,
    /// Premium finance agreement, only when the quote carries a finance plan
    FinanceAgreement,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Proposal => "PROPOSAL",
            DocumentType::CarrierForm => "CARRIER_FORM",
            DocumentType::FinanceAgreement => "FINANCE_AGREEMENT",
        }
    }

    /// URL path segment
    pub fn slug(&self) -> &'static str {
        match self {
            DocumentType::Proposal => "proposal",
            DocumentType::CarrierForm => "carrier-form",
            DocumentType::FinanceAgreement => "finance-agreement",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Proposal => "Proposal",
            DocumentType::CarrierForm => "Carrier Application Packet",
            DocumentType::FinanceAgreement => "Premium Finance Agreement",
        }
    }

    /// Documents the client must sign before payment
    pub fn required(has_finance_plan: bool) -> Vec<DocumentType> {
        let mut required = vec![DocumentType::Proposal, DocumentType::CarrierForm];
        if has_finance_plan {
            required.push(DocumentType::FinanceAgreement);
        }
        required
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = WorkflowError;

    /// Accepts either the stored name or the URL slug
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            DocumentType::Proposal,
            DocumentType::CarrierForm,
            DocumentType::FinanceAgreement,
        ]
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(s) || t.slug() == s)
        .ok_or_else(|| WorkflowError::validation(format!("Unknown document type: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureStatus {
    Generated,
    Sent,
    Signed,
    Failed,
}

impl SignatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureStatus::Generated => "GENERATED",
            SignatureStatus::Sent => "SENT",
            SignatureStatus::Signed => "SIGNED",
            SignatureStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The person who completed the e-signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
}

impl Signer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A generated document tracked on the submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedDocument {
    pub document_type: DocumentType,
    pub document_name: String,
    pub document_url: String,
    pub generated_at: DateTime<Utc>,
    pub signature_status: SignatureStatus,
    pub sent_for_signature_at: Option<DateTime<Utc>>,
    pub signed_at: Option<DateTime<Utc>>,
    pub signer: Option<Signer>,
}

impl SignedDocument {
    /// A freshly generated document for the submission's quote
    pub fn generated(
        document_type: DocumentType,
        submission_id: SubmissionId,
        document_url: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            document_type,
            document_name: format!("{} - {}", document_type.display_name(), submission_id),
            document_url: document_url.into(),
            generated_at,
            signature_status: SignatureStatus::Generated,
            sent_for_signature_at: None,
            signed_at: None,
            signer: None,
        }
    }

    pub(crate) fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.signature_status = SignatureStatus::Sent;
        self.sent_for_signature_at = Some(at);
    }

    pub(crate) fn mark_signed(&mut self, signer: &Signer, at: DateTime<Utc>) {
        self.signature_status = SignatureStatus::Signed;
        self.signed_at = Some(at);
        self.signer = Some(signer.clone());
    }

    pub fn is_signed(&self) -> bool {
        self.signature_status == SignatureStatus::Signed
    }
}
