//! Submission DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_quote::Quote;
use domain_submission::{ApplicationForm, ClientContact, StageFlags, Submission};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub client_contact: ClientContact,
    pub application: ApplicationForm,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct DeclineRequest {
    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}

/// A submission with its stage flattened into the legacy flag fields
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    #[serde(flatten)]
    pub submission: Submission,
    #[serde(flatten)]
    pub flags: StageFlags,
}

impl From<Submission> for SubmissionView {
    fn from(submission: Submission) -> Self {
        let flags = submission.workflow().flags();
        Self { submission, flags }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub submission: SubmissionView,
}

impl SubmissionResponse {
    pub fn new(submission: Submission) -> Self {
        Self {
            success: true,
            submission: submission.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListResponse {
    pub success: bool,
    pub submissions: Vec<SubmissionView>,
}

/// A bound submission and the quote it was bound on
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundPolicyView {
    #[serde(flatten)]
    pub submission: SubmissionView,
    pub quote: Option<Quote>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundPoliciesResponse {
    pub success: bool,
    pub bound_policies: Vec<BoundPolicyView>,
}
