//! E-sign, payment and bind DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{EnvelopeId, SubmissionId, Usd};
use domain_submission::{PaymentMethod, PaymentStatus, Signer};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub submission_id: SubmissionId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub submission_id: SubmissionId,
    pub amount: Decimal,
    pub method: PaymentMethod,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    pub success: bool,
    pub payment_status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
    pub payment_amount: Usd,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
    pub submission_id: SubmissionId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendForSignatureResponse {
    pub success: bool,
    pub signing_url: String,
    pub envelope_id: EnvelopeId,
    pub documents_sent: usize,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub submission_id: SubmissionId,
    pub envelope_id: EnvelopeId,
    pub signer: Signer,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    pub success: bool,
    pub message: String,
    pub signed_at: DateTime<Utc>,
    pub documents_signed: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindApprovedResponse {
    pub success: bool,
    pub message: String,
    pub bind_approved_at: Option<DateTime<Utc>>,
}
