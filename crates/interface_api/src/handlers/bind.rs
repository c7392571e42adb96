//! E-sign, payment and bind handlers
//!
//! Bodies name the submission; ownership is checked before the workflow
//! service runs its own gates.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use domain_submission::PaymentStatus;

use crate::auth::Claims;
use crate::dto::workflow::*;
use crate::dto::MessageResponse;
use crate::error::ApiError;
use crate::handlers::owned_submission;
use crate::AppState;

/// POST /esign/send
pub async fn send_for_signature(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Json<SendForSignatureResponse>, ApiError> {
    let Json(request) = payload?;
    owned_submission(&state, &claims, request.submission_id).await?;

    let sent = state.workflow.send_for_signature(request.submission_id).await?;
    Ok(Json(SendForSignatureResponse {
        success: true,
        signing_url: sent.signing_url,
        envelope_id: sent.envelope_id,
        documents_sent: sent.documents_sent,
        message: "Documents sent for signature".to_string(),
    }))
}

/// POST /esign/sign
pub async fn sign(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<SignRequest>, JsonRejection>,
) -> Result<Json<SignResponse>, ApiError> {
    let Json(request) = payload?;
    owned_submission(&state, &claims, request.submission_id).await?;

    let completion = state
        .workflow
        .mark_signed(request.submission_id, request.envelope_id, request.signer)
        .await?;
    Ok(Json(SignResponse {
        success: true,
        message: "Documents signed successfully".to_string(),
        signed_at: completion.signed_at,
        documents_signed: completion.documents_signed,
    }))
}

/// POST /payment/pay
pub async fn pay(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<PayRequest>, JsonRejection>,
) -> Result<Json<PayResponse>, ApiError> {
    claims.require_agency()?;
    let Json(request) = payload?;
    owned_submission(&state, &claims, request.submission_id).await?;

    let payment = state
        .workflow
        .process_payment(request.submission_id, request.amount, request.method)
        .await?;
    Ok(Json(PayResponse {
        success: true,
        payment_status: PaymentStatus::Paid,
        payment_date: payment.paid_at,
        payment_amount: payment.amount,
        payment_method: payment.method,
        transaction_id: payment.transaction_id,
        submission_id: request.submission_id,
    }))
}

/// POST /bind/request
pub async fn request_bind(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    claims.require_agency()?;
    let Json(request) = payload?;
    owned_submission(&state, &claims, request.submission_id).await?;

    state.workflow.request_bind(request.submission_id).await?;
    Ok(Json(MessageResponse::ok("Bind request submitted")))
}

/// POST /bind/approve
pub async fn approve_bind(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Json<BindApprovedResponse>, ApiError> {
    claims.require_admin()?;
    let Json(request) = payload?;

    let submission = state.workflow.approve_bind(request.submission_id).await?;
    Ok(Json(BindApprovedResponse {
        success: true,
        message: "Bind approved".to_string(),
        bind_approved_at: submission.workflow().bind_approved_at(),
    }))
}
