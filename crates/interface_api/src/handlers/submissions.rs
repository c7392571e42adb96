//! Submission handlers: agency intake and admin lifecycle

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use core_kernel::SubmissionId;
use domain_submission::{NewSubmission, SubmissionQuery};

use crate::auth::Claims;
use crate::dto::submission::*;
use crate::error::ApiError;
use crate::handlers::owned_submission;
use crate::AppState;

/// POST /agency/submissions
pub async fn create_submission(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<CreateSubmissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let agency_id = claims.require_agency()?;
    let Json(request) = payload?;

    let submission = state
        .workflow
        .create_submission(NewSubmission {
            agency_id,
            created_by: claims.user_id()?,
            client_contact: request.client_contact,
            application: request.application,
            draft: request.draft,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(SubmissionResponse::new(submission))))
}

/// GET /agency/submissions/:id
pub async fn get_submission(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<SubmissionId>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = owned_submission(&state, &claims, id).await?;
    Ok(Json(SubmissionResponse::new(submission)))
}

/// GET /agency/bound-policies
pub async fn bound_policies(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<BoundPoliciesResponse>, ApiError> {
    let agency_id = claims.require_agency()?;
    let bound_policies = state
        .workflow
        .bound_policies(SubmissionQuery::for_agency(agency_id))
        .await?
        .into_iter()
        .map(|(submission, quote)| BoundPolicyView {
            submission: submission.into(),
            quote,
        })
        .collect();

    Ok(Json(BoundPoliciesResponse {
        success: true,
        bound_policies,
    }))
}

/// POST /admin/submissions/:id/route
pub async fn route_submission(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<SubmissionId>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    claims.require_admin()?;
    let submission = state.workflow.route_submission(id).await?;
    Ok(Json(SubmissionResponse::new(submission)))
}

/// POST /admin/submissions/:id/decline
pub async fn decline_submission(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<SubmissionId>,
    payload: Option<Json<DeclineRequest>>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    claims.require_admin()?;
    let request = payload.map(|Json(body)| body).unwrap_or_default();
    request
        .validate()
        .map_err(|_| ApiError::BadRequest("Decline reason must be at most 2000 characters".to_string()))?;
    let reason = request.reason;
    let submission = state.workflow.decline_submission(id, reason).await?;
    Ok(Json(SubmissionResponse::new(submission)))
}

/// GET /admin/bind-requests
pub async fn bind_requests(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<SubmissionListResponse>, ApiError> {
    claims.require_admin()?;
    let submissions = state
        .workflow
        .bind_requests()
        .await?
        .into_iter()
        .map(SubmissionView::from)
        .collect();
    Ok(Json(SubmissionListResponse {
        success: true,
        submissions,
    }))
}
