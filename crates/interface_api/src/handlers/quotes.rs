//! Quote handlers: admin entry and posting, agency review and approval

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::collections::HashSet;

use core_kernel::QuoteId;
use domain_submission::{EnterQuote, QuoteQuery, SubmissionQuery};

use crate::auth::{Claims, Role};
use crate::dto::quote::*;
use crate::error::ApiError;
use crate::handlers::owned_quote;
use crate::AppState;

/// POST /admin/quotes
pub async fn enter_quote(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<EnterQuoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<QuoteResponse>), ApiError> {
    claims.require_admin()?;
    let Json(request) = payload?;

    let quote = state
        .workflow
        .enter_quote(EnterQuote {
            submission_id: request.submission_id,
            carrier_id: request.carrier_id,
            carrier_quote: request.carrier_quote,
            premium_tax_percent: request.premium_tax_percent,
            policy_fee: request.policy_fee,
            broker_fee: request.broker_fee,
            coverage: request.coverage,
            finance_plan: request.finance_plan,
            entered_by: claims.user_id()?,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(QuoteResponse::new(quote))))
}

/// GET /admin/quotes
///
/// Agency admins only see quotes on their own agency's submissions.
pub async fn list_quotes(State(state): State<AppState>, claims: Claims) -> Result<Json<QuoteListResponse>, ApiError> {
    claims.require_any_admin()?;
    let quotes = state.port().find_quotes(QuoteQuery::default()).await?;

    if claims.role == Role::SystemAdmin {
        return Ok(Json(QuoteListResponse { success: true, quotes }));
    }

    let own: HashSet<_> = state
        .port()
        .find_submissions(SubmissionQuery::for_agency(claims.require_agency()?))
        .await?
        .iter()
        .map(|s| s.id())
        .collect();
    let quotes = quotes.into_iter().filter(|q| own.contains(&q.submission_id())).collect();
    Ok(Json(QuoteListResponse { success: true, quotes }))
}

/// POST /admin/quotes/:id/post
pub async fn post_quote(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<QuoteId>,
) -> Result<Json<QuoteResponse>, ApiError> {
    claims.require_admin()?;
    let quote = state.workflow.post_quote(id).await?;
    Ok(Json(QuoteResponse::new(quote)))
}

/// GET /agency/quotes/:id
pub async fn get_quote(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<QuoteId>,
) -> Result<Json<QuoteDetailResponse>, ApiError> {
    owned_quote(&state, &claims, id).await?;
    let view = state.workflow.quote_workflow(id).await?;
    let carrier = state.port().get_carrier(view.quote.carrier_id()).await?;

    let client_name = match view.submission.client_contact().name.trim() {
        "" => "N/A".to_string(),
        name => name.to_string(),
    };
    Ok(Json(QuoteDetailResponse {
        success: true,
        carrier_name: carrier.name,
        client_name,
        quote: view.quote,
        submission: view.submission.into(),
        gates: view.gates,
        timeline: view.timeline,
    }))
}

/// PATCH /agency/quotes/:id
pub async fn update_quote(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<QuoteId>,
    payload: Result<Json<UpdateQuoteRequest>, JsonRejection>,
) -> Result<Json<BrokerFeeResponse>, ApiError> {
    claims.require_agency()?;
    let Json(request) = payload?;
    let broker_fee = request
        .broker_fee
        .ok_or_else(|| ApiError::BadRequest("brokerFeeAmountUSD is required".to_string()))?;
    owned_quote(&state, &claims, id).await?;

    let quote = state.workflow.update_broker_fee(id, broker_fee).await?;
    Ok(Json(BrokerFeeResponse {
        success: true,
        quote: BrokerFeeView::from(&quote),
    }))
}

/// POST /agency/quotes/:id/approve
pub async fn approve_quote(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<QuoteId>,
) -> Result<Json<QuoteResponse>, ApiError> {
    claims.require_agency()?;
    owned_quote(&state, &claims, id).await?;
    let quote = state.workflow.approve_quote(id, claims.user_id()?).await?;
    Ok(Json(QuoteResponse::new(quote)))
}
