//! Route handlers

pub mod bind;
pub mod documents;
pub mod health;
pub mod quotes;
pub mod submissions;

use core_kernel::{QuoteId, SubmissionId};
use domain_quote::Quote;
use domain_submission::Submission;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::AppState;

/// Loads a submission the caller is allowed to see
pub(crate) async fn owned_submission(
    state: &AppState,
    claims: &Claims,
    id: SubmissionId,
) -> Result<Submission, ApiError> {
    let submission = state.port().get_submission(id).await?;
    claims.ensure_agency_owns(&submission)?;
    Ok(submission)
}

/// Loads a quote and its submission, checking ownership through the submission
pub(crate) async fn owned_quote(
    state: &AppState,
    claims: &Claims,
    id: QuoteId,
) -> Result<(Quote, Submission), ApiError> {
    let quote = state.port().get_quote(id).await?;
    let submission = owned_submission(state, claims, quote.submission_id()).await?;
    Ok((quote, submission))
}
