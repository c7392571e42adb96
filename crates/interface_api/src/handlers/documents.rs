//! Document generation and download

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};

use core_kernel::QuoteId;
use domain_documents::{render_html, DocumentSources};
use domain_submission::DocumentType;

use crate::auth::Claims;
use crate::dto::quote::{DocumentQuery, GenerateDocumentsResponse};
use crate::error::ApiError;
use crate::handlers::owned_quote;
use crate::AppState;

/// POST /agency/quotes/:id/generate-documents
pub async fn generate_documents(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<QuoteId>,
) -> Result<Json<GenerateDocumentsResponse>, ApiError> {
    owned_quote(&state, &claims, id).await?;
    let documents = state.workflow.generate_documents(id).await?;
    Ok(Json(GenerateDocumentsResponse {
        success: true,
        documents_generated: documents.len(),
        documents,
    }))
}

/// GET /agency/quotes/:id/documents/:type
///
/// Renders on demand; nothing is stored.
pub async fn get_document(
    State(state): State<AppState>,
    claims: Claims,
    Path((id, document)): Path<(QuoteId, String)>,
    Query(query): Query<DocumentQuery>,
) -> Result<Response, ApiError> {
    let document_type: DocumentType = document.parse()?;
    let (quote, submission) = owned_quote(&state, &claims, id).await?;
    let carrier = state.port().get_carrier(quote.carrier_id()).await?;

    let sources = DocumentSources {
        submission: &submission,
        quote: &quote,
        carrier: &carrier,
        agency: &state.config.agency,
    };

    if query.wants_html() {
        return Ok(Html(render_html(document_type, &sources)?).into_response());
    }

    let pdf = state.documents.render_pdf(document_type, &sources).await?;
    let disposition = format!(
        "inline; filename=\"{}-{}.pdf\"",
        document_type.slug(),
        quote.id().as_uuid()
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}
