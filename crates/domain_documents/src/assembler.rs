//! Picks the template for a document type and hands the HTML to a renderer

use std::sync::Arc;
use tracing::info;

use domain_quote::{Carrier, Quote};
use domain_submission::{DocumentType, Submission};

use crate::agency::AgencyProfile;
use crate::error::DocumentError;
use crate::finance::render_finance_agreement;
use crate::packet::ApplicationPacket;
use crate::proposal::render_proposal;
use crate::renderer::PdfRenderer;

/// Everything a document template reads
#[derive(Debug, Clone, Copy)]
pub struct DocumentSources<'a> {
    pub submission: &'a Submission,
    pub quote: &'a Quote,
    pub carrier: &'a Carrier,
    pub agency: &'a AgencyProfile,
}

/// The HTML of one generated document
///
/// # Errors
///
/// [`DocumentError::NotApplicable`] when the document is not part of this
/// quote's set (a finance agreement without a finance plan)
pub fn render_html(document_type: DocumentType, sources: &DocumentSources<'_>) -> Result<String, DocumentError> {
    match document_type {
        DocumentType::Proposal => Ok(render_proposal(
            sources.submission,
            sources.quote,
            sources.carrier,
            sources.agency,
        )),
        DocumentType::CarrierForm => {
            Ok(
                ApplicationPacket::from_sources(sources.submission, sources.quote, sources.carrier, sources.agency)
                    .render_html(),
            )
        }
        DocumentType::FinanceAgreement => render_finance_agreement(sources.submission, sources.quote).map_err(|e| {
            match e {
                DocumentError::NoFinancePlan => DocumentError::NotApplicable(document_type),
                other => other,
            }
        }),
    }
}

/// Renders documents to PDF through the configured [`PdfRenderer`]
#[derive(Clone)]
pub struct DocumentAssembler {
    renderer: Arc<dyn PdfRenderer>,
}

impl DocumentAssembler {
    pub fn new(renderer: Arc<dyn PdfRenderer>) -> Self {
        Self { renderer }
    }

    pub async fn render_pdf(
        &self,
        document_type: DocumentType,
        sources: &DocumentSources<'_>,
    ) -> Result<Vec<u8>, DocumentError> {
        let html = render_html(document_type, sources)?;
        let pdf = self.renderer.render(&html).await?;
        info!(
            submission_id = %sources.submission.id(),
            quote_id = %sources.quote.id(),
            document = %document_type,
            pdf_bytes = pdf.len(),
            "Document rendered"
        );
        Ok(pdf)
    }
}

impl std::fmt::Debug for DocumentAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentAssembler").finish_non_exhaustive()
    }
}
