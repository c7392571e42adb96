//! Document assembly errors

use std::time::Duration;
use thiserror::Error;

use domain_submission::DocumentType;

/// Failures turning HTML into a PDF
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to launch PDF renderer at {binary}: {message}")]
    Launch { binary: String, message: String },

    #[error("PDF rendering timed out after {0:?}")]
    Timeout(Duration),

    /// The browser exited unsuccessfully; carries its stderr
    #[error("PDF renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("PDF renderer produced no output")]
    EmptyOutput,

    #[error("PDF renderer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors building or rendering a document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The finance agreement was asked for on a quote without a plan
    #[error("Quote has no finance plan")]
    NoFinancePlan,

    #[error("Document {0} does not belong to this quote")]
    NotApplicable(DocumentType),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl DocumentError {
    pub fn is_render(&self) -> bool {
        matches!(self, DocumentError::Render(_))
    }
}
