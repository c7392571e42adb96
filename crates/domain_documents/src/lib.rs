//! Document Assembly
//!
//! HTML templates for the documents a client signs before bind, and the
//! port that prints them to PDF.
//!
//! - [`ApplicationPacket`]: the 12-page carrier application packet
//! - [`render_proposal`]: quote summary with the fee breakdown
//! - [`render_finance_agreement`]: premium finance terms, only with a finance plan
//! - [`PdfRenderer`]: HTML to PDF; [`ChromiumPdfRenderer`] shells out to a headless browser
//!
//! ```rust,ignore
//! let assembler = DocumentAssembler::new(Arc::new(ChromiumPdfRenderer::new("/usr/bin/chromium")));
//! let sources = DocumentSources { submission: &submission, quote: &quote, carrier: &carrier, agency: &agency };
//! let pdf = assembler.render_pdf(DocumentType::CarrierForm, &sources).await?;
//! ```

pub mod agency;
pub mod assembler;
pub mod error;
pub mod finance;
pub mod html;
pub mod packet;
mod pages;
pub mod proposal;
pub mod renderer;
pub mod styles;

pub use agency::AgencyProfile;
pub use assembler::{render_html, DocumentAssembler, DocumentSources};
pub use error::{DocumentError, RenderError};
pub use finance::render_finance_agreement;
pub use packet::{ApplicationPacket, PAGE_COUNT, PAGE_TITLES};
pub use proposal::render_proposal;
pub use renderer::{ChromiumPdfRenderer, PdfRenderer};

#[cfg(any(test, feature = "mock"))]
pub use renderer::mock::FixedPdfRenderer;
