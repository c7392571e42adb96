//! PDF renderer port and the headless Chromium adapter

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::RenderError;

/// Turns a complete HTML document into PDF bytes
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Prints HTML to PDF with a headless Chromium process
///
/// Each render writes the document into a fresh temporary directory,
/// runs the browser against it and reads the PDF back. The process is
/// killed if it outlives the timeout.
#[derive(Debug, Clone)]
pub struct ChromiumPdfRenderer {
    binary: PathBuf,
    timeout: Duration,
}

impl ChromiumPdfRenderer {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &std::path::Path {
        &self.binary
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, input: &std::path::Path, output: &std::path::Path) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl PdfRenderer for ChromiumPdfRenderer {
    #[instrument(skip(self, html), fields(binary = %self.binary.display(), html_bytes = html.len()))]
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("document.html");
        let output = workdir.path().join("document.pdf");
        tokio::fs::write(&input, html).await?;

        let child = self
            .command(&input, &output)
            .spawn()
            .map_err(|e| RenderError::Launch {
                binary: self.binary.display().to_string(),
                message: e.to_string(),
            })?;

        let result = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "PDF rendering timed out");
                return Err(RenderError::Timeout(self.timeout));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            warn!(status = %result.status, %stderr, "PDF renderer failed");
            return Err(RenderError::Failed {
                status: result.status.to_string(),
                stderr,
            });
        }

        let pdf = match tokio::fs::read(&output).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(RenderError::EmptyOutput),
            Err(e) => return Err(e.into()),
        };
        if pdf.is_empty() {
            return Err(RenderError::EmptyOutput);
        }

        debug!(pdf_bytes = pdf.len(), "PDF rendered");
        Ok(pdf)
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Returns fixed bytes and remembers every document it was given
    #[derive(Debug, Default)]
    pub struct FixedPdfRenderer {
        rendered: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FixedPdfRenderer {
        pub const PDF: &'static [u8] = b"%PDF-1.4\n%mock\n";

        pub fn new() -> Self {
            Self::default()
        }

        /// A renderer whose every call fails as if the browser crashed
        pub fn failing() -> Self {
            Self {
                rendered: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn rendered(&self) -> Vec<String> {
            self.rendered.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl PdfRenderer for FixedPdfRenderer {
        async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
            if let Ok(mut rendered) = self.rendered.lock() {
                rendered.push(html.to_string());
            }
            if self.fail {
                return Err(RenderError::Failed {
                    status: "exit status: 1".to_string(),
                    stderr: "mock failure".to_string(),
                });
            }
            Ok(Self::PDF.to_vec())
        }
    }
}
