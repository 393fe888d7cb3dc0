//! Headless Chromium renderer
//!
//! Drives one browser with one reusable tab per renderer instance. Each call
//! loads the document through a base64 `data:` URL and prints it to PDF with
//! A4 paper and fixed margins. Chromium's CDP calls are blocking, so they run
//! on the blocking pool with a deadline converting hangs into `RenderFailed`.

use crate::adapters::renderer::DocumentRenderer;
use crate::config::RendererConfig;
use crate::domain::{ExportError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// A4 in inches; margins match the portal's original export (70px/50px at 96dpi).
const PAPER_WIDTH_IN: f64 = 8.27;
const PAPER_HEIGHT_IN: f64 = 11.69;
const MARGIN_VERTICAL_IN: f64 = 70.0 / 96.0;
const MARGIN_HORIZONTAL_IN: f64 = 50.0 / 96.0;

fn pdf_options() -> PrintToPdfOptions {
    PrintToPdfOptions {
        paper_width: Some(PAPER_WIDTH_IN),
        paper_height: Some(PAPER_HEIGHT_IN),
        margin_top: Some(MARGIN_VERTICAL_IN),
        margin_bottom: Some(MARGIN_VERTICAL_IN),
        margin_left: Some(MARGIN_HORIZONTAL_IN),
        margin_right: Some(MARGIN_HORIZONTAL_IN),
        print_background: Some(true),
        ..Default::default()
    }
}

/// Renderer over a single headless Chromium session
pub struct ChromiumRenderer {
    // The browser must outlive the tab; dropping it ends the session.
    _browser: Browser,
    tab: Arc<Tab>,
    deadline: Duration,
}

impl ChromiumRenderer {
    /// Launches a browser and opens the session tab
    ///
    /// # Errors
    ///
    /// Returns `RenderFailed` if the browser cannot be launched or the tab
    /// cannot be opened.
    pub fn launch(config: &RendererConfig) -> Result<Self> {
        let options = LaunchOptions {
            headless: true,
            sandbox: false,
            path: config.chrome_path.as_ref().map(PathBuf::from),
            // The tab sits idle between exports; keep the browser alive
            // well past the per-document deadline.
            idle_browser_timeout: Duration::from_secs(600),
            ..Default::default()
        };

        let browser = Browser::new(options)
            .map_err(|e| ExportError::RenderFailed(format!("failed to launch browser: {e}")))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ExportError::RenderFailed(format!("failed to open session tab: {e}")))?;

        tracing::debug!(
            timeout_secs = config.render_timeout_secs,
            "Chromium rendering session ready"
        );

        Ok(Self {
            _browser: browser,
            tab,
            deadline: Duration::from_secs(config.render_timeout_secs),
        })
    }
}

#[async_trait]
impl DocumentRenderer for ChromiumRenderer {
    async fn render(&mut self, html: &str, output: &Path) -> Result<()> {
        let tab = Arc::clone(&self.tab);
        let url = format!("data:text/html;base64,{}", BASE64.encode(html));

        let render = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            tab.navigate_to(&url)
                .and_then(|tab| tab.wait_until_navigated())
                .map_err(|e| ExportError::RenderFailed(format!("navigation failed: {e}")))?;
            tab.print_to_pdf(Some(pdf_options()))
                .map_err(|e| ExportError::RenderFailed(format!("print to PDF failed: {e}")))
        });

        let bytes = match tokio::time::timeout(self.deadline, render).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_err)) => {
                return Err(ExportError::RenderFailed(format!(
                    "render task failed: {join_err}"
                )))
            }
            Err(_) => {
                return Err(ExportError::RenderFailed(format!(
                    "render exceeded deadline of {}s",
                    self.deadline.as_secs()
                )))
            }
        };

        tokio::fs::write(output, &bytes)
            .await
            .map_err(|e| ExportError::RenderFailed(format!("writing {}: {e}", output.display())))?;

        tracing::debug!(output = %output.display(), bytes = bytes.len(), "Rendered document");
        Ok(())
    }
}
