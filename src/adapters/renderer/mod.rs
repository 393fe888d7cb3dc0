//! Document rendering abstraction
//!
//! One renderer instance holds one rendering session for the lifetime of one
//! export. `render` takes `&mut self`, so documents for an export are
//! strictly sequential by construction: the session's content is overwritten
//! by each call and a shared session would bleed state between documents.

pub mod chromium;

use crate::domain::Result;
use async_trait::async_trait;
use std::path::Path;

pub use chromium::ChromiumRenderer;

/// Converts one HTML document at a time into a paginated PDF
#[async_trait]
pub trait DocumentRenderer: Send {
    /// Renders `html` into a paginated document at `output`
    ///
    /// # Errors
    ///
    /// Returns `RenderFailed` on engine or content errors, including a
    /// render exceeding its deadline. Any render failure is fatal to the
    /// export that issued it.
    async fn render(&mut self, html: &str, output: &Path) -> Result<()>;
}
