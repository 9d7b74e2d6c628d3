//! Capture through an external rendering service.

use card_remote::{RemoteRenderClient, png_dimensions};

use crate::error::CaptureError;
use crate::strategy::{CaptureStrategy, CaptureTarget, Raster};

/// Sends the preview markup to a rendering service.
#[derive(Debug, Clone)]
pub struct RemoteCapture {
    client: RemoteRenderClient,
    css: String,
}

impl RemoteCapture {
    /// `css` is sent alongside every request.
    #[must_use]
    pub fn new(client: RemoteRenderClient, css: impl Into<String>) -> Self {
        Self {
            client,
            css: css.into(),
        }
    }
}

impl CaptureStrategy for RemoteCapture {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn capture(&self, target: &CaptureTarget) -> Result<Raster, CaptureError> {
        let (width, height) = target.pixel_size()?;
        let png = self
            .client
            .render(&target.tree.to_markup(), &self.css, width, height)?;
        let (width, height) = png_dimensions(&png).unwrap_or((width, height));
        Ok(Raster { png, width, height })
    }
}
