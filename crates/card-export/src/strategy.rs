//! The capture contract shared by every backend.

use std::io::Cursor;
use std::sync::Arc;

use card_config::MAX_EXPORT_PIXELS;
use card_render::{DisplayList, MountedPreview, Viewport, VisualTree};
use image::{ImageFormat, RgbaImage};

use crate::error::CaptureError;

/// Everything a strategy may read about the mounted preview.
#[derive(Debug, Clone)]
pub struct CaptureTarget {
    pub tree: Arc<VisualTree>,
    pub display_list: Arc<DisplayList>,
    pub viewport: Viewport,
    /// Device pixels per CSS pixel.
    pub scale: f32,
}

impl CaptureTarget {
    /// Snapshot the current state of a mounted preview.
    #[must_use]
    pub fn from_preview(preview: &MountedPreview, scale: f32) -> Self {
        Self {
            tree: preview.tree(),
            display_list: preview.display_list(),
            viewport: preview.viewport(),
            scale,
        }
    }

    /// Output size in device pixels, at least 1x1.
    ///
    /// Sizes above [`MAX_EXPORT_PIXELS`] are rejected before anything is
    /// allocated.
    pub fn pixel_size(&self) -> Result<(u32, u32), CaptureError> {
        let scaled = |v: u32| (f64::from(v) * f64::from(self.scale)).round().max(1.0) as u64;
        let (width, height) = (scaled(self.viewport.width), scaled(self.viewport.height));
        if width.saturating_mul(height) > MAX_EXPORT_PIXELS {
            return Err(CaptureError::TooLarge { width, height });
        }
        Ok((width as u32, height as u32))
    }
}

/// A PNG produced by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Raster {
    /// Encode an RGBA buffer as PNG.
    pub fn encode(image: &RgbaImage) -> Result<Self, CaptureError> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            png,
            width: image.width(),
            height: image.height(),
        })
    }
}

/// One way of turning the preview into pixels.
pub trait CaptureStrategy: Send + Sync {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &'static str;

    fn capture(&self, target: &CaptureTarget) -> Result<Raster, CaptureError>;
}
