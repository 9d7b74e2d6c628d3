//! Direct snapshot capture.
//!
//! Paints the display list straight onto an RGBA canvas: opaque fills through
//! imageproc, glyphs rasterized by swash, and `<img>` sources decoded and
//! scaled by the `image` crate. Everything is composited source-over.

use std::sync::Arc;

use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use card_render::{DisplayItem, Rect};
use card_style::Color;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::shape::ShapeContext;
use swash::zeno::{Format, Vector};

use crate::error::CaptureError;
use crate::fonts::{FontBundle, FontData, select_font};
use crate::strategy::{CaptureStrategy, CaptureTarget, Raster};

/// Paints the display list without an intermediate document.
#[derive(Debug)]
pub struct SnapshotCapture {
    fonts: Arc<FontBundle>,
}

impl SnapshotCapture {
    #[must_use]
    pub fn new(fonts: Arc<FontBundle>) -> Self {
        Self { fonts }
    }
}

impl CaptureStrategy for SnapshotCapture {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn capture(&self, target: &CaptureTarget) -> Result<Raster, CaptureError> {
        let fonts = self.fonts.load()?;
        if target.display_list.has_text() && fonts.is_empty() {
            return Err(CaptureError::Fonts(
                "snapshot capture needs at least one bundled font".to_owned(),
            ));
        }

        let (width, height) = target.pixel_size()?;
        let mut painter = Painter {
            canvas: RgbaImage::new(width, height),
            scale: target.scale,
            fonts: &fonts,
            scale_context: ScaleContext::new(),
            shape_context: ShapeContext::new(),
        };
        for item in &target.display_list.items {
            painter.paint(item);
        }
        Raster::encode(&painter.canvas)
    }
}

struct Painter<'a> {
    canvas: RgbaImage,
    scale: f32,
    fonts: &'a [FontData],
    scale_context: ScaleContext,
    shape_context: ShapeContext,
}

impl Painter<'_> {
    fn paint(&mut self, item: &DisplayItem) {
        match item {
            DisplayItem::Fill { rect, color } => self.fill(rect, *color),
            DisplayItem::Text {
                x,
                baseline,
                text,
                font_family,
                font_size,
                bold,
                color,
            } => {
                if let Some(font) = select_font(self.fonts, font_family, *bold) {
                    self.text(font, text, *x, *baseline, *font_size, *bold, *color);
                }
            }
            DisplayItem::Image { rect, src } => match decode_image(src) {
                Some(image) => self.image(rect, &image),
                None => tracing::warn!(src = %truncate(src), "Skipping undecodable image"),
            },
        }
    }

    /// Device-pixel bounds of `rect`, clipped to the canvas.
    fn device_rect(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        let clip = |v: f32, max: u32| (v * self.scale).round().clamp(0.0, max as f32) as u32;
        let (w, h) = self.canvas.dimensions();
        let x0 = clip(rect.x, w);
        let y0 = clip(rect.y, h);
        let x1 = clip(rect.x + rect.width, w);
        let y1 = clip(rect.y + rect.height, h);
        (x1 > x0 && y1 > y0).then_some((x0, y0, x1 - x0, y1 - y0))
    }

    fn fill(&mut self, rect: &Rect, color: Color) {
        if color.is_transparent() {
            return;
        }
        let Some((x, y, w, h)) = self.device_rect(rect) else {
            return;
        };
        if color.a == 0xff {
            draw_filled_rect_mut(
                &mut self.canvas,
                imageproc::rect::Rect::at(x as i32, y as i32).of_size(w, h),
                Rgba([color.r, color.g, color.b, 0xff]),
            );
            return;
        }
        let opacity = color.opacity();
        for py in y..y + h {
            for px in x..x + w {
                blend(self.canvas.get_pixel_mut(px, py), [color.r, color.g, color.b], opacity);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        font: &FontData,
        text: &str,
        x: f32,
        baseline: f32,
        font_size: f32,
        bold: bool,
        color: Color,
    ) {
        let Some(font_ref) = font.font_ref() else {
            return;
        };
        let size = font_size * self.scale;
        let weight: f32 = if bold { 700.0 } else { 400.0 };

        let mut shaper = self
            .shape_context
            .builder(font_ref)
            .size(size)
            .variations(&[("wght", weight)])
            .build();
        shaper.add_str(text);

        let mut scaler = self
            .scale_context
            .builder(font_ref)
            .size(size)
            .variations(&[("wght", weight)])
            .build();

        let canvas = &mut self.canvas;
        let mut pen_x = x * self.scale;
        let pen_y = baseline * self.scale;
        let rgb = [color.r, color.g, color.b];
        let opacity = color.opacity();

        shaper.shape_with(|cluster| {
            for glyph in cluster.glyphs {
                let rendered = Render::new(&[
                    Source::ColorOutline(0),
                    Source::ColorBitmap(StrikeWith::BestFit),
                    Source::Outline,
                ])
                .format(Format::Alpha)
                .offset(Vector::new(glyph.x, glyph.y))
                .render(&mut scaler, glyph.id);

                if let Some(glyph_image) = rendered {
                    let placement = glyph_image.placement;
                    let origin_x = (pen_x + placement.left as f32) as i32;
                    let origin_y = (pen_y - placement.top as f32) as i32;
                    let stride = match glyph_image.content {
                        Content::Color | Content::SubpixelMask => 4,
                        Content::Mask => 1,
                    };
                    for py in 0..placement.height {
                        for px in 0..placement.width {
                            let idx = (py * placement.width + px) as usize * stride;
                            let coverage = match glyph_image.content {
                                Content::Color => glyph_image.data.get(idx + 3),
                                _ => glyph_image.data.get(idx),
                            };
                            let Some(&coverage) = coverage else { continue };
                            if coverage == 0 {
                                continue;
                            }
                            let dx = origin_x + px as i32;
                            let dy = origin_y + py as i32;
                            if dx < 0 || dy < 0 || dx as u32 >= canvas.width() || dy as u32 >= canvas.height() {
                                continue;
                            }
                            let alpha = f32::from(coverage) / 255.0 * opacity;
                            blend(canvas.get_pixel_mut(dx as u32, dy as u32), rgb, alpha);
                        }
                    }
                }
                pen_x += glyph.advance;
            }
        });
    }

    fn image(&mut self, rect: &Rect, image: &DynamicImage) {
        let Some((x, y, w, h)) = self.device_rect(rect) else {
            return;
        };
        let scaled = image::imageops::resize(&image.to_rgba8(), w, h, FilterType::Triangle);
        for (px, py, pixel) in scaled.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            if a > 0 {
                blend(
                    self.canvas.get_pixel_mut(x + px, y + py),
                    [r, g, b],
                    f32::from(a) / 255.0,
                );
            }
        }
    }
}

/// Composite `rgb` at `alpha` over `dst` (straight alpha).
fn blend(dst: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    let dst_alpha = f32::from(dst[3]) / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return;
    }
    for (channel, src) in rgb.into_iter().enumerate() {
        let value = (f32::from(src) * alpha + f32::from(dst[channel]) * dst_alpha * (1.0 - alpha))
            / out_alpha;
        dst[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round() as u8;
}

/// Decode a data URI or a local image path.
fn decode_image(src: &str) -> Option<DynamicImage> {
    let Some(rest) = src.strip_prefix("data:") else {
        return image::open(src).ok();
    };
    let (meta, payload) = rest.split_once(',')?;
    let bytes = if meta.ends_with(";base64") {
        BASE64_STANDARD.decode(payload.trim()).ok()?
    } else {
        payload.as_bytes().to_vec()
    };
    image::load_from_memory(&bytes).ok()
}

fn truncate(src: &str) -> &str {
    src.char_indices().nth(64).map_or(src, |(end, _)| &src[..end])
}

#[cfg(test)]
mod tests {
    use card_render::{DisplayList, Viewport, parse_markup};

    use super::*;

    fn bundle() -> Arc<FontBundle> {
        Arc::new(FontBundle::new(Vec::new(), Vec::new(), None, false))
    }

    fn target(items: Vec<DisplayItem>, viewport: Viewport, scale: f32) -> CaptureTarget {
        CaptureTarget {
            tree: Arc::new(parse_markup("<div/>").unwrap()),
            display_list: Arc::new(DisplayList { viewport, items }),
            viewport,
            scale,
        }
    }

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    fn decode(raster: &Raster) -> RgbaImage {
        image::load_from_memory(&raster.png).unwrap().to_rgba8()
    }

    #[test]
    fn test_fills_and_transparent_background() {
        let items = vec![DisplayItem::Fill {
            rect: rect(0.0, 0.0, 10.0, 20.0),
            color: Color::rgb(0, 0x80, 0),
        }];
        let raster = SnapshotCapture::new(bundle())
            .capture(&target(items, Viewport::new(20, 20), 1.0))
            .unwrap();

        let image = decode(&raster);
        assert_eq!(image.dimensions(), (20, 20));
        assert_eq!(image.get_pixel(5, 5).0, [0, 0x80, 0, 0xff]);
        assert_eq!(image.get_pixel(15, 5).0[3], 0);
    }

    #[test]
    fn test_translucent_fill_blends() {
        let items = vec![
            DisplayItem::Fill {
                rect: rect(0.0, 0.0, 4.0, 4.0),
                color: Color::WHITE,
            },
            DisplayItem::Fill {
                rect: rect(0.0, 0.0, 4.0, 4.0),
                color: Color {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: 0x80,
                },
            },
        ];
        let raster = SnapshotCapture::new(bundle())
            .capture(&target(items, Viewport::new(4, 4), 1.0))
            .unwrap();

        assert_eq!(decode(&raster).get_pixel(1, 1).0, [0x7f, 0x7f, 0x7f, 0xff]);
    }

    #[test]
    fn test_scale_applies_to_geometry() {
        let items = vec![DisplayItem::Fill {
            rect: rect(5.0, 0.0, 5.0, 10.0),
            color: Color::rgb(0xff, 0, 0),
        }];
        let raster = SnapshotCapture::new(bundle())
            .capture(&target(items, Viewport::new(10, 10), 2.0))
            .unwrap();

        assert_eq!((raster.width, raster.height), (20, 20));
        let image = decode(&raster);
        assert_eq!(image.get_pixel(9, 5).0[3], 0);
        assert_eq!(image.get_pixel(10, 5).0, [0xff, 0, 0, 0xff]);
    }

    #[test]
    fn test_data_uri_image_drawn() {
        let source = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0xff, 0xff]));
        let png = Raster::encode(&source).unwrap().png;
        let src = format!("data:image/png;base64,{}", BASE64_STANDARD.encode(&png));

        let items = vec![DisplayItem::Image {
            rect: rect(2.0, 2.0, 4.0, 4.0),
            src,
        }];
        let raster = SnapshotCapture::new(bundle())
            .capture(&target(items, Viewport::new(8, 8), 1.0))
            .unwrap();

        let image = decode(&raster);
        let [r, g, b, a] = image.get_pixel(3, 3).0;
        assert_eq!((r, g, a), (0, 0, 0xff));
        assert!(b >= 0xfe, "blue channel {b}");
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_broken_image_skipped() {
        let items = vec![DisplayItem::Image {
            rect: rect(0.0, 0.0, 4.0, 4.0),
            src: "data:image/png;base64,not-base64!".to_owned(),
        }];
        let raster = SnapshotCapture::new(bundle())
            .capture(&target(items, Viewport::new(4, 4), 1.0))
            .unwrap();
        assert_eq!(decode(&raster).get_pixel(1, 1).0[3], 0);
    }

    #[test]
    fn test_huge_viewport_is_an_error() {
        let err = SnapshotCapture::new(bundle())
            .capture(&target(Vec::new(), Viewport::new(u32::MAX, u32::MAX), 1.0))
            .unwrap_err();
        assert!(matches!(err, CaptureError::TooLarge { .. }), "{err:?}");
    }

    #[test]
    fn test_text_requires_font() {
        let items = vec![DisplayItem::Text {
            x: 0.0,
            baseline: 12.0,
            text: "Hello".to_owned(),
            font_family: "Arial".to_owned(),
            font_size: 16.0,
            bold: false,
            color: Color::BLACK,
        }];
        let err = SnapshotCapture::new(bundle())
            .capture(&target(items, Viewport::new(40, 20), 1.0))
            .unwrap_err();
        assert!(matches!(err, CaptureError::Fonts(ref m) if m.contains("bundled font")));
    }

    #[test]
    fn test_blend_over_transparent() {
        let mut pixel = Rgba([0, 0, 0, 0]);
        blend(&mut pixel, [0xff, 0, 0], 0.5);
        assert_eq!(pixel.0, [0xff, 0, 0, 0x80]);
    }
}
