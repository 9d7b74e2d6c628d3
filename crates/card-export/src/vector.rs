//! Vector capture.
//!
//! The display list is written out as a standalone SVG document, the bundled
//! fonts are handed to the SVG font database, and resvg rasterizes the result
//! at the requested scale.

use std::fmt::Write as _;
use std::sync::Arc;

use card_render::{DisplayItem, DisplayList, Rect};
use card_style::Color;
use image::RgbaImage;
use quick_xml::escape::escape;
use resvg::tiny_skia::{self, Pixmap};
use resvg::usvg::{Options, Tree};

use crate::error::CaptureError;
use crate::fonts::{FontBundle, FontData};
use crate::strategy::{CaptureStrategy, CaptureTarget, Raster};

/// A self-contained vector rendition of the preview.
#[derive(Debug, Clone)]
pub struct VectorDocument {
    pub svg: String,
    pub fonts: Arc<[FontData]>,
}

impl VectorDocument {
    #[must_use]
    pub fn build(list: &DisplayList, fonts: Arc<[FontData]>) -> Self {
        let (width, height) = (list.viewport.width, list.viewport.height);
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        for item in &list.items {
            svg.push('\n');
            write_item(&mut svg, item);
        }
        svg.push_str("\n</svg>\n");
        Self { svg, fonts }
    }

    /// Rasterize into a `width` x `height` buffer, scaling CSS pixels by
    /// `scale`.
    pub fn rasterize(
        &self,
        width: u32,
        height: u32,
        scale: f32,
        system_fonts: bool,
    ) -> Result<RgbaImage, CaptureError> {
        let mut options = Options::default();
        for font in self.fonts.iter() {
            options.fontdb_mut().load_font_data(font.data.to_vec());
        }
        if system_fonts {
            options.fontdb_mut().load_system_fonts();
        }
        if let Some(family) = self.fonts.iter().find_map(FontData::family) {
            options.fontdb_mut().set_sans_serif_family(family.clone());
            options.font_family = family;
        }

        let tree = Tree::from_data(self.svg.as_bytes(), &options)
            .map_err(|e| CaptureError::Rasterize(e.to_string()))?;
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            CaptureError::Rasterize(format!("cannot allocate a {width}x{height} pixmap"))
        })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        // tiny-skia stores premultiplied alpha
        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let c = pixel.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| CaptureError::Rasterize("pixel buffer size mismatch".to_owned()))
    }
}

fn write_item(svg: &mut String, item: &DisplayItem) {
    match item {
        DisplayItem::Fill { rect, color } => {
            svg.push_str("<rect ");
            write_rect(svg, rect);
            write_paint(svg, *color);
            svg.push_str("/>");
        }
        DisplayItem::Text {
            x,
            baseline,
            text,
            font_family,
            font_size,
            bold,
            color,
        } => {
            let weight = if *bold { "bold" } else { "normal" };
            let _ = write!(
                svg,
                r#"<text x="{x}" y="{baseline}" font-family="{}, sans-serif" font-size="{font_size}" font-weight="{weight}" "#,
                escape(font_family.as_str()),
            );
            write_paint(svg, *color);
            svg.push_str(r#"xml:space="preserve">"#);
            svg.push_str(&escape(text.as_str()));
            svg.push_str("</text>");
        }
        DisplayItem::Image { rect, src } => {
            svg.push_str("<image ");
            write_rect(svg, rect);
            let _ = write!(
                svg,
                r#"preserveAspectRatio="none" xlink:href="{}"/>"#,
                escape(src.as_str())
            );
        }
    }
}

fn write_rect(svg: &mut String, rect: &Rect) {
    let _ = write!(
        svg,
        r#"x="{}" y="{}" width="{}" height="{}" "#,
        rect.x, rect.y, rect.width, rect.height
    );
}

fn write_paint(svg: &mut String, color: Color) {
    let _ = write!(svg, r##"fill="#{:02x}{:02x}{:02x}" "##, color.r, color.g, color.b);
    if color.a != 0xff {
        let _ = write!(svg, r#"fill-opacity="{}" "#, color.opacity());
    }
}

/// Rasterizes a vector rendition of the display list.
#[derive(Debug)]
pub struct VectorCapture {
    fonts: Arc<FontBundle>,
}

impl VectorCapture {
    #[must_use]
    pub fn new(fonts: Arc<FontBundle>) -> Self {
        Self { fonts }
    }
}

impl CaptureStrategy for VectorCapture {
    fn name(&self) -> &'static str {
        "vector"
    }

    fn capture(&self, target: &CaptureTarget) -> Result<Raster, CaptureError> {
        let fonts = self.fonts.load()?;
        if target.display_list.has_text() && fonts.is_empty() && !self.fonts.system() {
            return Err(CaptureError::Fonts(
                "no fonts available to draw text".to_owned(),
            ));
        }

        let document = VectorDocument::build(&target.display_list, fonts);
        let (width, height) = target.pixel_size()?;
        let image = document.rasterize(width, height, target.scale, self.fonts.system())?;
        Raster::encode(&image)
    }
}

#[cfg(test)]
mod tests {
    use card_render::{Viewport, VisualTree, parse_markup};

    use super::*;

    fn target(list: DisplayList, scale: f32) -> CaptureTarget {
        let tree: VisualTree = parse_markup("<div/>").unwrap();
        CaptureTarget {
            tree: Arc::new(tree),
            viewport: list.viewport,
            display_list: Arc::new(list),
            scale,
        }
    }

    fn fill_list() -> DisplayList {
        DisplayList {
            viewport: Viewport::new(40, 20),
            items: vec![
                DisplayItem::Fill {
                    rect: Rect {
                        x: 0.0,
                        y: 0.0,
                        width: 40.0,
                        height: 20.0,
                    },
                    color: Color::rgb(0xff, 0, 0),
                },
                DisplayItem::Fill {
                    rect: Rect {
                        x: 20.0,
                        y: 0.0,
                        width: 20.0,
                        height: 20.0,
                    },
                    color: Color::rgb(0, 0, 0xff),
                },
            ],
        }
    }

    fn text_list() -> DisplayList {
        DisplayList {
            viewport: Viewport::new(100, 40),
            items: vec![DisplayItem::Text {
                x: 4.0,
                baseline: 20.0,
                text: "Fish & <Chips>".to_owned(),
                font_family: "Times New Roman".to_owned(),
                font_size: 16.0,
                bold: true,
                color: Color::BLACK,
            }],
        }
    }

    #[test]
    fn test_svg_document() {
        let mut list = text_list();
        list.items.push(DisplayItem::Image {
            rect: Rect {
                x: 0.0,
                y: 24.0,
                width: 16.0,
                height: 16.0,
            },
            src: "data:image/png;base64,AAAA".to_owned(),
        });
        let document = VectorDocument::build(&list, Vec::new().into());

        assert!(document.svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(document.svg.contains(r#"width="100" height="40" viewBox="0 0 100 40""#));
        assert!(document.svg.contains(
            r##"<text x="4" y="20" font-family="Times New Roman, sans-serif" font-size="16" font-weight="bold" fill="#000000" xml:space="preserve">Fish &amp; &lt;Chips&gt;</text>"##
        ));
        assert!(document.svg.contains(
            r#"<image x="0" y="24" width="16" height="16" preserveAspectRatio="none" xlink:href="data:image/png;base64,AAAA"/>"#
        ));
    }

    #[test]
    fn test_translucent_fill_opacity() {
        let list = DisplayList {
            viewport: Viewport::new(10, 10),
            items: vec![DisplayItem::Fill {
                rect: Rect {
                    x: 0.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                },
                color: Color {
                    r: 0,
                    g: 0,
                    b: 0,
                    a: 0x80,
                },
            }],
        };
        let document = VectorDocument::build(&list, Vec::new().into());
        assert!(document.svg.contains(r##"fill="#000000" fill-opacity="0.50"##));
    }

    #[test]
    fn test_capture_fills() {
        let capture = VectorCapture::new(Arc::new(FontBundle::new(Vec::new(), Vec::new(), None, false)));
        let raster = capture.capture(&target(fill_list(), 1.0)).unwrap();

        assert_eq!((raster.width, raster.height), (40, 20));
        let image = image::load_from_memory(&raster.png).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (40, 20));
        assert_eq!(image.get_pixel(5, 10).0, [0xff, 0, 0, 0xff]);
        assert_eq!(image.get_pixel(35, 10).0, [0, 0, 0xff, 0xff]);
    }

    #[test]
    fn test_capture_scales_output() {
        let capture = VectorCapture::new(Arc::new(FontBundle::new(Vec::new(), Vec::new(), None, false)));
        let raster = capture.capture(&target(fill_list(), 2.0)).unwrap();

        assert_eq!((raster.width, raster.height), (80, 40));
        let image = image::load_from_memory(&raster.png).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(70, 20).0, [0, 0, 0xff, 0xff]);
    }

    #[test]
    fn test_text_without_fonts_rejected() {
        let capture = VectorCapture::new(Arc::new(FontBundle::new(Vec::new(), Vec::new(), None, false)));
        let err = capture.capture(&target(text_list(), 1.0)).unwrap_err();
        assert!(matches!(err, CaptureError::Fonts(_)));
    }
}
