//! Page rasterization backends.

use image::{Rgba, RgbaImage};
use lopdf::{Document, Object, ObjectId};
use std::path::Path;
use std::sync::Arc;

use crate::config::ThumbnailSize;
use crate::error::{PdfUtilsError, Result};
use crate::ops::pages::{page_ids, resolve_inherited};

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

const SHEET: Rgba<u8> = Rgba([255, 255, 255, 255]);
const EDGE: Rgba<u8> = Rgba([160, 160, 160, 255]);
const RULE: Rgba<u8> = Rgba([215, 215, 215, 255]);

/// Turns the pages of a PDF into bitmaps.
///
/// Implementations are called from a blocking task, one file at a time.
pub trait PageRenderer: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Render every page of `path`, each fitted inside `bounds`.
    fn render_pages(&self, path: &Path, bounds: ThumbnailSize) -> Result<Vec<RgbaImage>>;
}

/// Size and orientation of a page in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// MediaBox width.
    pub width: f32,
    /// MediaBox height.
    pub height: f32,
    /// Clockwise rotation, normalized to 0, 90, 180 or 270.
    pub rotation: u16,
}

impl PageGeometry {
    /// Read a page's MediaBox and Rotate, following inheritance.
    pub fn of_page(doc: &Document, page_id: ObjectId) -> Self {
        let (width, height) = resolve_inherited(doc, page_id, b"MediaBox")
            .and_then(|value| dereference(doc, value))
            .and_then(|value| value.as_array().ok())
            .and_then(|rect| media_box_size(rect))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let rotation = resolve_inherited(doc, page_id, b"Rotate")
            .and_then(|value| dereference(doc, value))
            .and_then(|value| value.as_i64().ok())
            .map(|degrees| degrees.rem_euclid(360) / 90 * 90)
            .unwrap_or(0) as u16;

        Self {
            width,
            height,
            rotation,
        }
    }

    /// Width and height as displayed, after rotation.
    pub fn displayed(&self) -> (f32, f32) {
        if self.rotation % 180 == 90 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Largest pixel size with the displayed aspect ratio inside `bounds`.
    pub fn fit(&self, bounds: ThumbnailSize) -> (u32, u32) {
        let (width, height) = self.displayed();
        let scale = (bounds.width as f32 / width).min(bounds.height as f32 / height);

        let fitted_width = (width * scale).round().clamp(1.0, bounds.width as f32);
        let fitted_height = (height * scale).round().clamp(1.0, bounds.height as f32);
        (fitted_width as u32, fitted_height as u32)
    }
}

fn dereference<'a>(doc: &'a Document, value: &'a Object) -> Option<&'a Object> {
    match value {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn media_box_size(rect: &[Object]) -> Option<(f32, f32)> {
    let [x0, y0, x1, y1] = rect else {
        return None;
    };
    let coord = |object: &Object| object.as_float().ok();

    let width = (coord(x1)? - coord(x0)?).abs();
    let height = (coord(y1)? - coord(y0)?).abs();
    (width > 0.0 && height > 0.0).then_some((width, height))
}

/// Draws each page as a blank sheet with the page's proportions.
///
/// Needs nothing beyond lopdf, so it is always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineRenderer;

impl OutlineRenderer {
    /// Draw a single sheet for `geometry`.
    pub fn draw(geometry: PageGeometry, bounds: ThumbnailSize) -> RgbaImage {
        let (width, height) = geometry.fit(bounds);
        let mut sheet = RgbaImage::from_pixel(width, height, SHEET);

        // Faint text lines
        let margin = width / 8;
        let mut y = height / 8;
        while margin > 0 && y + height / 8 < height {
            for x in margin..width - margin {
                sheet.put_pixel(x, y, RULE);
            }
            y += (height / 16).max(2);
        }

        for x in 0..width {
            sheet.put_pixel(x, 0, EDGE);
            sheet.put_pixel(x, height - 1, EDGE);
        }
        for y in 0..height {
            sheet.put_pixel(0, y, EDGE);
            sheet.put_pixel(width - 1, y, EDGE);
        }

        sheet
    }
}

impl PageRenderer for OutlineRenderer {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn render_pages(&self, path: &Path, bounds: ThumbnailSize) -> Result<Vec<RgbaImage>> {
        let doc = Document::load(path)
            .map_err(|e| PdfUtilsError::thumbnail_failed(path.to_path_buf(), e.to_string()))?;

        Ok(page_ids(&doc)
            .into_iter()
            .map(|page_id| Self::draw(PageGeometry::of_page(&doc, page_id), bounds))
            .collect())
    }
}

/// Renders page content through the pdfium library.
///
/// The library is bound once, when the renderer is created.
#[cfg(feature = "pdfium")]
pub struct PdfiumRenderer {
    pdfium: pdfium_render::prelude::Pdfium,
}

#[cfg(feature = "pdfium")]
impl std::fmt::Debug for PdfiumRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumRenderer").finish_non_exhaustive()
    }
}

#[cfg(feature = "pdfium")]
impl PdfiumRenderer {
    /// Bind to pdfium next to the executable, falling back to the system library.
    ///
    /// # Errors
    ///
    /// Returns `Other` if neither library can be loaded.
    pub fn new() -> Result<Self> {
        use pdfium_render::prelude::Pdfium;

        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| PdfUtilsError::other(format!("Failed to load pdfium: {e:?}")))?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

#[cfg(feature = "pdfium")]
impl PageRenderer for PdfiumRenderer {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn render_pages(&self, path: &Path, bounds: ThumbnailSize) -> Result<Vec<RgbaImage>> {
        use pdfium_render::prelude::PdfRenderConfig;

        let failed = |reason: String| PdfUtilsError::thumbnail_failed(path.to_path_buf(), reason);

        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| failed(format!("{e:?}")))?;

        let config = PdfRenderConfig::new()
            .set_target_width(bounds.width as i32)
            .set_maximum_height(bounds.height as i32);

        let mut images = Vec::new();
        for page in document.pages().iter() {
            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| failed(format!("{e:?}")))?;

            let rendered = bitmap.as_image().to_rgba8();
            let (width, height) = (rendered.width(), rendered.height());
            let image = RgbaImage::from_raw(width, height, rendered.into_raw())
                .ok_or_else(|| failed("bitmap size mismatch".to_string()))?;
            images.push(image);
        }

        Ok(images)
    }
}

/// The best renderer available in this build.
///
/// Prefers pdfium when compiled in and loadable, otherwise draws outlines.
pub fn default_renderer() -> Arc<dyn PageRenderer> {
    #[cfg(feature = "pdfium")]
    match PdfiumRenderer::new() {
        Ok(renderer) => return Arc::new(renderer),
        Err(err) => tracing::warn!("{err}, falling back to outline thumbnails"),
    }

    Arc::new(OutlineRenderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_document, write_sample_pdf};
    use lopdf::dictionary;
    use rstest::rstest;
    use tempfile::TempDir;

    const BOUNDS: ThumbnailSize = ThumbnailSize {
        width: 150,
        height: 200,
    };

    fn geometry(width: f32, height: f32, rotation: u16) -> PageGeometry {
        PageGeometry {
            width,
            height,
            rotation,
        }
    }

    #[rstest]
    #[case(geometry(612.0, 792.0, 0), (150, 194))]
    #[case(geometry(792.0, 612.0, 0), (150, 116))]
    #[case(geometry(612.0, 792.0, 90), (150, 116))]
    #[case(geometry(100.0, 1000.0, 0), (20, 200))]
    fn test_fit_keeps_aspect(#[case] page: PageGeometry, #[case] expected: (u32, u32)) {
        assert_eq!(page.fit(BOUNDS), expected);
    }

    #[test]
    fn test_geometry_reads_rotation() {
        let mut doc = sample_document(1);
        let page_id = page_ids(&doc)[0];
        doc.get_dictionary_mut(page_id).unwrap().set("Rotate", -90);

        let page = PageGeometry::of_page(&doc, page_id);

        assert_eq!(page.rotation, 270);
        assert_eq!(page.displayed(), (792.0, 1.0));
    }

    #[test]
    fn test_geometry_defaults_without_mediabox() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! { "Type" => "Page" });

        let page = PageGeometry::of_page(&doc, page_id);

        assert_eq!((page.width, page.height), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_outline_renders_every_page() {
        let dir = TempDir::new().unwrap();
        let path = write_sample_pdf(dir.path(), "a.pdf", 3);

        let images = OutlineRenderer.render_pages(&path, BOUNDS).unwrap();

        assert_eq!(images.len(), 3);
        for image in &images {
            assert!(image.width() <= BOUNDS.width);
            assert!(image.height() <= BOUNDS.height);
        }
    }

    #[test]
    fn test_outline_tiny_sheet() {
        let sheet = OutlineRenderer::draw(geometry(1.0, 1.0, 0), ThumbnailSize { width: 1, height: 1 });
        assert_eq!(sheet.dimensions(), (1, 1));
    }

    #[test]
    fn test_outline_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        let err = OutlineRenderer.render_pages(&path, BOUNDS).unwrap_err();
        assert!(matches!(err, PdfUtilsError::ThumbnailFailed { .. }));
    }

    #[cfg(feature = "pdfium")]
    #[test]
    fn test_pdfium_renders_page_text() {
        let Ok(renderer) = PdfiumRenderer::new() else {
            eprintln!("pdfium library not installed, skipping");
            return;
        };
        let dir = TempDir::new().unwrap();
        // 601 points wide, "Document 6 page 1" set in 24pt near the top
        let path = crate::testing::write_tagged_pdf(dir.path(), "text.pdf", 1, 6);

        let images = renderer.render_pages(&path, BOUNDS).unwrap();

        assert_eq!(images.len(), 1);
        let inked = images[0]
            .pixels()
            .filter(|pixel| pixel.0[..3].iter().all(|&channel| channel < 128))
            .count();
        assert!(inked > 0, "no text pixels in the rendered page");
        assert_eq!(images[0].width(), BOUNDS.width);
    }

    #[cfg(feature = "pdfium")]
    #[test]
    fn test_default_renderer_prefers_pdfium() {
        let expected = if PdfiumRenderer::new().is_ok() {
            "pdfium"
        } else {
            "outline"
        };
        assert_eq!(default_renderer().name(), expected);
    }
}
