use crate::error::{Error, Result};
use crate::geometry::{Rect, Size};
use crate::layout::{LayoutBox, LayoutElement};
use crate::page::Page;
use crate::writer::{ColorSpace, ContentStreamBuilder, ImageData};
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;

/// A raster image, painted as an XObject scaled to its display size.
///
/// The display size defaults to the pixel size, one point per pixel.
/// Pixel data is shared: cloning an `Image` or painting it on several
/// pages embeds the raster once per page that uses it.
#[derive(Debug, Clone)]
pub struct Image {
    layout: LayoutBox,
    data: Arc<ImageData>,
    size: Size,
}

impl Image {
    /// Wrap already decoded image data.
    pub fn new(data: impl Into<Arc<ImageData>>) -> Self {
        let data = data.into();
        let size = Size::new(data.width() as f32, data.height() as f32);
        Self {
            layout: LayoutBox::default(),
            data,
            size,
        }
    }

    /// JPEG bytes, embedded as-is with `DCTDecode`.
    pub fn from_jpeg(data: impl Into<Bytes>) -> Result<Self> {
        Ok(Self::new(ImageData::from_jpeg(data)?))
    }

    /// Raw samples, compressed with `FlateDecode` when written.
    pub fn from_raw(
        width: u32,
        height: u32,
        bits_per_component: u8,
        color_space: ColorSpace,
        data: impl Into<Bytes>,
    ) -> Result<Self> {
        Ok(Self::new(ImageData::from_raw(width, height, bits_per_component, color_space, data)?))
    }

    /// A PNG, decoded into raw samples (alpha becomes a soft mask).
    pub fn from_png(data: &[u8]) -> Result<Self> {
        Ok(Self::new(ImageData::from_png(data)?))
    }

    /// A JPEG or PNG file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(ImageData::from_file(path)?))
    }

    /// Set the display size in points.
    pub fn with_size(mut self, width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidArgument(format!("image display size {}x{} must be positive", width, height)));
        }
        self.size = Size::new(width, height);
        self.layout.invalidate();
        Ok(self)
    }

    /// Set the display width, keeping the aspect ratio.
    pub fn with_width(self, width: f32) -> Result<Self> {
        let height = width / self.data.aspect_ratio();
        self.with_size(width, height)
    }

    /// Display size in points.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The underlying raster.
    pub fn data(&self) -> &Arc<ImageData> {
        &self.data
    }
}

impl LayoutElement for Image {
    fn layout_box(&self) -> &LayoutBox {
        &self.layout
    }

    fn layout_box_mut(&mut self) -> &mut LayoutBox {
        &mut self.layout
    }

    fn kind(&self) -> &'static str {
        "Image"
    }

    fn content_size(&self, _available: Size) -> Size {
        self.size
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        if self.size.width < self.data.width() as f32 || self.size.height < self.data.height() as f32 {
            log::debug!(
                "image of {}x{} pixels shown at {}x{} points; not resampled",
                self.data.width(),
                self.data.height(),
                self.size.width,
                self.size.height
            );
        }
        let alias = page.register_image(&self.data);
        let mut ops = ContentStreamBuilder::new();
        ops.transform(self.size.width, 0.0, 0.0, self.size.height, area.x, area.y)
            .paint_xobject(&alias);
        page.content_stream_mut().append(&ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::image_handler::tests::tiny_jpeg;

    #[test]
    fn test_default_size_is_pixel_size() {
        let image = Image::from_jpeg(tiny_jpeg(64, 32, 3)).unwrap();
        assert_eq!(image.get_size(Size::new(500.0, 500.0)), Size::new(64.0, 32.0));
    }

    #[test]
    fn test_with_width_keeps_aspect() {
        let image = Image::from_jpeg(tiny_jpeg(64, 32, 3)).unwrap().with_width(128.0).unwrap();
        assert_eq!(image.size(), Size::new(128.0, 64.0));
        assert!(Image::from_jpeg(tiny_jpeg(4, 4, 1)).unwrap().with_size(0.0, 3.0).is_err());
    }

    #[test]
    fn test_paint_emits_cm_and_do() {
        let mut page = Page::new();
        let mut image = Image::from_raw(2, 1, 8, ColorSpace::DeviceGray, vec![0u8, 255])
            .unwrap()
            .with_size(20.0, 10.0)
            .unwrap();
        image.paint(Rect::new(10.0, 10.0, 100.0, 100.0), &mut page).unwrap();
        let text = String::from_utf8_lossy(page.content_stream().as_bytes()).into_owned();
        // Top-aligned by default: the image sits at the top of the area.
        assert!(text.contains("20 0 0 10 10 100 cm\n/Im1 Do\n"), "{}", text);
        assert_eq!(page.resources().images().len(), 1);
    }

    #[test]
    fn test_same_image_registered_once() {
        let mut page = Page::new();
        let mut image = Image::from_jpeg(tiny_jpeg(8, 8, 3)).unwrap();
        let mut copy = image.clone();
        image.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        copy.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        assert_eq!(page.resources().images().len(), 1);
    }
}
