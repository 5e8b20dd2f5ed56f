//! Image XObjects.
//!
//! Two payload kinds are supported:
//!
//! - **JPEG**: passed through untouched under `DCTDecode`
//! - **Raw samples** (gray, RGB or CMYK): compressed with `FlateDecode`
//!   when the file is written
//!
//! PNG input is decoded with the `image` crate into raw samples; an alpha
//! channel becomes a separate `/SMask` image.

use crate::dict;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Filter, Object, Stream};
use bytes::Bytes;
use std::path::Path;

/// Color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
    /// CMYK color (4 components per pixel)
    DeviceCMYK,
}

impl ColorSpace {
    /// Get the number of color components.
    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
        }
    }

    /// Get the PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// How the payload of an image is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// JPEG bytes (DCTDecode)
    Jpeg,
    /// Uncompressed samples, deflated at write time
    Raw,
}

/// Image data for PDF embedding.
#[derive(Debug, Clone)]
pub struct ImageData {
    width: u32,
    height: u32,
    bits_per_component: u8,
    color_space: ColorSpace,
    encoding: ImageEncoding,
    data: Bytes,
    soft_mask: Option<Bytes>,
}

impl ImageData {
    /// Wrap raw samples.
    ///
    /// The buffer must hold exactly `width * height * components` samples
    /// at the given bit depth, with rows padded to whole bytes.
    pub fn from_raw(
        width: u32,
        height: u32,
        bits_per_component: u8,
        color_space: ColorSpace,
        data: impl Into<Bytes>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!("image size {}x{} is empty", width, height)));
        }
        if !matches!(bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(Error::InvalidArgument(format!(
                "unsupported bits per component: {}",
                bits_per_component
            )));
        }
        let data: Bytes = data.into();
        let row_bits = width as usize * color_space.components() as usize * bits_per_component as usize;
        let expected = row_bits.div_ceil(8) * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "expected {} bytes of {} samples, got {}",
                expected,
                color_space.pdf_name(),
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            bits_per_component,
            color_space,
            encoding: ImageEncoding::Raw,
            data,
            soft_mask: None,
        })
    }

    /// Wrap JPEG bytes; dimensions and components come from the SOF header.
    pub fn from_jpeg(data: impl Into<Bytes>) -> Result<Self> {
        let data: Bytes = data.into();
        let (width, height, bits, color_space) = parse_jpeg_header(&data)?;
        Ok(Self {
            width,
            height,
            bits_per_component: bits,
            color_space,
            encoding: ImageEncoding::Jpeg,
            data,
            soft_mask: None,
        })
    }

    /// Decode a PNG into raw samples.
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .map_err(|e| Error::Resource(format!("failed to decode PNG: {}", e)))?;
        Ok(Self::from_dynamic(img))
    }

    fn from_dynamic(img: image::DynamicImage) -> Self {
        use image::GenericImageView;

        let (width, height) = img.dimensions();
        let (color_space, pixels, alpha) = match img.color() {
            image::ColorType::L8 | image::ColorType::L16 => {
                (ColorSpace::DeviceGray, img.to_luma8().into_raw(), None)
            },
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = img.to_luma_alpha8();
                let gray = la.pixels().map(|p| p.0[0]).collect::<Vec<u8>>();
                let alpha = la.pixels().map(|p| p.0[1]).collect::<Vec<u8>>();
                (ColorSpace::DeviceGray, gray, Some(alpha))
            },
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = img.to_rgba8();
                let rgb = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect::<Vec<u8>>();
                let alpha = rgba.pixels().map(|p| p.0[3]).collect::<Vec<u8>>();
                (ColorSpace::DeviceRGB, rgb, Some(alpha))
            },
            _ => (ColorSpace::DeviceRGB, img.to_rgb8().into_raw(), None),
        };
        // Fully opaque alpha channels are dropped.
        let alpha = alpha.filter(|a| a.iter().any(|&v| v != 255));
        Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            encoding: ImageEncoding::Raw,
            data: Bytes::from(pixels),
            soft_mask: alpha.map(Bytes::from),
        }
    }

    /// Load an image from bytes, detecting JPEG or PNG by signature.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.starts_with(&[0xFF, 0xD8]) {
            return Self::from_jpeg(data.to_vec());
        }
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            return Self::from_png(data);
        }
        Err(Error::Resource("unsupported image format".to_string()))
    }

    /// Load an image from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::Resource(format!("cannot read image {}: {}", path.display(), e)))?;
        Self::from_bytes(&data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color space of the samples.
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Payload kind.
    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    /// Whether an alpha channel is attached.
    pub fn has_soft_mask(&self) -> bool {
        self.soft_mask.is_some()
    }

    /// Get the aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Build the Image XObject stream, without `/SMask`.
    pub fn to_stream(&self) -> Stream {
        let mut dict = dict! {
            "Type" => Object::name("XObject"),
            "Subtype" => Object::name("Image"),
            "Width" => self.width,
            "Height" => self.height,
            "ColorSpace" => Object::name(self.color_space.pdf_name()),
            "BitsPerComponent" => self.bits_per_component as i64,
        };
        match self.encoding {
            ImageEncoding::Jpeg => {
                if self.color_space == ColorSpace::DeviceCMYK {
                    // Adobe CMYK JPEGs are stored inverted.
                    dict.insert(
                        "Decode".to_string(),
                        Object::Array([1, 0, 1, 0, 1, 0, 1, 0].iter().map(|&v| Object::Integer(v)).collect()),
                    );
                }
                Stream::encoded(dict, self.data.clone(), vec![Filter::DCTDecode])
            },
            ImageEncoding::Raw => Stream::with_filters(dict, self.data.clone(), vec![Filter::FlateDecode]),
        }
    }

    /// Build the soft mask stream, if the image has an alpha channel.
    pub fn soft_mask_stream(&self) -> Option<Stream> {
        self.soft_mask.as_ref().map(|mask| {
            let dict: Dictionary = dict! {
                "Type" => Object::name("XObject"),
                "Subtype" => Object::name("Image"),
                "Width" => self.width,
                "Height" => self.height,
                "ColorSpace" => Object::name("DeviceGray"),
                "BitsPerComponent" => 8,
            };
            Stream::with_filters(dict, mask.clone(), vec![Filter::FlateDecode])
        })
    }
}

/// Parse a JPEG SOF header: (width, height, bits per component, color space).
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, u8, ColorSpace)> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(Error::Resource("not a JPEG stream".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        pos += 2;

        if marker == 0xFF || marker == 0x00 || (0xD0..=0xD7).contains(&marker) {
            continue;
        }

        // Start-of-frame markers (C4, C8 and CC are DHT, JPG and DAC).
        if matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let header = data
                .get(pos..pos + 8)
                .ok_or_else(|| Error::Resource("truncated JPEG header".to_string()))?;
            let bits = header[2];
            let height = u16::from_be_bytes([header[3], header[4]]) as u32;
            let width = u16::from_be_bytes([header[5], header[6]]) as u32;
            let color_space = match header[7] {
                1 => ColorSpace::DeviceGray,
                3 => ColorSpace::DeviceRGB,
                4 => ColorSpace::DeviceCMYK,
                n => return Err(Error::Resource(format!("unsupported JPEG component count {}", n))),
            };
            return Ok((width, height, bits, color_space));
        }

        let length = data
            .get(pos..pos + 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
            .ok_or_else(|| Error::Resource("truncated JPEG segment".to_string()))?;
        pos += length;
    }

    Err(Error::Resource("JPEG has no frame header".to_string()))
}
