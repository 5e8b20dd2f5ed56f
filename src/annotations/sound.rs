use super::Common;
use crate::color::Color;
use crate::dict;
use crate::error::{Error, Result};
use crate::geometry::{Rect, Size};
use crate::object::{Object, Stream};
use crate::page::Annotation;
use bytes::Bytes;

/// Sample encoding of a sound stream (`/E`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SoundEncoding {
    /// Unsigned values
    #[default]
    Raw,
    /// Two's complement values
    Signed,
    /// μ-law
    MuLaw,
    /// A-law
    ALaw,
}

impl SoundEncoding {
    /// PDF name of the encoding.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            SoundEncoding::Raw => "Raw",
            SoundEncoding::Signed => "Signed",
            SoundEncoding::MuLaw => "muLaw",
            SoundEncoding::ALaw => "ALaw",
        }
    }
}

/// A speaker icon that plays embedded samples.
///
/// The samples are embedded as given; no transcoding takes place.
#[derive(Debug, Clone)]
pub struct SoundAnnotation {
    common: Common,
    size: Size,
    samples: Bytes,
    sample_rate: u32,
    channels: u8,
    bits_per_sample: u8,
    encoding: SoundEncoding,
}

impl SoundAnnotation {
    /// Mono 8-bit raw samples at `sample_rate` Hz, shown as a 24pt icon.
    pub fn new(samples: impl Into<Bytes>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidArgument("sound sampling rate must be positive".to_string()));
        }
        Ok(Self {
            common: Common::with_color(Color::BLACK),
            size: Size::new(24.0, 24.0),
            samples: samples.into(),
            sample_rate,
            channels: 1,
            bits_per_sample: 8,
            encoding: SoundEncoding::Raw,
        })
    }

    /// Number of interleaved channels.
    pub fn with_channels(mut self, channels: u8) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidArgument("a sound needs at least one channel".to_string()));
        }
        self.channels = channels;
        Ok(self)
    }

    /// Bits per sample value.
    pub fn with_bits_per_sample(mut self, bits: u8) -> Result<Self> {
        if !matches!(bits, 8 | 16) {
            return Err(Error::InvalidArgument(format!("unsupported bits per sample: {}", bits)));
        }
        self.bits_per_sample = bits;
        Ok(self)
    }

    /// Sample encoding.
    pub fn with_encoding(mut self, encoding: SoundEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Number of bytes of sample data.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there is no sample data.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn sound_stream(&self) -> Stream {
        let dict = dict! {
            "Type" => Object::name("Sound"),
            "R" => self.sample_rate,
            "C" => self.channels as u32,
            "B" => self.bits_per_sample as u32,
            "E" => Object::name(self.encoding.pdf_name()),
        };
        Stream::new(dict, self.samples.clone())
    }

    fn annotation(&self, rect: Rect) -> Result<Annotation> {
        let mut annotation = Annotation::new("Sound", rect);
        annotation.set("Name", Object::name("Speaker"));
        annotation.set_stream("Sound", self.sound_stream());
        Ok(annotation)
    }
}

annotation_element!(SoundAnnotation, "SoundAnnotation");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutElement;
    use crate::page::Page;

    #[test]
    fn test_sound_stream_entries() {
        let mut page = Page::new();
        let mut sound = SoundAnnotation::new(vec![0u8, 128, 255, 128], 8000)
            .unwrap()
            .with_channels(2)
            .unwrap()
            .with_encoding(SoundEncoding::Signed);
        sound.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        let stream = &page.annotations()[0].streams()["Sound"];
        assert_eq!(stream.dict.get("R"), Some(&Object::Integer(8000)));
        assert_eq!(stream.dict.get("C"), Some(&Object::Integer(2)));
        assert_eq!(stream.dict.get("E").and_then(Object::as_name), Some("Signed"));
        assert_eq!(stream.data.len(), 4);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(SoundAnnotation::new(Vec::<u8>::new(), 0).is_err());
        let sound = SoundAnnotation::new(vec![1u8], 44_100).unwrap();
        assert!(sound.clone().with_channels(0).is_err());
        assert!(sound.with_bits_per_sample(12).is_err());
    }
}
