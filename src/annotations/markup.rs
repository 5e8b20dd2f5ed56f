//! Notes and text markup.

use super::{check_size, Common};
use crate::color::Color;
use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::layout::text::check_font_size;
use crate::object::Object;
use crate::page::Annotation;

/// Icon of a sticky note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextIcon {
    /// Speech bubble
    Comment,
    /// Key
    Key,
    /// Note (default)
    #[default]
    Note,
    /// Question mark
    Help,
    /// New paragraph mark
    NewParagraph,
    /// Paragraph mark
    Paragraph,
    /// Caret
    Insert,
}

impl TextIcon {
    /// PDF name of the icon.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            TextIcon::Comment => "Comment",
            TextIcon::Key => "Key",
            TextIcon::Note => "Note",
            TextIcon::Help => "Help",
            TextIcon::NewParagraph => "NewParagraph",
            TextIcon::Paragraph => "Paragraph",
            TextIcon::Insert => "Insert",
        }
    }
}

/// A sticky note: an icon that opens a pop-up with its contents.
#[derive(Debug, Clone)]
pub struct TextAnnotation {
    common: Common,
    size: Size,
    icon: TextIcon,
    open: bool,
}

impl TextAnnotation {
    /// A 24pt yellow note.
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            common: Common {
                contents: Some(contents.into()),
                ..Common::with_color(Color::YELLOW)
            },
            size: Size::new(24.0, 24.0),
            icon: TextIcon::default(),
            open: false,
        }
    }

    /// Icon shown on the page.
    pub fn with_icon(mut self, icon: TextIcon) -> Self {
        self.icon = icon;
        self
    }

    /// Show the pop-up when the document opens.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    fn annotation(&self, rect: Rect) -> Result<Annotation> {
        let mut annotation = Annotation::new("Text", rect);
        annotation.set("Name", Object::name(self.icon.pdf_name()));
        annotation.set("Open", Object::Boolean(self.open));
        Ok(annotation)
    }
}

annotation_element!(TextAnnotation, "TextAnnotation");

/// Text drawn directly on the page, without a pop-up.
///
/// Viewers render the text from the default appearance string (`/DA`)
/// using Helvetica.
#[derive(Debug, Clone)]
pub struct FreeTextAnnotation {
    common: Common,
    size: Size,
    font_size: f32,
    font_color: Color,
}

impl FreeTextAnnotation {
    /// `text` in a `width` x `height` box, 12pt black.
    pub fn new(text: impl Into<String>, width: f32, height: f32) -> Result<Self> {
        Ok(Self {
            common: Common {
                contents: Some(text.into()),
                ..Common::default()
            },
            size: check_size("FreeText", width, height)?,
            font_size: 12.0,
            font_color: Color::BLACK,
        })
    }

    /// Font size of the text.
    pub fn with_font_size(mut self, size: f32) -> Result<Self> {
        self.font_size = check_font_size(size)?;
        Ok(self)
    }

    /// Color of the text.
    pub fn with_font_color(mut self, color: Color) -> Self {
        self.font_color = color;
        self
    }

    fn default_appearance(&self) -> String {
        let (r, g, b) = self.font_color.components();
        format!(
            "/Helv {} Tf {} {} {} rg",
            crate::writer::format_real(self.font_size as f64),
            crate::writer::format_real(r as f64),
            crate::writer::format_real(g as f64),
            crate::writer::format_real(b as f64)
        )
    }

    fn annotation(&self, rect: Rect) -> Result<Annotation> {
        let mut annotation = Annotation::new("FreeText", rect);
        annotation.set("DA", Object::string(self.default_appearance()));
        Ok(annotation)
    }
}

annotation_element!(FreeTextAnnotation, "FreeTextAnnotation");

/// `QuadPoints` covering the whole rectangle: upper left, upper right,
/// lower left, lower right.
fn quad_points(rect: Rect) -> Object {
    Object::Array(
        [
            rect.left(),
            rect.top(),
            rect.right(),
            rect.top(),
            rect.left(),
            rect.bottom(),
            rect.right(),
            rect.bottom(),
        ]
        .into_iter()
        .map(Object::real)
        .collect(),
    )
}

macro_rules! markup_annotation {
    ($(#[$doc:meta])* $name:ident, $subtype:literal, $color:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            common: Common,
            size: Size,
        }

        impl $name {
            /// Mark a `width` x `height` area.
            pub fn new(width: f32, height: f32) -> Result<Self> {
                Ok(Self {
                    common: Common::with_color($color),
                    size: check_size($subtype, width, height)?,
                })
            }

            fn annotation(&self, rect: Rect) -> Result<Annotation> {
                let mut annotation = Annotation::new($subtype, rect);
                annotation.set("QuadPoints", quad_points(rect));
                Ok(annotation)
            }
        }

        annotation_element!($name, stringify!($name));
    };
}

markup_annotation!(
    /// A highlighter stroke over an area, yellow by default.
    HighlightAnnotation,
    "Highlight",
    Color::YELLOW
);

markup_annotation!(
    /// A line through the middle of an area, red by default.
    StrikeOutAnnotation,
    "StrikeOut",
    Color::RED
);
