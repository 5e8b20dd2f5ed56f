//! Annotation layout elements.
//!
//! An annotation occupies a box in the flow like any other element. When
//! painted, it turns that box into the `/Rect` of a page annotation and
//! appends it to the page's `Annots`; the page assigns the unique `NM`
//! name (`annotation-001`, ...), which the element remembers.
//!
//! Every element shares the same optional properties: contents (the
//! pop-up text), color (`/C`), [`AnnotationFlags`] (`/F`, `PRINT` by
//! default) and author (`/T`).

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::Size;
use crate::layout::LayoutBox;
use crate::object::Object;
use crate::page::Annotation;
use bitflags::bitflags;

bitflags! {
    /// Annotation flags (`/F`), ISO 32000-1 Table 165.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnnotationFlags: u32 {
        /// Hide when no handler for the subtype is available.
        const INVISIBLE = 1 << 0;
        /// Neither display nor print.
        const HIDDEN = 1 << 1;
        /// Print with the page.
        const PRINT = 1 << 2;
        /// Do not scale with the page zoom.
        const NO_ZOOM = 1 << 3;
        /// Do not rotate with the page.
        const NO_ROTATE = 1 << 4;
        /// Print but do not display.
        const NO_VIEW = 1 << 5;
        /// No interaction.
        const READ_ONLY = 1 << 6;
        /// Cannot be deleted or have its properties changed.
        const LOCKED = 1 << 7;
        /// Invert `NO_VIEW` on hover or selection.
        const TOGGLE_NO_VIEW = 1 << 8;
        /// Contents cannot be changed.
        const LOCKED_CONTENTS = 1 << 9;
    }
}

impl Default for AnnotationFlags {
    fn default() -> Self {
        AnnotationFlags::PRINT
    }
}

/// Properties shared by every annotation element.
#[derive(Debug, Clone, Default)]
pub(crate) struct Common {
    pub layout: LayoutBox,
    pub contents: Option<String>,
    pub color: Option<Color>,
    pub flags: AnnotationFlags,
    pub author: Option<String>,
    pub name: Option<String>,
}

impl Common {
    pub fn with_color(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn apply(&self, annotation: &mut Annotation) {
        if let Some(contents) = &self.contents {
            annotation.set("Contents", Object::text(contents));
        }
        if let Some(color) = self.color {
            let (r, g, b) = color.components();
            annotation.set("C", Object::color_array(r, g, b));
        }
        annotation.set("F", Object::Integer(self.flags.bits() as i64));
        if let Some(author) = &self.author {
            annotation.set("T", Object::text(author));
        }
    }
}

pub(crate) fn check_size(kind: &str, width: f32, height: f32) -> Result<Size> {
    if width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0 {
        Ok(Size::new(width, height))
    } else {
        Err(Error::InvalidArgument(format!("{} needs a non-negative size, got {}x{}", kind, width, height)))
    }
}

/// Shared builders and the [`LayoutElement`](crate::layout::LayoutElement)
/// implementation. The type needs `common: Common`, `size: Size` and a
/// `fn annotation(&self, rect: Rect) -> Result<Annotation>`.
macro_rules! annotation_element {
    ($name:ident, $kind:expr) => {
        impl $name {
            /// Text shown in the annotation's pop-up.
            pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
                self.common.contents = Some(contents.into());
                self
            }

            /// Annotation color (`/C`).
            pub fn with_color(mut self, color: $crate::color::Color) -> Self {
                self.common.color = Some(color);
                self
            }

            /// Replace the flags.
            pub fn with_flags(mut self, flags: $crate::annotations::AnnotationFlags) -> Self {
                self.common.flags = flags;
                self
            }

            /// Author (`/T`).
            pub fn with_author(mut self, author: impl Into<String>) -> Self {
                self.common.author = Some(author.into());
                self
            }

            /// Pop-up text.
            pub fn contents(&self) -> Option<&str> {
                self.common.contents.as_deref()
            }

            /// Annotation color.
            pub fn color(&self) -> Option<$crate::color::Color> {
                self.common.color
            }

            /// Flags.
            pub fn flags(&self) -> $crate::annotations::AnnotationFlags {
                self.common.flags
            }

            /// Author.
            pub fn author(&self) -> Option<&str> {
                self.common.author.as_deref()
            }

            /// The `NM` assigned by the page on the most recent paint.
            pub fn name(&self) -> Option<&str> {
                self.common.name.as_deref()
            }
        }

        impl $crate::layout::LayoutElement for $name {
            fn layout_box(&self) -> &$crate::layout::LayoutBox {
                &self.common.layout
            }

            fn layout_box_mut(&mut self) -> &mut $crate::layout::LayoutBox {
                &mut self.common.layout
            }

            fn kind(&self) -> &'static str {
                $kind
            }

            fn content_size(&self, _available: $crate::geometry::Size) -> $crate::geometry::Size {
                self.size
            }

            fn paint_content(
                &mut self,
                area: $crate::geometry::Rect,
                page: &mut $crate::page::Page,
            ) -> $crate::error::Result<()> {
                let mut annotation = self.annotation(area)?;
                self.common.apply(&mut annotation);
                let name = page.add_annotation(annotation);
                log::trace!("{} annotation {} at {:?}", $kind, name, area);
                self.common.name = Some(name);
                Ok(())
            }
        }
    };
}

mod link;
mod markup;
mod shape;
mod sound;

pub use link::{LinkAnnotation, UriAnnotation};
pub use markup::{FreeTextAnnotation, HighlightAnnotation, StrikeOutAnnotation, TextAnnotation, TextIcon};
pub use shape::{CircleAnnotation, InkAnnotation, LineAnnotation};
pub use sound::{SoundAnnotation, SoundEncoding};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags_print() {
        assert_eq!(AnnotationFlags::default(), AnnotationFlags::PRINT);
        assert_eq!((AnnotationFlags::PRINT | AnnotationFlags::LOCKED).bits(), 4 | 128);
    }

    #[test]
    fn test_common_entries() {
        let common = Common {
            contents: Some("note".to_string()),
            author: Some("Zoë".to_string()),
            ..Common::with_color(Color::RED)
        };
        let mut annotation = Annotation::new("Text", crate::geometry::Rect::new(0.0, 0.0, 1.0, 1.0));
        common.apply(&mut annotation);
        let entries = annotation.entries();
        assert_eq!(entries.get("Contents"), Some(&Object::string("note")));
        assert_eq!(entries.get("F"), Some(&Object::Integer(4)));
        assert_eq!(entries.get("C"), Some(&Object::color_array(1.0, 0.0, 0.0)));
        // Non-ASCII text is UTF-16BE with a byte order mark.
        assert_eq!(entries.get("T").and_then(Object::as_string).map(|s| &s[..2]), Some(&[0xFE, 0xFF][..]));
    }
}
