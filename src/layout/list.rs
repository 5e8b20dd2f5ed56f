//! Ordered and unordered lists.
//!
//! A list is a marker column followed by a content column. Items are any
//! layout element, including other lists, which therefore indent by the
//! width of their parent's marker column.

use crate::color::Color;
use crate::error::Result;
use crate::fonts::Font;
use crate::geometry::{Rect, Size};
use crate::layout::text::Chunk;
use crate::layout::{HorizontalAlignment, LayoutBox, LayoutElement};
use crate::page::Page;

/// Marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// `•`
    Bullet,
    /// `–`
    Dash,
    /// `1.`, `2.`, ...
    Decimal,
    /// `a.`, `b.`, ...
    LowerAlpha,
    /// `A.`, `B.`, ...
    UpperAlpha,
    /// `i.`, `ii.`, ...
    LowerRoman,
    /// `I.`, `II.`, ...
    UpperRoman,
}

impl ListStyle {
    /// Marker text for the item at `index` (0-based).
    pub fn marker(&self, index: usize) -> String {
        let n = index + 1;
        match self {
            ListStyle::Bullet => "\u{2022}".to_string(),
            ListStyle::Dash => "\u{2013}".to_string(),
            ListStyle::Decimal => format!("{}.", n),
            ListStyle::LowerAlpha => format!("{}.", alpha(n)),
            ListStyle::UpperAlpha => format!("{}.", alpha(n).to_uppercase()),
            ListStyle::LowerRoman => format!("{}.", roman(n).to_lowercase()),
            ListStyle::UpperRoman => format!("{}.", roman(n)),
        }
    }
}

/// 1 -> a, 26 -> z, 27 -> aa.
fn alpha(mut n: usize) -> String {
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn roman(mut n: usize) -> String {
    const TABLE: [(usize, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

struct ListBody {
    layout: LayoutBox,
    items: Vec<Box<dyn LayoutElement>>,
    style: ListStyle,
    font: Font,
    font_size: f32,
    color: Color,
    item_spacing: f32,
}

impl ListBody {
    fn new(style: ListStyle) -> Self {
        Self {
            layout: LayoutBox::default(),
            items: Vec::new(),
            style,
            font: Font::helvetica(),
            font_size: 12.0,
            color: Color::BLACK,
            item_spacing: 2.0,
        }
    }

    fn marker(&self, index: usize) -> Chunk {
        Chunk::styled(&self.style.marker(index), self.font.clone(), self.font_size, self.color)
    }

    fn marker_height(&self) -> f32 {
        self.font.line_height(self.font_size)
    }

    /// Marker column width: widest marker plus half an em gap.
    fn marker_column(&self) -> f32 {
        let widest = (0..self.items.len())
            .map(|i| self.font.text_width(&self.style.marker(i), self.font_size))
            .fold(0.0, f32::max);
        widest + self.font_size / 2.0
    }

    fn row_heights(&self, item_width: f32) -> Vec<f32> {
        self.items
            .iter()
            .map(|item| {
                item.get_size(Size::new(item_width, f32::INFINITY))
                    .height
                    .max(self.marker_height())
            })
            .collect()
    }

    fn content_size(&self, available: Size) -> Size {
        let marker = self.marker_column();
        let item_width = (available.width - marker).max(0.0);
        let widest = self
            .items
            .iter()
            .map(|item| item.get_size(Size::new(item_width, f32::INFINITY)).width)
            .fold(0.0, f32::max);
        let heights = self.row_heights(item_width);
        let gaps = self.item_spacing * heights.len().saturating_sub(1) as f32;
        Size::new(marker + widest, heights.iter().sum::<f32>() + gaps)
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        let marker_column = self.marker_column();
        let item_width = (area.width - marker_column).max(0.0);
        let heights = self.row_heights(item_width);
        let mut top = area.top();
        for (index, height) in heights.into_iter().enumerate() {
            let mut marker = self.marker(index);
            let marker_area = Rect::new(area.x, top - height, marker_column - self.font_size / 2.0, height);
            marker
                .layout_box_mut()
                .set_horizontal_alignment(HorizontalAlignment::Right);
            marker.paint(marker_area, page)?;
            let item_area = Rect::new(area.x + marker_column, top - height, item_width, height);
            self.items[index].paint(item_area, page)?;
            top -= height + self.item_spacing;
        }
        Ok(())
    }
}

macro_rules! list_type {
    ($(#[$doc:meta])* $name:ident, $default:expr, $kind:literal) => {
        $(#[$doc])*
        pub struct $name {
            body: ListBody,
        }

        impl $name {
            /// An empty list.
            pub fn new() -> Self {
                Self {
                    body: ListBody::new($default),
                }
            }

            /// Append an item.
            pub fn add(&mut self, item: impl LayoutElement + 'static) -> &mut Self {
                self.body.items.push(Box::new(item));
                self.body.layout.invalidate();
                self
            }

            /// Append an item, builder style.
            pub fn with_item(mut self, item: impl LayoutElement + 'static) -> Self {
                self.add(item);
                self
            }

            /// Change the marker style.
            pub fn with_style(mut self, style: ListStyle) -> Self {
                self.body.style = style;
                self.body.layout.invalidate();
                self
            }

            /// Marker font and size.
            pub fn with_marker_font(mut self, font: Font, size: f32) -> Result<Self> {
                self.body.font = font;
                self.body.font_size = crate::layout::text::check_font_size(size)?;
                self.body.layout.invalidate();
                Ok(self)
            }

            /// Marker color.
            pub fn with_marker_color(mut self, color: Color) -> Self {
                self.body.color = color;
                self
            }

            /// Vertical gap between items.
            pub fn with_item_spacing(mut self, spacing: f32) -> Self {
                self.body.item_spacing = spacing.max(0.0);
                self.body.layout.invalidate();
                self
            }

            /// Number of items.
            pub fn len(&self) -> usize {
                self.body.items.len()
            }

            /// Whether the list has no items.
            pub fn is_empty(&self) -> bool {
                self.body.items.is_empty()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("items", &self.body.items.len())
                    .field("style", &self.body.style)
                    .finish()
            }
        }

        impl LayoutElement for $name {
            fn layout_box(&self) -> &LayoutBox {
                &self.body.layout
            }

            fn layout_box_mut(&mut self) -> &mut LayoutBox {
                &mut self.body.layout
            }

            fn kind(&self) -> &'static str {
                $kind
            }

            fn content_size(&self, available: Size) -> Size {
                self.body.content_size(available)
            }

            fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
                self.body.paint_content(area, page)
            }
        }
    };
}

list_type!(
    /// A numbered list; decimal markers by default.
    OrderedList,
    ListStyle::Decimal,
    "OrderedList"
);

list_type!(
    /// A bulleted list.
    UnorderedList,
    ListStyle::Bullet,
    "UnorderedList"
);
