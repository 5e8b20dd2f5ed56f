//! Layout engine.
//!
//! Every element implements [`LayoutElement`]: it can be measured against
//! an available size and painted into an available rectangle on a
//! [`Page`]. The trait's provided methods carry the shared protocol
//! (padding, alignment, overflow checks, background and borders, `q`/`Q`
//! wrapping); concrete elements only measure and paint their content.
//!
//! Page layouts ([`SingleColumnLayout`], [`MultiColumnLayout`]) flow elements
//! down a page and break to new columns and pages as needed.

mod image;
mod line_art;
mod list;
mod map;
mod page_layout;
mod shape;
pub mod table;
pub mod text;

pub use image::Image;
pub use line_art::LineArt;
pub use list::{ListStyle, OrderedList, UnorderedList};
pub use map::{Map, Region};
pub use page_layout::{MultiColumnLayout, PageLayout, SingleColumnLayout};
pub use shape::Shape;
pub use table::{FixedColumnWidthTable, FlexibleColumnWidthTable, TableCell};
pub use text::{
    Chunk, CodeSnippet, HeterogeneousParagraph, Leading, Paragraph, RegexLexer, SyntaxLexer,
    SyntaxTheme, TextAlignment, Token, TokenKind,
};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Rect, Size};
use crate::page::Page;
use crate::writer::ContentStreamBuilder;
use std::cell::RefCell;
use std::collections::HashMap;

/// A value per side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides<T> {
    /// Top side
    pub top: T,
    /// Right side
    pub right: T,
    /// Bottom side
    pub bottom: T,
    /// Left side
    pub left: T,
}

impl<T: Clone> Sides<T> {
    /// The same value on every side.
    pub fn all(value: T) -> Self {
        Self {
            top: value.clone(),
            right: value.clone(),
            bottom: value.clone(),
            left: value,
        }
    }

    /// Values in CSS order: top, right, bottom, left.
    pub fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl Sides<f32> {
    /// Left plus right.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Top plus bottom.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Horizontal placement inside the available rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Flush left
    #[default]
    Left,
    /// Centered
    Middle,
    /// Flush right
    Right,
}

/// Vertical placement inside the available rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    /// Against the top edge
    #[default]
    Top,
    /// Centered
    Middle,
    /// Against the bottom edge
    Bottom,
}

/// Decoration, spacing and alignment shared by every element.
///
/// Also holds the measurement cache; every setter clears it.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    background_color: Option<Color>,
    border_color: Sides<Color>,
    border_width: Sides<f32>,
    border_dash: Sides<Vec<f32>>,
    margin: Sides<f32>,
    padding: Sides<f32>,
    horizontal_alignment: HorizontalAlignment,
    vertical_alignment: VerticalAlignment,
    previous_paint_box: Option<Rect>,
    size_cache: RefCell<HashMap<(u32, u32), Size>>,
}

impl Default for LayoutBox {
    fn default() -> Self {
        Self {
            background_color: None,
            border_color: Sides::all(Color::BLACK),
            border_width: Sides::all(0.0),
            border_dash: Sides::all(Vec::new()),
            margin: Sides::all(0.0),
            padding: Sides::all(0.0),
            horizontal_alignment: HorizontalAlignment::Left,
            vertical_alignment: VerticalAlignment::Top,
            previous_paint_box: None,
            size_cache: RefCell::new(HashMap::new()),
        }
    }
}

impl LayoutBox {
    /// Background fill, if any.
    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    /// Border colors.
    pub fn border_color(&self) -> &Sides<Color> {
        &self.border_color
    }

    /// Border widths; a side with width 0 is not drawn.
    pub fn border_width(&self) -> &Sides<f32> {
        &self.border_width
    }

    /// Border dash patterns; empty means solid.
    pub fn border_dash(&self) -> &Sides<Vec<f32>> {
        &self.border_dash
    }

    /// Margins, outside the painted box.
    pub fn margin(&self) -> &Sides<f32> {
        &self.margin
    }

    /// Padding, inside the painted box.
    pub fn padding(&self) -> &Sides<f32> {
        &self.padding
    }

    /// Horizontal alignment.
    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment
    }

    /// Vertical alignment.
    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment
    }

    /// Where the element was last painted, including padding.
    pub fn previous_paint_box(&self) -> Option<Rect> {
        self.previous_paint_box
    }

    /// Set the background color.
    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.background_color = color;
        self.invalidate();
    }

    /// Set border colors.
    pub fn set_border_color(&mut self, color: Sides<Color>) {
        self.border_color = color;
        self.invalidate();
    }

    /// Set border widths.
    pub fn set_border_width(&mut self, width: Sides<f32>) {
        self.border_width = width;
        self.invalidate();
    }

    /// Set border dash patterns.
    pub fn set_border_dash(&mut self, dash: Sides<Vec<f32>>) {
        self.border_dash = dash;
        self.invalidate();
    }

    /// Set margins.
    pub fn set_margin(&mut self, margin: Sides<f32>) {
        self.margin = margin;
        self.invalidate();
    }

    /// Set padding.
    pub fn set_padding(&mut self, padding: Sides<f32>) {
        self.padding = padding;
        self.invalidate();
    }

    /// Set horizontal alignment.
    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        self.horizontal_alignment = alignment;
        self.invalidate();
    }

    /// Set vertical alignment.
    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) {
        self.vertical_alignment = alignment;
        self.invalidate();
    }

    pub(crate) fn set_previous_paint_box(&mut self, rect: Rect) {
        self.previous_paint_box = Some(rect);
    }

    /// Drop memoized measurements.
    pub fn invalidate(&self) {
        self.size_cache.borrow_mut().clear();
    }

    fn cached_size(&self, available: Size) -> Option<Size> {
        self.size_cache.borrow().get(&cache_key(available)).copied()
    }

    fn cache_size(&self, available: Size, size: Size) {
        self.size_cache.borrow_mut().insert(cache_key(available), size);
    }
}

fn cache_key(available: Size) -> (u32, u32) {
    (available.width.to_bits(), available.height.to_bits())
}

/// Fill the background and stroke the borders of `rect`.
pub(crate) fn paint_decoration(layout: &LayoutBox, rect: Rect, ops: &mut ContentStreamBuilder) {
    if let Some(background) = layout.background_color() {
        ops.set_fill_color(background)
            .rect(rect.x, rect.y, rect.width, rect.height)
            .fill();
    }

    let (l, r, b, t) = (rect.left(), rect.right(), rect.bottom(), rect.top());
    let widths = layout.border_width();
    let colors = layout.border_color();
    let dashes = layout.border_dash();
    let sides = [
        (widths.top, colors.top, &dashes.top, (l, t), (r, t)),
        (widths.right, colors.right, &dashes.right, (r, t), (r, b)),
        (widths.bottom, colors.bottom, &dashes.bottom, (r, b), (l, b)),
        (widths.left, colors.left, &dashes.left, (l, b), (l, t)),
    ];
    for (width, color, dash, from, to) in sides {
        if width <= 0.0 {
            continue;
        }
        ops.set_stroke_color(color)
            .set_line_width(width)
            .set_dash_pattern(dash.clone(), 0.0)
            .move_to(from.0, from.1)
            .line_to(to.0, to.1)
            .stroke();
    }
}

/// Something that can be measured and painted onto a page.
///
/// Implementors provide [`content_size`](LayoutElement::content_size) and
/// [`paint_content`](LayoutElement::paint_content), both working on the area
/// inside the padding. [`get_size`](LayoutElement::get_size) and
/// [`paint`](LayoutElement::paint) should not be overridden.
pub trait LayoutElement {
    /// Shared decoration and spacing.
    fn layout_box(&self) -> &LayoutBox;

    /// Mutable access to the shared decoration and spacing.
    fn layout_box_mut(&mut self) -> &mut LayoutBox;

    /// Size of the content, excluding padding, given the space inside the padding.
    fn content_size(&self, available: Size) -> Size;

    /// Paint the content into `area`, the painted box minus padding.
    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()>;

    /// Element name used in overflow errors.
    fn kind(&self) -> &'static str {
        "LayoutElement"
    }

    /// Outer size including padding, excluding margins. Memoized.
    fn get_size(&self, available: Size) -> Size {
        let layout = self.layout_box();
        if let Some(size) = layout.cached_size(available) {
            return size;
        }
        let padding = *layout.padding();
        let inner = Size::new(
            (available.width - padding.horizontal()).max(0.0),
            (available.height - padding.vertical()).max(0.0),
        );
        let content = self.content_size(inner);
        let size = Size::new(
            content.width + padding.horizontal(),
            content.height + padding.vertical(),
        );
        layout.cache_size(available, size);
        size
    }

    /// Align, decorate and paint the element inside `available`.
    fn paint(&mut self, available: Rect, page: &mut Page) -> Result<()> {
        let size = self.get_size(available.size());
        if !size.fits_in(&available.size()) {
            return Err(Error::overflow(self.kind(), size.as_tuple(), available.size().as_tuple()));
        }

        let layout = self.layout_box();
        let dx = match layout.horizontal_alignment() {
            HorizontalAlignment::Left => 0.0,
            HorizontalAlignment::Middle => (available.width - size.width) / 2.0,
            HorizontalAlignment::Right => available.width - size.width,
        };
        let dy = match layout.vertical_alignment() {
            VerticalAlignment::Bottom => 0.0,
            VerticalAlignment::Middle => (available.height - size.height) / 2.0,
            VerticalAlignment::Top => available.height - size.height,
        };
        let paint_box = Rect::new(
            available.x + dx.max(0.0),
            available.y + dy.max(0.0),
            size.width,
            size.height,
        );
        let padding = *layout.padding();
        let content_area = paint_box.inset(padding.top, padding.right, padding.bottom, padding.left);

        let mark = page.mark();
        let mut open = ContentStreamBuilder::new();
        open.save_state();
        paint_decoration(layout, paint_box, &mut open);
        page.content_stream_mut().append(&open)?;

        if let Err(e) = self.paint_content(content_area, page) {
            page.rollback(mark);
            return Err(e);
        }

        let mut close = ContentStreamBuilder::new();
        close.restore_state();
        page.content_stream_mut().append(&close)?;
        self.layout_box_mut().set_previous_paint_box(paint_box);
        Ok(())
    }

    /// Where the element was last painted.
    fn previous_paint_box(&self) -> Option<Rect> {
        self.layout_box().previous_paint_box()
    }

    /// Same padding on every side.
    fn with_padding(mut self, padding: f32) -> Self
    where
        Self: Sized,
    {
        self.layout_box_mut().set_padding(Sides::all(padding));
        self
    }

    /// Per-side padding.
    fn with_padding_sides(mut self, padding: Sides<f32>) -> Self
    where
        Self: Sized,
    {
        self.layout_box_mut().set_padding(padding);
        self
    }

    /// Same margin on every side.
    fn with_margin(mut self, margin: f32) -> Self
    where
        Self: Sized,
    {
        self.layout_box_mut().set_margin(Sides::all(margin));
        self
    }

    /// Per-side margins.
    fn with_margin_sides(mut self, margin: Sides<f32>) -> Self
    where
        Self: Sized,
    {
        self.layout_box_mut().set_margin(margin);
        self
    }

    /// Background fill.
    fn with_background_color(mut self, color: Color) -> Self
    where
        Self: Sized,
    {
        self.layout_box_mut().set_background_color(Some(color));
        self
    }

    /// Solid border of the same width and color on every side.
    fn with_border(mut self, width: f32, color: Color) -> Self
    where
        Self: Sized,
    {
        let layout = self.layout_box_mut();
        layout.set_border_width(Sides::all(width));
        layout.set_border_color(Sides::all(color));
        self
    }

    /// Dash pattern for every border side.
    fn with_border_dash(mut self, pattern: Vec<f32>) -> Self
    where
        Self: Sized,
    {
        self.layout_box_mut().set_border_dash(Sides::all(pattern));
        self
    }

    /// Horizontal alignment inside the available rectangle.
    fn with_horizontal_alignment(mut self, alignment: HorizontalAlignment) -> Self
    where
        Self: Sized,
    {
        self.layout_box_mut().set_horizontal_alignment(alignment);
        self
    }

    /// Vertical alignment inside the available rectangle.
    fn with_vertical_alignment(mut self, alignment: VerticalAlignment) -> Self
    where
        Self: Sized,
    {
        self.layout_box_mut().set_vertical_alignment(alignment);
        self
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    /// A fixed-size box that counts measurements.
    pub(crate) struct Block {
        layout: LayoutBox,
        size: Size,
        pub(crate) measured: Cell<usize>,
    }

    impl Block {
        pub(crate) fn new(width: f32, height: f32) -> Self {
            Self {
                layout: LayoutBox::default(),
                size: Size::new(width, height),
                measured: Cell::new(0),
            }
        }
    }

    impl LayoutElement for Block {
        fn layout_box(&self) -> &LayoutBox {
            &self.layout
        }

        fn layout_box_mut(&mut self) -> &mut LayoutBox {
            &mut self.layout
        }

        fn content_size(&self, _available: Size) -> Size {
            self.measured.set(self.measured.get() + 1);
            self.size
        }

        fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
            let mut ops = ContentStreamBuilder::new();
            ops.rect(area.x, area.y, area.width, area.height).fill();
            page.content_stream_mut().append(&ops)
        }
    }

    fn content(page: &Page) -> String {
        String::from_utf8_lossy(page.content_stream().as_bytes()).into_owned()
    }

    #[test]
    fn test_get_size_includes_padding_and_memoizes() {
        let block = Block::new(100.0, 20.0).with_padding(5.0).with_margin(50.0);
        let available = Size::new(400.0, 400.0);
        assert_eq!(block.get_size(available), Size::new(110.0, 30.0));
        assert_eq!(block.get_size(available), Size::new(110.0, 30.0));
        assert_eq!(block.measured.get(), 1);
    }

    #[test]
    fn test_setter_invalidates_cache() {
        let mut block = Block::new(10.0, 10.0);
        let available = Size::new(100.0, 100.0);
        block.get_size(available);
        block.layout_box_mut().set_padding(Sides::all(1.0));
        assert_eq!(block.get_size(available), Size::new(12.0, 12.0));
        assert_eq!(block.measured.get(), 2);
    }

    #[test]
    fn test_alignment_shifts() {
        let mut page = Page::new();
        let available = Rect::new(0.0, 0.0, 200.0, 100.0);

        let mut top_left = Block::new(50.0, 20.0);
        top_left.paint(available, &mut page).unwrap();
        assert_eq!(top_left.previous_paint_box(), Some(Rect::new(0.0, 80.0, 50.0, 20.0)));

        let mut centered = Block::new(50.0, 20.0)
            .with_horizontal_alignment(HorizontalAlignment::Middle)
            .with_vertical_alignment(VerticalAlignment::Middle);
        centered.paint(available, &mut page).unwrap();
        assert_eq!(centered.previous_paint_box(), Some(Rect::new(75.0, 40.0, 50.0, 20.0)));

        let mut bottom_right = Block::new(50.0, 20.0)
            .with_horizontal_alignment(HorizontalAlignment::Right)
            .with_vertical_alignment(VerticalAlignment::Bottom);
        bottom_right.paint(available, &mut page).unwrap();
        assert_eq!(bottom_right.previous_paint_box(), Some(Rect::new(150.0, 0.0, 50.0, 20.0)));
    }

    #[test]
    fn test_paint_wraps_in_save_restore() {
        let mut page = Page::new();
        let mut block = Block::new(10.0, 10.0).with_background_color(Color::RED).with_border(1.0, Color::BLUE);
        block.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        let text = content(&page);
        assert!(text.starts_with("q\n1 0 0 rg\n0 90 10 10 re\nf\n"));
        assert!(text.ends_with("Q\n"));
        assert_eq!(text.matches("S\n").count(), 4);
        assert_eq!(text.lines().filter(|l| *l == "q").count(), text.lines().filter(|l| *l == "Q").count());
    }

    #[test]
    fn test_overflow_leaves_page_untouched() {
        let mut page = Page::new();
        let mut block = Block::new(300.0, 10.0);
        let err = block.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap_err();
        assert!(err.is_overflow());
        assert!(page.content_stream().is_empty());
        assert!(block.previous_paint_box().is_none());
    }

    #[test]
    fn test_dashed_border() {
        let mut page = Page::new();
        let mut block = Block::new(10.0, 10.0).with_border(2.0, Color::BLACK).with_border_dash(vec![3.0, 1.0]);
        block.paint(Rect::new(0.0, 0.0, 10.0, 10.0), &mut page).unwrap();
        assert!(content(&page).contains("[3 1] 0 d\n"));
    }
}
