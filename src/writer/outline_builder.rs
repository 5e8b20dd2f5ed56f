//! Document outline (bookmarks) builder.
//!
//! Entries are added flat with a nesting level and assembled into the
//! `/Outlines` tree at write time: `First`/`Last` on parents,
//! `Prev`/`Next` between siblings and `Count` on open items.

use super::object_table::ObjectTable;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};

/// A single outline item (bookmark).
#[derive(Debug, Clone)]
pub struct OutlineItem {
    /// Display title
    pub title: String,
    /// Target page (0-based)
    pub page: usize,
    /// Whether the item is initially open (expanded)
    pub open: bool,
    /// Child items
    pub children: Vec<OutlineItem>,
}

impl OutlineItem {
    /// Create an outline item pointing to a page.
    pub fn new(title: impl Into<String>, page: usize) -> Self {
        Self {
            title: title.into(),
            page,
            open: true,
            children: Vec::new(),
        }
    }

    /// Count visible descendants (only count if parent is open).
    fn visible_descendant_count(&self) -> i64 {
        if !self.open {
            return 0;
        }
        self.children
            .iter()
            .map(|c| 1 + c.visible_descendant_count())
            .sum()
    }

    /// Get the total count of descendants (for PDF Count entry).
    /// Positive if open, negative if closed.
    fn descendant_count(&self) -> i64 {
        let count: i64 = self
            .children
            .iter()
            .map(|c| 1 + c.visible_descendant_count())
            .sum();
        if self.open {
            count
        } else {
            -count
        }
    }
}

/// Builder for document outlines.
#[derive(Debug, Clone, Default)]
pub struct OutlineBuilder {
    items: Vec<OutlineItem>,
    /// Index path to the most recently added item
    current_path: Vec<usize>,
}

impl OutlineBuilder {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry at `level` (0 is top level).
    ///
    /// Levels more than one deeper than the previous entry are clamped.
    pub fn add(&mut self, title: impl Into<String>, page: usize, level: usize) -> &mut Self {
        let depth = level.min(self.current_path.len());
        self.current_path.truncate(depth);

        let item = OutlineItem::new(title, page);
        let index = match self.current_mut() {
            Some(parent) => {
                parent.children.push(item);
                parent.children.len() - 1
            },
            None => {
                self.items.push(item);
                self.items.len() - 1
            },
        };
        self.current_path.push(index);
        self
    }

    fn current_mut(&mut self) -> Option<&mut OutlineItem> {
        let (first, rest) = self.current_path.split_first()?;
        let mut current = self.items.get_mut(*first)?;
        for &idx in rest {
            current = current.children.get_mut(idx)?;
        }
        Some(current)
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the root items.
    pub fn items(&self) -> &[OutlineItem] {
        &self.items
    }

    /// Add the outline objects to `table` and return the root reference.
    pub fn build(&self, table: &mut ObjectTable, page_refs: &[ObjectRef]) -> Result<Option<ObjectRef>> {
        if self.items.is_empty() {
            return Ok(None);
        }

        let root = table.reserve();
        let item_refs = self.build_level(&self.items, root, table, page_refs)?;

        let total_count: i64 = self
            .items
            .iter()
            .map(|i| 1 + i.visible_descendant_count())
            .sum();

        let mut root_dict = Dictionary::new();
        root_dict.insert("Type".to_string(), Object::name("Outlines"));
        link_children(&mut root_dict, &item_refs);
        root_dict.insert("Count".to_string(), Object::Integer(total_count));
        table.set(root, Object::Dictionary(root_dict));
        Ok(Some(root))
    }

    fn build_level(
        &self,
        items: &[OutlineItem],
        parent: ObjectRef,
        table: &mut ObjectTable,
        page_refs: &[ObjectRef],
    ) -> Result<Vec<ObjectRef>> {
        let refs: Vec<ObjectRef> = items.iter().map(|_| table.reserve()).collect();

        for (i, item) in items.iter().enumerate() {
            let page_ref = page_refs.get(item.page).ok_or_else(|| {
                Error::Serialization(format!(
                    "outline entry {:?} targets page {} of {}",
                    item.title,
                    item.page,
                    page_refs.len()
                ))
            })?;

            let mut dict = Dictionary::new();
            dict.insert("Title".to_string(), Object::text(&item.title));
            dict.insert("Parent".to_string(), Object::Reference(parent));
            dict.insert(
                "Dest".to_string(),
                Object::Array(vec![Object::Reference(*page_ref), Object::name("Fit")]),
            );
            if i > 0 {
                dict.insert("Prev".to_string(), Object::Reference(refs[i - 1]));
            }
            if i + 1 < refs.len() {
                dict.insert("Next".to_string(), Object::Reference(refs[i + 1]));
            }

            if !item.children.is_empty() {
                let child_refs = self.build_level(&item.children, refs[i], table, page_refs)?;
                link_children(&mut dict, &child_refs);
                let count = item.descendant_count();
                if count != 0 {
                    dict.insert("Count".to_string(), Object::Integer(count));
                }
            }

            table.set(refs[i], Object::Dictionary(dict));
        }
        Ok(refs)
    }
}

fn link_children(dict: &mut Dictionary, children: &[ObjectRef]) {
    if let (Some(first), Some(last)) = (children.first(), children.last()) {
        dict.insert("First".to_string(), Object::Reference(*first));
        dict.insert("Last".to_string(), Object::Reference(*last));
    }
}
