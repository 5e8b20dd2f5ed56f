//! Object arena used while assembling a document.
//!
//! Objects get provisional numbers in insertion order. Before emission the
//! table is renumbered breadth-first from the roots, which drops anything
//! unreachable and makes numbering independent of assembly order.

use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};
use std::collections::{HashMap, HashSet, VecDeque};

/// Arena of indirect objects addressed by provisional [`ObjectRef`]s.
#[derive(Debug, Default)]
pub struct ObjectTable {
    objects: Vec<Option<Object>>,
}

impl ObjectTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a number for an object that will be set later.
    pub fn reserve(&mut self) -> ObjectRef {
        self.objects.push(None);
        ObjectRef::new(self.objects.len() as u32, 0)
    }

    /// Fill a reserved slot.
    pub fn set(&mut self, r: ObjectRef, obj: Object) {
        if let Some(slot) = (r.id as usize).checked_sub(1).and_then(|i| self.objects.get_mut(i)) {
            *slot = Some(obj);
        }
    }

    /// Add an object and return its reference.
    pub fn add(&mut self, obj: impl Into<Object>) -> ObjectRef {
        self.objects.push(Some(obj.into()));
        ObjectRef::new(self.objects.len() as u32, 0)
    }

    /// Look up an object.
    pub fn get(&self, r: ObjectRef) -> Option<&Object> {
        self.slot(r)?.as_ref()
    }

    /// Look up an object mutably.
    pub fn get_mut(&mut self, r: ObjectRef) -> Option<&mut Object> {
        let index = (r.id as usize).checked_sub(1)?;
        self.objects.get_mut(index)?.as_mut()
    }

    /// Number of slots, filled or not.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn slot(&self, r: ObjectRef) -> Option<&Option<Object>> {
        let index = (r.id as usize).checked_sub(1)?;
        self.objects.get(index)
    }

    /// Validate references and renumber breadth-first from `roots`.
    ///
    /// Returns the objects in their final order (object `n` at index
    /// `n - 1`) together with the final references of the roots.
    pub fn renumber(self, roots: &[ObjectRef]) -> Result<(Vec<Object>, Vec<ObjectRef>)> {
        self.check_references()?;
        self.check_reference_cycles()?;

        let mut mapping: HashMap<u32, u32> = HashMap::new();
        let mut order: Vec<u32> = Vec::new();
        let mut queue: VecDeque<u32> = VecDeque::new();

        for root in roots {
            if !mapping.contains_key(&root.id) {
                order.push(root.id);
                mapping.insert(root.id, order.len() as u32);
                queue.push_back(root.id);
            }
            while let Some(id) = queue.pop_front() {
                if let Some(Some(obj)) = self.objects.get(id as usize - 1) {
                    obj.for_each_reference(&mut |r| {
                        if !mapping.contains_key(&r.id) {
                            order.push(r.id);
                            mapping.insert(r.id, order.len() as u32);
                            queue.push_back(r.id);
                        }
                    });
                }
            }
        }

        let dropped = self.objects.len() - order.len();
        if dropped > 0 {
            log::debug!("dropping {} unreachable objects", dropped);
        }

        let mut slots = self.objects;
        let mut renumbered = Vec::with_capacity(order.len());
        for old in &order {
            let mut obj = slots[*old as usize - 1].take().unwrap_or(Object::Null);
            obj.map_references(&mut |r| ObjectRef::new(mapping.get(&r.id).copied().unwrap_or(r.id), r.gen));
            renumbered.push(obj);
        }
        let roots = roots
            .iter()
            .map(|r| ObjectRef::new(mapping.get(&r.id).copied().unwrap_or(r.id), r.gen))
            .collect();
        Ok((renumbered, roots))
    }

    fn check_references(&self) -> Result<()> {
        for (index, slot) in self.objects.iter().enumerate() {
            let Some(obj) = slot else { continue };
            let mut dangling = None;
            obj.for_each_reference(&mut |r| {
                if dangling.is_none() && !matches!(self.slot(r), Some(Some(_))) {
                    dangling = Some(r);
                }
            });
            if let Some(r) = dangling {
                return Err(Error::Serialization(format!(
                    "object {} references missing object {}",
                    index + 1,
                    r
                )));
            }
        }
        Ok(())
    }

    /// An object whose value is only a reference must not lead back to itself.
    fn check_reference_cycles(&self) -> Result<()> {
        for (index, slot) in self.objects.iter().enumerate() {
            let Some(Object::Reference(first)) = slot else { continue };
            let mut next = *first;
            let start = index as u32 + 1;
            let mut seen = HashSet::from([start]);
            loop {
                if !seen.insert(next.id) {
                    return Err(Error::Serialization(format!(
                        "reference cycle through object {}",
                        start
                    )));
                }
                match self.get(next) {
                    Some(Object::Reference(r)) => next = *r,
                    _ => break,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Dictionary;

    fn dict_with(key: &str, value: Object) -> Object {
        let mut d = Dictionary::new();
        d.insert(key.to_string(), value);
        Object::Dictionary(d)
    }

    #[test]
    fn test_renumber_breadth_first() {
        let mut table = ObjectTable::new();
        let leaf = table.add(Object::Integer(7));
        let unused = table.add(Object::Integer(0));
        let middle = table.add(dict_with("Leaf", Object::Reference(leaf)));
        let root = table.add(dict_with("Middle", Object::Reference(middle)));
        assert_eq!(unused.id, 2);

        let (objects, roots) = table.renumber(&[root]).unwrap();
        assert_eq!(objects.len(), 3);
        assert_eq!(roots[0], ObjectRef::new(1, 0));
        assert_eq!(objects[0].as_dict().unwrap()["Middle"], Object::Reference(ObjectRef::new(2, 0)));
        assert_eq!(objects[2], Object::Integer(7));
    }

    #[test]
    fn test_dangling_reference() {
        let mut table = ObjectTable::new();
        let root = table.add(dict_with("X", Object::Reference(ObjectRef::new(42, 0))));
        let err = table.renumber(&[root]).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_unfilled_reservation_is_dangling() {
        let mut table = ObjectTable::new();
        let hole = table.reserve();
        let root = table.add(dict_with("X", Object::Reference(hole)));
        assert!(table.renumber(&[root]).is_err());
    }

    #[test]
    fn test_reference_cycle() {
        let mut table = ObjectTable::new();
        let a = table.reserve();
        let b = table.add(Object::Reference(a));
        table.set(a, Object::Reference(b));
        let root = table.add(dict_with("A", Object::Reference(a)));
        let err = table.renumber(&[root]).unwrap_err();
        assert!(format!("{}", err).contains("cycle"));
    }

    #[test]
    fn test_dictionary_cycles_are_fine() {
        // Parent/Kids style back-references are normal PDF structure.
        let mut table = ObjectTable::new();
        let parent = table.reserve();
        let child = table.add(dict_with("Parent", Object::Reference(parent)));
        table.set(parent, dict_with("Kids", Object::Array(vec![Object::Reference(child)])));
        let (objects, _) = table.renumber(&[parent]).unwrap();
        assert_eq!(objects.len(), 2);
    }
}
