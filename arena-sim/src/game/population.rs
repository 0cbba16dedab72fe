//! Entity Populations
//!
//! One in-place arena per entity kind. Systems mutate entries through
//! indices during a tick and *mark* entries for removal; marked entries
//! are dropped in a single compaction pass at the end of the tick.
//!
//! Marking is idempotent: an entry marked by two different rules in the
//! same tick (projectile hits a bot *and* a rock) is removed once.

use super::entity::{Entity, EntityId};

/// Mark-then-compact container for one entity kind.
///
/// `items` and `marked` are parallel: `marked[i]` is the removal flag of
/// `items[i]`.
#[derive(Clone, Debug)]
pub struct Population<T> {
    items: Vec<T>,
    marked: Vec<bool>,
}

impl<T> Default for Population<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            marked: Vec::new(),
        }
    }
}

impl<T> From<Vec<T>> for Population<T> {
    fn from(items: Vec<T>) -> Self {
        let marked = vec![false; items.len()];
        Self { items, marked }
    }
}

impl<T> Population<T> {
    /// Empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. New entries are never marked.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.marked.push(false);
    }

    /// Number of entries, marked ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there are no entries at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read-only view for renderers and queries.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate entries mutably in insertion order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Entry at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable entry at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Flag `index` for removal at the next compaction.
    ///
    /// Returns true only the first time an entry is marked, so callers can
    /// count removals without double counting. Out-of-range is a no-op.
    pub fn mark(&mut self, index: usize) -> bool {
        match self.marked.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    /// Is `index` flagged for removal?
    #[inline]
    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(false)
    }

    /// Mark every entry matching `pred`. Returns how many were newly marked.
    pub fn mark_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut count = 0;
        for (item, flag) in self.items.iter().zip(self.marked.iter_mut()) {
            if !*flag && pred(item) {
                *flag = true;
                count += 1;
            }
        }
        count
    }

    /// Number of entries currently flagged.
    pub fn marked_count(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }

    /// Drop every marked entry, preserving the order of the rest.
    ///
    /// Returns the removed entries in their original order.
    pub fn compact(&mut self) -> Vec<T> {
        if !self.marked.iter().any(|m| *m) {
            return Vec::new();
        }

        let items = std::mem::take(&mut self.items);
        let marked = std::mem::take(&mut self.marked);
        let mut removed = Vec::new();

        self.items.reserve(items.len());
        for (item, doomed) in items.into_iter().zip(marked) {
            if doomed {
                removed.push(item);
            } else {
                self.items.push(item);
            }
        }
        self.marked = vec![false; self.items.len()];
        removed
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.items.clear();
        self.marked.clear();
    }
}

impl<T: Entity> Population<T> {
    /// Index of the entry with `id`.
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Entry with `id`.
    pub fn find(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Mutable entry with `id`.
    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Mark the entry with `id`. Unknown ids are a no-op.
    pub fn mark_id(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(index) => self.mark(index),
            None => false,
        }
    }
}

impl<'a, T> IntoIterator for &'a Population<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Population<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}
