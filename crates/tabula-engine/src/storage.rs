//! Sparse indexed storage for sheet data.
//!
//! [`IndexedStorage`] pairs a hash map (average-constant access) with a
//! sorted list of the present indices (ordered traversal, min/max queries).
//! [`SheetStorage`] nests two of them into a row-of-columns grid addressed by
//! [`Position`], storing only non-empty entries so memory stays proportional
//! to the populated cells rather than the sheet area.

use std::collections::HashMap;
use std::iter::FusedIterator;
use std::mem;
use thiserror::Error;

use tabula_formula::{Position, Size};

use crate::error::{EngineError, Result};

/// Lookup failure for [`IndexedStorage::at`] and [`IndexedStorage::erase`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("index {0} not present")]
pub struct IndexNotFound(pub usize);

/// Sparse storage keyed by index.
///
/// The hash side and the sorted index list always hold exactly the same key
/// set; every mutation maintains both.
#[derive(Clone, Debug)]
pub struct IndexedStorage<T> {
    data: HashMap<usize, T>,
    // Present indices in ascending order.
    indices: Vec<usize>,
}

impl<T> IndexedStorage<T> {
    pub fn new() -> IndexedStorage<T> {
        IndexedStorage {
            data: HashMap::new(),
            indices: Vec::new(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(&index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(&index)
    }

    /// Like [`IndexedStorage::get`] but absence is an error.
    pub fn at(&self, index: usize) -> std::result::Result<&T, IndexNotFound> {
        self.data.get(&index).ok_or(IndexNotFound(index))
    }

    /// Insert or overwrite; returns the displaced value when the index was
    /// already present.
    pub fn insert(&mut self, index: usize, value: T) -> Option<T> {
        let old = self.data.insert(index, value);
        if old.is_none() {
            if let Err(slot) = self.indices.binary_search(&index) {
                self.indices.insert(slot, index);
            }
        }
        old
    }

    /// The value at `index`, inserting `make()` first when absent.
    pub fn get_or_insert_with(&mut self, index: usize, make: impl FnOnce() -> T) -> &mut T {
        if !self.data.contains_key(&index) {
            if let Err(slot) = self.indices.binary_search(&index) {
                self.indices.insert(slot, index);
            }
        }
        self.data.entry(index).or_insert_with(make)
    }

    /// Remove and return the value at `index`.
    pub fn erase(&mut self, index: usize) -> std::result::Result<T, IndexNotFound> {
        let value = self.data.remove(&index).ok_or(IndexNotFound(index))?;
        if let Ok(slot) = self.indices.binary_search(&index) {
            self.indices.remove(slot);
        }
        debug_assert_eq!(self.data.len(), self.indices.len());
        Ok(value)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.data.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.data.len(), self.indices.len());
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.indices.clear();
    }

    pub fn swap(&mut self, other: &mut IndexedStorage<T>) {
        mem::swap(&mut self.data, &mut other.data);
        mem::swap(&mut self.indices, &mut other.indices);
    }

    /// Smallest present index.
    pub fn front_index(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    /// Largest present index.
    pub fn back_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Present indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Entries as `(index, &value)` pairs in ascending index order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            data: &self.data,
            indices: self.indices.iter(),
        }
    }
}

impl<T> Default for IndexedStorage<T> {
    fn default() -> Self {
        IndexedStorage::new()
    }
}

impl<'a, T> IntoIterator for &'a IndexedStorage<T> {
    type Item = (usize, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Ordered iterator over [`IndexedStorage`] entries.
pub struct Iter<'a, T> {
    data: &'a HashMap<usize, T>,
    indices: std::slice::Iter<'a, usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.indices.next()?;
        self.data.get(&index).map(|value| (index, value))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let index = *self.indices.nth(n)?;
        self.data.get(&index).map(|value| (index, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = *self.indices.next_back()?;
        self.data.get(&index).map(|value| (index, value))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Two-level sparse storage addressed by [`Position`].
///
/// A row container is dropped as soon as its last entry is erased, so the
/// printable bounding box can be read straight off the index lists.
#[derive(Clone, Debug, Default)]
pub struct SheetStorage<T> {
    rows: IndexedStorage<IndexedStorage<T>>,
}

impl<T> SheetStorage<T> {
    pub fn new() -> SheetStorage<T> {
        SheetStorage {
            rows: IndexedStorage::new(),
        }
    }

    fn check_valid(pos: Position) -> Result<()> {
        if pos.is_valid() {
            Ok(())
        } else {
            Err(EngineError::InvalidPosition(pos))
        }
    }

    /// Total number of stored entries.
    pub fn count(&self) -> usize {
        self.rows.iter().map(|(_, row)| row.len()).sum()
    }

    pub fn set(&mut self, pos: Position, value: T) -> Result<()> {
        Self::check_valid(pos)?;
        self.rows
            .get_or_insert_with(pos.row, IndexedStorage::new)
            .insert(pos.col, value);
        Ok(())
    }

    pub fn get(&self, pos: Position) -> Result<Option<&T>> {
        Self::check_valid(pos)?;
        Ok(self.rows.get(pos.row).and_then(|row| row.get(pos.col)))
    }

    /// Erase the entry at `pos`; a no-op when nothing is stored there.
    pub fn clear(&mut self, pos: Position) -> Result<()> {
        Self::check_valid(pos)?;
        if let Some(row) = self.rows.get_mut(pos.row) {
            if row.erase(pos.col).is_ok() && row.is_empty() {
                self.rows.erase(pos.row).ok();
            }
        }
        Ok(())
    }

    /// Bounding box that contains every stored entry; `{0, 0}` when empty.
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        if let Some(back_row) = self.rows.back_index() {
            size.rows = back_row + 1;
            for (_, row) in self.rows.iter() {
                if let Some(back_col) = row.back_index() {
                    size.cols = size.cols.max(back_col + 1);
                }
            }
        }
        size
    }
}
