//! Contiguous growable array used for the VM operand stack and the runtime task list.
//!
//! Capacity starts at [`DEFAULT_CAPACITY`] and doubles whenever an add finds the
//! buffer full. Removal never shrinks the buffer.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use core::slice;

/// Initial number of slots reserved by [`ArrayList::new`].
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct ArrayList<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> ArrayList<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of slots reserved before the next doubling.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `element`, doubling the capacity when the list is full.
    pub fn add(&mut self, element: T) {
        if self.items.len() >= self.capacity {
            let grown = if self.capacity == 0 {
                DEFAULT_CAPACITY
            } else {
                self.capacity * 2
            };
            self.items.reserve_exact(grown - self.items.len());
            self.capacity = grown;
        }
        self.items.push(element);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Overwrites the element at `index`.
    ///
    /// # Panics
    /// If `index >= len()`. Out-of-range access is a caller bug, not a recoverable error.
    pub fn set(&mut self, index: usize, element: T) {
        self.items[index] = element;
    }

    /// Inserts `element` at `index`, shifting later elements up.
    ///
    /// # Panics
    /// If `index > len()`.
    pub fn insert(&mut self, index: usize, element: T) {
        assert!(index <= self.items.len(), "insert index {index} out of range");
        self.add(element);
        let last = self.items.len() - 1;
        self.items[index..=last].rotate_right(1);
    }

    /// Removes the element at `index`, shifting later elements down by one.
    /// Returns `None` for an out-of-range index. Capacity is left untouched.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Keeps only the elements for which `keep` returns true, visiting each
    /// element exactly once in order. Survivors keep their relative order.
    pub fn retain_mut<F>(&mut self, keep: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        self.items.retain_mut(keep);
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Releases the backing buffer. Length and capacity both drop to zero.
    pub fn dispose(&mut self) {
        self.items = Vec::new();
        self.capacity = 0;
    }
}

impl<T: PartialEq> ArrayList<T> {
    /// Removes the first element equal to `element`. Returns whether one was found.
    pub fn remove(&mut self, element: &T) -> bool {
        match self.items.iter().position(|item| item == element) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T> Default for ArrayList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for ArrayList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for ArrayList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a ArrayList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
