// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gap-filling allocation of spot display ids.

use alloc::collections::BTreeSet;

/// Allocates small numeric display ids, reusing gaps left by released ids.
///
/// The allocator always hands out the smallest id not currently in use, so
/// the sequence of allocations is deterministic for a given attach/detach
/// history. The scene runs it from the spot attach hook; it can also be
/// driven directly:
///
/// ```rust
/// use spotline_scene::IdAllocator;
///
/// let mut ids = IdAllocator::new();
/// assert_eq!(ids.allocate(), 0);
/// assert_eq!(ids.allocate(), 1);
/// assert_eq!(ids.allocate(), 2);
/// ids.release(1);
/// assert_eq!(ids.allocate(), 1); // gaps fill first
/// assert_eq!(ids.allocate(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    used: BTreeSet<u32>,
}

impl IdAllocator {
    /// An allocator with no ids in use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the smallest unused id.
    pub fn allocate(&mut self) -> u32 {
        let mut next = 0;
        for &id in &self.used {
            if id == next {
                next += 1;
            } else {
                break;
            }
        }
        self.used.insert(next);
        next
    }

    /// Return an id to the pool. Returns `false` if it was not in use.
    pub fn release(&mut self, id: u32) -> bool {
        self.used.remove(&id)
    }

    /// Mark an id as in use without allocating it (used when rebuilding
    /// state). Returns `false` if it was already taken.
    pub fn mark_used(&mut self, id: u32) -> bool {
        self.used.insert(id)
    }

    /// Whether `id` is currently allocated.
    pub fn is_used(&self, id: u32) -> bool {
        self.used.contains(&id)
    }

    /// Number of ids currently in use.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Whether no ids are in use.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_from_zero() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), 0);
        assert_eq!(ids.allocate(), 1);
        assert_eq!(ids.allocate(), 2);
    }

    #[test]
    fn fills_the_lowest_gap_first() {
        let mut ids = IdAllocator::new();
        for expected in [0, 2, 3] {
            ids.mark_used(expected);
        }
        assert_eq!(ids.allocate(), 1, "gap between 0 and 2 fills first");
    }

    #[test]
    fn continues_past_a_dense_prefix() {
        let mut ids = IdAllocator::new();
        for expected in [0, 1, 2] {
            ids.mark_used(expected);
        }
        assert_eq!(ids.allocate(), 3, "dense prefix allocates the next id");
    }

    #[test]
    fn release_is_idempotent() {
        let mut ids = IdAllocator::new();
        let id = ids.allocate();
        assert!(ids.release(id));
        assert!(!ids.release(id), "double release reports false");
        assert!(ids.is_empty());
    }

    #[test]
    fn mark_used_rejects_duplicates() {
        let mut ids = IdAllocator::new();
        assert!(ids.mark_used(5));
        assert!(!ids.mark_used(5));
        assert!(ids.is_used(5));
        assert_eq!(ids.len(), 1);
    }
}
