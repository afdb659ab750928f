//! Slot storage for tree nodes.
//!
//! Every node of a [`Tree`](crate::Tree) lives in an [`Arena`] slot and is addressed by a
//! [`NodeRef`]. A handle remembers the generation of the slot it was issued for, so once a node
//! is released its handle never resolves again, even after the slot is handed out to a new node.

use std::collections::TryReserveError;
use std::fmt;
use std::ops::{Index, IndexMut};

/// A copyable, non-owning handle to a node in a [`Tree`](crate::Tree).
///
/// Handles stay valid across insertions, deletions of *other* nodes, and rebalancing. A handle
/// to a deleted node resolves to `None` through [`Tree::node`](crate::Tree::node).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    index: usize,
    generation: u32,
}

impl NodeRef {
    /// The slot index of this handle. Unique among live nodes of one tree, which makes it handy
    /// for naming nodes in rendered output.
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({}v{})", self.index, self.generation)
    }
}

enum Entry<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

struct Slot<T> {
    generation: u32,
    entry: Entry<T>,
}

pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    // Head of the intrusive free list threaded through vacant slots.
    free: Option<usize>,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
        }
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.slots.try_reserve(additional)
    }

    /// Stores `value` in a free slot. If no slot is free and the backing storage can't grow,
    /// `value` is handed back with the allocation error.
    pub(crate) fn insert(&mut self, value: T) -> Result<NodeRef, (T, TryReserveError)> {
        if let Some(index) = self.free {
            let slot = &mut self.slots[index];
            let Entry::Vacant { next_free } = slot.entry else {
                unreachable!("free list points at an occupied slot");
            };
            self.free = next_free;
            slot.entry = Entry::Occupied(value);
            return Ok(NodeRef {
                index,
                generation: slot.generation,
            });
        }

        if let Err(e) = self.slots.try_reserve(1) {
            return Err((value, e));
        }
        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            entry: Entry::Occupied(value),
        });
        Ok(NodeRef {
            index,
            generation: 0,
        })
    }

    /// Releases the slot behind `node` and returns its value. Stale handles return `None`.
    pub(crate) fn remove(&mut self, node: NodeRef) -> Option<T> {
        let slot = self.slots.get_mut(node.index)?;
        if slot.generation != node.generation || matches!(slot.entry, Entry::Vacant { .. }) {
            return None;
        }
        let entry = std::mem::replace(
            &mut slot.entry,
            Entry::Vacant {
                next_free: self.free,
            },
        );
        slot.generation = slot.generation.wrapping_add(1);
        self.free = Some(node.index);
        match entry {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant { .. } => None,
        }
    }

    pub(crate) fn get(&self, node: NodeRef) -> Option<&T> {
        match self.slots.get(node.index)? {
            Slot {
                generation,
                entry: Entry::Occupied(value),
            } if *generation == node.generation => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, node: NodeRef) -> Option<&mut T> {
        match self.slots.get_mut(node.index)? {
            Slot {
                generation,
                entry: Entry::Occupied(value),
            } if *generation == node.generation => Some(value),
            _ => None,
        }
    }

    /// Releases every occupied slot, handing each value to `f`. Slots are kept (and their
    /// generations bumped) so that handles issued before the clear stay dead afterwards.
    pub(crate) fn clear_with(&mut self, mut f: impl FnMut(T)) {
        self.free = None;
        for index in (0..self.slots.len()).rev() {
            let slot = &mut self.slots[index];
            let entry = std::mem::replace(
                &mut slot.entry,
                Entry::Vacant {
                    next_free: self.free,
                },
            );
            if let Entry::Occupied(value) = entry {
                slot.generation = slot.generation.wrapping_add(1);
                f(value);
            }
            self.free = Some(index);
        }
    }
}

impl<T> Index<NodeRef> for Arena<T> {
    type Output = T;

    fn index(&self, node: NodeRef) -> &T {
        self.get(node).expect("Linked node handle must be live")
    }
}

impl<T> IndexMut<NodeRef> for Arena<T> {
    fn index_mut(&mut self, node: NodeRef) -> &mut T {
        self.get_mut(node).expect("Linked node handle must be live")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handle_does_not_resolve() {
        let mut arena = Arena::new();
        let a = arena.insert("a").unwrap();

        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.remove(a), None);
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut arena = Arena::new();
        let a = arena.insert("a").unwrap();
        arena.remove(a);
        let b = arena.insert("b").unwrap();

        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(b), Some(&"b"));
    }

    #[test]
    fn clear_releases_everything_once() {
        let mut arena = Arena::new();
        let handles: Vec<_> = (0..5).map(|i| arena.insert(i).unwrap()).collect();
        arena.remove(handles[2]);

        let mut released = Vec::new();
        arena.clear_with(|v| released.push(v));
        released.sort_unstable();

        assert_eq!(released, vec![0, 1, 3, 4]);
        assert!(handles.iter().all(|h| arena.get(*h).is_none()));

        // Every slot is reusable afterwards.
        let again: Vec<_> = (0..5).map(|i| arena.insert(i).unwrap()).collect();
        assert!(again.iter().all(|h| h.index() < 5));
    }
}
