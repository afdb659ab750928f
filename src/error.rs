//! Errors reported by [`Tree`](crate::Tree) operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Why an [`insert`](crate::Tree::insert) was refused. Either way the tree is left exactly as it
/// was and the rejected item is handed back, untouched and never passed to the destructor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsertError<T> {
    /// An item comparing equal to this one is already stored.
    #[error("an item with an equal key is already in the tree")]
    DuplicateKey(T),
    /// Storage for the new node could not be allocated.
    #[error("could not allocate a node for the item")]
    AllocationFailure(T),
}

impl<T> InsertError<T> {
    /// Takes back ownership of the item that could not be inserted.
    pub fn into_item(self) -> T {
        match self {
            Self::DuplicateKey(item) | Self::AllocationFailure(item) => item,
        }
    }

    /// Borrows the rejected item.
    pub fn item(&self) -> &T {
        match self {
            Self::DuplicateKey(item) | Self::AllocationFailure(item) => item,
        }
    }
}

/// Reserving node storage up front failed.
#[derive(Debug, Error)]
#[error("could not reserve storage for {requested} nodes")]
pub struct AllocationFailure {
    requested: usize,
    #[source]
    source: TryReserveError,
}

impl AllocationFailure {
    pub(crate) fn new(requested: usize, source: TryReserveError) -> Self {
        Self { requested, source }
    }

    /// How many nodes the failed reservation asked for.
    pub fn requested(&self) -> usize {
        self.requested
    }
}
