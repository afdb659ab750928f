//! This crate exposes a threaded AVL tree: a self-balancing Binary Search Tree whose nodes are
//! also linked, in key order, into a doubly linked list.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! An AVL tree additionally keeps, for every `Node`, the heights of its two subtrees within one
//! of each other, rotating `Node`s around after inserts and deletes to restore this. That bounds
//! the height by `O(lg N)`, so searching, inserting and deleting take `O(lg N)`.
//!
//! ## Threading
//!
//! Sorted iteration over a plain BST has to climb back up the tree between some steps. Here each
//! `Node` also links to its in-order predecessor (`prev`) and successor (`next`), and the tree
//! keeps the smallest (`head`) and largest (`tail`) `Node`, so each step is a single link.
//!
//! ## Ownership
//!
//! Nodes live in an arena owned by the [`Tree`] and are addressed by [`NodeRef`] handles. The
//! tree owns every inserted item until the item's node is released, at which point the item is
//! passed to the destructor the tree was built with.
//!
//! # Examples
//!
//! ```
//! use threaded_avl::Tree;
//!
//! let mut tree = Tree::ordered();
//! for word in ["banana", "apple", "cherry"] {
//!     tree.insert(word).unwrap();
//! }
//!
//! // Walk the list by hand...
//! let mut cursor = tree.head();
//! let mut words = Vec::new();
//! while let Some(node) = cursor.and_then(|n| tree.node(n)) {
//!     words.push(*node.item());
//!     cursor = node.next();
//! }
//! assert_eq!(words, ["apple", "banana", "cherry"]);
//!
//! // ...or let the iterator do it.
//! assert!(tree.iter().rev().eq(["cherry", "banana", "apple"].iter()));
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod arena;
pub mod avl;
pub mod dot;
mod error;
mod node;
pub mod walk;

pub use arena::NodeRef;
pub use avl::{OrdTree, Tree};
pub use error::{AllocationFailure, InsertError};
pub use node::Node;

#[cfg(test)]
mod test {
    pub(crate) mod quick;
}
