use std::fmt;

use crate::arena::NodeRef;

/// A vertex of a [`Tree`](crate::Tree). It owns one item and links to its children and to its
/// in-order neighbours.
///
/// Nodes are only handed out by shared reference, so their links can be read but never
/// rewired from outside the tree.
pub struct Node<T> {
    pub(crate) item: T,
    pub(crate) left: Option<NodeRef>,
    pub(crate) right: Option<NodeRef>,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) prev: Option<NodeRef>,
    pub(crate) next: Option<NodeRef>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    pub(crate) height: usize,
}

impl<T> Node<T> {
    pub(crate) fn new(item: T) -> Self {
        Self {
            item,
            left: None,
            right: None,
            parent: None,
            prev: None,
            next: None,
            height: 1,
        }
    }

    /// The item stored in this node.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Root of the left subtree, whose items all compare less than this one.
    pub fn left(&self) -> Option<NodeRef> {
        self.left
    }

    /// Root of the right subtree, whose items all compare greater than this one.
    pub fn right(&self) -> Option<NodeRef> {
        self.right
    }

    /// The node holding the next larger item, if any.
    pub fn next(&self) -> Option<NodeRef> {
        self.next
    }

    /// The node holding the next smaller item, if any.
    pub fn prev(&self) -> Option<NodeRef> {
        self.prev
    }
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("item", &self.item)
            .field("height", &self.height)
            .field("left", &self.left)
            .field("right", &self.right)
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}
