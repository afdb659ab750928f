//! Read-only traversals of a [`Tree`](crate::Tree).
//!
//! [`Iter`] steps through items in key order along the threaded list. [`Walk`] visits the tree
//! structure itself, reporting every node and every link between nodes, which is all a
//! visualizer (like [`dot`](crate::dot)) needs to draw the tree.

use std::iter::FusedIterator;

use crate::arena::{Arena, NodeRef};
use crate::node::Node;

/// An iterator over the items of a tree in key order. Created by
/// [`Tree::iter`](crate::Tree::iter).
///
/// Each step follows one `next` (or, from the back, `prev`) link, so it's `O(1)`.
pub struct Iter<'a, T> {
    arena: &'a Arena<Node<T>>,
    front: Option<NodeRef>,
    back: Option<NodeRef>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(
        arena: &'a Arena<Node<T>>,
        head: Option<NodeRef>,
        tail: Option<NodeRef>,
        count: usize,
    ) -> Self {
        Self {
            arena,
            front: head,
            back: tail,
            remaining: count,
        }
    }
}

/// Manual implementation of `Clone` so cloning the iterator doesn't require `T: Clone`.
impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        // The count stops the two ends from crossing when iterating from both sides.
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        let node = &arena[self.front?];
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        let node = &arena[self.back?];
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.item)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// The kind of link an [`Edge`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    /// From the tree to its root node.
    Top,
    /// From the tree to the node with the smallest item.
    Head,
    /// From the tree to the node with the largest item.
    Tail,
    /// From a node to the root of its left subtree.
    Left,
    /// From a node to the root of its right subtree.
    Right,
    /// From a node to its in-order successor.
    Next,
    /// From a node to its in-order predecessor.
    Prev,
}

impl Relation {
    /// The lowercase name of the relation, e.g. `"left"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Head => "head",
            Self::Tail => "tail",
            Self::Left => "left",
            Self::Right => "right",
            Self::Next => "next",
            Self::Prev => "prev",
        }
    }
}

/// Where an [`Edge`] starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// The tree itself (for `top`, `head` and `tail`).
    Tree,
    /// A node.
    Node(NodeRef),
}

/// A single link in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Where the link starts.
    pub source: Source,
    /// What kind of link it is.
    pub relation: Relation,
    /// The node it points to.
    pub target: NodeRef,
}

/// One step of a [`Walk`].
#[derive(Debug, PartialEq, Eq)]
pub enum Visit<'a, T> {
    /// A node and its item. Every node is visited exactly once, before any of its edges.
    Node {
        /// The node being visited.
        node: NodeRef,
        /// Its item.
        item: &'a T,
    },
    /// A link between the tree or a node and another node.
    Edge(Edge),
}

impl<T> Visit<'_, T> {
    /// The edge, if this step is one.
    pub fn edge(&self) -> Option<Edge> {
        match self {
            Self::Node { .. } => None,
            Self::Edge(edge) => Some(*edge),
        }
    }
}

/// A read-only, structural walk over a tree. Created by [`Tree::walk`](crate::Tree::walk).
///
/// The walk yields, in order:
///
/// 1. the `top` edge from the tree,
/// 2. for each node in pre-order (node, left subtree, right subtree): the node itself followed
///    by its `left`, `right`, `next` and `prev` edges (whichever exist),
/// 3. the `head` and `tail` edges from the tree.
///
/// An empty tree yields nothing. The walk keeps its own stack so deep trees don't recurse.
pub struct Walk<'a, T> {
    arena: &'a Arena<Node<T>>,
    nodes: Vec<NodeRef>,
    // Edges of the current node still to yield, stored in reverse.
    edges: Vec<Edge>,
    ends: Option<(NodeRef, NodeRef)>,
}

impl<'a, T> Walk<'a, T> {
    pub(crate) fn new(
        arena: &'a Arena<Node<T>>,
        top: Option<NodeRef>,
        head: Option<NodeRef>,
        tail: Option<NodeRef>,
    ) -> Self {
        let mut walk = Self {
            arena,
            nodes: Vec::new(),
            edges: Vec::new(),
            ends: head.zip(tail),
        };
        if let Some(top) = top {
            walk.nodes.push(top);
            walk.edges.push(Edge {
                source: Source::Tree,
                relation: Relation::Top,
                target: top,
            });
        }
        walk
    }
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = Visit<'a, T>;

    fn next(&mut self) -> Option<Visit<'a, T>> {
        if let Some(edge) = self.edges.pop() {
            return Some(Visit::Edge(edge));
        }

        if let Some(id) = self.nodes.pop() {
            let arena = self.arena;
            let node = &arena[id];
            self.nodes.extend(node.right);
            self.nodes.extend(node.left);

            let links = [
                (Relation::Prev, node.prev),
                (Relation::Next, node.next),
                (Relation::Right, node.right),
                (Relation::Left, node.left),
            ];
            for (relation, target) in links {
                if let Some(target) = target {
                    self.edges.push(Edge {
                        source: Source::Node(id),
                        relation,
                        target,
                    });
                }
            }
            return Some(Visit::Node {
                node: id,
                item: &node.item,
            });
        }

        let (head, tail) = self.ends.take()?;
        self.edges.push(Edge {
            source: Source::Tree,
            relation: Relation::Tail,
            target: tail,
        });
        Some(Visit::Edge(Edge {
            source: Source::Tree,
            relation: Relation::Head,
            target: head,
        }))
    }
}
