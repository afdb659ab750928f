//! A self-balancing Binary Search Tree (specifically, an AVL tree) whose nodes are also threaded
//! into a sorted doubly linked list. Keyed operations take `O(lg N)` while stepping to the next
//! or previous item in key order takes `O(1)` and never re-descends the tree.
//!
//! Items are opaque to the tree: they're ordered by the comparator given at construction and
//! handed to the destructor given at construction when their node is released.
//!
//! # Examples
//!
//! ```
//! use threaded_avl::{InsertError, Tree};
//!
//! let mut tree = Tree::ordered();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.search(&1), None);
//!
//! let one = tree.insert(1).unwrap();
//! assert_eq!(tree.search(&1), Some(one));
//!
//! // Inserting an equal item is refused and the item comes back.
//! assert_eq!(tree.insert(1), Err(InsertError::DuplicateKey(1)));
//!
//! tree.insert(3).unwrap();
//! tree.insert(2).unwrap();
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
//!
//! // Deleting reports whether anything was there.
//! assert!(tree.delete(&2));
//! assert!(!tree.delete(&2));
//! assert_eq!(tree.count(), 2);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::arena::{Arena, NodeRef};
use crate::error::{AllocationFailure, InsertError};
use crate::node::Node;
use crate::walk::{Iter, Walk};

/// A [`Tree`] over `Ord` items using `Ord::cmp` as the comparator and plain `drop` as the
/// destructor. Built with [`Tree::ordered`].
pub type OrdTree<T> = Tree<T, fn(&T, &T) -> Ordering, fn(T)>;

/// A threaded AVL tree. See the [module documentation](self) for an overview.
///
/// `C` is the comparator and must be a total order over `T`. `D` is the destructor; it is called
/// exactly once for every item the tree took ownership of, at the moment that item's node is
/// released (by [`delete`](Tree::delete), [`clear`](Tree::clear), [`destroy`](Tree::destroy) or
/// dropping the tree).
pub struct Tree<T, C, D>
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    arena: Arena<Node<T>>,
    top: Option<NodeRef>,
    head: Option<NodeRef>,
    tail: Option<NodeRef>,
    count: usize,
    comparator: C,
    destructor: D,
}

/// Which child slot of its parent a new node goes into.
#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl<T: Ord> OrdTree<T> {
    /// Generates a new, empty `Tree` ordered by `T`'s `Ord` implementation.
    pub fn ordered() -> Self {
        Self::new(T::cmp, drop)
    }
}

impl<T, C, D> Drop for Tree<T, C, D>
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, C, D> fmt::Debug for Tree<T, C, D>
where
    T: fmt::Debug,
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("count", &self.count)
            .field("top", &self.top)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("items", &DebugItems(self.iter()))
            .finish()
    }
}

struct DebugItems<'a, T>(Iter<'a, T>);

impl<T: fmt::Debug> fmt::Debug for DebugItems<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.clone()).finish()
    }
}

impl<T, C, D> Tree<T, C, D>
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    /// Generates a new, empty `Tree` ordering items with `comparator` and releasing them with
    /// `destructor`. Both are fixed for the lifetime of the tree.
    pub fn new(comparator: C, destructor: D) -> Self {
        Self {
            arena: Arena::new(),
            top: None,
            head: None,
            tail: None,
            count: 0,
            comparator,
            destructor,
        }
    }

    /// Like [`Tree::new`] but reserves room for `capacity` nodes up front, reporting failure
    /// instead of aborting.
    pub fn with_capacity(
        capacity: usize,
        comparator: C,
        destructor: D,
    ) -> Result<Self, AllocationFailure> {
        let mut tree = Self::new(comparator, destructor);
        tree.arena
            .try_reserve(capacity)
            .map_err(|e| AllocationFailure::new(capacity, e))?;
        Ok(tree)
    }

    /// The number of items in the tree. This is a stored counter, not a walk.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// How many levels the tree has. An empty tree has height 0 and a single node height 1.
    pub fn height(&self) -> usize {
        self.height_of(self.top)
    }

    /// The root node.
    pub fn top(&self) -> Option<NodeRef> {
        self.top
    }

    /// The node with the smallest item, where forward list traversal starts.
    pub fn head(&self) -> Option<NodeRef> {
        self.head
    }

    /// The node with the largest item, where backward list traversal starts.
    pub fn tail(&self) -> Option<NodeRef> {
        self.tail
    }

    /// Resolves a handle. Returns `None` for handles to nodes that have since been released.
    pub fn node(&self, node: NodeRef) -> Option<&Node<T>> {
        self.arena.get(node)
    }

    /// Potentially finds the node whose item compares equal to `key`. Only the parts of `key`
    /// that the comparator looks at matter.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_avl::Tree;
    ///
    /// let mut tree = Tree::new(|a: &(u8, &str), b: &(u8, &str)| a.0.cmp(&b.0), drop);
    /// let node = tree.insert((1, "one")).unwrap();
    ///
    /// assert_eq!(tree.search(&(1, "")), Some(node));
    /// assert_eq!(tree.node(node).unwrap().item(), &(1, "one"));
    /// assert_eq!(tree.search(&(42, "")), None);
    /// ```
    pub fn search(&self, key: &T) -> Option<NodeRef> {
        let mut cursor = self.top;
        while let Some(id) = cursor {
            let node = &self.arena[id];
            cursor = match (self.comparator)(key, &node.item) {
                Ordering::Less => node.left,
                Ordering::Equal => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(node = id.index(), "search hit");
                    return Some(id);
                }
                Ordering::Greater => node.right,
            };
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("search miss");
        None
    }

    /// Potentially finds the stored item comparing equal to `key`.
    pub fn get(&self, key: &T) -> Option<&T> {
        self.search(key).map(|id| &self.arena[id].item)
    }

    /// Whether an item comparing equal to `key` is stored.
    pub fn contains(&self, key: &T) -> bool {
        self.search(key).is_some()
    }

    /// Inserts `item`, returning a handle to its new node.
    ///
    /// If an equal item is already present, or storage for the node can't be allocated, the tree
    /// is left unchanged and `item` is returned inside the error. The destructor is not called.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_avl::{InsertError, Tree};
    ///
    /// let mut tree = Tree::ordered();
    /// let b = tree.insert("b").unwrap();
    /// let a = tree.insert("a").unwrap();
    ///
    /// assert_eq!(tree.head(), Some(a));
    /// assert_eq!(tree.node(a).unwrap().next(), Some(b));
    /// assert_eq!(tree.insert("a").map_err(InsertError::into_item), Err("a"));
    /// ```
    pub fn insert(&mut self, item: T) -> Result<NodeRef, InsertError<T>> {
        let mut parent = None;
        let mut cursor = self.top;
        while let Some(id) = cursor {
            let node = &self.arena[id];
            match (self.comparator)(&item, &node.item) {
                Ordering::Less => {
                    parent = Some((id, Side::Left));
                    cursor = node.left;
                }
                Ordering::Equal => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(existing = id.index(), "insert rejected duplicate key");
                    return Err(InsertError::DuplicateKey(item));
                }
                Ordering::Greater => {
                    parent = Some((id, Side::Right));
                    cursor = node.right;
                }
            }
        }

        let id = match self.arena.insert(Node::new(item)) {
            Ok(id) => id,
            Err((node, _)) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(count = self.count, "insert failed to allocate a node");
                return Err(InsertError::AllocationFailure(node.item));
            }
        };

        match parent {
            None => {
                self.top = Some(id);
                self.head = Some(id);
                self.tail = Some(id);
            }
            // A new left child sits between its parent and the parent's old predecessor.
            Some((parent, Side::Left)) => {
                let prev = self.arena[parent].prev;
                let node = &mut self.arena[id];
                node.parent = Some(parent);
                node.prev = prev;
                node.next = Some(parent);

                let parent_node = &mut self.arena[parent];
                parent_node.left = Some(id);
                parent_node.prev = Some(id);
                match prev {
                    Some(prev) => self.arena[prev].next = Some(id),
                    None => self.head = Some(id),
                }
            }
            Some((parent, Side::Right)) => {
                let next = self.arena[parent].next;
                let node = &mut self.arena[id];
                node.parent = Some(parent);
                node.prev = Some(parent);
                node.next = next;

                let parent_node = &mut self.arena[parent];
                parent_node.right = Some(id);
                parent_node.next = Some(id);
                match next {
                    Some(next) => self.arena[next].prev = Some(id),
                    None => self.tail = Some(id),
                }
            }
        }

        self.count += 1;
        if let Some((parent, _)) = parent {
            self.rebalance(parent);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(node = id.index(), count = self.count, "inserted");
        Ok(id)
    }

    /// Deletes the node whose item compares equal to `key`, passing its item to the destructor.
    /// Returns whether such a node existed. Deleting an absent key changes nothing.
    ///
    /// Handles to every other node stay valid.
    pub fn delete(&mut self, key: &T) -> bool {
        let Some(id) = self.search(key) else {
            return false;
        };

        let item = self.unlink(id);
        self.count -= 1;

        #[cfg(feature = "tracing")]
        tracing::trace!(node = id.index(), count = self.count, "deleted");
        (self.destructor)(item);
        true
    }

    /// Releases every node, passing each item to the destructor exactly once. The tree is empty
    /// and usable afterwards; handles issued before the clear never resolve again.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(count = self.count, "releasing all nodes");

        let destructor = &mut self.destructor;
        self.arena.clear_with(|node| destructor(node.item));
        self.top = None;
        self.head = None;
        self.tail = None;
        self.count = 0;
    }

    /// Consumes the tree, passing each remaining item to the destructor exactly once.
    pub fn destroy(self) {
        // The release itself happens in `Drop`.
        drop(self)
    }

    /// Iterates over the items in key order by following the threaded list. Iterating from the
    /// back follows it in reverse.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.arena, self.head, self.tail, self.count)
    }

    /// Walks the tree structure read-only, yielding every node with its item and every
    /// `top`/`head`/`tail`/`left`/`right`/`next`/`prev` link as an edge. See [`Walk`].
    pub fn walk(&self) -> Walk<'_, T> {
        Walk::new(&self.arena, self.top, self.head, self.tail)
    }

    /// Splices `id` out of both the tree and the list, rebalances, and frees its slot.
    fn unlink(&mut self, id: NodeRef) -> T {
        let node = &self.arena[id];
        let (left, right, parent) = (node.left, node.right, node.parent);
        let (prev, next, height) = (node.prev, node.next, node.height);

        let rebalance_from = match (left, right) {
            // Promote the predecessor, which is the largest node of the left subtree and so has
            // no right child. Moving the node instead of its item keeps handles stable.
            (Some(left), Some(right)) => {
                let pred = prev.expect("Node with a left child has a predecessor");
                let from = if pred == left {
                    pred
                } else {
                    let pred_parent = self.arena[pred]
                        .parent
                        .expect("Predecessor below the left child has a parent");
                    let pred_left = self.arena[pred].left;
                    self.arena[pred_parent].right = pred_left;
                    if let Some(pred_left) = pred_left {
                        self.arena[pred_left].parent = Some(pred_parent);
                    }
                    self.arena[pred].left = Some(left);
                    self.arena[left].parent = Some(pred);
                    pred_parent
                };

                let pred_node = &mut self.arena[pred];
                pred_node.right = Some(right);
                pred_node.parent = parent;
                // Stands in for the removed node's height until the walk below recomputes it.
                pred_node.height = height;
                self.arena[right].parent = Some(pred);
                self.replace_child(parent, id, Some(pred));
                Some(from)
            }
            (child, None) | (None, child) => {
                if let Some(child) = child {
                    self.arena[child].parent = parent;
                }
                self.replace_child(parent, id, child);
                parent
            }
        };

        match prev {
            Some(prev) => self.arena[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.arena[next].prev = prev,
            None => self.tail = prev,
        }

        if let Some(from) = rebalance_from {
            self.rebalance(from);
        }

        match self.arena.remove(id) {
            Some(node) => node.item,
            None => unreachable!("Deleted node was live when found"),
        }
    }

    /// Points whichever link referred to `old` (a child link of `parent`, or `top`) at `new`.
    fn replace_child(&mut self, parent: Option<NodeRef>, old: NodeRef, new: Option<NodeRef>) {
        match parent {
            None => self.top = new,
            Some(parent) => {
                let parent = &mut self.arena[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    debug_assert_eq!(parent.right, Some(old));
                    parent.right = new;
                }
            }
        }
    }

    fn height_of(&self, node: Option<NodeRef>) -> usize {
        node.map_or(0, |n| self.arena[n].height)
    }

    /// Adjusts the height of `id` to be the max of its children's heights + 1.
    fn fix_height(&mut self, id: NodeRef) {
        let node = &self.arena[id];
        let height = self.height_of(node.left).max(self.height_of(node.right)) + 1;
        self.arena[id].height = height;
    }

    /// The difference in height between the right and left subtrees. See [the Wikipedia
    /// page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    fn balance_factor(&self, id: NodeRef) -> isize {
        let node = &self.arena[id];
        self.height_of(node.right) as isize - self.height_of(node.left) as isize
    }

    /// Walks from `from` toward the root fixing heights and rotating where needed. Stops once a
    /// subtree ends up as tall as it was before the change since nothing above it can have
    /// changed either.
    fn rebalance(&mut self, from: NodeRef) {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let old_height = self.arena[id].height;
            let subtree = self.balance(id);
            let node = &self.arena[subtree];
            if node.height == old_height {
                break;
            }
            cursor = node.parent;
        }
    }

    /// Restores the AVL invariant at `id`, assuming it holds for both children. Returns the root
    /// of the subtree that used to be rooted at `id`.
    ///
    /// See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for terminology.
    fn balance(&mut self, id: NodeRef) -> NodeRef {
        self.fix_height(id);
        let root = match self.balance_factor(id) {
            -2 => {
                let left = self.arena[id].left.expect("Left heavy => left child");
                if self.balance_factor(left) > 0 {
                    self.rotate_left(left);
                }
                self.rotate_right(id)
            }
            2 => {
                let right = self.arena[id].right.expect("Right heavy => right child");
                if self.balance_factor(right) < 0 {
                    self.rotate_right(right);
                }
                self.rotate_left(id)
            }
            _ => id,
        };

        if cfg!(debug_assertions) {
            let node = &self.arena[root];
            let left_height = self.height_of(node.left);
            let right_height = self.height_of(node.right);
            assert_eq!(node.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
        root
    }

    /// Rotate `old_root` to the right. This moves the left child up vertically and `old_root`
    /// down vertically. Used to rebalance the tree when the left child is too tall. As such, it
    /// must only be called when there _is_ a left child.
    ///
    /// The threaded list is untouched: rotations don't change in-order order.
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///      /                         /
    ///   old_root                  new_root
    ///    /     \                  /     \
    /// new_root  z     rotate ->  x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    fn rotate_right(&mut self, old_root: NodeRef) -> NodeRef {
        let new_root = self.arena[old_root].left.expect("Rotate right => left child");
        let parent = self.arena[old_root].parent;
        let moved = self.arena[new_root].right;

        let old = &mut self.arena[old_root];
        old.left = moved;
        old.parent = Some(new_root);
        if let Some(moved) = moved {
            self.arena[moved].parent = Some(old_root);
        }
        self.fix_height(old_root);

        let new = &mut self.arena[new_root];
        new.right = Some(old_root);
        new.parent = parent;
        self.fix_height(new_root);
        self.replace_child(parent, old_root, Some(new_root));

        #[cfg(feature = "tracing")]
        tracing::debug!(pivot = old_root.index(), "rotated right");
        new_root
    }

    /// The mirror image of [`Tree::rotate_right`]: the right child moves up and `old_root` becomes
    /// its left child.
    fn rotate_left(&mut self, old_root: NodeRef) -> NodeRef {
        let new_root = self.arena[old_root].right.expect("Rotate left => right child");
        let parent = self.arena[old_root].parent;
        let moved = self.arena[new_root].left;

        let old = &mut self.arena[old_root];
        old.right = moved;
        old.parent = Some(new_root);
        if let Some(moved) = moved {
            self.arena[moved].parent = Some(old_root);
        }
        self.fix_height(old_root);

        let new = &mut self.arena[new_root];
        new.left = Some(old_root);
        new.parent = parent;
        self.fix_height(new_root);
        self.replace_child(parent, old_root, Some(new_root));

        #[cfg(feature = "tracing")]
        tracing::debug!(pivot = old_root.index(), "rotated left");
        new_root
    }
}

impl<'a, T, C, D> IntoIterator for &'a Tree<T, C, D>
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
impl<T, C, D> Tree<T, C, D>
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    /// Checks every structural invariant: BST order, AVL balance and stored heights, parent
    /// links, list/tree coherence, `head`/`tail` and the count. Panics on the first violation.
    pub(crate) fn validate(&self) {
        if let Some(top) = self.top {
            assert_eq!(self.arena[top].parent, None, "top has no parent");
        }

        let mut in_order = Vec::new();
        let mut stack = Vec::new();
        let mut cursor = self.top;
        loop {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.arena[id].left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            in_order.push(id);
            cursor = self.arena[id].right;
        }
        assert_eq!(in_order.len(), self.count);

        for &id in &in_order {
            let node = &self.arena[id];
            let left_height = self.height_of(node.left);
            let right_height = self.height_of(node.right);
            assert_eq!(node.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
            for child in [node.left, node.right].into_iter().flatten() {
                assert_eq!(self.arena[child].parent, Some(id));
            }
        }

        for pair in in_order.windows(2) {
            let order = (self.comparator)(&self.arena[pair[0]].item, &self.arena[pair[1]].item);
            assert_eq!(order, Ordering::Less);
        }

        let forward: Vec<_> = std::iter::successors(self.head, |id| self.arena[*id].next)
            .take(self.count + 1)
            .collect();
        assert_eq!(forward, in_order);
        let mut backward: Vec<_> = std::iter::successors(self.tail, |id| self.arena[*id].prev)
            .take(self.count + 1)
            .collect();
        backward.reverse();
        assert_eq!(backward, in_order);

        assert_eq!(self.head, in_order.first().copied());
        assert_eq!(self.tail, in_order.last().copied());
    }
}
