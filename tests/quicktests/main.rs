//! Property tests driving the tree only through its public interface.

use std::cmp::Ordering;

use threaded_avl::{NodeRef, Tree};

mod tree;

/// Recomputes the height of the subtree at `node` from `left`/`right` links alone, asserting the
/// AVL balance rule on the way.
fn checked_height<T, C, D>(tree: &Tree<T, C, D>, node: Option<NodeRef>) -> usize
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    // An explicit stack of (node, children visited?) keeps deep trees from recursing.
    let mut heights = std::collections::HashMap::new();
    let mut stack: Vec<(NodeRef, bool)> = node.into_iter().map(|n| (n, false)).collect();
    while let Some((id, children_done)) = stack.pop() {
        let n = tree.node(id).expect("linked node is live");
        if children_done {
            let left = n.left().map_or(0, |l| heights[&l]);
            let right = n.right().map_or(0, |r| heights[&r]);
            assert!(usize::abs_diff(left, right) <= 1, "unbalanced at {id:?}");
            heights.insert(id, left.max(right) + 1);
        } else {
            stack.push((id, true));
            stack.extend(n.left().map(|l| (l, false)));
            stack.extend(n.right().map(|r| (r, false)));
        }
    }
    node.map_or(0, |n| heights[&n])
}

/// In-order handles via `left`/`right`.
fn in_order<T, C, D>(tree: &Tree<T, C, D>) -> Vec<NodeRef>
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    let mut out = Vec::new();
    let mut stack = Vec::new();
    let mut cursor = tree.top();
    loop {
        while let Some(id) = cursor {
            stack.push(id);
            cursor = tree.node(id).and_then(|n| n.left());
        }
        let Some(id) = stack.pop() else {
            return out;
        };
        out.push(id);
        cursor = tree.node(id).and_then(|n| n.right());
    }
}

/// Checks balance, ordering, list/tree coherence, `head`/`tail` and the count through the
/// public accessors only.
pub(crate) fn check<T, C, D>(tree: &Tree<T, C, D>, cmp: impl Fn(&T, &T) -> Ordering)
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
{
    assert_eq!(checked_height(tree, tree.top()), tree.height());

    let ordered = in_order(tree);
    assert_eq!(ordered.len(), tree.count());
    for pair in ordered.windows(2) {
        let (a, b) = (tree.node(pair[0]).unwrap(), tree.node(pair[1]).unwrap());
        assert_eq!(cmp(a.item(), b.item()), Ordering::Less);
    }

    let forward: Vec<_> = std::iter::successors(tree.head(), |id| tree.node(*id)?.next())
        .take(tree.count() + 1)
        .collect();
    assert_eq!(forward, ordered);
    let mut backward: Vec<_> = std::iter::successors(tree.tail(), |id| tree.node(*id)?.prev())
        .take(tree.count() + 1)
        .collect();
    backward.reverse();
    assert_eq!(backward, ordered);

    assert_eq!(tree.head(), ordered.first().copied());
    assert_eq!(tree.tail(), ordered.last().copied());
}
