//! Renders a [`Tree`] as a Graphviz `digraph`, for eyeballing its shape while debugging.
//!
//! Child links are drawn as ordinary edges and list links (`next`/`prev`, `head`/`tail`) in
//! their own colours. The `head` and `tail` edges don't constrain the layout, so node placement
//! follows the `left`/`right` structure alone.
//!
//! # Examples
//!
//! ```
//! use threaded_avl::{dot, Tree};
//!
//! let mut tree = Tree::ordered();
//! tree.insert(2).unwrap();
//! tree.insert(1).unwrap();
//!
//! let mut out = String::new();
//! dot::render(&tree, |n| n.to_string(), &mut out).unwrap();
//!
//! assert!(out.starts_with("digraph {\n"));
//! assert!(out.contains("[label=\"left\"; color=blue; fontcolor=blue]"));
//! ```

use std::cmp::Ordering;
use std::fmt::{self, Write};

use crate::walk::{Relation, Source, Visit};
use crate::Tree;

fn relation_color(relation: Relation) -> &'static str {
    match relation {
        Relation::Top => "green",
        Relation::Head => "darkcyan",
        Relation::Tail => "darkmagenta",
        Relation::Left => "blue",
        Relation::Right => "red",
        Relation::Next => "magenta",
        Relation::Prev => "cyan",
    }
}

/// Writes `label` with `"`, `\` and newlines escaped for a double-quoted dot string.
fn write_escaped<W: Write>(out: &mut W, label: &str) -> fmt::Result {
    for c in label.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            c => out.write_char(c)?,
        }
    }
    Ok(())
}

/// Writes `tree` to `out` in dot format. Nodes are named `n<index>` after their
/// [`NodeRef::index`](crate::NodeRef::index) and labelled with `label(item)`.
///
/// An empty tree is drawn as `top` pointing at a red `NULL` node.
pub fn render<T, C, D, L, W>(tree: &Tree<T, C, D>, mut label: L, out: &mut W) -> fmt::Result
where
    C: Fn(&T, &T) -> Ordering,
    D: FnMut(T),
    L: FnMut(&T) -> String,
    W: Write,
{
    writeln!(out, "digraph {{")?;

    if tree.is_empty() {
        writeln!(
            out,
            "  tree -> NULL [label=\"top\"; color=green; fontcolor=green];"
        )?;
        writeln!(out, "  NULL [color=red; fontcolor=red]")?;
    }

    for visit in tree.walk() {
        match visit {
            Visit::Node { node, item } => {
                write!(out, "  n{} [label=\"", node.index())?;
                write_escaped(out, &label(item))?;
                writeln!(out, "\"];")?;
            }
            Visit::Edge(edge) => {
                match edge.source {
                    Source::Tree => write!(out, "  tree")?,
                    Source::Node(node) => write!(out, "  n{}", node.index())?,
                }
                let color = relation_color(edge.relation);
                write!(
                    out,
                    " -> n{} [label=\"{}\"; color={color}; fontcolor={color}",
                    edge.target.index(),
                    edge.relation.name(),
                )?;
                if matches!(edge.relation, Relation::Head | Relation::Tail) {
                    write!(out, "; constraint=false")?;
                }
                writeln!(out, "];")?;
            }
        }
    }

    writeln!(out, "}}")
}
