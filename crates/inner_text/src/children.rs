//! Child selection
//!
//! Form controls render their own chrome: inside `select` only listed
//! options (and option groups) contribute text.

use crate::tree::{NodeKind, TreeNode};

/// Children of `node` that take part in text collection, in document order
pub fn selected_children<N: TreeNode>(node: &N) -> Vec<N> {
    match node.kind() {
        NodeKind::Text => Vec::new(),
        NodeKind::Element => match node.local_name() {
            Some("select") => filter_children(node, &["optgroup", "option"]),
            Some("optgroup") => filter_children(node, &["option"]),
            _ => node.children(),
        },
        NodeKind::Other => node.children(),
    }
}

fn filter_children<N: TreeNode>(node: &N, allowed: &[&str]) -> Vec<N> {
    node.children()
        .into_iter()
        .filter(|child| {
            child.is_element() && child.local_name().is_some_and(|name| allowed.contains(&name))
        })
        .collect()
}
