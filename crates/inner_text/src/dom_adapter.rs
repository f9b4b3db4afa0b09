//! Adapter for the arena DOM in the `dom` crate
//!
//! [`NodeRef`] handles are cheap to copy and compare by identity, so they
//! plug straight into [`TreeNode`]. Styles merged into the arena (from CDP
//! or a fixture) are served by [`StoredStyleResolver`].

use crate::error::{BoxError, Result};
use crate::options::InnerTextOptions;
use crate::style::{ComputedStyle, StyleResolver};
use crate::tree::{NodeKind, TreeNode};
use dom::{DomArena, NodeId, NodeRef};

impl<'a> TreeNode for NodeRef<'a> {
    fn kind(&self) -> NodeKind {
        let node = self.node();
        if node.is_element() {
            NodeKind::Element
        } else if node.has_text_data() {
            NodeKind::Text
        } else {
            NodeKind::Other
        }
    }

    fn local_name(&self) -> Option<&str> {
        self.node().tag_name()
    }

    fn text(&self) -> Option<&str> {
        match self.kind() {
            NodeKind::Text => Some(self.node().node_value.as_str()),
            _ => None,
        }
    }

    fn parent(&self) -> Option<Self> {
        NodeRef::parent(self)
    }

    fn previous_sibling(&self) -> Option<Self> {
        NodeRef::previous_sibling(self)
    }

    fn next_sibling(&self) -> Option<Self> {
        NodeRef::next_sibling(self)
    }

    fn children(&self) -> Vec<Self> {
        NodeRef::children(self).collect()
    }
}

/// Resolves styles from the computed-style map stored on each node
///
/// Missing properties fall back to their CSS initial values.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredStyleResolver;

impl<'a> StyleResolver<NodeRef<'a>> for StoredStyleResolver {
    fn computed_style(&self, element: &NodeRef<'a>) -> std::result::Result<ComputedStyle, BoxError> {
        let node = element.node();
        let initial = ComputedStyle::default();
        Ok(ComputedStyle {
            display: node
                .computed_style("display")
                .map_or(initial.display, str::to_string),
            white_space: node
                .computed_style("white-space")
                .map_or(initial.white_space, str::to_string),
        })
    }
}

/// Rendered text of `node_id` using the default stylesheet
pub fn arena_inner_text(arena: &DomArena, node_id: NodeId) -> Result<String> {
    let node = arena.node_ref(node_id)?;
    crate::inner_text(&node)
}

/// Rendered text of `node_id` using the styles stored in the arena
pub fn arena_inner_text_styled(arena: &DomArena, node_id: NodeId) -> Result<String> {
    let node = arena.node_ref(node_id)?;
    let resolver: &dyn StyleResolver<NodeRef<'_>> = &StoredStyleResolver;
    crate::inner_text_with(&node, &InnerTextOptions::with_style_resolver(resolver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InnerTextError;
    use dom::builder::{comment, elem, text};
    use dom::{DomNode, NodeType};

    #[test]
    fn test_node_kinds() {
        let (arena, root) = elem("div", [text("a"), comment("c")]).build().unwrap();
        let root = arena.node_ref(root).unwrap();
        let children = TreeNode::children(&root);

        assert_eq!(root.kind(), NodeKind::Element);
        assert_eq!(root.local_name(), Some("div"));
        assert_eq!(children[0].kind(), NodeKind::Text);
        assert_eq!(children[0].text(), Some("a"));
        assert_eq!(children[1].kind(), NodeKind::Other);
        assert_eq!(children[1].text(), None);
        assert_eq!(TreeNode::next_sibling(&children[0]), Some(children[1]));
        assert_eq!(TreeNode::parent(&children[1]), Some(root));
        assert_eq!(root.text_content(), "a");
    }

    #[test]
    fn test_cdata_is_text_for_both_text_content_paths() {
        let mut arena = DomArena::new();
        let root = arena.add_node(DomNode::element(0, "div"));
        let mut cdata = DomNode::new(1, 1, NodeType::CdataSection, "#cdata-section".to_string());
        cdata.node_value = "raw".to_string();
        let cdata = arena.add_node(cdata);
        arena.append_child(root, cdata).unwrap();

        let node = arena.node_ref(root).unwrap();
        assert_eq!(TreeNode::children(&node)[0].kind(), NodeKind::Text);
        assert_eq!(node.text_content(), arena.text_content(root).unwrap());
        assert_eq!(arena_inner_text(&arena, root).unwrap(), "raw");
    }

    #[test]
    fn test_stored_resolver_falls_back_to_initial_values() {
        let (arena, root) = elem("div", [elem("span", []).style("display", "block")])
            .build()
            .unwrap();
        let root = arena.node_ref(root).unwrap();
        let span = TreeNode::children(&root)[0];

        let style = StoredStyleResolver.computed_style(&root).unwrap();
        assert_eq!(style, ComputedStyle::default());
        let style = StoredStyleResolver.computed_style(&span).unwrap();
        assert_eq!(style.display, "block");
        assert_eq!(style.white_space, "normal");
    }

    #[test]
    fn test_arena_helpers() {
        let (arena, root) = elem(
            "div",
            [elem("span", [text("a")]).style("display", "block"), text("b")],
        )
        .style("display", "block")
        .build()
        .unwrap();

        assert_eq!(arena_inner_text(&arena, root).unwrap(), "ab");
        assert_eq!(arena_inner_text_styled(&arena, root).unwrap(), "a\nb");
        assert!(matches!(
            arena_inner_text(&arena, 99),
            Err(InnerTextError::Dom(dom::DomError::NodeNotFound(99)))
        ));
    }
}
