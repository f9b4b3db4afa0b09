//! Read-only host tree capability
//!
//! The extractor never owns or mutates the tree. Any host representation
//! (parsed document, arena, synthetic fixture) plugs in by implementing
//! [`TreeNode`] on a cheap handle type.

/// Node variants the extractor distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
    /// Document, fragment, comment, ... (walked through, never rendered)
    Other,
}

/// Navigation over a caller-owned tree
///
/// `PartialEq` must be node identity, not structural equality.
pub trait TreeNode: Clone + PartialEq {
    fn kind(&self) -> NodeKind;

    /// Lowercase tag name; `None` for non-elements
    fn local_name(&self) -> Option<&str>;

    /// Character data; `None` for non-text nodes
    fn text(&self) -> Option<&str>;

    fn parent(&self) -> Option<Self>;

    fn previous_sibling(&self) -> Option<Self>;

    fn next_sibling(&self) -> Option<Self>;

    /// Direct children in document order
    fn children(&self) -> Vec<Self>;

    fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    fn is_text(&self) -> bool {
        self.kind() == NodeKind::Text
    }

    /// Element with exactly this local name
    fn is_element_named(&self, name: &str) -> bool {
        self.is_element() && self.local_name() == Some(name)
    }

    /// Concatenated descendant character data (DOM `textContent`)
    fn text_content(&self) -> String {
        let mut out = String::new();
        append_text_content(self, &mut out);
        out
    }
}

fn append_text_content<N: TreeNode>(node: &N, out: &mut String) {
    match node.kind() {
        NodeKind::Text => out.push_str(node.text().unwrap_or_default()),
        NodeKind::Element | NodeKind::Other => {
            for child in node.children() {
                append_text_content(&child, out);
            }
        }
    }
}
