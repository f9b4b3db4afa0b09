//! Declarative tree construction for fixtures and tests
//!
//! ```
//! use dom::builder::{elem, text};
//!
//! let spec = elem("div", [text("a"), elem("br", []), text("b")]);
//! let (arena, root) = spec.build().unwrap();
//! assert_eq!(arena.text_content(root).unwrap(), "ab");
//! ```

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::{DomNode, NodeId};

/// Description of a subtree to be materialized into a [`DomArena`]
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        styles: Vec<(String, String)>,
        children: Vec<NodeSpec>,
    },
    Text(String),
    Comment(String),
}

/// Element with the given tag and children
pub fn elem(tag: &str, children: impl IntoIterator<Item = NodeSpec>) -> NodeSpec {
    NodeSpec::Element {
        tag: tag.to_string(),
        attributes: Vec::new(),
        styles: Vec::new(),
        children: children.into_iter().collect(),
    }
}

/// Text node
pub fn text(data: &str) -> NodeSpec {
    NodeSpec::Text(data.to_string())
}

/// Comment node
pub fn comment(data: &str) -> NodeSpec {
    NodeSpec::Comment(data.to_string())
}

impl NodeSpec {
    /// Add an attribute (elements only)
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        if let NodeSpec::Element { attributes, .. } = &mut self {
            attributes.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Add a computed style property (elements only)
    pub fn style(mut self, property: &str, value: &str) -> Self {
        if let NodeSpec::Element { styles, .. } = &mut self {
            styles.push((property.to_string(), value.to_string()));
        }
        self
    }

    /// Materialize into a fresh arena, returning it with the root id set
    pub fn build(&self) -> Result<(DomArena, NodeId)> {
        let mut arena = DomArena::new();
        let root = self.build_into(&mut arena)?;
        arena.set_root(root)?;
        Ok((arena, root))
    }

    /// Materialize into an existing arena, returning the subtree root
    pub fn build_into(&self, arena: &mut DomArena) -> Result<NodeId> {
        let next_id = arena.len() as NodeId;

        match self {
            NodeSpec::Element {
                tag,
                attributes,
                styles,
                children,
            } => {
                let mut node = DomNode::element(next_id, tag);
                node.attributes = attributes.iter().cloned().collect();
                for (property, value) in styles {
                    node.set_computed_style(property, value);
                }
                let id = arena.add_node(node);
                for child in children {
                    let child_id = child.build_into(arena)?;
                    arena.append_child(id, child_id)?;
                }
                Ok(id)
            }
            NodeSpec::Text(data) => Ok(arena.add_node(DomNode::text(next_id, data))),
            NodeSpec::Comment(data) => {
                let mut node = DomNode::new(
                    next_id,
                    next_id,
                    crate::types::NodeType::Comment,
                    "#comment".to_string(),
                );
                node.node_value = data.clone();
                Ok(arena.add_node(node))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_nested() {
        let spec = elem(
            "table",
            [elem("tr", [elem("td", [text("1")]), elem("td", [text("2")])])],
        )
        .attr("id", "grid");
        let (arena, root) = spec.build().unwrap();

        assert_eq!(arena.len(), 6);
        assert_eq!(arena.root_id(), Some(root));
        assert_eq!(arena.find_by_id("grid"), Some(root));
        assert_eq!(arena.find_by_tag("td").len(), 2);
        assert_eq!(arena.text_content(root).unwrap(), "12");
    }

    #[test]
    fn test_styles_are_stored() {
        let (arena, root) = elem("span", []).style("display", "block").build().unwrap();
        assert_eq!(arena.get(root).unwrap().computed_style("display"), Some("block"));
    }

    #[test]
    fn test_comment_has_no_text_content() {
        let (arena, root) = elem("div", [comment("hidden"), text("shown")]).build().unwrap();
        assert_eq!(arena.text_content(root).unwrap(), "shown");
    }
}
