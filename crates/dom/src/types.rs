//! Core type definitions for the host DOM tree
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for small arrays (avoid heap allocation)
//! 3. Style data is optional and only present when a host merged it in

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any webpage
pub type NodeId = u32;

/// DOM `nodeType` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CdataSection = 4,
    EntityReference = 5,
    Entity = 6,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    Notation = 12,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CdataSection),
            5 => Some(NodeType::EntityReference),
            6 => Some(NodeType::Entity),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            12 => Some(NodeType::Notation),
            _ => None,
        }
    }
}

/// Computed CSS properties for one element, keyed by CSS property name
/// (`display`, `white-space`, ...).
pub type ComputedStyles = AHashMap<String, String>;

/// The DOM tree node
///
/// Layout:
/// - Small fixed-size fields first (better packing)
/// - Use indices instead of pointers
/// - Use Option<Box<T>> for large optional data
#[derive(Debug, Clone)]
pub struct DomNode {
    pub node_id: NodeId,
    pub backend_node_id: u32,
    pub node_type: NodeType,

    pub parent_id: Option<NodeId>,
    /// Position in the parent's `children_ids`
    pub index_in_parent: u32,
    pub children_ids: SmallVec<[NodeId; 4]>, // Most nodes have <4 children

    /// Raw node name as reported by the host (`DIV`, `#text`, ...)
    pub node_name: String,
    /// Lowercase tag name, empty for non-elements
    pub local_name: String,
    /// Character data for text and comment nodes
    pub node_value: String,
    pub attributes: HashMap<String, String>,

    /// Computed styles merged in from the host, if any
    pub computed_styles: Option<Box<ComputedStyles>>,
}

impl DomNode {
    /// Create a new node with required fields
    pub fn new(
        node_id: NodeId,
        backend_node_id: u32,
        node_type: NodeType,
        node_name: String,
    ) -> Self {
        let local_name = if node_type == NodeType::Element {
            node_name.to_ascii_lowercase()
        } else {
            String::new()
        };

        Self {
            node_id,
            backend_node_id,
            node_type,
            parent_id: None,
            index_in_parent: 0,
            children_ids: SmallVec::new(),
            node_name,
            local_name,
            node_value: String::new(),
            attributes: HashMap::new(),
            computed_styles: None,
        }
    }

    /// Element node with the given tag name
    pub fn element(node_id: NodeId, tag: &str) -> Self {
        Self::new(node_id, node_id, NodeType::Element, tag.to_ascii_uppercase())
    }

    /// Text node carrying `data`
    pub fn text(node_id: NodeId, data: &str) -> Self {
        let mut node = Self::new(node_id, node_id, NodeType::Text, "#text".to_string());
        node.node_value = data.to_string();
        node
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.local_name)
        } else {
            None
        }
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Text or CDATA section: the nodes whose data is rendered
    pub fn has_text_data(&self) -> bool {
        matches!(self.node_type, NodeType::Text | NodeType::CdataSection)
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Get a computed style property, if styles were merged in
    pub fn computed_style(&self, property: &str) -> Option<&str> {
        self.computed_styles
            .as_ref()
            .and_then(|styles| styles.get(property))
            .map(|s| s.as_str())
    }

    /// Set a computed style property
    pub fn set_computed_style(&mut self, property: &str, value: &str) {
        self.computed_styles
            .get_or_insert_with(Default::default)
            .insert(property.to_string(), value.to_string());
    }
}
