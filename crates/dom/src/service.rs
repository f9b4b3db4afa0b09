//! DOM Service - builds the arena from CDP responses
//!
//! This handles:
//! - DOM tree construction from `DOM.getDocument` JSON
//! - Merging `CSS.getComputedStyleForNode` results into nodes

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::*;
use serde_json::Value;
use std::collections::HashMap;

/// Configuration for DOM service
#[derive(Debug, Clone)]
pub struct DomServiceConfig {
    /// Descend into `contentDocument` of iframes
    pub include_content_documents: bool,
    /// Descend into shadow roots
    pub include_shadow_roots: bool,
    /// Keep comment and processing-instruction nodes
    pub keep_comments: bool,
}

impl Default for DomServiceConfig {
    fn default() -> Self {
        Self {
            include_content_documents: false,
            include_shadow_roots: false,
            keep_comments: true,
        }
    }
}

/// Main DOM service
pub struct DomService {
    config: DomServiceConfig,
    arena: DomArena,
}

impl DomService {
    /// Create new DOM service with default config
    pub fn new() -> Self {
        Self::with_config(DomServiceConfig::default())
    }

    /// Create DOM service with custom config
    pub fn with_config(config: DomServiceConfig) -> Self {
        Self {
            config,
            arena: DomArena::new(),
        }
    }

    /// Get reference to internal arena
    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    /// Get mutable reference to internal arena
    pub fn arena_mut(&mut self) -> &mut DomArena {
        &mut self.arena
    }

    /// Take ownership of the arena
    pub fn into_arena(self) -> DomArena {
        self.arena
    }

    /// Parse CDP DOM tree response and build arena
    ///
    /// Input format matches CDP's DOM.getDocument response:
    /// ```json
    /// {
    ///   "root": {
    ///     "nodeId": 1,
    ///     "backendNodeId": 1,
    ///     "nodeType": 9,
    ///     "nodeName": "#document",
    ///     "children": [...]
    ///   }
    /// }
    /// ```
    pub fn parse_cdp_dom_tree(&mut self, cdp_response: &Value) -> Result<NodeId> {
        let root = cdp_response
            .get("root")
            .ok_or_else(|| DomError::CdpError("Missing 'root' in CDP response".to_string()))?;

        self.arena.clear();
        let root_id = self.parse_node(root, None)?;
        self.arena.set_root(root_id)?;

        tracing::debug!("Built DOM arena with {} nodes", self.arena.len());
        Ok(root_id)
    }

    /// Parse a CDP DOM tree from its JSON text
    pub fn parse_cdp_dom_json(&mut self, json: &str) -> Result<NodeId> {
        let value: Value = serde_json::from_str(json)?;
        self.parse_cdp_dom_tree(&value)
    }

    /// Recursively parse a CDP node
    fn parse_node(&mut self, cdp_node: &Value, parent_id: Option<NodeId>) -> Result<NodeId> {
        let node_id = cdp_node["nodeId"]
            .as_u64()
            .ok_or_else(|| DomError::CdpError("Missing nodeId".to_string()))?
            as u32;

        let backend_node_id = cdp_node["backendNodeId"]
            .as_u64()
            .ok_or_else(|| DomError::CdpError("Missing backendNodeId".to_string()))?
            as u32;

        let node_type_val = cdp_node["nodeType"]
            .as_u64()
            .ok_or_else(|| DomError::CdpError("Missing nodeType".to_string()))?
            as u8;

        let node_type =
            NodeType::from_u8(node_type_val).ok_or_else(|| DomError::InvalidNodeType {
                expected: "valid NodeType".to_string(),
                actual: format!("{}", node_type_val),
            })?;

        let node_name = cdp_node["nodeName"].as_str().unwrap_or("").to_string();

        // Parse attributes (flat [name, value, name, value, ...] list)
        let mut attributes = HashMap::new();
        if let Some(attrs) = cdp_node["attributes"].as_array() {
            for pair in attrs.chunks_exact(2) {
                if let (Some(key), Some(value)) = (pair[0].as_str(), pair[1].as_str()) {
                    attributes.insert(key.to_string(), value.to_string());
                }
            }
        }

        let mut node = DomNode::new(node_id, backend_node_id, node_type, node_name);

        // localName is authoritative when present (SVG keeps its case there)
        if let Some(local_name) = cdp_node["localName"].as_str() {
            if node_type == NodeType::Element && !local_name.is_empty() {
                node.local_name = local_name.to_string();
            }
        }
        node.node_value = cdp_node["nodeValue"].as_str().unwrap_or("").to_string();
        node.attributes = attributes;
        node.parent_id = parent_id;

        let current_node_id = self.arena.add_node(node);

        let mut child_ids: smallvec::SmallVec<[NodeId; 4]> = smallvec::SmallVec::new();

        if let Some(children) = cdp_node["children"].as_array() {
            for child in children {
                if !self.config.keep_comments && is_comment_like(child) {
                    continue;
                }
                child_ids.push(self.parse_node(child, Some(current_node_id))?);
            }
        }

        if self.config.include_shadow_roots {
            if let Some(shadow_roots) = cdp_node["shadowRoots"].as_array() {
                for shadow in shadow_roots {
                    child_ids.push(self.parse_node(shadow, Some(current_node_id))?);
                }
            }
        }

        if self.config.include_content_documents {
            if let Some(content_doc) = cdp_node.get("contentDocument") {
                child_ids.push(self.parse_node(content_doc, Some(current_node_id))?);
            }
        }

        for (index, &child_id) in child_ids.iter().enumerate() {
            self.arena.get_mut(child_id)?.index_in_parent = index as u32;
        }
        self.arena.get_mut(current_node_id)?.children_ids = child_ids;

        Ok(current_node_id)
    }

    /// Merge a `CSS.getComputedStyleForNode` response into the node with the
    /// given backend id
    ///
    /// Input format:
    /// ```json
    /// { "computedStyle": [ { "name": "display", "value": "block" }, ... ] }
    /// ```
    pub fn merge_computed_style(&mut self, backend_node_id: u32, response: &Value) -> Result<()> {
        let properties = response["computedStyle"].as_array().ok_or_else(|| {
            DomError::CdpError("Missing 'computedStyle' in CDP response".to_string())
        })?;

        let node_id = self
            .arena
            .get_node_id_by_backend(backend_node_id)
            .ok_or(DomError::NodeNotFound(backend_node_id))?;
        let node = self.arena.get_mut(node_id)?;

        for property in properties {
            if let (Some(name), Some(value)) = (property["name"].as_str(), property["value"].as_str())
            {
                node.set_computed_style(name, value);
            }
        }

        Ok(())
    }
}

impl Default for DomService {
    fn default() -> Self {
        Self::new()
    }
}

fn is_comment_like(cdp_node: &Value) -> bool {
    matches!(
        cdp_node["nodeType"].as_u64().and_then(|t| NodeType::from_u8(t as u8)),
        Some(NodeType::Comment | NodeType::ProcessingInstruction)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Value {
        serde_json::json!({
            "root": {
                "nodeId": 1,
                "backendNodeId": 1,
                "nodeType": 9,
                "nodeName": "#document",
                "nodeValue": "",
                "children": [{
                    "nodeId": 2,
                    "backendNodeId": 2,
                    "nodeType": 1,
                    "nodeName": "DIV",
                    "localName": "div",
                    "nodeValue": "",
                    "attributes": ["id", "main"],
                    "children": [
                        {
                            "nodeId": 3,
                            "backendNodeId": 3,
                            "nodeType": 3,
                            "nodeName": "#text",
                            "nodeValue": "Hello"
                        },
                        {
                            "nodeId": 4,
                            "backendNodeId": 4,
                            "nodeType": 8,
                            "nodeName": "#comment",
                            "nodeValue": "ignored"
                        }
                    ]
                }]
            }
        })
    }

    #[test]
    fn test_parse_simple_dom() {
        let mut service = DomService::new();
        let root_id = service.parse_cdp_dom_tree(&sample_document()).unwrap();

        assert_eq!(root_id, 0);
        assert_eq!(service.arena().len(), 4);

        let div = service.arena().find_by_id("main").unwrap();
        let div = service.arena().get(div).unwrap();
        assert_eq!(div.local_name, "div");
        assert_eq!(div.parent_id, Some(root_id));
        assert_eq!(div.children_ids.len(), 2);
        assert_eq!(service.arena().text_content(root_id).unwrap(), "Hello");

        let comment = div.children_ids[1];
        assert_eq!(service.arena().get(comment).unwrap().index_in_parent, 1);
        assert_eq!(service.arena().previous_sibling(comment).unwrap(), Some(div.children_ids[0]));
    }

    fn shadow_and_frame_document() -> Value {
        serde_json::json!({
            "root": {
                "nodeId": 1,
                "backendNodeId": 1,
                "nodeType": 9,
                "nodeName": "#document",
                "children": [
                    {
                        "nodeId": 2,
                        "backendNodeId": 2,
                        "nodeType": 1,
                        "nodeName": "DIV",
                        "localName": "div",
                        "attributes": ["id", "host"],
                        "children": [
                            { "nodeId": 3, "backendNodeId": 3, "nodeType": 3, "nodeName": "#text", "nodeValue": "light" }
                        ],
                        "shadowRoots": [{
                            "nodeId": 4,
                            "backendNodeId": 4,
                            "nodeType": 11,
                            "nodeName": "#document-fragment",
                            "children": [
                                { "nodeId": 5, "backendNodeId": 5, "nodeType": 3, "nodeName": "#text", "nodeValue": "shadow" }
                            ]
                        }]
                    },
                    {
                        "nodeId": 6,
                        "backendNodeId": 6,
                        "nodeType": 1,
                        "nodeName": "IFRAME",
                        "localName": "iframe",
                        "attributes": ["id", "frame"],
                        "contentDocument": {
                            "nodeId": 7,
                            "backendNodeId": 7,
                            "nodeType": 9,
                            "nodeName": "#document",
                            "children": [
                                { "nodeId": 8, "backendNodeId": 8, "nodeType": 3, "nodeName": "#text", "nodeValue": "framed" }
                            ]
                        }
                    }
                ]
            }
        })
    }

    #[test]
    fn test_shadow_roots_and_content_documents_skipped_by_default() {
        let mut service = DomService::new();
        let root_id = service.parse_cdp_dom_tree(&shadow_and_frame_document()).unwrap();

        assert_eq!(service.arena().len(), 4);
        assert_eq!(service.arena().text_content(root_id).unwrap(), "light");
    }

    #[test]
    fn test_shadow_roots_and_content_documents_included() {
        let mut service = DomService::with_config(DomServiceConfig {
            include_shadow_roots: true,
            include_content_documents: true,
            ..Default::default()
        });
        let root_id = service.parse_cdp_dom_tree(&shadow_and_frame_document()).unwrap();
        let arena = service.arena();

        assert_eq!(arena.len(), 8);
        assert_eq!(arena.text_content(root_id).unwrap(), "lightshadowframed");

        // Shadow root follows the light children of its host
        let host = arena.find_by_id("host").unwrap();
        let shadow = arena.get_node_id_by_backend(4).unwrap();
        assert_eq!(arena.get(host).unwrap().children_ids.len(), 2);
        assert_eq!(arena.get(shadow).unwrap().node_type, NodeType::DocumentFragment);
        assert_eq!(arena.get(shadow).unwrap().index_in_parent, 1);
        assert_eq!(arena.get(shadow).unwrap().parent_id, Some(host));

        let frame = arena.find_by_id("frame").unwrap();
        let frame_doc = arena.get_node_id_by_backend(7).unwrap();
        assert_eq!(arena.get(frame).unwrap().children_ids.as_slice(), &[frame_doc]);
        assert_eq!(arena.next_sibling(host).unwrap(), Some(frame));
    }

    #[test]
    fn test_parse_drops_comments_when_configured() {
        let mut service = DomService::with_config(DomServiceConfig {
            keep_comments: false,
            ..Default::default()
        });
        service.parse_cdp_dom_tree(&sample_document()).unwrap();
        assert_eq!(service.arena().len(), 3);
    }

    #[test]
    fn test_missing_root() {
        let mut service = DomService::new();
        let err = service
            .parse_cdp_dom_tree(&serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, DomError::CdpError(_)));
    }

    #[test]
    fn test_invalid_node_type() {
        let mut service = DomService::new();
        let err = service
            .parse_cdp_dom_tree(&serde_json::json!({
                "root": { "nodeId": 1, "backendNodeId": 1, "nodeType": 99 }
            }))
            .unwrap_err();
        assert!(matches!(err, DomError::InvalidNodeType { .. }));
    }

    #[test]
    fn test_parse_json_text_error() {
        let mut service = DomService::new();
        let err = service.parse_cdp_dom_json("{ not json").unwrap_err();
        assert!(matches!(err, DomError::ParseError(_)));
    }

    #[test]
    fn test_merge_computed_style() {
        let mut service = DomService::new();
        service.parse_cdp_dom_tree(&sample_document()).unwrap();
        service
            .merge_computed_style(
                2,
                &serde_json::json!({
                    "computedStyle": [
                        { "name": "display", "value": "flex" },
                        { "name": "white-space", "value": "pre" }
                    ]
                }),
            )
            .unwrap();

        let div = service.arena().get_by_backend_id(2).unwrap();
        assert_eq!(div.computed_style("display"), Some("flex"));
        assert_eq!(div.computed_style("white-space"), Some("pre"));

        let missing = service.merge_computed_style(99, &serde_json::json!({ "computedStyle": [] }));
        assert!(matches!(missing, Err(DomError::NodeNotFound(99))));
    }
}
