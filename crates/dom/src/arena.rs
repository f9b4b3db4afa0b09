//! Arena-based DOM tree storage
//!
//! "Bad programmers worry about the code. Good programmers worry about
//! data structures and their relationships."
//!
//! This arena eliminates:
//! - Rc/Arc overhead and parent/child reference cycles
//! - Cache misses (nodes stored sequentially)
//! - GC pressure (single Vec allocation)
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Node0][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! Read-only traversal goes through [`NodeRef`], a copyable `(arena, index)`
//! handle with parent/sibling/children navigation.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId};
use ahash::AHashMap;
use std::fmt;

/// Arena allocator for DOM nodes
///
/// Design:
/// - Single Vec<DomNode> for sequential allocation
/// - HashMap for backend_node_id → NodeId lookup (CDP uses backend IDs)
/// - No Rc/Arc: use indices everywhere
#[derive(Debug)]
pub struct DomArena {
    /// All nodes stored sequentially (cache-friendly)
    nodes: Vec<DomNode>,

    /// Backend node ID → NodeId lookup (for CDP integration)
    backend_id_map: AHashMap<u32, NodeId>,

    /// Root node ID (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            backend_id_map: AHashMap::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Add a node to the arena, returns its ID
    pub fn add_node(&mut self, node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.backend_id_map.insert(node.backend_node_id, node_id);
        self.nodes.push(node);
        node_id
    }

    /// Attach `child` as the last child of `parent`
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        self.get(child_id)?;
        let siblings = &mut self.get_mut(parent_id)?.children_ids;
        let index = siblings.len() as u32;
        siblings.push(child_id);

        let child = self.get_mut(child_id)?;
        child.parent_id = Some(parent_id);
        child.index_in_parent = index;
        Ok(())
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Navigation handle for a node
    pub fn node_ref(&self, node_id: NodeId) -> Result<NodeRef<'_>> {
        self.get(node_id)?;
        Ok(NodeRef {
            arena: self,
            id: node_id,
        })
    }

    /// Get node by backend node ID (from CDP)
    pub fn get_by_backend_id(&self, backend_id: u32) -> Result<&DomNode> {
        let node_id = self
            .backend_id_map
            .get(&backend_id)
            .ok_or(DomError::NodeNotFound(backend_id))?;
        self.get(*node_id)
    }

    /// Get node ID by backend node ID
    pub fn get_node_id_by_backend(&self, backend_id: u32) -> Option<NodeId> {
        self.backend_id_map.get(&backend_id).copied()
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Get root node
    pub fn root(&self) -> Result<NodeRef<'_>> {
        let root_id = self
            .root_id
            .ok_or_else(|| DomError::CdpError("No root node set".to_string()))?;
        self.node_ref(root_id)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| i as NodeId)
    }

    /// Get children of a node
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Sibling immediately before `node_id` in its parent's child list
    pub fn previous_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.sibling_at(node_id, -1)
    }

    /// Sibling immediately after `node_id` in its parent's child list
    pub fn next_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.sibling_at(node_id, 1)
    }

    fn sibling_at(&self, node_id: NodeId, offset: isize) -> Result<Option<NodeId>> {
        let node = self.get(node_id)?;
        let Some(parent_id) = node.parent_id else {
            return Ok(None);
        };
        let siblings = &self.get(parent_id)?.children_ids;

        let index = node.index_in_parent as usize;
        let position = if siblings.get(index) == Some(&node_id) {
            index
        } else {
            // children_ids was edited directly, the stored index is stale
            match siblings.iter().position(|&id| id == node_id) {
                Some(position) => position,
                None => return Ok(None),
            }
        };

        Ok(position
            .checked_add_signed(offset)
            .and_then(|index| siblings.get(index))
            .copied())
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Concatenated data of all descendant text and CDATA nodes (DOM `textContent`)
    pub fn text_content(&self, node_id: NodeId) -> Result<String> {
        let mut text = String::new();

        self.traverse_df(node_id, |node| {
            if node.has_text_data() {
                text.push_str(&node.node_value);
            }
            Ok(())
        })?;

        Ok(text)
    }

    /// Find nodes matching predicate
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| predicate(node).then_some(idx as NodeId))
            .collect()
    }

    /// Find first node matching predicate
    pub fn find_one<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.nodes
            .iter()
            .position(|node| predicate(node))
            .map(|idx| idx as NodeId)
    }

    /// Find all elements by tag name
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find(|node| node.is_element() && node.local_name.eq_ignore_ascii_case(tag))
    }

    /// Find element by ID attribute
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_one(|node| node.is_element() && node.attr("id") == Some(id))
    }

    /// Clear arena (reuse allocation)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.backend_id_map.clear();
        self.root_id = None;
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Copyable read-only handle to a node inside a [`DomArena`]
///
/// Equality is node identity: same arena, same index.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a DomArena,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn arena(&self) -> &'a DomArena {
        self.arena
    }

    /// The underlying node. Handles are only created for valid indices.
    pub fn node(&self) -> &'a DomNode {
        &self.arena.nodes[self.id as usize]
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent_id.and_then(|id| self.handle(id))
    }

    pub fn previous_sibling(&self) -> Option<NodeRef<'a>> {
        self.arena
            .previous_sibling(self.id)
            .ok()
            .flatten()
            .and_then(|id| self.handle(id))
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        self.arena
            .next_sibling(self.id)
            .ok()
            .flatten()
            .and_then(|id| self.handle(id))
    }

    /// Children in document order; dangling child ids are skipped
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let this = *self;
        self.node()
            .children_ids
            .iter()
            .filter_map(move |&id| this.handle(id))
    }

    fn handle(&self, id: NodeId) -> Option<NodeRef<'a>> {
        match self.arena.node_ref(id) {
            Ok(node) => Some(node),
            Err(err) => {
                tracing::warn!("Dangling node reference from {}: {}", self.id, err);
                None
            }
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node_name", &node.node_name)
            .finish()
    }
}
