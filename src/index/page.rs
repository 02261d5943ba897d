//! Per-page node arena
//!
//! All nodes of a page sit in one flat vector in record order. The tree is
//! expressed through `parent`/`children` indices into that vector, and the
//! top-level nodes (recorded at stack depth 0) are listed in `roots`.

use super::node::{NodeId, SyncNode};

/// Nodes and roots of a single page
#[derive(Debug, Default, Clone)]
pub struct PageTree {
    /// Every node on the page, in record order
    pub nodes: Vec<SyncNode>,
    /// Nodes without a parent container
    pub roots: Vec<NodeId>,
}

impl PageTree {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&SyncNode> {
        self.nodes.get(id as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate `(id, node)` over the flat list
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SyncNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (idx as NodeId, node))
    }

    /// Children ids of a node (empty for leaves and unknown ids)
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Walk parent links upward, starting with the parent of `id`
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            page: self,
            next: self.get(id).and_then(|n| n.parent),
        }
    }

    // === Builder methods (used by IndexBuilder) ===

    /// Append a node, linking it under `parent` or registering it as a root
    pub(crate) fn push(&mut self, mut node: SyncNode, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        node.parent = parent;
        self.nodes.push(node);
        match parent.and_then(|p| self.nodes.get_mut(p as usize)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
        self.roots.shrink_to_fit();
    }
}

/// Iterator over ancestor ids, nearest first
pub struct Ancestors<'a> {
    page: &'a PageTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.page.get(id).and_then(|n| n.parent);
        Some(id)
    }
}
