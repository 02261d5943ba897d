//! Inverse search: page position to source location
//!
//! 1. Pick the smallest horizontal box containing the point, else the
//!    nearest one, else the deepest nearest node of any kind.
//! 2. Descend through containers that contain the point. A vertical box
//!    with no containing child continues into its nearest non-empty child.
//! 3. Among the children of the final container, find the closest sibling
//!    on each side of `x` and arbitrate between them.

use super::geometry::{contains, l1_distance, ordered_h_distance};
use super::SourceLocation;
use crate::config::SearchConfig;
use crate::index::{NodeId, NodeKind, PageTree, SyncIndex, SyncNode};

/// Source location under `(x, y)` on `page`, default configuration
pub fn inverse_lookup(index: &SyncIndex, page: u32, x: f64, y: f64) -> Option<SourceLocation> {
    inverse_lookup_with(index, page, x, y, &SearchConfig::default())
}

/// Source location under `(x, y)` on `page`
///
/// `None` for an unknown page or a page without nodes.
pub fn inverse_lookup_with(
    index: &SyncIndex,
    page: u32,
    x: f64,
    y: f64,
    config: &SearchConfig,
) -> Option<SourceLocation> {
    let tree = index.page(page)?;
    let search = InverseSearch {
        tree,
        x,
        y,
        kern_bias: config.kern_bias,
    };
    let (tag, line) = search.run()?;
    Some(SourceLocation {
        file: index.inputs.name(tag).unwrap_or_default().to_string(),
        line,
    })
}

struct InverseSearch<'a> {
    tree: &'a PageTree,
    x: f64,
    y: f64,
    kern_bias: f64,
}

/// Closest candidate found so far on one side of the query point
#[derive(Clone, Copy)]
struct Side {
    id: NodeId,
    distance: f64,
}

impl InverseSearch<'_> {
    fn run(&self) -> Option<(u32, u32)> {
        let start = self
            .smallest_containing_hbox()
            .or_else(|| self.nearest_hbox())
            .or_else(|| self.deepest_nearest())
            .or_else(|| self.nearest_any())?;

        if !self.node(start).has_children() {
            return Some(self.tagged_location(start));
        }
        let container = self.descend(start);
        Some(self.resolve_in(container))
    }

    #[inline]
    fn node(&self, id: NodeId) -> &SyncNode {
        &self.tree.nodes[id as usize]
    }

    fn hboxes(&self) -> impl Iterator<Item = (NodeId, &SyncNode)> + '_ {
        self.tree.iter().filter(|(_, n)| n.kind == NodeKind::HBox)
    }

    /// Step 1: smallest area, then smallest vertical extent
    fn smallest_containing_hbox(&self) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64, f64)> = None;
        for (id, node) in self.hboxes() {
            if !contains(node, self.x, self.y) {
                continue;
            }
            let area = node.area();
            let tall = node.total_height();
            let better = match best {
                None => true,
                Some((_, best_area, best_tall)) => {
                    area < best_area || (area == best_area && tall < best_tall)
                }
            };
            if better {
                best = Some((id, area, tall));
            }
        }
        best.map(|(id, _, _)| id)
    }

    /// Step 2
    fn nearest_hbox(&self) -> Option<NodeId> {
        self.min_by_distance(self.hboxes())
    }

    /// Step 3, used when the page has no horizontal boxes at all.
    ///
    /// Pre-order walk over an explicit stack; nesting depth is unbounded.
    fn deepest_nearest(&self) -> Option<NodeId> {
        let mut best: Option<Candidate> = None;
        let mut pending: Vec<(NodeId, usize)> =
            self.tree.roots.iter().rev().map(|&root| (root, 0)).collect();

        while let Some((id, depth)) = pending.pop() {
            let node = self.node(id);
            let candidate = Candidate {
                id,
                distance: l1_distance(node, self.x, self.y),
                is_kern: node.kind == NodeKind::Kern,
                depth,
            };
            if best.as_ref().is_none_or(|b| candidate.beats(b)) {
                best = Some(candidate);
            }
            pending.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        best.map(|c| c.id)
    }

    /// Last resort over the flat list
    fn nearest_any(&self) -> Option<NodeId> {
        self.min_by_distance(self.tree.iter())
    }

    fn min_by_distance<'n>(
        &self,
        nodes: impl Iterator<Item = (NodeId, &'n SyncNode)>,
    ) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (id, node) in nodes {
            let d = l1_distance(node, self.x, self.y);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Step 4: follow containing containers down the tree
    fn descend(&self, start: NodeId) -> NodeId {
        let mut current = start;
        loop {
            let node = self.node(current);
            let hit = node.children.iter().copied().find(|&c| {
                let child = self.node(c);
                child.kind.is_container() && contains(child, self.x, self.y)
            });
            if let Some(child) = hit {
                current = child;
                continue;
            }
            if node.kind == NodeKind::VBox {
                let with_children = node
                    .children
                    .iter()
                    .map(|&c| (c, self.node(c)))
                    .filter(|(_, n)| n.has_children());
                if let Some(child) = self.min_by_distance(with_children) {
                    current = child;
                    continue;
                }
            }
            return current;
        }
    }

    /// Steps 5 and 6: closest sibling left and right of `x`, then arbitrate
    fn resolve_in(&self, container: NodeId) -> (u32, u32) {
        let mut container = container;
        'restart: loop {
            let mut left: Option<Side> = None;
            let mut right: Option<Side> = None;

            for &id in &self.node(container).children {
                let node = self.node(id);
                let distance = ordered_h_distance(node, self.x, self.kern_bias);

                if distance == 0.0 {
                    if node.has_children() {
                        container = id;
                        continue 'restart;
                    }
                    if node.line > 0 {
                        return node.location();
                    }
                    continue;
                }
                if node.line == 0 {
                    continue;
                }
                if distance < 0.0 {
                    if left.is_none_or(|l| distance > l.distance) {
                        left = Some(Side { id, distance });
                    }
                } else if right.is_none_or(|r| distance < r.distance) {
                    right = Some(Side { id, distance });
                }
            }

            return match (left, right) {
                (Some(l), Some(r)) => self.arbitrate(l.id, r.id),
                (Some(side), None) | (None, Some(side)) => self.node(side.id).location(),
                (None, None) => self.tagged_location(container),
            };
        }
    }

    /// Smaller line wins; on equal lines in different files, the nearer node
    fn arbitrate(&self, left: NodeId, right: NodeId) -> (u32, u32) {
        let l = self.node(left);
        let r = self.node(right);
        if l.location() == r.location() {
            return l.location();
        }
        if l.line != r.line {
            return if l.line < r.line {
                l.location()
            } else {
                r.location()
            };
        }
        if l1_distance(r, self.x, self.y) < l1_distance(l, self.x, self.y) {
            r.location()
        } else {
            l.location()
        }
    }

    /// Location of a node, borrowed from the nearest tagged ancestor when
    /// the node itself has no source line
    fn tagged_location(&self, id: NodeId) -> (u32, u32) {
        let node = self.node(id);
        if node.line > 0 {
            return node.location();
        }
        self.tree
            .ancestors(id)
            .map(|a| self.node(a))
            .find(|a| a.line > 0)
            .unwrap_or(node)
            .location()
    }
}

/// Ranking for the deepest-nearest descent of step 3
#[derive(Clone, Copy)]
struct Candidate {
    id: NodeId,
    distance: f64,
    is_kern: bool,
    depth: usize,
}

impl Candidate {
    /// Nearer wins, then non-kern, then deeper
    fn beats(&self, other: &Candidate) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }
        if self.is_kern != other.is_kern {
            return !self.is_kern;
        }
        self.depth > other.depth
    }
}
