//! Forward search: source location to page region

use tracing::debug;

use super::PageRegion;
use crate::config::SearchConfig;
use crate::index::{NodeKind, NodeRef, SyncIndex};

/// Page region typeset from `file:line`, default configuration
pub fn forward_lookup(index: &SyncIndex, file: &str, line: u32) -> Option<PageRegion> {
    forward_lookup_with(index, file, line, &SearchConfig::default())
}

/// Page region typeset from `file:line`
///
/// Lines without records borrow the nearest recorded line within
/// `max_line_offset`, probing below before above at each distance.
pub fn forward_lookup_with(
    index: &SyncIndex,
    file: &str,
    line: u32,
    config: &SearchConfig,
) -> Option<PageRegion> {
    let tag = index.inputs.resolve(file)?;
    let found = nearest_recorded_line(index, tag, line, config.max_line_offset);
    let Some((matched_line, matched)) = found else {
        debug!(file, line, "no records near line");
        return None;
    };

    let page = matched.first()?.page;
    let on_page: Vec<NodeRef> = matched.iter().copied().filter(|r| r.page == page).collect();
    let selected = select_nodes(index, &on_page);
    debug!(
        file,
        line,
        matched_line,
        page,
        matched = matched.len(),
        selected = selected.len(),
        "forward search"
    );
    union_region(index, page, &selected, config)
}

/// Exact line first, then `line + k` and `line - k` for growing `k`
fn nearest_recorded_line(
    index: &SyncIndex,
    tag: u32,
    line: u32,
    max_offset: u32,
) -> Option<(u32, &[NodeRef])> {
    let exact = index.friends(tag, line);
    if line > 0 && !exact.is_empty() {
        return Some((line, exact));
    }
    for k in 1..=max_offset {
        let below = line.checked_add(k);
        let above = line.checked_sub(k).filter(|&l| l > 0);
        for candidate in [below, above].into_iter().flatten() {
            let refs = index.friends(tag, candidate);
            if !refs.is_empty() {
                return Some((candidate, refs));
            }
        }
    }
    None
}

/// Narrow the matched nodes down to what should be highlighted.
///
/// Leaves are replaced by their enclosing horizontal box, since a leaf alone
/// has no useful height. Without leaves, horizontal boxes are preferred over
/// vertical ones, which tend to span far more than the line.
fn select_nodes(index: &SyncIndex, refs: &[NodeRef]) -> Vec<NodeRef> {
    let Some(page) = refs.first().map(|r| r.page) else {
        return Vec::new();
    };
    let Some(tree) = index.page(page) else {
        return Vec::new();
    };

    let mut enclosing: Vec<NodeRef> = Vec::new();
    for r in refs {
        let Some(node) = tree.get(r.id) else { continue };
        if node.kind.is_box() {
            continue;
        }
        let hbox = tree
            .ancestors(r.id)
            .find(|&a| tree.get(a).is_some_and(|n| n.kind == NodeKind::HBox));
        if let Some(id) = hbox {
            let found = NodeRef { page, id };
            if !enclosing.contains(&found) {
                enclosing.push(found);
            }
        }
    }
    if !enclosing.is_empty() {
        return enclosing;
    }

    let kind_of = |r: &NodeRef| tree.get(r.id).map(|n| n.kind);
    let horizontal: Vec<NodeRef> = refs
        .iter()
        .copied()
        .filter(|r| kind_of(r).is_some_and(NodeKind::is_horizontal_box))
        .collect();
    if !horizontal.is_empty() {
        return horizontal;
    }

    let boxes: Vec<NodeRef> = refs
        .iter()
        .copied()
        .filter(|r| kind_of(r).is_some_and(NodeKind::is_box))
        .collect();
    if !boxes.is_empty() {
        return boxes;
    }

    refs.to_vec()
}

/// Bounding box of the selected nodes, with minimum extents applied
fn union_region(
    index: &SyncIndex,
    page: u32,
    selected: &[NodeRef],
    config: &SearchConfig,
) -> Option<PageRegion> {
    let tree = index.page(page)?;
    let mut nodes = selected.iter().filter_map(|r| tree.get(r.id));
    let first = nodes.next()?;

    let (mut left, mut right) = (first.h, first.right());
    let (mut top, mut bottom) = (first.top(), first.bottom());
    for node in nodes {
        left = left.min(node.h);
        right = right.max(node.right());
        top = top.min(node.top());
        bottom = bottom.max(node.bottom());
    }

    if bottom - top < config.degenerate_height {
        top = first.v - config.default_ascent;
        bottom = first.v + config.default_descent;
    }

    Some(PageRegion {
        page,
        x: left,
        y: top,
        width: (right - left).max(config.min_extent),
        height: (bottom - top).max(config.min_extent),
    })
}
