//! Distance tests between a query point and recorded nodes
//!
//! All values are page points. A node's rectangle spans
//! `[h, h + width]` horizontally and `[v - height, v + depth]` vertically.

use crate::index::{NodeKind, SyncNode};

/// Point inside or on the border of the node's rectangle
#[inline]
pub fn contains(node: &SyncNode, x: f64, y: f64) -> bool {
    x >= node.h && x <= node.right() && y >= node.top() && y <= node.bottom()
}

/// Manhattan distance from the point to the rectangle, 0 inside it
#[inline]
pub fn l1_distance(node: &SyncNode, x: f64, y: f64) -> f64 {
    gap(x, node.h, node.right()) + gap(y, node.top(), node.bottom())
}

#[inline]
fn gap(p: f64, min: f64, max: f64) -> f64 {
    if p < min {
        min - p
    } else if p > max {
        p - max
    } else {
        0.0
    }
}

/// Signed horizontal distance from `x` to a sibling.
///
/// Positive when the sibling lies to the right of `x`, negative when it
/// lies to the left, 0 on a hit. Kerns are recorded at the position reached
/// *after* their move, so their interval extends backwards from `h`; the
/// `kern_bias` makes them lose ties against boxes.
pub fn ordered_h_distance(node: &SyncNode, x: f64, kern_bias: f64) -> f64 {
    match node.kind {
        NodeKind::HBox | NodeKind::VBox | NodeKind::VoidHBox | NodeKind::VoidVBox => {
            if x < node.h {
                node.h - x
            } else if x > node.right() {
                node.right() - x
            } else {
                0.0
            }
        }
        NodeKind::Kern => {
            let (min, max) = if node.reversed {
                (node.h, node.h + node.width)
            } else {
                (node.h - node.width, node.h)
            };
            if x < min {
                min - x + kern_bias
            } else if x > max {
                max - x - kern_bias
            } else {
                0.0
            }
        }
        NodeKind::Glue | NodeKind::Math => node.h - x,
    }
}
