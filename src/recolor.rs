//! Fill rewriting for monochrome variants.

use palette::Srgb;

use crate::scene::{Node, Paint};

/// Replaces the color of every solid fill in the subtree.
///
/// Opacity and visibility of each solid fill are kept; gradient and image
/// fills are left exactly as they were.
pub fn apply_color(node: &mut Node, color: Srgb) {
    node.walk_mut(&mut |n| {
        let Some(fills) = n.kind.fills_mut() else {
            return;
        };
        for paint in fills.iter_mut() {
            if let Paint::Solid { color: c, .. } = paint {
                *c = color;
            }
        }
    });
}

/// Drops every fill marked invisible anywhere in the subtree.
///
/// Cleans up the hidden default fills hosts attach to new containers.
pub fn strip_invisible_fills(node: &mut Node) {
    node.walk_mut(&mut |n| {
        if let Some(fills) = n.kind.fills_mut() {
            fills.retain(Paint::is_visible);
        }
    });
}
