//! Geometry normalization: scale-to-fit, centering and constraint locking.
//!
//! These operate on a single owned subtree and touch nothing else.

use crate::scene::{Constraints, Node};

/// Uniform scale that fits a `width` x `height` box inside `max_w` x `max_h`
/// minus `padding` on every side.
///
/// A zero-length axis does not constrain the scale. Returns `None` when no
/// positive, finite scale exists (both axes empty, or no room left after
/// padding).
///
/// ```
/// use brandset::geometry::fit_scale;
///
/// assert_eq!(fit_scale(200.0, 100.0, 300.0, 100.0, 0.0), Some(1.0));
/// assert_eq!(fit_scale(50.0, 50.0, 100.0, 100.0, 20.0), Some(1.2));
/// ```
pub fn fit_scale(width: f64, height: f64, max_w: f64, max_h: f64, padding: f64) -> Option<f64> {
    let avail_w = max_w - 2.0 * padding;
    let avail_h = max_h - 2.0 * padding;
    let by_width = (width > 0.0).then(|| avail_w / width);
    let by_height = (height > 0.0).then(|| avail_h / height);
    let scale = match (by_width, by_height) {
        (Some(w), Some(h)) => w.min(h),
        (Some(s), None) | (None, Some(s)) => s,
        (None, None) => return None,
    };
    (scale.is_finite() && scale > 0.0).then_some(scale)
}

/// Scales `node` uniformly so it fits the padded box.
///
/// Uses a full rescale (strokes and text included) when the node supports
/// it, and a plain resize otherwise. Returns the applied scale, or `None` if
/// the node was left untouched because it already fits exactly or has no
/// usable size.
pub fn scale_to_fit(node: &mut Node, max_w: f64, max_h: f64, padding: f64) -> Option<f64> {
    let scale = fit_scale(node.width, node.height, max_w, max_h, padding)?;
    if scale == 1.0 {
        return None;
    }
    if node.kind.supports_rescale() {
        node.rescale(scale);
    } else {
        node.resize(node.width * scale, node.height * scale);
    }
    Some(scale)
}

/// Centers `node` inside a parent of size `width` x `height`.
pub fn center_in_parent(node: &mut Node, width: f64, height: f64) {
    node.x = (width - node.width) / 2.0;
    node.y = (height - node.height) / 2.0;
}

/// Makes every node in the subtree scale with its container and keep its
/// aspect ratio. Kinds without constraints are skipped; their children are
/// still visited.
pub fn lock_aspect_and_scale_constraints(node: &mut Node) {
    node.walk_mut(&mut |n| {
        if n.kind.supports_constraints() {
            n.constraints = Constraints::SCALE;
            n.lock_aspect = true;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{BLACK, Constraint, Document, NodeKind, Paint};

    fn rect(doc: &mut Document, w: f64, h: f64) -> Node {
        doc.create_rectangle("R", w, h, vec![Paint::solid(BLACK)])
    }

    #[test]
    fn fits_and_preserves_aspect() {
        let mut doc = Document::new();
        for (w, h) in [(1000.0, 250.0), (40.0, 300.0), (12.5, 7.0), (315.0, 140.0)] {
            let mut node = rect(&mut doc, w, h);
            scale_to_fit(&mut node, 315.0, 140.0, 8.0);
            assert!(node.width <= 299.0 + 1e-9, "width {} overflows", node.width);
            assert!(node.height <= 124.0 + 1e-9, "height {} overflows", node.height);
            assert!(
                (node.width / node.height - w / h).abs() < 1e-9,
                "aspect ratio changed for {w}x{h}"
            );
        }
    }

    #[test]
    fn exact_fit_is_a_no_op() {
        let mut doc = Document::new();
        let mut node = rect(&mut doc, 280.0, 100.0);
        let before = node.clone();
        assert_eq!(scale_to_fit(&mut node, 300.0, 100.0, 0.0), None);
        assert_eq!(node, before);
    }

    #[test]
    fn scales_stroke_weight_when_rescalable() {
        let mut doc = Document::new();
        let mut node = rect(&mut doc, 50.0, 50.0);
        if let NodeKind::Shape(s) = &mut node.kind {
            s.stroke_weight = 2.0;
        }
        assert_eq!(scale_to_fit(&mut node, 100.0, 100.0, 0.0), Some(2.0));
        let NodeKind::Shape(s) = &node.kind else {
            panic!("expected shape");
        };
        assert_eq!(s.stroke_weight, 4.0);
    }

    #[test]
    fn falls_back_to_resize() {
        let mut doc = Document::new();
        let inner = rect(&mut doc, 10.0, 10.0);
        let mut set = doc.create_component_set("Set", vec![inner]);
        set.width = 50.0;
        set.height = 25.0;
        assert_eq!(scale_to_fit(&mut set, 100.0, 100.0, 0.0), Some(2.0));
        assert_eq!((set.width, set.height), (100.0, 50.0));
        // Min-constrained child stays put under a plain resize.
        assert_eq!(set.children[0].width, 10.0);
    }

    #[test]
    fn degenerate_sizes_are_skipped() {
        let mut doc = Document::new();
        let mut empty = rect(&mut doc, 0.0, 0.0);
        assert_eq!(scale_to_fit(&mut empty, 100.0, 100.0, 0.0), None);

        let mut line = rect(&mut doc, 50.0, 0.0);
        assert_eq!(scale_to_fit(&mut line, 100.0, 100.0, 10.0), Some(1.6));
        assert_eq!(line.width, 80.0);
    }

    #[test]
    fn centering_is_idempotent() {
        let mut doc = Document::new();
        let mut node = rect(&mut doc, 30.0, 10.0);
        center_in_parent(&mut node, 100.0, 50.0);
        let once = (node.x, node.y);
        center_in_parent(&mut node, 100.0, 50.0);
        assert_eq!(once, (35.0, 20.0));
        assert_eq!((node.x, node.y), once);
    }

    #[test]
    fn lock_skips_groups_but_visits_children() {
        let mut doc = Document::new();
        let child = rect(&mut doc, 10.0, 10.0);
        let mut group = doc.create_group("G", vec![child]);
        lock_aspect_and_scale_constraints(&mut group);

        assert!(!group.lock_aspect);
        assert_eq!(group.constraints.horizontal, Constraint::Min);
        assert!(group.children[0].lock_aspect);
        assert_eq!(group.children[0].constraints, Constraints::SCALE);
    }
}
