//! Scene nodes and their capability-tagged kinds.
//!
//! A [`Node`] exclusively owns its children, so every traversal here is a
//! plain depth-first walk over an owned subtree. What a node can do is decided
//! by its [`NodeKind`] tag, never guessed at the call site.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::layout::AutoLayout;
use super::paint::Paint;
use super::text::{FontName, Typeface};

// ============================================================================
// Identifiers and Geometry
// ============================================================================

/// Stable reference to a node, valid for the lifetime of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

// ============================================================================
// Constraints
// ============================================================================

/// How a child follows its container when the container is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Constraint {
    /// Pinned to the leading edge.
    #[default]
    Min,
    Center,
    /// Pinned to the trailing edge.
    Max,
    /// Pinned to both edges; the child stretches.
    Stretch,
    /// Position and size scale proportionally with the container.
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Constraints {
    pub horizontal: Constraint,
    pub vertical: Constraint,
}

impl Constraints {
    pub const SCALE: Self = Self {
        horizontal: Constraint::Scale,
        vertical: Constraint::Scale,
    };
}

// ============================================================================
// Node Kinds
// ============================================================================

/// Properties shared by frames, components and component sets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: f64,
    pub corner_radius: f64,
    pub layout: Option<AutoLayout>,
}

/// The outline of a shape node.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rectangle { corner_radius: f64 },
    Ellipse,
    /// SVG path data in its own coordinate space, mapped onto the node box.
    Vector {
        path: String,
        view_width: f64,
        view_height: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub geometry: Geometry,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: f64,
}

impl Shape {
    pub fn new(geometry: Geometry, fills: Vec<Paint>) -> Self {
        Self {
            geometry,
            fills,
            strokes: Vec::new(),
            stroke_weight: 0.0,
        }
    }
}

/// An auto-sized text run in a single typeface.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBody {
    pub characters: String,
    pub font_size: f64,
    pub face: Typeface,
    pub fills: Vec<Paint>,
}

impl TextBody {
    pub fn font(&self) -> &FontName {
        &self.face.name
    }
}

/// The closed set of node roles. Each tag fixes which operations apply.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Page,
    Frame(Container),
    Component(Container),
    ComponentSet(Container),
    Group,
    Shape(Shape),
    Text(TextBody),
    /// Export region without paint or constraints.
    Slice,
}

impl NodeKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Frame(_) => "frame",
            Self::Component(_) => "component",
            Self::ComponentSet(_) => "component set",
            Self::Group => "group",
            Self::Shape(_) => "shape",
            Self::Text(_) => "text",
            Self::Slice => "slice",
        }
    }

    pub fn container(&self) -> Option<&Container> {
        match self {
            Self::Frame(c) | Self::Component(c) | Self::ComponentSet(c) => Some(c),
            _ => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Self::Frame(c) | Self::Component(c) | Self::ComponentSet(c) => Some(c),
            _ => None,
        }
    }

    /// Fill list, for kinds that paint.
    pub fn fills(&self) -> Option<&[Paint]> {
        match self {
            Self::Frame(c) | Self::Component(c) | Self::ComponentSet(c) => Some(&c.fills),
            Self::Shape(s) => Some(&s.fills),
            Self::Text(t) => Some(&t.fills),
            Self::Page | Self::Group | Self::Slice => None,
        }
    }

    pub fn fills_mut(&mut self) -> Option<&mut Vec<Paint>> {
        match self {
            Self::Frame(c) | Self::Component(c) | Self::ComponentSet(c) => Some(&mut c.fills),
            Self::Shape(s) => Some(&mut s.fills),
            Self::Text(t) => Some(&mut t.fills),
            Self::Page | Self::Group | Self::Slice => None,
        }
    }

    pub fn layout(&self) -> Option<&AutoLayout> {
        self.container().and_then(|c| c.layout.as_ref())
    }

    /// Whether the node can hold children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Page | Self::Frame(_) | Self::Component(_) | Self::ComponentSet(_) | Self::Group
        )
    }

    /// Whether uniform rescaling (strokes, radii and font sizes included) is
    /// available. Other kinds only support a plain resize.
    pub fn supports_rescale(&self) -> bool {
        matches!(
            self,
            Self::Frame(_) | Self::Component(_) | Self::Group | Self::Shape(_) | Self::Text(_)
        )
    }

    /// Whether the node carries resize constraints.
    pub fn supports_constraints(&self) -> bool {
        matches!(
            self,
            Self::Frame(_) | Self::Component(_) | Self::ComponentSet(_) | Self::Shape(_) | Self::Text(_)
        )
    }

    /// Whether the node's own fill is painted underneath its children.
    pub fn occludes_content(&self) -> bool {
        matches!(self, Self::Frame(_) | Self::Component(_))
    }

    /// Whether the node can be copied onto the canvas as a logo source.
    pub fn is_clonable(&self) -> bool {
        !matches!(self, Self::Page | Self::Slice)
    }
}

// ============================================================================
// Node
// ============================================================================

/// A node in the document tree.
///
/// Position is relative to the parent. Nodes are created through the
/// `Document` constructors so ids stay unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    pub constraints: Constraints,
    pub lock_aspect: bool,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: impl Into<String>, kind: NodeKind, width: f64, height: f64) -> Self {
        Self {
            id,
            name: name.into(),
            x: 0.0,
            y: 0.0,
            width,
            height,
            visible: true,
            constraints: Constraints::default(),
            lock_aspect: false,
            kind,
            children: Vec::new(),
        }
    }

    /// Bounds relative to the parent.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Pre-order visit of this node and all descendants.
    pub fn walk(&self, f: &mut impl FnMut(&Node)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Pre-order mutable visit of this node and all descendants.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Uniformly scales the subtree about its top-left corner.
    ///
    /// Size, stroke weights, corner radii, layout spacing, font sizes and
    /// every descendant's position and size are multiplied by `factor`.
    pub fn rescale(&mut self, factor: f64) {
        self.width *= factor;
        self.height *= factor;
        match &mut self.kind {
            NodeKind::Frame(c) | NodeKind::Component(c) | NodeKind::ComponentSet(c) => {
                c.stroke_weight *= factor;
                c.corner_radius *= factor;
                if let Some(layout) = &mut c.layout {
                    layout.scale(factor);
                }
            }
            NodeKind::Shape(s) => {
                s.stroke_weight *= factor;
                if let Geometry::Rectangle { corner_radius } = &mut s.geometry {
                    *corner_radius *= factor;
                }
            }
            NodeKind::Text(t) => t.font_size *= factor,
            NodeKind::Page | NodeKind::Group | NodeKind::Slice => {}
        }
        for child in &mut self.children {
            child.x *= factor;
            child.y *= factor;
            child.rescale(factor);
        }
    }

    /// Changes only this node's box; stroke weights and font sizes stay.
    ///
    /// Children follow their constraints.
    pub fn resize(&mut self, width: f64, height: f64) {
        let (old_w, old_h) = (self.width, self.height);
        self.width = width;
        self.height = height;
        for child in &mut self.children {
            let (x, w) = follow(child.constraints.horizontal, child.x, child.width, old_w, width);
            let (y, h) = follow(child.constraints.vertical, child.y, child.height, old_h, height);
            child.x = x;
            child.y = y;
            if (w - child.width).abs() > f64::EPSILON || (h - child.height).abs() > f64::EPSILON {
                child.resize(w, h);
            }
        }
    }

    /// Sets the font size of a text node and re-measures its box.
    ///
    /// Returns `false` for non-text nodes.
    pub fn set_font_size(&mut self, size: f64) -> bool {
        let NodeKind::Text(text) = &mut self.kind else {
            return false;
        };
        text.font_size = size;
        let (w, h) = text.face.measure(&text.characters, size);
        self.width = w;
        self.height = h;
        true
    }
}

/// Position and extent of a child along one axis after its parent changed
/// from `old` to `new`.
fn follow(constraint: Constraint, pos: f64, len: f64, old: f64, new: f64) -> (f64, f64) {
    match constraint {
        Constraint::Min => (pos, len),
        Constraint::Max => (pos + (new - old), len),
        Constraint::Center => (pos + (new - old) / 2.0, len),
        Constraint::Stretch => (pos, (len + (new - old)).max(0.0)),
        Constraint::Scale => {
            if old > 0.0 {
                let ratio = new / old;
                (pos * ratio, len * ratio)
            } else {
                (pos, len)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::paint::{BLACK, Paint};

    fn rect(id: u32, w: f64, h: f64) -> Node {
        let mut shape = Shape::new(
            Geometry::Rectangle { corner_radius: 4.0 },
            vec![Paint::solid(BLACK)],
        );
        shape.stroke_weight = 2.0;
        Node::new(NodeId(id), "Rect", NodeKind::Shape(shape), w, h)
    }

    fn frame(id: u32, w: f64, h: f64) -> Node {
        Node::new(NodeId(id), "Frame", NodeKind::Frame(Container::default()), w, h)
    }

    #[test]
    fn rescale_scales_subtree() {
        let mut root = frame(1, 100.0, 50.0).with_children(vec![rect(2, 20.0, 10.0).with_position(10.0, 5.0)]);
        root.rescale(2.0);

        assert_eq!((root.width, root.height), (200.0, 100.0));
        let child = &root.children[0];
        assert_eq!((child.x, child.y, child.width, child.height), (20.0, 10.0, 40.0, 20.0));
        let NodeKind::Shape(shape) = &child.kind else {
            panic!("expected shape");
        };
        assert_eq!(shape.stroke_weight, 4.0);
        assert_eq!(shape.geometry, Geometry::Rectangle { corner_radius: 8.0 });
    }

    #[test]
    fn resize_keeps_stroke_weight() {
        let mut node = rect(1, 10.0, 10.0);
        node.resize(30.0, 30.0);
        let NodeKind::Shape(shape) = &node.kind else {
            panic!("expected shape");
        };
        assert_eq!(shape.stroke_weight, 2.0);
        assert_eq!(node.width, 30.0);
    }

    #[test]
    fn resize_follows_constraints() {
        let mut scaled = rect(2, 20.0, 20.0).with_position(10.0, 10.0);
        scaled.constraints = Constraints::SCALE;
        let pinned = rect(3, 20.0, 20.0).with_position(10.0, 10.0);
        let mut root = frame(1, 100.0, 100.0).with_children(vec![scaled, pinned]);

        root.resize(200.0, 50.0);

        let s = &root.children[0];
        assert_eq!((s.x, s.y, s.width, s.height), (20.0, 5.0, 40.0, 10.0));
        let p = &root.children[1];
        assert_eq!((p.x, p.y, p.width, p.height), (10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn capabilities_by_kind() {
        assert!(NodeKind::Group.supports_rescale());
        assert!(!NodeKind::Group.supports_constraints());
        assert!(NodeKind::Group.fills().is_none());
        assert!(!NodeKind::Slice.supports_constraints());
        assert!(!NodeKind::ComponentSet(Container::default()).supports_rescale());
        assert!(NodeKind::Frame(Container::default()).occludes_content());
        assert!(!NodeKind::Page.is_clonable());
    }

    #[test]
    fn find_and_subtree_len() {
        let root = frame(1, 10.0, 10.0).with_children(vec![frame(2, 5.0, 5.0).with_children(vec![rect(3, 1.0, 1.0)])]);
        assert_eq!(root.subtree_len(), 3);
        assert_eq!(root.find(NodeId(3)).map(|n| n.name.as_str()), Some("Rect"));
        assert!(root.find(NodeId(9)).is_none());
    }

    #[test]
    fn rect_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 15.0, 15.0));
    }
}
