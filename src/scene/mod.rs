//! In-memory model of the host document.
//!
//! The [`Document`] owns an ordered list of pages; every page owns its node
//! tree. Nodes are built detached through the `create_*` constructors (which
//! hand out fresh ids) and then moved into the tree.

pub mod layout;
pub mod node;
pub mod paint;
pub mod text;

pub use layout::{AutoLayout, CounterAlign, Direction, Padding, Sizing, relayout};
pub use node::{
    Constraint, Constraints, Container, Geometry, Node, NodeId, NodeKind, Rect, Shape, TextBody,
};
pub use paint::{BLACK, GradientStop, Paint, WHITE, parse_hex, to_hex};
pub use text::{FontName, Typeface};

use crate::error::SceneError;

// ============================================================================
// Viewport
// ============================================================================

/// The visible region of the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Page coordinates of the viewport center.
    pub center: (f64, f64),
    pub zoom: f64,
    /// Size of the viewport on screen, in pixels.
    pub screen: (f64, f64),
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: (0.0, 0.0),
            zoom: 1.0,
            screen: (1440.0, 900.0),
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// The host document: pages, selection and viewport.
#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<Node>,
    current: usize,
    next_id: u32,
    selection: Vec<NodeId>,
    viewport: Viewport,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document with a single empty page.
    pub fn new() -> Self {
        let mut doc = Self {
            pages: Vec::new(),
            current: 0,
            next_id: 0,
            selection: Vec::new(),
            viewport: Viewport::default(),
        };
        doc.add_page("Page 1");
        doc
    }

    fn alloc_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    /// Appends a page and returns its id. The current page is unchanged.
    pub fn add_page(&mut self, name: &str) -> NodeId {
        let id = self.alloc_id();
        self.pages.push(Node::new(id, name, NodeKind::Page, 0.0, 0.0));
        id
    }

    /// Makes the page with this id the active surface.
    pub fn set_current_page(&mut self, id: NodeId) -> Result<(), SceneError> {
        let index = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or(SceneError::Missing(id))?;
        self.current = index;
        self.selection.clear();
        Ok(())
    }

    pub fn current_page(&self) -> &Node {
        &self.pages[self.current]
    }

    pub fn pages(&self) -> &[Node] {
        &self.pages
    }

    // ---- Node Construction ----

    pub fn create_frame(&mut self, name: &str, width: f64, height: f64) -> Node {
        let id = self.alloc_id();
        Node::new(id, name, NodeKind::Frame(Container::default()), width, height)
    }

    pub fn create_component(&mut self, name: &str, width: f64, height: f64) -> Node {
        let id = self.alloc_id();
        Node::new(id, name, NodeKind::Component(Container::default()), width, height)
    }

    pub fn create_component_set(&mut self, name: &str, children: Vec<Node>) -> Node {
        let id = self.alloc_id();
        Node::new(id, name, NodeKind::ComponentSet(Container::default()), 0.0, 0.0)
            .with_children(children)
    }

    pub fn create_rectangle(&mut self, name: &str, width: f64, height: f64, fills: Vec<Paint>) -> Node {
        let id = self.alloc_id();
        let shape = Shape::new(Geometry::Rectangle { corner_radius: 0.0 }, fills);
        Node::new(id, name, NodeKind::Shape(shape), width, height)
    }

    pub fn create_ellipse(&mut self, name: &str, width: f64, height: f64, fills: Vec<Paint>) -> Node {
        let id = self.alloc_id();
        Node::new(id, name, NodeKind::Shape(Shape::new(Geometry::Ellipse, fills)), width, height)
    }

    /// Creates a vector node whose path is drawn in a `width` x `height` box.
    pub fn create_vector(&mut self, name: &str, path: &str, width: f64, height: f64, fills: Vec<Paint>) -> Node {
        let id = self.alloc_id();
        let geometry = Geometry::Vector {
            path: path.to_string(),
            view_width: width,
            view_height: height,
        };
        Node::new(id, name, NodeKind::Shape(Shape::new(geometry, fills)), width, height)
    }

    /// Creates an auto-sized text node. The typeface must already be loaded.
    pub fn create_text(&mut self, characters: &str, face: &Typeface, size: f64, fills: Vec<Paint>) -> Node {
        let id = self.alloc_id();
        let (width, height) = face.measure(characters, size);
        let body = TextBody {
            characters: characters.to_string(),
            font_size: size,
            face: face.clone(),
            fills,
        };
        Node::new(id, characters, NodeKind::Text(body), width, height)
    }

    pub fn create_group(&mut self, name: &str, children: Vec<Node>) -> Node {
        let id = self.alloc_id();
        Node::new(id, name, NodeKind::Group, 0.0, 0.0).with_children(children)
    }

    pub fn create_slice(&mut self, name: &str, width: f64, height: f64) -> Node {
        let id = self.alloc_id();
        Node::new(id, name, NodeKind::Slice, width, height)
    }

    /// Deep copy of a node with fresh ids throughout.
    pub fn clone_subtree(&mut self, id: NodeId) -> Option<Node> {
        let mut copy = self.find(id)?.clone();
        copy.walk_mut(&mut |n| {
            self.next_id += 1;
            n.id = NodeId(self.next_id);
        });
        Some(copy)
    }

    // ---- Tree Access ----

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.pages.iter().find_map(|p| p.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.pages.iter_mut().find_map(|p| p.find_mut(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Id of the node's parent; pages have none.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        fn search(node: &Node, id: NodeId) -> Option<NodeId> {
            if node.children.iter().any(|c| c.id == id) {
                return Some(node.id);
            }
            node.children.iter().find_map(|c| search(c, id))
        }
        self.pages.iter().find_map(|p| search(p, id))
    }

    /// Page-absolute bounds of a node.
    pub fn absolute_bounds(&self, id: NodeId) -> Option<Rect> {
        fn search(node: &Node, id: NodeId, ox: f64, oy: f64) -> Option<Rect> {
            for child in &node.children {
                let (x, y) = (ox + child.x, oy + child.y);
                if child.id == id {
                    return Some(Rect::new(x, y, child.width, child.height));
                }
                if let Some(found) = search(child, id, x, y) {
                    return Some(found);
                }
            }
            None
        }
        self.pages.iter().find_map(|p| search(p, id, 0.0, 0.0))
    }

    // ---- Tree Mutation ----

    /// Appends a detached node to the current page.
    pub fn append_to_page(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.pages[self.current].children.push(node);
        id
    }

    /// Removes a node from its parent and hands it back detached.
    pub fn detach(&mut self, id: NodeId) -> Option<Node> {
        let parent = self.parent_of(id)?;
        let parent = self.find_mut(parent)?;
        let index = parent.children.iter().position(|c| c.id == id)?;
        let node = parent.children.remove(index);
        self.selection.retain(|s| *s != id);
        Some(node)
    }

    /// Inserts a detached node under `parent` at `index` (clamped to the end).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, node: Node) -> Result<NodeId, SceneError> {
        let parent_node = self.find_mut(parent).ok_or(SceneError::Missing(parent))?;
        if !parent_node.kind.is_container() {
            return Err(SceneError::NotAContainer(parent));
        }
        let id = node.id;
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, node);
        Ok(id)
    }

    pub fn append_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        self.insert_child(parent, usize::MAX, node)
    }

    /// Wraps nodes into a new group under the first node's parent.
    ///
    /// The group takes the first node's slot and the union of the nodes'
    /// bounds; children keep their absolute positions. Ids are reduced with
    /// [`Document::outermost`] and all of them must resolve before anything
    /// is detached.
    pub fn group(&mut self, ids: &[NodeId], name: &str) -> Result<NodeId, SceneError> {
        let ids = self.outermost(ids);
        let first = *ids.first().ok_or(SceneError::EmptyGroup)?;
        let parent = self.parent_of(first).ok_or(SceneError::Missing(first))?;
        let parent_origin = self
            .absolute_bounds(parent)
            .map(|r| (r.x, r.y))
            .unwrap_or((0.0, 0.0));
        let slot = self
            .find(parent)
            .and_then(|p| p.children.iter().position(|c| c.id == first))
            .unwrap_or(0);

        let mut members = Vec::with_capacity(ids.len());
        let mut bounds: Option<Rect> = None;
        for id in ids {
            let abs = self.absolute_bounds(id).ok_or(SceneError::Missing(id))?;
            bounds = Some(bounds.map_or(abs, |b| b.union(&abs)));
            members.push((abs, id));
        }
        let Some(bounds) = bounds else {
            return Err(SceneError::EmptyGroup);
        };

        let mut children = Vec::with_capacity(members.len());
        for (abs, id) in members {
            let mut node = self.detach(id).ok_or(SceneError::Missing(id))?;
            node.x = abs.x - bounds.x;
            node.y = abs.y - bounds.y;
            children.push(node);
        }
        let mut group = self.create_group(name, children);
        group.x = bounds.x - parent_origin.0;
        group.y = bounds.y - parent_origin.1;
        group.width = bounds.width;
        group.height = bounds.height;
        self.insert_child(parent, slot, group)
    }

    /// Deduplicates `ids` in order and drops every id nested inside another
    /// listed node.
    pub fn outermost(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut unique: Vec<NodeId> = Vec::with_capacity(ids.len());
        for &id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        unique
            .iter()
            .copied()
            .filter(|&id| !self.ancestors(id).any(|a| unique.contains(&a)))
            .collect()
    }

    /// Parents of `id` from the nearest up to the page.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent_of(id), |&p| self.parent_of(p))
    }

    /// Re-runs auto-layout on every page.
    pub fn relayout(&mut self) {
        for page in &mut self.pages {
            relayout(page);
        }
    }

    // ---- Selection and Viewport ----

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Replaces the selection, dropping repeats and ids that do not resolve.
    pub fn set_selection(&mut self, ids: Vec<NodeId>) {
        let mut selection: Vec<NodeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.contains(id) && !selection.contains(&id) {
                selection.push(id);
            }
        }
        self.selection = selection;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Centers the viewport on the nodes and zooms so they fit, never past 100%.
    pub fn scroll_and_zoom_into_view(&mut self, ids: &[NodeId]) {
        let Some(bounds) = ids
            .iter()
            .filter_map(|id| self.absolute_bounds(*id))
            .reduce(|a, b| a.union(&b))
        else {
            return;
        };
        self.viewport.center = bounds.center();
        if bounds.width > 0.0 && bounds.height > 0.0 {
            let (sw, sh) = self.viewport.screen;
            self.viewport.zoom = (sw / bounds.width).min(sh / bounds.height).min(1.0);
        }
    }

    /// Frames and components sitting directly on the current page, the
    /// nodes a set can be filed into.
    pub fn top_level_frames(&self) -> impl Iterator<Item = &Node> {
        self.current_page()
            .children
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Frame(_) | NodeKind::Component(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut doc = Document::new();
        let a = doc.create_frame("A", 10.0, 10.0);
        let b = doc.create_frame("B", 10.0, 10.0);
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, doc.current_page().id);
    }

    #[test]
    fn clone_subtree_assigns_fresh_ids() {
        let mut doc = Document::new();
        let child = doc.create_rectangle("R", 5.0, 5.0, vec![Paint::solid(BLACK)]);
        let child_id = child.id;
        let frame = doc.create_frame("F", 10.0, 10.0).with_children(vec![child]);
        let frame_id = doc.append_to_page(frame);

        let copy = doc.clone_subtree(frame_id).unwrap();
        assert_ne!(copy.id, frame_id);
        assert_ne!(copy.children[0].id, child_id);
        assert_eq!(copy.children[0].name, "R");
        assert!(!doc.contains(copy.id));
    }

    #[test]
    fn detach_and_insert() {
        let mut doc = Document::new();
        let frame = doc.create_frame("F", 100.0, 100.0);
        let frame_id = doc.append_to_page(frame);
        let rect = doc.create_rectangle("R", 5.0, 5.0, Vec::new());
        let rect_id = doc.append_to_page(rect);

        let rect = doc.detach(rect_id).unwrap();
        doc.insert_child(frame_id, 0, rect).unwrap();
        assert_eq!(doc.parent_of(rect_id), Some(frame_id));
        assert_eq!(doc.current_page().children.len(), 1);
    }

    #[test]
    fn insert_into_non_container_fails() {
        let mut doc = Document::new();
        let rect = doc.create_rectangle("R", 5.0, 5.0, Vec::new());
        let rect_id = doc.append_to_page(rect);
        let other = doc.create_rectangle("S", 5.0, 5.0, Vec::new());
        assert_eq!(
            doc.append_child(rect_id, other),
            Err(SceneError::NotAContainer(rect_id))
        );
    }

    #[test]
    fn group_keeps_absolute_positions() {
        let mut doc = Document::new();
        let a = doc.create_rectangle("A", 10.0, 10.0, Vec::new()).with_position(10.0, 20.0);
        let b = doc.create_rectangle("B", 10.0, 10.0, Vec::new()).with_position(40.0, 30.0);
        let a = doc.append_to_page(a);
        let b = doc.append_to_page(b);

        let group = doc.group(&[a, b], "Selection").unwrap();
        assert_eq!(
            doc.absolute_bounds(group),
            Some(Rect::new(10.0, 20.0, 40.0, 20.0))
        );
        assert_eq!(doc.absolute_bounds(b), Some(Rect::new(40.0, 30.0, 10.0, 10.0)));
        assert_eq!(doc.current_page().children.len(), 1);
    }

    #[test]
    fn group_ignores_repeated_ids() {
        let mut doc = Document::new();
        let a = doc.create_rectangle("A", 10.0, 10.0, Vec::new()).with_position(5.0, 5.0);
        let a = doc.append_to_page(a);

        let group = doc.group(&[a, a], "Selection").unwrap();
        assert_eq!(doc.parent_of(a), Some(group));
        assert_eq!(doc.find(group).unwrap().children.len(), 1);
        assert_eq!(doc.absolute_bounds(a), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn group_drops_nested_members() {
        let mut doc = Document::new();
        let child = doc.create_rectangle("R", 5.0, 5.0, Vec::new()).with_position(2.0, 3.0);
        let child_id = child.id;
        let frame = doc
            .create_frame("F", 20.0, 20.0)
            .with_position(10.0, 10.0)
            .with_children(vec![child]);
        let frame_id = doc.append_to_page(frame);

        let group = doc.group(&[frame_id, child_id], "Selection").unwrap();
        assert_eq!(doc.parent_of(frame_id), Some(group));
        assert_eq!(doc.parent_of(child_id), Some(frame_id));
        assert_eq!(doc.absolute_bounds(child_id), Some(Rect::new(12.0, 13.0, 5.0, 5.0)));
        assert_eq!(doc.find(group).unwrap().children.len(), 1);
    }

    #[test]
    fn group_with_missing_member_leaves_tree_intact() {
        let mut doc = Document::new();
        let a = doc.create_rectangle("A", 10.0, 10.0, Vec::new());
        let a = doc.append_to_page(a);

        assert_eq!(
            doc.group(&[a, NodeId(999)], "Selection"),
            Err(SceneError::Missing(NodeId(999)))
        );
        assert_eq!(doc.parent_of(a), Some(doc.current_page().id));
        assert_eq!(doc.current_page().children.len(), 1);
    }

    #[test]
    fn selection_drops_repeats() {
        let mut doc = Document::new();
        let a = doc.create_rectangle("A", 10.0, 10.0, Vec::new());
        let b = doc.create_rectangle("B", 10.0, 10.0, Vec::new());
        let a = doc.append_to_page(a);
        let b = doc.append_to_page(b);

        doc.set_selection(vec![a, b, a, NodeId(999)]);
        assert_eq!(doc.selection(), [a, b]);
    }

    #[test]
    fn absolute_bounds_accumulates_offsets() {
        let mut doc = Document::new();
        let inner = doc.create_rectangle("R", 5.0, 5.0, Vec::new()).with_position(3.0, 4.0);
        let inner_id = inner.id;
        let frame = doc
            .create_frame("F", 50.0, 50.0)
            .with_position(100.0, 200.0)
            .with_children(vec![inner]);
        doc.append_to_page(frame);
        assert_eq!(
            doc.absolute_bounds(inner_id),
            Some(Rect::new(103.0, 204.0, 5.0, 5.0))
        );
    }

    #[test]
    fn scroll_into_view_centers() {
        let mut doc = Document::new();
        let frame = doc.create_frame("F", 200.0, 100.0).with_position(100.0, 100.0);
        let id = doc.append_to_page(frame);
        doc.scroll_and_zoom_into_view(&[id]);
        assert_eq!(doc.viewport().center, (200.0, 150.0));
        assert_eq!(doc.viewport().zoom, 1.0);
    }

    #[test]
    fn top_level_frames_lists_frames_and_components() {
        let mut doc = Document::new();
        let frame = doc.create_frame("Brand", 10.0, 10.0);
        doc.append_to_page(frame);
        let rect = doc.create_rectangle("R", 5.0, 5.0, Vec::new());
        doc.append_to_page(rect);
        let component = doc.create_component("Library", 10.0, 10.0);
        doc.append_to_page(component);
        let names: Vec<_> = doc.top_level_frames().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Brand", "Library"]);
    }
}
