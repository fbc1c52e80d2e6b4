//! Auto-layout for stacked containers.

use super::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Alignment of children across the stacking direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterAlign {
    #[default]
    Min,
    Center,
    Max,
}

/// Whether a container axis hugs its content or keeps its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sizing {
    #[default]
    Hug,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Stacking rules of an auto-layout container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoLayout {
    pub direction: Direction,
    pub item_spacing: f64,
    pub padding: Padding,
    pub counter_align: CounterAlign,
    pub primary_sizing: Sizing,
    pub counter_sizing: Sizing,
}

impl AutoLayout {
    /// A hugging row with the given gap between items.
    pub fn horizontal(item_spacing: f64) -> Self {
        Self {
            direction: Direction::Horizontal,
            item_spacing,
            padding: Padding::default(),
            counter_align: CounterAlign::Min,
            primary_sizing: Sizing::Hug,
            counter_sizing: Sizing::Hug,
        }
    }

    /// A hugging column with the given gap between items.
    pub fn vertical(item_spacing: f64) -> Self {
        Self {
            direction: Direction::Vertical,
            ..Self::horizontal(item_spacing)
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_counter_align(mut self, align: CounterAlign) -> Self {
        self.counter_align = align;
        self
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        self.item_spacing *= factor;
        self.padding.top *= factor;
        self.padding.right *= factor;
        self.padding.bottom *= factor;
        self.padding.left *= factor;
    }
}

/// Re-runs auto-layout over a subtree, innermost containers first, so a
/// hugging parent sees its children's final sizes.
pub fn relayout(node: &mut Node) {
    for child in &mut node.children {
        relayout(child);
    }
    if let Some(layout) = node.kind.layout().copied() {
        arrange(node, &layout);
    }
}

fn arrange(node: &mut Node, layout: &AutoLayout) {
    let horizontal = layout.direction == Direction::Horizontal;
    let p = layout.padding;
    let (lead, trail, cross_lead, cross_trail) = if horizontal {
        (p.left, p.right, p.top, p.bottom)
    } else {
        (p.top, p.bottom, p.left, p.right)
    };

    let cross_content = node
        .children
        .iter()
        .filter(|c| c.visible)
        .map(|c| if horizontal { c.height } else { c.width })
        .fold(0.0_f64, f64::max);
    let cross_extent = match layout.counter_sizing {
        Sizing::Hug => cross_content + cross_lead + cross_trail,
        Sizing::Fixed if horizontal => node.height,
        Sizing::Fixed => node.width,
    };
    let cross_inner = cross_extent - cross_lead - cross_trail;

    let mut cursor = lead;
    let mut placed = 0usize;
    for child in node.children.iter_mut().filter(|c| c.visible) {
        let (main_len, cross_len) = if horizontal {
            (child.width, child.height)
        } else {
            (child.height, child.width)
        };
        let cross = cross_lead
            + match layout.counter_align {
                CounterAlign::Min => 0.0,
                CounterAlign::Center => (cross_inner - cross_len) / 2.0,
                CounterAlign::Max => cross_inner - cross_len,
            };
        if horizontal {
            child.x = cursor;
            child.y = cross;
        } else {
            child.x = cross;
            child.y = cursor;
        }
        cursor += main_len + layout.item_spacing;
        placed += 1;
    }
    let main_extent = if placed == 0 {
        lead + trail
    } else {
        cursor - layout.item_spacing + trail
    };

    if layout.primary_sizing == Sizing::Hug {
        if horizontal {
            node.width = main_extent;
        } else {
            node.height = main_extent;
        }
    }
    if layout.counter_sizing == Sizing::Hug {
        if horizontal {
            node.height = cross_extent;
        } else {
            node.width = cross_extent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::{Container, NodeId, NodeKind};

    fn boxed(id: u32, w: f64, h: f64) -> Node {
        Node::new(NodeId(id), "Box", NodeKind::Frame(Container::default()), w, h)
    }

    fn stack(layout: AutoLayout, children: Vec<Node>) -> Node {
        let container = Container {
            layout: Some(layout),
            ..Container::default()
        };
        Node::new(NodeId(100), "Stack", NodeKind::Frame(container), 0.0, 0.0).with_children(children)
    }

    #[test]
    fn horizontal_hug_center() {
        let layout = AutoLayout::horizontal(10.0).with_counter_align(CounterAlign::Center);
        let mut row = stack(layout, vec![boxed(1, 30.0, 20.0), boxed(2, 40.0, 40.0)]);
        relayout(&mut row);

        assert_eq!((row.width, row.height), (80.0, 40.0));
        assert_eq!((row.children[0].x, row.children[0].y), (0.0, 10.0));
        assert_eq!((row.children[1].x, row.children[1].y), (40.0, 0.0));
    }

    #[test]
    fn vertical_with_padding() {
        let layout = AutoLayout::vertical(5.0).with_padding(Padding::uniform(8.0));
        let mut column = stack(layout, vec![boxed(1, 30.0, 20.0), boxed(2, 10.0, 10.0)]);
        relayout(&mut column);

        assert_eq!((column.width, column.height), (46.0, 51.0));
        assert_eq!((column.children[1].x, column.children[1].y), (8.0, 33.0));
    }

    #[test]
    fn nested_stacks_hug_inner_first() {
        let inner = stack(AutoLayout::vertical(0.0), vec![boxed(1, 10.0, 10.0), boxed(2, 10.0, 10.0)]);
        let mut outer = stack(AutoLayout::horizontal(0.0), vec![inner]);
        relayout(&mut outer);
        assert_eq!(outer.height, 20.0);
    }

    #[test]
    fn empty_stack_is_padding_only() {
        let layout = AutoLayout::horizontal(10.0).with_padding(Padding::uniform(4.0));
        let mut row = stack(layout, Vec::new());
        relayout(&mut row);
        assert_eq!((row.width, row.height), (8.0, 8.0));
    }
}
