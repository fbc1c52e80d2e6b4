//! Combining built variants into one component set.

use tracing::debug;

use crate::error::{BuildError, SceneError};
use crate::scene::{AutoLayout, CounterAlign, Document, NodeId, NodeKind, Padding};
use crate::variant::VariantRole;

/// Gap between neighbouring variants, and the set's inner padding.
pub const VARIANT_SPACING: f64 = 20.0;

/// Moves four page-level variants into a new component set.
///
/// `variants` must be in [`VariantRole::ALL`] order. The set takes the first
/// variant's position, is named after the trimmed product name and lays its
/// variants out in a hugging row, centered on the cross axis.
pub fn assemble(doc: &mut Document, variants: [NodeId; 4], product_name: &str) -> Result<NodeId, BuildError> {
    for id in variants {
        let node = doc.find(id).ok_or(SceneError::Missing(id))?;
        if !matches!(node.kind, NodeKind::Component(_)) {
            return Err(SceneError::WrongKind(id, node.kind.kind_name(), "component").into());
        }
    }
    let origin = doc
        .absolute_bounds(variants[0])
        .map(|r| (r.x, r.y))
        .unwrap_or((0.0, 0.0));

    let mut children = Vec::with_capacity(variants.len());
    for id in variants {
        children.push(doc.detach(id).ok_or(SceneError::Missing(id))?);
    }

    let name = product_name.trim();
    let mut set = doc.create_component_set(name, children).with_position(origin.0, origin.1);
    if let Some(container) = set.kind.container_mut() {
        container.corner_radius = 0.0;
        container.layout = Some(
            AutoLayout::horizontal(VARIANT_SPACING)
                .with_padding(Padding::uniform(VARIANT_SPACING))
                .with_counter_align(CounterAlign::Center),
        );
    }
    let id = doc.append_to_page(set);
    doc.relayout();

    debug!(set = %id, name, roles = VariantRole::ALL.len(), "assembled component set");
    Ok(id)
}
