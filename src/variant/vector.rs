//! Variants built from a copy of a node on the canvas.

use tracing::debug;

use super::VariantSpec;
use crate::error::BuildError;
use crate::geometry::{center_in_parent, lock_aspect_and_scale_constraints, scale_to_fit};
use crate::recolor::{apply_color, strip_invisible_fills};
use crate::scene::{Document, Node, NodeId};

/// Whether `id` still points at something a variant can be built from.
pub fn resolves(doc: &Document, id: NodeId) -> bool {
    doc.find(id).is_some_and(|n| n.kind.is_clonable())
}

/// Builds a variant around a copy of `source`.
///
/// The copy loses its own fill if that fill would paint over its content,
/// then is fitted into the padded box, centered, optionally recolored,
/// scale-locked and cleaned of hidden fills.
pub fn build_from_selection(doc: &mut Document, spec: &VariantSpec, source: NodeId) -> Result<Node, BuildError> {
    if !resolves(doc, source) {
        return Err(BuildError::SourceNotFound {
            role: spec.role,
            id: source,
        });
    }
    let mut content = doc.clone_subtree(source).ok_or(BuildError::SourceNotFound {
        role: spec.role,
        id: source,
    })?;
    content.x = 0.0;
    content.y = 0.0;
    content.visible = true;

    if content.kind.occludes_content() {
        if let Some(fills) = content.kind.fills_mut() {
            fills.clear();
        }
    }

    let scale = scale_to_fit(&mut content, spec.width, spec.height, spec.padding);
    center_in_parent(&mut content, spec.width, spec.height);
    if let Some(color) = spec.color_override {
        apply_color(&mut content, color);
    }
    lock_aspect_and_scale_constraints(&mut content);
    strip_invisible_fills(&mut content);

    debug!(
        role = %spec.role,
        source = %source,
        scale = scale.unwrap_or(1.0),
        "built variant from selection"
    );

    let mut shell = super::component_shell(doc, spec);
    shell.children.push(content);
    Ok(shell)
}
