//! Snapshotting the canvas selection as a logo source.

use tracing::debug;

use crate::config::SourceSelection;
use crate::error::{BuildError, SceneError};
use crate::host::Host;
use crate::scene::{Document, NodeId};
use crate::variant::vector::resolves;

/// Name given to the group wrapping a multi-node selection.
pub const SELECTION_GROUP_NAME: &str = "Logo";

/// Captures the current selection with a PNG preview.
///
/// Several selected nodes are grouped first so the slot refers to a single
/// node; the new group becomes the selection. Nodes nested inside another
/// selected node travel with it. Returns `None` when nothing
/// usable is selected.
pub async fn capture_selection<H: Host>(doc: &mut Document, host: &H) -> Result<Option<SourceSelection>, BuildError> {
    let ids: Vec<NodeId> = doc
        .selection()
        .iter()
        .copied()
        .filter(|id| resolves(doc, *id))
        .collect();
    let ids = doc.outermost(&ids);

    let id = match ids.as_slice() {
        [] => return Ok(None),
        [single] => *single,
        _ => {
            let group = doc.group(&ids, SELECTION_GROUP_NAME)?;
            doc.set_selection(vec![group]);
            debug!(group = %group, members = ids.len(), "grouped selection");
            group
        }
    };

    let node = doc.find(id).ok_or(SceneError::Missing(id))?;
    let preview_png = host.export_png(node).await?;
    Ok(Some(SourceSelection {
        id,
        name: node.name.clone(),
        preview_png,
    }))
}
