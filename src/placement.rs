//! Filing new component sets into an alphabetical index.
//!
//! A target frame receives one "Content" holder: a transparent row of
//! letter buckets. Each bucket is a rounded column whose first child is a
//! large bold letter label, followed by the component sets whose product
//! names start with that letter.
//!
//! ```text
//! Target
//! └── Content            (row, buckets sorted by letter)
//!     ├── A              (column)
//!     │   ├── "A"        (label)
//!     │   ├── Acme
//!     │   └── Apple
//!     └── B
//!         ├── "B"
//!         └── Banana
//! ```
//!
//! Holders and buckets are created on first use and never removed.

use tracing::{debug, info, warn};

use crate::error::{BuildError, SceneError};
use crate::host::Host;
use crate::scene::{AutoLayout, BLACK, Document, Node, NodeId, NodeKind, Padding, Paint, WHITE};
use crate::variant::text::logo_font;

/// Name of the holder frame inside a target.
pub const CONTENT_NAME: &str = "Content";

/// Gap between letter buckets.
pub const BUCKET_SPACING: f64 = 200.0;

/// Inner padding of a bucket, and the gap between its entries.
pub const BUCKET_PADDING: f64 = 80.0;

pub const BUCKET_RADIUS: f64 = 40.0;

/// Font size of a bucket's letter label.
pub const LABEL_FONT_SIZE: f64 = 160.0;

/// Where a component set ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// At the page origin.
    Origin,
    /// Inside a letter bucket of a target frame.
    Filed { content: NodeId, bucket: NodeId },
}

/// Bucket key for a product name: its first character, uppercased.
///
/// ```
/// use brandset::placement::bucket_letter;
///
/// assert_eq!(bucket_letter("  acme"), "A");
/// assert_eq!(bucket_letter(""), "A");
/// ```
pub fn bucket_letter(product_name: &str) -> String {
    product_name
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "A".to_string())
}

/// Places `set` and brings it into view.
///
/// A target that no longer resolves to a frame is reported to the user and
/// the set falls back to the page origin.
pub async fn place<H: Host>(
    doc: &mut Document,
    host: &H,
    set: NodeId,
    target: Option<NodeId>,
    product_name: &str,
) -> Result<Placement, BuildError> {
    let placement = match target {
        None => place_at_origin(doc, set)?,
        Some(target) if !is_valid_target(doc, target, set) => {
            let notice = BuildError::TargetNotFound(target).to_string();
            warn!(target = %target, set = %set, "placement target missing, using page origin");
            host.notify(&notice);
            place_at_origin(doc, set)?
        }
        Some(target) => place_in_target(doc, host, set, target, product_name).await?,
    };
    focus(doc, set);
    Ok(placement)
}

fn is_valid_target(doc: &Document, target: NodeId, set: NodeId) -> bool {
    target != set
        && doc
            .find(target)
            .is_some_and(|n| matches!(n.kind, NodeKind::Frame(_) | NodeKind::Component(_)))
}

fn place_at_origin(doc: &mut Document, set: NodeId) -> Result<Placement, BuildError> {
    let node = doc.find_mut(set).ok_or(SceneError::Missing(set))?;
    node.x = 0.0;
    node.y = 0.0;
    debug!(set = %set, "placed at page origin");
    Ok(Placement::Origin)
}

async fn place_in_target<H: Host>(
    doc: &mut Document,
    host: &H,
    set: NodeId,
    target: NodeId,
    product_name: &str,
) -> Result<Placement, BuildError> {
    let letter = bucket_letter(product_name);

    // The only suspension point runs before the tree is touched.
    let existing_content = find_child(doc, target, CONTENT_NAME);
    let existing_bucket = existing_content.and_then(|c| find_child(doc, c, &letter));
    let label = match existing_bucket {
        Some(_) => None,
        None => {
            let face = host.load_font(&logo_font()).await?;
            Some(doc.create_text(&letter, &face, LABEL_FONT_SIZE, vec![Paint::solid(BLACK)]))
        }
    };

    let content = match existing_content {
        Some(id) => id,
        None => {
            let holder = content_holder(doc);
            let id = doc.append_child(target, holder)?;
            info!(target = %target, content = %id, "created content holder");
            id
        }
    };

    let bucket = match (existing_bucket, label) {
        (Some(id), _) => id,
        (None, label) => {
            let bucket = letter_bucket(doc, &letter, label);
            let index = sorted_index(child_names(doc, content)?, &letter);
            let id = doc.insert_child(content, index, bucket)?;
            info!(letter = %letter, bucket = %id, index, "created letter bucket");
            id
        }
    };

    let mut node = doc.detach(set).ok_or(SceneError::Missing(set))?;
    node.x = 0.0;
    node.y = 0.0;
    let index = sorted_index(child_names(doc, bucket)?, product_name.trim());
    doc.insert_child(bucket, index, node)?;
    doc.relayout();

    debug!(set = %set, bucket = %bucket, index, "filed component set");
    Ok(Placement::Filed { content, bucket })
}

/// First container child of `parent` with this exact name.
fn find_child(doc: &Document, parent: NodeId, name: &str) -> Option<NodeId> {
    doc.find(parent)?
        .children
        .iter()
        .find(|c| c.name == name && c.kind.is_container())
        .map(|c| c.id)
}

/// Sort keys of `parent`'s children; labels are `None` and never compared.
fn child_names(doc: &Document, parent: NodeId) -> Result<Vec<Option<String>>, SceneError> {
    let node = doc.find(parent).ok_or(SceneError::Missing(parent))?;
    Ok(node
        .children
        .iter()
        .map(|c| match c.kind {
            NodeKind::Text(_) => None,
            _ => Some(c.name.to_lowercase()),
        })
        .collect())
}

/// Index of the first sortable sibling that `name` sorts strictly before,
/// or the end of the list.
fn sorted_index(siblings: Vec<Option<String>>, name: &str) -> usize {
    let key = name.to_lowercase();
    siblings
        .iter()
        .position(|s| s.as_deref().is_some_and(|s| key.as_str() < s))
        .unwrap_or(siblings.len())
}

fn content_holder(doc: &mut Document) -> Node {
    let mut holder = doc.create_frame(CONTENT_NAME, 0.0, 0.0);
    if let Some(container) = holder.kind.container_mut() {
        container.layout = Some(AutoLayout::horizontal(BUCKET_SPACING));
    }
    holder
}

fn letter_bucket(doc: &mut Document, letter: &str, label: Option<Node>) -> Node {
    let mut bucket = doc.create_frame(letter, 0.0, 0.0);
    if let Some(container) = bucket.kind.container_mut() {
        container.fills = vec![Paint::solid(WHITE)];
        container.corner_radius = BUCKET_RADIUS;
        container.layout =
            Some(AutoLayout::vertical(BUCKET_PADDING).with_padding(Padding::uniform(BUCKET_PADDING)));
    }
    bucket.children.extend(label);
    bucket
}

fn focus(doc: &mut Document, set: NodeId) {
    doc.set_selection(vec![set]);
    doc.scroll_and_zoom_into_view(&[set]);
}
