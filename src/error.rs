//! Error taxonomy for the component-set pipeline.
//!
//! Every failure surfaces as exactly one user-facing notice; the variants here
//! decide which class of problem the notice reports.

use thiserror::Error;

use crate::scene::{FontName, NodeId};
use crate::variant::VariantRole;

/// Problems with user intent, detected before any node is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The product name is empty or whitespace.
    #[error("Please enter a product name")]
    EmptyName,

    /// No slot holds a captured selection.
    #[error("Please select at least one logo source")]
    NoSource,

    /// Text logos need non-blank text.
    #[error("Please enter the logo text")]
    EmptyText,

    /// A color field does not hold a hex color.
    #[error("`{0}` is not a valid hex color")]
    InvalidColor(String),
}

/// Failures of the host's asynchronous capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The typeface is not available to the host.
    #[error("Could not load font {0}: {1}")]
    FontLoad(FontName, String),

    /// Rasterizing a node failed.
    #[error("Could not export selection: {0}")]
    Export(String),

    /// The key/value settings store rejected a read or write.
    #[error("Could not access settings: {0}")]
    Storage(String),
}

/// Structural misuse of the document graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// No node with this id exists.
    #[error("node {0} does not exist")]
    Missing(NodeId),

    /// The node exists but cannot hold children.
    #[error("node {0} cannot contain children")]
    NotAContainer(NodeId),

    /// The node exists but is not of the kind the operation needs.
    #[error("node {0} is a {1}, expected a {2}")]
    WrongKind(NodeId, &'static str, &'static str),

    /// Grouping needs at least one node.
    #[error("nothing to group")]
    EmptyGroup,
}

/// Any failure of a create action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The source of a variant no longer resolves to a clonable node.
    #[error("Source for the {role} variant was not found (node {id}); please select it again")]
    SourceNotFound { role: VariantRole, id: NodeId },

    /// The placement target no longer resolves to a container.
    #[error("Target frame {0} was not found")]
    TargetNotFound(NodeId),

    #[error(transparent)]
    Capability(#[from] HostError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl BuildError {
    /// Taxonomy class used in log entries.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::SourceNotFound { .. } | Self::TargetNotFound(_) => "resource-missing",
            Self::Capability(_) => "capability",
            Self::Scene(_) => "scene",
        }
    }

    /// Validation failures return the action to idle instead of failing it.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
