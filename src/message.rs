//! Messages exchanged between the settings panel and the core.
//!
//! Both directions are JSON objects discriminated by a `type` field:
//!
//! ```json
//! { "type": "GRAB_SELECTION", "slot": "favicon" }
//! { "type": "CREATED", "id": 42, "name": "Acme" }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{LogoConfig, PluginSettings, SourceSelection, TextLogoConfig};
use crate::scene::NodeId;
use crate::variant::VariantRole;

/// Requests sent from the panel to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PanelMessage {
    /// List the frames sitting directly on the current page
    RequestTopLevelFrames,

    /// Capture the current selection into a slot
    GrabSelection { slot: VariantRole },

    /// Build, assemble and place a set from canvas selections
    CreateComponentSet { config: LogoConfig },

    /// Build, assemble and place a set from generated text
    CreateTextLogo { config: TextLogoConfig },

    /// Load persisted panel defaults
    RequestSettings,

    /// Persist panel defaults
    SaveSettings { settings: PluginSettings },

    /// End the panel session
    Close,
}

/// Replies and events sent from the core to the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum CoreMessage {
    TopLevelFrames { frames: Vec<FrameSummary> },

    /// A slot captured a selection
    SelectionUpdate {
        slot: VariantRole,
        selection: SourceSelection,
    },

    LoadSettings { settings: PluginSettings },

    /// A component set was created and placed
    Created { id: NodeId, name: String },

    /// A create action failed; `message` is the notice shown to the user
    Failed { message: String },
}

/// A frame the user can choose as placement target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FrameSummary {
    pub id: NodeId,
    pub name: String,
}

impl PanelMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl CoreMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
