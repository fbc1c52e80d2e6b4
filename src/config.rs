//! User intent for create actions, and persisted panel defaults.
//!
//! Everything here crosses the panel/core boundary as camelCase JSON.
//!
//! # Example
//!
//! ```
//! use brandset::config::LogoConfig;
//! use brandset::scene::NodeId;
//!
//! let json = r##"{
//!     "productName": "Acme",
//!     "sources": { "background": 12 },
//!     "backgroundColor": "#1e1e1e",
//!     "target": 4
//! }"##;
//! let config = LogoConfig::from_json(json).unwrap();
//!
//! // Slots without a selection fall back to the first captured one.
//! assert_eq!(config.sources.resolve().unwrap(), [NodeId(12); 4]);
//! assert!(config.appearance.favicon_background);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scene::{NodeId, parse_hex};
use crate::variant::{Appearance, VariantContent, VariantRole};

/// Key the panel defaults are stored under in the host's settings store.
pub const SETTINGS_KEY: &str = "brandset.settings";

/// Returns the trimmed product name, rejecting blank input.
pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name)
}

// ============================================================================
// Sources
// ============================================================================

/// A captured selection: what the user picked and what it looked like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct SourceSelection {
    pub id: NodeId,
    pub name: String,
    /// PNG preview of the selection.
    #[serde(default)]
    pub preview_png: Vec<u8>,
}

/// One optional source reference per variant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct SlotSources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<NodeId>,
}

impl SlotSources {
    pub fn get(&self, role: VariantRole) -> Option<NodeId> {
        match role {
            VariantRole::Background => self.background,
            VariantRole::Light => self.light,
            VariantRole::Dark => self.dark,
            VariantRole::Favicon => self.favicon,
        }
    }

    pub fn set(&mut self, role: VariantRole, id: Option<NodeId>) {
        let slot = match role {
            VariantRole::Background => &mut self.background,
            VariantRole::Light => &mut self.light,
            VariantRole::Dark => &mut self.dark,
            VariantRole::Favicon => &mut self.favicon,
        };
        *slot = id;
    }

    pub fn is_empty(&self) -> bool {
        VariantRole::ALL.iter().all(|r| self.get(*r).is_none())
    }

    /// One source per role, in [`VariantRole::ALL`] order.
    ///
    /// A role without its own selection borrows the first present one.
    pub fn resolve(&self) -> Result<[NodeId; 4], ValidationError> {
        let fallback = VariantRole::ALL
            .iter()
            .find_map(|r| self.get(*r))
            .ok_or(ValidationError::NoSource)?;
        Ok(VariantRole::ALL.map(|r| self.get(r).unwrap_or(fallback)))
    }
}

// ============================================================================
// Create Actions
// ============================================================================

/// Intent for building a component set from canvas selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct LogoConfig {
    pub product_name: String,
    #[serde(default)]
    pub sources: SlotSources,
    #[serde(flatten)]
    pub appearance: Appearance,
    /// Frame the set is filed into; `None` places it at the page origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeId>,
}

impl LogoConfig {
    pub fn new(product_name: impl Into<String>, sources: SlotSources) -> Self {
        Self {
            product_name: product_name.into(),
            sources,
            appearance: Appearance::default(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    /// Variant contents in role order.
    pub fn contents(&self) -> Result<[VariantContent; 4], ValidationError> {
        Ok(self.sources.resolve()?.map(VariantContent::Source))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Intent for building a component set from generated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct TextLogoConfig {
    pub product_name: String,
    /// Text shown by the hero, light and dark variants.
    pub text: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    /// Favicon text; defaults to the first character of `text`, uppercased.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_text: Option<String>,
    #[serde(flatten)]
    pub appearance: Appearance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeId>,
}

fn default_text_color() -> String {
    "#000000".to_string()
}

impl TextLogoConfig {
    pub fn new(product_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            text: text.into(),
            text_color: default_text_color(),
            favicon_text: None,
            appearance: Appearance::default(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    /// The text the favicon variant shows.
    pub fn favicon_characters(&self) -> String {
        match self.favicon_text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => self
                .text
                .trim()
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default(),
        }
    }

    /// Variant contents in role order.
    pub fn contents(&self) -> Result<[VariantContent; 4], ValidationError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let color = parse_hex(&self.text_color)?;
        let body = || VariantContent::Text {
            characters: text.to_string(),
            color,
        };
        Ok([
            body(),
            body(),
            body(),
            VariantContent::Text {
                characters: self.favicon_characters(),
                color,
            },
        ])
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// PluginSettings
// ============================================================================

/// Panel defaults persisted between sessions.
///
/// Missing fields take their defaults, so older blobs keep loading.
///
/// # JSON Format
///
/// ```json
/// {
///   "backgroundColor": "#ffffff",
///   "backgroundOpacity": 1.0,
///   "faviconBackground": true,
///   "faviconShape": "circle",
///   "lightMonochrome": true,
///   "darkMonochrome": false,
///   "textColor": "#000000",
///   "sources": { "light": 12 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PluginSettings {
    #[serde(flatten)]
    pub appearance: Appearance,
    pub text_color: String,
    /// Last-used slot sources.
    pub sources: SlotSources,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            appearance: Appearance::default(),
            text_color: default_text_color(),
            sources: SlotSources::default(),
        }
    }
}

impl PluginSettings {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
