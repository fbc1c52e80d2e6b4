//! State of the settings panel.
//!
//! The panel keeps everything the user has entered in one serializable
//! struct. It changes only through user edits and [`PanelState::apply`] on
//! messages from the core, and turns into a request with
//! [`PanelState::submit`].

use serde::{Deserialize, Serialize};

use crate::config::{
    LogoConfig, PluginSettings, SlotSources, SourceSelection, TextLogoConfig, validate_name,
};
use crate::error::ValidationError;
use crate::message::{CoreMessage, FrameSummary, PanelMessage};
use crate::scene::NodeId;
use crate::variant::{Appearance, VariantRole};

/// Which create flow the panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Tab {
    #[default]
    Selection,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PanelState {
    pub tab: Tab,
    /// Captured selections in [`VariantRole::ALL`] order.
    pub slots: [Option<SourceSelection>; 4],
    pub product_name: String,
    pub text: String,
    pub text_color: String,
    pub favicon_text: String,
    #[serde(flatten)]
    pub appearance: Appearance,
    pub target: Option<NodeId>,
    /// Frames offered as placement targets.
    pub frames: Vec<FrameSummary>,
    /// A create request is in flight.
    pub busy: bool,
    pub last_error: Option<String>,
}

impl Default for PanelState {
    fn default() -> Self {
        let settings = PluginSettings::default();
        Self {
            tab: Tab::default(),
            slots: Default::default(),
            product_name: String::new(),
            text: String::new(),
            text_color: settings.text_color,
            favicon_text: String::new(),
            appearance: settings.appearance,
            target: None,
            frames: Vec::new(),
            busy: false,
            last_error: None,
        }
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, role: VariantRole) -> Option<&SourceSelection> {
        self.slots[role.index()].as_ref()
    }

    pub fn clear_slot(&mut self, role: VariantRole) {
        self.slots[role.index()] = None;
    }

    /// Updates the state from a core message.
    pub fn apply(&mut self, message: &CoreMessage) {
        match message {
            CoreMessage::TopLevelFrames { frames } => {
                if let Some(target) = self.target {
                    if !frames.iter().any(|f| f.id == target) {
                        self.target = None;
                    }
                }
                self.frames = frames.clone();
            }
            CoreMessage::SelectionUpdate { slot, selection } => {
                self.slots[slot.index()] = Some(selection.clone());
            }
            CoreMessage::LoadSettings { settings } => {
                self.appearance = settings.appearance.clone();
                self.text_color = settings.text_color.clone();
                for role in VariantRole::ALL {
                    let remembered = settings.sources.get(role).filter(|_| self.slot(role).is_none());
                    if let Some(id) = remembered {
                        self.slots[role.index()] = Some(SourceSelection {
                            id,
                            name: String::new(),
                            preview_png: Vec::new(),
                        });
                    }
                }
            }
            CoreMessage::Created { .. } => {
                self.busy = false;
                self.last_error = None;
            }
            CoreMessage::Failed { message } => {
                self.busy = false;
                self.last_error = Some(message.clone());
            }
        }
    }

    fn sources(&self) -> SlotSources {
        let mut sources = SlotSources::default();
        for role in VariantRole::ALL {
            sources.set(role, self.slot(role).map(|s| s.id));
        }
        sources
    }

    /// The selection-flow request, validated.
    pub fn logo_config(&self) -> Result<LogoConfig, ValidationError> {
        let name = validate_name(&self.product_name)?;
        let sources = self.sources();
        if sources.is_empty() {
            return Err(ValidationError::NoSource);
        }
        Ok(LogoConfig {
            product_name: name.to_string(),
            sources,
            appearance: self.appearance.clone(),
            target: self.target,
        })
    }

    /// The text-flow request, validated.
    pub fn text_logo_config(&self) -> Result<TextLogoConfig, ValidationError> {
        let name = validate_name(&self.product_name)?;
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let favicon_text = Some(self.favicon_text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Ok(TextLogoConfig {
            product_name: name.to_string(),
            text: self.text.clone(),
            text_color: self.text_color.clone(),
            favicon_text,
            appearance: self.appearance.clone(),
            target: self.target,
        })
    }

    /// Builds the create request for the current tab and marks the panel busy.
    pub fn submit(&mut self) -> Result<PanelMessage, ValidationError> {
        let message = match self.tab {
            Tab::Selection => PanelMessage::CreateComponentSet {
                config: self.logo_config()?,
            },
            Tab::Text => PanelMessage::CreateTextLogo {
                config: self.text_logo_config()?,
            },
        };
        self.busy = true;
        self.last_error = None;
        Ok(message)
    }

    /// Panel defaults to persist with `SAVE_SETTINGS`.
    pub fn settings(&self) -> PluginSettings {
        PluginSettings {
            appearance: self.appearance.clone(),
            text_color: self.text_color.clone(),
            sources: self.sources(),
        }
    }
}
