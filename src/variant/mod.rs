//! Variant specifications and builders.
//!
//! A variant is one fixed-size rendering of the logo. Four roles exist and
//! their sizes never change:
//!
//! | Role         | Size    | Padding | Background            | Color override  |
//! |--------------|---------|---------|-----------------------|-----------------|
//! | `Background` | 315x140 | 8       | always                | none            |
//! | `Light`      | 300x100 | 0       | none                  | black, optional |
//! | `Dark`       | 300x100 | 0       | none                  | white, optional |
//! | `Favicon`    | 100x100 | 20      | optional, own shape   | none            |
//!
//! Each builder produces a detached component: a fixed-size container with an
//! empty fill, an optional background rectangle, and the normalized content.

pub mod text;
pub mod vector;

use std::fmt;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, ValidationError};
use crate::geometry::lock_aspect_and_scale_constraints;
use crate::host::Host;
use crate::scene::{BLACK, Document, Geometry, Node, NodeId, NodeKind, Paint, WHITE, parse_hex};

// ============================================================================
// Roles
// ============================================================================

/// Semantic role of a variant inside a component set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum VariantRole {
    /// The hero lockup on a background.
    Background,
    Light,
    Dark,
    Favicon,
}

impl VariantRole {
    /// All roles, in component-set order.
    pub const ALL: [Self; 4] = [Self::Background, Self::Light, Self::Dark, Self::Favicon];

    pub fn size(self) -> (f64, f64) {
        match self {
            Self::Background => (315.0, 140.0),
            Self::Light | Self::Dark => (300.0, 100.0),
            Self::Favicon => (100.0, 100.0),
        }
    }

    pub fn padding(self) -> f64 {
        match self {
            Self::Background => 8.0,
            Self::Light | Self::Dark => 0.0,
            Self::Favicon => 20.0,
        }
    }

    /// Variant property string used as the component name.
    pub fn variant_name(self) -> &'static str {
        match self {
            Self::Background => "Type=Background",
            Self::Light => "Type=Light",
            Self::Dark => "Type=Dark",
            Self::Favicon => "Type=Favicon",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Light => 1,
            Self::Dark => 2,
            Self::Favicon => 3,
        }
    }
}

impl fmt::Display for VariantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Background => "background",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Favicon => "favicon",
        })
    }
}

// ============================================================================
// Background
// ============================================================================

/// Outline of a variant's background rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum BackgroundShape {
    #[default]
    Square,
    Circle,
}

impl BackgroundShape {
    pub fn corner_radius(self, width: f64, height: f64) -> f64 {
        match self {
            Self::Square => 0.0,
            Self::Circle => width.min(height) / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub color: Srgb,
    pub opacity: f32,
    pub shape: BackgroundShape,
}

/// The user's shared styling choices for one create action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Appearance {
    /// Hex color of the hero and favicon backgrounds.
    pub background_color: String,
    /// Background opacity (0.0-1.0).
    pub background_opacity: f32,
    pub favicon_background: bool,
    pub favicon_shape: BackgroundShape,
    /// Force the light variant to black.
    pub light_monochrome: bool,
    /// Force the dark variant to white.
    pub dark_monochrome: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            background_opacity: 1.0,
            favicon_background: true,
            favicon_shape: BackgroundShape::Square,
            light_monochrome: true,
            dark_monochrome: true,
        }
    }
}

// ============================================================================
// VariantSpec
// ============================================================================

/// What a variant shows.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantContent {
    /// A copy of an existing node.
    Source(NodeId),
    /// Generated text in the bold typeface.
    Text { characters: String, color: Srgb },
}

/// Everything needed to build one variant. Consumed by a single build.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSpec {
    pub role: VariantRole,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub name: String,
    pub content: VariantContent,
    pub background: Option<Background>,
    pub color_override: Option<Srgb>,
}

impl VariantSpec {
    /// A bare spec with the role's fixed size and padding.
    pub fn for_role(role: VariantRole, content: VariantContent) -> Self {
        let (width, height) = role.size();
        Self {
            role,
            width,
            height,
            padding: role.padding(),
            name: role.variant_name().to_string(),
            content,
            background: None,
            color_override: None,
        }
    }

    /// Plans all four variants from the shared appearance.
    ///
    /// `contents` is in [`VariantRole::ALL`] order.
    pub fn plan(appearance: &Appearance, contents: [VariantContent; 4]) -> Result<[Self; 4], ValidationError> {
        let color = parse_hex(&appearance.background_color)?;
        let opacity = appearance.background_opacity.clamp(0.0, 1.0);
        let [background, light, dark, favicon] = contents;

        let mut hero = Self::for_role(VariantRole::Background, background);
        hero.background = Some(Background {
            color,
            opacity,
            shape: BackgroundShape::Square,
        });

        let mut light = Self::for_role(VariantRole::Light, light);
        light.color_override = appearance.light_monochrome.then_some(BLACK);

        let mut dark = Self::for_role(VariantRole::Dark, dark);
        dark.color_override = appearance.dark_monochrome.then_some(WHITE);

        let mut favicon = Self::for_role(VariantRole::Favicon, favicon);
        if appearance.favicon_background {
            favicon.background = Some(Background {
                color,
                opacity,
                shape: appearance.favicon_shape,
            });
        }

        Ok([hero, light, dark, favicon])
    }

    /// Builds the variant as a detached component.
    pub async fn build<H: Host>(&self, doc: &mut Document, host: &H) -> Result<Node, BuildError> {
        match &self.content {
            VariantContent::Source(id) => vector::build_from_selection(doc, self, *id),
            VariantContent::Text { characters, color } => {
                text::build_from_text(doc, host, self, characters, *color).await
            }
        }
    }
}

// ============================================================================
// Shared Construction
// ============================================================================

/// The fixed-size component every variant lives in, with its background.
pub(crate) fn component_shell(doc: &mut Document, spec: &VariantSpec) -> Node {
    let mut shell = doc.create_component(&spec.name, spec.width, spec.height);
    if let Some(background) = &spec.background {
        let rect = background_rect(doc, spec, background);
        shell.children.push(rect);
    }
    lock_aspect_and_scale_constraints(&mut shell);
    shell
}

fn background_rect(doc: &mut Document, spec: &VariantSpec, background: &Background) -> Node {
    let fill = Paint::solid_with_opacity(background.color, background.opacity);
    let mut rect = doc.create_rectangle("Background", spec.width, spec.height, vec![fill]);
    if let NodeKind::Shape(shape) = &mut rect.kind {
        shape.geometry = Geometry::Rectangle {
            corner_radius: background.shape.corner_radius(spec.width, spec.height),
        };
    }
    rect
}
