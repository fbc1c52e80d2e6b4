//! Fill and stroke paints.

use palette::Srgb;

use crate::error::ValidationError;

/// A color stop of a gradient paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient axis (0.0-1.0).
    pub position: f32,
    pub color: Srgb,
    pub alpha: f32,
}

/// A single paint in a node's fill or stroke list.
///
/// Only [`Paint::Solid`] is ever rewritten by recoloring; gradients and
/// images are carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid {
        color: Srgb,
        opacity: f32,
        visible: bool,
    },
    GradientLinear {
        stops: Vec<GradientStop>,
        /// Start and end handle in node-relative units (0.0-1.0).
        handles: [(f32, f32); 2],
        opacity: f32,
        visible: bool,
    },
    Image {
        hash: String,
        opacity: f32,
        visible: bool,
    },
}

impl Paint {
    /// A fully opaque, visible solid paint.
    pub fn solid(color: Srgb) -> Self {
        Self::Solid {
            color,
            opacity: 1.0,
            visible: true,
        }
    }

    /// A visible solid paint with the given opacity, clamped to 0.0-1.0.
    pub fn solid_with_opacity(color: Srgb, opacity: f32) -> Self {
        Self::Solid {
            color,
            opacity: opacity.clamp(0.0, 1.0),
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Self::Solid { visible, .. }
            | Self::GradientLinear { visible, .. }
            | Self::Image { visible, .. } => *visible,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Self::Solid { opacity, .. }
            | Self::GradientLinear { opacity, .. }
            | Self::Image { opacity, .. } => *opacity,
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid { .. })
    }
}

// ============================================================================
// Color Utilities
// ============================================================================

pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);

/// Parses `#rrggbb`, `rrggbb` or `#rgb` into a color.
pub fn parse_hex(hex: &str) -> Result<Srgb, ValidationError> {
    hex.trim()
        .parse::<Srgb<u8>>()
        .map(|c| c.into_format())
        .map_err(|_| ValidationError::InvalidColor(hex.to_string()))
}

/// Formats a color as lowercase `#rrggbb`.
pub fn to_hex(color: Srgb) -> String {
    let c: Srgb<u8> = color.into_format();
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}
