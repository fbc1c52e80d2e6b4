//! Variants built from generated text.

use palette::Srgb;
use tracing::debug;

use super::VariantSpec;
use crate::error::{BuildError, ValidationError};
use crate::geometry::{center_in_parent, fit_scale, lock_aspect_and_scale_constraints};
use crate::host::Host;
use crate::scene::{Document, FontName, Node, Paint};

/// Family of the bold typeface used for text logos and bucket labels.
pub const LOGO_FONT_FAMILY: &str = "Inter";

/// Font size the text is first set at before it is measured and fitted.
pub const INITIAL_FONT_SIZE: f64 = 200.0;

pub fn logo_font() -> FontName {
    FontName::bold(LOGO_FONT_FAMILY)
}

/// Final font size for text measured at [`INITIAL_FONT_SIZE`].
///
/// `floor(INITIAL_FONT_SIZE * scale)` where `scale` fits the measured box
/// into the padded variant box; never below 1.
pub fn fitted_font_size(measured_w: f64, measured_h: f64, width: f64, height: f64, padding: f64) -> f64 {
    let scale = fit_scale(measured_w, measured_h, width, height, padding).unwrap_or(1.0);
    (INITIAL_FONT_SIZE * scale).floor().max(1.0)
}

/// Builds a variant around a text node.
///
/// The bold typeface is loaded first; if the host cannot provide it the
/// whole action fails.
pub async fn build_from_text<H: Host>(
    doc: &mut Document,
    host: &H,
    spec: &VariantSpec,
    characters: &str,
    color: Srgb,
) -> Result<Node, BuildError> {
    if characters.trim().is_empty() {
        return Err(ValidationError::EmptyText.into());
    }
    let face = host.load_font(&logo_font()).await?;

    let color = spec.color_override.unwrap_or(color);
    let mut text = doc.create_text(characters, &face, INITIAL_FONT_SIZE, vec![Paint::solid(color)]);
    let size = fitted_font_size(text.width, text.height, spec.width, spec.height, spec.padding);
    text.set_font_size(size);
    center_in_parent(&mut text, spec.width, spec.height);
    lock_aspect_and_scale_constraints(&mut text);

    debug!(role = %spec.role, font_size = size, "built variant from text");

    let mut shell = super::component_shell(doc, spec);
    shell.children.push(text);
    Ok(shell)
}
