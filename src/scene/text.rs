//! Typefaces and text measurement.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Family and style of a font, as the host names it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    /// The bold face of `family`.
    pub fn bold(family: impl Into<String>) -> Self {
        Self::new(family, "Bold")
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// A loaded typeface with the metrics needed to auto-size text boxes.
///
/// All metrics are in ems: multiply by the font size to get pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Typeface {
    pub name: FontName,
    /// Advance of a regular glyph.
    pub advance: f64,
    /// Advance of a whitespace glyph.
    pub space_advance: f64,
    /// Height of one line.
    pub line_height: f64,
}

impl Typeface {
    pub fn new(name: FontName, advance: f64, space_advance: f64, line_height: f64) -> Self {
        Self {
            name,
            advance,
            space_advance,
            line_height,
        }
    }

    /// Measures the auto-sized box of `text` at `size`.
    ///
    /// Width is the widest line, height is one line height per line.
    pub fn measure(&self, text: &str, size: f64) -> (f64, f64) {
        let mut widest: f64 = 0.0;
        let mut lines = 0usize;
        for line in text.split('\n') {
            lines += 1;
            let ems: f64 = line
                .chars()
                .map(|c| {
                    if c.is_whitespace() {
                        self.space_advance
                    } else {
                        self.advance
                    }
                })
                .sum();
            widest = widest.max(ems * size);
        }
        (widest, lines as f64 * self.line_height * size)
    }
}
