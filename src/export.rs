//! PNG export of node subtrees.
//!
//! A subtree is serialized to SVG markup and rasterized with resvg. Hosts
//! without a native exporter use this for selection previews.

use std::fmt::Write as _;
use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree, fontdb};
use tracing::debug;

use crate::error::HostError;
use crate::scene::{Geometry, Node, NodeKind, Paint, to_hex};

/// Scale of preview exports.
pub const PREVIEW_SCALE: f32 = 2.0;

// ============================================================================
// SVG Serialization
// ============================================================================

/// Serializes a subtree to standalone SVG markup.
///
/// The root is drawn at the origin regardless of its position on the page.
/// Hidden nodes and paints are skipped; image fills become a neutral
/// placeholder. Text keeps its family and weight and is shaped at render
/// time from the system fonts, so a machine without the family falls back
/// to whatever face covers the glyphs.
pub fn to_svg(node: &Node) -> String {
    let mut writer = SvgWriter::default();
    writer.node(node, true);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{defs}</defs>{body}</svg>"#,
        w = node.width,
        h = node.height,
        defs = writer.defs,
        body = writer.body,
    )
}

#[derive(Default)]
struct SvgWriter {
    defs: String,
    body: String,
    gradients: usize,
}

impl SvgWriter {
    fn node(&mut self, node: &Node, root: bool) {
        if !node.visible {
            return;
        }
        let (x, y) = if root { (0.0, 0.0) } else { (node.x, node.y) };
        let _ = write!(self.body, r#"<g transform="translate({x} {y})">"#);

        match &node.kind {
            NodeKind::Frame(c) | NodeKind::Component(c) | NodeKind::ComponentSet(c) => {
                for paint in &c.fills {
                    self.rect(node.width, node.height, c.corner_radius, paint);
                }
            }
            NodeKind::Shape(shape) => {
                let stroke = shape
                    .strokes
                    .iter()
                    .find(|p| p.is_visible() && p.is_solid())
                    .and_then(|p| self.paint(p))
                    .map(|(color, _)| format!(r#" stroke="{color}" stroke-width="{}""#, shape.stroke_weight))
                    .unwrap_or_default();
                for paint in &shape.fills {
                    let Some((fill, opacity)) = self.paint(paint) else {
                        continue;
                    };
                    let paint_attrs = format!(r#"fill="{fill}" fill-opacity="{opacity}"{stroke}"#);
                    match &shape.geometry {
                        Geometry::Rectangle { corner_radius } => {
                            let _ = write!(
                                self.body,
                                r#"<rect width="{}" height="{}" rx="{corner_radius}" {paint_attrs}/>"#,
                                node.width, node.height
                            );
                        }
                        Geometry::Ellipse => {
                            let (rx, ry) = (node.width / 2.0, node.height / 2.0);
                            let _ = write!(
                                self.body,
                                r#"<ellipse cx="{rx}" cy="{ry}" rx="{rx}" ry="{ry}" {paint_attrs}/>"#
                            );
                        }
                        Geometry::Vector {
                            path,
                            view_width,
                            view_height,
                        } => {
                            let sx = if *view_width > 0.0 { node.width / view_width } else { 1.0 };
                            let sy = if *view_height > 0.0 { node.height / view_height } else { 1.0 };
                            let _ = write!(
                                self.body,
                                r#"<path d="{}" transform="scale({sx} {sy})" {paint_attrs}/>"#,
                                escape(path)
                            );
                        }
                    }
                }
            }
            NodeKind::Text(text) => {
                for paint in &text.fills {
                    let Some((fill, opacity)) = self.paint(paint) else {
                        continue;
                    };
                    let _ = write!(
                        self.body,
                        r#"<text y="{}" font-family="{}" font-weight="bold" font-size="{}" fill="{fill}" fill-opacity="{opacity}">{}</text>"#,
                        text.font_size,
                        escape(&text.face.name.family),
                        text.font_size,
                        escape(&text.characters)
                    );
                }
            }
            NodeKind::Page | NodeKind::Group | NodeKind::Slice => {}
        }

        for child in &node.children {
            self.node(child, false);
        }
        self.body.push_str("</g>");
    }

    fn rect(&mut self, width: f64, height: f64, radius: f64, paint: &Paint) {
        if let Some((fill, opacity)) = self.paint(paint) {
            let _ = write!(
                self.body,
                r#"<rect width="{width}" height="{height}" rx="{radius}" fill="{fill}" fill-opacity="{opacity}"/>"#
            );
        }
    }

    /// Fill reference and opacity for a paint, defining gradients on demand.
    fn paint(&mut self, paint: &Paint) -> Option<(String, f32)> {
        if !paint.is_visible() {
            return None;
        }
        let fill = match paint {
            Paint::Solid { color, .. } => to_hex(*color),
            Paint::GradientLinear { stops, handles, .. } => {
                self.gradients += 1;
                let id = format!("g{}", self.gradients);
                let [(x1, y1), (x2, y2)] = *handles;
                let _ = write!(
                    self.defs,
                    r#"<linearGradient id="{id}" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}">"#
                );
                for stop in stops {
                    let _ = write!(
                        self.defs,
                        r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                        stop.position,
                        to_hex(stop.color),
                        stop.alpha
                    );
                }
                self.defs.push_str("</linearGradient>");
                format!("url(#{id})")
            }
            Paint::Image { .. } => "#cccccc".to_string(),
        };
        Some((fill, paint.opacity()))
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// Rasterization
// ============================================================================

/// Renders a subtree to PNG bytes at `scale`.
pub fn render_png(node: &Node, scale: f32) -> Result<Vec<u8>, HostError> {
    if node.width <= 0.0 || node.height <= 0.0 {
        return Err(HostError::Export(format!("\"{}\" has no visible area", node.name)));
    }
    let image = rasterize(node, scale)?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| HostError::Export(e.to_string()))?;
    Ok(bytes)
}

/// Renders a subtree to an RGBA image at `scale`.
pub fn rasterize(node: &Node, scale: f32) -> Result<RgbaImage, HostError> {
    let svg = to_svg(node);
    let tree = Tree::from_str(&svg, &options()).map_err(|e| HostError::Export(e.to_string()))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| HostError::Export(format!("cannot allocate a {width}x{height} image")))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Parse options sharing one system font database across exports.
fn options() -> Options<'static> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    let fontdb = FONTS.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "loaded system fonts for export");
        Arc::new(db)
    });
    Options {
        fontdb: Arc::clone(fontdb),
        ..Options::default()
    }
}

/// Converts a tiny_skia pixmap (premultiplied) to a straight-alpha image.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
        *dst = Rgba([r, g, b, a]);
    }
    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}
