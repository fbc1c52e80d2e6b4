//! brandset: logo component sets for design documents
//!
//! This crate builds branding component sets (a hero lockup on a
//! background, light and dark transparent variants, and a favicon) from
//! nodes selected on a canvas or from generated text, and files them into an
//! alphabetical index inside a target frame.
//!
//! # Example
//!
//! ```
//! use brandset::config::{LogoConfig, SlotSources};
//! use brandset::scene::{BLACK, Document, Paint};
//! use brandset::{MemoryHost, PanelMessage, PluginCore};
//!
//! # tokio_test_runtime(async {
//! let mut doc = Document::new();
//! let mark = doc.create_ellipse("Mark", 64.0, 64.0, vec![Paint::solid(BLACK)]);
//! let mark = doc.append_to_page(mark);
//!
//! let mut core = PluginCore::new(doc, MemoryHost::with_default_fonts());
//! let sources = SlotSources { background: Some(mark), ..SlotSources::default() };
//! core.handle(PanelMessage::CreateComponentSet {
//!     config: LogoConfig::new("Acme", sources),
//! })
//! .await;
//!
//! assert_eq!(core.host().notices(), ["Created component set \"Acme\""]);
//! # });
//! # fn tokio_test_runtime(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! # Geometry
//!
//! Variant content is fitted with [`geometry::fit_scale`]:
//!
//! ```
//! use brandset::geometry::fit_scale;
//!
//! // 100x50 into a 315x140 box with 8px padding.
//! assert_eq!(fit_scale(100.0, 50.0, 315.0, 140.0, 8.0), Some(2.48));
//! ```

mod assembler;
mod capture;
mod error;
mod host;
mod recolor;

pub mod config;
pub mod export;
pub mod geometry;
pub mod message;
pub mod panel;
pub mod placement;
pub mod plugin;
pub mod scene;
pub mod variant;

pub use assembler::{VARIANT_SPACING, assemble};
pub use capture::{SELECTION_GROUP_NAME, capture_selection};
pub use error::{BuildError, HostError, SceneError, ValidationError};
pub use host::{Host, MemoryHost};
pub use message::{CoreMessage, FrameSummary, PanelMessage};
pub use panel::PanelState;
pub use placement::{Placement, place};
pub use plugin::{Flow, PluginCore, Stage};
pub use recolor::{apply_color, strip_invisible_fills};
pub use variant::{Appearance, BackgroundShape, VariantRole, VariantSpec};
