//! Capabilities the host provides to the core.
//!
//! Font loading, image export and settings storage are the only suspension
//! points of a create action. Everything else runs synchronously between
//! them against the [`Document`](crate::scene::Document).

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

use crate::error::HostError;
use crate::export;
use crate::message::CoreMessage;
use crate::scene::{FontName, Node, Typeface};

/// The host's capability surface.
///
/// Requests run one at a time on a single thread, so implementations may use
/// interior mutability and their futures need not be `Send`.
pub trait Host {
    /// Loads a typeface so text can be created in it.
    fn load_font(&self, font: &FontName) -> impl Future<Output = Result<Typeface, HostError>>;

    /// Rasterizes a node to PNG bytes.
    fn export_png(&self, node: &Node) -> impl Future<Output = Result<Vec<u8>, HostError>>;

    /// Reads a value from the host's key/value settings store.
    fn read_settings(&self, key: &str) -> impl Future<Output = Result<Option<String>, HostError>>;

    /// Writes a value to the host's key/value settings store.
    fn write_settings(&self, key: &str, value: String) -> impl Future<Output = Result<(), HostError>>;

    /// Shows a short notice to the user.
    fn notify(&self, message: &str);

    /// Sends a message to the panel.
    fn post(&self, message: CoreMessage);
}

// ============================================================================
// MemoryHost
// ============================================================================

/// A headless host: registered fonts, an in-memory settings store, and
/// recorded notices and panel messages.
///
/// # Example
///
/// ```
/// use brandset::{Host, MemoryHost};
///
/// let host = MemoryHost::with_default_fonts();
/// host.notify("Component set created");
/// assert_eq!(host.notices(), ["Component set created"]);
/// ```
#[derive(Debug)]
pub struct MemoryHost {
    fonts: HashMap<FontName, Typeface>,
    settings: RefCell<HashMap<String, String>>,
    notices: RefCell<Vec<String>>,
    outbox: RefCell<Vec<CoreMessage>>,
    export_scale: f32,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// A host with no fonts installed.
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            settings: RefCell::new(HashMap::new()),
            notices: RefCell::new(Vec::new()),
            outbox: RefCell::new(Vec::new()),
            export_scale: export::PREVIEW_SCALE,
        }
    }

    /// A host with Inter Regular and Inter Bold installed.
    pub fn with_default_fonts() -> Self {
        Self::new()
            .with_font(Typeface::new(FontName::new("Inter", "Regular"), 0.56, 0.25, 1.2))
            .with_font(Typeface::new(FontName::bold("Inter"), 0.6, 0.25, 1.2))
    }

    pub fn with_font(mut self, face: Typeface) -> Self {
        self.fonts.insert(face.name.clone(), face);
        self
    }

    /// Scale factor used for PNG export.
    pub fn with_export_scale(mut self, scale: f32) -> Self {
        self.export_scale = scale;
        self
    }

    /// Notices shown so far, oldest first.
    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }

    /// Drains the messages posted to the panel.
    pub fn take_messages(&self) -> Vec<CoreMessage> {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }

    /// Raw stored value for `key`.
    pub fn stored(&self, key: &str) -> Option<String> {
        self.settings.borrow().get(key).cloned()
    }
}

impl Host for MemoryHost {
    async fn load_font(&self, font: &FontName) -> Result<Typeface, HostError> {
        self.fonts
            .get(font)
            .cloned()
            .ok_or_else(|| HostError::FontLoad(font.clone(), "font is not installed".into()))
    }

    async fn export_png(&self, node: &Node) -> Result<Vec<u8>, HostError> {
        export::render_png(node, self.export_scale)
    }

    async fn read_settings(&self, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.stored(key))
    }

    async fn write_settings(&self, key: &str, value: String) -> Result<(), HostError> {
        self.settings.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }

    fn post(&self, message: CoreMessage) {
        self.outbox.borrow_mut().push(message);
    }
}
