//! The plugin core: message dispatch and the create pipeline.
//!
//! A create action moves through [`Stage`]s in a fixed order:
//!
//! ```text
//! Idle → Validating → Building (4 variants) → Assembling → Placing → Done
//!            │                │                   │            │
//!            └→ Idle          └───────────────────┴────────────┴→ Failed
//! ```
//!
//! Every failure is caught here and reported once: a notice, a `FAILED`
//! message to the panel and an error log entry. Nothing is rolled back, so a
//! failure during building leaves the variants built so far on the page.

use tracing::{debug, error, info, warn};

use crate::assembler::assemble;
use crate::capture::capture_selection;
use crate::config::{LogoConfig, PluginSettings, SETTINGS_KEY, TextLogoConfig, validate_name};
use crate::error::{BuildError, HostError, ValidationError};
use crate::host::Host;
use crate::message::{CoreMessage, FrameSummary, PanelMessage};
use crate::placement::place;
use crate::scene::{Document, NodeId};
use crate::variant::vector::resolves;
use crate::variant::{Appearance, VariantContent, VariantRole, VariantSpec};

/// Notice shown when a grab finds nothing selected.
pub const NOTHING_SELECTED: &str = "Please select a logo on the canvas first";

/// Whether the panel session continues after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

/// Progress of the current (or last) create action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Validating,
    Building,
    Assembling,
    Placing,
    Done,
    Failed,
}

/// Owns the document and the host, and handles panel requests one at a time.
pub struct PluginCore<H: Host> {
    doc: Document,
    host: H,
    stage: Stage,
}

impl<H: Host> PluginCore<H> {
    pub fn new(doc: Document, host: H) -> Self {
        Self {
            doc,
            host,
            stage: Stage::Idle,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Handles one panel request to completion.
    pub async fn handle(&mut self, message: PanelMessage) -> Flow {
        match message {
            PanelMessage::RequestTopLevelFrames => {
                let frames: Vec<FrameSummary> = self
                    .doc
                    .top_level_frames()
                    .map(|n| FrameSummary {
                        id: n.id,
                        name: n.name.clone(),
                    })
                    .collect();
                debug!(count = frames.len(), "listing top-level frames");
                self.host.post(CoreMessage::TopLevelFrames { frames });
            }
            PanelMessage::GrabSelection { slot } => self.grab_selection(slot).await,
            PanelMessage::CreateComponentSet { config } => {
                let result = self.create_component_set(&config).await;
                self.report(result);
            }
            PanelMessage::CreateTextLogo { config } => {
                let result = self.create_text_logo(&config).await;
                self.report(result);
            }
            PanelMessage::RequestSettings => {
                let settings = self.load_settings().await;
                self.host.post(CoreMessage::LoadSettings { settings });
            }
            PanelMessage::SaveSettings { settings } => {
                if let Err(e) = self.save_settings(&settings).await {
                    warn!(error = %e, "failed to save settings");
                    self.host.notify(&e.to_string());
                }
            }
            PanelMessage::Close => {
                info!("panel closed");
                return Flow::Close;
            }
        }
        Flow::Continue
    }

    // ---- Create Actions ----

    /// Builds a component set from canvas selections and places it.
    ///
    /// Does not report the outcome; [`handle`](Self::handle) does.
    pub async fn create_component_set(&mut self, config: &LogoConfig) -> Result<NodeId, BuildError> {
        self.enter(Stage::Validating);
        let contents = config.contents();
        self.run(&config.product_name, &config.appearance, contents, config.target)
            .await
    }

    /// Builds a component set from generated text and places it.
    pub async fn create_text_logo(&mut self, config: &TextLogoConfig) -> Result<NodeId, BuildError> {
        self.enter(Stage::Validating);
        let contents = config.contents();
        self.run(&config.product_name, &config.appearance, contents, config.target)
            .await
    }

    async fn run(
        &mut self,
        product_name: &str,
        appearance: &Appearance,
        contents: Result<[VariantContent; 4], ValidationError>,
        target: Option<NodeId>,
    ) -> Result<NodeId, BuildError> {
        let name = validate_name(product_name)?;
        let specs = VariantSpec::plan(appearance, contents?)?;
        for spec in &specs {
            if let VariantContent::Source(id) = spec.content {
                if !resolves(&self.doc, id) {
                    return Err(BuildError::SourceNotFound { role: spec.role, id });
                }
            }
        }

        self.enter(Stage::Building);
        let mut variants = [NodeId::default(); 4];
        for spec in &specs {
            let node = spec.build(&mut self.doc, &self.host).await?;
            variants[spec.role.index()] = self.doc.append_to_page(node);
        }

        self.enter(Stage::Assembling);
        let set = assemble(&mut self.doc, variants, name)?;

        self.enter(Stage::Placing);
        let placement = place(&mut self.doc, &self.host, set, target, name).await?;
        debug!(set = %set, ?placement, "placed component set");

        self.enter(Stage::Done);
        Ok(set)
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "create stage");
        self.stage = stage;
    }

    /// Reports the outcome of a create action to the user and the panel.
    fn report(&mut self, result: Result<NodeId, BuildError>) {
        match result {
            Ok(id) => {
                let name = self.doc.find(id).map(|n| n.name.clone()).unwrap_or_default();
                info!(set = %id, name = %name, "component set created");
                self.host.notify(&format!("Created component set \"{name}\""));
                self.host.post(CoreMessage::Created { id, name });
            }
            Err(e) => {
                self.enter(if e.is_validation() { Stage::Idle } else { Stage::Failed });
                error!(category = e.category(), error = ?e, "create action failed");
                let message = e.to_string();
                self.host.notify(&message);
                self.host.post(CoreMessage::Failed { message });
            }
        }
    }

    // ---- Selection ----

    async fn grab_selection(&mut self, slot: VariantRole) {
        match capture_selection(&mut self.doc, &self.host).await {
            Ok(Some(selection)) => {
                debug!(slot = %slot, source = %selection.id, "captured selection");
                self.host.post(CoreMessage::SelectionUpdate { slot, selection });
            }
            Ok(None) => self.host.notify(NOTHING_SELECTED),
            Err(e) => {
                warn!(slot = %slot, error = %e, "selection capture failed");
                self.host.notify(&e.to_string());
            }
        }
    }

    // ---- Settings ----

    /// Loads persisted panel defaults, falling back to defaults on any error.
    ///
    /// Remembered sources that no longer resolve are dropped.
    pub async fn load_settings(&self) -> PluginSettings {
        let mut settings = match self.host.read_settings(SETTINGS_KEY).await {
            Ok(Some(json)) => PluginSettings::from_json(&json).unwrap_or_else(|e| {
                warn!(error = %e, "stored settings are invalid, using defaults");
                PluginSettings::default()
            }),
            Ok(None) => PluginSettings::default(),
            Err(e) => {
                warn!(error = %e, "failed to read settings, using defaults");
                PluginSettings::default()
            }
        };
        for role in VariantRole::ALL {
            if let Some(id) = settings.sources.get(role) {
                if !resolves(&self.doc, id) {
                    settings.sources.set(role, None);
                }
            }
        }
        settings
    }

    pub async fn save_settings(&self, settings: &PluginSettings) -> Result<(), HostError> {
        let json = settings
            .to_json()
            .map_err(|e| HostError::Storage(e.to_string()))?;
        self.host.write_settings(SETTINGS_KEY, json).await?;
        debug!("settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::config::SlotSources;
    use crate::host::MemoryHost;
    use crate::scene::{BLACK, FontName, Node, NodeKind, Paint, Typeface, WHITE};

    /// Delegates to a [`MemoryHost`] but fails the n-th font load.
    struct FlakyFonts {
        inner: MemoryHost,
        loads: Cell<usize>,
        fail_on: usize,
    }

    impl Host for FlakyFonts {
        async fn load_font(&self, font: &FontName) -> Result<Typeface, HostError> {
            let n = self.loads.get() + 1;
            self.loads.set(n);
            if n == self.fail_on {
                return Err(HostError::FontLoad(font.clone(), "host went away".into()));
            }
            self.inner.load_font(font).await
        }

        async fn export_png(&self, node: &Node) -> Result<Vec<u8>, HostError> {
            self.inner.export_png(node).await
        }

        async fn read_settings(&self, key: &str) -> Result<Option<String>, HostError> {
            self.inner.read_settings(key).await
        }

        async fn write_settings(&self, key: &str, value: String) -> Result<(), HostError> {
            self.inner.write_settings(key, value).await
        }

        fn notify(&self, message: &str) {
            self.inner.notify(message)
        }

        fn post(&self, message: CoreMessage) {
            self.inner.post(message)
        }
    }

    fn core_with_logo() -> (PluginCore<MemoryHost>, NodeId) {
        let mut doc = Document::new();
        let mark = doc.create_ellipse("Mark", 40.0, 40.0, vec![Paint::solid(BLACK)]);
        let word = doc
            .create_rectangle("Word", 120.0, 40.0, vec![Paint::solid(BLACK)])
            .with_position(50.0, 0.0);
        let logo = doc
            .create_frame("Logo", 170.0, 40.0)
            .with_position(400.0, 400.0)
            .with_children(vec![mark, word]);
        let logo = doc.append_to_page(logo);
        (PluginCore::new(doc, MemoryHost::with_default_fonts()), logo)
    }

    fn all_slots(id: NodeId) -> SlotSources {
        SlotSources {
            background: Some(id),
            light: Some(id),
            dark: Some(id),
            favicon: Some(id),
        }
    }

    #[tokio::test]
    async fn creates_acme_component_set() {
        let (mut core, logo) = core_with_logo();
        let config = LogoConfig::new("Acme", all_slots(logo));

        let flow = core
            .handle(PanelMessage::CreateComponentSet { config })
            .await;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(core.stage(), Stage::Done);
        let messages = core.host().take_messages();
        let [CoreMessage::Created { id, name }] = messages.as_slice() else {
            panic!("expected a single CREATED message, got {messages:?}");
        };
        assert_eq!(name, "Acme");

        let set = core.document().find(*id).unwrap();
        assert!(matches!(set.kind, NodeKind::ComponentSet(_)));
        let sizes: Vec<_> = set.children.iter().map(|c| (c.width, c.height)).collect();
        assert_eq!(
            sizes,
            [(315.0, 140.0), (300.0, 100.0), (300.0, 100.0), (100.0, 100.0)]
        );
        assert_eq!((set.x, set.y), (0.0, 0.0));
        assert_eq!(core.document().selection(), [*id]);
        assert_eq!(core.host().notices(), ["Created component set \"Acme\""]);

        // Source frame plus the new set.
        assert_eq!(core.document().current_page().children.len(), 2);
    }

    #[tokio::test]
    async fn monochrome_variants_are_recolored() {
        let (mut core, logo) = core_with_logo();
        let set = core
            .create_component_set(&LogoConfig::new("Acme", all_slots(logo)))
            .await
            .unwrap();

        let set = core.document().find(set).unwrap();
        let dark = &set.children[VariantRole::Dark.index()];
        dark.children[0].walk(&mut |n| {
            for paint in n.kind.fills().unwrap_or_default() {
                assert_eq!(paint, &Paint::solid(WHITE));
            }
        });
    }

    #[tokio::test]
    async fn missing_source_fails_without_new_nodes() {
        let (mut core, logo) = core_with_logo();
        let mut sources = all_slots(logo);
        sources.favicon = Some(NodeId(999));
        let before = core.document().current_page().subtree_len();

        core.handle(PanelMessage::CreateComponentSet {
            config: LogoConfig::new("Acme", sources),
        })
        .await;

        assert_eq!(core.stage(), Stage::Failed);
        assert_eq!(core.host().notices().len(), 1);
        assert!(core.host().notices()[0].starts_with("Source for the favicon variant"));
        assert!(matches!(
            core.host().take_messages().as_slice(),
            [CoreMessage::Failed { .. }]
        ));
        assert_eq!(core.document().current_page().subtree_len(), before);
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_building() {
        let (mut core, logo) = core_with_logo();

        core.handle(PanelMessage::CreateComponentSet {
            config: LogoConfig::new("   ", all_slots(logo)),
        })
        .await;

        assert_eq!(core.stage(), Stage::Idle);
        assert_eq!(core.host().notices(), ["Please enter a product name"]);
        assert_eq!(core.document().current_page().children.len(), 1);
    }

    #[tokio::test]
    async fn no_sources_is_a_validation_error() {
        let (mut core, _) = core_with_logo();
        let err = core
            .create_component_set(&LogoConfig::new("Acme", SlotSources::default()))
            .await
            .unwrap_err();
        assert_eq!(err, BuildError::Validation(ValidationError::NoSource));
    }

    #[tokio::test]
    async fn text_logo_is_filed_into_target() {
        let (mut core, _) = core_with_logo();
        let brand = core.document_mut().create_frame("Brand", 2000.0, 1000.0);
        let brand = core.document_mut().append_to_page(brand);

        let config = TextLogoConfig::new("Acme", "Acme").with_target(brand);
        let set = core.create_text_logo(&config).await.unwrap();

        let doc = core.document();
        let bucket = doc.parent_of(set).unwrap();
        assert_eq!(doc.find(bucket).unwrap().name, "A");
        let content = doc.parent_of(bucket).unwrap();
        assert_eq!(doc.parent_of(content), Some(brand));

        let favicon = &doc.find(set).unwrap().children[VariantRole::Favicon.index()];
        let NodeKind::Text(text) = &favicon.children.last().unwrap().kind else {
            panic!("expected favicon text");
        };
        assert_eq!(text.characters, "A");
    }

    #[tokio::test]
    async fn text_logo_without_font_fails() {
        let mut core = PluginCore::new(Document::new(), MemoryHost::new());

        core.handle(PanelMessage::CreateTextLogo {
            config: TextLogoConfig::new("Acme", "Acme"),
        })
        .await;

        assert_eq!(core.stage(), Stage::Failed);
        assert_eq!(core.host().notices().len(), 1);
        assert!(core.document().current_page().children.is_empty());
    }

    #[tokio::test]
    async fn failure_mid_build_leaves_orphan_variants() {
        let host = FlakyFonts {
            inner: MemoryHost::with_default_fonts(),
            loads: Cell::new(0),
            fail_on: 3,
        };
        let mut core = PluginCore::new(Document::new(), host);

        core.handle(PanelMessage::CreateTextLogo {
            config: TextLogoConfig::new("Acme", "Acme"),
        })
        .await;

        assert_eq!(core.stage(), Stage::Failed);
        assert_eq!(core.host().inner.notices().len(), 1);
        assert!(matches!(
            core.host().inner.take_messages().as_slice(),
            [CoreMessage::Failed { .. }]
        ));

        let page = core.document().current_page();
        let names: Vec<_> = page.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Type=Background", "Type=Light"]);
        assert!(page.children.iter().all(|n| matches!(n.kind, NodeKind::Component(_))));
        let mut sets = 0;
        page.walk(&mut |n| {
            if matches!(n.kind, NodeKind::ComponentSet(_)) {
                sets += 1;
            }
        });
        assert_eq!(sets, 0);
    }

    #[tokio::test]
    async fn component_targets_are_listed() {
        let (mut core, logo) = core_with_logo();
        let library = core.document_mut().create_component("Library", 100.0, 100.0);
        let library = core.document_mut().append_to_page(library);

        core.handle(PanelMessage::RequestTopLevelFrames).await;
        let messages = core.host().take_messages();
        let [CoreMessage::TopLevelFrames { frames }] = messages.as_slice() else {
            panic!("expected a frame list, got {messages:?}");
        };
        let ids: Vec<_> = frames.iter().map(|f| f.id).collect();
        assert_eq!(ids, [logo, library]);
    }

    #[tokio::test]
    async fn lists_top_level_frames() {
        let (mut core, logo) = core_with_logo();
        core.handle(PanelMessage::RequestTopLevelFrames).await;
        assert_eq!(
            core.host().take_messages(),
            [CoreMessage::TopLevelFrames {
                frames: vec![FrameSummary {
                    id: logo,
                    name: "Logo".into()
                }]
            }]
        );
    }

    #[tokio::test]
    async fn grab_selection_reports_slot() {
        let (mut core, logo) = core_with_logo();

        core.handle(PanelMessage::GrabSelection {
            slot: VariantRole::Light,
        })
        .await;
        assert_eq!(core.host().notices(), [NOTHING_SELECTED]);

        core.document_mut().set_selection(vec![logo]);
        core.handle(PanelMessage::GrabSelection {
            slot: VariantRole::Light,
        })
        .await;
        let messages = core.host().take_messages();
        let [CoreMessage::SelectionUpdate { slot, selection }] = messages.as_slice() else {
            panic!("expected a selection update, got {messages:?}");
        };
        assert_eq!(*slot, VariantRole::Light);
        assert_eq!(selection.id, logo);
        assert!(!selection.preview_png.is_empty());
    }

    #[tokio::test]
    async fn settings_round_trip_through_host() {
        let (mut core, logo) = core_with_logo();
        let mut settings = PluginSettings::default();
        settings.appearance.favicon_background = false;
        settings.sources.light = Some(logo);
        settings.sources.dark = Some(NodeId(999));

        core.handle(PanelMessage::SaveSettings {
            settings: settings.clone(),
        })
        .await;
        assert!(core.host().stored(SETTINGS_KEY).is_some());

        core.handle(PanelMessage::RequestSettings).await;
        let messages = core.host().take_messages();
        let [CoreMessage::LoadSettings { settings: loaded }] = messages.as_slice() else {
            panic!("expected LOAD_SETTINGS");
        };
        assert!(!loaded.appearance.favicon_background);
        assert_eq!(loaded.sources.light, Some(logo));
        assert_eq!(loaded.sources.dark, None);
    }

    #[tokio::test]
    async fn corrupt_settings_load_as_defaults() {
        let (mut core, _) = core_with_logo();
        core.host().write_settings(SETTINGS_KEY, "not json".into()).await.unwrap();
        assert_eq!(core.load_settings().await, PluginSettings::default());
        assert_eq!(core.handle(PanelMessage::Close).await, Flow::Close);
    }
}
