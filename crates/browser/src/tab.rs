use bus::ContentCommand;
use core_types::{RequestId, TabId};
use dom::{Document, InputEvent};
use picker::{Launch, PickerConfig, PickerController, PickerError};
use std::sync::mpsc;

pub struct Tab {
    pub tab_id: TabId,
    /// Bumped on every navigation.
    pub nav_gen: RequestId,

    document: Document,
    stylesheets: Vec<String>,
    picker: PickerController,
    cmd_tx: Option<mpsc::Sender<ContentCommand>>,
}

impl Tab {
    pub fn new(tab_id: TabId, document: Document, config: PickerConfig) -> Self {
        Self {
            tab_id,
            nav_gen: 0,
            document,
            stylesheets: Vec::new(),
            picker: PickerController::new(config),
            cmd_tx: None,
        }
    }

    // -- Setup Methods ---
    pub fn set_bus_sender(&mut self, tx: mpsc::Sender<ContentCommand>) {
        self.cmd_tx = Some(tx);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn picker(&self) -> &PickerController {
        &self.picker
    }

    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    pub fn has_stylesheet(&self, name: &str) -> bool {
        self.stylesheets.iter().any(|s| s == name)
    }

    /// Apply a stylesheet to the current document. Applying the same sheet
    /// twice is a no-op.
    pub fn insert_css(&mut self, name: &str) {
        if self.has_stylesheet(name) {
            return;
        }
        log::debug!(target: "browser", "tab {}: inject {name}", self.tab_id);
        self.stylesheets.push(name.to_string());
    }

    /// Replace the document. Injected stylesheets and any running picker go
    /// with the old one, and the content runtime forgets its guard.
    pub fn navigate(&mut self, document: Document) {
        self.nav_gen = self.nav_gen.wrapping_add(1);
        self.document = document;
        self.stylesheets.clear();
        self.picker = PickerController::new(self.picker.config().clone());
        if let Some(tx) = &self.cmd_tx {
            let notice = ContentCommand::Navigated {
                tab_id: self.tab_id,
            };
            if tx.send(notice).is_err() {
                log::debug!(
                    target: "browser",
                    "tab {}: content runtime gone, navigation notice dropped",
                    self.tab_id
                );
            }
        }
    }

    /// Start the picker on this tab's document.
    pub fn launch_picker(&mut self) -> Result<Launch, PickerError> {
        self.picker.launch(&mut self.document)
    }

    // -- Event Handling ---
    /// Route one input event: resolve its target, collect the listeners on
    /// the dispatch path, and hand them to the picker.
    pub fn handle_input(&mut self, event: &InputEvent) {
        let target = match event {
            InputEvent::Click { point } | InputEvent::PointerMove { point } => {
                layout::hit_target(&self.document, *point)
            }
            InputEvent::KeyPress { .. } => None,
        };
        let path = self.document.dispatch_path(event.kind(), target);
        self.picker.dispatch(&mut self.document, &path, event);
    }
}
