//! One picker session, from the first cursor-select prompt to teardown.
//!
//! A session is always in exactly one [`Phase`]. Each phase attaches its own
//! listeners on entry and the previous phase's listeners are detached first,
//! so no two phases ever react to the same event. Edits a phase makes to the
//! page go through a journal that is rolled back when the phase is left or
//! the session ends.

use crate::chain::{AncestorChain, dimensions};
use crate::config::{KeyAction, KeyBindings, PickerConfig};
use crate::error::PickerError;
use crate::focus::Expansion;
use crate::journal::Journal;
use crate::overlay::Highlight;
use crate::panel::{InfoPanel, Slot};
use core_types::Point;
use dom::{Document, EventKind, EventTarget, Id, InputEvent, ListenerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the click that fixes the ancestor chain.
    CursorSelect,
    /// Stepping through the chain with the keyboard.
    AncestorCycle,
    /// The chosen element fills the viewport.
    FocusExpand,
    Terminated,
}

/// What a listener attached by the session does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Handler {
    SelectClick,
    SelectKey,
    CycleKey,
    PanelClick,
    FocusKey,
}

const HOVER_TEXT: &str = "Go here for tips";

#[derive(Debug)]
pub struct Session {
    config: PickerConfig,
    phase: Phase,
    listeners: Vec<(ListenerId, Handler)>,
    panel: InfoPanel,
    chain: Option<AncestorChain>,
    highlight: Highlight,
    expansion: Option<Expansion>,
    /// Edits owned by the current phase.
    phase_journal: Journal,
    /// Edits that live as long as the session: the panel and body focus.
    session_journal: Journal,
}

impl Session {
    /// Mount the info panel and enter [`Phase::CursorSelect`]. On failure the
    /// document is left untouched.
    pub fn start(doc: &mut Document, config: PickerConfig) -> Result<Self, PickerError> {
        let mut session_journal = Journal::new();
        let panel = match InfoPanel::mount(doc, &mut session_journal, config.panel) {
            Ok(panel) => panel,
            Err(err) => {
                let _ = session_journal.rollback(doc);
                return Err(err.into());
            }
        };
        let highlight = Highlight::new(config.highlight, &config.classes.highlight);
        let mut session = Self {
            config,
            phase: Phase::CursorSelect,
            listeners: Vec::new(),
            panel,
            chain: None,
            highlight,
            expansion: None,
            phase_journal: Journal::new(),
            session_journal,
        };
        if let Err(err) = session.enter_cursor_select(doc) {
            session.terminate(doc);
            return Err(err);
        }
        Ok(session)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn chain(&self) -> Option<&AncestorChain> {
        self.chain.as_ref()
    }

    pub fn panel(&self) -> &InfoPanel {
        &self.panel
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn expansion(&self) -> Option<&Expansion> {
        self.expansion.as_ref()
    }

    /// Listeners currently attached by this session.
    pub fn listener_ids(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.listeners.iter().map(|(id, _)| *id)
    }

    pub fn handles(&self, listener: ListenerId) -> bool {
        self.handler(listener).is_some()
    }

    fn handler(&self, listener: ListenerId) -> Option<Handler> {
        self.listeners
            .iter()
            .find(|(id, _)| *id == listener)
            .map(|(_, handler)| *handler)
    }

    /// Nodes the session itself put in the page. They never enter a chain.
    pub fn is_own_node(&self, doc: &Document, id: Id) -> bool {
        self.panel.contains(doc, id) || self.highlight.overlay() == Some(id)
    }

    /// Run the handler behind `listener` for `event`. Listeners this session
    /// does not own, or no longer owns, are ignored.
    pub fn handle(
        &mut self,
        doc: &mut Document,
        listener: ListenerId,
        event: &InputEvent,
    ) -> Result<(), PickerError> {
        let Some(handler) = self.handler(listener) else {
            return Ok(());
        };
        let action = match event {
            InputEvent::KeyPress { code } => self.config.keys.action(code),
            _ => None,
        };
        match (handler, event) {
            (Handler::SelectClick, InputEvent::Click { point }) => self.select_at(doc, *point),
            (Handler::PanelClick, InputEvent::Click { .. }) => self.confirm(doc),
            (Handler::SelectKey | Handler::FocusKey, _) if action == Some(KeyAction::Quit) => {
                self.quit(doc);
                Ok(())
            }
            (Handler::CycleKey, _) => match action {
                Some(KeyAction::Previous) => self.previous(doc),
                Some(KeyAction::Next) => self.next(doc),
                Some(KeyAction::Confirm) => self.confirm(doc),
                Some(KeyAction::Quit) => {
                    self.quit(doc);
                    Ok(())
                }
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    // --- cursor select ---

    fn enter_cursor_select(&mut self, doc: &mut Document) -> Result<(), PickerError> {
        let quit = KeyBindings::label(&self.config.keys.quit);
        self.panel.set(doc, Slot::Title, "Select Section")?;
        self.panel.set(
            doc,
            Slot::Help,
            &format!(
                "Left click to select selector.\nMore precise selection in next step.\nPress {quit} to quit."
            ),
        )?;
        self.panel.set(doc, Slot::Hover, HOVER_TEXT)?;

        if let Some(body) = doc.body() {
            self.phase_journal
                .add_class(doc, body, &self.config.classes.cursor_select)?;
            self.session_journal.focus(doc, Some(body))?;
        }
        self.phase = Phase::CursorSelect;
        self.attach(
            doc,
            &[
                (EventTarget::Document, EventKind::Click, Handler::SelectClick),
                (EventTarget::Document, EventKind::KeyPress, Handler::SelectKey),
            ],
        )?;
        log::debug!(target: "picker", "cursor select");
        Ok(())
    }

    /// Capture the chain under `point` and move on to cycling through it.
    /// With nothing selectable there, the click is ignored.
    pub fn select_at(&mut self, doc: &mut Document, point: Point) -> Result<(), PickerError> {
        if self.phase != Phase::CursorSelect {
            return Ok(());
        }
        let view: &Document = doc;
        let chain = match AncestorChain::capture(view, point, |id| self.is_own_node(view, id)) {
            Ok(chain) => chain,
            Err(PickerError::EmptyChain) => {
                log::warn!(target: "picker", "nothing to select at {point:?}");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        self.leave_phase(doc)?;
        self.enter_ancestor_cycle(doc, chain)
    }

    // --- ancestor cycle ---

    fn enter_ancestor_cycle(
        &mut self,
        doc: &mut Document,
        chain: AncestorChain,
    ) -> Result<(), PickerError> {
        let keys = &self.config.keys;
        let help = format!(
            "Press {} and {} to toggle selector.\nPress {} or this button to confirm.\nPress {} to quit.",
            KeyBindings::label(&keys.previous),
            KeyBindings::label(&keys.next),
            KeyBindings::label(&keys.confirm),
            KeyBindings::label(&keys.quit),
        );
        self.panel.set(doc, Slot::Title, "")?;
        self.panel.set(doc, Slot::Help, &help)?;

        let target = chain.active();
        log::debug!(target: "picker", "ancestor cycle over {} elements", chain.len());
        self.chain = Some(chain);
        self.phase = Phase::AncestorCycle;
        self.attach(
            doc,
            &[
                (EventTarget::Window, EventKind::KeyPress, Handler::CycleKey),
                (
                    EventTarget::Node(self.panel.root()),
                    EventKind::Click,
                    Handler::PanelClick,
                ),
            ],
        )?;
        self.highlight.show_at(doc, target)?;
        self.refresh_info(doc)
    }

    /// Make the next enclosing element active.
    pub fn next(&mut self, doc: &mut Document) -> Result<(), PickerError> {
        self.step(doc, AncestorChain::next)
    }

    /// Make the next inner element active.
    pub fn previous(&mut self, doc: &mut Document) -> Result<(), PickerError> {
        self.step(doc, AncestorChain::previous)
    }

    fn step(
        &mut self,
        doc: &mut Document,
        advance: fn(&mut AncestorChain) -> Id,
    ) -> Result<(), PickerError> {
        if self.phase != Phase::AncestorCycle {
            return Ok(());
        }
        let chain = self.chain.as_mut().ok_or(PickerError::EmptyChain)?;
        let target = advance(chain);
        layout::scroll_into_view(doc, target);
        self.highlight.move_to(doc, target)?;
        self.refresh_info(doc)
    }

    fn refresh_info(&self, doc: &mut Document) -> Result<(), PickerError> {
        let Some(chain) = &self.chain else {
            return Ok(());
        };
        let crumb = chain.breadcrumb(doc, self.config.breadcrumb_segments);
        let size = dimensions(doc, chain.active());
        self.panel.set(doc, Slot::Selectors, &crumb)?;
        self.panel.set(doc, Slot::Dimensions, &size)?;
        Ok(())
    }

    /// Expand the active element. Confirm key and panel click both land here.
    pub fn confirm(&mut self, doc: &mut Document) -> Result<(), PickerError> {
        if self.phase != Phase::AncestorCycle {
            return Ok(());
        }
        let chain = self.chain.clone().ok_or(PickerError::EmptyChain)?;
        self.leave_phase(doc)?;
        self.enter_focus_expand(doc, &chain)
    }

    // --- focus expand ---

    fn enter_focus_expand(
        &mut self,
        doc: &mut Document,
        chain: &AncestorChain,
    ) -> Result<(), PickerError> {
        self.phase = Phase::FocusExpand;
        let expansion = Expansion::expand(
            doc,
            chain.enclosing(),
            &self.config.classes,
            &self.config.fallback_background,
        )?;
        log::debug!(
            target: "picker",
            "focus expand on <{}>",
            doc.tag_name(expansion.element()).unwrap_or("?")
        );
        self.expansion = Some(expansion);
        self.phase_journal
            .add_class(doc, self.panel.root(), &self.config.classes.hidden)?;
        self.attach(
            doc,
            &[(EventTarget::Window, EventKind::KeyPress, Handler::FocusKey)],
        )
    }

    // --- teardown ---

    /// End the session from any phase. Calling it again does nothing.
    pub fn quit(&mut self, doc: &mut Document) {
        if self.phase == Phase::Terminated {
            return;
        }
        self.terminate(doc);
    }

    fn terminate(&mut self, doc: &mut Document) {
        self.detach_all(doc);
        let results = [
            self.highlight.hide(doc).map_err(PickerError::from),
            self.phase_journal.rollback(doc).map_err(PickerError::from),
            match self.expansion.take() {
                Some(expansion) => expansion.restore(doc).map_err(PickerError::from),
                None => Ok(()),
            },
            self.session_journal.rollback(doc).map_err(PickerError::from),
        ];
        for err in results.into_iter().filter_map(Result::err) {
            log::warn!(target: "picker", "teardown incomplete: {err}");
        }
        self.chain = None;
        self.phase = Phase::Terminated;
        log::debug!(target: "picker", "terminated");
    }

    fn leave_phase(&mut self, doc: &mut Document) -> Result<(), PickerError> {
        self.detach_all(doc);
        self.highlight.hide(doc)?;
        self.phase_journal.rollback(doc)?;
        Ok(())
    }

    fn attach(
        &mut self,
        doc: &mut Document,
        specs: &[(EventTarget, EventKind, Handler)],
    ) -> Result<(), PickerError> {
        for &(target, kind, handler) in specs {
            let id = doc.add_listener(target, kind)?;
            self.listeners.push((id, handler));
        }
        Ok(())
    }

    fn detach_all(&mut self, doc: &mut Document) {
        for (id, _) in self.listeners.drain(..) {
            doc.remove_listener(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PANEL_ID;
    use dom::test_utils::PageBuilder;

    fn page() -> (Document, Id, Id) {
        let mut page = PageBuilder::new(800.0, 600.0);
        let article = page.block(page.body(), "div", 0.0, 0.0, 600.0, 400.0);
        let para = page.block(article, "p", 0.0, 20.0, 600.0, 100.0);
        (page.build(), article, para)
    }

    #[test]
    fn start_shows_prompt_and_listens_on_document() {
        let (mut doc, _, _) = page();
        let session = Session::start(&mut doc, PickerConfig::default()).unwrap();
        let body = doc.body().unwrap();

        assert_eq!(session.phase(), Phase::CursorSelect);
        assert!(doc.has_class(body, "section-reader-cursor-select"));
        assert_eq!(doc.focused(), Some(body));
        assert_eq!(session.panel().text(&doc, Slot::Title), "Select Section");
        assert_eq!(session.panel().text(&doc, Slot::Hover), HOVER_TEXT);
        assert_eq!(doc.listeners().count_on(EventTarget::Document), 2);
        assert_eq!(doc.listeners().len(), 2);
    }

    #[test]
    fn click_on_empty_space_stays_in_cursor_select() {
        let (mut doc, _, _) = page();
        let mut session = Session::start(&mut doc, PickerConfig::default()).unwrap();
        session.select_at(&mut doc, Point::new(900.0, 900.0)).unwrap();
        assert_eq!(session.phase(), Phase::CursorSelect);
        assert!(session.chain().is_none());
    }

    #[test]
    fn selecting_swaps_listeners_and_highlights() {
        let (mut doc, article, para) = page();
        let mut session = Session::start(&mut doc, PickerConfig::default()).unwrap();
        session.select_at(&mut doc, Point::new(10.0, 30.0)).unwrap();

        assert_eq!(session.phase(), Phase::AncestorCycle);
        let chain = session.chain().unwrap();
        assert_eq!(chain.elements(), &[para, article, doc.body().unwrap()]);
        assert!(!doc.has_class(doc.body().unwrap(), "section-reader-cursor-select"));
        assert_eq!(doc.listeners().count_on(EventTarget::Document), 0);
        assert_eq!(doc.listeners().count_on(EventTarget::Window), 1);
        assert_eq!(
            doc.listeners()
                .count_on(EventTarget::Node(session.panel().root())),
            1
        );
        assert_eq!(session.highlight().target(), Some(para));
        assert_eq!(session.panel().text(&doc, Slot::Selectors), "p");
        assert_eq!(session.panel().text(&doc, Slot::Dimensions), "600 \u{00D7} 100");
    }

    #[test]
    fn keys_outside_their_phase_do_nothing() {
        let (mut doc, _, _) = page();
        let mut session = Session::start(&mut doc, PickerConfig::default()).unwrap();
        session.next(&mut doc).unwrap();
        session.confirm(&mut doc).unwrap();
        assert_eq!(session.phase(), Phase::CursorSelect);
    }

    #[test]
    fn quit_is_idempotent_and_removes_the_panel() {
        let (mut doc, _, _) = page();
        let mut session = Session::start(&mut doc, PickerConfig::default()).unwrap();
        session.quit(&mut doc);
        session.quit(&mut doc);

        assert_eq!(session.phase(), Phase::Terminated);
        assert_eq!(doc.element_by_id(PANEL_ID), None);
        assert!(doc.listeners().is_empty());
        assert_eq!(doc.attribute(doc.body().unwrap(), "class"), None);
        assert_eq!(doc.focused(), None);
    }
}
