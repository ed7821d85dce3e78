use crate::config::PickerConfig;
use crate::error::PickerError;
use crate::machine::{Phase, Session};
use dom::{Document, InputEvent, ListenerId};

/// Result of asking a tab to start the picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Launch {
    Started,
    /// A session was already running; nothing was changed.
    AlreadyRunning,
}

/// Owns at most one [`Session`] per document and routes dispatched listener
/// ids to it.
#[derive(Debug)]
pub struct PickerController {
    config: PickerConfig,
    running: bool,
    session: Option<Session>,
}

impl PickerController {
    pub fn new(config: PickerConfig) -> Self {
        Self {
            config,
            running: false,
            session: None,
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Re-entrancy guard: set before the first listener of a session is
    /// attached, cleared once the session has fully torn down.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.session.as_ref().map(Session::phase)
    }

    pub fn launch(&mut self, doc: &mut Document) -> Result<Launch, PickerError> {
        if self.running {
            log::warn!(target: "picker", "launch rejected: a session is already running");
            return Ok(Launch::AlreadyRunning);
        }
        self.running = true;
        match Session::start(doc, self.config.clone()) {
            Ok(session) => {
                self.session = Some(session);
                Ok(Launch::Started)
            }
            Err(err) => {
                self.running = false;
                Err(err)
            }
        }
    }

    /// Deliver `event` to the session's listeners among `path`, in order.
    ///
    /// `path` is a snapshot taken before delivery. A listener the session
    /// detaches while handling an earlier entry is skipped, and one it
    /// attaches is not in the snapshot. A handler error ends the session.
    pub fn dispatch(&mut self, doc: &mut Document, path: &[ListenerId], event: &InputEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for &listener in path {
            if !session.handles(listener) {
                continue;
            }
            if let Err(err) = session.handle(doc, listener, event) {
                log::warn!(target: "picker", "ending session after error: {err}");
                session.quit(doc);
            }
            if session.phase() == Phase::Terminated {
                break;
            }
        }
        self.reap();
    }

    pub fn quit(&mut self, doc: &mut Document) -> Result<(), PickerError> {
        let session = self.session.as_mut().ok_or(PickerError::NoSession)?;
        session.quit(doc);
        self.reap();
        Ok(())
    }

    fn reap(&mut self) {
        if self.phase() == Some(Phase::Terminated) {
            self.session = None;
            self.running = false;
        }
    }
}

impl Default for PickerController {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}
