use std::fmt;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use bus::{Bus, ContentCommand, ContentEvent};
use core_types::{RequestId, TabId};
use dom::Document;
use picker::{Launch, PickerConfig, PickerError};

use crate::tab::Tab;

/// Stylesheet carrying the picker's classes.
pub const PICKER_STYLESHEET: &str = "css/inject.css";

pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// No content runtime is listening.
    Disconnected,
    /// The content runtime did not answer in time.
    Timeout,
    Picker(PickerError),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Disconnected => write!(f, "content runtime is not connected"),
            ShellError::Timeout => write!(f, "content runtime did not answer"),
            ShellError::Picker(err) => write!(f, "picker failed to start: {err}"),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Picker(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PickerError> for ShellError {
    fn from(err: PickerError) -> Self {
        ShellError::Picker(err)
    }
}

/// The shell's half of a [`Bus`]. Holding no event sender of its own, it sees
/// the receiver disconnect as soon as the runtime thread is gone.
struct RuntimeLink {
    cmd_tx: Sender<ContentCommand>,
    evt_rx: Receiver<ContentEvent>,
}

pub struct Shell {
    tabs: Vec<Tab>,
    active: usize,

    link: Option<RuntimeLink>,
    handshake_timeout: Duration,

    config: PickerConfig,
    next_tab_id: TabId,
    next_request_id: RequestId,
}

impl Shell {
    /// A shell with one tab showing `document`.
    pub fn new(document: Document, config: PickerConfig) -> Self {
        let mut s = Self {
            tabs: Vec::new(),
            active: 0,
            link: None,
            handshake_timeout: HANDSHAKE_TIMEOUT,
            config,
            next_tab_id: 1,
            next_request_id: 1,
        };
        s.add_tab(document);
        s
    }

    fn alloc_tab_id(&mut self) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id = self.next_tab_id.wrapping_add(1);
        id
    }

    fn alloc_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        id
    }

    /// Talk to a content runtime over `bus`. The runtime must already hold
    /// its clone of `bus.evt_tx`; the shell drops its own.
    pub fn connect(&mut self, bus: Bus) {
        let Bus { cmd_tx, evt_rx, .. } = bus;
        for t in &mut self.tabs {
            t.set_bus_sender(cmd_tx.clone());
        }
        self.link = Some(RuntimeLink { cmd_tx, evt_rx });
    }

    pub fn set_handshake_timeout(&mut self, timeout: Duration) {
        self.handshake_timeout = timeout;
    }

    /// Open `document` in a new tab and make it active.
    pub fn add_tab(&mut self, document: Document) -> TabId {
        let id = self.alloc_tab_id();
        let mut t = Tab::new(id, document, self.config.clone());

        if let Some(link) = &self.link {
            t.set_bus_sender(link.cmd_tx.clone());
        }
        self.tabs.push(t);
        self.active = self.tabs.len() - 1;
        id
    }

    pub fn switch_to(&mut self, tab_id: TabId) -> bool {
        match self.tabs.iter().position(|t| t.tab_id == tab_id) {
            Some(idx) => {
                self.active = idx;
                true
            }
            None => false,
        }
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active]
    }

    pub fn active_tab_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.active]
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.tab_id == tab_id)
    }

    /// The menu's "select" button: make sure the active tab has the picker
    /// stylesheet, then launch the picker on it.
    ///
    /// If the content runtime cannot be reached the stylesheet is injected
    /// anyway, as if the tab had never had it.
    pub fn select_section(&mut self) -> Result<Launch, ShellError> {
        let tab_id = self.active_tab().tab_id;
        let already_injected = match self.handshake(tab_id) {
            Ok(injected) => injected,
            Err(err) => {
                log::warn!(target: "browser", "tab {tab_id}: handshake failed: {err}");
                false
            }
        };

        let tab = self.active_tab_mut();
        if !already_injected {
            tab.insert_css(PICKER_STYLESHEET);
        }
        let launch = tab.launch_picker()?;
        if launch == Launch::AlreadyRunning {
            log::warn!(target: "browser", "tab {tab_id}: script injection rejected");
        }
        Ok(launch)
    }

    /// Ask the content runtime whether `tab_id` already has the stylesheet.
    fn handshake(&mut self, tab_id: TabId) -> Result<bool, ShellError> {
        let request_id = self.alloc_request_id();
        let link = self.link.as_ref().ok_or(ShellError::Disconnected)?;
        link.cmd_tx
            .send(ContentCommand::SectionReaderSelect { tab_id, request_id })
            .map_err(|_| ShellError::Disconnected)?;

        let deadline = Instant::now() + self.handshake_timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match link.evt_rx.recv_timeout(left) {
                Ok(ContentEvent::SelectAck {
                    tab_id: t,
                    request_id: r,
                    already_injected,
                }) if t == tab_id && r == request_id => return Ok(already_injected),
                // Late answer to an earlier request.
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => return Err(ShellError::Timeout),
                Err(RecvTimeoutError::Disconnected) => return Err(ShellError::Disconnected),
            }
        }
    }
}
