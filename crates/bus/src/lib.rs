use core_types::{RequestId, TabId};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCommand {
    // Menu -> content script
    /// Ask whether the tab already has the picker stylesheet, claiming it if
    /// not.
    SectionReaderSelect {
        tab_id: TabId,
        request_id: RequestId,
    },
    // Tab -> content script
    /// The tab loaded a new document; its stylesheet is gone.
    Navigated { tab_id: TabId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    // Content script -> menu
    SelectAck {
        tab_id: TabId,
        request_id: RequestId,
        already_injected: bool,
    },
}

pub struct Bus {
    pub cmd_tx: Sender<ContentCommand>,
    pub evt_rx: Receiver<ContentEvent>,
    pub evt_tx: Sender<ContentEvent>, // shareable for runtimes
}

impl Bus {
    /// Channels for one content runtime. The command receiver goes to the
    /// runtime thread along with a clone of `evt_tx`; whoever keeps the bus
    /// should drop the original so `evt_rx` disconnects with the runtime.
    pub fn new() -> (Self, Receiver<ContentCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (evt_tx, evt_rx) = mpsc::channel();
        (
            Self {
                cmd_tx,
                evt_rx,
                evt_tx,
            },
            cmd_rx,
        )
    }
}
