use bus::{ContentCommand, ContentEvent};
use core_types::TabId;
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Injection guards, one per tab: whether the picker stylesheet is already
/// applied to the tab's current document.
#[derive(Debug, Default)]
struct Guards {
    injected: HashMap<TabId, bool>,
}

impl Guards {
    /// Report the current state and mark the tab injected.
    fn claim(&mut self, tab_id: TabId) -> bool {
        std::mem::replace(self.injected.entry(tab_id).or_insert(false), true)
    }

    fn reset(&mut self, tab_id: TabId) {
        self.injected.remove(&tab_id);
    }
}

/// Answer stylesheet handshakes until every command sender is dropped.
pub fn start_content_runtime(
    cmd_rx: Receiver<ContentCommand>,
    evt_tx: Sender<ContentEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut guards = Guards::default();

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ContentCommand::SectionReaderSelect { tab_id, request_id } => {
                    let already_injected = guards.claim(tab_id);
                    log::debug!(
                        target: "runtime_content",
                        "tab {tab_id}: select request {request_id}, injected={already_injected}"
                    );
                    let ack = ContentEvent::SelectAck {
                        tab_id,
                        request_id,
                        already_injected,
                    };
                    if evt_tx.send(ack).is_err() {
                        break;
                    }
                }
                ContentCommand::Navigated { tab_id } => guards.reset(tab_id),
            }
        }
    })
}
