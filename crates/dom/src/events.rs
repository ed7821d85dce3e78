use crate::Id;
use core_types::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Where a listener is attached. `Window` sits above `Document` in the
/// bubbling path, which sits above every node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventTarget {
    Window,
    Document,
    Node(Id),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Click,
    KeyPress,
    PointerMove,
}

/// Raw input delivered by the host, in delivery order.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Primary button click at a viewport position.
    Click { point: Point },
    /// `code` follows `KeyboardEvent.code` (`"KeyQ"`, `"Enter"`, ...).
    KeyPress { code: String },
    PointerMove { point: Point },
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Click { .. } => EventKind::Click,
            InputEvent::KeyPress { .. } => EventKind::KeyPress,
            InputEvent::PointerMove { .. } => EventKind::PointerMove,
        }
    }

    pub fn key(code: impl Into<String>) -> Self {
        InputEvent::KeyPress { code: code.into() }
    }

    pub fn click(x: f32, y: f32) -> Self {
        InputEvent::Click {
            point: Point::new(x, y),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ListenerRecord {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
}

/// Registry of attached listeners. It only records *that* something listens;
/// what a listener does is owned by whoever attached it.
#[derive(Debug, Default)]
pub struct Listeners {
    records: Vec<ListenerRecord>,
    next_id: u64,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: EventTarget, kind: EventKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.records.push(ListenerRecord { id, target, kind });
        log::trace!(target: "dom.events", "attach {id:?} {kind:?} on {target:?}");
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            log::trace!(target: "dom.events", "detach {id:?}");
        }
        removed
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count_on(&self, target: EventTarget) -> usize {
        self.records.iter().filter(|r| r.target == target).count()
    }

    pub(crate) fn on_target(
        &self,
        target: EventTarget,
        kind: EventKind,
    ) -> impl Iterator<Item = ListenerId> + '_ {
        self.records
            .iter()
            .filter(move |r| r.target == target && r.kind == kind)
            .map(|r| r.id)
    }

    pub(crate) fn drop_node_targets(&mut self, mut is_gone: impl FnMut(Id) -> bool) {
        self.records.retain(|r| match r.target {
            EventTarget::Node(id) => !is_gone(id),
            _ => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut listeners = Listeners::new();
        let a = listeners.add(EventTarget::Document, EventKind::Click);
        assert!(listeners.remove(a));
        let b = listeners.add(EventTarget::Document, EventKind::Click);
        assert_ne!(a, b);
        assert!(!listeners.contains(a));
        assert!(listeners.contains(b));
    }

    #[test]
    fn removing_twice_reports_false() {
        let mut listeners = Listeners::new();
        let a = listeners.add(EventTarget::Window, EventKind::KeyPress);
        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));
        assert!(listeners.is_empty());
    }
}
