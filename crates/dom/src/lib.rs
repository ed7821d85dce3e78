//! # dom
//!
//! The document the picker works on: an arena of element and text nodes with
//! attributes, a host-provided geometry snapshot per element, a scrollable
//! viewport, focus, and a registry of attached event listeners.
//!
//! Nothing here knows about the picker. Class and inline-style edits are plain
//! attribute rewrites so callers can snapshot and restore them exactly.

pub mod attrs;
pub mod events;
pub mod outline;
#[cfg(any(test, feature = "test-harness"))]
pub mod test_utils;

mod document;
mod types;

pub use crate::document::Document;
pub use crate::events::{EventKind, EventTarget, InputEvent, ListenerId, Listeners};
pub use crate::outline::outline;
pub use crate::types::{BoxGeometry, DomError, ElementData, Id, NodeId, Position, Viewport};
