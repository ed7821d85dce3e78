//! # picker
//!
//! Interactive element picker for the section reader.
//!
//! A [`PickerController`] runs at most one [`Session`] against a
//! [`dom::Document`]. The session walks three phases: cursor select (wait
//! for a click), ancestor cycle (step through the elements under that click
//! with the keyboard) and focus expand (pin the chosen element over the
//! viewport). Quitting from any phase puts the document back exactly as it
//! was.
//!
//! The picker never handles raw input itself. The host resolves each event
//! to the listener ids on its dispatch path and passes them to
//! [`PickerController::dispatch`].

mod chain;
mod config;
mod controller;
mod error;
mod focus;
mod journal;
mod machine;
mod overlay;
mod panel;

pub use chain::{AncestorChain, dimensions};
pub use config::{
    ClassNames, HighlightStrategy, KeyAction, KeyBindings, PanelPlacement, PickerConfig,
};
pub use controller::{Launch, PickerController};
pub use error::PickerError;
pub use focus::Expansion;
pub use journal::{Journal, Undo};
pub use machine::{Phase, Session};
pub use overlay::{Highlight, OVERLAY_ID};
pub use panel::{InfoPanel, PANEL_ID, Slot};
