//! Box resolution over a [`dom::Document`] geometry snapshot.
//!
//! The host lays pages out; this crate answers the questions the picker asks
//! of that layout: where is an element relative to the document and to the
//! viewport once inline overrides apply, which elements sit under a point,
//! and how to bring an element into view.

mod boxes;
mod scroll;
mod values;

pub use boxes::{
    Rectangle, UsedBox, client_rect, document_rect, offset_parent, used_box, used_position,
};
pub use hit_test::{hit_target, resolve_chain_at};
pub use scroll::scroll_into_view;
pub use values::{Length, parse_inset, parse_length};
