//! Headless browser shell hosting the section reader.
//!
//! A [`Tab`] owns one document, the stylesheets injected into it and the
//! picker running against it, and turns raw input into listener dispatch.
//! The [`Shell`] holds the tabs and plays the extension menu: it asks the
//! content runtime whether the active tab already has the picker stylesheet,
//! injects it if not, and launches the picker.

pub mod shell;
pub mod tab;

pub use shell::{HANDSHAKE_TIMEOUT, PICKER_STYLESHEET, Shell, ShellError};
pub use tab::Tab;
