//! Picker configuration.
//!
//! Every field has a default matching the extension's stylesheet and key map,
//! and every struct deserializes with `#[serde(default)]` so a config file
//! only has to name what it overrides.

use serde::Deserialize;

/// `KeyboardEvent.code` values for each action.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub previous: String,
    pub next: String,
    pub confirm: String,
    pub quit: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Previous,
    Next,
    Confirm,
    Quit,
}

impl KeyBindings {
    pub fn action(&self, code: &str) -> Option<KeyAction> {
        [
            (&self.previous, KeyAction::Previous),
            (&self.next, KeyAction::Next),
            (&self.confirm, KeyAction::Confirm),
            (&self.quit, KeyAction::Quit),
        ]
        .into_iter()
        .find(|(bound, _)| bound.as_str() == code)
        .map(|(_, action)| action)
    }

    /// Short label for a bound key, `"KeyQ"` showing as `"Q"`.
    pub fn label(code: &str) -> &str {
        code.strip_prefix("Key").unwrap_or(code)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            previous: "KeyZ".to_string(),
            next: "KeyX".to_string(),
            confirm: "KeyC".to_string(),
            quit: "KeyQ".to_string(),
        }
    }
}

/// Class names toggled on page elements. Their styling lives in the injected
/// stylesheet.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub cursor_select: String,
    pub highlight: String,
    pub z_index_max: String,
    pub overflow_hidden: String,
    pub focus_section: String,
    pub hidden: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            cursor_select: "section-reader-cursor-select".to_string(),
            highlight: "section-reader-highlight".to_string(),
            z_index_max: "section-reader-z-index-max".to_string(),
            overflow_hidden: "section-reader-overflow-hidden".to_string(),
            focus_section: "section-reader-focus-section".to_string(),
            hidden: "section-reader-hidden".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightStrategy {
    /// A separate absolutely positioned box tracking the target.
    #[default]
    Overlay,
    /// The highlight class toggled on the target itself.
    Outline,
}

/// Fixed placement of the info panel, measured from the bottom right corner
/// of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelPlacement {
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for PanelPlacement {
    fn default() -> Self {
        Self {
            right: 16.0,
            bottom: 16.0,
            width: 280.0,
            height: 120.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub keys: KeyBindings,
    pub classes: ClassNames,
    pub highlight: HighlightStrategy,
    /// Breadcrumb segments shown before older ones are elided.
    pub breadcrumb_segments: usize,
    /// Background given to the focused section when it has none inline.
    pub fallback_background: String,
    pub panel: PanelPlacement,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            keys: KeyBindings::default(),
            classes: ClassNames::default(),
            highlight: HighlightStrategy::default(),
            breadcrumb_segments: 5,
            fallback_background: "white".to_string(),
            panel: PanelPlacement::default(),
        }
    }
}
