//! Scenario files: a page fixture, picker settings and scripted input.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use dom::{BoxGeometry, Document, DomError, Id, InputEvent, Position, Viewport};
use picker::PickerConfig;
use serde::Deserialize;

#[derive(Debug)]
pub enum ScenarioError {
    Io { path: PathBuf, err: std::io::Error },
    Parse(toml::de::Error),
    DuplicateKey(String),
    UnknownParent { key: String, parent: String },
    UnknownPosition { key: String, value: String },
    Step { index: usize, reason: &'static str },
    Dom(DomError),
    Shell(browser::ShellError),
    Output(std::io::Error),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io { path, err } => write!(f, "cannot read {}: {err}", path.display()),
            ScenarioError::Parse(err) => write!(f, "invalid scenario: {err}"),
            ScenarioError::DuplicateKey(key) => write!(f, "element key `{key}` is used twice"),
            ScenarioError::UnknownParent { key, parent } => {
                write!(f, "element `{key}` names unknown parent `{parent}`")
            }
            ScenarioError::UnknownPosition { key, value } => {
                write!(f, "element `{key}` has unknown position `{value}`")
            }
            ScenarioError::Step { index, reason } => write!(f, "step {index}: {reason}"),
            ScenarioError::Dom(err) => write!(f, "building the page failed: {err}"),
            ScenarioError::Shell(err) => write!(f, "{err}"),
            ScenarioError::Output(err) => write!(f, "cannot write report: {err}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io { err, .. } | ScenarioError::Output(err) => Some(err),
            ScenarioError::Parse(err) => Some(err),
            ScenarioError::Dom(err) => Some(err),
            ScenarioError::Shell(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for ScenarioError {
    fn from(err: DomError) -> Self {
        ScenarioError::Dom(err)
    }
}

impl From<browser::ShellError> for ScenarioError {
    fn from(err: browser::ShellError) -> Self {
        ScenarioError::Shell(err)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportSpec {
    pub width: f32,
    pub height: f32,
    /// Height of `<html>` and `<body>`; the viewport height when absent.
    pub document_height: Option<f32>,
    pub scroll: [f32; 2],
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            document_height: None,
            scroll: [0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    pub key: String,
    /// Key of an earlier element, or `html` / `body`. Defaults to `body`.
    pub parent: Option<String>,
    pub tag: String,
    pub id: Option<String>,
    pub class: Option<String>,
    pub style: Option<String>,
    pub position: Option<String>,
    /// `[offset_left, offset_top, width, height]`.
    pub rect: [f32; 4],
    pub client: Option<[f32; 2]>,
    /// `[scroll_left, scroll_top]`.
    pub scroll: Option<[f32; 2]>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepSpec {
    pub launch: bool,
    pub navigate: bool,
    pub click: Option<[f32; 2]>,
    #[serde(rename = "move")]
    pub pointer_move: Option<[f32; 2]>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Launch,
    Navigate,
    Input(InputEvent),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Launch => write!(f, "launch"),
            Step::Navigate => write!(f, "navigate"),
            Step::Input(InputEvent::Click { point }) => write!(f, "click {} {}", point.x, point.y),
            Step::Input(InputEvent::PointerMove { point }) => {
                write!(f, "move {} {}", point.x, point.y)
            }
            Step::Input(InputEvent::KeyPress { code }) => write!(f, "key {code}"),
        }
    }
}

impl StepSpec {
    fn resolve(&self, index: usize) -> Result<Step, ScenarioError> {
        let mut found = Vec::new();
        if self.launch {
            found.push(Step::Launch);
        }
        if self.navigate {
            found.push(Step::Navigate);
        }
        if let Some([x, y]) = self.click {
            found.push(Step::Input(InputEvent::click(x, y)));
        }
        if let Some([x, y]) = self.pointer_move {
            found.push(Step::Input(InputEvent::PointerMove {
                point: core_types::Point::new(x, y),
            }));
        }
        if let Some(code) = &self.key {
            found.push(Step::Input(InputEvent::key(code.clone())));
        }
        match found.len() {
            0 => Err(ScenarioError::Step {
                index,
                reason: "no action given",
            }),
            1 => Ok(found.remove(0)),
            _ => Err(ScenarioError::Step {
                index,
                reason: "more than one action given",
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub viewport: ViewportSpec,
    pub picker: PickerConfig,
    #[serde(rename = "element")]
    pub elements: Vec<ElementSpec>,
    #[serde(rename = "step")]
    pub steps: Vec<StepSpec>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|err| ScenarioError::Io {
            path: path.to_path_buf(),
            err,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        toml::from_str(text).map_err(ScenarioError::Parse)
    }

    pub fn steps(&self) -> Result<Vec<Step>, ScenarioError> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, spec)| spec.resolve(i + 1))
            .collect()
    }

    /// Build a fresh document from the element list.
    pub fn build_document(&self) -> Result<Document, ScenarioError> {
        let vp = &self.viewport;
        let mut doc = Document::new(Viewport {
            width: vp.width,
            height: vp.height,
            scroll_x: vp.scroll[0],
            scroll_y: vp.scroll[1],
        });
        let page_height = vp.document_height.unwrap_or(vp.height);
        let root = doc.root();
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        doc.append_child(root, html)?;
        doc.append_child(html, body)?;
        for id in [html, body] {
            doc.set_geometry(id, BoxGeometry::new(0.0, 0.0, vp.width, page_height))?;
        }

        let mut keys: HashMap<&str, Id> = HashMap::from([("html", html), ("body", body)]);
        for spec in &self.elements {
            if keys.contains_key(spec.key.as_str()) {
                return Err(ScenarioError::DuplicateKey(spec.key.clone()));
            }
            let parent_key = spec.parent.as_deref().unwrap_or("body");
            let parent = *keys
                .get(parent_key)
                .ok_or_else(|| ScenarioError::UnknownParent {
                    key: spec.key.clone(),
                    parent: parent_key.to_string(),
                })?;
            let id = build_element(&mut doc, spec)?;
            doc.append_child(parent, id)?;
            keys.insert(&spec.key, id);
        }
        Ok(doc)
    }
}

fn build_element(doc: &mut Document, spec: &ElementSpec) -> Result<Id, ScenarioError> {
    let id = doc.create_element(&spec.tag);
    for (name, value) in [("id", &spec.id), ("class", &spec.class), ("style", &spec.style)] {
        if let Some(value) = value {
            doc.set_attribute(id, name, value)?;
        }
    }
    if let Some(value) = &spec.position {
        let position = Position::parse(value).ok_or_else(|| ScenarioError::UnknownPosition {
            key: spec.key.clone(),
            value: value.clone(),
        })?;
        doc.set_position(id, position)?;
    }

    let [x, y, w, h] = spec.rect;
    let mut geometry = BoxGeometry::new(x, y, w, h);
    if let Some([cw, ch]) = spec.client {
        geometry = geometry.with_client(cw, ch);
    }
    if let Some([left, top]) = spec.scroll {
        geometry = geometry.with_scroll(left, top);
    }
    doc.set_geometry(id, geometry)?;

    if let Some(text) = &spec.text {
        let node = doc.create_text(text);
        doc.append_child(id, node)?;
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_elements_by_key() {
        let scenario = Scenario::parse(
            r#"
            [viewport]
            width = 800
            height = 600

            [[element]]
            key = "wrap"
            tag = "DIV"
            class = "article"
            position = "relative"
            rect = [0, 50, 800, 400]
            scroll = [0, 30]

            [[element]]
            key = "para"
            parent = "wrap"
            tag = "p"
            rect = [10, 10, 300, 40]
            text = "hello"
            "#,
        )
        .unwrap();
        let doc = scenario.build_document().unwrap();

        let body = doc.body().unwrap();
        let wrap = doc.children(body)[0];
        assert_eq!(doc.tag_name(wrap), Some("div"));
        assert_eq!(doc.base_position(wrap), Position::Relative);
        assert_eq!(doc.geometry(wrap).unwrap().scroll_top, 30.0);
        let para = doc.children(wrap)[0];
        assert_eq!(doc.text_content(para), "hello");
    }

    #[test]
    fn bad_references_are_reported() {
        let scenario = Scenario::parse(
            r#"
            [[element]]
            key = "a"
            parent = "nope"
            tag = "div"
            rect = [0, 0, 1, 1]
            "#,
        )
        .unwrap();
        assert!(matches!(
            scenario.build_document(),
            Err(ScenarioError::UnknownParent { .. })
        ));

        let scenario = Scenario::parse(
            r#"
            [[element]]
            key = "body"
            tag = "div"
            rect = [0, 0, 1, 1]
            "#,
        )
        .unwrap();
        assert!(matches!(
            scenario.build_document(),
            Err(ScenarioError::DuplicateKey(key)) if key == "body"
        ));
    }

    #[test]
    fn steps_need_exactly_one_action() {
        let scenario = Scenario::parse(
            r#"
            [[step]]
            launch = true
            [[step]]
            key = "KeyX"
            [[step]]
            click = [1, 2]
            key = "KeyC"
            "#,
        )
        .unwrap();
        assert!(matches!(
            scenario.steps(),
            Err(ScenarioError::Step { index: 3, .. })
        ));
        assert_eq!(
            scenario.steps[1].resolve(2).unwrap(),
            Step::Input(InputEvent::key("KeyX"))
        );
    }
}
