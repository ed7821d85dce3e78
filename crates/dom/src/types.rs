use std::fmt;

pub type NodeId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

impl Id {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// CSS `position` as the host layout resolved it for an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" => Some(Position::Static),
            "relative" | "sticky" => Some(Position::Relative),
            "absolute" => Some(Position::Absolute),
            "fixed" => Some(Position::Fixed),
            _ => None,
        }
    }

    /// Positioned elements act as offset parents for their descendants.
    pub fn is_positioned(self) -> bool {
        !matches!(self, Position::Static)
    }
}

/// Geometry snapshot of one element, in CSS px.
///
/// `offset_top`/`offset_left` are relative to the element's offset parent,
/// exactly like `HTMLElement.offsetTop`. `width`/`height` describe the border
/// box, `client_*` the padding box, and `scroll_*` how far the element's own
/// content is scrolled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxGeometry {
    pub offset_top: f32,
    pub offset_left: f32,
    pub width: f32,
    pub height: f32,
    pub client_width: f32,
    pub client_height: f32,
    pub scroll_top: f32,
    pub scroll_left: f32,
}

impl BoxGeometry {
    pub fn new(offset_left: f32, offset_top: f32, width: f32, height: f32) -> Self {
        Self {
            offset_top,
            offset_left,
            width,
            height,
            client_width: width,
            client_height: height,
            scroll_top: 0.0,
            scroll_left: 0.0,
        }
    }

    pub fn with_client(mut self, client_width: f32, client_height: f32) -> Self {
        self.client_width = client_width;
        self.client_height = client_height;
        self
    }

    pub fn with_scroll(mut self, scroll_left: f32, scroll_top: f32) -> Self {
        self.scroll_left = scroll_left;
        self.scroll_top = scroll_top;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ElementData {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub position: Position,
    pub geometry: BoxGeometry,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    MissingNode(Id),
    NotAnElement(Id),
    InvalidParent(Id),
    CycleDetected { parent: Id, child: Id },
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::MissingNode(id) => write!(f, "node {} is not in the document", id.0),
            DomError::NotAnElement(id) => write!(f, "node {} is not an element", id.0),
            DomError::InvalidParent(id) => write!(f, "node {} cannot take this child", id.0),
            DomError::CycleDetected { parent, child } => write!(
                f,
                "appending node {} under node {} would create a cycle",
                child.0, parent.0
            ),
        }
    }
}

impl std::error::Error for DomError {}
