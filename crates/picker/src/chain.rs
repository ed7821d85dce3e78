use crate::error::PickerError;
use core_types::Point;
use dom::{Document, Id};

/// Elements under the confirming click, innermost first, with the element
/// currently being considered.
///
/// Never empty, and `active` is always a valid index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AncestorChain {
    elements: Vec<Id>,
    active: usize,
}

impl AncestorChain {
    pub fn new(elements: Vec<Id>) -> Result<Self, PickerError> {
        if elements.is_empty() {
            return Err(PickerError::EmptyChain);
        }
        Ok(Self {
            elements,
            active: 0,
        })
    }

    /// Resolve the elements at `point`, stopping at `<body>`. Subtrees for
    /// which `skip` holds are ignored.
    pub fn capture(
        doc: &Document,
        point: Point,
        skip: impl Fn(Id) -> bool,
    ) -> Result<Self, PickerError> {
        let html = doc.document_element();
        let mut elements = layout::resolve_chain_at(doc, point, skip);
        elements.retain(|id| Some(*id) != html);
        Self::new(elements)
    }

    pub fn elements(&self) -> &[Id] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Id {
        self.elements[self.active]
    }

    /// Step outward, wrapping from the outermost back to the innermost.
    pub fn next(&mut self) -> Id {
        self.active = (self.active + 1) % self.elements.len();
        self.active()
    }

    /// Step inward, wrapping from the innermost to the outermost.
    pub fn previous(&mut self) -> Id {
        self.active = (self.active + self.elements.len() - 1) % self.elements.len();
        self.active()
    }

    /// The active element and everything enclosing it, outermost last.
    pub fn enclosing(&self) -> &[Id] {
        &self.elements[self.active..]
    }

    /// Tag names from the innermost element to the active one, dot joined.
    /// Past `max_segments`, the innermost names are replaced by `…`.
    pub fn breadcrumb(&self, doc: &Document, max_segments: usize) -> String {
        let names: Vec<&str> = self.elements[..=self.active]
            .iter()
            .map(|id| doc.tag_name(*id).unwrap_or("?"))
            .collect();
        let keep = max_segments.max(1);
        if names.len() <= keep {
            return names.join(".");
        }
        format!("…{}", names[names.len() - keep..].join("."))
    }
}

/// Client box of `id` as `W × H`.
pub fn dimensions(doc: &Document, id: Id) -> String {
    let (w, h) = doc
        .geometry(id)
        .map(|g| (g.client_width, g.client_height))
        .unwrap_or_default();
    format!("{w} \u{00D7} {h}")
}
