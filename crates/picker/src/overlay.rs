use crate::config::HighlightStrategy;
use crate::journal::Journal;
use dom::{Document, DomError, Id};
use layout::{Rectangle, document_rect, offset_parent};

pub const OVERLAY_ID: &str = "section-reader-highlight";

/// Marks the element currently considered by the picker.
///
/// With [`HighlightStrategy::Overlay`] a box is laid over the target, sized
/// to its document rect. With [`HighlightStrategy::Outline`] the highlight
/// class goes on the target itself. Either way [`Highlight::hide`] leaves the
/// document as it found it.
#[derive(Debug)]
pub struct Highlight {
    strategy: HighlightStrategy,
    class_name: String,
    overlay: Option<Id>,
    target: Option<Id>,
    journal: Journal,
}

impl Highlight {
    pub fn new(strategy: HighlightStrategy, class_name: &str) -> Self {
        Self {
            strategy,
            class_name: class_name.to_string(),
            overlay: None,
            target: None,
            journal: Journal::new(),
        }
    }

    pub fn target(&self) -> Option<Id> {
        self.target
    }

    pub fn overlay(&self) -> Option<Id> {
        self.overlay
    }

    pub fn show_at(&mut self, doc: &mut Document, target: Id) -> Result<(), DomError> {
        if self.target.is_some() {
            return self.move_to(doc, target);
        }
        match self.strategy {
            HighlightStrategy::Overlay => {
                let parent = doc.body().unwrap_or(doc.root());
                let node = doc.create_element("div");
                doc.set_attribute(node, "id", OVERLAY_ID)?;
                doc.set_attribute(node, "class", &self.class_name)?;
                self.journal.append_child(doc, parent, node)?;
                self.overlay = Some(node);
                self.target = Some(target);
                self.sync(doc)
            }
            HighlightStrategy::Outline => {
                self.journal.add_class(doc, target, &self.class_name)?;
                self.target = Some(target);
                Ok(())
            }
        }
    }

    pub fn move_to(&mut self, doc: &mut Document, target: Id) -> Result<(), DomError> {
        let Some(current) = self.target else {
            return self.show_at(doc, target);
        };
        match self.strategy {
            HighlightStrategy::Overlay => {
                self.target = Some(target);
                self.sync(doc)
            }
            HighlightStrategy::Outline => {
                if current != target {
                    self.journal.rollback(doc)?;
                    self.target = None;
                    self.journal.add_class(doc, target, &self.class_name)?;
                    self.target = Some(target);
                }
                Ok(())
            }
        }
    }

    /// Re-measure the target and move the overlay box onto it.
    pub fn sync(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let (Some(node), Some(target)) = (self.overlay, self.target) else {
            return Ok(());
        };
        let rect = document_rect(doc, target).unwrap_or_default();
        let origin = offset_parent(doc, node)
            .and_then(|p| document_rect(doc, p))
            .unwrap_or_default();
        doc.set_attribute(node, "style", &overlay_style(rect, origin))
    }

    pub fn hide(&mut self, doc: &mut Document) -> Result<(), DomError> {
        self.overlay = None;
        self.target = None;
        self.journal.rollback(doc)
    }
}

fn overlay_style(rect: Rectangle, origin: Rectangle) -> String {
    format!(
        "position: absolute; top: {}px; left: {}px; width: {}px; height: {}px; pointer-events: none;",
        rect.y - origin.y,
        rect.x - origin.x,
        rect.width,
        rect.height,
    )
}
