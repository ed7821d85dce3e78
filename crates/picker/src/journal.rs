//! Undo journal for document edits.
//!
//! Every edit goes through a [`Journal`], which records what the edit
//! overwrote before applying it. [`Journal::rollback`] replays the records in
//! reverse and empties the journal, so each snapshot is restored once.

use dom::{Document, DomError, Id};

#[derive(Clone, Debug, PartialEq)]
pub enum Undo {
    /// Whole attribute text before the edit; `None` when it was absent.
    Attribute {
        node: Id,
        name: String,
        previous: Option<String>,
    },
    /// A node this journal attached; undone by removing it.
    Detach { node: Id },
    Focus { previous: Option<Id> },
}

#[derive(Debug, Default)]
pub struct Journal {
    entries: Vec<Undo>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Undo] {
        &self.entries
    }

    fn snapshot(&mut self, doc: &Document, node: Id, name: &str) -> Result<(), DomError> {
        if !doc.is_element(node) {
            return Err(if doc.contains(node) {
                DomError::NotAnElement(node)
            } else {
                DomError::MissingNode(node)
            });
        }
        self.entries.push(Undo::Attribute {
            node,
            name: name.to_string(),
            previous: doc.attribute(node, name).map(str::to_owned),
        });
        Ok(())
    }

    pub fn set_attribute(
        &mut self,
        doc: &mut Document,
        node: Id,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.snapshot(doc, node, name)?;
        doc.set_attribute(node, name, value)
    }

    /// Add a class token. Nothing is recorded when the token is already there.
    pub fn add_class(
        &mut self,
        doc: &mut Document,
        node: Id,
        class_name: &str,
    ) -> Result<(), DomError> {
        if doc.has_class(node, class_name) {
            return Ok(());
        }
        self.snapshot(doc, node, "class")?;
        doc.add_class(node, class_name).map(|_| ())
    }

    pub fn set_style_property(
        &mut self,
        doc: &mut Document,
        node: Id,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.snapshot(doc, node, "style")?;
        doc.set_style_property(node, name, value)
    }

    pub fn append_child(
        &mut self,
        doc: &mut Document,
        parent: Id,
        child: Id,
    ) -> Result<(), DomError> {
        doc.append_child(parent, child)?;
        self.entries.push(Undo::Detach { node: child });
        Ok(())
    }

    pub fn focus(&mut self, doc: &mut Document, node: Option<Id>) -> Result<(), DomError> {
        let previous = doc.focused();
        doc.focus(node)?;
        self.entries.push(Undo::Focus { previous });
        Ok(())
    }

    /// Undo everything, newest first. A failing record does not stop the
    /// rest; the first error is returned once all records have been tried.
    pub fn rollback(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let mut first_err = None;
        while let Some(entry) = self.entries.pop() {
            if let Err(err) = undo(doc, &entry) {
                log::warn!(target: "picker", "undo of {entry:?} failed: {err}");
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn undo(doc: &mut Document, entry: &Undo) -> Result<(), DomError> {
    match entry {
        Undo::Attribute {
            node,
            name,
            previous,
        } => doc.reset_attribute(*node, name, previous.as_deref()),
        Undo::Detach { node } => {
            if doc.contains(*node) {
                doc.remove(*node)
            } else {
                Ok(())
            }
        }
        // A previously focused node that has since gone away leaves nothing
        // focused.
        Undo::Focus { previous } => {
            let target = previous.filter(|id| doc.contains(*id));
            doc.focus(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::test_utils::PageBuilder;

    #[test]
    fn rollback_restores_exact_attribute_text() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let div = page.block(page.body(), "div", 0.0, 0.0, 10.0, 10.0);
        page.attr(div, "style", "COLOR:red;;  margin : 0")
            .attr(div, "class", "  a  b ");
        let mut doc = page.build();
        let mut journal = Journal::new();

        journal.set_style_property(&mut doc, div, "position", "fixed").unwrap();
        journal.set_style_property(&mut doc, div, "color", "blue").unwrap();
        journal.add_class(&mut doc, div, "c").unwrap();
        assert_eq!(doc.style_property(div, "position").as_deref(), Some("fixed"));

        journal.rollback(&mut doc).unwrap();
        assert!(journal.is_empty());
        assert_eq!(doc.attribute(div, "style"), Some("COLOR:red;;  margin : 0"));
        assert_eq!(doc.attribute(div, "class"), Some("  a  b "));
    }

    #[test]
    fn absent_attribute_comes_back_absent() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let div = page.block(page.body(), "div", 0.0, 0.0, 10.0, 10.0);
        let mut doc = page.build();
        let mut journal = Journal::new();

        journal.add_class(&mut doc, div, "x").unwrap();
        journal.add_class(&mut doc, div, "x").unwrap();
        assert_eq!(journal.len(), 1);
        journal.rollback(&mut doc).unwrap();
        assert_eq!(doc.attribute(div, "class"), None);
    }

    #[test]
    fn detach_and_focus_are_undone() {
        let page = PageBuilder::new(800.0, 600.0);
        let mut doc = page.build();
        let body = doc.body().unwrap();
        let mut journal = Journal::new();

        let node = doc.create_element("div");
        journal.append_child(&mut doc, body, node).unwrap();
        journal.focus(&mut doc, Some(node)).unwrap();
        assert_eq!(doc.focused(), Some(node));

        journal.rollback(&mut doc).unwrap();
        assert!(!doc.contains(node));
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn rollback_continues_past_failures() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let gone = page.block(page.body(), "p", 0.0, 0.0, 10.0, 10.0);
        let kept = page.block(page.body(), "p", 0.0, 0.0, 10.0, 10.0);
        let mut doc = page.build();
        let mut journal = Journal::new();

        journal.add_class(&mut doc, kept, "k").unwrap();
        journal.add_class(&mut doc, gone, "g").unwrap();
        doc.remove(gone).unwrap();

        assert_eq!(
            journal.rollback(&mut doc),
            Err(DomError::MissingNode(gone))
        );
        assert_eq!(doc.attribute(kept, "class"), None);
    }
}
