use crate::config::ClassNames;
use crate::error::PickerError;
use crate::journal::Journal;
use dom::{Document, DomError, Id};

/// The reading view: the chosen element pinned over the whole viewport.
#[derive(Debug)]
pub struct Expansion {
    element: Id,
    background_synthesized: bool,
    journal: Journal,
}

impl Expansion {
    /// Pin `enclosing[0]` to the viewport.
    ///
    /// `enclosing` is the element followed by its ancestors up to `<body>`.
    /// Each of them gets the z-index class so the element paints above the
    /// rest of the page. If a step fails, the steps already taken are undone
    /// before the error is returned.
    pub fn expand(
        doc: &mut Document,
        enclosing: &[Id],
        classes: &ClassNames,
        fallback_background: &str,
    ) -> Result<Self, PickerError> {
        let Some(&element) = enclosing.first() else {
            return Err(PickerError::EmptyChain);
        };
        let mut expansion = Self {
            element,
            background_synthesized: false,
            journal: Journal::new(),
        };
        if let Err(err) = expansion.apply(doc, enclosing, classes, fallback_background) {
            let _ = expansion.journal.rollback(doc);
            return Err(err.into());
        }
        Ok(expansion)
    }

    fn apply(
        &mut self,
        doc: &mut Document,
        enclosing: &[Id],
        classes: &ClassNames,
        fallback_background: &str,
    ) -> Result<(), DomError> {
        let journal = &mut self.journal;
        if let Some(body) = doc.body() {
            journal.add_class(doc, body, &classes.overflow_hidden)?;
        }
        for id in enclosing.iter().rev() {
            journal.add_class(doc, *id, &classes.z_index_max)?;
        }

        let element = self.element;
        journal.set_style_property(doc, element, "position", "fixed")?;
        journal.set_style_property(doc, element, "inset", "0")?;
        journal.set_style_property(doc, element, "overflow", "auto")?;
        journal.add_class(doc, element, &classes.focus_section)?;

        let has_background = ["background", "background-color"]
            .iter()
            .any(|name| doc.style_property(element, name).is_some());
        if !has_background {
            journal.set_style_property(doc, element, "background", fallback_background)?;
            self.background_synthesized = true;
        }

        journal.focus(doc, Some(element))
    }

    pub fn element(&self) -> Id {
        self.element
    }

    /// Whether the element had no inline background and was given the
    /// fallback one.
    pub fn background_synthesized(&self) -> bool {
        self.background_synthesized
    }

    /// Put back every attribute and the focus exactly as they were before
    /// [`Expansion::expand`].
    pub fn restore(mut self, doc: &mut Document) -> Result<(), DomError> {
        log::debug!(
            target: "picker",
            "restoring {:?} (synthesized background: {})",
            self.element,
            self.background_synthesized
        );
        self.journal.rollback(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Point;
    use dom::test_utils::PageBuilder;
    use layout::Rectangle;

    #[test]
    fn expand_then_restore_round_trips() {
        let mut page = PageBuilder::new(1024.0, 768.0);
        let outer = page.block(page.body(), "main", 0.0, 0.0, 1024.0, 2000.0);
        page.attr(outer, "class", "layout");
        let target = page.block(outer, "article", 100.0, 400.0, 600.0, 300.0);
        page.attr(target, "style", "margin: 0 auto;background-color:#fafafa");
        let mut doc = page.build();
        let body = doc.body().unwrap();
        let classes = ClassNames::default();

        let expansion =
            Expansion::expand(&mut doc, &[target, outer, body], &classes, "white").unwrap();
        assert!(!expansion.background_synthesized());
        assert!(doc.has_class(body, &classes.overflow_hidden));
        assert!(doc.has_class(body, &classes.z_index_max));
        assert!(doc.has_class(outer, &classes.z_index_max));
        assert!(doc.has_class(target, &classes.focus_section));
        assert_eq!(doc.focused(), Some(target));
        assert_eq!(
            layout::client_rect(&doc, target),
            Some(Rectangle::new(0.0, 0.0, 1024.0, 768.0))
        );
        assert_eq!(layout::hit_target(&doc, Point::new(5.0, 5.0)), Some(target));

        expansion.restore(&mut doc).unwrap();
        assert_eq!(doc.attribute(body, "class"), None);
        assert_eq!(doc.attribute(outer, "class"), Some("layout"));
        assert_eq!(doc.attribute(target, "class"), None);
        assert_eq!(
            doc.attribute(target, "style"),
            Some("margin: 0 auto;background-color:#fafafa")
        );
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn fallback_background_only_when_missing() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let target = page.block(page.body(), "div", 0.0, 0.0, 100.0, 100.0);
        let mut doc = page.build();

        let expansion =
            Expansion::expand(&mut doc, &[target], &ClassNames::default(), "ivory").unwrap();
        assert!(expansion.background_synthesized());
        assert_eq!(doc.style_property(target, "background").as_deref(), Some("ivory"));
        expansion.restore(&mut doc).unwrap();
        assert_eq!(doc.attribute(target, "style"), None);
    }
}
