use crate::config::PanelPlacement;
use crate::journal::Journal;
use dom::{Document, DomError, Id};

pub const PANEL_ID: &str = "sectionReaderFloatingButton";

/// Text slots of the info panel, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Title,
    Selectors,
    Dimensions,
    Help,
    Hover,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Title,
        Slot::Selectors,
        Slot::Dimensions,
        Slot::Help,
        Slot::Hover,
    ];

    fn suffix(self) -> &'static str {
        match self {
            Slot::Title => "Title",
            Slot::Selectors => "Selectors",
            Slot::Dimensions => "Dimensions",
            Slot::Help => "Help",
            Slot::Hover => "Hover",
        }
    }
}

/// The floating panel showing instructions and the current selection.
#[derive(Debug)]
pub struct InfoPanel {
    root: Id,
    slots: [Id; 5],
}

impl InfoPanel {
    /// Build the panel and append it to `<body>`, recording the append in
    /// `journal` so rolling it back removes the panel.
    pub fn mount(
        doc: &mut Document,
        journal: &mut Journal,
        placement: PanelPlacement,
    ) -> Result<Self, DomError> {
        let root = doc.create_element("div");
        doc.set_attribute(root, "id", PANEL_ID)?;
        doc.set_attribute(
            root,
            "style",
            &format!(
                "position: fixed; right: {}px; bottom: {}px; width: {}px; height: {}px;",
                placement.right, placement.bottom, placement.width, placement.height
            ),
        )?;
        let mut slots = [root; 5];
        for (slot, id) in Slot::ALL.iter().zip(slots.iter_mut()) {
            let child = doc.create_element("div");
            doc.set_attribute(child, "id", &format!("{PANEL_ID}{}", slot.suffix()))?;
            doc.append_child(root, child)?;
            *id = child;
        }
        let parent = doc.body().unwrap_or(doc.root());
        journal.append_child(doc, parent, root)?;
        Ok(Self { root, slots })
    }

    pub fn root(&self) -> Id {
        self.root
    }

    pub fn slot(&self, slot: Slot) -> Id {
        self.slots[slot as usize]
    }

    pub fn set(&self, doc: &mut Document, slot: Slot, text: &str) -> Result<(), DomError> {
        doc.set_text_content(self.slot(slot), text)
    }

    pub fn text(&self, doc: &Document, slot: Slot) -> String {
        doc.text_content(self.slot(slot))
    }

    /// Whether `id` is the panel or inside it.
    pub fn contains(&self, doc: &Document, id: Id) -> bool {
        doc.is_inclusive_ancestor(self.root, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Point;
    use dom::test_utils::PageBuilder;

    #[test]
    fn mounted_panel_is_hit_at_its_placement() {
        let mut doc = PageBuilder::new(1000.0, 800.0).build();
        let mut journal = Journal::new();
        let panel = InfoPanel::mount(&mut doc, &mut journal, PanelPlacement::default()).unwrap();

        assert_eq!(doc.element_by_id(PANEL_ID), Some(panel.root()));
        assert_eq!(
            doc.element_by_id("sectionReaderFloatingButtonHover"),
            Some(panel.slot(Slot::Hover))
        );
        assert_eq!(
            layout::hit_target(&doc, Point::new(990.0 - 16.0, 790.0 - 16.0)),
            Some(panel.root())
        );

        panel.set(&mut doc, Slot::Title, "Select Section").unwrap();
        panel.set(&mut doc, Slot::Title, "").unwrap();
        panel.set(&mut doc, Slot::Help, "Press Q to quit.").unwrap();
        assert_eq!(panel.text(&doc, Slot::Title), "");
        assert_eq!(panel.text(&doc, Slot::Help), "Press Q to quit.");

        journal.rollback(&mut doc).unwrap();
        assert_eq!(doc.element_by_id(PANEL_ID), None);
    }
}
