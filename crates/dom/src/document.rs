use crate::attrs::{has_class_token, parse_declarations, serialize_declarations};
use crate::events::{EventKind, EventTarget, ListenerId, Listeners};
use crate::types::{BoxGeometry, DomError, ElementData, Id, NodeKind, Position, Viewport};

struct NodeRecord {
    kind: NodeKind,
    parent: Option<Id>,
    children: Vec<Id>,
    live: bool,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element(_))
    }
}

/// A live document: node arena, viewport, focus and attached listeners.
///
/// Ids are arena indices and are never reused, so a stale id held across a
/// removal fails with [`DomError::MissingNode`] instead of aliasing.
pub struct Document {
    nodes: Vec<NodeRecord>,
    viewport: Viewport,
    focused: Option<Id>,
    listeners: Listeners,
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            nodes: vec![NodeRecord {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
                live: true,
            }],
            viewport,
            focused: None,
            listeners: Listeners::new(),
        }
    }

    pub fn root(&self) -> Id {
        Id(0)
    }

    /// The `<html>` element, if one has been attached.
    pub fn document_element(&self) -> Option<Id> {
        self.nodes[0]
            .children
            .iter()
            .copied()
            .find(|id| self.element(*id).is_some())
    }

    pub fn body(&self) -> Option<Id> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .copied()
            .find(|id| self.tag_name(*id) == Some("body"))
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    // --- tree ---

    pub fn create_element(&mut self, name: &str) -> Id {
        self.push(NodeKind::Element(ElementData {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
            position: Position::Static,
            geometry: BoxGeometry::default(),
        }))
    }

    pub fn create_text(&mut self, text: &str) -> Id {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> Id {
        let id = Id(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
            live: true,
        });
        id
    }

    pub fn contains(&self, id: Id) -> bool {
        self.nodes.get(id.index()).is_some_and(|n| n.live)
    }

    fn record(&self, id: Id) -> Result<&NodeRecord, DomError> {
        self.nodes
            .get(id.index())
            .filter(|n| n.live)
            .ok_or(DomError::MissingNode(id))
    }

    fn record_mut(&mut self, id: Id) -> Result<&mut NodeRecord, DomError> {
        self.nodes
            .get_mut(id.index())
            .filter(|n| n.live)
            .ok_or(DomError::MissingNode(id))
    }

    pub fn append_child(&mut self, parent: Id, child: Id) -> Result<(), DomError> {
        if parent == child || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        if !self.record(parent)?.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        if self.record(child)?.parent.is_some() {
            return Err(DomError::InvalidParent(child));
        }
        self.record_mut(parent)?.children.push(child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `id` and drop its whole subtree. Listeners targeting removed
    /// nodes go with them, and focus inside the subtree is cleared.
    pub fn remove(&mut self, id: Id) -> Result<(), DomError> {
        if id == self.root() {
            return Err(DomError::InvalidParent(id));
        }
        if let Some(parent) = self.record_mut(id)?.parent.take() {
            if let Ok(record) = self.record_mut(parent) {
                record.children.retain(|c| *c != id);
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let record = &mut self.nodes[current.index()];
            record.live = false;
            stack.extend(record.children.drain(..));
            removed.push(current);
        }

        if self.focused.is_some_and(|f| removed.contains(&f)) {
            self.focused = None;
        }
        self.listeners.drop_node_targets(|n| removed.contains(&n));
        Ok(())
    }

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.record(id).ok().and_then(|r| r.parent)
    }

    pub fn children(&self, id: Id) -> &[Id] {
        self.record(id).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    /// Parent chain of `id`, nearest first, ending at the document node.
    pub fn ancestors(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    pub fn is_inclusive_ancestor(&self, ancestor: Id, node: Id) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    pub fn element_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.live && matches!(n.kind, NodeKind::Element(_)))
            .count()
    }

    // --- element data ---

    pub fn element(&self, id: Id) -> Option<&ElementData> {
        match &self.record(id).ok()?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: Id) -> Result<&mut ElementData, DomError> {
        match &mut self.record_mut(id)?.kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    pub fn is_element(&self, id: Id) -> bool {
        self.element(id).is_some()
    }

    pub fn tag_name(&self, id: Id) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    pub fn text(&self, id: Id) -> Option<&str> {
        match &self.record(id).ok()?.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn attribute(&self, id: Id, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    pub fn set_attribute(&mut self, id: Id, name: &str, value: &str) -> Result<(), DomError> {
        let element = self.element_mut(id)?;
        match element
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value.to_string(),
            None => element
                .attributes
                .push((name.to_ascii_lowercase(), value.to_string())),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: Id, name: &str) -> Result<(), DomError> {
        self.element_mut(id)?
            .attributes
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(())
    }

    /// Restore an attribute to an exact earlier value, `None` meaning absent.
    pub fn reset_attribute(
        &mut self,
        id: Id,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), DomError> {
        match value {
            Some(value) => self.set_attribute(id, name, value),
            None => self.remove_attribute(id, name),
        }
    }

    pub fn element_by_id(&self, id_attr: &str) -> Option<Id> {
        let mut stack = vec![self.root()];
        while let Some(current) = stack.pop() {
            if self.attribute(current, "id") == Some(id_attr) {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        None
    }

    // --- class list ---

    pub fn has_class(&self, id: Id, class_name: &str) -> bool {
        has_class_token(self.attribute(id, "class"), class_name)
    }

    /// Returns `false` when the class was already present.
    pub fn add_class(&mut self, id: Id, class_name: &str) -> Result<bool, DomError> {
        if self.has_class(id, class_name) {
            return Ok(false);
        }
        let next = match self.attribute(id, "class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class_name}"),
            _ => class_name.to_string(),
        };
        self.set_attribute(id, "class", &next)?;
        Ok(true)
    }

    pub fn remove_class(&mut self, id: Id, class_name: &str) -> Result<bool, DomError> {
        if !self.has_class(id, class_name) {
            self.element_mut(id)?;
            return Ok(false);
        }
        let next = self
            .attribute(id, "class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|c| *c != class_name)
            .collect::<Vec<_>>()
            .join(" ");
        if next.is_empty() {
            self.remove_attribute(id, "class")?;
        } else {
            self.set_attribute(id, "class", &next)?;
        }
        Ok(true)
    }

    // --- inline style ---

    pub fn style_text(&self, id: Id) -> Option<&str> {
        self.attribute(id, "style")
    }

    pub fn style_property(&self, id: Id, name: &str) -> Option<String> {
        let style = self.style_text(id)?;
        parse_declarations(style)
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
            .filter(|v| !v.is_empty())
    }

    pub fn set_style_property(&mut self, id: Id, name: &str, value: &str) -> Result<(), DomError> {
        let mut decls = parse_declarations(self.style_text(id).unwrap_or_default());
        let name = name.to_ascii_lowercase();
        match decls.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => decls.push((name, value.to_string())),
        }
        self.set_attribute(id, "style", &serialize_declarations(&decls))
    }

    pub fn remove_style_property(&mut self, id: Id, name: &str) -> Result<(), DomError> {
        let Some(style) = self.style_text(id) else {
            self.element_mut(id)?;
            return Ok(());
        };
        let mut decls = parse_declarations(style);
        decls.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        if decls.is_empty() {
            self.remove_attribute(id, "style")
        } else {
            self.set_attribute(id, "style", &serialize_declarations(&decls))
        }
    }

    // --- geometry ---

    pub fn geometry(&self, id: Id) -> Option<&BoxGeometry> {
        self.element(id).map(|e| &e.geometry)
    }

    pub fn set_geometry(&mut self, id: Id, geometry: BoxGeometry) -> Result<(), DomError> {
        self.element_mut(id)?.geometry = geometry;
        Ok(())
    }

    /// The `position` the host layout computed, before inline overrides.
    pub fn base_position(&self, id: Id) -> Position {
        self.element(id).map(|e| e.position).unwrap_or_default()
    }

    pub fn set_position(&mut self, id: Id, position: Position) -> Result<(), DomError> {
        self.element_mut(id)?.position = position;
        Ok(())
    }

    // --- text ---

    pub fn text_content(&self, id: Id) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(text) = self.text(current) {
                out.push_str(text);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Replace all children of `id` with a single text node. A lone text
    /// child is rewritten in place.
    pub fn set_text_content(&mut self, id: Id, text: &str) -> Result<(), DomError> {
        if !self.record(id)?.allows_children() {
            return Err(DomError::InvalidParent(id));
        }
        let old = self.record(id)?.children.clone();
        if let (false, &[only]) = (text.is_empty(), old.as_slice()) {
            if let NodeKind::Text(current) = &mut self.record_mut(only)?.kind {
                current.clear();
                current.push_str(text);
                return Ok(());
            }
        }
        for child in old {
            self.remove(child)?;
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    // --- focus ---

    pub fn focused(&self) -> Option<Id> {
        self.focused
    }

    pub fn focus(&mut self, id: Option<Id>) -> Result<(), DomError> {
        if let Some(id) = id {
            self.record(id)?;
        }
        self.focused = id;
        Ok(())
    }

    // --- listeners ---

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn add_listener(
        &mut self,
        target: EventTarget,
        kind: EventKind,
    ) -> Result<ListenerId, DomError> {
        if let EventTarget::Node(id) = target {
            self.record(id)?;
        }
        Ok(self.listeners.add(target, kind))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Listener ids that should see an event of `kind` aimed at `target`, in
    /// bubbling order: the target, its ancestors, the document, the window.
    ///
    /// Keyboard events without a target go to the focused node, or the body.
    pub fn dispatch_path(&self, kind: EventKind, target: Option<Id>) -> Vec<ListenerId> {
        let target = target
            .filter(|id| self.contains(*id))
            .or_else(|| match kind {
                EventKind::KeyPress => self.focused.or_else(|| self.body()),
                _ => None,
            });

        let mut out = Vec::new();
        if let Some(target) = target {
            for node in std::iter::once(target).chain(self.ancestors(target)) {
                if node == self.root() {
                    break;
                }
                out.extend(self.listeners.on_target(EventTarget::Node(node), kind));
            }
        }
        out.extend(self.listeners.on_target(EventTarget::Document, kind));
        out.extend(self.listeners.on_target(EventTarget::Window, kind));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::PageBuilder;

    #[test]
    fn set_text_content_reuses_a_lone_text_node() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let label = page.block(page.body(), "span", 0.0, 0.0, 100.0, 20.0);
        let mut doc = page.build();

        doc.set_text_content(label, "span.p").unwrap();
        let text = doc.children(label).to_vec();
        assert_eq!(text.len(), 1);
        for crumb in ["span.p.div", "span", "span.p.div.body"] {
            doc.set_text_content(label, crumb).unwrap();
            assert_eq!(doc.children(label), &text[..]);
            assert_eq!(doc.text_content(label), crumb);
        }

        let em = doc.create_element("em");
        doc.append_child(label, em).unwrap();
        doc.set_text_content(label, "plain").unwrap();
        assert!(!doc.contains(em));
        assert!(!doc.contains(text[0]));
        assert_eq!(doc.text_content(label), "plain");

        doc.set_text_content(label, "").unwrap();
        assert!(doc.children(label).is_empty());
    }

    #[test]
    fn class_round_trip_restores_absence() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let div = page.block(page.body(), "div", 0.0, 0.0, 100.0, 100.0);
        let mut doc = page.build();

        assert!(doc.add_class(div, "hl").unwrap());
        assert!(!doc.add_class(div, "hl").unwrap());
        assert_eq!(doc.attribute(div, "class"), Some("hl"));
        assert!(doc.remove_class(div, "hl").unwrap());
        assert_eq!(doc.attribute(div, "class"), None);
    }

    #[test]
    fn style_properties_edit_in_place() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let div = page.block(page.body(), "div", 0.0, 0.0, 100.0, 100.0);
        let mut doc = page.build();
        doc.set_attribute(div, "style", "color: red; top: 1px").unwrap();

        doc.set_style_property(div, "top", "5px").unwrap();
        doc.set_style_property(div, "background", "white").unwrap();
        assert_eq!(
            doc.style_text(div),
            Some("color: red; top: 5px; background: white;")
        );
        assert_eq!(doc.style_property(div, "TOP").as_deref(), Some("5px"));

        doc.remove_style_property(div, "color").unwrap();
        doc.remove_style_property(div, "top").unwrap();
        doc.remove_style_property(div, "background").unwrap();
        assert_eq!(doc.style_text(div), None);
    }

    #[test]
    fn remove_drops_subtree_focus_and_listeners() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let outer = page.block(page.body(), "div", 0.0, 0.0, 100.0, 100.0);
        let inner = page.block(outer, "p", 0.0, 0.0, 100.0, 20.0);
        let mut doc = page.build();
        doc.focus(Some(inner)).unwrap();
        doc.add_listener(EventTarget::Node(inner), EventKind::Click)
            .unwrap();

        doc.remove(outer).unwrap();
        assert!(!doc.contains(outer));
        assert!(!doc.contains(inner));
        assert_eq!(doc.focused(), None);
        assert!(doc.listeners().is_empty());
        assert_eq!(doc.remove(inner), Err(DomError::MissingNode(inner)));
    }

    #[test]
    fn append_rejects_cycles() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let outer = page.block(page.body(), "div", 0.0, 0.0, 100.0, 100.0);
        let mut doc = page.build();
        let body = doc.body().unwrap();
        assert_eq!(
            doc.append_child(outer, body),
            Err(DomError::CycleDetected {
                parent: outer,
                child: body
            })
        );
    }

    #[test]
    fn dispatch_path_bubbles_to_window() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let div = page.block(page.body(), "div", 0.0, 0.0, 100.0, 100.0);
        let mut doc = page.build();
        let on_window = doc
            .add_listener(EventTarget::Window, EventKind::Click)
            .unwrap();
        let on_doc = doc
            .add_listener(EventTarget::Document, EventKind::Click)
            .unwrap();
        let on_div = doc
            .add_listener(EventTarget::Node(div), EventKind::Click)
            .unwrap();
        doc.add_listener(EventTarget::Document, EventKind::KeyPress)
            .unwrap();

        assert_eq!(
            doc.dispatch_path(EventKind::Click, Some(div)),
            vec![on_div, on_doc, on_window]
        );
        assert_eq!(
            doc.dispatch_path(EventKind::Click, None),
            vec![on_doc, on_window]
        );
    }

    #[test]
    fn text_content_replaces_children() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let div = page.block(page.body(), "div", 0.0, 0.0, 100.0, 100.0);
        let mut doc = page.build();
        doc.set_text_content(div, "one").unwrap();
        doc.set_text_content(div, "two").unwrap();
        assert_eq!(doc.children(div).len(), 1);
        assert_eq!(doc.text_content(div), "two");
        doc.set_text_content(div, "").unwrap();
        assert!(doc.children(div).is_empty());
    }
}
