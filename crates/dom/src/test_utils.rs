//! Fixture builder for tests in this and downstream crates.

use crate::{BoxGeometry, Document, Id, Position, Viewport};

/// Builds a `<html><body>` page whose body covers the viewport.
///
/// Geometry passed to [`PageBuilder::block`] is relative to the element's
/// offset parent, the same convention as `offsetLeft`/`offsetTop`.
pub struct PageBuilder {
    doc: Document,
    html: Id,
    body: Id,
}

impl PageBuilder {
    pub fn new(width: f32, height: f32) -> Self {
        let mut doc = Document::new(Viewport::new(width, height));
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        let root = doc.root();
        attach(&mut doc, root, html);
        attach(&mut doc, html, body);
        set_geometry(&mut doc, html, BoxGeometry::new(0.0, 0.0, width, height));
        set_geometry(&mut doc, body, BoxGeometry::new(0.0, 0.0, width, height));
        Self { doc, html, body }
    }

    pub fn html(&self) -> Id {
        self.html
    }

    pub fn body(&self) -> Id {
        self.body
    }

    pub fn block(&mut self, parent: Id, tag: &str, x: f32, y: f32, width: f32, height: f32) -> Id {
        let id = self.doc.create_element(tag);
        attach(&mut self.doc, parent, id);
        set_geometry(&mut self.doc, id, BoxGeometry::new(x, y, width, height));
        id
    }

    pub fn positioned(&mut self, id: Id, position: Position) -> &mut Self {
        if let Err(err) = self.doc.set_position(id, position) {
            panic!("fixture position failed: {err}");
        }
        self
    }

    pub fn attr(&mut self, id: Id, name: &str, value: &str) -> &mut Self {
        if let Err(err) = self.doc.set_attribute(id, name, value) {
            panic!("fixture attribute failed: {err}");
        }
        self
    }

    pub fn text(&mut self, parent: Id, text: &str) -> Id {
        let id = self.doc.create_text(text);
        attach(&mut self.doc, parent, id);
        id
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn build(self) -> Document {
        self.doc
    }
}

fn attach(doc: &mut Document, parent: Id, child: Id) {
    if let Err(err) = doc.append_child(parent, child) {
        panic!("fixture append failed: {err}");
    }
}

fn set_geometry(doc: &mut Document, id: Id, geometry: BoxGeometry) {
    if let Err(err) = doc.set_geometry(id, geometry) {
        panic!("fixture geometry failed: {err}");
    }
}
