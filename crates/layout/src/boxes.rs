use crate::values::{Length, parse_inset, parse_length};
use core_types::Point;
use dom::{Document, Id, Position};

/// A rectangle in CSS px units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges are inclusive, matching the engine's hit test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Offsets and size of an element once inline style overrides are applied.
/// Offsets are relative to [`offset_parent`], or to the viewport for fixed
/// elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UsedBox {
    pub offset_left: f32,
    pub offset_top: f32,
    pub width: f32,
    pub height: f32,
}

/// `position` after the inline `style` attribute is taken into account.
pub fn used_position(doc: &Document, id: Id) -> Position {
    doc.style_property(id, "position")
        .and_then(|v| Position::parse(&v))
        .unwrap_or_else(|| doc.base_position(id))
}

fn is_root_element(doc: &Document, id: Id) -> bool {
    Some(id) == doc.document_element() || Some(id) == doc.body()
}

/// Nearest positioned ancestor, falling back to `<body>`. `None` for the
/// root elements, fixed elements and detached nodes, as with
/// `HTMLElement.offsetParent`.
pub fn offset_parent(doc: &Document, id: Id) -> Option<Id> {
    if !doc.is_element(id) || is_root_element(doc, id) {
        return None;
    }
    if used_position(doc, id) == Position::Fixed {
        return None;
    }
    let body = doc.body();
    doc.ancestors(id)
        .filter(|a| doc.is_element(*a))
        .find(|a| Some(*a) == body || used_position(doc, *a).is_positioned())
}

fn style_length(doc: &Document, id: Id, name: &str) -> Option<Length> {
    doc.style_property(id, name).and_then(|v| parse_length(&v))
}

/// Inset edges for an out-of-flow element: `[top, right, bottom, left]`,
/// longhands winning over the `inset` shorthand.
fn insets(doc: &Document, id: Id) -> [Option<Length>; 4] {
    let shorthand = doc
        .style_property(id, "inset")
        .and_then(|v| parse_inset(&v))
        .map(|edges| edges.map(Some))
        .unwrap_or([None; 4]);
    let mut out = shorthand;
    for (slot, name) in out.iter_mut().zip(["top", "right", "bottom", "left"]) {
        if let Some(len) = style_length(doc, id, name) {
            *slot = Some(len);
        }
    }
    out
}

/// Resolve one axis of an out-of-flow box. Returns `(offset, size)`.
fn resolve_axis(
    start: Option<f32>,
    end: Option<f32>,
    size: Option<f32>,
    basis: f32,
    fallback_offset: f32,
    fallback_size: f32,
) -> (f32, f32) {
    match (start, end, size) {
        (Some(s), _, Some(size)) => (s, size),
        (Some(s), Some(e), None) => (s, (basis - s - e).max(0.0)),
        (Some(s), None, None) => (s, fallback_size),
        (None, Some(e), Some(size)) => (basis - e - size, size),
        (None, Some(e), None) => (basis - e - fallback_size, fallback_size),
        (None, None, Some(size)) => (fallback_offset, size),
        (None, None, None) => (fallback_offset, fallback_size),
    }
}

pub fn used_box(doc: &Document, id: Id) -> Option<UsedBox> {
    let geometry = *doc.geometry(id)?;
    let position = used_position(doc, id);
    if !matches!(position, Position::Absolute | Position::Fixed) {
        return Some(UsedBox {
            offset_left: geometry.offset_left,
            offset_top: geometry.offset_top,
            width: geometry.width,
            height: geometry.height,
        });
    }

    let (basis_w, basis_h) = match position {
        Position::Fixed => {
            let vp = doc.viewport();
            (vp.width, vp.height)
        }
        _ => offset_parent(doc, id)
            .and_then(|p| doc.geometry(p))
            .map(|g| (g.client_width, g.client_height))
            .unwrap_or((doc.viewport().width, doc.viewport().height)),
    };
    let [top, right, bottom, left] = insets(doc, id);
    let resolve = |len: Option<Length>, basis: f32| len.and_then(|l| l.resolve(basis));

    let (offset_left, width) = resolve_axis(
        resolve(left, basis_w),
        resolve(right, basis_w),
        resolve(style_length(doc, id, "width"), basis_w),
        basis_w,
        geometry.offset_left,
        geometry.width,
    );
    let (offset_top, height) = resolve_axis(
        resolve(top, basis_h),
        resolve(bottom, basis_h),
        resolve(style_length(doc, id, "height"), basis_h),
        basis_h,
        geometry.offset_top,
        geometry.height,
    );
    Some(UsedBox {
        offset_left,
        offset_top,
        width,
        height,
    })
}

/// Walk the offset-parent chain summing offsets. Returns the accumulated
/// position and, when the chain ends in a fixed element, that element.
fn accumulate_offsets(doc: &Document, id: Id) -> Option<(f32, f32, Option<Id>)> {
    let mut current = id;
    let used = used_box(doc, current)?;
    let (mut x, mut y) = (used.offset_left, used.offset_top);
    while let Some(parent) = offset_parent(doc, current) {
        let parent_box = used_box(doc, parent)?;
        x += parent_box.offset_left;
        y += parent_box.offset_top;
        current = parent;
    }
    let fixed_root = (used_position(doc, current) == Position::Fixed).then_some(current);
    Some((x, y, fixed_root))
}

/// Box of `id` relative to the document origin: the sum of `offsetLeft` /
/// `offsetTop` along the offset-parent chain. Scrolling of intermediate
/// containers does not move it.
pub fn document_rect(doc: &Document, id: Id) -> Option<Rectangle> {
    let used = used_box(doc, id)?;
    let (mut x, mut y, fixed_root) = accumulate_offsets(doc, id)?;
    if fixed_root.is_some() {
        x += doc.viewport().scroll_x;
        y += doc.viewport().scroll_y;
    }
    Some(Rectangle::new(x, y, used.width, used.height))
}

/// Box of `id` relative to the viewport, like `getBoundingClientRect()`.
///
/// Non-fixed boxes move with the viewport scroll and with the scroll offset
/// of every scrolling ancestor below the root; fixed boxes (and everything
/// laid out inside one) ignore both.
pub fn client_rect(doc: &Document, id: Id) -> Option<Rectangle> {
    let used = used_box(doc, id)?;
    let (mut x, mut y, fixed_root) = accumulate_offsets(doc, id)?;

    if fixed_root != Some(id) {
        for ancestor in doc.ancestors(id) {
            if !doc.is_element(ancestor) || is_root_element(doc, ancestor) {
                break;
            }
            if let Some(g) = doc.geometry(ancestor) {
                x -= g.scroll_left;
                y -= g.scroll_top;
            }
            if Some(ancestor) == fixed_root {
                break;
            }
        }
    }
    if fixed_root.is_none() {
        x -= doc.viewport().scroll_x;
        y -= doc.viewport().scroll_y;
    }
    Some(Rectangle::new(x, y, used.width, used.height))
}
