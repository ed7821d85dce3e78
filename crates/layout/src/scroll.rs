use crate::boxes::{document_rect, used_box, used_position};
use dom::{Document, Id, Position};

/// Scroll the viewport so `id` starts at the top edge (block `start`) and is
/// horizontally visible (inline `nearest`), clamped to the scrollable range.
/// Returns whether the viewport moved. Fixed elements never scroll.
pub fn scroll_into_view(doc: &mut Document, id: Id) -> bool {
    if used_position(doc, id) == Position::Fixed {
        return false;
    }
    let Some(rect) = document_rect(doc, id) else {
        return false;
    };
    let (content_w, content_h) = doc
        .document_element()
        .and_then(|html| used_box(doc, html))
        .map(|b| (b.width, b.height))
        .unwrap_or_default();

    let vp = *doc.viewport();
    let max_x = (content_w - vp.width).max(0.0);
    let max_y = (content_h - vp.height).max(0.0);

    let y = rect.y.clamp(0.0, max_y);
    let x = if rect.x < vp.scroll_x || rect.right() > vp.scroll_x + vp.width {
        rect.x.clamp(0.0, max_x)
    } else {
        vp.scroll_x
    };

    if x == vp.scroll_x && y == vp.scroll_y {
        return false;
    }
    let viewport = doc.viewport_mut();
    viewport.scroll_x = x;
    viewport.scroll_y = y;
    true
}
