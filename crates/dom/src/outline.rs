use crate::{Document, Id};

/// Indented one-line-per-node dump of the tree, capped at `cap` lines.
pub fn outline(doc: &Document, cap: usize) -> Vec<String> {
    fn walk(doc: &Document, id: Id, depth: usize, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        *left -= 1;
        let indent = "  ".repeat(depth);

        if let Some(element) = doc.element(id) {
            let mut line = format!("{indent}<{}", element.name);
            for name in ["id", "class"] {
                if let Some(value) = element.attribute(name).filter(|v| !v.is_empty()) {
                    line.push_str(&format!(r#" {name}="{value}""#));
                }
            }
            line.push('>');
            if let Some(style) = element.attribute("style").filter(|v| !v.is_empty()) {
                line.push_str(&format!("  /* {style} */"));
            }
            out.push(line);
        } else if let Some(text) = doc.text(id) {
            let t = text.replace('\n', " ").trim().to_string();
            if t.is_empty() {
                return;
            }
            let show = match t.char_indices().nth(40) {
                Some((cut, _)) => format!("{}…", &t[..cut]),
                None => t,
            };
            out.push(format!("{indent}\"{show}\""));
        } else {
            out.push(format!("{indent}#document"));
        }

        for child in doc.children(id) {
            walk(doc, *child, depth + 1, out, left);
        }
    }

    let mut out = Vec::new();
    let mut left = cap;
    walk(doc, doc.root(), 0, &mut out, &mut left);
    out
}

#[cfg(test)]
mod tests {
    use super::outline;
    use crate::test_utils::PageBuilder;

    #[test]
    fn outline_shows_id_class_and_style() {
        let mut page = PageBuilder::new(800.0, 600.0);
        let div = page.block(page.body(), "div", 0.0, 0.0, 10.0, 10.0);
        page.attr(div, "id", "main")
            .attr(div, "class", "article")
            .attr(div, "style", "color: red;");
        page.text(div, "  hello\nworld ");
        let lines = outline(&page.build(), 16);
        assert_eq!(
            lines,
            vec![
                "#document".to_string(),
                "  <html>".to_string(),
                "    <body>".to_string(),
                r#"      <div id="main" class="article">  /* color: red; */"#.to_string(),
                "        \"hello world\"".to_string(),
            ]
        );
    }

    #[test]
    fn outline_respects_cap() {
        let page = PageBuilder::new(800.0, 600.0);
        assert_eq!(outline(&page.build(), 2).len(), 2);
    }
}
