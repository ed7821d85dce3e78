//! Helpers for the two attributes the picker rewrites: `class` and `style`.

pub fn class_tokens(class_attr: Option<&str>) -> Vec<&str> {
    class_attr
        .map(|value| value.split_whitespace().collect())
        .unwrap_or_default()
}

pub fn has_class_token(class_attr: Option<&str>, class_name: &str) -> bool {
    class_attr
        .map(|value| value.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

/// Split an inline `style` attribute into `(property, value)` pairs.
///
/// Property names are lowercased; later duplicates overwrite earlier ones in
/// place. Semicolons inside quotes or parentheses do not end a declaration.
pub fn parse_declarations(style_attr: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let bytes = style_attr.as_bytes();
    let mut start = 0usize;
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0usize;

    while i < bytes.len() {
        let ch = bytes[i];
        match quote {
            Some(_) if ch == b'\\' => {
                i += 2;
                continue;
            }
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                b'\'' | b'"' => quote = Some(ch),
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b';' if depth == 0 => {
                    push_declaration(&style_attr[start..i], &mut out);
                    start = i + 1;
                }
                _ => {}
            },
        }
        i += 1;
    }
    if start < style_attr.len() {
        push_declaration(&style_attr[start..], &mut out);
    }
    out
}

fn push_declaration(raw: &str, out: &mut Vec<(String, String)>) {
    let Some((name, value)) = raw.split_once(':') else {
        return;
    };
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return;
    }
    let value = value.trim().to_string();
    if let Some(slot) = out.iter_mut().find(|(existing, _)| *existing == name) {
        slot.1 = value;
    } else {
        out.push((name, value));
    }
}

pub fn serialize_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (name, value) in decls {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}
