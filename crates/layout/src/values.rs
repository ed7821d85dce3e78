/// CSS length as used by the inline overrides the picker writes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
    Auto,
}

impl Length {
    /// Resolve against `basis` (the containing block's matching dimension).
    pub fn resolve(self, basis: f32) -> Option<f32> {
        match self {
            Length::Px(px) => Some(px),
            Length::Percent(pct) => Some(basis * pct / 100.0),
            Length::Auto => None,
        }
    }
}

/// Parse `NNpx`, `NN%`, a bare `0`, or `auto`.
pub fn parse_length(value: &str) -> Option<Length> {
    let v = value.trim();
    if v.eq_ignore_ascii_case("auto") {
        return Some(Length::Auto);
    }
    if let Some(px) = v.strip_suffix("px") {
        let num = px.trim().parse::<f32>().ok()?;
        return num.is_finite().then_some(Length::Px(num));
    }
    if let Some(pct) = v.strip_suffix('%') {
        let num = pct.trim().parse::<f32>().ok()?;
        return num.is_finite().then_some(Length::Percent(num));
    }
    match v.parse::<f32>() {
        Ok(num) if num == 0.0 => Some(Length::Px(0.0)),
        _ => None,
    }
}

/// Expand the `inset` shorthand (1–4 values, CSS box order) into
/// `[top, right, bottom, left]`.
pub fn parse_inset(value: &str) -> Option<[Length; 4]> {
    let parts = value
        .split_whitespace()
        .map(parse_length)
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [all] => Some([*all; 4]),
        [v, h] => Some([*v, *h, *v, *h]),
        [t, h, b] => Some([*t, *h, *b, *h]),
        [t, r, b, l] => Some([*t, *r, *b, *l]),
        _ => None,
    }
}
