/// Parse `#rgb` or `#rrggbb` into RGB bytes.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

/// Format an RGBA color as a CSS string.
pub fn rgba_css(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("rgba({r},{g},{b},{a})")
}

/// A hex style token at the given opacity. Tokens in any other CSS syntax
/// come back unchanged.
pub fn with_alpha(token: &str, alpha: f64) -> String {
    match parse_hex(token) {
        Some((r, g, b)) => rgba_css(r, g, b, alpha.clamp(0.0, 1.0)),
        None => token.to_string(),
    }
}
