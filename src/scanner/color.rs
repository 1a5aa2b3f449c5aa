//! Color Normalization - CSS Expressions to Canonical Hex
//!
//! Styled-span annotations declare their color in whatever form the source
//! document used: a named color, a 3- or 6-digit hex literal, or an
//! `rgb()`/`rgba()` expression. Downstream grouping and filtering need one
//! canonical form, so everything maps to lowercase 6-digit hex.
//!
//! Rules, checked in order (input trimmed, case-insensitive):
//! 1. Named color lookup against a fixed table
//! 2. `#abc` / `#aabbcc` hex literal (3-digit expands by doubling nibbles)
//! 3. `rgb(r,g,b)` / `rgba(r,g,b,a)` with arbitrary internal whitespace
//! 4. Anything else is unsupported and the candidate annotation is dropped

// =============================================================================
// Named Color Table
// =============================================================================

/// Canonical hex for a supported color name (CSS values, gray/grey synonyms)
fn named_color(name: &str) -> Option<&'static str> {
    let hex = match name {
        "yellow" => "#ffff00",
        "red" => "#ff0000",
        "green" => "#008000",
        "blue" => "#0000ff",
        "orange" => "#ffa500",
        "purple" => "#800080",
        "pink" => "#ffc0cb",
        "cyan" => "#00ffff",
        "magenta" => "#ff00ff",
        "lime" => "#00ff00",
        "brown" => "#a52a2a",
        "gray" | "grey" => "#808080",
        "black" => "#000000",
        "white" => "#ffffff",
        _ => return None,
    };
    Some(hex)
}

// =============================================================================
// Normalization
// =============================================================================

/// Normalize a CSS-style color expression to canonical 6-digit hex.
///
/// Returns `None` for unsupported formats; the caller drops the candidate.
pub fn normalize_color(expr: &str) -> Option<String> {
    let lower = expr.trim().to_lowercase();

    if let Some(hex) = named_color(&lower) {
        return Some(hex.to_string());
    }

    if let Some(digits) = lower.strip_prefix('#') {
        return normalize_hex(digits);
    }

    if let Some(args) = lower
        .strip_prefix("rgba")
        .or_else(|| lower.strip_prefix("rgb"))
    {
        return normalize_rgb(args);
    }

    None
}

/// Expand/validate a hex digit run (without the leading `#`)
fn normalize_hex(digits: &str) -> Option<String> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let mut out = String::with_capacity(7);
            out.push('#');
            for c in digits.chars() {
                out.push(c);
                out.push(c);
            }
            Some(out)
        }
        6 => Some(format!("#{}", digits)),
        _ => None,
    }
}

/// Hex-encode the r,g,b channels of an `(r, g, b[, a])` argument list.
/// Alpha is ignored; out-of-range or non-integer channels are unsupported.
fn normalize_rgb(args: &str) -> Option<String> {
    let inner = args.trim().strip_prefix('(')?.strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let mut channels = [0u8; 3];
    for (i, part) in parts.iter().take(3).enumerate() {
        channels[i] = part.trim().parse::<u8>().ok()?;
    }

    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channels[0], channels[1], channels[2]
    ))
}

// =============================================================================
// Tests
// =============================================================================
