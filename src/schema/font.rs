//! Approximate text metrics for proportional fonts.

use unicode_width::UnicodeWidthChar;

/// Width of `text` at `font_size`, rounded up to whole units.
pub fn string_width(text: &str, font_size: f64) -> f64 {
    let em: f64 = text.chars().map(char_em).sum();
    (em * font_size).ceil()
}

/// Advance of one character as a fraction of the font size.
fn char_em(ch: char) -> f64 {
    if ch.width().unwrap_or(1) >= 2 {
        return 1.0;
    }
    match ch {
        'i' | 'j' | 'l' | '\'' | '|' => 0.23,
        'f' | 't' | 'I' | ' ' | '.' | ',' | ':' | ';' | '!' | '/' | '\\' => 0.28,
        'r' | '-' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | '*' => 0.34,
        'w' => 0.73,
        'm' | 'M' | 'W' => 0.84,
        'A'..='Z' => 0.67,
        _ => 0.56,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_and_wide_characters() {
        assert!(string_width("iii", 16.0) < string_width("mmm", 16.0));
        assert!(string_width("漢", 10.0) > string_width("a", 10.0));
    }

    #[test]
    fn test_width_rounds_up() {
        // 0.56 * 10 = 5.6
        assert_eq!(string_width("a", 10.0), 6.0);
        assert_eq!(string_width("", 16.0), 0.0);
    }

    #[test]
    fn test_width_scales_with_font_size() {
        assert!(string_width("users", 32.0) > string_width("users", 16.0));
    }
}
