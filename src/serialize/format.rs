//! Minecraft formatting code to HTML conversion.
//!
//! Based on <https://minecraft.wiki/w/Formatting_codes>.

use regex::Regex;
use std::sync::LazyLock;

/// The classic 15-color palette, keyed by formatting code digit.
const COLORS: [(char, &str); 15] = [
    ('1', "#0000AA"),
    ('2', "#00AA00"),
    ('3', "#00AAAA"),
    ('4', "#AA0000"),
    ('5', "#AA00AA"),
    ('6', "#FFAA00"),
    ('7', "#AAAAAA"),
    ('8', "#555555"),
    ('9', "#5555FF"),
    ('a', "#55FF55"),
    ('b', "#55FFFF"),
    ('c', "#FF5555"),
    ('d', "#FF55FF"),
    ('e', "#FFFF55"),
    ('f', "#FFFFFF"),
];

static RULES: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    let mut rules = Vec::with_capacity(3 + COLORS.len());

    // Formats terminate with the reset code
    for (code, open, close) in [
        ('l', "<strong>", "</strong>"),
        ('n', "<u>", "</u>"),
        ('o', "<em>", "</em>"),
    ] {
        rules.push((
            Regex::new(&format!("§{code}([^§]*)§r")).unwrap(),
            format!("{open}$1{close}"),
        ));
    }

    // Colors terminate with the black code
    for (code, color) in COLORS {
        rules.push((
            Regex::new(&format!("§{code}([^§]*)§0")).unwrap(),
            format!("<span style=\"color: {color}\">$1</span>"),
        ));
    }

    rules
});

/// Rewrite in-game formatting codes in `value` to HTML tags.
///
/// `&` is accepted as an alias for `§`. Unterminated or unknown codes
/// are left in place.
pub fn format_string(value: &str) -> String {
    let mut value = value.replace('&', "§");
    for (pattern, replacement) in RULES.iter() {
        value = pattern
            .replace_all(&value, replacement.as_str())
            .into_owned();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(format_string("Example Block"), "Example Block");
    }

    #[test]
    fn test_bold_underline_italic() {
        assert_eq!(format_string("&lBold&r"), "<strong>Bold</strong>");
        assert_eq!(format_string("&nUnder&r"), "<u>Under</u>");
        assert_eq!(format_string("&oSlanted&r"), "<em>Slanted</em>");
    }

    #[test]
    fn test_section_sign_accepted_directly() {
        assert_eq!(format_string("§lBold§r"), "<strong>Bold</strong>");
    }

    #[test]
    fn test_colors_close_on_reset_to_black() {
        assert_eq!(
            format_string("&4Warning&0!"),
            "<span style=\"color: #AA0000\">Warning</span>!"
        );
        assert_eq!(
            format_string("&aGreen&0 and &bCyan&0"),
            "<span style=\"color: #55FF55\">Green</span> \
             and <span style=\"color: #55FFFF\">Cyan</span>"
        );
    }

    #[test]
    fn test_unterminated_code_left_in_place() {
        assert_eq!(format_string("&lDangling"), "§lDangling");
    }
}
