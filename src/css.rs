//! Loose CSS scanning
//!
//! Splits raw stylesheet text into `(selector, body)` blocks and parses
//! declaration lists. Nothing here validates CSS: unterminated or malformed
//! input simply yields fewer blocks.

use std::collections::HashMap;

/// CSS property name -> value, last write wins
pub type StyleMap = HashMap<String, String>;

/// One innermost rule block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssBlock<'a> {
    pub selector: &'a str,
    pub body: &'a str,
}

/// Iterator over the innermost blocks of a stylesheet.
///
/// Wrappers such as `@media (...) {` are transparent: the rules they contain
/// come out with their own selectors, and the wrapper's closing brace is
/// skipped.
pub struct Blocks<'a> {
    css: &'a str,
    pos: usize,
}

pub fn blocks(css: &str) -> Blocks<'_> {
    Blocks { css, pos: 0 }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = CssBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = &self.css[self.pos..];
            let close = rest.find('}')?;
            let segment = &rest[..close];
            self.pos += close + 1;

            // A closing brace with no opener since the last one belongs to a wrapper
            let Some(open) = segment.rfind('{') else {
                continue;
            };

            let head = &segment[..open];
            // Selectors start after the last brace, semicolon or comment
            let after_rule = head.rfind(['{', ';']).map(|i| i + 1).unwrap_or(0);
            let after_comment = head.rfind("*/").map(|i| i + 2).unwrap_or(0);
            let selector_start = after_rule.max(after_comment);

            return Some(CssBlock {
                selector: head[selector_start..].trim(),
                body: &segment[open + 1..],
            });
        }
    }
}

/// Parse `prop: value; prop: value` into a map.
pub fn parse_declarations(text: &str) -> StyleMap {
    let mut styles = StyleMap::new();
    extend_declarations(&mut styles, text);
    styles
}

/// Parse a declaration list into an existing map, overwriting earlier keys.
pub fn extend_declarations(styles: &mut StyleMap, text: &str) {
    for (property, value) in declarations(text) {
        styles.insert(property.to_string(), value.to_string());
    }
}

/// Declarations in source order. Pieces without a colon, or with an empty
/// property or value, are dropped.
pub fn declarations<'a>(text: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    text.split(';').filter_map(|rule| {
        let (property, value) = rule.split_once(':')?;
        let (property, value) = (property.trim(), value.trim());
        if property.is_empty() || value.is_empty() {
            None
        } else {
            Some((property, value))
        }
    })
}

/// True when a selector ends in `.<class_name>`, e.g. `form .btn` for `btn`.
pub fn selector_targets_class(selector: &str, class_name: &str) -> bool {
    selector
        .trim_end()
        .strip_suffix(class_name)
        .is_some_and(|head| head.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let styles = parse_declarations("prop1: val1; prop2: val2");

        assert_eq!(styles.len(), 2);
        assert_eq!(styles.get("prop1").map(String::as_str), Some("val1"));
        assert_eq!(styles.get("prop2").map(String::as_str), Some("val2"));
    }

    #[test]
    fn test_parse_declarations_drops_malformed() {
        let styles = parse_declarations("color red; : blue; padding: ; margin: 0;;");

        assert_eq!(styles.len(), 1);
        assert_eq!(styles["margin"], "0");
    }

    #[test]
    fn test_parse_declarations_last_write_wins() {
        let styles = parse_declarations("color: red; color: blue");
        assert_eq!(styles["color"], "blue");
    }

    #[test]
    fn test_value_keeps_colons_after_first() {
        let styles = parse_declarations("background: url(https://cdn.example.com/a.png)");
        assert_eq!(styles["background"], "url(https://cdn.example.com/a.png)");
    }

    #[test]
    fn test_blocks_in_order() {
        let css = ".a { color: red; } .b{margin:0}";
        let found: Vec<_> = blocks(css).collect();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].selector, ".a");
        assert_eq!(found[0].body.trim(), "color: red;");
        assert_eq!(found[1].selector, ".b");
        assert_eq!(found[1].body, "margin:0");
    }

    #[test]
    fn test_blocks_inside_media_query() {
        let css = "@media (min-width: 750px) { .btn { padding: 2px; } .x { top: 0 } } .y { left: 0 }";
        let selectors: Vec<_> = blocks(css).map(|b| b.selector).collect();

        assert_eq!(selectors, vec![".btn", ".x", ".y"]);
    }

    #[test]
    fn test_blocks_after_at_statement() {
        let css = "@charset \"utf-8\"; @import url(x.css); .btn { color: red }";
        let found: Vec<_> = blocks(css).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].selector, ".btn");
    }

    #[test]
    fn test_comment_before_selector() {
        let css = "/* latin */\n@font-face { font-family: A; }\n.a{color:red;}\n/* Buttons */\n.btn{margin:0}";
        let selectors: Vec<_> = blocks(css).map(|b| b.selector).collect();

        assert_eq!(selectors, vec!["@font-face", ".a", ".btn"]);
    }

    #[test]
    fn test_unterminated_block_is_skipped() {
        let css = ".a { color: red } .b { color: blue";
        let found: Vec<_> = blocks(css).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].selector, ".a");
    }

    #[test]
    fn test_selector_targets_class() {
        assert!(selector_targets_class(".btn", "btn"));
        assert!(selector_targets_class("form .product-form .btn ", "btn"));
        assert!(selector_targets_class("a.btn", "btn"));
        assert!(selector_targets_class(".other, .btn", "btn"));

        assert!(!selector_targets_class(".btn:hover", "btn"));
        assert!(!selector_targets_class(".xbtn", "btn"));
        assert!(!selector_targets_class(".btn-primary", "btn"));
        assert!(!selector_targets_class(".btn, .other", "btn"));
    }
}
