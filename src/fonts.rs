//! Font discovery
//!
//! Fonts come from two places: Google Fonts `<link>` URLs, parsed without
//! fetching, and the text of fetched stylesheets.

use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::css::{blocks, declarations};

const DEFAULT_SPACING: &str = "normal";
const DEFAULT_WEIGHT: &str = "normal";

/// A typeface referenced by the page. Two descriptors with the same
/// `family` are the same font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontDescriptor {
    pub family: String,
    pub font_weight: String,
    pub letter_spacings: String,
    /// Source link, only set for Google Fonts
    pub url: String,
    /// Raw variant list from a Google Fonts link, e.g. `400;700`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<String>,
}

impl FontDescriptor {
    fn from_css(family: String, font_weight: String, letter_spacings: String) -> Self {
        Self {
            family,
            font_weight,
            letter_spacings,
            url: String::new(),
            variants: None,
        }
    }
}

/// Extract fonts from stylesheet text: `@font-face` rules first, then
/// rules whose family is a CSS variable. Not deduplicated.
pub fn extract_fonts_from_css(css: &str) -> Vec<FontDescriptor> {
    let mut fonts = font_face_fonts(css);
    fonts.extend(variable_family_fonts(css));
    fonts
}

fn font_face_fonts(css: &str) -> Vec<FontDescriptor> {
    let mut fonts = Vec::new();

    for block in blocks(css).filter(|b| b.selector.eq_ignore_ascii_case("@font-face")) {
        let rules: Vec<(&str, &str)> = declarations(block.body).collect();

        let Some(family) = rules.iter().rev().find(|(p, _)| *p == "font-family") else {
            continue;
        };
        let Some(weight_at) = rules.iter().rposition(|(p, _)| *p == "font-weight") else {
            continue;
        };

        let family = family.1.trim_matches('"').trim_matches('\'').trim();
        if family.is_empty() {
            continue;
        }

        // letter-spacing only counts after font-weight; the first one wins
        let letter_spacings = rules[weight_at + 1..]
            .iter()
            .find(|(p, _)| *p == "letter-spacing")
            .map_or(DEFAULT_SPACING, |(_, v)| *v);

        fonts.push(FontDescriptor::from_css(
            family.to_string(),
            rules[weight_at].1.to_string(),
            letter_spacings.to_string(),
        ));
    }

    fonts
}

/// Only families written as `var(...)` are reported here. Literal families
/// such as `font-family: Helvetica` are deliberately skipped.
fn variable_family_fonts(css: &str) -> Vec<FontDescriptor> {
    let mut fonts = Vec::new();

    for block in blocks(css).filter(|b| b.body.contains("font")) {
        let mut family = String::new();
        let mut weight = DEFAULT_WEIGHT;
        let mut spacing = DEFAULT_SPACING;

        for (property, value) in declarations(block.body) {
            match property {
                "font-family" => family = value.replace(['"', '\''], ""),
                "font-weight" => weight = value,
                "letter-spacing" => spacing = value,
                // font-style is recognised but not reported
                _ => {}
            }
        }

        if !family.is_empty() && !family.starts_with("inherit") && family.starts_with("var") {
            fonts.push(FontDescriptor::from_css(
                family,
                weight.to_string(),
                spacing.to_string(),
            ));
        }
    }

    fonts
}

/// Describe a Google Fonts stylesheet link from its `family` query
/// parameter, e.g. `...css?family=Roboto:wght@400;700`.
pub fn parse_google_font_url(href: &str) -> Option<FontDescriptor> {
    let query = href.split('?').nth(1)?;
    let family_param = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "family")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())?;

    let mut parts = family_param.split(':');
    let family = parts.next().unwrap_or_default().to_string();
    let variants = parts
        .next()
        .filter(|v| !v.is_empty())
        .map(|v| v.replacen("wght@", "", 1))
        .unwrap_or_else(|| "400".to_string());

    let font_weight = if variants.contains("700") { "700" } else { "400" };

    Some(FontDescriptor {
        family,
        font_weight: font_weight.to_string(),
        letter_spacings: DEFAULT_SPACING.to_string(),
        url: href.to_string(),
        variants: Some(variants),
    })
}

/// Keep the first descriptor per family, preserving input order.
pub fn dedupe_by_family<I>(fonts: I) -> Vec<FontDescriptor>
where
    I: IntoIterator<Item = FontDescriptor>,
{
    let (_, unique) = fonts.into_iter().fold(
        (HashMap::<String, usize>::new(), Vec::new()),
        |(mut first_seen, mut unique), font| {
            if let Entry::Vacant(slot) = first_seen.entry(font.family.clone()) {
                slot.insert(unique.len());
                unique.push(font);
            }
            (first_seen, unique)
        },
    );
    unique
}
