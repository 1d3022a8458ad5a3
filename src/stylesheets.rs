//! External stylesheet fetching
//!
//! Stylesheets are fetched one after the other, in page order, so that a
//! property set by a later sheet always overrides an earlier one. A sheet
//! that cannot be fetched is logged and skipped.

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::css::{blocks, extend_declarations, selector_targets_class, StyleMap};
use crate::error::ExtractionError;
use crate::fonts::{extract_fonts_from_css, FontDescriptor};

/// Styles and fonts collected from every reachable stylesheet
#[derive(Debug, Clone, Default)]
pub struct ExternalStyles {
    pub external_styles: StyleMap,
    pub fonts: Vec<FontDescriptor>,
}

pub struct StylesheetFetcher<'a> {
    client: &'a Client,
    scheme: &'a str,
}

impl<'a> StylesheetFetcher<'a> {
    pub fn new(client: &'a Client, scheme: &'a str) -> Self {
        Self { client, scheme }
    }

    pub async fn fetch_and_parse(&self, hrefs: &[String], class_list: &[String]) -> ExternalStyles {
        let mut result = ExternalStyles::default();

        for href in hrefs {
            match self.fetch_stylesheet(href).await {
                Ok(css) => {
                    collect_class_styles(&mut result.external_styles, &css, class_list);

                    let fonts = extract_fonts_from_css(&css);
                    debug!("Stylesheet {}: {} bytes, {} fonts", href, css.len(), fonts.len());
                    result.fonts.extend(fonts);
                }
                Err(e) => warn!("{}", e),
            }
        }

        result
    }

    async fn fetch_stylesheet(&self, href: &str) -> Result<String, ExtractionError> {
        let fail = |reason: String| ExtractionError::Stylesheet {
            url: href.to_string(),
            reason,
        };

        let url = resolve_stylesheet_url(href, self.scheme);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fail(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(fail(format!("HTTP error: {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| fail(format!("Failed to read CSS: {}", e)))
    }
}

/// Storefront themes link their sheets as `//cdn.shop.com/...`. Anything
/// without its own scheme gets `scheme:` put in front.
pub fn resolve_stylesheet_url(href: &str, scheme: &str) -> String {
    if !href.starts_with("//") && Url::parse(href).is_ok() {
        return href.to_string();
    }
    format!("{}:{}", scheme, href)
}

/// Merge every block aimed at one of the classes into `styles`, class by
/// class, in stylesheet order.
fn collect_class_styles(styles: &mut StyleMap, css: &str, class_list: &[String]) {
    for class_name in class_list {
        for block in blocks(css).filter(|b| selector_targets_class(b.selector, class_name)) {
            extend_declarations(styles, block.body);
        }
    }
}
