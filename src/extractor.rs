//! Page Extractor Module
//!
//! Fetches a storefront page, finds the add-to-cart button and builds the
//! style/font report:
//! - Inline styles of the button, applied over matching stylesheet rules
//! - Fonts from Google Fonts links, then from fetched stylesheets
//! - One entry per font family, first one found wins

use once_cell::sync::Lazy;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::css::{parse_declarations, StyleMap};
use crate::error::ExtractionError;
use crate::fonts::{dedupe_by_family, parse_google_font_url, FontDescriptor};
use crate::stylesheets::{ExternalStyles, StylesheetFetcher};

const GOOGLE_FONTS_HOST: &str = "fonts.googleapis.com";

static STYLESHEET_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"link[rel="stylesheet"]"#).expect("valid stylesheet selector"));
static BUTTON_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"form[action*="/cart/add"] button"#).expect("valid button selector")
});

/// Report returned for one page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub fonts: Vec<FontDescriptor>,
    pub primary_button: StyleMap,
}

/// A `<link rel="stylesheet">` found on the page
#[derive(Debug, Clone, PartialEq)]
pub struct StylesheetReference {
    pub href: String,
    pub is_google_fonts: bool,
}

impl StylesheetReference {
    fn new(href: &str) -> Self {
        Self {
            href: href.to_string(),
            is_google_fonts: href.contains(GOOGLE_FONTS_HOST),
        }
    }
}

/// Everything needed from the HTML, owned so the document can be dropped
/// before any stylesheet is fetched.
#[derive(Debug)]
struct ParsedPage {
    stylesheets: Vec<StylesheetReference>,
    google_fonts: Vec<FontDescriptor>,
    inline_styles: StyleMap,
    class_list: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PageExtractor {
    client: Client,
    config: ScraperConfig,
}

impl PageExtractor {
    pub fn new(config: ScraperConfig) -> Result<Self, String> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    pub async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractionError> {
        info!("Extracting button styles from {}", url);

        let html = self.fetch_page(url).await.map_err(|e| {
            warn!("Error fetching the page {}: {}", url, e);
            ExtractionError::PageFetch
        })?;

        let page = parse_page(&html)?;
        debug!(
            "Found {} stylesheets, button classes {:?}",
            page.stylesheets.len(),
            page.class_list
        );

        let hrefs: Vec<String> = page.stylesheets.iter().map(|s| s.href.clone()).collect();
        let external = StylesheetFetcher::new(&self.client, &self.config.stylesheet_scheme)
            .fetch_and_parse(&hrefs, &page.class_list)
            .await;

        let result = assemble(page, external);
        info!(
            "Extracted {} fonts and {} button properties from {}",
            result.fonts.len(),
            result.primary_button.len(),
            url
        );
        Ok(result)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("HTTP error: {}", response.status()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Some(content_type) = content_type {
            if !content_type.contains("html") {
                return Err(format!("Not an HTML page: {}", content_type));
            }
        }

        response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))
    }
}

fn parse_page(html: &str) -> Result<ParsedPage, ExtractionError> {
    let document = Html::parse_document(html);

    let mut stylesheets = Vec::new();
    let mut google_fonts = Vec::new();
    for element in document.select(&STYLESHEET_SELECTOR) {
        let Some(href) = element.value().attr("href").filter(|h| !h.is_empty()) else {
            continue;
        };

        let reference = StylesheetReference::new(href);
        if reference.is_google_fonts {
            google_fonts.extend(parse_google_font_url(href));
        }
        stylesheets.push(reference);
    }

    let button = document
        .select(&BUTTON_SELECTOR)
        .next()
        .ok_or(ExtractionError::ButtonNotFound)?;

    let class_list = button
        .value()
        .attr("class")
        .map(|classes| classes.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    Ok(ParsedPage {
        stylesheets,
        google_fonts,
        inline_styles: extract_inline_styles(button),
        class_list,
    })
}

/// Declarations from an element's `style` attribute; empty when absent.
pub fn extract_inline_styles(element: ElementRef<'_>) -> StyleMap {
    element
        .value()
        .attr("style")
        .map(parse_declarations)
        .unwrap_or_default()
}

/// External styles with inline styles applied on top.
pub fn merge_styles(external: StyleMap, inline: StyleMap) -> StyleMap {
    let mut combined = external;
    combined.extend(inline);
    combined
}

fn assemble(page: ParsedPage, external: ExternalStyles) -> ExtractionResult {
    let fonts = dedupe_by_family(page.google_fonts.into_iter().chain(external.fonts));

    ExtractionResult {
        fonts,
        primary_button: merge_styles(external.external_styles, page.inline_styles),
    }
}
