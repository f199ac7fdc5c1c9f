//! Document query adapter
//!
//! The rest of the crate sees a page only through [`PageDocument`]. All CSS
//! selectors for the wiki layout live in this file, on top of `scraper`.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Narrow query interface over a parsed page
pub trait PageDocument {
    /// Text of the first top-level heading, untrimmed
    fn heading(&self) -> Option<String>;

    /// Whether the main content region exists
    fn has_content_region(&self) -> bool;

    /// Text of every paragraph in the content region, in document order
    fn paragraphs(&self) -> Vec<String>;

    /// Raw `src` of every element in the content region that has one
    fn media_sources(&self) -> Vec<String>;

    /// `href` of every anchor in the content region (`None` when absent)
    fn body_links(&self) -> Vec<Option<String>>;

    /// `href` of every anchor in the language switcher
    fn language_links(&self) -> Vec<Option<String>>;
}

struct WikiSelectors {
    heading: Selector,
    content: Selector,
    paragraph: Selector,
    media: Selector,
    anchor: Selector,
    language: Selector,
}

static SELECTORS: LazyLock<WikiSelectors> = LazyLock::new(|| WikiSelectors {
    heading: parse_selector("h1"),
    content: parse_selector("#mw-content-text .mw-parser-output"),
    paragraph: parse_selector("p"),
    media: parse_selector("[src]"),
    anchor: parse_selector("a"),
    language: parse_selector("#p-lang li a, li.interlanguage-link a"),
});

fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).expect("hardcoded selector is valid")
}

/// [`PageDocument`] backed by a `scraper` HTML tree
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses an HTML page
    ///
    /// Parsing never fails; missing structure is reported by the queries.
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    fn content_region(&self) -> Option<ElementRef<'_>> {
        self.html.select(&SELECTORS.content).next()
    }
}

impl PageDocument for HtmlDocument {
    fn heading(&self) -> Option<String> {
        self.html
            .select(&SELECTORS.heading)
            .next()
            .map(|element| element.text().collect())
    }

    fn has_content_region(&self) -> bool {
        self.content_region().is_some()
    }

    fn paragraphs(&self) -> Vec<String> {
        let Some(content) = self.content_region() else {
            return Vec::new();
        };

        content
            .select(&SELECTORS.paragraph)
            .map(|element| element.text().collect())
            .collect()
    }

    fn media_sources(&self) -> Vec<String> {
        let Some(content) = self.content_region() else {
            return Vec::new();
        };

        content
            .select(&SELECTORS.media)
            .filter_map(|element| element.value().attr("src"))
            .map(str::to_string)
            .collect()
    }

    fn body_links(&self) -> Vec<Option<String>> {
        let Some(content) = self.content_region() else {
            return Vec::new();
        };

        content
            .select(&SELECTORS.anchor)
            .map(|element| element.value().attr("href").map(str::to_string))
            .collect()
    }

    fn language_links(&self) -> Vec<Option<String>> {
        self.html
            .select(&SELECTORS.language)
            .map(|element| element.value().attr("href").map(str::to_string))
            .collect()
    }
}
