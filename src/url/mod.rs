//! Link handling module for Wiki-Ripple
//!
//! This module decides what a raw `href` found on a page points at and turns
//! the crawlable ones into absolute, comparable URLs.

mod language;
mod resolve;

use crate::config::SiteConfig;
use url::Url;

// Re-export main functions
pub use language::language_code;
pub use resolve::{absolutize_media, join_origin};

/// Link categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Same-site content page - crawled
    Article,
    /// Same-site page outside the article space - never crawled
    NonArticleInternal,
    /// Same article in another language - crawled like an article
    Translation,
    /// Leaves the site - recorded but never fetched
    External,
    /// Anchor, namespace page, or missing href
    Ignored,
}

impl LinkKind {
    /// Returns true if the link enters the internal frontier
    pub fn should_crawl(&self) -> bool {
        matches!(self, Self::Article | Self::Translation)
    }
}

/// Outcome of classifying one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: LinkKind,
    /// Normalized target; `None` only for `Ignored`
    pub target: Option<String>,
}

impl Classified {
    fn new(kind: LinkKind, target: String) -> Self {
        Self {
            kind,
            target: Some(target),
        }
    }

    fn ignored() -> Self {
        Self {
            kind: LinkKind::Ignored,
            target: None,
        }
    }
}

/// Site-specific classification rules
#[derive(Debug, Clone)]
pub struct LinkRules {
    /// Root-relative prefix of article links, e.g. `/wiki/`
    pub article_prefix: String,
    /// Enables the protocol-relative trim for external links
    pub language_aware: bool,
}

impl Default for LinkRules {
    fn default() -> Self {
        Self::from(&SiteConfig::default())
    }
}

impl From<&SiteConfig> for LinkRules {
    fn from(site: &SiteConfig) -> Self {
        Self {
            article_prefix: site.article_prefix.clone(),
            language_aware: site.language_aware,
        }
    }
}

/// Classifies a body link found on `current_page`
///
/// Rules are evaluated in order and the first match wins:
/// 1. No href → `Ignored`
/// 2. A `:` (namespace) or `#` (anchor) → `Ignored`. The separator of a
///    leading `http://`/`https://` is not a namespace colon.
/// 3. Article prefix → `Article`, prefixed with the page's scheme and host
/// 4. `http://`/`https://` → `External`, verbatim. In language-aware mode a
///    protocol-relative `//host/...` also lands here: its two leading
///    characters are dropped and the page scheme is prefixed.
/// 5. Other root-relative paths → `NonArticleInternal`
/// 6. Anything else → `Ignored`
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wiki_ripple::url::{classify, LinkKind, LinkRules};
///
/// let page = Url::parse("https://en.wikipedia.org/wiki/Food").unwrap();
/// let rules = LinkRules::default();
///
/// let link = classify(Some("/wiki/Bread"), &page, &rules);
/// assert_eq!(link.kind, LinkKind::Article);
/// assert_eq!(link.target.as_deref(), Some("https://en.wikipedia.org/wiki/Bread"));
///
/// assert_eq!(classify(Some("/wiki/Category:Food"), &page, &rules).kind, LinkKind::Ignored);
/// ```
pub fn classify(raw_href: Option<&str>, current_page: &Url, rules: &LinkRules) -> Classified {
    let Some(href) = raw_href else {
        return Classified::ignored();
    };

    if has_namespace_or_fragment(href) {
        return Classified::ignored();
    }

    if href.starts_with(rules.article_prefix.as_str()) {
        return match join_origin(current_page, href) {
            Some(url) => Classified::new(LinkKind::Article, url.to_string()),
            None => Classified::ignored(),
        };
    }

    if is_absolute_http(href) {
        return Classified::new(LinkKind::External, href.to_string());
    }

    if rules.language_aware {
        if let Some(residual) = href.strip_prefix("//") {
            return Classified::new(
                LinkKind::External,
                format!("{}://{}", current_page.scheme(), residual),
            );
        }
    }

    if href.starts_with('/') && !href.starts_with("//") {
        if let Some(url) = join_origin(current_page, href) {
            return Classified::new(LinkKind::NonArticleInternal, url.to_string());
        }
    }

    Classified::ignored()
}

/// Classifies a link from the language-switcher region
///
/// These links point at the same article on another language host. They do
/// not go through the namespace/anchor filter because they never come from
/// body prose.
pub fn classify_translation(raw_href: Option<&str>, current_page: &Url) -> Classified {
    let Some(href) = raw_href else {
        return Classified::ignored();
    };

    let candidate = if let Some(residual) = href.strip_prefix("//") {
        format!("{}://{}", current_page.scheme(), residual)
    } else if is_absolute_http(href) {
        href.to_string()
    } else {
        return Classified::ignored();
    };

    match Url::parse(&candidate) {
        Ok(mut url) if url.host_str().is_some() => {
            url.set_fragment(None);
            Classified::new(LinkKind::Translation, url.to_string())
        }
        _ => Classified::ignored(),
    }
}

fn is_absolute_http(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// Any colon after the scheme separator counts, including a port's.
fn has_namespace_or_fragment(href: &str) -> bool {
    let rest = href
        .strip_prefix("https://")
        .or_else(|| href.strip_prefix("http://"))
        .unwrap_or(href);
    rest.contains(':') || href.contains('#')
}
