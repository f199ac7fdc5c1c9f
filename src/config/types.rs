use serde::Deserialize;

/// Seed article used when neither the config file nor the CLI provides one
pub const DEFAULT_SEED_URL: &str = "https://en.wikipedia.org/wiki/Food";

/// Main configuration structure for Wiki-Ripple
///
/// Every section is optional; an empty file reproduces the reference crawl.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    pub extract: ExtractConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Article the crawl starts from
    pub seed_url: String,

    /// Deepest level whose links are still followed
    pub recursion_limit: u32,

    /// Number of stacked URLs fetched at the same time
    pub max_concurrent_fetches: u32,

    /// Per-request timeout (seconds)
    pub fetch_timeout_secs: u64,

    /// Treat a page without heading or content region as fatal
    pub abort_on_malformed: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            recursion_limit: 500,
            max_concurrent_fetches: 1,
            fetch_timeout_secs: 30,
            abort_on_malformed: false,
        }
    }
}

/// Shape of the crawled site
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Root-relative prefix of article links
    pub article_prefix: String,

    /// Follow language-switcher links and tag edges with a language code
    pub language_aware: bool,

    /// Language code whose pages contribute translation links
    pub native_language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            article_prefix: "/wiki/".to_string(),
            language_aware: false,
            native_language: "en".to_string(),
        }
    }
}

/// Which paragraph becomes the page summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryPolicy {
    /// First paragraph with non-blank text
    #[default]
    FirstNonEmpty,
    /// Second paragraph in document order, blank or not
    SecondParagraph,
}

/// How summary text is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextMode {
    #[default]
    Prose,
    Ngrams,
}

/// Extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractConfig {
    pub summary_policy: SummaryPolicy,
    pub text_mode: TextMode,
    pub ngram_size: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            summary_policy: SummaryPolicy::default(),
            text_mode: TextMode::default(),
            ngram_size: 2,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "WikiRipple".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./wiki-ripple.db".to_string(),
        }
    }
}
