//! Summary text cleaning and n-gram tokenization

use regex::Regex;
use std::sync::LazyLock;

static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("hardcoded regex pattern is valid"));

static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +").expect("hardcoded regex pattern is valid"));

static CITATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("hardcoded regex pattern is valid"));

/// Tokens dropped regardless of length
const STOPWORDS: &[&str] = &["i", "a"];

/// Cleans raw paragraph text into a single line of ASCII prose
///
/// Steps, in order:
/// 1. newline runs become one space
/// 2. space runs become one space
/// 3. numeric citation markers such as `[12]` are removed
/// 4. every non-ASCII character is dropped (not transliterated)
/// 5. surrounding whitespace is trimmed
///
/// # Examples
///
/// ```
/// use wiki_ripple::extract::clean;
///
/// assert_eq!(
///     clean("Water is essential.[12] It boils at 100°C.[3]"),
///     "Water is essential. It boils at 100C."
/// );
/// ```
pub fn clean(raw: &str) -> String {
    let text = NEWLINE_RUNS.replace_all(raw, " ");
    let text = SPACE_RUNS.replace_all(&text, " ");
    let text = CITATION_MARKER.replace_all(&text, "");

    let ascii: String = text.chars().filter(char::is_ascii).collect();
    ascii.trim().to_string()
}

/// Splits cleaned text into distinct `n`-token windows
///
/// Tokens lose leading and trailing punctuation; tokens of one character or
/// less and the stopwords `i`/`a` are discarded. A window equal to an earlier
/// one is skipped, so the result keeps first-occurrence order.
///
/// # Examples
///
/// ```
/// use wiki_ripple::extract::tokenize;
///
/// let grams = tokenize("the cat sat the cat sat", 2);
/// assert_eq!(grams, vec![
///     vec!["the", "cat"],
///     vec!["cat", "sat"],
///     vec!["sat", "the"],
/// ]);
/// ```
pub fn tokenize(raw: &str, n: usize) -> Vec<Vec<String>> {
    let cleaned = clean(raw);

    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|token| token.len() > 1)
        .filter(|token| {
            !STOPWORDS
                .iter()
                .any(|stop| token.eq_ignore_ascii_case(stop))
        })
        .map(str::to_string)
        .collect();

    if n == 0 || tokens.len() < n {
        return Vec::new();
    }

    let mut grams: Vec<Vec<String>> = Vec::new();
    for window in tokens.windows(n) {
        if !grams.iter().any(|seen| seen.as_slice() == window) {
            grams.push(window.to_vec());
        }
    }
    grams
}
