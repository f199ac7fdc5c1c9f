/// Derives the language code of a wiki URL from its host
///
/// The code is whatever sits between the scheme separator `//` and the first
/// `.` after it, i.e. the leftmost host label. This holds for hosts shaped like
/// `<lang>.wikipedia.org` only; it is not a general URL parser.
///
/// # Examples
///
/// ```
/// use wiki_ripple::url::language_code;
///
/// assert_eq!(language_code("https://fr.wikipedia.org/wiki/Pain"), Some("fr"));
/// assert_eq!(language_code("https://localhost/wiki/Pain"), None);
/// ```
pub fn language_code(url: &str) -> Option<&str> {
    let start = url.find("//")? + 2;
    let rest = &url[start..];
    let end = rest.find('.')?;
    let code = &rest[..end];

    // A dot found past the host (e.g. in the path) does not make a label.
    if code.is_empty() || code.contains('/') {
        return None;
    }
    Some(code)
}
