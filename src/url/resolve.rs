use url::Url;

/// Prefixes a root-relative path with the scheme and host of `page`
///
/// Returns `None` if the result is not a valid absolute URL.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wiki_ripple::url::join_origin;
///
/// let page = Url::parse("https://en.wikipedia.org/wiki/Food?x=1").unwrap();
/// let url = join_origin(&page, "/wiki/Bread").unwrap();
/// assert_eq!(url.as_str(), "https://en.wikipedia.org/wiki/Bread");
/// ```
pub fn join_origin(page: &Url, path: &str) -> Option<Url> {
    if !path.starts_with('/') || path.starts_with("//") {
        return None;
    }

    let mut url = page.join(path).ok()?;
    url.set_fragment(None);
    Some(url)
}

/// Makes a raw media `src` absolute
///
/// Wiki pages reference media protocol-relative (`//upload.example.org/a.png`),
/// so the page scheme is prefixed. Absolute sources are kept as they are and
/// root-relative ones get the page origin.
pub fn absolutize_media(page: &Url, src: &str) -> Option<String> {
    let src = src.trim();

    if src.starts_with("//") {
        return Some(format!("{}:{}", page.scheme(), src));
    }

    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }

    join_origin(page, src).map(|url| url.to_string())
}
