use crate::config::SummaryPolicy;
use crate::extract::document::PageDocument;
use crate::extract::text::clean;
use crate::url::absolutize_media;
use crate::WikiError;
use url::Url;

/// Summary stored when a page has no usable paragraph
pub const UNDEFINED_SUMMARY: &str = "undefined";

/// Structured content of one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Absolute URL the page was fetched from
    pub source_url: String,

    /// Trimmed text of the first heading; never empty
    pub title: String,

    /// Cleaned summary paragraph, or [`UNDEFINED_SUMMARY`]
    pub summary_text: String,

    /// Absolute media URLs from the content region, icons excluded
    pub media_refs: Vec<String>,
}

/// Builds a [`PageRecord`] from a parsed page
///
/// # Errors
///
/// `WikiError::MalformedDocument` if the page has no heading (or only a blank
/// one) or no content region.
pub fn extract(
    document: &impl PageDocument,
    page_url: &Url,
    policy: SummaryPolicy,
) -> Result<PageRecord, WikiError> {
    let title = document
        .heading()
        .map(|heading| heading.trim().to_string())
        .filter(|heading| !heading.is_empty())
        .ok_or_else(|| malformed(page_url, "heading"))?;

    if !document.has_content_region() {
        return Err(malformed(page_url, "content region"));
    }

    // A paragraph that cleans down to nothing counts as no summary.
    let summary_text = select_summary(document.paragraphs(), policy)
        .map(|paragraph| clean(&paragraph))
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| UNDEFINED_SUMMARY.to_string());

    let media_refs = document
        .media_sources()
        .iter()
        .filter(|src| !is_icon(src))
        .filter_map(|src| absolutize_media(page_url, src))
        .collect();

    Ok(PageRecord {
        source_url: page_url.to_string(),
        title,
        summary_text,
        media_refs,
    })
}

/// Picks the summary paragraph according to `policy`
///
/// Blank paragraphs are never candidates under either policy.
fn select_summary(paragraphs: Vec<String>, policy: SummaryPolicy) -> Option<String> {
    let mut candidates = paragraphs
        .into_iter()
        .filter(|paragraph| !paragraph.trim().is_empty());
    match policy {
        SummaryPolicy::FirstNonEmpty => candidates.next(),
        SummaryPolicy::SecondParagraph => candidates.nth(1),
    }
}

/// Coarse icon filter on the raw source string
fn is_icon(src: &str) -> bool {
    src.to_ascii_lowercase().contains("icon")
}

fn malformed(page_url: &Url, missing: &'static str) -> WikiError {
    WikiError::MalformedDocument {
        url: page_url.to_string(),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::document::HtmlDocument;

    fn page_url() -> Url {
        Url::parse("https://en.wikipedia.org/wiki/Water").unwrap()
    }

    fn wrap(content: &str) -> String {
        format!(
            r#"<html><body><h1> Water </h1>
            <div id="mw-content-text"><div class="mw-parser-output">{}</div></div>
            </body></html>"#,
            content
        )
    }

    fn extract_html(html: &str, policy: SummaryPolicy) -> Result<PageRecord, WikiError> {
        let doc = HtmlDocument::parse(html);
        extract(&doc, &page_url(), policy)
    }

    #[test]
    fn test_extract_full_record() {
        let html = wrap(
            r#"<p>Water is essential.[12] It boils at 100°C.[3]</p>
               <p>Second.</p>
               <img src="//upload.wikimedia.org/water.png">"#,
        );
        let record = extract_html(&html, SummaryPolicy::FirstNonEmpty).unwrap();

        assert_eq!(record.source_url, "https://en.wikipedia.org/wiki/Water");
        assert_eq!(record.title, "Water");
        assert_eq!(record.summary_text, "Water is essential. It boils at 100C.");
        assert_eq!(
            record.media_refs,
            vec!["https://upload.wikimedia.org/water.png".to_string()]
        );
    }

    #[test]
    fn test_first_non_empty_skips_blank_paragraphs() {
        let html = wrap("<p>\n</p><p>   </p><p>Real text</p><p>More</p>");
        let record = extract_html(&html, SummaryPolicy::FirstNonEmpty).unwrap();
        assert_eq!(record.summary_text, "Real text");
    }

    #[test]
    fn test_second_paragraph_policy() {
        let html = wrap("<p>Hatnote</p><p>Body text</p>");
        let record = extract_html(&html, SummaryPolicy::SecondParagraph).unwrap();
        assert_eq!(record.summary_text, "Body text");
    }

    #[test]
    fn test_second_paragraph_policy_with_single_paragraph() {
        let html = wrap("<p>Only one</p>");
        let record = extract_html(&html, SummaryPolicy::SecondParagraph).unwrap();
        assert_eq!(record.summary_text, UNDEFINED_SUMMARY);
    }

    #[test]
    fn test_second_paragraph_policy_skips_blank_paragraphs() {
        let html = wrap("<p></p><p>Hatnote</p><p>  </p><p>Body text</p>");
        let record = extract_html(&html, SummaryPolicy::SecondParagraph).unwrap();
        assert_eq!(record.summary_text, "Body text");
    }

    #[test]
    fn test_second_paragraph_policy_with_only_blank_paragraphs() {
        let html = wrap("<p></p><p>  </p>");
        let record = extract_html(&html, SummaryPolicy::SecondParagraph).unwrap();
        assert_eq!(record.summary_text, UNDEFINED_SUMMARY);
    }

    #[test]
    fn test_paragraph_that_cleans_to_nothing_yields_undefined() {
        let html = wrap("<p>水は生命に不可欠です。[1]</p><p>Second.</p>");
        let record = extract_html(&html, SummaryPolicy::FirstNonEmpty).unwrap();
        assert_eq!(record.summary_text, UNDEFINED_SUMMARY);

        let html = wrap("<p>Hatnote</p><p>[1][2]</p>");
        let record = extract_html(&html, SummaryPolicy::SecondParagraph).unwrap();
        assert_eq!(record.summary_text, UNDEFINED_SUMMARY);
    }

    #[test]
    fn test_no_paragraphs_yields_undefined() {
        let html = wrap("<div>no paragraphs</div><p> </p>");
        let record = extract_html(&html, SummaryPolicy::FirstNonEmpty).unwrap();
        assert_eq!(record.summary_text, "undefined");
    }

    #[test]
    fn test_icon_filter_is_case_insensitive() {
        let html = wrap(
            r#"<img src="//site/a.png"><img src="//site/icon-b.png"><img src="//site/Icon_C.svg">"#,
        );
        let record = extract_html(&html, SummaryPolicy::FirstNonEmpty).unwrap();
        assert_eq!(record.media_refs, vec!["https://site/a.png".to_string()]);
    }

    #[test]
    fn test_media_keeps_document_order() {
        let html = wrap(
            r#"<img src="//site/1.png"><audio src="//site/2.ogg"></audio><img src="//site/3.jpg">"#,
        );
        let record = extract_html(&html, SummaryPolicy::FirstNonEmpty).unwrap();
        assert_eq!(
            record.media_refs,
            vec![
                "https://site/1.png".to_string(),
                "https://site/2.ogg".to_string(),
                "https://site/3.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_heading_is_malformed() {
        let html = r#"<html><body><div id="mw-content-text"><div class="mw-parser-output"><p>x</p></div></div></body></html>"#;
        let err = extract_html(html, SummaryPolicy::FirstNonEmpty).unwrap_err();
        assert!(matches!(
            err,
            WikiError::MalformedDocument { missing: "heading", .. }
        ));
    }

    #[test]
    fn test_blank_heading_is_malformed() {
        let html = r#"<html><body><h1>  </h1><div id="mw-content-text"><div class="mw-parser-output"></div></div></body></html>"#;
        assert!(extract_html(html, SummaryPolicy::FirstNonEmpty).is_err());
    }

    #[test]
    fn test_missing_content_region_is_malformed() {
        let html = "<html><body><h1>Water</h1><p>text</p></body></html>";
        let err = extract_html(html, SummaryPolicy::FirstNonEmpty).unwrap_err();
        assert!(matches!(
            err,
            WikiError::MalformedDocument { missing: "content region", .. }
        ));
        assert!(!err.is_fatal());
    }
}
