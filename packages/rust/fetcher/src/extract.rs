//! Content-region extraction from fetched HTML.

use biosearch_shared::{BiosearchError, Result};
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never belongs to the article body.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Parse a CSS selector, reporting bad config as a config error.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| BiosearchError::config(format!("invalid content selector {selector:?}: {e}")))
}

/// Extract the visible text of the first element matching `selector`.
///
/// Lines are trimmed and blank lines dropped. Fails with `Extraction` when
/// the region is absent or holds no text.
pub fn extract_region_text(html: &str, selector: &Selector) -> Result<String> {
    let doc = Html::parse_document(html);

    let region = doc
        .select(selector)
        .next()
        .ok_or_else(|| BiosearchError::extraction("content container not found in the page"))?;

    let text = visible_text(region);
    if text.is_empty() {
        return Err(BiosearchError::extraction("content container is empty"));
    }
    Ok(text)
}

fn visible_text(region: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in region.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| NON_CONTENT_TAGS.contains(&el.name()))
        });
        if !hidden {
            raw.push_str(text);
        }
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_selector() -> Selector {
        parse_selector("#article-container").unwrap()
    }

    #[test]
    fn extracts_article_container_text() {
        let html = r#"<html><body>
            <nav>Home | About</nav>
            <div id="article-container">
                <h1>Bone loss in microgravity</h1>
                <p>We measured   density.</p>
            </div>
            <footer>Copyright</footer>
        </body></html>"#;

        let text = extract_region_text(html, &article_selector()).expect("extract");
        assert_eq!(text, "Bone loss in microgravity\nWe measured   density.");
        assert!(!text.contains("Copyright"));
        assert!(!text.contains("Home"));
    }

    #[test]
    fn skips_script_and_style_text() {
        let html = r#"<div id="article-container">
            <script>var tracker = 1;</script>
            <style>.x { color: red }</style>
            <p>Body</p>
        </div>"#;

        let text = extract_region_text(html, &article_selector()).unwrap();
        assert_eq!(text, "Body");
    }

    #[test]
    fn missing_container_is_extraction_error() {
        let html = "<html><body><main><p>Elsewhere</p></main></body></html>";
        let err = extract_region_text(html, &article_selector()).unwrap_err();
        assert!(matches!(err, BiosearchError::Extraction { .. }));
        assert!(err.to_string().contains("content container not found"));
    }

    #[test]
    fn empty_container_is_extraction_error() {
        let html = r#"<div id="article-container">   </div>"#;
        let err = extract_region_text(html, &article_selector()).unwrap_err();
        assert!(matches!(err, BiosearchError::Extraction { .. }));
    }

    #[test]
    fn invalid_selector_is_config_error() {
        let err = parse_selector("#[").unwrap_err();
        assert!(matches!(err, BiosearchError::Config { .. }));
    }
}
