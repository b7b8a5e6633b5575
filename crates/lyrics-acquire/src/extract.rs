use crate::error::AcquireError;
use scraper::{ElementRef, Html, Selector};

/// Collect the href of the first anchor inside every `div`, in document order.
///
/// Nested divs share descendants, so the same href can appear several times.
/// Anchors without an href are skipped.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let div_sel = Selector::parse("div").expect("valid selector");
    let a_sel = Selector::parse("a").expect("valid selector");

    document
        .select(&div_sel)
        .filter_map(|div| div.select(&a_sel).next())
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Find the lyric block on a song page: the first `<p>` found by scanning
/// `div` containers in document order. Returns the paragraph's outer HTML.
///
/// A page with no such paragraph means the site layout no longer matches
/// what we expect, reported as [`AcquireError::NoLyrics`].
pub fn extract_lyric_block(html: &str, url: &str) -> Result<String, AcquireError> {
    let document = Html::parse_document(html);
    let div_sel = Selector::parse("div").expect("valid selector");
    let p_sel = Selector::parse("p").expect("valid selector");

    let containers: Vec<ElementRef> = document.select(&div_sel).collect();
    let paragraphs = containers
        .iter()
        .filter(|div| div.select(&p_sel).next().is_some())
        .count();
    tracing::debug!(url = %url, containers = containers.len(), paragraphs, "Scanned song page");

    containers
        .iter()
        .find_map(|div| div.select(&p_sel).next())
        .map(|p| p.html())
        .ok_or_else(|| AcquireError::NoLyrics {
            url: url.to_string(),
            containers: containers.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_first_anchor_per_div() {
        let html = r#"
        <html><body>
        <div class="header"><a href="/">Home</a><a href="/search">Search</a></div>
        <div class="tracklist">
            <div class="track"><a href="https://genius.com/Izone-violeta-lyrics">Violeta</a></div>
            <div class="track"><a href="https://genius.com/Izone-dreamlike-lyrics">Dreamlike</a></div>
        </div>
        <div class="empty">no links here</div>
        </body></html>
        "#;

        let links = extract_links(html);
        assert_eq!(
            links,
            vec![
                "/",
                // the tracklist container and its first child share an anchor
                "https://genius.com/Izone-violeta-lyrics",
                "https://genius.com/Izone-violeta-lyrics",
                "https://genius.com/Izone-dreamlike-lyrics",
            ]
        );
    }

    #[test]
    fn test_extract_skips_anchor_without_href() {
        let html = r#"<div><a name="top">Top</a></div><div><a href="/x">X</a></div>"#;
        assert_eq!(extract_links(html), vec!["/x"]);
    }

    #[test]
    fn test_extract_no_divs() {
        assert!(extract_links("<html><body><a href='/a'>a</a></body></html>").is_empty());
        assert!(extract_links("").is_empty());
    }

    #[test]
    fn test_lyric_block_is_first_paragraph() {
        let html = r#"
        <html><body>
        <p>outside any div</p>
        <div class="nav"><span>menu</span></div>
        <div class="lyrics"><p>[Verse 1]<br>Hello<br/>world</p><p>second</p></div>
        <div class="footer"><p>About</p></div>
        </body></html>
        "#;

        let block = extract_lyric_block(html, "https://genius.com/Izone-violeta-lyrics").unwrap();
        assert!(block.starts_with("<p>"));
        assert!(block.contains("[Verse 1]"));
        assert!(block.contains("world"));
        assert!(!block.contains("second"));
    }

    #[test]
    fn test_lyric_block_missing() {
        let html = "<html><body><div>no paragraphs</div><div><span>x</span></div></body></html>";
        let err = extract_lyric_block(html, "https://genius.com/Izone-gone-lyrics").unwrap_err();
        match err {
            AcquireError::NoLyrics { url, containers } => {
                assert_eq!(url, "https://genius.com/Izone-gone-lyrics");
                assert_eq!(containers, 2);
            }
            other => panic!("expected NoLyrics, got {other:?}"),
        }
    }
}
