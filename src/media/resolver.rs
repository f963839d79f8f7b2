use std::collections::HashSet;

use html_escape::decode_html_entities;

use super::{MediaDialect, MediaHost, absolutize_url};

/// An insertion-ordered set of absolute image URLs.
///
/// Every dialect pushes into the same set, so a URL found by a later dialect
/// keeps the position it got from the first one that found it.
#[derive(Debug, Default, Clone)]
pub struct MediaUrlSet {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl MediaUrlSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `url` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }

        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    /// Add every URL that `content` references, in dialect priority order.
    pub fn extend_from_content(&mut self, content: &str, host: &MediaHost) {
        let decoded = decode_entities(content);

        for dialect in MediaDialect::ALL {
            for fragment in dialect.captures(&decoded) {
                let url = host.media_url(fragment);
                if self.insert(url) {
                    tracing::trace!("resolved media URL from {dialect:?}: {fragment}");
                }
            }
        }
    }

    /// Add each image URL from an already split list, made absolute against
    /// `host`.
    pub fn extend_from_urls<'a>(
        &mut self,
        urls: impl IntoIterator<Item = &'a str>,
        host: &MediaHost,
    ) {
        for url in urls.into_iter().filter(|url| !url.trim().is_empty()) {
            self.insert(absolutize_url(url, host));
        }
    }

    /// The number of URLs in the set.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether the set has no URLs.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// The URLs in first-seen order.
    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

/// Decode HTML entities twice.
///
/// Banner content can be entity-encoded by the template engine and then
/// again by the CMS, so a single pass would leave `&lt;img` in the text.
/// Decoding plain text is a no-op, so already decoded content is unaffected.
pub fn decode_entities(content: &str) -> String {
    let once = decode_html_entities(content);
    decode_html_entities(&once).into_owned()
}

/// Resolve the image URLs referenced by banner `content`.
///
/// The result is ordered by dialect priority and then by position in the
/// content, contains no duplicates and only holds absolute URLs. Missing or
/// empty content resolves to an empty list.
pub fn resolve_media_urls(content: Option<&str>, host: &MediaHost) -> Vec<String> {
    let Some(content) = content.filter(|content| !content.trim().is_empty()) else {
        return Vec::new();
    };

    let mut urls = MediaUrlSet::new();
    urls.extend_from_content(content, host);

    tracing::debug!(
        "resolved {} media URL(s) from {} bytes of content",
        urls.len(),
        content.len()
    );

    urls.into_vec()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::media::MediaHost;

    use super::{MediaUrlSet, decode_entities, resolve_media_urls};

    fn host() -> MediaHost {
        MediaHost::new("https://example.com").unwrap()
    }

    #[test]
    fn resolves_placeholder_inside_img_tag() {
        let content = r#"<img src="{{media url="banners/x.jpg"}}" />"#;

        let urls = resolve_media_urls(Some(content), &host());

        assert_eq!(urls, vec!["https://example.com/media/banners/x.jpg"]);
    }

    #[test]
    fn missing_and_empty_content_resolve_to_nothing() {
        assert!(resolve_media_urls(None, &host()).is_empty());
        assert!(resolve_media_urls(Some(""), &host()).is_empty());
        assert!(resolve_media_urls(Some("   "), &host()).is_empty());
    }

    #[test]
    fn content_without_references_resolves_to_nothing() {
        let content = r#"<p>Summer sale!</p><img src="/static/logo.png">"#;

        assert!(resolve_media_urls(Some(content), &host()).is_empty());
    }

    #[test]
    fn singly_and_doubly_encoded_content_resolve_the_same() {
        let raw = r#"<img src="{{media url="banners/x.jpg"}}" /><img src="/media/y.png">"#;
        let once = raw
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;");
        let twice = once.replace('&', "&amp;");

        let want = resolve_media_urls(Some(raw), &host());

        assert_eq!(want.len(), 2);
        assert_eq!(resolve_media_urls(Some(&once), &host()), want);
        assert_eq!(resolve_media_urls(Some(&twice), &host()), want);
    }

    #[test]
    fn decode_entities_is_a_no_op_on_plain_text() {
        assert_eq!(decode_entities("<img src=\"a\">"), "<img src=\"a\">");
        assert_eq!(decode_entities("&amp;lt;b&amp;gt;"), "<b>");
    }

    #[test]
    fn urls_matched_by_several_dialects_appear_once() {
        // Matched by the placeholder, the img placeholder, and (after
        // normalisation) the /media/ path dialects.
        let content = r#"
            <img src="{{media url="a.jpg"}}">
            {{media url='a.jpg'}}
            <img src="/media/a.jpg">
            src="https://example.com/media/a.jpg"
        "#;

        let urls = resolve_media_urls(Some(content), &host());

        assert_eq!(urls, vec!["https://example.com/media/a.jpg"]);
    }

    #[test]
    fn earlier_dialects_take_priority_over_position() {
        let content = r#"<img src="/media/first.jpg"> {{media url="second.jpg"}}"#;

        let urls = resolve_media_urls(Some(content), &host());

        assert_eq!(
            urls,
            vec![
                "https://example.com/media/second.jpg",
                "https://example.com/media/first.jpg",
            ]
        );
    }

    #[test]
    fn keeps_position_order_within_a_dialect() {
        let content = r#"{{media url="c.jpg"}}{{media url="a.jpg"}}{{media url="b.jpg"}}"#;

        let urls = resolve_media_urls(Some(content), &host());

        assert_eq!(
            urls,
            vec![
                "https://example.com/media/c.jpg",
                "https://example.com/media/a.jpg",
                "https://example.com/media/b.jpg",
            ]
        );
    }

    #[test]
    fn every_url_is_absolute_and_unique() {
        let content = r#"
            {{media url="a.jpg"}} {{media url='/media/b.jpg'}}
            <img src="http://cdn.test/media/c.jpg"> <img src="{{media url=a.jpg}}">
            <div src="/media/b.jpg"></div> &lt;img src=&quot;/media/d.jpg&quot;&gt;
        "#;

        let urls = resolve_media_urls(Some(content), &host());
        let unique: HashSet<_> = urls.iter().collect();

        assert_eq!(urls.len(), 4, "got {urls:#?}");
        assert_eq!(unique.len(), urls.len());
        assert!(
            urls.iter()
                .all(|url| url.starts_with("http://") || url.starts_with("https://"))
        );
    }

    #[test]
    fn resolution_follows_the_configured_host() {
        let content = r#"{{media url="x.jpg"}}"#;
        let other = MediaHost::new("http://10.0.0.2:8080/").unwrap();

        assert_eq!(
            resolve_media_urls(Some(content), &other),
            vec!["http://10.0.0.2:8080/media/x.jpg"]
        );
    }

    #[test]
    fn url_set_skips_duplicates_from_lists() {
        let mut urls = MediaUrlSet::new();

        urls.extend_from_urls(["/a.jpg", "https://example.com/a.jpg", ""], &host());

        assert_eq!(urls.into_vec(), vec!["https://example.com/a.jpg"]);
    }
}
