use std::sync::OnceLock;

use regex::Regex;

/// One of the textual forms a media reference can take in banner content.
///
/// Dialects are tried in the order of [MediaDialect::ALL], from the most
/// specific form to the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaDialect {
    /// `{{media url="path"}}`
    DoubleQuotedPlaceholder,
    /// `{{media url='path'}}`
    SingleQuotedPlaceholder,
    /// `<img src="{{media url="path"}}">`, also with single or no inner quotes.
    PlaceholderInImgTag,
    /// `<img src="/media/path">` or any other `src` with a `/media/` segment.
    MediaPathInImgTag,
    /// `src="/media/path"` anywhere, even outside a complete tag.
    MediaPathInSrcAttribute,
}

impl MediaDialect {
    /// Every dialect in priority order.
    pub const ALL: [MediaDialect; 5] = [
        MediaDialect::DoubleQuotedPlaceholder,
        MediaDialect::SingleQuotedPlaceholder,
        MediaDialect::PlaceholderInImgTag,
        MediaDialect::MediaPathInImgTag,
        MediaDialect::MediaPathInSrcAttribute,
    ];

    fn pattern(self) -> &'static str {
        match self {
            MediaDialect::DoubleQuotedPlaceholder => r#"\{\{\s*media\s+url\s*=\s*"([^"]+)"\s*\}\}"#,
            MediaDialect::SingleQuotedPlaceholder => r#"\{\{\s*media\s+url\s*=\s*'([^']+)'\s*\}\}"#,
            MediaDialect::PlaceholderInImgTag => {
                r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']\{\{\s*media\s+url\s*=\s*["']?([^"'}\s]+)["']?\s*\}\}["']"#
            }
            MediaDialect::MediaPathInImgTag => {
                r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"'>]*/media/[^"'>]*)["']"#
            }
            MediaDialect::MediaPathInSrcAttribute => {
                r#"(?i)\bsrc\s*=\s*["']([^"'>]*/media/[^"'>]*)["']"#
            }
        }
    }

    fn regex(self) -> &'static Regex {
        static PATTERNS: OnceLock<[Regex; 5]> = OnceLock::new();

        let patterns = PATTERNS.get_or_init(|| {
            MediaDialect::ALL.map(|dialect| {
                Regex::new(dialect.pattern()).expect("media dialect patterns are valid regexes")
            })
        });

        &patterns[self as usize]
    }

    /// The path fragments this dialect captures in `text`, in order of
    /// appearance. Blank captures are skipped.
    pub fn captures(self, text: &str) -> impl Iterator<Item = &str> {
        self.regex()
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .map(|fragment| fragment.as_str().trim())
            .filter(|fragment| !fragment.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::MediaDialect;

    fn captures(dialect: MediaDialect, text: &str) -> Vec<String> {
        dialect.captures(text).map(str::to_owned).collect()
    }

    #[test]
    fn double_quoted_placeholder() {
        let text = r#"<p>{{media url="wysiwyg/a.jpg"}} and {{media url="b.png"}}</p>"#;

        assert_eq!(
            captures(MediaDialect::DoubleQuotedPlaceholder, text),
            vec!["wysiwyg/a.jpg", "b.png"]
        );
    }

    #[test]
    fn single_quoted_placeholder() {
        let text = "{{media url='wysiwyg/a.jpg'}}";

        assert_eq!(
            captures(MediaDialect::SingleQuotedPlaceholder, text),
            vec!["wysiwyg/a.jpg"]
        );
        assert!(captures(MediaDialect::DoubleQuotedPlaceholder, text).is_empty());
    }

    #[test]
    fn placeholder_in_img_tag() {
        let text = r#"<img alt="x" src="{{media url="banners/x.jpg"}}" />"#;

        assert_eq!(
            captures(MediaDialect::PlaceholderInImgTag, text),
            vec!["banners/x.jpg"]
        );
    }

    #[test]
    fn placeholder_in_img_tag_without_inner_quotes() {
        let text = r#"<IMG src='{{media url=banners/y.jpg}}'>"#;

        assert_eq!(
            captures(MediaDialect::PlaceholderInImgTag, text),
            vec!["banners/y.jpg"]
        );
    }

    #[test]
    fn media_path_in_img_tag() {
        let text = r#"<img class="hero" src="/media/catalog/a.jpg"><img src="/static/logo.png">"#;

        assert_eq!(
            captures(MediaDialect::MediaPathInImgTag, text),
            vec!["/media/catalog/a.jpg"]
        );
    }

    #[test]
    fn media_path_in_src_attribute_matches_fragments() {
        let text = r#"broken markup src='https://cdn.test/media/a.jpg' trailing"#;

        assert_eq!(
            captures(MediaDialect::MediaPathInSrcAttribute, text),
            vec!["https://cdn.test/media/a.jpg"]
        );
        assert!(captures(MediaDialect::MediaPathInImgTag, text).is_empty());
    }

    #[test]
    fn all_patterns_compile() {
        for dialect in MediaDialect::ALL {
            assert_eq!(dialect.captures("").count(), 0);
        }
    }
}
