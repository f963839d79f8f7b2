use std::fmt::Display;

use crate::Error;

const MEDIA_PATH_PREFIX: &str = "/media/";

/// The base URL that relative media paths are served from, e.g.
/// `https://shop.example.com`.
///
/// Always an absolute `http(s)` URL without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaHost(String);

impl MediaHost {
    /// Create a media host from a configured base URL.
    ///
    /// Trailing slashes are dropped.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMediaHost] if `base_url` does not start with
    /// `http://` or `https://`, or has nothing after the scheme.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let trimmed = base_url.trim().trim_end_matches('/');

        let authority = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));

        match authority {
            Some(authority)
                if !authority.is_empty() && !authority.contains(char::is_whitespace) =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(Error::InvalidMediaHost(base_url.to_owned())),
        }
    }

    /// The host as a string slice, e.g. `https://shop.example.com`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Turn a captured media path fragment into an absolute URL.
    ///
    /// - absolute URLs are kept as they are,
    /// - paths starting with `/media/` are prefixed with the host,
    /// - anything else is treated as relative to `<host>/media/`.
    pub fn media_url(&self, fragment: &str) -> String {
        if is_absolute(fragment) {
            fragment.to_owned()
        } else if fragment.starts_with(MEDIA_PATH_PREFIX) {
            format!("{}{fragment}", self.0)
        } else {
            format!(
                "{}{MEDIA_PATH_PREFIX}{}",
                self.0,
                fragment.trim_start_matches('/')
            )
        }
    }
}

impl Display for MediaHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MediaHost {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns `url` unchanged if it is already absolute, otherwise prefixes it
/// with the media host.
///
/// Unlike [MediaHost::media_url] no `/media/` segment is inserted, the URL is
/// taken to be relative to the host root.
pub fn absolutize_url(url: &str, host: &MediaHost) -> String {
    let url = url.trim();

    if is_absolute(url) {
        url.to_owned()
    } else if url.starts_with('/') {
        format!("{}{url}", host.as_str())
    } else {
        format!("{}/{url}", host.as_str())
    }
}

/// Move a URL served from `upstream_origin` onto the media host.
///
/// The backend sometimes hands out image URLs under its own internal origin
/// (for example `https://magento.test/media/...`), which the client cannot
/// reach. URLs under any other origin are returned unchanged.
pub fn rebase_origin(url: &str, upstream_origin: &str, host: &MediaHost) -> String {
    let upstream_origin = upstream_origin.trim_end_matches('/');
    if upstream_origin.is_empty() {
        return url.to_owned();
    }

    match url.strip_prefix(upstream_origin) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{rest}", host.as_str())
        }
        _ => url.to_owned(),
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
