//! Affiliate banners and their image URLs.

use serde::Deserialize;

use crate::{
    media::{MediaHost, MediaUrlSet},
    scalar::{Scalar, string_list},
};

/// A promotional banner as returned by the banners endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBanner")]
pub struct Banner {
    /// The backend's banner ID.
    pub id: Option<String>,
    /// The banner's title.
    pub title: String,
    /// HTML or templated content that references the banner's images.
    pub content: Option<String>,
    /// Images supplied directly as a list, possibly relative to the host.
    pub images_url: Vec<String>,
}

impl Banner {
    /// Every image URL of the banner, absolute and without duplicates.
    ///
    /// Images from the explicit list come first, followed by the images
    /// referenced in the content.
    pub fn image_urls(&self, host: &MediaHost) -> Vec<String> {
        let mut urls = MediaUrlSet::new();

        urls.extend_from_urls(self.images_url.iter().map(String::as_str), host);
        if let Some(content) = self.content.as_deref() {
            urls.extend_from_content(content, host);
        }

        urls.into_vec()
    }
}

#[derive(Deserialize)]
struct RawBanner {
    #[serde(default, alias = "id")]
    banner_id: Option<Scalar>,
    #[serde(default)]
    title: Option<Scalar>,
    #[serde(default)]
    content: Option<Scalar>,
    #[serde(default)]
    images_url: Option<serde_json::Value>,
}

impl From<RawBanner> for Banner {
    fn from(raw: RawBanner) -> Self {
        Self {
            id: raw.banner_id.as_ref().and_then(Scalar::as_non_empty_text),
            title: raw
                .title
                .as_ref()
                .and_then(Scalar::as_text)
                .unwrap_or_default(),
            content: raw.content.as_ref().and_then(Scalar::as_non_empty_text),
            images_url: string_list(raw.images_url),
        }
    }
}
