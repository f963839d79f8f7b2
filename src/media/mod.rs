//! Media reference resolution for banner content.
//!
//! Banner content coming from the CMS describes its images in several
//! dialects: media placeholders (`{{media url="..."}}`), `<img>` tags that
//! wrap a placeholder, and plain `<img>` tags pointing under `/media/`. The
//! content may also have been HTML-entity encoded once or twice on its way
//! to the client.
//!
//! [resolve_media_urls] turns such content into an ordered list of absolute,
//! unique image URLs. [absolutize_url] is the single-URL counterpart for
//! images that are already supplied as a list.

mod dialect;
mod host;
mod resolver;

pub use dialect::MediaDialect;
pub use host::{MediaHost, absolutize_url, rebase_origin};
pub use resolver::{MediaUrlSet, decode_entities, resolve_media_urls};
