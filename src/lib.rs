//! Affiliate insights turns the raw records of an affiliate-marketing backend
//! into the values an affiliate dashboard shows.
//!
//! The crate has two cores:
//!
//! - [media] resolves the image URLs embedded in banner content, whether the
//!   content uses media placeholders, plain `<img>` tags or was HTML-entity
//!   encoded along the way.
//! - [transaction] classifies, filters and aggregates commission and
//!   withdrawal records.
//!
//! Both are pure functions over data that has already been fetched. The
//! remaining modules hold the JSON models of the other backend records, the
//! presentation helpers and the configuration used by the `affiliate_report`
//! binary.

#![warn(missing_docs)]

pub mod banner;
pub mod campaign;
pub mod config;
pub mod format;
pub mod logging;
pub mod media;
pub mod report;
pub mod timezone;
pub mod transaction;
pub mod withdrawal;

mod scalar;

pub use banner::Banner;
pub use campaign::{Campaign, CampaignId, CampaignLookup};
pub use config::AppConfig;
pub use media::{MediaHost, absolutize_url, resolve_media_urls};
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use withdrawal::{WithdrawalRecord, WithdrawalStatus};

/// The errors that may occur at the edges of the crate.
///
/// The resolver and the aggregator never fail. These errors come from
/// configuration and from reading exported records.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The configured media host is not an absolute `http(s)` URL.
    #[error("invalid media host \"{0}\", expected an absolute http(s) URL")]
    InvalidMediaHost(String),

    /// A command that resolves media URLs was run without a media host.
    #[error("no media host configured, pass --media-host or set MEDIA_HOST")]
    MissingMediaHost,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A date argument could not be parsed.
    ///
    /// Callers should pass in the string that caused the error.
    #[error("could not parse date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A file did not contain JSON of the expected shape.
    #[error("could not deserialize JSON: {0}")]
    JSONDeserializationError(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// A file could not be read.
    #[error("could not read file: {0}")]
    IoError(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IoError(value.to_string())
    }
}
