//! Settings shared by the commands of the `affiliate_report` binary.

use time::Date;

use crate::{Error, format::DEFAULT_CURRENCY, media::MediaHost, timezone::local_today};

/// The settings the presentation layer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    media_host: Option<MediaHost>,
    currency: String,
    timezone: Option<String>,
}

impl AppConfig {
    /// Validate the raw settings.
    ///
    /// A blank `currency` falls back to [DEFAULT_CURRENCY]. A blank
    /// `media_host` or `timezone` is treated as missing. Without a timezone,
    /// dates are computed in UTC.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMediaHost] if `media_host` is not an absolute
    /// http(s) URL, or [Error::InvalidTimezoneError] if `timezone` is not a
    /// canonical timezone name.
    pub fn new(
        media_host: Option<&str>,
        currency: &str,
        timezone: Option<&str>,
    ) -> Result<Self, Error> {
        let media_host = media_host
            .filter(|media_host| !media_host.trim().is_empty())
            .map(MediaHost::new)
            .transpose()?;

        let currency = match currency.trim() {
            "" => DEFAULT_CURRENCY.to_owned(),
            currency => currency.to_owned(),
        };

        let timezone = timezone
            .map(str::trim)
            .filter(|timezone| !timezone.is_empty())
            .map(str::to_owned);

        if let Some(timezone) = timezone.as_deref() {
            // Fail on startup rather than on the first date calculation.
            local_today(Some(timezone))?;
        }

        Ok(Self {
            media_host,
            currency,
            timezone,
        })
    }

    /// The host that serves banner and campaign images.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingMediaHost] if no media host was configured.
    pub fn media_host(&self) -> Result<&MediaHost, Error> {
        self.media_host.as_ref().ok_or(Error::MissingMediaHost)
    }

    /// The currency label appended to amounts.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// The canonical name of the affiliate's timezone, if configured.
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    /// Today's date in the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTimezoneError] if the timezone is not known.
    pub fn today(&self) -> Result<Date, Error> {
        local_today(self.timezone())
    }
}
