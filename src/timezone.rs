//! The reference date for calendar-month aggregates.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The current UTC offset of a canonical timezone such as `Africa/Tunis`.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`, or in UTC when no timezone is given.
///
/// # Errors
///
/// Returns [Error::InvalidTimezoneError] if the timezone name is unknown.
pub fn local_today(canonical_timezone: Option<&str>) -> Result<Date, Error> {
    let now = OffsetDateTime::now_utc();

    let Some(timezone) = canonical_timezone else {
        return Ok(now.date());
    };

    let offset = get_local_offset(timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(timezone.to_owned()))?;

    Ok(now.to_offset(offset).date())
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{get_local_offset, local_today};

    #[test]
    fn knows_canonical_timezones() {
        assert!(get_local_offset("Africa/Tunis").is_some());
        assert!(get_local_offset("Not/AZone").is_none());
    }

    #[test]
    fn rejects_unknown_timezones() {
        assert_eq!(
            local_today(Some("Not/AZone")),
            Err(Error::InvalidTimezoneError("Not/AZone".to_owned()))
        );
    }

    #[test]
    fn defaults_to_utc() {
        assert!(local_today(None).is_ok());
    }
}
