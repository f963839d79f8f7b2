//! Calendar windows for date-bounded transaction views.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

/// The length of a calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WindowPreset {
    /// Monday to Sunday.
    Week,
    /// The 1st to the 14th, or the 15th to the end of the month.
    Fortnight,
    /// A calendar month.
    Month,
    /// A calendar quarter.
    Quarter,
    /// January to June, or July to December.
    HalfYear,
    /// A calendar year.
    Year,
}

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowRange {
    /// The first day in the window.
    pub start: Date,
    /// The last day in the window.
    pub end: Date,
}

impl WindowRange {
    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// A human readable label, e.g. "1 Jan 2024 - 31 Jan 2024".
    pub fn label(&self) -> String {
        let start = format_date_label(self.start);
        let end = format_date_label(self.end);

        format!("{start} - {end}")
    }
}

/// The window of kind `preset` that contains `anchor_date`.
pub fn compute_window_range(preset: WindowPreset, anchor_date: Date) -> WindowRange {
    match preset {
        WindowPreset::Week => week_bounds(anchor_date),
        WindowPreset::Fortnight => fortnight_bounds(anchor_date),
        WindowPreset::Month => month_bounds(anchor_date.year(), anchor_date.month()),
        WindowPreset::Quarter => quarter_bounds(anchor_date.year(), anchor_date.month()),
        WindowPreset::HalfYear => half_year_bounds(anchor_date.year(), anchor_date.month()),
        WindowPreset::Year => year_bounds(anchor_date.year()),
    }
}

fn week_bounds(anchor_date: Date) -> WindowRange {
    let weekday_number = anchor_date.weekday().number_from_monday() as i64;
    let start = anchor_date - Duration::days(weekday_number - 1);
    let end = start + Duration::days(6);

    WindowRange { start, end }
}

fn fortnight_bounds(anchor_date: Date) -> WindowRange {
    let start_day = if anchor_date.day() <= 14 { 1 } else { 15 };
    let end_day = if anchor_date.day() <= 14 {
        14
    } else {
        last_day_of_month(anchor_date.year(), anchor_date.month())
    };

    WindowRange {
        start: anchor_date.replace_day(start_day).unwrap_or(anchor_date),
        end: anchor_date.replace_day(end_day).unwrap_or(anchor_date),
    }
}

fn month_bounds(year: i32, month: Month) -> WindowRange {
    span(year, month, month)
}

fn quarter_bounds(year: i32, month: Month) -> WindowRange {
    let quarter_start = ((u8::from(month) - 1) / 3) * 3 + 1;

    let start_month = Month::try_from(quarter_start).unwrap_or(Month::January);
    let end_month = start_month.next().next();

    span(year, start_month, end_month)
}

fn half_year_bounds(year: i32, month: Month) -> WindowRange {
    if u8::from(month) <= 6 {
        span(year, Month::January, Month::June)
    } else {
        span(year, Month::July, Month::December)
    }
}

fn year_bounds(year: i32) -> WindowRange {
    span(year, Month::January, Month::December)
}

/// The range from the first day of `start_month` to the last day of
/// `end_month` in `year`.
fn span(year: i32, start_month: Month, end_month: Month) -> WindowRange {
    let start = Date::from_calendar_date(year, start_month, 1).unwrap_or(Date::MIN);
    let end = Date::from_calendar_date(year, end_month, last_day_of_month(year, end_month))
        .unwrap_or(Date::MAX);

    WindowRange { start, end }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn format_date_label(date: Date) -> String {
    format!(
        "{} {} {}",
        date.day(),
        month_abbrev(date.month()),
        date.year()
    )
}

/// The three-letter abbreviation of `month`, e.g. "Jan".
pub fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
