//! Publication date parsing for human-written timestamps.
//!
//! Listing pages show dates the way a reader would write them, mostly in
//! Russian: `сегодня в 14:30`, `вчера в 09:05`, `15 марта в 18:20`,
//! `1 января 2010 в 12:00`. [`HumanDateParser`] understands those plus English
//! month names and the usual machine formats (ISO 8601, RFC 3339, `DD.MM.YYYY`).
//!
//! Relative dates and dates without a year are resolved against a fixed
//! reference day, so a parser built with [`HumanDateParser::new`] is fully
//! deterministic.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Date-parsing boundary: free text in, absolute timestamp out.
pub trait DateParser {
    /// `None` when the text cannot be resolved to a point in time.
    fn parse(&self, text: &str) -> Option<NaiveDateTime>;
}

impl<T: DateParser + ?Sized> DateParser for &T {
    fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        (**self).parse(text)
    }
}

static RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<day>сегодня|вчера|позавчера|today|yesterday)(?:,?\s+(?:в|at)?\s*(?P<hour>\d{1,2}):(?P<minute>\d{2}))?$",
    )
    .expect("valid relative date regex")
});

static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<day>\d{1,2})\s+(?P<month>\p{L}+)\.?(?:\s+(?P<year>\d{4}))?(?:\s*(?:г\.?|года))?(?:,?\s+(?:в|at)?\s*(?P<hour>\d{1,2}):(?P<minute>\d{2}))?$",
    )
    .expect("valid day-month regex")
});

static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<month>\p{L}+)\.?\s+(?P<day>\d{1,2})(?:st|nd|rd|th)?,?\s+(?P<year>\d{4})(?:,?\s+(?:at\s+)?(?P<hour>\d{1,2}):(?P<minute>\d{2}))?$",
    )
    .expect("valid month-day regex")
});

static DOTTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<day>\d{1,2})\.(?P<month>\d{1,2})\.(?P<year>\d{4})(?:,?\s+(?:в\s+)?(?P<hour>\d{1,2}):(?P<minute>\d{2}))?$",
    )
    .expect("valid dotted date regex")
});

/// Month name prefixes, Russian then English.
const MONTH_PREFIXES: &[(&str, u32)] = &[
    ("янв", 1),
    ("фев", 2),
    ("мар", 3),
    ("апр", 4),
    ("мая", 5),
    ("май", 5),
    ("июн", 6),
    ("июл", 7),
    ("авг", 8),
    ("сен", 9),
    ("окт", 10),
    ("ноя", 11),
    ("дек", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Parser for the date formats found on listing pages.
#[derive(Debug, Clone, Copy)]
pub struct HumanDateParser {
    today: NaiveDate,
}

impl HumanDateParser {
    /// Resolve relative dates against `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Resolve relative dates against the local calendar day.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    fn parse_relative(&self, caps: &Captures<'_>) -> Option<NaiveDateTime> {
        let days_back = match &caps["day"] {
            "сегодня" | "today" => 0,
            "вчера" | "yesterday" => 1,
            _ => 2,
        };
        let date = self.today.checked_sub_signed(TimeDelta::days(days_back))?;
        Some(date.and_time(time_of(caps)?))
    }

    fn parse_named_month(&self, caps: &Captures<'_>) -> Option<NaiveDateTime> {
        let month = month_number(&caps["month"])?;
        let year = match caps.name("year") {
            Some(year) => year.as_str().parse().ok()?,
            None => self.year(),
        };
        let day = caps["day"].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(date.and_time(time_of(caps)?))
    }

    fn parse_dotted(caps: &Captures<'_>) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            caps["year"].parse().ok()?,
            caps["month"].parse().ok()?,
            caps["day"].parse().ok()?,
        )?;
        Some(date.and_time(time_of(caps)?))
    }

    fn year(&self) -> i32 {
        self.today.year()
    }
}

impl DateParser for HumanDateParser {
    fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return None;
        }

        if let Some(parsed) = parse_machine(&text) {
            return Some(parsed);
        }

        let text = text.to_lowercase();
        if let Some(caps) = RELATIVE.captures(&text) {
            return self.parse_relative(&caps);
        }
        if let Some(caps) = DAY_MONTH_YEAR.captures(&text) {
            return self.parse_named_month(&caps);
        }
        if let Some(caps) = MONTH_DAY_YEAR.captures(&text) {
            return self.parse_named_month(&caps);
        }
        if let Some(caps) = DOTTED.captures(&text) {
            return Self::parse_dotted(&caps);
        }
        None
    }
}

/// ISO 8601 / RFC 3339 forms, as found in `datetime` attributes.
fn parse_machine(text: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn month_number(name: &str) -> Option<u32> {
    MONTH_PREFIXES
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix))
        .map(|&(_, month)| month)
}

/// Optional `HH:MM` capture; midnight when absent.
fn time_of(caps: &Captures<'_>) -> Option<NaiveTime> {
    match (caps.name("hour"), caps.name("minute")) {
        (Some(hour), Some(minute)) => NaiveTime::from_hms_opt(
            hour.as_str().parse().ok()?,
            minute.as_str().parse().ok()?,
            0,
        ),
        _ => Some(NaiveTime::MIN),
    }
}
