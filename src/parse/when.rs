use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;

/// Storage form: `2025-09-05 12:00`
const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Display form for a date at midnight: `Sep 5 2025`
const DISPLAY_DATE: &str = "%b %-d %Y";
/// Display form with a time: `Sep 5 2025 12:00`
const DISPLAY_DATE_TIME: &str = "%b %-d %Y %H:%M";

/// Formats shown to the user when a date/time cannot be understood.
pub const EXAMPLE_FORMATS: &[&str] = &[
    "2025-09-05 1200",
    "2025-09-05 12:00",
    "5/9/2025 1200",
    "5/9/2025 12:00",
    "1200 (today 12:00)",
    "12:00 (today 12:00)",
    "tomorrow 0900",
    "next fri 14:30",
];

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());
static DMY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());
static TIME_COMPACT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2})$").unwrap());
static TIME_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());
static STORAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})[ T](\d{2}):(\d{2})$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WhenError {
    #[error("I couldn't understand the date/time \"{raw}\". Try formats like: {}", EXAMPLE_FORMATS.join(", "))]
    Unparseable { raw: String },
    #[error("not a stored date/time: {0}")]
    BadStorageForm(String),
}

/// Leniently parse a date/time relative to the local calendar date.
pub fn parse_when(raw: &str) -> Result<NaiveDateTime, WhenError> {
    parse_when_on(raw, Local::now().date_naive())
}

/// Leniently parse a date/time with `today` as the reference date.
///
/// Rules are tried in a fixed order and the first match wins:
/// relative keywords, weekdays, time only, ISO date-time, day/month/year
/// date-time, then date only. Nothing that fails numeric validation is
/// ever wrapped into range.
pub fn parse_when_on(raw: &str, today: NaiveDate) -> Result<NaiveDateTime, WhenError> {
    let s = normalize_spaces(raw);
    let tokens: Vec<&str> = s.split(' ').filter(|t| !t.is_empty()).collect();

    relative_day(&tokens, today)
        .or_else(|| weekday(&tokens, today))
        .or_else(|| parse_time(&s).map(|time| today.and_time(time)))
        .or_else(|| iso_date_time(&s))
        .or_else(|| dmy_date_time(&s))
        .or_else(|| parse_date(&s).map(|date| date.and_time(NaiveTime::MIN)))
        .ok_or_else(|| WhenError::Unparseable {
            raw: raw.to_string(),
        })
}

/// Human-readable form. The time is omitted when it is exactly midnight.
pub fn display(when: &NaiveDateTime) -> String {
    if when.time() == NaiveTime::MIN {
        when.format(DISPLAY_DATE).to_string()
    } else {
        when.format(DISPLAY_DATE_TIME).to_string()
    }
}

pub fn display_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE).to_string()
}

pub fn to_storage_form(when: &NaiveDateTime) -> String {
    when.format(STORAGE_FORMAT).to_string()
}

/// Parse the fixed storage form. Also accepts a `T` separator.
pub fn from_storage_form(s: &str) -> Result<NaiveDateTime, WhenError> {
    let bad = || WhenError::BadStorageForm(s.to_string());
    let caps = STORAGE.captures(s.trim()).ok_or_else(bad)?;
    let date = ymd(&caps[1], &caps[2], &caps[3]).ok_or_else(bad)?;
    let time = hm(&caps[4], &caps[5]).ok_or_else(bad)?;
    Ok(date.and_time(time))
}

/// Parse a display string written by older versions, e.g. `Sep 5 2025`,
/// `Sep 5 2025 18:00` or `Sep 1 2025 6:00PM`.
pub fn from_display_form(s: &str) -> Option<NaiveDateTime> {
    let s = normalize_spaces(s);
    if let Ok(dt) = NaiveDateTime::parse_from_str(&s, "%b %d %Y %H:%M") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&s, "%b %d %Y %I:%M%p") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(&s, "%b %d %Y")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a date only (`yyyy-MM-dd` or `d/M/yyyy`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Some(caps) = ISO_DATE.captures(s) {
        return ymd(&caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = DMY_DATE.captures(s) {
        return ymd(&caps[3], &caps[2], &caps[1]);
    }
    None
}

/// Parse a time-of-day token: `HHmm`, `H:mm` or `HH:mm`.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    if let Some(caps) = TIME_COMPACT.captures(s) {
        return hm(&caps[1], &caps[2]);
    }
    if let Some(caps) = TIME_COLON.captures(s) {
        return hm(&caps[1], &caps[2]);
    }
    None
}

fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

fn hm(h: &str, m: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h.parse().ok()?, m.parse().ok()?, 0)
}

/// Midnight when no token follows; a following token must be a valid time.
fn optional_time(rest: &[&str]) -> Option<NaiveTime> {
    match rest {
        [] => Some(NaiveTime::MIN),
        [time] => parse_time(time),
        _ => None,
    }
}

/// `today`, `tomorrow`, `tmr`, each with an optional time.
fn relative_day(tokens: &[&str], today: NaiveDate) -> Option<NaiveDateTime> {
    let (first, rest) = tokens.split_first()?;
    let date = match first.to_ascii_lowercase().as_str() {
        "today" => today,
        "tomorrow" | "tmr" => today.succ_opt()?,
        _ => return None,
    };
    Some(date.and_time(optional_time(rest)?))
}

/// `[next] <weekday> [time]`. Always the next occurrence strictly after
/// today, so asking for today's weekday lands a week ahead.
fn weekday(tokens: &[&str], today: NaiveDate) -> Option<NaiveDateTime> {
    let tokens = match tokens.split_first() {
        Some((first, rest)) if first.eq_ignore_ascii_case("next") => rest,
        _ => tokens,
    };
    let (name, rest) = tokens.split_first()?;
    let target = weekday_from_name(name)?;
    let time = optional_time(rest)?;
    Some(next_weekday(today, target).and_time(time))
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let day = match name.to_ascii_lowercase().as_str() {
        "mon" | "monday" => Weekday::Mon,
        "tue" | "tues" | "tuesday" => Weekday::Tue,
        "wed" | "weds" | "wednesday" => Weekday::Wed,
        "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        "sun" | "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let diff = (7 + target.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    let diff = if diff == 0 { 7 } else { diff };
    today + chrono::Days::new(u64::from(diff))
}

/// `yyyy-MM-dd HHmm`, `yyyy-MM-dd HH:mm`, `yyyy-MM-ddTHH:mm`
fn iso_date_time(s: &str) -> Option<NaiveDateTime> {
    if let Some((date, time)) = s.split_once(' ') {
        if ISO_DATE.is_match(date) {
            return Some(parse_date(date)?.and_time(parse_time(time)?));
        }
        return None;
    }
    let (date, time) = s.split_once('T')?;
    if !ISO_DATE.is_match(date) || !TIME_COLON.is_match(time) {
        return None;
    }
    Some(parse_date(date)?.and_time(parse_time(time)?))
}

/// `d/M/yyyy HHmm`, `d/M/yyyy HH:mm`
fn dmy_date_time(s: &str) -> Option<NaiveDateTime> {
    let (date, time) = s.split_once(' ')?;
    if !DMY_DATE.is_match(date) {
        return None;
    }
    Some(parse_date(date)?.and_time(parse_time(time)?))
}
