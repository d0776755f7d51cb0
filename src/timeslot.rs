use crate::data::{Minutes, TimeSlot, Weekday};
use regex::Regex;
use std::sync::LazyLock;

const WEEKDAY_NAMES: [(Weekday, &str); 7] = [
    (Weekday::Mon, "MONDAY"),
    (Weekday::Tue, "TUESDAY"),
    (Weekday::Wed, "WEDNESDAY"),
    (Weekday::Thu, "THURSDAY"),
    (Weekday::Fri, "FRIDAY"),
    (Weekday::Sat, "SATURDAY"),
    (Weekday::Sun, "SUNDAY"),
];

static TIME_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(AM|PM)\s*-\s*(\d{1,2}):(\d{2})\s*(AM|PM)").unwrap()
});

/// Parses raw day and time text into a normalized time slot.
///
/// Returns `None` when either text is blank, no day token resolves, the
/// time text contains no `H:MM AM - H:MM PM` style range, an endpoint is
/// not a valid 12-hour clock reading, or the range is inverted or empty.
pub fn parse(days_text: &str, time_text: &str) -> Option<TimeSlot> {
    if days_text.trim().is_empty() || time_text.trim().is_empty() {
        return None;
    }
    let days = parse_days(days_text);
    if days.is_empty() {
        return None;
    }
    let (start, end) = parse_time_range(time_text)?;
    if start >= end {
        // inverted and zero-length ranges never leave the parser
        return None;
    }
    Some(TimeSlot {
        days,
        start,
        end,
        raw_days: days_text.to_string(),
        raw_time: time_text.to_string(),
    })
}

/// Resolves day tokens against the canonical weekday table. Tokens are
/// split on `/`, `,`, `&` and whitespace; a token matches when it is at
/// least 3 characters and a case-insensitive prefix of a weekday name
/// (which covers full names and the usual 3-letter codes). Unrecognized
/// tokens are dropped. The result is sorted Mon..Sun and de-duplicated.
pub fn parse_days(text: &str) -> Vec<Weekday> {
    let mut days: Vec<Weekday> = text
        .split(|c: char| c == '/' || c == ',' || c == '&' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(match_day_token)
        .collect();
    days.sort();
    days.dedup();
    days
}

fn match_day_token(token: &str) -> Option<Weekday> {
    if token.len() < 3 {
        return None;
    }
    let token = token.to_uppercase();
    WEEKDAY_NAMES
        .iter()
        .find(|(_, name)| name.starts_with(&token))
        .map(|(day, _)| *day)
}

/// Extracts the first `H:MM AM|PM - H:MM AM|PM` range from the text and
/// converts both endpoints to minutes since midnight.
pub fn parse_time_range(text: &str) -> Option<(Minutes, Minutes)> {
    let caps = TIME_RANGE_REGEX.captures(text)?;
    let start = to_minutes(&caps[1], &caps[2], &caps[3])?;
    let end = to_minutes(&caps[4], &caps[5], &caps[6])?;
    Some((start, end))
}

fn to_minutes(hour: &str, minute: &str, meridiem: &str) -> Option<Minutes> {
    let hour: Minutes = hour.parse().ok()?;
    let minute: Minutes = minute.parse().ok()?;
    // the pattern allows any 1-2 digit fields, so "25:99 AM" gets here
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let hour = match (hour, meridiem.eq_ignore_ascii_case("PM")) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Some(hour * 60 + minute)
}
