//! Built-in converters: `string`, `number`, `percent` and `date`.
//!
//! Each converter is a pure function of the value and the resolved column.
//! A value that is missing (`number`, `percent`) or falsy (`date`) renders as the
//! column's placeholder.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::ConvertError;
use crate::{ColumnSpec, NumberStyle, Value};

pub const DEFAULT_DECIMALS: u32 = 2;
pub const DEFAULT_PLACEHOLDER: &str = "---";
pub const DEFAULT_DATE_FORMAT: &str = "YY-MM-DD HH:mm";

const MAX_DECIMALS: u32 = 100;

type ConvertResult = Result<String, ConvertError>;

/// Renders the value as-is.
pub fn string(value: &Value, _column: &ColumnSpec) -> ConvertResult {
    Ok(value.to_display_string())
}

/// Renders a number with fixed decimals and grouped thousands.
///
/// Halves round away from zero, judged on the stored binary value, so `2.5`
/// gives `"3"` but `1.005` (stored just below) gives `"1.00"`.
///
/// [`Value::Null`] stands for both an explicit null and a missing attribute, and
/// both render the placeholder. An explicit null is never coerced to `0`, which
/// a host distinguishing null from undefined would print as `"0.00"`.
///
/// # Examples
///
/// ```rust
/// use sortable_table::{converters, ColumnSpec, NumberStyle, Value};
///
/// let column = ColumnSpec::new("amount");
/// let text = converters::number(&Value::from(-9876543.219), &column, &NumberStyle::new()).unwrap();
/// assert_eq!(text, "-9 876 543.22");
/// ```
pub fn number(value: &Value, column: &ColumnSpec, style: &NumberStyle) -> ConvertResult {
    if value.is_null() {
        return Ok(placeholder(column).to_string());
    }
    let fixed = to_fixed(to_number(value), decimals(column)?);
    Ok(style.group(&fixed))
}

/// Like [`number`], for a ratio shown as a percentage.
///
/// Null renders the placeholder, as in [`number`].
///
/// # Examples
///
/// ```rust
/// use sortable_table::{converters, ColumnSpec, NumberStyle, Value};
///
/// let column = ColumnSpec::new("share").with_decimals(1);
/// let text = converters::percent(&Value::from(0.4567), &column, &NumberStyle::new()).unwrap();
/// assert_eq!(text, "45.7%");
/// ```
pub fn percent(value: &Value, column: &ColumnSpec, style: &NumberStyle) -> ConvertResult {
    if value.is_null() {
        return Ok(placeholder(column).to_string());
    }
    let fixed = to_fixed(to_number(value) * 100.0, decimals(column)?);
    Ok(format!("{}%", style.group(&fixed)))
}

/// Renders a date with a moment-style pattern, in UTC.
///
/// Accepts dates, RFC 3339 or `YYYY-MM-DD[ HH:MM[:SS]]` strings, and epoch
/// milliseconds.
///
/// # Examples
///
/// ```rust
/// use sortable_table::{converters, ColumnSpec, Value};
///
/// let column = ColumnSpec::new("created");
/// let text = converters::date(&Value::from("2024-03-09T14:05:00Z"), &column).unwrap();
/// assert_eq!(text, "24-03-09 14:05");
///
/// let column = column.with_format("dddd, MMMM Do YYYY");
/// let text = converters::date(&Value::from("2024-03-09"), &column).unwrap();
/// assert_eq!(text, "Saturday, March 9th 2024");
/// ```
pub fn date(value: &Value, column: &ColumnSpec) -> ConvertResult {
    if !value.is_truthy() {
        return Ok(placeholder(column).to_string());
    }
    let pattern = column
        .options
        .format
        .as_deref()
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_DATE_FORMAT);
    Ok(render_date(&to_date(value)?, pattern))
}

fn placeholder(column: &ColumnSpec) -> &str {
    column
        .options
        .no_value_placeholder
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PLACEHOLDER)
}

fn decimals(column: &ColumnSpec) -> Result<usize, ConvertError> {
    let decimals = column.options.decimals.unwrap_or(DEFAULT_DECIMALS);
    if decimals > MAX_DECIMALS {
        return Err(ConvertError::new(format!(
            "decimals must be between 0 and {}, got {}",
            MAX_DECIMALS, decimals
        )));
    }
    Ok(decimals as usize)
}

fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Date(dt) => dt.timestamp_millis() as f64,
    }
}

// Enough digits to print any f64 fraction without rounding.
const EXACT_DIGITS: usize = 1074;

// Fixed-point text the way a host `toFixed` writes it: the magnitude is rounded
// to the nearest multiple of 10^-decimals, halves away from zero.
fn to_fixed(x: f64, decimals: usize) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return (if x > 0.0 { "Infinity" } else { "-Infinity" }).to_string();
    }
    if x.abs() >= 1e21 {
        // exponent form, always positive here
        return format!("{:e}", x).replacen('e', "e+", 1);
    }

    let exact = format!("{:.*}", EXACT_DIGITS, x.abs());
    let (integer, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().take(decimals))
        .collect();
    let mut integer_len = integer.len();

    if fraction.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
            integer_len += 1;
        }
    }

    let mut out = String::with_capacity(digits.len() + 2);
    // -0 renders unsigned
    if x < 0.0 {
        out.push('-');
    }
    out.extend(digits[..integer_len].iter().map(|d| char::from(*d)));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[integer_len..].iter().map(|d| char::from(*d)));
    }
    out
}

fn to_date(value: &Value) -> Result<DateTime<Utc>, ConvertError> {
    match value {
        Value::Date(dt) => Ok(*dt),
        Value::Number(n) => {
            let millis = n.as_f64();
            if !millis.is_finite() {
                return Err(ConvertError::new(format!("invalid timestamp {}", n)));
            }
            Utc.timestamp_millis_opt(millis as i64)
                .single()
                .ok_or_else(|| ConvertError::new(format!("timestamp {} is out of range", n)))
        }
        Value::String(s) => parse_date(s.trim())
            .ok_or_else(|| ConvertError::new(format!("cannot parse \"{}\" as a date", s))),
        Value::Bool(_) | Value::Null => Err(ConvertError::new(format!(
            "cannot interpret {} as a date",
            value
        ))),
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

// Longest first so "YYYY" wins over "YY" and "Do" over "D".
const TOKENS: [&str; 27] = [
    "YYYY", "MMMM", "dddd", "MMM", "ddd", "SSS", "YY", "MM", "DD", "Do", "HH", "hh", "mm", "ss",
    "ZZ", "M", "D", "d", "H", "h", "m", "s", "A", "a", "Z", "X", "x",
];

/// Renders `dt` with a moment-style pattern.
///
/// Text inside `[...]` is copied literally, as are characters that are not tokens.
pub fn render_date(dt: &DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            match rest[1..].find(']') {
                Some(end) => {
                    out.push_str(&rest[1..=end]);
                    rest = &rest[end + 2..];
                }
                None => {
                    out.push_str(rest);
                    rest = "";
                }
            }
            continue;
        }
        match TOKENS.iter().find(|token| rest.starts_with(*token)) {
            Some(token) => {
                push_token(&mut out, dt, token);
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

fn push_token(out: &mut String, dt: &DateTime<Utc>, token: &str) {
    use std::fmt::Write;

    let month = dt.month0() as usize;
    let weekday = dt.weekday().num_days_from_sunday() as usize;
    let hour12 = match dt.hour() % 12 {
        0 => 12,
        h => h,
    };
    // writing to a String cannot fail
    let _ = match token {
        "YYYY" => write!(out, "{:04}", dt.year()),
        "YY" => write!(out, "{:02}", dt.year().rem_euclid(100)),
        "MMMM" => write!(out, "{}", MONTHS[month]),
        "MMM" => write!(out, "{}", &MONTHS[month][..3]),
        "MM" => write!(out, "{:02}", dt.month()),
        "M" => write!(out, "{}", dt.month()),
        "DD" => write!(out, "{:02}", dt.day()),
        "Do" => write!(out, "{}{}", dt.day(), ordinal_suffix(dt.day())),
        "D" => write!(out, "{}", dt.day()),
        "dddd" => write!(out, "{}", WEEKDAYS[weekday]),
        "ddd" => write!(out, "{}", &WEEKDAYS[weekday][..3]),
        "d" => write!(out, "{}", weekday),
        "HH" => write!(out, "{:02}", dt.hour()),
        "H" => write!(out, "{}", dt.hour()),
        "hh" => write!(out, "{:02}", hour12),
        "h" => write!(out, "{}", hour12),
        "mm" => write!(out, "{:02}", dt.minute()),
        "m" => write!(out, "{}", dt.minute()),
        "ss" => write!(out, "{:02}", dt.second()),
        "s" => write!(out, "{}", dt.second()),
        "SSS" => write!(out, "{:03}", dt.timestamp_subsec_millis()),
        "A" => write!(out, "{}", if dt.hour() < 12 { "AM" } else { "PM" }),
        "a" => write!(out, "{}", if dt.hour() < 12 { "am" } else { "pm" }),
        "Z" => write!(out, "+00:00"),
        "ZZ" => write!(out, "+0000"),
        "X" => write!(out, "{}", dt.timestamp()),
        "x" => write!(out, "{}", dt.timestamp_millis()),
        other => write!(out, "{}", other),
    };
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
