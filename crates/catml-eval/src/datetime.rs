//! Duration and calendar timestamp codecs.
//!
//! Durations are a signed 64-bit nanosecond count with an ISO-8601-like
//! textual form `[-]P[<n>D][T[<n>H][<n>M][<n>[.f]S]]`; timestamps are a
//! 64-bit nanoseconds-since-epoch count. The codecs guarantee
//! `parse_duration(format_duration(x)) == x` for every representable `x`.

use thiserror::Error;

pub(crate) const NANOS_PER_SEC: i128 = 1_000_000_000;
pub(crate) const NANOS_PER_MIN: i128 = 60 * NANOS_PER_SEC;
pub(crate) const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MIN;
pub(crate) const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;

/// Errors for duration parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DurationFormatError {
    /// The text does not match the accepted duration grammar.
    #[error("invalid duration format")]
    InvalidFormat,
    /// The duration exceeds the representable nanosecond range.
    #[error("duration out of range")]
    OutOfRange,
}

fn scan_digits(text: &str) -> (&str, &str) {
    let end = text
        .as_bytes()
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(text.len());
    text.split_at(end)
}

fn fraction_nanos(digits: &str) -> Result<i128, DurationFormatError> {
    if digits.is_empty() {
        return Err(DurationFormatError::InvalidFormat);
    }
    // Nanosecond precision: further digits are truncated.
    let mut padded: String = digits.chars().take(9).collect();
    while padded.len() < 9 {
        padded.push('0');
    }
    padded
        .parse::<i128>()
        .map_err(|_| DurationFormatError::InvalidFormat)
}

/// Parses a duration literal into signed nanoseconds.
///
/// The accepted grammar is an optional leading sign, `P`, an optional
/// `<n>D` day component, and an optional `T` time section with optional
/// `<n>H`, `<n>M` and `<n>[.fraction]S` components; at least one component
/// must be present.
///
/// # Errors
///
/// [`DurationFormatError::InvalidFormat`] when the text does not match the
/// grammar, [`DurationFormatError::OutOfRange`] when the value exceeds 64
/// bits of nanoseconds.
pub fn parse_duration(text: &str) -> Result<i64, DurationFormatError> {
    let mut rest = text;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }
    rest = rest
        .strip_prefix('P')
        .ok_or(DurationFormatError::InvalidFormat)?;

    let mut total: i128 = 0;
    let mut any = false;

    let (digits, after) = scan_digits(rest);
    if !digits.is_empty() {
        rest = after
            .strip_prefix('D')
            .ok_or(DurationFormatError::InvalidFormat)?;
        let days: i128 = digits
            .parse()
            .map_err(|_| DurationFormatError::OutOfRange)?;
        total = days
            .checked_mul(NANOS_PER_DAY)
            .ok_or(DurationFormatError::OutOfRange)?;
        any = true;
    }

    if let Some(mut time) = rest.strip_prefix('T') {
        // Units must appear in H, M, S order, each at most once.
        let mut next_units: &[(char, i128)] = &[
            ('H', NANOS_PER_HOUR),
            ('M', NANOS_PER_MIN),
            ('S', NANOS_PER_SEC),
        ];
        let mut saw_component = false;
        while !time.is_empty() {
            let (digits, after) = scan_digits(time);
            if digits.is_empty() {
                return Err(DurationFormatError::InvalidFormat);
            }
            let magnitude: i128 = digits
                .parse()
                .map_err(|_| DurationFormatError::OutOfRange)?;
            if let Some(frac_text) = after.strip_prefix('.') {
                let (frac_digits, after_frac) = scan_digits(frac_text);
                time = after_frac
                    .strip_prefix('S')
                    .ok_or(DurationFormatError::InvalidFormat)?;
                if !next_units.iter().any(|(unit, _)| *unit == 'S') {
                    return Err(DurationFormatError::InvalidFormat);
                }
                let fraction = fraction_nanos(frac_digits)?;
                total = magnitude
                    .checked_mul(NANOS_PER_SEC)
                    .and_then(|n| n.checked_add(fraction))
                    .and_then(|n| total.checked_add(n))
                    .ok_or(DurationFormatError::OutOfRange)?;
                next_units = &[];
            } else {
                let unit = after
                    .chars()
                    .next()
                    .ok_or(DurationFormatError::InvalidFormat)?;
                let position = next_units
                    .iter()
                    .position(|(u, _)| *u == unit)
                    .ok_or(DurationFormatError::InvalidFormat)?;
                total = magnitude
                    .checked_mul(next_units[position].1)
                    .and_then(|n| total.checked_add(n))
                    .ok_or(DurationFormatError::OutOfRange)?;
                next_units = &next_units[position + 1..];
                time = &after[1..];
            }
            saw_component = true;
        }
        if !saw_component {
            return Err(DurationFormatError::InvalidFormat);
        }
        any = true;
        rest = "";
    }

    if !rest.is_empty() || !any {
        return Err(DurationFormatError::InvalidFormat);
    }

    if negative {
        total = -total;
    }
    i64::try_from(total).map_err(|_| DurationFormatError::OutOfRange)
}

/// Serializes signed nanoseconds to the canonical duration literal.
///
/// Zero components are omitted; a value of exactly zero yields `PT0S`.
/// Fractional seconds are emitted at full 9-digit nanosecond precision and
/// right-trimmed of trailing zeros.
#[must_use]
pub fn format_duration(nanos: i64) -> String {
    use std::fmt::Write;

    if nanos == 0 {
        return "PT0S".to_string();
    }

    let mut n = i128::from(nanos);
    let mut out = String::new();
    if n < 0 {
        out.push('-');
        n = -n;
    }
    out.push('P');

    let days = n / NANOS_PER_DAY;
    let hours = n % NANOS_PER_DAY / NANOS_PER_HOUR;
    let minutes = n % NANOS_PER_HOUR / NANOS_PER_MIN;
    let seconds = n % NANOS_PER_MIN / NANOS_PER_SEC;
    let fraction = n % NANOS_PER_SEC;

    if days != 0 {
        let _ = write!(out, "{days}D");
    }
    if hours != 0 || minutes != 0 || seconds != 0 || fraction != 0 {
        out.push('T');
        if hours != 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes != 0 {
            let _ = write!(out, "{minutes}M");
        }
        if fraction != 0 {
            let digits = format!("{fraction:09}");
            let _ = write!(out, "{seconds}.{}S", digits.trim_end_matches('0'));
        } else if seconds != 0 {
            let _ = write!(out, "{seconds}S");
        }
    }
    out
}

/// Parses a calendar timestamp (`YYYY-MM-DD[T ]HH:MM:SS[.f][Z|±HH:MM]`)
/// into nanoseconds since the epoch.
///
/// Fractional seconds are parsed exactly, at nanosecond precision; further
/// digits are truncated. Returns `None` on unparsable input so the caller
/// can report a context-appropriate message.
#[must_use]
pub fn parse_date_time(text: &str) -> Option<i64> {
    let text = text.trim();
    let split = text.find(['T', ' '])?;
    let (date_part, rest) = text.split_at(split);
    let mut time_part = &rest[1..];

    let mut offset_minutes: i64 = 0;
    if let Some(stripped) = time_part.strip_suffix('Z') {
        time_part = stripped;
    } else if time_part.len() > 6 {
        let (head, tail) = time_part.split_at(time_part.len() - 6);
        if let Some(zone) = tail.strip_prefix(['+', '-']) {
            let (zone_hours, zone_minutes) = zone.split_once(':')?;
            let minutes =
                zone_hours.parse::<i64>().ok()? * 60 + zone_minutes.parse::<i64>().ok()?;
            offset_minutes = if tail.starts_with('-') { -minutes } else { minutes };
            time_part = head;
        }
    }

    let (year, month, day) = parse_date_parts(date_part)?;
    let days = days_from_civil(year, month, day)?;

    let mut parts = time_part.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds_text = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let (seconds, fraction) = match seconds_text.split_once('.') {
        Some((secs, frac)) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (secs.parse::<i64>().ok()?, fraction_nanos(frac).ok()?)
        }
        None => (seconds_text.parse::<i64>().ok()?, 0),
    };
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }

    let total = i128::from(days) * NANOS_PER_DAY
        + i128::from(hours) * NANOS_PER_HOUR
        + i128::from(minutes - offset_minutes) * NANOS_PER_MIN
        + i128::from(seconds) * NANOS_PER_SEC
        + fraction;
    i64::try_from(total).ok()
}

/// Formats nanoseconds since the epoch as a UTC timestamp string.
#[must_use]
pub fn format_date_time(nanos: i64) -> String {
    let days = nanos.div_euclid(86_400_000_000_000);
    let in_day = i128::from(nanos.rem_euclid(86_400_000_000_000));

    let (year, month, day) = civil_from_days(days);
    let hours = in_day / NANOS_PER_HOUR;
    let minutes = in_day % NANOS_PER_HOUR / NANOS_PER_MIN;
    let seconds = in_day % NANOS_PER_MIN / NANOS_PER_SEC;
    let fraction = in_day % NANOS_PER_SEC;

    let mut out = format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}");
    if fraction != 0 {
        let digits = format!("{fraction:09}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out.push('Z');
    out
}

fn parse_date_parts(text: &str) -> Option<(i64, i64, i64)> {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text),
    };
    let mut parts = rest.split('-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month: i64 = parts.next()?.parse().ok()?;
    let day: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((sign * year, month, day))
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

fn days_from_civil(year: i64, month: i64, day: i64) -> Option<i64> {
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return None;
    }
    // Far beyond the representable nanosecond range; also keeps the era
    // arithmetic below inside i64.
    if !(-1_000_000..=1_000_000).contains(&year) {
        return None;
    }
    let y = year - i64::from(month <= 2);
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let m = month + if month > 2 { -3 } else { 9 };
    let doy = (153 * m + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    Some(era * 146_097 + doe - 719_468)
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = mp + if mp < 10 { 3 } else { -9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_grammar() {
        assert_eq!(parse_duration("PT1S"), Ok(1_000_000_000));
        assert_eq!(parse_duration("P1D"), Ok(86_400_000_000_000));
        assert_eq!(
            parse_duration("P1DT2H3M4.5S"),
            Ok(86_400_000_000_000 + 2 * 3_600_000_000_000 + 3 * 60_000_000_000 + 4_500_000_000)
        );
        assert_eq!(parse_duration("-PT0.000000001S"), Ok(-1));
        assert_eq!(parse_duration("PT0S"), Ok(0));
    }

    #[test]
    fn test_duration_rejects_malformed() {
        assert_eq!(parse_duration("P"), Err(DurationFormatError::InvalidFormat));
        assert_eq!(parse_duration("PT"), Err(DurationFormatError::InvalidFormat));
        assert_eq!(parse_duration("1S"), Err(DurationFormatError::InvalidFormat));
        assert_eq!(parse_duration("PT1H2S3M"), Err(DurationFormatError::InvalidFormat));
        assert_eq!(parse_duration("PT1.5H"), Err(DurationFormatError::InvalidFormat));
        assert_eq!(parse_duration("P1DT"), Err(DurationFormatError::InvalidFormat));
    }

    #[test]
    fn test_duration_canonical_zero() {
        assert_eq!(format_duration(0), "PT0S");
    }

    #[test]
    fn test_fraction_trimming() {
        assert_eq!(format_duration(4_500_000_000), "PT4.5S");
        assert_eq!(format_duration(1), "PT0.000000001S");
    }

    #[test]
    fn test_civil_day_inverse() {
        for days in [-1_000_000, -719_468, -1, 0, 1, 719_468, 1_000_000] {
            let (y, m, d) = civil_from_days(days);
            assert_eq!(days_from_civil(y, m, d), Some(days));
        }
    }

    #[test]
    fn test_date_time_parsing() {
        assert_eq!(parse_date_time("1970-01-01T00:00:00Z"), Some(0));
        assert_eq!(parse_date_time("1970-01-01 00:00:01"), Some(1_000_000_000));
        assert_eq!(
            parse_date_time("1970-01-01T00:00:00.123456789Z"),
            Some(123_456_789)
        );
        assert_eq!(
            parse_date_time("1970-01-01T01:00:00+01:00"),
            Some(0)
        );
        assert_eq!(parse_date_time("not a date"), None);
        assert_eq!(parse_date_time("1970-13-01T00:00:00Z"), None);
    }

    #[test]
    fn test_date_time_formatting() {
        assert_eq!(format_date_time(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_date_time(123_456_789), "1970-01-01T00:00:00.123456789Z");
        assert_eq!(format_date_time(-1), "1969-12-31T23:59:59.999999999Z");
    }
}
